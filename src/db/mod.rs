//! Database access layer
//!
//! Plain async query functions over `PgPool`. Cart persistence lives in
//! `crate::cart::postgres` behind the `CartStore` trait.

pub mod orders;
pub mod products;
