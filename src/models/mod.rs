//! Domain models shared by the db, service, and API layers

pub mod cart;
pub mod order;
pub mod product;
