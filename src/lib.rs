//! Storefront API library
//!
//! Everything the `noctura-store` binary wires together, exposed as a library
//! so integration tests can drive the service layers directly.

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
