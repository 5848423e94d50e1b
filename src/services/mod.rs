//! Business logic, written against the storage seams

pub mod cart;
pub mod orders;
