//! Domain types, errors and the `Carro` serializer shared by the db and api crates.

pub mod carro;
pub mod error;
pub mod pagination;
pub mod types;
