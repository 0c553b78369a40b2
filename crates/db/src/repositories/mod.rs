//! Repository layer: one zero-sized repo per table, taking the pool per call.

pub mod carro_repo;

pub use carro_repo::CarroRepo;
