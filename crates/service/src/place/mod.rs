//! Place module: CRUD over owned place records. Create and delete span the
//! place row and the owner's place list inside one store transaction.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::PlaceService;
