//! Auth module: token codec plus the user workflows (signup, login, list)
//! in a three-layer shape (domain, repository, service).

pub mod domain;
pub mod errors;
pub mod token;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
pub use token::TokenService;
