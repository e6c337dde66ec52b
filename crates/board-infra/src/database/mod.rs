//! Credential store: connection pool, entities, and repositories.

mod base;
mod connections;
pub mod entity;
pub mod repositories;

pub use base::SeaOrmRepository;
pub use connections::{DatabaseConfig, connect};
pub use repositories::{SqlPostRepository, SqlUserRepository};
