//! # Board Core
//!
//! The domain layer of the board service: accounts, posts, and the ports
//! that storage and authentication backends implement.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::{DomainError, RepoError};
