//! # Board Shared
//!
//! Wire types shared between the API server and the client application.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
