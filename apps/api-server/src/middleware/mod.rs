//! Middleware modules.

pub mod auth;
pub mod error;
pub mod headers;
pub mod panic;
pub mod rate_limit;
