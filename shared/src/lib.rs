//! Shared types and models for the Estate Ledger platform
//!
//! This crate contains types shared between the backend and other
//! components of the system (report renderers, future clients).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
