//! Database models for the Estate Ledger backend
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
