//! Domain models for the Estate Ledger platform

mod collector;
mod expense;
mod field;
mod harvest;
mod master;

pub use collector::*;
pub use expense::*;
pub use field::*;
pub use harvest::*;
pub use master::*;
