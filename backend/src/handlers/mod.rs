//! HTTP handlers for the Estate Ledger platform

mod collector;
mod dashboard;
mod expense;
mod field;
mod harvest;
mod health;
mod master;
mod report;

pub use collector::*;
pub use dashboard::*;
pub use expense::*;
pub use field::*;
pub use harvest::*;
pub use health::*;
pub use master::*;
pub use report::*;
