//! Business logic services for the Estate Ledger platform

pub mod collector;
pub mod expense;
pub mod field;
pub mod harvest;
pub mod ledger;
pub mod master;
pub mod rates;
pub mod report;

pub use collector::CollectorService;
pub use expense::ExpenseService;
pub use field::FieldService;
pub use harvest::HarvestService;
pub use ledger::LedgerService;
pub use master::MasterDataService;
pub use report::ReportService;
