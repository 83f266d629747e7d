//! Master data: lookup tables that pre-fill expense entry forms

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A standard estate labor activity (plucking, weeding, pruning, ...)
/// with its default day rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMaster {
    pub id: Uuid,
    pub name: String,
    pub default_rate: Option<Decimal>,
}

/// A purchasable input (fertilizer, dolomite, ...) with its default
/// unit price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Option<Decimal>,
}
