//! Tea collector models: collectors, monthly rates, and cash advances

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tea collector (buyer) the estate hands green leaf to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    pub id: Uuid,
    pub name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The sale rate one collector pays per kilogram of tea for one calendar
/// month. Unique per (collector_id, month, year); setting a new rate for
/// the same month replaces the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorRate {
    pub id: Uuid,
    pub collector_id: Uuid,
    /// Calendar month, 1-12
    pub month: u32,
    pub year: i32,
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A cash advance paid to a collector against future harvest proceeds.
/// Never netted into harvest totals; the collector balance is derived at
/// report time only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorAdvance {
    pub id: Uuid,
    pub collector_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
