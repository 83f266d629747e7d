//! Expense transaction models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An expense transaction against a field, or against the whole estate
/// when `field_id` is absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Field the expense belongs to; None means an estate-wide ("general")
    /// expense not attributable to any field
    pub field_id: Option<Uuid>,
    pub detail: ExpenseDetail,
    /// Number of workers (labor) or units (goods); 1 for overheads
    pub quantity: Decimal,
    pub rate: Decimal,
    /// Always `quantity * rate`, computed at write time
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn kind(&self) -> ExpenseKind {
        self.detail.kind()
    }
}

/// The four expense kinds, used for report grouping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    LaborCost,
    GoodsCost,
    Overhead,
    OwnerLabor,
}

impl ExpenseKind {
    pub const ALL: [ExpenseKind; 4] = [
        ExpenseKind::LaborCost,
        ExpenseKind::GoodsCost,
        ExpenseKind::Overhead,
        ExpenseKind::OwnerLabor,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "labor_cost" => Some(ExpenseKind::LaborCost),
            "goods_cost" => Some(ExpenseKind::GoodsCost),
            "overhead" => Some(ExpenseKind::Overhead),
            "owner_labor" => Some(ExpenseKind::OwnerLabor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::LaborCost => "labor_cost",
            ExpenseKind::GoodsCost => "goods_cost",
            ExpenseKind::Overhead => "overhead",
            ExpenseKind::OwnerLabor => "owner_labor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseKind::LaborCost => "Labor",
            ExpenseKind::GoodsCost => "Goods/Supplies",
            ExpenseKind::Overhead => "Overheads",
            ExpenseKind::OwnerLabor => "Owner Labor",
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific expense data. Labor kinds reference the activity master,
/// goods reference the inventory master, overheads carry free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpenseDetail {
    LaborCost {
        activity_id: Option<Uuid>,
        hours_worked: Option<Decimal>,
    },
    GoodsCost {
        item_id: Option<Uuid>,
    },
    Overhead {
        description: Option<String>,
    },
    OwnerLabor {
        activity_id: Option<Uuid>,
        hours_worked: Option<Decimal>,
    },
}

impl ExpenseDetail {
    pub fn kind(&self) -> ExpenseKind {
        match self {
            ExpenseDetail::LaborCost { .. } => ExpenseKind::LaborCost,
            ExpenseDetail::GoodsCost { .. } => ExpenseKind::GoodsCost,
            ExpenseDetail::Overhead { .. } => ExpenseKind::Overhead,
            ExpenseDetail::OwnerLabor { .. } => ExpenseKind::OwnerLabor,
        }
    }
}
