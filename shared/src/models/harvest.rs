//! Harvest models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A harvest (income) record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Harvest {
    pub id: Uuid,
    pub field_id: Uuid,
    pub date: NaiveDate,
    pub crop_type: CropType,
    /// Harvested weight in kilograms
    pub weight_kg: Decimal,
    /// Sale rate per kilogram; absent for tea handed to a collector whose
    /// monthly rate is not yet known
    pub rate: Option<Decimal>,
    /// Tea collector who bought the harvest; None means a direct cash sale
    pub collector_id: Option<Uuid>,
    /// Stored sale total; 0 until a pending tea rate is resolved
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Harvest {
    /// Whether this harvest still needs its monthly collector rate.
    /// Only tea handed to a collector is ever priced after the fact.
    pub fn needs_rate(&self) -> bool {
        self.crop_type == CropType::Tea
            && self.collector_id.is_some()
            && self.rate.map_or(true, |r| r == Decimal::ZERO)
    }
}

/// Crops grown on the estate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    Tea,
    Pepper,
    Coffee,
    /// Other crop with name
    Other(String),
}

impl CropType {
    /// Parse from the text stored in the record store
    pub fn parse(s: &str) -> Self {
        match s {
            "tea" => CropType::Tea,
            "pepper" => CropType::Pepper,
            "coffee" => CropType::Coffee,
            other => CropType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CropType::Tea => "tea",
            CropType::Pepper => "pepper",
            CropType::Coffee => "coffee",
            CropType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harvest(crop_type: CropType, rate: Option<Decimal>, collector: Option<Uuid>) -> Harvest {
        Harvest {
            id: Uuid::new_v4(),
            field_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            crop_type,
            weight_kg: Decimal::from(100),
            rate,
            collector_id: collector,
            total_amount: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tea_without_rate_needs_rate() {
        let h = harvest(CropType::Tea, None, Some(Uuid::new_v4()));
        assert!(h.needs_rate());
    }

    #[test]
    fn test_tea_with_zero_rate_needs_rate() {
        let h = harvest(CropType::Tea, Some(Decimal::ZERO), Some(Uuid::new_v4()));
        assert!(h.needs_rate());
    }

    #[test]
    fn test_cash_sale_never_needs_rate() {
        let h = harvest(CropType::Tea, None, None);
        assert!(!h.needs_rate());
    }

    #[test]
    fn test_priced_crop_does_not_need_rate() {
        let h = harvest(CropType::Pepper, Some(Decimal::from(1200)), None);
        assert!(!h.needs_rate());
    }

    #[test]
    fn test_crop_type_round_trip() {
        assert_eq!(CropType::parse("tea"), CropType::Tea);
        assert_eq!(CropType::parse("cinnamon").as_str(), "cinnamon");
    }
}
