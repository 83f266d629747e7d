//! Expense model property and unit tests
//!
//! Tests for the typed expense variants and write-time totals:
//! - The four expense kinds round-trip through their store strings
//! - Totals are always quantity x rate, unaffected by crop logic
//! - Validation bounds on quantities, rates, and advances

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{ExpenseDetail, ExpenseKind};
use shared::validation::{validate_advance_amount, validate_quantity, validate_rate};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate a quantity (0.1 to 100.0)
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1..=1000i64).prop_map(|n| Decimal::new(n, 1))
}

/// Generate a rate in Rs (0.01 to 10000.00)
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn kind_strategy() -> impl Strategy<Value = ExpenseKind> {
    prop::sample::select(ExpenseKind::ALL.to_vec())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_expense_total_is_quantity_times_rate() {
        // 3 units at 150 total 450, with no crop-type involvement
        assert_eq!(dec("3") * dec("150"), dec("450"));
    }

    #[test]
    fn test_kind_strings_are_snake_case() {
        for kind in ExpenseKind::ALL {
            let s = kind.as_str();
            assert!(s.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in ExpenseKind::ALL {
            assert_eq!(ExpenseKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ExpenseKind::parse("machinery"), None);
    }

    #[test]
    fn test_detail_variants_carry_only_their_fields() {
        let labor = ExpenseDetail::LaborCost {
            activity_id: Some(Uuid::new_v4()),
            hours_worked: Some(dec("6")),
        };
        assert_eq!(labor.kind(), ExpenseKind::LaborCost);

        let goods = ExpenseDetail::GoodsCost {
            item_id: Some(Uuid::new_v4()),
        };
        assert_eq!(goods.kind(), ExpenseKind::GoodsCost);

        let overhead = ExpenseDetail::Overhead {
            description: Some("Transport".to_string()),
        };
        assert_eq!(overhead.kind(), ExpenseKind::Overhead);
    }

    #[test]
    fn test_detail_json_tag_matches_store_string() {
        let json = serde_json::to_value(ExpenseDetail::OwnerLabor {
            activity_id: None,
            hours_worked: None,
        })
        .unwrap();
        assert_eq!(json["type"], ExpenseKind::OwnerLabor.as_str());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Write-time totals multiply exactly for any quantity and rate
    #[test]
    fn prop_total_is_product(
        quantity in quantity_strategy(),
        rate in rate_strategy(),
    ) {
        let total = quantity * rate;
        prop_assert_eq!(total, rate * quantity);
        prop_assert!(total >= Decimal::ZERO);
    }

    /// Every generated kind survives the store round trip
    #[test]
    fn prop_kind_round_trips(kind in kind_strategy()) {
        prop_assert_eq!(ExpenseKind::parse(kind.as_str()), Some(kind));
    }

    /// Positive quantities and non-negative rates always validate
    #[test]
    fn prop_valid_amounts_accepted(
        quantity in quantity_strategy(),
        rate in rate_strategy(),
    ) {
        prop_assert!(validate_quantity(quantity).is_ok());
        prop_assert!(validate_rate(rate).is_ok());
        prop_assert!(validate_advance_amount(rate).is_ok());
    }

    /// Negative amounts are always rejected
    #[test]
    fn prop_negative_amounts_rejected(
        quantity in quantity_strategy(),
        rate in rate_strategy(),
    ) {
        prop_assert!(validate_quantity(-quantity).is_err());
        prop_assert!(validate_rate(-rate).is_err());
        prop_assert!(validate_advance_amount(-rate).is_err());
    }
}
