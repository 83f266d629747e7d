//! Ledger aggregation property and unit tests
//!
//! Tests for the profitability arithmetic:
//! - Net profit is exactly income minus expense per field
//! - Estate totals reconcile with the per-field breakdown plus the
//!   general (field-less) bucket
//! - Missing amounts count as zero and never poison a sum

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A minimal ledger line: field index (None = general) and amount
type Line = (Option<usize>, Decimal);

fn field_total(lines: &[Line], field: usize) -> Decimal {
    lines
        .iter()
        .filter(|(f, _)| *f == Some(field))
        .map(|(_, amount)| *amount)
        .sum()
}

fn general_total(lines: &[Line]) -> Decimal {
    lines
        .iter()
        .filter(|(f, _)| f.is_none())
        .map(|(_, amount)| *amount)
        .sum()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate an amount in Rs (0.01 to 100000.00)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Generate ledger lines spread over 3 fields plus the general bucket
fn lines_strategy() -> impl Strategy<Value = Vec<Line>> {
    prop::collection::vec(
        (prop::option::of(0..3usize), amount_strategy()),
        0..20,
    )
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The end-to-end scenario: one resolved tea harvest on field A, a
    /// labor expense on field A, and a general overhead
    #[test]
    fn test_two_field_estate_reconciles() {
        // Field A: 100 kg tea at the collector's January rate of 40
        let income_a = dec("100") * dec("40");
        assert_eq!(income_a, dec("4000"));

        // Field A: 2 workers at 500
        let expense_a = dec("2") * dec("500");
        assert_eq!(expense_a, dec("1000"));

        // General: 1 overhead at 300
        let general = dec("1") * dec("300");

        let profit_a = income_a - expense_a;
        assert_eq!(profit_a, dec("3000"));

        // Field B recorded nothing
        let profit_b = Decimal::ZERO;

        let total_income = income_a;
        let total_expense = expense_a + general;
        assert_eq!(total_expense, dec("1300"));

        let total_profit = total_income - total_expense;
        assert_eq!(total_profit, dec("2700"));
        assert_eq!(profit_a + profit_b - general, total_profit);
    }

    #[test]
    fn test_missing_amounts_count_as_zero() {
        let amounts = [Some(dec("100")), None, Some(dec("50.5")), None];
        let total: Decimal = amounts.iter().map(|a| a.unwrap_or(Decimal::ZERO)).sum();
        assert_eq!(total, dec("150.5"));
    }

    #[test]
    fn test_general_bucket_is_separate_from_fields() {
        let expenses: Vec<Line> = vec![
            (Some(0), dec("1000")),
            (None, dec("300")),
            (Some(1), dec("200")),
        ];
        assert_eq!(field_total(&expenses, 0), dec("1000"));
        assert_eq!(field_total(&expenses, 1), dec("200"));
        assert_eq!(general_total(&expenses), dec("300"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Per-field net profit is exactly income minus expense
    #[test]
    fn prop_net_profit_identity(
        incomes in lines_strategy(),
        expenses in lines_strategy(),
    ) {
        for field in 0..3 {
            let income = field_total(&incomes, field);
            let expense = field_total(&expenses, field);
            let net = income - expense;
            prop_assert_eq!(net + expense, income);
        }
    }

    /// Estate totals reconcile: the sum of per-field profits minus the
    /// general bucket equals total income minus total expense
    #[test]
    fn prop_estate_totals_reconcile(
        incomes in lines_strategy(),
        expenses in lines_strategy(),
    ) {
        let total_income: Decimal = (0..3).map(|f| field_total(&incomes, f)).sum();
        let general = general_total(&expenses);
        let total_expense: Decimal =
            (0..3).map(|f| field_total(&expenses, f)).sum::<Decimal>() + general;

        let field_profit: Decimal = (0..3)
            .map(|f| field_total(&incomes, f) - field_total(&expenses, f))
            .sum();

        prop_assert_eq!(field_profit - general, total_income - total_expense);
    }

    /// Splitting lines across fields never changes the overall sum
    #[test]
    fn prop_partition_preserves_sum(lines in lines_strategy()) {
        let by_bucket: Decimal = (0..3)
            .map(|f| field_total(&lines, f))
            .sum::<Decimal>() + general_total(&lines);
        let direct: Decimal = lines.iter().map(|(_, amount)| *amount).sum();
        prop_assert_eq!(by_bucket, direct);
    }

    /// General income does not exist: a field-less amount only ever lands
    /// in the general bucket, never in a field total
    #[test]
    fn prop_general_never_double_counted(amount in amount_strategy()) {
        let lines: Vec<Line> = vec![(None, amount)];
        for field in 0..3 {
            prop_assert_eq!(field_total(&lines, field), Decimal::ZERO);
        }
        prop_assert_eq!(general_total(&lines), amount);
    }
}
