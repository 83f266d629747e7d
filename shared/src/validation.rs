//! Validation utilities for the Estate Ledger platform
//!
//! Includes Sri Lanka-specific validations for contact details.

use rust_decimal::Decimal;

use crate::types::DateRange;

// ============================================================================
// Bookkeeping Validations
// ============================================================================

/// Validate a harvest weight in kilograms
pub fn validate_weight(weight_kg: Decimal) -> Result<(), &'static str> {
    if weight_kg < Decimal::ZERO {
        return Err("Weight cannot be negative");
    }
    Ok(())
}

/// Validate an expense quantity (workers or units)
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Validate a sale or pay rate
pub fn validate_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO {
        return Err("Rate cannot be negative");
    }
    Ok(())
}

/// Validate an advance amount
pub fn validate_advance_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Advance amount must be greater than 0");
    }
    Ok(())
}

/// Validate a calendar month number
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate a reporting period
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.start > range.end {
        return Err("Period start date must not be after the end date");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a display name (field, collector, activity)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name must not be empty");
    }
    if name.len() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

// ============================================================================
// Sri Lanka-Specific Validations
// ============================================================================

/// Validate a Sri Lankan phone number format
/// Accepts: 0712345678, 071-234-5678, +94712345678
pub fn validate_sri_lanka_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Local format: 10 digits starting with 0 (e.g., 0712345678)
    if digits.len() == 10 && digits.starts_with('0') {
        return Ok(());
    }
    // International format without leading 0: 9 digits
    if digits.len() == 9 && !digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 11 digits starting with 94
    if digits.len() == 11 && digits.starts_with("94") {
        return Ok(());
    }

    Err("Invalid Sri Lankan phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // ========================================================================
    // Bookkeeping Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(Decimal::from(100)).is_ok());
        assert!(validate_weight(Decimal::ZERO).is_ok());
        assert!(validate_weight(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Decimal::from(3)).is_ok());
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(Decimal::from(-2)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate(Decimal::from(250)).is_ok());
        assert!(validate_rate(Decimal::ZERO).is_ok());
        assert!(validate_rate(Decimal::from(-50)).is_err());
    }

    #[test]
    fn test_validate_advance_amount() {
        assert!(validate_advance_amount(Decimal::from(5000)).is_ok());
        assert!(validate_advance_amount(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let valid = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert!(validate_date_range(&valid).is_ok());

        let single_day = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(validate_date_range(&single_day).is_ok());

        let inverted = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(validate_date_range(&inverted).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Upper Field").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_sri_lanka_phone() {
        assert!(validate_sri_lanka_phone("0712345678").is_ok());
        assert!(validate_sri_lanka_phone("071-234-5678").is_ok());
        assert!(validate_sri_lanka_phone("+94712345678").is_ok());
        assert!(validate_sri_lanka_phone("712345678").is_ok());
        assert!(validate_sri_lanka_phone("12345").is_err());
    }
}
