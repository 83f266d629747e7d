//! Expense transaction service
//!
//! Expense totals are always `quantity * rate`, fixed at write time; there
//! is no deferred pricing on the expense side.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Expense, ExpenseDetail, ExpenseKind};
use shared::validation::{validate_quantity, validate_rate};

/// Expense service for managing expense transactions
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Database row for an expense transaction
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ExpenseRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub field_id: Option<Uuid>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub hours_worked: Option<Decimal>,
    pub rate: Decimal,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = AppError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let kind = ExpenseKind::parse(&row.kind).ok_or_else(|| {
            AppError::DataIntegrity(format!(
                "Expense {} has unknown type '{}'",
                row.id, row.kind
            ))
        })?;

        let detail = match kind {
            ExpenseKind::LaborCost => ExpenseDetail::LaborCost {
                activity_id: row.category_id,
                hours_worked: row.hours_worked,
            },
            ExpenseKind::GoodsCost => ExpenseDetail::GoodsCost {
                item_id: row.category_id,
            },
            ExpenseKind::Overhead => ExpenseDetail::Overhead {
                description: row.description,
            },
            ExpenseKind::OwnerLabor => ExpenseDetail::OwnerLabor {
                activity_id: row.category_id,
                hours_worked: row.hours_worked,
            },
        };

        Ok(Expense {
            id: row.id,
            date: row.date,
            field_id: row.field_id,
            detail,
            quantity: row.quantity,
            rate: row.rate,
            total_amount: row.total_amount,
            created_at: row.created_at,
        })
    }
}

/// An expense with its field name, for listing
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseWithField {
    #[serde(flatten)]
    pub expense: Expense,
    pub field_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ExpenseWithFieldRow {
    #[sqlx(flatten)]
    expense: ExpenseRow,
    field_name: Option<String>,
}

/// Input for recording an expense
#[derive(Debug, Deserialize)]
pub struct RecordExpenseInput {
    pub date: NaiveDate,
    /// None records an estate-wide ("general") expense
    pub field_id: Option<Uuid>,
    pub detail: ExpenseDetail,
    /// Workers or units; defaults to 1
    pub quantity: Option<Decimal>,
    pub rate: Decimal,
}

/// Input for updating an expense
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseInput {
    pub date: Option<NaiveDate>,
    pub field_id: Option<Option<Uuid>>,
    pub detail: Option<ExpenseDetail>,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
}

/// Map a typed detail onto the loosely-typed store columns
pub(crate) fn detail_columns(
    detail: &ExpenseDetail,
) -> (&'static str, Option<Uuid>, Option<String>, Option<Decimal>) {
    match detail {
        ExpenseDetail::LaborCost {
            activity_id,
            hours_worked,
        } => ("labor_cost", *activity_id, None, *hours_worked),
        ExpenseDetail::GoodsCost { item_id } => ("goods_cost", *item_id, None, None),
        ExpenseDetail::Overhead { description } => {
            ("overhead", None, description.clone(), None)
        }
        ExpenseDetail::OwnerLabor {
            activity_id,
            hours_worked,
        } => ("owner_labor", *activity_id, None, *hours_worked),
    }
}

pub(crate) fn validate_expense_amounts(quantity: Decimal, rate: Decimal) -> AppResult<()> {
    validate_quantity(quantity).map_err(|msg| AppError::Validation {
        field: "quantity".to_string(),
        message: msg.to_string(),
        message_si: format!("ප්‍රමාණය වලංගු නොවේ: {}", msg),
    })?;
    validate_rate(rate).map_err(|msg| AppError::Validation {
        field: "rate".to_string(),
        message: msg.to_string(),
        message_si: format!("මිල වලංගු නොවේ: {}", msg),
    })?;
    Ok(())
}

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all expenses with field names, newest first. Rows with an
    /// unrecognized type are skipped and logged rather than failing the
    /// whole listing.
    pub async fn get_expenses(&self) -> AppResult<Vec<ExpenseWithField>> {
        let rows = sqlx::query_as::<_, ExpenseWithFieldRow>(
            r#"
            SELECT t.id, t.date, t.field_id, t.type, t.category_id, t.description,
                   t.quantity, t.hours_worked, t.rate, t.total_amount, t.created_at,
                   f.name AS field_name
            FROM transactions t
            LEFT JOIN fields f ON f.id = t.field_id
            ORDER BY t.date DESC, t.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut expenses = Vec::with_capacity(rows.len());
        for row in rows {
            let field_name = row.field_name;
            match Expense::try_from(row.expense) {
                Ok(expense) => expenses.push(ExpenseWithField {
                    expense,
                    field_name,
                }),
                Err(e) => tracing::warn!("Skipping expense row: {}", e),
            }
        }

        Ok(expenses)
    }

    /// Get an expense by ID
    pub async fn get_expense(&self, expense_id: Uuid) -> AppResult<Expense> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, date, field_id, type, category_id, description,
                   quantity, hours_worked, rate, total_amount, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Expense::try_from(row)
    }

    /// Record a new expense
    pub async fn record_expense(&self, input: RecordExpenseInput) -> AppResult<Expense> {
        let quantity = input.quantity.unwrap_or(Decimal::ONE);
        validate_expense_amounts(quantity, input.rate)?;

        if let Some(field_id) = input.field_id {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields WHERE id = $1")
                    .bind(field_id)
                    .fetch_one(&self.db)
                    .await?;
            if exists == 0 {
                return Err(AppError::NotFound("Field".to_string()));
            }
        }

        let (kind, category_id, description, hours_worked) = detail_columns(&input.detail);
        let total_amount = quantity * input.rate;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            INSERT INTO transactions
                (date, field_id, type, category_id, description, quantity, hours_worked, rate, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, date, field_id, type, category_id, description,
                      quantity, hours_worked, rate, total_amount, created_at
            "#,
        )
        .bind(input.date)
        .bind(input.field_id)
        .bind(kind)
        .bind(category_id)
        .bind(&description)
        .bind(quantity)
        .bind(hours_worked)
        .bind(input.rate)
        .bind(total_amount)
        .fetch_one(&self.db)
        .await?;

        Expense::try_from(row)
    }

    /// Update an expense, recomputing the stored total
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        input: UpdateExpenseInput,
    ) -> AppResult<Expense> {
        let existing = self.get_expense(expense_id).await?;

        let date = input.date.unwrap_or(existing.date);
        let field_id = input.field_id.unwrap_or(existing.field_id);
        let detail = input.detail.unwrap_or(existing.detail);
        let quantity = input.quantity.unwrap_or(existing.quantity);
        let rate = input.rate.unwrap_or(existing.rate);
        validate_expense_amounts(quantity, rate)?;

        if let Some(field_id) = field_id {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields WHERE id = $1")
                    .bind(field_id)
                    .fetch_one(&self.db)
                    .await?;
            if exists == 0 {
                return Err(AppError::NotFound("Field".to_string()));
            }
        }

        let (kind, category_id, description, hours_worked) = detail_columns(&detail);
        let total_amount = quantity * rate;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            UPDATE transactions
            SET date = $1, field_id = $2, type = $3, category_id = $4, description = $5,
                quantity = $6, hours_worked = $7, rate = $8, total_amount = $9
            WHERE id = $10
            RETURNING id, date, field_id, type, category_id, description,
                      quantity, hours_worked, rate, total_amount, created_at
            "#,
        )
        .bind(date)
        .bind(field_id)
        .bind(kind)
        .bind(category_id)
        .bind(&description)
        .bind(quantity)
        .bind(hours_worked)
        .bind(rate)
        .bind(total_amount)
        .bind(expense_id)
        .fetch_one(&self.db)
        .await?;

        Expense::try_from(row)
    }

    /// Delete an expense
    pub async fn delete_expense(&self, expense_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(expense_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_columns_labor() {
        let activity = Uuid::new_v4();
        let (kind, category, description, hours) = detail_columns(&ExpenseDetail::LaborCost {
            activity_id: Some(activity),
            hours_worked: Some(Decimal::from(6)),
        });
        assert_eq!(kind, "labor_cost");
        assert_eq!(category, Some(activity));
        assert_eq!(description, None);
        assert_eq!(hours, Some(Decimal::from(6)));
    }

    #[test]
    fn test_detail_columns_overhead() {
        let (kind, category, description, hours) = detail_columns(&ExpenseDetail::Overhead {
            description: Some("Transport".to_string()),
        });
        assert_eq!(kind, "overhead");
        assert_eq!(category, None);
        assert_eq!(description.as_deref(), Some("Transport"));
        assert_eq!(hours, None);
    }

    #[test]
    fn test_row_with_unknown_kind_is_rejected() {
        let row = ExpenseRow {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            field_id: None,
            kind: "fuel".to_string(),
            category_id: None,
            description: None,
            quantity: Decimal::ONE,
            hours_worked: None,
            rate: Decimal::from(100),
            total_amount: Decimal::from(100),
            created_at: Utc::now(),
        };
        assert!(Expense::try_from(row).is_err());
    }

    #[test]
    fn test_row_round_trip_preserves_detail() {
        let activity = Uuid::new_v4();
        let row = ExpenseRow {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            field_id: Some(Uuid::new_v4()),
            kind: "owner_labor".to_string(),
            category_id: Some(activity),
            description: None,
            quantity: Decimal::from(2),
            hours_worked: Some(Decimal::from(4)),
            rate: Decimal::from(500),
            total_amount: Decimal::from(1000),
            created_at: Utc::now(),
        };
        let expense = Expense::try_from(row).unwrap();
        assert_eq!(expense.kind(), ExpenseKind::OwnerLabor);
        assert_eq!(
            expense.detail,
            ExpenseDetail::OwnerLabor {
                activity_id: Some(activity),
                hours_worked: Some(Decimal::from(4)),
            }
        );
    }
}
