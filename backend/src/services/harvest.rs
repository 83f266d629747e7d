//! Harvest management service for recording and tracking harvest income
//!
//! Pricing at entry follows the estate's rules: cash sales and non-tea
//! crops must be priced immediately; tea handed to a collector may be
//! recorded unpriced and is resolved later from the collector's monthly
//! rate (see `services::rates`).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::expense::{detail_columns, validate_expense_amounts};
use shared::models::{CropType, ExpenseDetail, Harvest};
use shared::validation::{validate_advance_amount, validate_weight};

/// Harvest service for managing harvest records
#[derive(Clone)]
pub struct HarvestService {
    db: PgPool,
}

/// Database row for a harvest
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct HarvestRow {
    pub id: Uuid,
    pub field_id: Uuid,
    pub date: NaiveDate,
    pub crop_type: String,
    pub weight_kg: Decimal,
    pub rate: Option<Decimal>,
    pub collector_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<HarvestRow> for Harvest {
    fn from(row: HarvestRow) -> Self {
        Self {
            id: row.id,
            field_id: row.field_id,
            date: row.date,
            crop_type: CropType::parse(&row.crop_type),
            weight_kg: row.weight_kg,
            rate: row.rate,
            collector_id: row.collector_id,
            total_amount: row.total_amount,
            created_at: row.created_at,
        }
    }
}

/// A harvest with its field name, for listing
#[derive(Debug, Clone, Serialize)]
pub struct HarvestWithField {
    #[serde(flatten)]
    pub harvest: Harvest,
    pub field_name: String,
    /// Whether the sale still awaits the collector's monthly rate
    pub rate_pending: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct HarvestWithFieldRow {
    #[sqlx(flatten)]
    harvest: HarvestRow,
    field_name: String,
}

impl From<HarvestWithFieldRow> for HarvestWithField {
    fn from(row: HarvestWithFieldRow) -> Self {
        let harvest = Harvest::from(row.harvest);
        let rate_pending = harvest.needs_rate();
        Self {
            harvest,
            field_name: row.field_name,
            rate_pending,
        }
    }
}

/// Input for recording a harvest
#[derive(Debug, Deserialize)]
pub struct RecordHarvestInput {
    pub date: NaiveDate,
    pub field_id: Uuid,
    pub crop_type: String,
    pub weight_kg: Decimal,
    pub rate: Option<Decimal>,
    /// Collector buying the leaf; None means a direct cash sale
    pub collector_id: Option<Uuid>,
}

/// Input for updating a harvest
#[derive(Debug, Deserialize)]
pub struct UpdateHarvestInput {
    pub date: Option<NaiveDate>,
    pub field_id: Option<Uuid>,
    pub crop_type: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub rate: Option<Option<Decimal>>,
    pub collector_id: Option<Option<Uuid>>,
}

/// One expense line inside a combined log session
#[derive(Debug, Deserialize)]
pub struct SessionExpenseInput {
    pub detail: ExpenseDetail,
    pub quantity: Option<Decimal>,
    pub rate: Decimal,
}

/// Input for a combined log session: a day's harvest for one field with
/// an optional collector advance and the expenses incurred alongside it
#[derive(Debug, Deserialize)]
pub struct RecordSessionInput {
    pub date: NaiveDate,
    pub field_id: Uuid,
    pub crop_type: String,
    pub weight_kg: Decimal,
    pub rate: Option<Decimal>,
    pub collector_id: Option<Uuid>,
    pub advance_amount: Option<Decimal>,
    #[serde(default)]
    pub expenses: Vec<SessionExpenseInput>,
}

/// What a combined log session wrote
#[derive(Debug, Serialize)]
pub struct SessionRecord {
    pub harvest: HarvestWithField,
    pub advance_id: Option<Uuid>,
    pub expense_count: usize,
}

fn validate_pricing(
    crop_type: &CropType,
    rate: Option<Decimal>,
    collector_id: Option<Uuid>,
) -> AppResult<()> {
    let is_tea = *crop_type == CropType::Tea;
    let priced = rate.map_or(false, |r| r > Decimal::ZERO);

    // Only tea goes to a collector
    if !is_tea && collector_id.is_some() {
        return Err(AppError::Validation {
            field: "collector_id".to_string(),
            message: "Only tea harvests can be assigned to a collector".to_string(),
            message_si: "එකතුකරන්නෙකුට පැවරිය හැක්කේ තේ අස්වනු පමණි".to_string(),
        });
    }

    // Cash sales and non-tea crops must be priced at entry
    if (!is_tea || collector_id.is_none()) && !priced {
        return Err(AppError::Validation {
            field: "rate".to_string(),
            message: "Rate is required for cash sales and non-tea crops".to_string(),
            message_si: "මුදල් විකුණුම් සහ තේ නොවන බෝග සඳහා මිල අවශ්‍ය වේ".to_string(),
        });
    }

    Ok(())
}

fn stored_total(weight_kg: Decimal, rate: Option<Decimal>) -> Decimal {
    match rate {
        Some(rate) => weight_kg * rate,
        None => Decimal::ZERO,
    }
}

impl HarvestService {
    /// Create a new HarvestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all harvests with field names, newest first
    pub async fn get_harvests(&self) -> AppResult<Vec<HarvestWithField>> {
        let rows = sqlx::query_as::<_, HarvestWithFieldRow>(
            r#"
            SELECT h.id, h.field_id, h.date, h.crop_type, h.weight_kg, h.rate,
                   h.collector_id, h.total_amount, h.created_at,
                   f.name AS field_name
            FROM harvests h
            JOIN fields f ON f.id = h.field_id
            ORDER BY h.date DESC, h.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(HarvestWithField::from).collect())
    }

    /// Get a harvest by ID
    pub async fn get_harvest(&self, harvest_id: Uuid) -> AppResult<HarvestWithField> {
        let row = sqlx::query_as::<_, HarvestWithFieldRow>(
            r#"
            SELECT h.id, h.field_id, h.date, h.crop_type, h.weight_kg, h.rate,
                   h.collector_id, h.total_amount, h.created_at,
                   f.name AS field_name
            FROM harvests h
            JOIN fields f ON f.id = h.field_id
            WHERE h.id = $1
            "#,
        )
        .bind(harvest_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Harvest".to_string()))?;

        Ok(HarvestWithField::from(row))
    }

    /// Record a new harvest
    pub async fn record_harvest(&self, input: RecordHarvestInput) -> AppResult<HarvestWithField> {
        validate_weight(input.weight_kg).map_err(|msg| AppError::Validation {
            field: "weight_kg".to_string(),
            message: msg.to_string(),
            message_si: format!("බර වලංගු නොවේ: {}", msg),
        })?;

        let crop_type = CropType::parse(&input.crop_type);
        validate_pricing(&crop_type, input.rate, input.collector_id)?;

        self.check_references(input.field_id, input.collector_id)
            .await?;

        let total_amount = stored_total(input.weight_kg, input.rate);

        let harvest_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO harvests (field_id, date, crop_type, weight_kg, rate, collector_id, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.field_id)
        .bind(input.date)
        .bind(crop_type.as_str())
        .bind(input.weight_kg)
        .bind(input.rate)
        .bind(input.collector_id)
        .bind(total_amount)
        .fetch_one(&self.db)
        .await?;

        self.get_harvest(harvest_id).await
    }

    /// Update a harvest, recomputing the stored total from the stored
    /// weight and rate
    pub async fn update_harvest(
        &self,
        harvest_id: Uuid,
        input: UpdateHarvestInput,
    ) -> AppResult<HarvestWithField> {
        let existing = self.get_harvest(harvest_id).await?.harvest;

        let date = input.date.unwrap_or(existing.date);
        let field_id = input.field_id.unwrap_or(existing.field_id);
        let crop_type = match input.crop_type {
            Some(s) => CropType::parse(&s),
            None => existing.crop_type,
        };
        let weight_kg = input.weight_kg.unwrap_or(existing.weight_kg);
        let rate = input.rate.unwrap_or(existing.rate);
        let collector_id = input.collector_id.unwrap_or(existing.collector_id);

        validate_weight(weight_kg).map_err(|msg| AppError::Validation {
            field: "weight_kg".to_string(),
            message: msg.to_string(),
            message_si: format!("බර වලංගු නොවේ: {}", msg),
        })?;
        validate_pricing(&crop_type, rate, collector_id)?;
        self.check_references(field_id, collector_id).await?;

        let total_amount = stored_total(weight_kg, rate);

        sqlx::query(
            r#"
            UPDATE harvests
            SET field_id = $1, date = $2, crop_type = $3, weight_kg = $4,
                rate = $5, collector_id = $6, total_amount = $7
            WHERE id = $8
            "#,
        )
        .bind(field_id)
        .bind(date)
        .bind(crop_type.as_str())
        .bind(weight_kg)
        .bind(rate)
        .bind(collector_id)
        .bind(total_amount)
        .bind(harvest_id)
        .execute(&self.db)
        .await?;

        self.get_harvest(harvest_id).await
    }

    /// Delete a harvest
    pub async fn delete_harvest(&self, harvest_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM harvests WHERE id = $1")
            .bind(harvest_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Harvest".to_string()));
        }

        Ok(())
    }

    /// Record a combined log session: the harvest, an optional advance to
    /// its collector, and the day's expenses, all in one transaction
    pub async fn record_session(&self, input: RecordSessionInput) -> AppResult<SessionRecord> {
        validate_weight(input.weight_kg).map_err(|msg| AppError::Validation {
            field: "weight_kg".to_string(),
            message: msg.to_string(),
            message_si: format!("බර වලංගු නොවේ: {}", msg),
        })?;

        let crop_type = CropType::parse(&input.crop_type);
        validate_pricing(&crop_type, input.rate, input.collector_id)?;

        let advance_amount = input.advance_amount.filter(|a| *a > Decimal::ZERO);
        if advance_amount.is_some() && input.collector_id.is_none() {
            return Err(AppError::Validation {
                field: "advance_amount".to_string(),
                message: "An advance needs a collector to pay it to".to_string(),
                message_si: "අත්තිකාරමක් ගෙවීමට එකතුකරන්නෙකු අවශ්‍ය වේ".to_string(),
            });
        }
        if let Some(amount) = advance_amount {
            validate_advance_amount(amount).map_err(|msg| AppError::Validation {
                field: "advance_amount".to_string(),
                message: msg.to_string(),
                message_si: format!("මුදල වලංගු නොවේ: {}", msg),
            })?;
        }
        for expense in &input.expenses {
            validate_expense_amounts(expense.quantity.unwrap_or(Decimal::ONE), expense.rate)?;
        }

        self.check_references(input.field_id, input.collector_id)
            .await?;

        let total_amount = stored_total(input.weight_kg, input.rate);

        // All three writes commit or none do
        let mut tx = self.db.begin().await?;

        let harvest_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO harvests (field_id, date, crop_type, weight_kg, rate, collector_id, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.field_id)
        .bind(input.date)
        .bind(crop_type.as_str())
        .bind(input.weight_kg)
        .bind(input.rate)
        .bind(input.collector_id)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        let advance_id = if let Some(amount) = advance_amount {
            let advance_id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO collector_advances (collector_id, date, amount, description)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(input.collector_id)
            .bind(input.date)
            .bind(amount)
            .bind(format!("Advance during {} harvest", crop_type))
            .fetch_one(&mut *tx)
            .await?;
            Some(advance_id)
        } else {
            None
        };

        for expense in &input.expenses {
            let quantity = expense.quantity.unwrap_or(Decimal::ONE);
            let (kind, category_id, description, hours_worked) = detail_columns(&expense.detail);
            sqlx::query(
                r#"
                INSERT INTO transactions
                    (date, field_id, type, category_id, description, quantity, hours_worked, rate, total_amount)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(input.date)
            .bind(input.field_id)
            .bind(kind)
            .bind(category_id)
            .bind(&description)
            .bind(quantity)
            .bind(hours_worked)
            .bind(expense.rate)
            .bind(quantity * expense.rate)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let harvest = self.get_harvest(harvest_id).await?;
        Ok(SessionRecord {
            harvest,
            advance_id,
            expense_count: input.expenses.len(),
        })
    }

    async fn check_references(
        &self,
        field_id: Uuid,
        collector_id: Option<Uuid>,
    ) -> AppResult<()> {
        let field_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields WHERE id = $1")
                .bind(field_id)
                .fetch_one(&self.db)
                .await?;
        if field_exists == 0 {
            return Err(AppError::NotFound("Field".to_string()));
        }

        if let Some(collector_id) = collector_id {
            let collector_exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tea_collectors WHERE id = $1")
                    .bind(collector_id)
                    .fetch_one(&self.db)
                    .await?;
            if collector_exists == 0 {
                return Err(AppError::NotFound("Collector".to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_tea_requires_rate() {
        let result = validate_pricing(&CropType::Pepper, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_cash_tea_sale_requires_rate() {
        let result = validate_pricing(&CropType::Tea, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_collector_tea_may_defer_rate() {
        let result = validate_pricing(&CropType::Tea, None, Some(Uuid::new_v4()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_collector_rejected_for_non_tea() {
        let result = validate_pricing(
            &CropType::Coffee,
            Some(Decimal::from(900)),
            Some(Uuid::new_v4()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stored_total() {
        assert_eq!(
            stored_total(Decimal::from(100), Some(Decimal::from(50))),
            Decimal::from(5000)
        );
        assert_eq!(stored_total(Decimal::from(100), None), Decimal::ZERO);
    }
}
