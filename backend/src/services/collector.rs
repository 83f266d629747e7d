//! Tea collector management: collectors, monthly rates, and advances

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Collector, CollectorAdvance, CollectorRate};
use shared::validation::{
    validate_advance_amount, validate_month, validate_name, validate_rate,
    validate_sri_lanka_phone,
};

/// Collector service for managing tea collectors, their monthly rates,
/// and cash advances
#[derive(Clone)]
pub struct CollectorService {
    db: PgPool,
}

/// Database row for a collector
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CollectorRow {
    pub id: Uuid,
    pub name: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CollectorRow> for Collector {
    fn from(row: CollectorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact: row.contact,
            created_at: row.created_at,
        }
    }
}

/// Database row for a monthly rate
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CollectorRateRow {
    pub id: Uuid,
    pub collector_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<CollectorRateRow> for CollectorRate {
    fn from(row: CollectorRateRow) -> Self {
        Self {
            id: row.id,
            collector_id: row.collector_id,
            month: row.month as u32,
            year: row.year,
            rate: row.rate,
            created_at: row.created_at,
        }
    }
}

/// Database row for an advance
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CollectorAdvanceRow {
    pub id: Uuid,
    pub collector_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CollectorAdvanceRow> for CollectorAdvance {
    fn from(row: CollectorAdvanceRow) -> Self {
        Self {
            id: row.id,
            collector_id: row.collector_id,
            date: row.date,
            amount: row.amount,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// A monthly rate with its collector's name, for listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RateWithCollector {
    pub id: Uuid,
    pub collector_id: Uuid,
    pub collector_name: String,
    pub month: i32,
    pub year: i32,
    pub rate: Decimal,
}

/// An advance with its collector's name, for listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdvanceWithCollector {
    pub id: Uuid,
    pub collector_id: Uuid,
    pub collector_name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Input for registering a collector
#[derive(Debug, Deserialize)]
pub struct CreateCollectorInput {
    pub name: String,
    pub contact: Option<String>,
}

/// Input for setting a monthly rate. Replaces any existing rate for the
/// same collector and month.
#[derive(Debug, Deserialize)]
pub struct SetRateInput {
    pub collector_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub rate: Decimal,
}

/// Input for recording a cash advance
#[derive(Debug, Deserialize)]
pub struct RecordAdvanceInput {
    pub collector_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl CollectorService {
    /// Create a new CollectorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all collectors, ordered by name
    pub async fn get_collectors(&self) -> AppResult<Vec<Collector>> {
        let rows = sqlx::query_as::<_, CollectorRow>(
            "SELECT id, name, contact, created_at FROM tea_collectors ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Collector::from).collect())
    }

    /// Register a new collector
    pub async fn create_collector(&self, input: CreateCollectorInput) -> AppResult<Collector> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_si: format!("නම වලංගු නොවේ: {}", msg),
        })?;

        if let Some(contact) = input.contact.as_deref().filter(|c| !c.trim().is_empty()) {
            validate_sri_lanka_phone(contact).map_err(|msg| AppError::Validation {
                field: "contact".to_string(),
                message: msg.to_string(),
                message_si: "දුරකථන අංකය වලංගු නොවේ".to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, CollectorRow>(
            r#"
            INSERT INTO tea_collectors (name, contact)
            VALUES ($1, $2)
            RETURNING id, name, contact, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.contact)
        .fetch_one(&self.db)
        .await?;

        Ok(Collector::from(row))
    }

    /// Delete a collector. Refused while harvests still reference it;
    /// the collector's rates and advances are removed with it.
    pub async fn delete_collector(&self, collector_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tea_collectors WHERE id = $1")
                .bind(collector_id)
                .fetch_one(&self.db)
                .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Collector".to_string()));
        }

        let referenced = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM harvests WHERE collector_id = $1",
        )
        .bind(collector_id)
        .fetch_one(&self.db)
        .await?;

        if referenced > 0 {
            return Err(AppError::Conflict {
                resource: "collector".to_string(),
                message: format!(
                    "Cannot delete collector: {} harvests are linked to it",
                    referenced
                ),
                message_si: format!(
                    "එකතුකරන්නා මැකීමට නොහැක: අස්වනු වාර්තා {} ක් ඊට සම්බන්ධ වී ඇත",
                    referenced
                ),
            });
        }

        sqlx::query("DELETE FROM tea_collectors WHERE id = $1")
            .bind(collector_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Get all monthly rates with collector names, newest month first
    pub async fn get_rates(&self) -> AppResult<Vec<RateWithCollector>> {
        let rates = sqlx::query_as::<_, RateWithCollector>(
            r#"
            SELECT r.id, r.collector_id, c.name AS collector_name, r.month, r.year, r.rate
            FROM collector_rates r
            JOIN tea_collectors c ON c.id = r.collector_id
            ORDER BY r.year DESC, r.month DESC, c.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rates)
    }

    /// Set the monthly rate for a collector. Upserts on
    /// (collector_id, month, year): a new rate for an existing month
    /// replaces the old one. Harvest rows are never touched here; pending
    /// tea harvests pick the new rate up at read time.
    pub async fn set_rate(&self, input: SetRateInput) -> AppResult<CollectorRate> {
        validate_month(input.month).map_err(|msg| AppError::Validation {
            field: "month".to_string(),
            message: msg.to_string(),
            message_si: "මාසය 1 සිට 12 අතර විය යුතුය".to_string(),
        })?;
        validate_rate(input.rate).map_err(|msg| AppError::Validation {
            field: "rate".to_string(),
            message: msg.to_string(),
            message_si: format!("මිල වලංගු නොවේ: {}", msg),
        })?;

        let collector_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tea_collectors WHERE id = $1")
                .bind(input.collector_id)
                .fetch_one(&self.db)
                .await?;

        if collector_exists == 0 {
            return Err(AppError::NotFound("Collector".to_string()));
        }

        let row = sqlx::query_as::<_, CollectorRateRow>(
            r#"
            INSERT INTO collector_rates (collector_id, month, year, rate)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collector_id, month, year)
            DO UPDATE SET rate = EXCLUDED.rate
            RETURNING id, collector_id, month, year, rate, created_at
            "#,
        )
        .bind(input.collector_id)
        .bind(input.month as i32)
        .bind(input.year)
        .bind(input.rate)
        .fetch_one(&self.db)
        .await?;

        Ok(CollectorRate::from(row))
    }

    /// Delete a monthly rate
    pub async fn delete_rate(&self, rate_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM collector_rates WHERE id = $1")
            .bind(rate_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Rate".to_string()));
        }

        Ok(())
    }

    /// Get all advances with collector names, newest first
    pub async fn get_advances(&self) -> AppResult<Vec<AdvanceWithCollector>> {
        let advances = sqlx::query_as::<_, AdvanceWithCollector>(
            r#"
            SELECT a.id, a.collector_id, c.name AS collector_name, a.date, a.amount, a.description
            FROM collector_advances a
            JOIN tea_collectors c ON c.id = a.collector_id
            ORDER BY a.date DESC, a.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(advances)
    }

    /// Record a cash advance against a collector's future proceeds
    pub async fn record_advance(&self, input: RecordAdvanceInput) -> AppResult<CollectorAdvance> {
        validate_advance_amount(input.amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
            message_si: format!("මුදල වලංගු නොවේ: {}", msg),
        })?;

        let collector_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tea_collectors WHERE id = $1")
                .bind(input.collector_id)
                .fetch_one(&self.db)
                .await?;

        if collector_exists == 0 {
            return Err(AppError::NotFound("Collector".to_string()));
        }

        let row = sqlx::query_as::<_, CollectorAdvanceRow>(
            r#"
            INSERT INTO collector_advances (collector_id, date, amount, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, collector_id, date, amount, description, created_at
            "#,
        )
        .bind(input.collector_id)
        .bind(input.date)
        .bind(input.amount)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(CollectorAdvance::from(row))
    }

    /// Delete an advance
    pub async fn delete_advance(&self, advance_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM collector_advances WHERE id = $1")
            .bind(advance_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Advance".to_string()));
        }

        Ok(())
    }
}
