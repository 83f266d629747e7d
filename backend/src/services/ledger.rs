//! Ledger aggregation: per-field and estate-wide profitability
//!
//! Each request fetches its own snapshot of the record store (all fetches
//! issued concurrently and joined before computing), resolves pending tea
//! rates, then aggregates in memory. A failed fetch aborts the whole
//! operation naming the collection that failed; no partial numbers are
//! ever returned. Records referencing unknown fields are excluded and
//! surfaced as warnings instead of failing the computation.

use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::collector::{CollectorAdvanceRow, CollectorRateRow, CollectorRow};
use crate::services::expense::ExpenseRow;
use crate::services::field::FieldRow;
use crate::services::harvest::HarvestRow;
use crate::services::rates::{
    pending_rate_advisories, resolve_all, PendingRateAdvisory, RateTable, ResolvedHarvest,
};
use shared::models::{Collector, CollectorAdvance, CollectorRate, Expense, Field, Harvest};
use shared::types::DateRange;
use shared::validation::validate_date_range;

/// Ledger service computing profitability summaries
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Field scope for an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFilter {
    All,
    One(Uuid),
}

/// Income, expense, and profit for one field
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldSummary {
    pub field_id: Uuid,
    pub field_name: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_profit: Decimal,
}

/// Estate-wide totals. `total_expense` includes the general bucket.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EstateTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_profit: Decimal,
}

/// The aggregated ledger for a period and field scope
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub fields: Vec<FieldSummary>,
    /// Expenses not attributable to any field (field_id absent)
    pub general_expense: Decimal,
    pub summary: EstateTotals,
    /// Non-fatal data issues found while aggregating
    pub warnings: Vec<String>,
    /// Records excluded because of data issues
    pub skipped_records: u32,
}

/// Aggregate resolved harvests and expenses into per-field and estate
/// totals.
///
/// Inputs must already be period-filtered and rate-resolved. Harvests or
/// expenses referencing a field that does not exist are excluded and
/// reported in `warnings`; expenses with no field land in the general
/// bucket, which is always part of the estate totals regardless of the
/// field scope.
pub fn aggregate(
    fields: &[Field],
    harvests: &[ResolvedHarvest],
    expenses: &[Expense],
    filter: FieldFilter,
) -> LedgerSummary {
    let known_fields: std::collections::HashSet<Uuid> = fields.iter().map(|f| f.id).collect();
    let mut warnings = Vec::new();
    let mut skipped_records = 0u32;

    let in_scope: Vec<&Field> = fields
        .iter()
        .filter(|f| match filter {
            FieldFilter::All => true,
            FieldFilter::One(id) => f.id == id,
        })
        .collect();

    let mut rows: Vec<FieldSummary> = in_scope
        .iter()
        .map(|f| FieldSummary {
            field_id: f.id,
            field_name: f.name.clone(),
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net_profit: Decimal::ZERO,
        })
        .collect();

    for resolved in harvests {
        let harvest = &resolved.harvest;
        if !known_fields.contains(&harvest.field_id) {
            warnings.push(format!(
                "Harvest {} references unknown field {}",
                harvest.id, harvest.field_id
            ));
            skipped_records += 1;
            continue;
        }
        if let Some(row) = rows.iter_mut().find(|r| r.field_id == harvest.field_id) {
            row.total_income += harvest.total_amount;
        }
    }

    let mut general_expense = Decimal::ZERO;
    for expense in expenses {
        match expense.field_id {
            None => general_expense += expense.total_amount,
            Some(field_id) => {
                if !known_fields.contains(&field_id) {
                    warnings.push(format!(
                        "Expense {} references unknown field {}",
                        expense.id, field_id
                    ));
                    skipped_records += 1;
                    continue;
                }
                if let Some(row) = rows.iter_mut().find(|r| r.field_id == field_id) {
                    row.total_expense += expense.total_amount;
                }
            }
        }
    }

    for row in &mut rows {
        row.net_profit = row.total_income - row.total_expense;
    }

    let total_income: Decimal = rows.iter().map(|r| r.total_income).sum();
    let total_expense: Decimal =
        rows.iter().map(|r| r.total_expense).sum::<Decimal>() + general_expense;

    LedgerSummary {
        fields: rows,
        general_expense,
        summary: EstateTotals {
            total_income,
            total_expense,
            total_profit: total_income - total_expense,
        },
        warnings,
        skipped_records,
    }
}

// ----------------------------------------------------------------------------
// Snapshot fetches
//
// Shared by the ledger and report services. Failures are mapped to
// UpstreamFetch naming the collection, so callers can abort atomically.
// ----------------------------------------------------------------------------

fn period_bounds(period: Option<DateRange>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match period {
        Some(range) => (Some(range.start), Some(range.end)),
        None => (None, None),
    }
}

pub(crate) async fn fetch_fields(db: &PgPool) -> AppResult<Vec<Field>> {
    let rows = sqlx::query_as::<_, FieldRow>("SELECT id, name, created_at FROM fields ORDER BY name")
        .fetch_all(db)
        .await
        .map_err(|source| AppError::UpstreamFetch {
            collection: "fields",
            source,
        })?;
    Ok(rows.into_iter().map(Field::from).collect())
}

pub(crate) async fn fetch_harvests(
    db: &PgPool,
    period: Option<DateRange>,
) -> AppResult<Vec<Harvest>> {
    let (start, end) = period_bounds(period);
    let rows = sqlx::query_as::<_, HarvestRow>(
        r#"
        SELECT id, field_id, date, crop_type, weight_kg, rate, collector_id, total_amount, created_at
        FROM harvests
        WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .map_err(|source| AppError::UpstreamFetch {
        collection: "harvests",
        source,
    })?;
    Ok(rows.into_iter().map(Harvest::from).collect())
}

/// Fetch expenses for the period. Rows with an unknown type are excluded
/// and returned as warnings rather than failing the snapshot.
pub(crate) async fn fetch_expenses(
    db: &PgPool,
    period: Option<DateRange>,
) -> AppResult<(Vec<Expense>, Vec<String>)> {
    let (start, end) = period_bounds(period);
    let rows = sqlx::query_as::<_, ExpenseRow>(
        r#"
        SELECT id, date, field_id, type, category_id, description,
               quantity, hours_worked, rate, total_amount, created_at
        FROM transactions
        WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .map_err(|source| AppError::UpstreamFetch {
        collection: "transactions",
        source,
    })?;

    let mut expenses = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();
    for row in rows {
        match Expense::try_from(row) {
            Ok(expense) => expenses.push(expense),
            Err(e) => warnings.push(e.to_string()),
        }
    }
    Ok((expenses, warnings))
}

pub(crate) async fn fetch_rates(db: &PgPool) -> AppResult<Vec<CollectorRate>> {
    let rows = sqlx::query_as::<_, CollectorRateRow>(
        "SELECT id, collector_id, month, year, rate, created_at FROM collector_rates",
    )
    .fetch_all(db)
    .await
    .map_err(|source| AppError::UpstreamFetch {
        collection: "collector_rates",
        source,
    })?;
    Ok(rows.into_iter().map(CollectorRate::from).collect())
}

pub(crate) async fn fetch_advances(
    db: &PgPool,
    period: Option<DateRange>,
) -> AppResult<Vec<CollectorAdvance>> {
    let (start, end) = period_bounds(period);
    let rows = sqlx::query_as::<_, CollectorAdvanceRow>(
        r#"
        SELECT id, collector_id, date, amount, description, created_at
        FROM collector_advances
        WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .map_err(|source| AppError::UpstreamFetch {
        collection: "collector_advances",
        source,
    })?;
    Ok(rows.into_iter().map(CollectorAdvance::from).collect())
}

pub(crate) async fn fetch_collectors(db: &PgPool) -> AppResult<Vec<Collector>> {
    let rows = sqlx::query_as::<_, CollectorRow>(
        "SELECT id, name, contact, created_at FROM tea_collectors ORDER BY name",
    )
    .fetch_all(db)
    .await
    .map_err(|source| AppError::UpstreamFetch {
        collection: "tea_collectors",
        source,
    })?;
    Ok(rows.into_iter().map(Collector::from).collect())
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the ledger summary for an optional period and field scope.
    /// Without a period the whole history is aggregated, as on the
    /// dashboard.
    pub async fn summary(
        &self,
        period: Option<DateRange>,
        filter: FieldFilter,
    ) -> AppResult<LedgerSummary> {
        if let Some(range) = period {
            validate_date_range(&range)
                .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        }

        let (fields, harvests, (expenses, expense_warnings), rates) = tokio::try_join!(
            fetch_fields(&self.db),
            fetch_harvests(&self.db, period),
            fetch_expenses(&self.db, period),
            fetch_rates(&self.db),
        )?;

        let table = RateTable::from_rows(&rates);
        let resolved = resolve_all(harvests, &table);

        let mut summary = aggregate(&fields, &resolved, &expenses, filter);
        summary.skipped_records += expense_warnings.len() as u32;
        summary.warnings.extend(expense_warnings);
        summary
            .warnings
            .extend(table.duplicate_warnings().iter().cloned());

        Ok(summary)
    }

    /// Advisories for last month's tea harvests still waiting on a
    /// collector rate
    pub async fn pending_rate_advisories(&self) -> AppResult<Vec<PendingRateAdvisory>> {
        let today = Utc::now().date_naive();
        let prior = today - Months::new(1);
        let start = NaiveDate::from_ymd_opt(prior.year(), prior.month(), 1)
            .ok_or_else(|| AppError::Internal("Invalid advisory period".to_string()))?;
        let end = start + Months::new(1) - Days::new(1);

        let (harvests, rates) = tokio::try_join!(
            fetch_harvests(&self.db, Some(DateRange::new(start, end))),
            fetch_rates(&self.db),
        )?;

        let table = RateTable::from_rows(&rates);
        Ok(pending_rate_advisories(&harvests, &table, today))
    }
}
