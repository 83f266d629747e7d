//! Report compilation and data export
//!
//! Compiles the period's records into a passive `ReportDocument`; turning
//! that into a PDF or other artifact is the rendering collaborator's job.
//! The backend never formats currency strings or fonts, it only serves
//! the document as JSON or streams sections of it as CSV.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::EstateConfig;
use crate::error::{AppError, AppResult};
use crate::services::ledger::{
    aggregate, fetch_advances, fetch_collectors, fetch_expenses, fetch_fields, fetch_harvests,
    fetch_rates, EstateTotals, FieldFilter, FieldSummary,
};
use crate::services::rates::{resolve_all, RateTable, ResolvedHarvest};
use shared::models::{
    Collector, CollectorAdvance, CropType, Expense, ExpenseDetail, ExpenseKind, Field,
};
use shared::types::{DateRange, Language};
use shared::validation::validate_date_range;

/// Report service assembling exportable report documents
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// A compiled financial report for one period
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub estate_name: String,
    pub currency: String,
    /// Language the rendering collaborator should produce
    pub language: Language,
    pub period: DateRange,
    pub summary: EstateTotals,
    pub field_rows: Vec<FieldSummary>,
    pub general_expense: Decimal,
    pub crop_rows: Vec<CropProduction>,
    pub expense_rows: Vec<ExpenseKindRow>,
    pub collector_rows: Vec<CollectorSummaryRow>,
    /// Combined transaction log, newest first
    pub entries: Vec<LogEntry>,
    /// Records excluded because of data issues
    pub skipped_records: u32,
    pub warnings: Vec<String>,
}

/// Production and revenue for one crop
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CropProduction {
    pub crop_type: String,
    pub total_weight_kg: Decimal,
    pub total_revenue: Decimal,
}

/// Period spend for one expense kind. All four kinds are always present;
/// hiding zero rows is the renderer's choice.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExpenseKindRow {
    pub kind: ExpenseKind,
    pub label: &'static str,
    pub amount: Decimal,
}

/// Weight, revenue, advances, and running balance for one collector.
/// The balance is derived here and never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectorSummaryRow {
    pub collector_id: uuid::Uuid,
    pub collector_name: String,
    pub total_weight_kg: Decimal,
    pub total_revenue: Decimal,
    pub total_advances: Decimal,
    pub balance: Decimal,
}

/// One line of the combined transaction log
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub kind: LogEntryKind,
    pub field_name: Option<String>,
    pub details: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LogEntryKind {
    Income,
    Expense,
    Advance,
}

/// Compile a report from period-filtered, rate-resolved records.
///
/// The combined log is sorted by date descending with a stable sort;
/// entries on the same date keep source order: harvests, then expenses,
/// then advances.
pub fn compile(
    estate: &EstateConfig,
    language: Language,
    period: DateRange,
    fields: &[Field],
    harvests: &[ResolvedHarvest],
    expenses: &[Expense],
    collectors: &[Collector],
    advances: &[CollectorAdvance],
    warnings: Vec<String>,
) -> ReportDocument {
    let ledger = aggregate(fields, harvests, expenses, FieldFilter::All);

    // Crop production, grouped in first-seen order
    let mut crop_rows: Vec<CropProduction> = Vec::new();
    for resolved in harvests {
        let harvest = &resolved.harvest;
        let name = harvest.crop_type.as_str();
        match crop_rows.iter_mut().find(|c| c.crop_type == name) {
            Some(row) => {
                row.total_weight_kg += harvest.weight_kg;
                row.total_revenue += harvest.total_amount;
            }
            None => crop_rows.push(CropProduction {
                crop_type: name.to_string(),
                total_weight_kg: harvest.weight_kg,
                total_revenue: harvest.total_amount,
            }),
        }
    }

    // Expense spend per kind
    let expense_rows: Vec<ExpenseKindRow> = ExpenseKind::ALL
        .into_iter()
        .map(|kind| ExpenseKindRow {
            kind,
            label: kind.label(),
            amount: expenses
                .iter()
                .filter(|e| e.kind() == kind)
                .map(|e| e.total_amount)
                .sum(),
        })
        .collect();

    // Collector summaries, keeping only collectors active in the period
    let collector_rows: Vec<CollectorSummaryRow> = collectors
        .iter()
        .map(|collector| {
            let total_weight_kg: Decimal = harvests
                .iter()
                .filter(|r| r.harvest.collector_id == Some(collector.id))
                .map(|r| r.harvest.weight_kg)
                .sum();
            let total_revenue: Decimal = harvests
                .iter()
                .filter(|r| r.harvest.collector_id == Some(collector.id))
                .map(|r| r.harvest.total_amount)
                .sum();
            let total_advances: Decimal = advances
                .iter()
                .filter(|a| a.collector_id == collector.id)
                .map(|a| a.amount)
                .sum();
            CollectorSummaryRow {
                collector_id: collector.id,
                collector_name: collector.name.clone(),
                total_weight_kg,
                total_revenue,
                total_advances,
                balance: total_revenue - total_advances,
            }
        })
        .filter(|row| row.total_weight_kg > Decimal::ZERO || row.total_advances > Decimal::ZERO)
        .collect();

    let field_name = |id: uuid::Uuid| fields.iter().find(|f| f.id == id).map(|f| f.name.clone());
    let collector_name = |id: uuid::Uuid| {
        collectors
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    };

    let mut entries: Vec<LogEntry> = Vec::with_capacity(
        harvests.len() + expenses.len() + advances.len(),
    );
    for resolved in harvests {
        let harvest = &resolved.harvest;
        let details = match (harvest.crop_type == CropType::Tea, harvest.collector_id) {
            (true, Some(collector_id)) => {
                format!("tea ({})", collector_name(collector_id))
            }
            _ => harvest.crop_type.as_str().to_string(),
        };
        entries.push(LogEntry {
            date: harvest.date,
            kind: LogEntryKind::Income,
            field_name: field_name(harvest.field_id),
            details,
            amount: harvest.total_amount,
        });
    }
    for expense in expenses {
        let details = match &expense.detail {
            ExpenseDetail::Overhead {
                description: Some(description),
            } => description.clone(),
            other => other.kind().label().to_string(),
        };
        entries.push(LogEntry {
            date: expense.date,
            kind: LogEntryKind::Expense,
            field_name: expense.field_id.and_then(field_name),
            details,
            amount: expense.total_amount,
        });
    }
    for advance in advances {
        entries.push(LogEntry {
            date: advance.date,
            kind: LogEntryKind::Advance,
            field_name: None,
            details: format!("Advance: {}", collector_name(advance.collector_id)),
            amount: advance.amount,
        });
    }
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let mut all_warnings = warnings;
    all_warnings.extend(ledger.warnings.iter().cloned());

    ReportDocument {
        estate_name: estate.name.clone(),
        currency: estate.currency.clone(),
        language,
        period,
        summary: ledger.summary,
        field_rows: ledger.fields,
        general_expense: ledger.general_expense,
        crop_rows,
        expense_rows,
        collector_rows,
        entries,
        skipped_records: ledger.skipped_records,
        warnings: all_warnings,
    }
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compile the financial report for a period. All snapshot fetches run
    /// concurrently; any failure aborts the compilation, so a partial
    /// report is never returned.
    pub async fn compile_report(
        &self,
        estate: &EstateConfig,
        language: Language,
        period: DateRange,
    ) -> AppResult<ReportDocument> {
        validate_date_range(&period)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        let (fields, harvests, (expenses, expense_warnings), rates, advances, collectors) =
            tokio::try_join!(
                fetch_fields(&self.db),
                fetch_harvests(&self.db, Some(period)),
                fetch_expenses(&self.db, Some(period)),
                fetch_rates(&self.db),
                fetch_advances(&self.db, Some(period)),
                fetch_collectors(&self.db),
            )?;

        let table = RateTable::from_rows(&rates);
        let resolved = resolve_all(harvests, &table);

        let mut warnings = expense_warnings;
        let skipped_for_type = warnings.len() as u32;
        warnings.extend(table.duplicate_warnings().iter().cloned());

        let mut document = compile(
            estate, language, period, &fields, &resolved, &expenses, &collectors, &advances,
            warnings,
        );
        document.skipped_records += skipped_for_type;
        Ok(document)
    }

    /// Export report rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::Harvest;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn estate() -> EstateConfig {
        EstateConfig {
            name: "Galaha Estate".to_string(),
            currency: "LKR".to_string(),
        }
    }

    fn period() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    fn field(name: &str) -> Field {
        Field {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn collector(name: &str) -> Collector {
        Collector {
            id: Uuid::new_v4(),
            name: name.to_string(),
            contact: None,
            created_at: Utc::now(),
        }
    }

    fn resolved(
        field_id: Uuid,
        date: NaiveDate,
        crop_type: CropType,
        weight: Decimal,
        total: Decimal,
        collector_id: Option<Uuid>,
    ) -> ResolvedHarvest {
        ResolvedHarvest {
            harvest: Harvest {
                id: Uuid::new_v4(),
                field_id,
                date,
                crop_type,
                weight_kg: weight,
                rate: None,
                collector_id,
                total_amount: total,
                created_at: Utc::now(),
            },
            rate_pending: false,
        }
    }

    fn overhead(
        field_id: Option<Uuid>,
        date: NaiveDate,
        quantity: Decimal,
        rate: Decimal,
        description: Option<&str>,
    ) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            date,
            field_id,
            detail: ExpenseDetail::Overhead {
                description: description.map(str::to_string),
            },
            quantity,
            rate,
            total_amount: quantity * rate,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_crop_rows_group_weight_and_revenue() {
        let f = field("A");
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let harvests = vec![
            resolved(f.id, date, CropType::Tea, dec("60"), dec("3000"), None),
            resolved(f.id, date, CropType::Pepper, dec("10"), dec("12000"), None),
            resolved(f.id, date, CropType::Tea, dec("40"), dec("2000"), None),
        ];

        let doc = compile(
            &estate(),
            Language::English,
            period(),
            &[f],
            &harvests,
            &[],
            &[],
            &[],
            Vec::new(),
        );
        assert_eq!(doc.crop_rows.len(), 2);
        let tea = &doc.crop_rows[0];
        assert_eq!(tea.crop_type, "tea");
        assert_eq!(tea.total_weight_kg, dec("100"));
        assert_eq!(tea.total_revenue, dec("5000"));
    }

    #[test]
    fn test_expense_rows_cover_all_four_kinds() {
        let f = field("A");
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        // quantity 3 at rate 150 totals 450 regardless of crop logic
        let expenses = vec![overhead(Some(f.id), date, dec("3"), dec("150"), None)];

        let doc = compile(
            &estate(),
            Language::English,
            period(),
            &[f],
            &[],
            &expenses,
            &[],
            &[],
            Vec::new(),
        );
        assert_eq!(doc.expense_rows.len(), 4);
        let by_kind = |kind: ExpenseKind| {
            doc.expense_rows
                .iter()
                .find(|r| r.kind == kind)
                .unwrap()
                .amount
        };
        assert_eq!(by_kind(ExpenseKind::Overhead), dec("450"));
        assert_eq!(by_kind(ExpenseKind::LaborCost), Decimal::ZERO);
        assert_eq!(by_kind(ExpenseKind::GoodsCost), Decimal::ZERO);
        assert_eq!(by_kind(ExpenseKind::OwnerLabor), Decimal::ZERO);
    }

    #[test]
    fn test_collector_balance_is_revenue_minus_advances() {
        let f = field("A");
        let c = collector("Sumanasena");
        let idle = collector("Idle");
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let harvests = vec![resolved(
            f.id,
            date,
            CropType::Tea,
            dec("100"),
            dec("5000"),
            Some(c.id),
        )];
        let advances = vec![CollectorAdvance {
            id: Uuid::new_v4(),
            collector_id: c.id,
            date,
            amount: dec("1500"),
            description: None,
            created_at: Utc::now(),
        }];

        let doc = compile(
            &estate(),
            Language::English,
            period(),
            &[f],
            &harvests,
            &[],
            &[c.clone(), idle],
            &advances,
            Vec::new(),
        );
        // Collectors without weight or advances stay off the report
        assert_eq!(doc.collector_rows.len(), 1);
        let row = &doc.collector_rows[0];
        assert_eq!(row.collector_name, "Sumanasena");
        assert_eq!(row.total_revenue, dec("5000"));
        assert_eq!(row.total_advances, dec("1500"));
        assert_eq!(row.balance, dec("3500"));
    }

    #[test]
    fn test_combined_log_sorted_descending_with_stable_ties() {
        let f = field("A");
        let c = collector("Piyadasa");
        let early = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

        let harvests = vec![resolved(
            f.id,
            early,
            CropType::Tea,
            dec("50"),
            dec("2500"),
            Some(c.id),
        )];
        let expenses = vec![overhead(
            Some(f.id),
            early,
            Decimal::ONE,
            dec("800"),
            Some("Transport"),
        )];
        let advances = vec![CollectorAdvance {
            id: Uuid::new_v4(),
            collector_id: c.id,
            date: late,
            amount: dec("1000"),
            description: None,
            created_at: Utc::now(),
        }];

        let doc = compile(
            &estate(),
            Language::English,
            period(),
            &[f],
            &harvests,
            &expenses,
            &[c],
            &advances,
            Vec::new(),
        );
        assert_eq!(doc.entries.len(), 3);
        // Newest first
        assert_eq!(doc.entries[0].kind, LogEntryKind::Advance);
        assert_eq!(doc.entries[0].date, late);
        // Same-date entries keep source order: harvest before expense
        assert_eq!(doc.entries[1].kind, LogEntryKind::Income);
        assert_eq!(doc.entries[1].details, "tea (Piyadasa)");
        assert_eq!(doc.entries[2].kind, LogEntryKind::Expense);
        assert_eq!(doc.entries[2].details, "Transport");
    }

    #[test]
    fn test_report_carries_estate_identity_and_skip_count() {
        let f = field("A");
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        // Expense against a field that does not exist
        let expenses = vec![overhead(Some(Uuid::new_v4()), date, Decimal::ONE, dec("100"), None)];

        let doc = compile(
            &estate(),
            Language::English,
            period(),
            &[f],
            &[],
            &expenses,
            &[],
            &[],
            Vec::new(),
        );
        assert_eq!(doc.estate_name, "Galaha Estate");
        assert_eq!(doc.currency, "LKR");
        assert_eq!(doc.skipped_records, 1);
        assert!(!doc.warnings.is_empty());
    }
}
