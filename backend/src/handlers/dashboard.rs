//! Dashboard HTTP handlers: profitability summary and rate advisories

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::{FieldFilter, LedgerService, LedgerSummary};
use crate::services::rates::PendingRateAdvisory;
use crate::AppState;
use shared::types::DateRange;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub field_id: Option<Uuid>,
}

/// Get the profitability summary. Without a period the whole history is
/// aggregated; a field_id narrows the per-field rows to one field.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<LedgerSummary>> {
    let service = LedgerService::new(state.db.clone());

    let start = query.start_date.and_then(|s| s.parse().ok());
    let end = query.end_date.and_then(|s| s.parse().ok());
    let period = match (start, end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)),
        _ => None,
    };

    let filter = match query.field_id {
        Some(field_id) => FieldFilter::One(field_id),
        None => FieldFilter::All,
    };

    let summary = service.summary(period, filter).await?;
    Ok(Json(summary))
}

/// Get advisories for last month's tea harvests still missing a
/// collector rate
pub async fn get_rate_advisories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PendingRateAdvisory>>> {
    let service = LedgerService::new(state.db.clone());
    let advisories = service.pending_rate_advisories().await?;
    Ok(Json(advisories))
}
