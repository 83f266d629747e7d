//! Report HTTP handlers for compilation and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::report::ReportService;
use crate::AppState;
use shared::types::{DateRange, Language};

#[derive(Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>, // "json" or "csv"
    pub language: Option<Language>,
}

fn parse_period(query: &ReportQuery) -> AppResult<DateRange> {
    let start = query
        .start_date
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            AppError::ValidationError("start_date is required (YYYY-MM-DD)".to_string())
        })?;
    let end = query
        .end_date
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            AppError::ValidationError("end_date is required (YYYY-MM-DD)".to_string())
        })?;
    Ok(DateRange::new(start, end))
}

/// Compile the financial report for a period. `format=csv` streams the
/// combined transaction log; the default returns the full document as
/// JSON for the rendering collaborator.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db.clone());
    let period = parse_period(&query)?;
    let language = query.language.unwrap_or_default();

    let document = service
        .compile_report(&state.config.estate, language, period)
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportService::export_to_csv(&document.entries)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"transaction_log.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(document).into_response())
    }
}
