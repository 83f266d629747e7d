//! Tea collector HTTP handlers: collectors, rates, and advances

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::collector::{
    CollectorService, CreateCollectorInput, RecordAdvanceInput, SetRateInput,
};
use crate::AppState;

/// List all collectors
pub async fn list_collectors(State(state): State<AppState>) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.get_collectors().await {
        Ok(collectors) => (
            StatusCode::OK,
            Json(serde_json::json!({ "collectors": collectors })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Register a new collector
pub async fn create_collector(
    State(state): State<AppState>,
    Json(input): Json<CreateCollectorInput>,
) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.create_collector(input).await {
        Ok(collector) => (StatusCode::CREATED, Json(collector)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a collector
pub async fn delete_collector(
    State(state): State<AppState>,
    Path(collector_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.delete_collector(collector_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all monthly rates
pub async fn list_rates(State(state): State<AppState>) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.get_rates().await {
        Ok(rates) => {
            (StatusCode::OK, Json(serde_json::json!({ "rates": rates }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Set a collector's monthly rate (upsert)
pub async fn set_rate(
    State(state): State<AppState>,
    Json(input): Json<SetRateInput>,
) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.set_rate(input).await {
        Ok(rate) => (StatusCode::OK, Json(rate)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a monthly rate
pub async fn delete_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.delete_rate(rate_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all advances
pub async fn list_advances(State(state): State<AppState>) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.get_advances().await {
        Ok(advances) => (
            StatusCode::OK,
            Json(serde_json::json!({ "advances": advances })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a cash advance
pub async fn record_advance(
    State(state): State<AppState>,
    Json(input): Json<RecordAdvanceInput>,
) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.record_advance(input).await {
        Ok(advance) => (StatusCode::CREATED, Json(advance)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an advance
pub async fn delete_advance(
    State(state): State<AppState>,
    Path(advance_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CollectorService::new(state.db.clone());

    match service.delete_advance(advance_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
