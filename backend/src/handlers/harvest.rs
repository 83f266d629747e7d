//! Harvest management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::harvest::{
    HarvestService, RecordHarvestInput, RecordSessionInput, UpdateHarvestInput,
};
use crate::AppState;

/// List all harvests
pub async fn list_harvests(State(state): State<AppState>) -> impl IntoResponse {
    let service = HarvestService::new(state.db.clone());

    match service.get_harvests().await {
        Ok(harvests) => (
            StatusCode::OK,
            Json(serde_json::json!({ "harvests": harvests })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific harvest
pub async fn get_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = HarvestService::new(state.db.clone());

    match service.get_harvest(harvest_id).await {
        Ok(harvest) => (StatusCode::OK, Json(harvest)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a new harvest
pub async fn record_harvest(
    State(state): State<AppState>,
    Json(input): Json<RecordHarvestInput>,
) -> impl IntoResponse {
    let service = HarvestService::new(state.db.clone());

    match service.record_harvest(input).await {
        Ok(harvest) => (StatusCode::CREATED, Json(harvest)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a combined log session (harvest + advance + expenses)
pub async fn record_session(
    State(state): State<AppState>,
    Json(input): Json<RecordSessionInput>,
) -> impl IntoResponse {
    let service = HarvestService::new(state.db.clone());

    match service.record_session(input).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a harvest
pub async fn update_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
    Json(input): Json<UpdateHarvestInput>,
) -> impl IntoResponse {
    let service = HarvestService::new(state.db.clone());

    match service.update_harvest(harvest_id, input).await {
        Ok(harvest) => (StatusCode::OK, Json(harvest)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a harvest
pub async fn delete_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = HarvestService::new(state.db.clone());

    match service.delete_harvest(harvest_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
