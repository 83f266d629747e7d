//! Master data HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::master::{MasterDataService, UpdateActivityInput};
use crate::AppState;

/// List labor activities
pub async fn list_activities(State(state): State<AppState>) -> impl IntoResponse {
    let service = MasterDataService::new(state.db.clone());

    match service.get_activities().await {
        Ok(activities) => (
            StatusCode::OK,
            Json(serde_json::json!({ "activities": activities })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an activity's name and default rate
pub async fn update_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
    Json(input): Json<UpdateActivityInput>,
) -> impl IntoResponse {
    let service = MasterDataService::new(state.db.clone());

    match service.update_activity(activity_id, input).await {
        Ok(activity) => (StatusCode::OK, Json(activity)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List inventory items
pub async fn list_inventory_items(State(state): State<AppState>) -> impl IntoResponse {
    let service = MasterDataService::new(state.db.clone());

    match service.get_inventory_items().await {
        Ok(items) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
