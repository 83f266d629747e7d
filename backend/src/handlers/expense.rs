//! Expense transaction HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::expense::{ExpenseService, RecordExpenseInput, UpdateExpenseInput};
use crate::AppState;

/// List all expenses
pub async fn list_expenses(State(state): State<AppState>) -> impl IntoResponse {
    let service = ExpenseService::new(state.db.clone());

    match service.get_expenses().await {
        Ok(expenses) => (
            StatusCode::OK,
            Json(serde_json::json!({ "transactions": expenses })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific expense
pub async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ExpenseService::new(state.db.clone());

    match service.get_expense(expense_id).await {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a new expense
pub async fn record_expense(
    State(state): State<AppState>,
    Json(input): Json<RecordExpenseInput>,
) -> impl IntoResponse {
    let service = ExpenseService::new(state.db.clone());

    match service.record_expense(input).await {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an expense
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
    Json(input): Json<UpdateExpenseInput>,
) -> impl IntoResponse {
    let service = ExpenseService::new(state.db.clone());

    match service.update_expense(expense_id, input).await {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ExpenseService::new(state.db.clone());

    match service.delete_expense(expense_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
