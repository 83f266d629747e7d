//! Error handling for the Estate Ledger backend
//!
//! Provides consistent error responses in English and Sinhala

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_si: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_si: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Aggregation errors
    #[error("Failed to load {collection}: {source}")]
    UpstreamFetch {
        collection: &'static str,
        source: sqlx::Error,
    },

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_si: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message, message_si } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_si: message_si.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_si: format!("දත්ත වලංගු නොවේ: {}", msg),
                    field: None,
                },
            ),
            AppError::Conflict { resource, message, message_si } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message_en: message.clone(),
                    message_si: message_si.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_si: format!("{} හමු නොවීය", resource),
                    field: None,
                },
            ),
            AppError::UpstreamFetch { collection, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "UPSTREAM_FETCH_ERROR".to_string(),
                    message_en: format!("Failed to load the {} collection", collection),
                    message_si: format!("{} දත්ත ලබා ගැනීමට නොහැකි විය", collection),
                    field: Some(collection.to_string()),
                },
            ),
            AppError::DataIntegrity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "DATA_INTEGRITY_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_si: format!("දත්ත ගැටලුවක් හමු විය: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_si: "දත්ත සමුදා දෝෂයක් ඇති විය".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_si: "අභ්‍යන්තර සේවාදායක දෝෂයක් ඇති විය".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_si: "අභ්‍යන්තර සේවාදායක දෝෂයක් ඇති විය".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
