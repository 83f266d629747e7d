//! Route definitions for the Estate Ledger platform

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Field management
        .nest("/fields", field_routes())
        // Harvest management
        .nest("/harvests", harvest_routes())
        // Combined log sessions
        .route("/sessions", post(handlers::record_session))
        // Expense management
        .nest("/transactions", expense_routes())
        // Collector management
        .nest("/collectors", collector_routes())
        // Master data
        .route(
            "/activities",
            get(handlers::list_activities),
        )
        .route("/activities/:activity_id", put(handlers::update_activity))
        .route("/inventory-items", get(handlers::list_inventory_items))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/dashboard/advisories", get(handlers::get_rate_advisories))
        // Reports
        .route("/reports", get(handlers::get_report))
}

/// Field management routes
fn field_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_fields).post(handlers::create_field))
        .route(
            "/:field_id",
            get(handlers::get_field)
                .put(handlers::update_field)
                .delete(handlers::delete_field),
        )
}

/// Harvest management routes
fn harvest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_harvests).post(handlers::record_harvest),
        )
        .route(
            "/:harvest_id",
            get(handlers::get_harvest)
                .put(handlers::update_harvest)
                .delete(handlers::delete_harvest),
        )
}

/// Expense management routes
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::record_expense),
        )
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}

/// Collector management routes
fn collector_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_collectors).post(handlers::create_collector),
        )
        // Monthly rates
        .route("/rates", get(handlers::list_rates).post(handlers::set_rate))
        .route("/rates/:rate_id", delete(handlers::delete_rate))
        // Advances
        .route(
            "/advances",
            get(handlers::list_advances).post(handlers::record_advance),
        )
        .route("/advances/:advance_id", delete(handlers::delete_advance))
        .route("/:collector_id", delete(handlers::delete_collector))
}
