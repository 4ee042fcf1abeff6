//! HTTP API
//!
//! Everything except `/health` and `/api/restaurants` itself lives under
//! `/api/restaurants/{restaurant_id}`.

pub mod audit;
pub mod cash_registers;
pub mod checkout;
pub mod health;
pub mod products;
pub mod reconcile;
pub mod restaurants;
pub mod sales;
pub mod staff;
pub mod tables;
pub mod tabs;

use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use http::{HeaderValue, StatusCode};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::Restaurant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::db::{self, BoxError};
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Map a db-layer error for a handler
pub(crate) fn db_error(e: BoxError) -> AppError {
    ServiceError::Db(e).into()
}

/// Load the restaurant addressed by the route
pub(crate) async fn verify_restaurant(
    state: &AppState,
    restaurant_id: i64,
) -> Result<Restaurant, AppError> {
    db::restaurants::find(&state.pool, restaurant_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant_id", restaurant_id)
        })
}

/// Routes scoped to one restaurant
fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(restaurants::get_restaurant).put(restaurants::update_restaurant))
        .route("/reconcile", post(reconcile::reconcile))
        // Tables
        .route("/tables", get(tables::list_tables).post(tables::create_table))
        .route(
            "/tables/{table_id}",
            get(tables::get_table)
                .put(tables::update_table)
                .delete(tables::delete_table),
        )
        .route("/tables/{table_id}/status", put(tables::set_table_status))
        // Products
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/{product_id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        // Tabs
        .route("/tabs", get(tabs::list_tabs).post(tabs::open_tab))
        .route("/tabs/{tab_id}", get(tabs::get_tab))
        .route("/tabs/{tab_id}/items", post(tabs::add_item))
        .route(
            "/tabs/{tab_id}/items/{item_id}",
            put(tabs::update_item).delete(tabs::remove_item),
        )
        .route("/tabs/{tab_id}/items/{item_id}/status", put(tabs::set_item_status))
        .route("/tabs/{tab_id}/request-bill", post(tabs::request_bill))
        .route("/tabs/{tab_id}/bill", post(tabs::preview_bill))
        .route("/tabs/{tab_id}/move", post(tabs::move_tab))
        .route("/tabs/{tab_id}/cancel", post(tabs::cancel_tab))
        .route("/tabs/{tab_id}/checkout", post(checkout::checkout_tab))
        .route("/counter-sales", post(checkout::counter_sale))
        // Cash register
        .route(
            "/cash-registers",
            get(cash_registers::list_cash_registers).post(cash_registers::open_cash_register),
        )
        .route("/cash-registers/current", get(cash_registers::current_cash_register))
        .route("/cash-registers/current/movements", post(cash_registers::add_movement))
        .route("/cash-registers/current/close", post(cash_registers::close_cash_register))
        .route("/cash-registers/{cash_register_id}", get(cash_registers::get_cash_register))
        .route(
            "/cash-registers/{cash_register_id}/movements",
            get(cash_registers::list_movements),
        )
        .route(
            "/cash-registers/{cash_register_id}/summary",
            get(cash_registers::cash_register_summary),
        )
        // Sales
        .route("/sales", get(sales::list_sales))
        .route("/sales/report", get(sales::sales_report))
        .route("/sales/{sale_id}", get(sales::get_sale))
        // Audit
        .route("/audit-logs", get(audit::list_audit_logs))
        // Staff
        .route("/staff", get(staff::list_staff).post(staff::assign_role))
        .route("/staff/{user_id}", delete(staff::remove_role))
}

/// Create the application router with its middleware stack
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_allow_origin.as_deref());
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/restaurants",
            get(restaurants::list_restaurants).post(restaurants::create_restaurant),
        )
        .nest("/api/restaurants/{restaurant_id}", restaurant_routes())
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => layer.allow_origin(value),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Invalid CORS_ALLOW_ORIGIN, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

async fn not_found() -> (StatusCode, Json<ApiResponse>) {
    let err = AppError::with_message(ErrorCode::NotFound, "Route not found");
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(&err)))
}
