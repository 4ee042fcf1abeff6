//! Tab (comanda) endpoints
//!
//! Thin wrappers over `services::tabs`; every mutation runs in its own
//! transaction there.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::billing::BillBreakdown;
use shared::models::{
    BillRequest, Tab, TabCancel, TabDetail, TabItem, TabItemCreate, TabItemStatusChange,
    TabItemUpdate, TabMove, TabOpen, TabStatus,
};

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::services;
use crate::state::AppState;

/// Query params for listing tabs
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<TabStatus>,
}

/// GET /api/restaurants/{restaurant_id}/tabs
pub async fn list_tabs(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Tab>> {
    verify_restaurant(&state, restaurant_id).await?;
    let tabs = db::tabs::list(&state.pool, restaurant_id, query.status)
        .await
        .map_err(db_error)?;
    Ok(Json(tabs))
}

/// POST /api/restaurants/{restaurant_id}/tabs
pub async fn open_tab(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<TabOpen>,
) -> ApiResult<Tab> {
    verify_restaurant(&state, restaurant_id).await?;
    let tab = services::tabs::open_tab(&state.pool, restaurant_id, &data).await?;
    Ok(Json(tab))
}

/// GET /api/restaurants/{restaurant_id}/tabs/{tab_id}
pub async fn get_tab(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
) -> ApiResult<TabDetail> {
    let detail = services::tabs::get_tab_detail(&state.pool, restaurant_id, tab_id).await?;
    Ok(Json(detail))
}

/// POST /api/restaurants/{restaurant_id}/tabs/{tab_id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
    Json(data): Json<TabItemCreate>,
) -> ApiResult<TabItem> {
    let item = services::tabs::add_item(&state.pool, restaurant_id, tab_id, &data).await?;
    Ok(Json(item))
}

/// PUT /api/restaurants/{restaurant_id}/tabs/{tab_id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id, item_id)): Path<(i64, i64, i64)>,
    Json(data): Json<TabItemUpdate>,
) -> ApiResult<TabItem> {
    let item =
        services::tabs::update_item(&state.pool, restaurant_id, tab_id, item_id, &data).await?;
    Ok(Json(item))
}

/// DELETE /api/restaurants/{restaurant_id}/tabs/{tab_id}/items/{item_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id, item_id)): Path<(i64, i64, i64)>,
) -> ApiResult<bool> {
    services::tabs::remove_item(&state.pool, restaurant_id, tab_id, item_id).await?;
    Ok(Json(true))
}

/// PUT /api/restaurants/{restaurant_id}/tabs/{tab_id}/items/{item_id}/status
pub async fn set_item_status(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id, item_id)): Path<(i64, i64, i64)>,
    Json(data): Json<TabItemStatusChange>,
) -> ApiResult<TabItem> {
    let item =
        services::tabs::set_item_status(&state.pool, restaurant_id, tab_id, item_id, &data).await?;
    Ok(Json(item))
}

/// POST /api/restaurants/{restaurant_id}/tabs/{tab_id}/request-bill
pub async fn request_bill(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
) -> ApiResult<TabDetail> {
    let detail = services::tabs::request_bill(&state.pool, restaurant_id, tab_id).await?;
    Ok(Json(detail))
}

/// POST /api/restaurants/{restaurant_id}/tabs/{tab_id}/bill
///
/// Computes the bill with the given options without changing anything.
pub async fn preview_bill(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
    Json(data): Json<BillRequest>,
) -> ApiResult<BillBreakdown> {
    let bill = services::tabs::preview_bill(&state.pool, restaurant_id, tab_id, &data).await?;
    Ok(Json(bill))
}

/// POST /api/restaurants/{restaurant_id}/tabs/{tab_id}/move
pub async fn move_tab(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
    Json(data): Json<TabMove>,
) -> ApiResult<Tab> {
    let tab = services::tabs::move_tab(&state.pool, restaurant_id, tab_id, &data).await?;
    Ok(Json(tab))
}

/// POST /api/restaurants/{restaurant_id}/tabs/{tab_id}/cancel
pub async fn cancel_tab(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
    Json(data): Json<TabCancel>,
) -> ApiResult<Tab> {
    let tab = services::tabs::cancel_tab(&state.pool, restaurant_id, tab_id, &data).await?;
    Ok(Json(tab))
}
