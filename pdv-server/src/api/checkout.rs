//! Checkout endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CheckoutRequest, CounterSaleRequest, Sale};

use super::{ApiResult, verify_restaurant};
use crate::services::checkout;
use crate::state::AppState;

/// POST /api/restaurants/{restaurant_id}/tabs/{tab_id}/checkout
pub async fn checkout_tab(
    State(state): State<AppState>,
    Path((restaurant_id, tab_id)): Path<(i64, i64)>,
    Json(data): Json<CheckoutRequest>,
) -> ApiResult<Sale> {
    let sale = checkout::checkout_tab(&state.pool, restaurant_id, tab_id, &data).await?;
    Ok(Json(sale))
}

/// POST /api/restaurants/{restaurant_id}/counter-sales
pub async fn counter_sale(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<CounterSaleRequest>,
) -> ApiResult<Sale> {
    verify_restaurant(&state, restaurant_id).await?;
    let sale = checkout::counter_sale(&state.pool, restaurant_id, &data).await?;
    Ok(Json(sale))
}
