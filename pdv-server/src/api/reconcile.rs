//! Manual reconciliation trigger

use axum::{
    Json,
    extract::{Path, State},
};
use shared::billing::ReconciliationPlan;

use super::ApiResult;
use crate::services::reconcile::reconcile_restaurant;
use crate::state::AppState;

/// POST /api/restaurants/{restaurant_id}/reconcile
///
/// Returns the corrections that were applied (empty when all was consistent).
pub async fn reconcile(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> ApiResult<ReconciliationPlan> {
    let plan = reconcile_restaurant(&state.pool, restaurant_id).await?;
    Ok(Json(plan))
}
