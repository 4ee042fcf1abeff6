//! Audit log endpoint

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::AuditLog;

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::state::AppState;
use crate::validation::page_bounds;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/restaurants/{restaurant_id}/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<AuditLog>> {
    verify_restaurant(&state, restaurant_id).await?;
    let (limit, offset) = page_bounds(query.page, query.per_page);
    let logs = db::audit::list(&state.pool, restaurant_id, limit, offset)
        .await
        .map_err(db_error)?;
    Ok(Json(logs))
}
