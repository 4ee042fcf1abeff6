//! Staff endpoints: profiles and their role at the restaurant

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuditAction, Role, RoleAssign, StaffMember, UserRole};

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::services::audit::{self, AuditRecord};
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<Role>,
}

fn staff_not_found(user_id: &str) -> AppError {
    AppError::new(ErrorCode::StaffNotFound).with_detail("user_id", user_id)
}

/// GET /api/restaurants/{restaurant_id}/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<StaffMember>> {
    verify_restaurant(&state, restaurant_id).await?;
    let staff = db::staff::list(&state.pool, restaurant_id, query.role)
        .await
        .map_err(db_error)?;
    Ok(Json(staff))
}

/// POST /api/restaurants/{restaurant_id}/staff
///
/// Assigns (or replaces) the role of an existing profile.
pub async fn assign_role(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<RoleAssign>,
) -> ApiResult<UserRole> {
    verify_restaurant(&state, restaurant_id).await?;
    validate_required_text(&data.user_id, "user_id", MAX_NAME_LEN)?;
    let user_id = data.user_id.trim();

    let mut tx = state.pool.begin().await.map_err(|e| db_error(e.into()))?;
    if db::staff::find_profile(&mut *tx, user_id)
        .await
        .map_err(db_error)?
        .is_none()
    {
        return Err(staff_not_found(user_id));
    }
    let assignment = db::staff::upsert_role(&mut tx, restaurant_id, user_id, data.role)
        .await
        .map_err(db_error)?;
    tx.commit().await.map_err(|e| db_error(e.into()))?;

    tracing::info!(restaurant_id, user_id, role = ?assignment.role, "Role assigned");
    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::RoleAssigned, "user_role")
            .resource(assignment.id)
            .details(json!({ "user_id": user_id, "role": assignment.role })),
    )
    .await;

    Ok(Json(assignment))
}

/// DELETE /api/restaurants/{restaurant_id}/staff/{user_id}
pub async fn remove_role(
    State(state): State<AppState>,
    Path((restaurant_id, user_id)): Path<(i64, String)>,
) -> ApiResult<bool> {
    if !db::staff::delete_role(&state.pool, restaurant_id, &user_id)
        .await
        .map_err(db_error)?
    {
        return Err(staff_not_found(&user_id));
    }

    tracing::info!(restaurant_id, user_id = %user_id, "Role removed");
    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::RoleRemoved, "user_role")
            .details(json!({ "user_id": user_id })),
    )
    .await;

    Ok(Json(true))
}
