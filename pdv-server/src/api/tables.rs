//! Table (mesa) endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuditAction, Table, TableCreate, TableStatus, TableStatusChange, TableUpdate};

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::services::audit::{self, AuditRecord};
use crate::services::tabs::invalid_table_transition;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_optional_text};

fn table_not_found(table_id: i64) -> AppError {
    AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id)
}

fn validate_layout(number: Option<i32>, capacity: Option<i32>) -> Result<(), AppError> {
    if let Some(n) = number
        && n < 1
    {
        return Err(AppError::validation(format!("number must be positive, got {n}")));
    }
    if let Some(c) = capacity
        && !(1..=100).contains(&c)
    {
        return Err(AppError::validation(format!("capacity must be between 1 and 100, got {c}")));
    }
    Ok(())
}

async fn ensure_number_free(
    state: &AppState,
    restaurant_id: i64,
    number: i32,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    if db::tables::number_exists(&state.pool, restaurant_id, number, exclude_id)
        .await
        .map_err(db_error)?
    {
        return Err(AppError::new(ErrorCode::TableNumberExists).with_detail("number", number));
    }
    Ok(())
}

/// GET /api/restaurants/{restaurant_id}/tables
pub async fn list_tables(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> ApiResult<Vec<Table>> {
    verify_restaurant(&state, restaurant_id).await?;
    let tables = db::tables::list(&state.pool, restaurant_id)
        .await
        .map_err(db_error)?;
    Ok(Json(tables))
}

/// GET /api/restaurants/{restaurant_id}/tables/{table_id}
pub async fn get_table(
    State(state): State<AppState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
) -> ApiResult<Table> {
    let table = db::tables::find(&state.pool, restaurant_id, table_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| table_not_found(table_id))?;
    Ok(Json(table))
}

/// POST /api/restaurants/{restaurant_id}/tables
pub async fn create_table(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<TableCreate>,
) -> ApiResult<Table> {
    verify_restaurant(&state, restaurant_id).await?;
    validate_layout(Some(data.number), data.capacity)?;
    ensure_number_free(&state, restaurant_id, data.number, None).await?;

    let table = db::tables::create(&state.pool, restaurant_id, &data)
        .await
        .map_err(db_error)?;

    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::TableCreated, "table")
            .resource(table.id)
            .details(json!({ "number": table.number, "capacity": table.capacity })),
    )
    .await;

    Ok(Json(table))
}

/// PUT /api/restaurants/{restaurant_id}/tables/{table_id}
pub async fn update_table(
    State(state): State<AppState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
    Json(data): Json<TableUpdate>,
) -> ApiResult<Table> {
    validate_layout(data.number, data.capacity)?;
    if let Some(number) = data.number {
        ensure_number_free(&state, restaurant_id, number, Some(table_id)).await?;
    }

    let table = db::tables::update(&state.pool, restaurant_id, table_id, &data)
        .await
        .map_err(db_error)?
        .ok_or_else(|| table_not_found(table_id))?;

    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::TableUpdated, "table")
            .resource(table_id)
            .details(json!(data)),
    )
    .await;

    Ok(Json(table))
}

/// DELETE /api/restaurants/{restaurant_id}/tables/{table_id}
///
/// Only free tables can be deleted.
pub async fn delete_table(
    State(state): State<AppState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
) -> ApiResult<bool> {
    let table = db::tables::find(&state.pool, restaurant_id, table_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| table_not_found(table_id))?;

    let occupied = || {
        AppError::new(ErrorCode::TableOccupied)
            .with_detail("table_id", table_id)
            .with_detail("status", table.status.as_str())
    };
    if table.status != TableStatus::Free {
        return Err(occupied());
    }
    if !db::tables::delete_free(&state.pool, restaurant_id, table_id)
        .await
        .map_err(db_error)?
    {
        return Err(occupied());
    }

    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::TableDeleted, "table")
            .resource(table_id)
            .details(json!({ "number": table.number })),
    )
    .await;

    Ok(Json(true))
}

/// PUT /api/restaurants/{restaurant_id}/tables/{table_id}/status
///
/// Manual override. Freeing a table resets its opening time, waiter and total.
pub async fn set_table_status(
    State(state): State<AppState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
    Json(data): Json<TableStatusChange>,
) -> ApiResult<Table> {
    validate_optional_text(&data.waiter, "waiter", MAX_NAME_LEN)?;

    let mut tx = state.pool.begin().await.map_err(|e| db_error(e.into()))?;
    let table = db::tables::find_for_update(&mut tx, restaurant_id, table_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| table_not_found(table_id))?;

    if !table.status.can_transition_to(data.status) {
        return Err(invalid_table_transition(table.status, data.status));
    }

    match data.status {
        TableStatus::Free => {
            if let Some(tab) = db::tabs::find_open_for_table(&mut *tx, table.id)
                .await
                .map_err(db_error)?
            {
                return Err(AppError::new(ErrorCode::TableHasOpenTab)
                    .with_detail("table_id", table.id)
                    .with_detail("tab_id", tab.id));
            }
            db::tables::free(&mut *tx, table.id).await.map_err(db_error)?;
        }
        TableStatus::Occupied if table.status == TableStatus::Free => {
            db::tables::occupy(
                &mut *tx,
                table.id,
                data.waiter.as_deref(),
                db::now_millis(),
                Decimal::ZERO,
            )
            .await
            .map_err(db_error)?;
        }
        status => {
            db::tables::set_status(&mut *tx, table.id, status)
                .await
                .map_err(db_error)?;
        }
    }

    let updated = db::tables::find(&mut *tx, restaurant_id, table_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| table_not_found(table_id))?;
    tx.commit().await.map_err(|e| db_error(e.into()))?;

    tracing::info!(table_id, from = %table.status, to = %updated.status, "Table status changed");
    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::TableStatusChanged, "table")
            .resource(table_id)
            .operator(data.waiter.as_deref())
            .details(json!({ "from": table.status, "to": updated.status })),
    )
    .await;

    Ok(Json(updated))
}
