//! Cash register (caixa) endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CashMovement, CashMovementCreate, CashRegister, CashRegisterClose, CashRegisterOpen,
    CashRegisterSummary,
};

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::services::cash_register;
use crate::state::AppState;
use crate::validation::page_bounds;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn register_not_found(cash_register_id: i64) -> AppError {
    AppError::new(ErrorCode::CashRegisterNotFound).with_detail("cash_register_id", cash_register_id)
}

/// GET /api/restaurants/{restaurant_id}/cash-registers
pub async fn list_cash_registers(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<CashRegister>> {
    verify_restaurant(&state, restaurant_id).await?;
    let (limit, offset) = page_bounds(query.page, query.per_page);
    let registers = db::cash_registers::list(&state.pool, restaurant_id, limit, offset)
        .await
        .map_err(db_error)?;
    Ok(Json(registers))
}

/// POST /api/restaurants/{restaurant_id}/cash-registers
pub async fn open_cash_register(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<CashRegisterOpen>,
) -> ApiResult<CashRegister> {
    let register = cash_register::open(&state.pool, restaurant_id, &data).await?;
    Ok(Json(register))
}

/// GET /api/restaurants/{restaurant_id}/cash-registers/current
pub async fn current_cash_register(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> ApiResult<CashRegister> {
    verify_restaurant(&state, restaurant_id).await?;
    let register = db::cash_registers::find_open(&state.pool, restaurant_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::CashRegisterNotOpen))?;
    Ok(Json(register))
}

/// POST /api/restaurants/{restaurant_id}/cash-registers/current/movements
pub async fn add_movement(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<CashMovementCreate>,
) -> ApiResult<CashMovement> {
    let movement = cash_register::add_movement(&state.pool, restaurant_id, &data).await?;
    Ok(Json(movement))
}

/// POST /api/restaurants/{restaurant_id}/cash-registers/current/close
pub async fn close_cash_register(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<CashRegisterClose>,
) -> ApiResult<CashRegister> {
    let register = cash_register::close(&state.pool, restaurant_id, &data).await?;
    Ok(Json(register))
}

/// GET /api/restaurants/{restaurant_id}/cash-registers/{cash_register_id}
pub async fn get_cash_register(
    State(state): State<AppState>,
    Path((restaurant_id, cash_register_id)): Path<(i64, i64)>,
) -> ApiResult<CashRegister> {
    let register = db::cash_registers::find(&state.pool, restaurant_id, cash_register_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| register_not_found(cash_register_id))?;
    Ok(Json(register))
}

/// GET /api/restaurants/{restaurant_id}/cash-registers/{cash_register_id}/movements
pub async fn list_movements(
    State(state): State<AppState>,
    Path((restaurant_id, cash_register_id)): Path<(i64, i64)>,
) -> ApiResult<Vec<CashMovement>> {
    let register = db::cash_registers::find(&state.pool, restaurant_id, cash_register_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| register_not_found(cash_register_id))?;
    let movements = db::cash_registers::list_movements(&state.pool, register.id)
        .await
        .map_err(db_error)?;
    Ok(Json(movements))
}

/// GET /api/restaurants/{restaurant_id}/cash-registers/{cash_register_id}/summary
pub async fn cash_register_summary(
    State(state): State<AppState>,
    Path((restaurant_id, cash_register_id)): Path<(i64, i64)>,
) -> ApiResult<CashRegisterSummary> {
    let summary = cash_register::summary(&state.pool, restaurant_id, cash_register_id).await?;
    Ok(Json(summary))
}
