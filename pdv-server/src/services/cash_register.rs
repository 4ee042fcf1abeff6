//! Cash register (caixa) sessions
//!
//! - Only one session is open per restaurant at a time
//! - `expected_balance` starts at the opening balance and follows cash
//!   sales, deposits (suprimento) and withdrawals (sangria)
//! - Closing records `difference = closing_balance - expected_balance`

use rust_decimal::Decimal;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuditAction, CashMovement, CashMovementCreate, CashRegister, CashRegisterClose,
    CashRegisterOpen, CashRegisterStatus, CashRegisterSummary, MovementKind, PaymentMethod,
};
use sqlx::PgPool;

use super::audit::{self, AuditRecord};
use crate::db;
use crate::error::ServiceResult;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_non_negative, validate_optional_text, validate_positive,
    validate_required_text,
};

pub async fn open(
    pool: &PgPool,
    restaurant_id: i64,
    data: &CashRegisterOpen,
) -> ServiceResult<CashRegister> {
    validate_required_text(&data.operator, "operator", MAX_NAME_LEN)?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    validate_non_negative(data.opening_balance, "opening_balance")?;

    let mut tx = pool.begin().await?;
    if !db::restaurants::lock(&mut tx, restaurant_id).await? {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    }
    if let Some(open) = db::cash_registers::find_open(&mut *tx, restaurant_id).await? {
        return Err(AppError::new(ErrorCode::CashRegisterAlreadyOpen)
            .with_detail("cash_register_id", open.id)
            .with_detail("operator", open.operator)
            .into());
    }

    let register = CashRegister {
        id: db::snowflake_id(),
        restaurant_id,
        operator: data.operator.trim().to_string(),
        status: CashRegisterStatus::Open,
        opening_balance: data.opening_balance,
        expected_balance: data.opening_balance,
        closing_balance: None,
        difference: None,
        opened_at: db::now_millis(),
        closed_at: None,
        note: data.note.clone(),
    };
    db::cash_registers::insert(&mut *tx, &register).await?;
    tx.commit().await?;

    tracing::info!(
        cash_register_id = register.id,
        operator = %register.operator,
        opening_balance = %register.opening_balance,
        "Cash register opened"
    );
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::CashRegisterOpened, "cash_register")
            .resource(register.id)
            .operator(Some(register.operator.as_str()))
            .details(json!({ "opening_balance": register.opening_balance })),
    )
    .await;

    Ok(register)
}

/// Manual deposit or withdrawal on the open session
pub async fn add_movement(
    pool: &PgPool,
    restaurant_id: i64,
    data: &CashMovementCreate,
) -> ServiceResult<CashMovement> {
    if data.kind == MovementKind::Sale {
        return Err(AppError::invalid_request("Sale movements are created by checkout").into());
    }
    validate_positive(data.amount, "amount")?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await?;
    let register = db::cash_registers::find_open_for_update(&mut tx, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CashRegisterNotOpen))?;

    if data.kind == MovementKind::Withdrawal && data.amount > register.expected_balance {
        return Err(AppError::new(ErrorCode::InsufficientCash)
            .with_detail("expected_balance", register.expected_balance.to_string())
            .with_detail("amount", data.amount.to_string())
            .into());
    }

    let movement = CashMovement {
        id: db::snowflake_id(),
        cash_register_id: register.id,
        kind: data.kind,
        payment_method: PaymentMethod::Cash,
        amount: data.amount,
        description: data.description.clone(),
        sale_id: None,
        created_at: db::now_millis(),
    };
    db::cash_registers::insert_movement(&mut *tx, &movement).await?;
    let expected = db::cash_registers::adjust_expected(
        &mut *tx,
        register.id,
        movement.kind.balance_effect(movement.payment_method, movement.amount),
    )
    .await?;
    tx.commit().await?;

    let action = match movement.kind {
        MovementKind::Withdrawal => AuditAction::CashWithdrawal,
        _ => AuditAction::CashDeposit,
    };
    tracing::info!(
        cash_register_id = register.id,
        kind = ?movement.kind,
        amount = %movement.amount,
        expected_balance = %expected,
        "Cash movement recorded"
    );
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, action, "cash_register")
            .resource(register.id)
            .operator(Some(register.operator.as_str()))
            .details(json!({ "amount": movement.amount, "description": movement.description })),
    )
    .await;

    Ok(movement)
}

pub async fn close(
    pool: &PgPool,
    restaurant_id: i64,
    data: &CashRegisterClose,
) -> ServiceResult<CashRegister> {
    validate_non_negative(data.closing_balance, "closing_balance")?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await?;
    let register = db::cash_registers::find_open_for_update(&mut tx, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CashRegisterNotOpen))?;

    let difference = data.closing_balance - register.expected_balance;
    let closed = db::cash_registers::close(
        &mut *tx,
        register.id,
        data.closing_balance,
        difference,
        db::now_millis(),
        data.note.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::CashRegisterNotOpen))?;
    tx.commit().await?;

    if difference.is_zero() {
        tracing::info!(cash_register_id = closed.id, "Cash register closed");
    } else {
        tracing::warn!(
            cash_register_id = closed.id,
            expected = %closed.expected_balance,
            counted = %data.closing_balance,
            difference = %difference,
            "Cash register closed with difference"
        );
    }
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::CashRegisterClosed, "cash_register")
            .resource(closed.id)
            .operator(Some(closed.operator.as_str()))
            .details(json!({
                "expected_balance": closed.expected_balance,
                "closing_balance": data.closing_balance,
                "difference": difference,
            })),
    )
    .await;

    Ok(closed)
}

pub async fn summary(
    pool: &PgPool,
    restaurant_id: i64,
    cash_register_id: i64,
) -> ServiceResult<CashRegisterSummary> {
    let register = db::cash_registers::find(pool, restaurant_id, cash_register_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::CashRegisterNotFound)
                .with_detail("cash_register_id", cash_register_id)
        })?;
    let by_payment_method = db::cash_registers::sales_by_method(pool, register.id).await?;
    let (deposits, withdrawals) = db::cash_registers::manual_totals(pool, register.id).await?;

    let sales_count: i64 = by_payment_method.iter().map(|m| m.count).sum();
    let sales_total: Decimal = by_payment_method.iter().map(|m| m.total).sum();

    Ok(CashRegisterSummary {
        cash_register: register,
        sales_count,
        sales_total,
        by_payment_method,
        deposits,
        withdrawals,
    })
}
