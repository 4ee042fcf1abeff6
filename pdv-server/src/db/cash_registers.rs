//! Cash register (caixa) and cash movement database operations

use rust_decimal::Decimal;
use shared::models::{CashMovement, CashRegister, CashRegisterStatus, PaymentMethodTotal};
use sqlx::{PgConnection, PgExecutor};

use super::BoxError;

pub async fn find(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<CashRegister>, BoxError> {
    let row: Option<CashRegister> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, operator, status, opening_balance, expected_balance,
               closing_balance, difference, opened_at, closed_at, note
        FROM caixas
        WHERE restaurant_id = $1 AND id = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// The open session of a restaurant, if any
pub async fn find_open(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Option<CashRegister>, BoxError> {
    let row: Option<CashRegister> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, operator, status, opening_balance, expected_balance,
               closing_balance, difference, opened_at, closed_at, note
        FROM caixas
        WHERE restaurant_id = $1 AND status = 'aberto'
        ORDER BY opened_at DESC
        LIMIT 1
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Same as [`find_open`], locking the row
pub async fn find_open_for_update(
    conn: &mut PgConnection,
    restaurant_id: i64,
) -> Result<Option<CashRegister>, BoxError> {
    let row: Option<CashRegister> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, operator, status, opening_balance, expected_balance,
               closing_balance, difference, opened_at, closed_at, note
        FROM caixas
        WHERE restaurant_id = $1 AND status = 'aberto'
        ORDER BY opened_at DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn list(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<CashRegister>, BoxError> {
    let rows: Vec<CashRegister> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, operator, status, opening_balance, expected_balance,
               closing_balance, difference, opened_at, closed_at, note
        FROM caixas
        WHERE restaurant_id = $1
        ORDER BY opened_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(restaurant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: impl PgExecutor<'_>, register: &CashRegister) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO caixas (id, restaurant_id, operator, status, opening_balance, expected_balance,
                            closing_balance, difference, opened_at, closed_at, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(register.id)
    .bind(register.restaurant_id)
    .bind(&register.operator)
    .bind(register.status)
    .bind(register.opening_balance)
    .bind(register.expected_balance)
    .bind(register.closing_balance)
    .bind(register.difference)
    .bind(register.opened_at)
    .bind(register.closed_at)
    .bind(&register.note)
    .execute(db)
    .await?;
    Ok(())
}

/// Add `delta` to the expected balance of an open session
pub async fn adjust_expected(
    db: impl PgExecutor<'_>,
    id: i64,
    delta: Decimal,
) -> Result<Decimal, BoxError> {
    let (expected,): (Decimal,) = sqlx::query_as(
        r#"
        UPDATE caixas SET expected_balance = expected_balance + $1
        WHERE id = $2 AND status = 'aberto'
        RETURNING expected_balance
        "#,
    )
    .bind(delta)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(expected)
}

/// Close an open session. `None` when it was no longer open.
pub async fn close(
    db: impl PgExecutor<'_>,
    id: i64,
    closing_balance: Decimal,
    difference: Decimal,
    closed_at: i64,
    note: Option<&str>,
) -> Result<Option<CashRegister>, BoxError> {
    let row: Option<CashRegister> = sqlx::query_as(
        r#"
        UPDATE caixas SET
            status = $1,
            closing_balance = $2,
            difference = $3,
            closed_at = $4,
            note = COALESCE($5, note)
        WHERE id = $6 AND status = 'aberto'
        RETURNING id, restaurant_id, operator, status, opening_balance, expected_balance,
                  closing_balance, difference, opened_at, closed_at, note
        "#,
    )
    .bind(CashRegisterStatus::Closed)
    .bind(closing_balance)
    .bind(difference)
    .bind(closed_at)
    .bind(note)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

// ── Movements ──

pub async fn insert_movement(db: impl PgExecutor<'_>, movement: &CashMovement) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO movimentacoes_caixa (id, cash_register_id, kind, payment_method, amount,
                                         description, sale_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(movement.id)
    .bind(movement.cash_register_id)
    .bind(movement.kind)
    .bind(movement.payment_method)
    .bind(movement.amount)
    .bind(&movement.description)
    .bind(movement.sale_id)
    .bind(movement.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_movements(
    db: impl PgExecutor<'_>,
    cash_register_id: i64,
) -> Result<Vec<CashMovement>, BoxError> {
    let rows: Vec<CashMovement> = sqlx::query_as(
        r#"
        SELECT id, cash_register_id, kind, payment_method, amount, description, sale_id, created_at
        FROM movimentacoes_caixa
        WHERE cash_register_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(cash_register_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// (deposits, withdrawals) of a session
pub async fn manual_totals(
    db: impl PgExecutor<'_>,
    cash_register_id: i64,
) -> Result<(Decimal, Decimal), BoxError> {
    let totals: (Decimal, Decimal) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(amount) FILTER (WHERE kind = 'suprimento'), 0),
            COALESCE(SUM(amount) FILTER (WHERE kind = 'sangria'), 0)
        FROM movimentacoes_caixa
        WHERE cash_register_id = $1
        "#,
    )
    .bind(cash_register_id)
    .fetch_one(db)
    .await?;
    Ok(totals)
}

/// Sales of a session grouped by payment method
pub async fn sales_by_method(
    db: impl PgExecutor<'_>,
    cash_register_id: i64,
) -> Result<Vec<PaymentMethodTotal>, BoxError> {
    let rows: Vec<PaymentMethodTotal> = sqlx::query_as(
        r#"
        SELECT payment_method, COUNT(*) AS count, COALESCE(SUM(total), 0) AS total
        FROM vendas
        WHERE cash_register_id = $1
        GROUP BY payment_method
        ORDER BY payment_method
        "#,
    )
    .bind(cash_register_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
