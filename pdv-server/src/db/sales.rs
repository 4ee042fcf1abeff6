//! Sale (venda) database operations

use rust_decimal::Decimal;
use shared::models::{PaymentMethodTotal, Sale};
use sqlx::PgExecutor;

use super::BoxError;

pub async fn insert(db: impl PgExecutor<'_>, sale: &Sale) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO vendas (id, restaurant_id, tab_id, table_id, cash_register_id, subtotal, discount,
                            service_fee, cover_charge, total, payment_method, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(sale.id)
    .bind(sale.restaurant_id)
    .bind(sale.tab_id)
    .bind(sale.table_id)
    .bind(sale.cash_register_id)
    .bind(sale.subtotal)
    .bind(sale.discount)
    .bind(sale.service_fee)
    .bind(sale.cover_charge)
    .bind(sale.total)
    .bind(sale.payment_method)
    .bind(sale.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Sale>, BoxError> {
    let row: Option<Sale> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, tab_id, table_id, cash_register_id, subtotal, discount,
               service_fee, cover_charge, total, payment_method, created_at
        FROM vendas
        WHERE restaurant_id = $1 AND id = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Sales in `[from, to)`, newest first
pub async fn list(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    from: Option<i64>,
    to: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Sale>, BoxError> {
    let rows: Vec<Sale> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, tab_id, table_id, cash_register_id, subtotal, discount,
               service_fee, cover_charge, total, payment_method, created_at
        FROM vendas
        WHERE restaurant_id = $1
          AND ($2::bigint IS NULL OR created_at >= $2)
          AND ($3::bigint IS NULL OR created_at < $3)
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct SaleTotals {
    pub count: i64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub service_fee: Decimal,
    pub cover_charge: Decimal,
    pub total: Decimal,
}

pub async fn totals(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<SaleTotals, BoxError> {
    let row: SaleTotals = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) AS count,
            COALESCE(SUM(subtotal), 0) AS subtotal,
            COALESCE(SUM(discount), 0) AS discount,
            COALESCE(SUM(service_fee), 0) AS service_fee,
            COALESCE(SUM(cover_charge), 0) AS cover_charge,
            COALESCE(SUM(total), 0) AS total
        FROM vendas
        WHERE restaurant_id = $1
          AND ($2::bigint IS NULL OR created_at >= $2)
          AND ($3::bigint IS NULL OR created_at < $3)
        "#,
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn totals_by_method(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<Vec<PaymentMethodTotal>, BoxError> {
    let rows: Vec<PaymentMethodTotal> = sqlx::query_as(
        r#"
        SELECT payment_method, COUNT(*) AS count, COALESCE(SUM(total), 0) AS total
        FROM vendas
        WHERE restaurant_id = $1
          AND ($2::bigint IS NULL OR created_at >= $2)
          AND ($3::bigint IS NULL OR created_at < $3)
        GROUP BY payment_method
        ORDER BY payment_method
        "#,
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
