//! Product (produto) database operations

use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::{PgConnection, PgExecutor};

use super::BoxError;

pub async fn list(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    category: Option<&str>,
    available_only: bool,
) -> Result<Vec<Product>, BoxError> {
    let rows: Vec<Product> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, name, price, category, is_available, stock
        FROM produtos
        WHERE restaurant_id = $1
          AND ($2::text IS NULL OR category = $2)
          AND (NOT $3 OR is_available)
        ORDER BY category, name
        "#,
    )
    .bind(restaurant_id)
    .bind(category)
    .bind(available_only)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Product>, BoxError> {
    let row: Option<Product> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, name, price, category, is_available, stock
        FROM produtos
        WHERE restaurant_id = $1 AND id = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Lock the product row (stock changes) for the rest of the transaction
pub async fn find_for_update(
    conn: &mut PgConnection,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Product>, BoxError> {
    let row: Option<Product> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, name, price, category, is_available, stock
        FROM produtos
        WHERE restaurant_id = $1 AND id = $2
        FOR UPDATE
        "#,
    )
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    data: &ProductCreate,
) -> Result<Product, BoxError> {
    let row: Product = sqlx::query_as(
        r#"
        INSERT INTO produtos (id, restaurant_id, name, price, category, is_available, stock)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, restaurant_id, name, price, category, is_available, stock
        "#,
    )
    .bind(super::snowflake_id())
    .bind(restaurant_id)
    .bind(data.name.trim())
    .bind(data.price)
    .bind(data.category.trim())
    .bind(data.is_available.unwrap_or(true))
    .bind(data.stock)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
    data: &ProductUpdate,
) -> Result<Option<Product>, BoxError> {
    let row: Option<Product> = sqlx::query_as(
        r#"
        UPDATE produtos SET
            name = COALESCE($1, name),
            price = COALESCE($2, price),
            category = COALESCE($3, category),
            is_available = COALESCE($4, is_available),
            stock = CASE WHEN $5 THEN NULL ELSE COALESCE($6, stock) END
        WHERE restaurant_id = $7 AND id = $8
        RETURNING id, restaurant_id, name, price, category, is_available, stock
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.price)
    .bind(data.category.as_deref().map(str::trim))
    .bind(data.is_available)
    .bind(data.clear_stock)
    .bind(data.stock)
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: impl PgExecutor<'_>, restaurant_id: i64, id: i64) -> Result<bool, BoxError> {
    let rows = sqlx::query("DELETE FROM produtos WHERE restaurant_id = $1 AND id = $2")
        .bind(restaurant_id)
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Add `delta` to a tracked stock. Untracked products are left alone.
pub async fn adjust_stock(db: impl PgExecutor<'_>, id: i64, delta: i32) -> Result<(), BoxError> {
    if delta == 0 {
        return Ok(());
    }
    sqlx::query("UPDATE produtos SET stock = stock + $1 WHERE id = $2 AND stock IS NOT NULL")
        .bind(delta)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
