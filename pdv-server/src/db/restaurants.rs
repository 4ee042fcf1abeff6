//! Restaurant database operations

use rust_decimal::Decimal;
use shared::billing::SERVICE_FEE_PERCENT;
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use sqlx::PgExecutor;

use super::BoxError;

pub async fn list(db: impl PgExecutor<'_>) -> Result<Vec<Restaurant>, BoxError> {
    let rows: Vec<Restaurant> = sqlx::query_as(
        r#"
        SELECT id, name, service_fee_percent, cover_charge, is_active, created_at
        FROM restaurantes
        ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_active_ids(db: impl PgExecutor<'_>) -> Result<Vec<i64>, BoxError> {
    let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM restaurantes WHERE is_active ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(ids.into_iter().map(|(id,)| id).collect())
}

pub async fn find(db: impl PgExecutor<'_>, id: i64) -> Result<Option<Restaurant>, BoxError> {
    let row: Option<Restaurant> = sqlx::query_as(
        r#"
        SELECT id, name, service_fee_percent, cover_charge, is_active, created_at
        FROM restaurantes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn create(db: impl PgExecutor<'_>, data: &RestaurantCreate) -> Result<Restaurant, BoxError> {
    let row: Restaurant = sqlx::query_as(
        r#"
        INSERT INTO restaurantes (id, name, service_fee_percent, cover_charge, is_active, created_at)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        RETURNING id, name, service_fee_percent, cover_charge, is_active, created_at
        "#,
    )
    .bind(super::snowflake_id())
    .bind(data.name.trim())
    .bind(data.service_fee_percent.unwrap_or(SERVICE_FEE_PERCENT))
    .bind(data.cover_charge.unwrap_or(Decimal::ZERO))
    .bind(super::now_millis())
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: impl PgExecutor<'_>,
    id: i64,
    data: &RestaurantUpdate,
) -> Result<Option<Restaurant>, BoxError> {
    let row: Option<Restaurant> = sqlx::query_as(
        r#"
        UPDATE restaurantes SET
            name = COALESCE($1, name),
            service_fee_percent = COALESCE($2, service_fee_percent),
            cover_charge = COALESCE($3, cover_charge),
            is_active = COALESCE($4, is_active)
        WHERE id = $5
        RETURNING id, name, service_fee_percent, cover_charge, is_active, created_at
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.service_fee_percent)
    .bind(data.cover_charge)
    .bind(data.is_active)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Lock the restaurant row; serializes session-level changes such as opening a cash register
pub async fn lock(conn: &mut sqlx::PgConnection, id: i64) -> Result<bool, BoxError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM restaurantes WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}
