//! Table (mesa) database operations

use rust_decimal::Decimal;
use shared::models::{Table, TableCreate, TableStatus, TableUpdate};
use sqlx::{PgConnection, PgExecutor};

use super::BoxError;

pub async fn list(db: impl PgExecutor<'_>, restaurant_id: i64) -> Result<Vec<Table>, BoxError> {
    let rows: Vec<Table> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, number, capacity, status, opened_at, waiter, total
        FROM mesas
        WHERE restaurant_id = $1
        ORDER BY number
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Table>, BoxError> {
    let row: Option<Table> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, number, capacity, status, opened_at, waiter, total
        FROM mesas
        WHERE restaurant_id = $1 AND id = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Lock the table row for the rest of the transaction
pub async fn find_for_update(
    conn: &mut PgConnection,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Table>, BoxError> {
    let row: Option<Table> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, number, capacity, status, opened_at, waiter, total
        FROM mesas
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

/// Whether another table of the restaurant already uses `number`
pub async fn number_exists(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    number: i32,
    exclude_id: Option<i64>,
) -> Result<bool, BoxError> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM mesas
            WHERE restaurant_id = $1 AND number = $2 AND ($3::bigint IS NULL OR id <> $3)
        )
        "#,
    )
    .bind(restaurant_id)
    .bind(number)
    .bind(exclude_id)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

pub async fn create(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    data: &TableCreate,
) -> Result<Table, BoxError> {
    let row: Table = sqlx::query_as(
        r#"
        INSERT INTO mesas (id, restaurant_id, number, capacity, status, total)
        VALUES ($1, $2, $3, $4, $5, 0)
        RETURNING id, restaurant_id, number, capacity, status, opened_at, waiter, total
        "#,
    )
    .bind(super::snowflake_id())
    .bind(restaurant_id)
    .bind(data.number)
    .bind(data.capacity.unwrap_or(4))
    .bind(TableStatus::Free)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
    data: &TableUpdate,
) -> Result<Option<Table>, BoxError> {
    let row: Option<Table> = sqlx::query_as(
        r#"
        UPDATE mesas SET
            number = COALESCE($1, number),
            capacity = COALESCE($2, capacity)
        WHERE restaurant_id = $3 AND id = $4
        RETURNING id, restaurant_id, number, capacity, status, opened_at, waiter, total
        "#,
    )
    .bind(data.number)
    .bind(data.capacity)
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Delete a free table. Returns false when nothing was deleted.
pub async fn delete_free(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
) -> Result<bool, BoxError> {
    let rows = sqlx::query("DELETE FROM mesas WHERE restaurant_id = $1 AND id = $2 AND status = $3")
        .bind(restaurant_id)
        .bind(id)
        .bind(TableStatus::Free)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Mark a table occupied by a freshly opened tab
pub async fn occupy(
    db: impl PgExecutor<'_>,
    id: i64,
    waiter: Option<&str>,
    opened_at: i64,
    total: Decimal,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE mesas SET status = $1, opened_at = $2, waiter = $3, total = $4
        WHERE id = $5
        "#,
    )
    .bind(TableStatus::Occupied)
    .bind(opened_at)
    .bind(waiter)
    .bind(total)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Back to livre: no opening time, no waiter, zero total
pub async fn free(db: impl PgExecutor<'_>, id: i64) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE mesas SET status = $1, opened_at = NULL, waiter = NULL, total = 0
        WHERE id = $2
        "#,
    )
    .bind(TableStatus::Free)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_status(
    db: impl PgExecutor<'_>,
    id: i64,
    status: TableStatus,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE mesas SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn set_status_and_total(
    db: impl PgExecutor<'_>,
    id: i64,
    status: TableStatus,
    total: Decimal,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE mesas SET status = $1, total = $2 WHERE id = $3")
        .bind(status)
        .bind(total)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Running total = sum of the open tabs on the table
pub async fn sync_total(db: impl PgExecutor<'_>, id: i64) -> Result<Decimal, BoxError> {
    let (total,): (Decimal,) = sqlx::query_as(
        r#"
        UPDATE mesas SET total = COALESCE(
            (SELECT SUM(c.total) FROM comandas c WHERE c.table_id = $1 AND c.status = 'aberta'),
            0
        )
        WHERE id = $1
        RETURNING total
        "#,
    )
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(total)
}

/// All tables of a restaurant, locked for the rest of the transaction
pub async fn list_for_update(
    conn: &mut PgConnection,
    restaurant_id: i64,
) -> Result<Vec<Table>, BoxError> {
    let rows: Vec<Table> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, number, capacity, status, opened_at, waiter, total
        FROM mesas
        WHERE restaurant_id = $1
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
