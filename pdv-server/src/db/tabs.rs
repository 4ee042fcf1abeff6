//! Tab (comanda) database operations

use rust_decimal::Decimal;
use shared::models::{Tab, TabStatus};
use sqlx::{PgConnection, PgExecutor};

use super::BoxError;

pub async fn list(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    status: Option<TabStatus>,
) -> Result<Vec<Tab>, BoxError> {
    let rows: Vec<Tab> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, table_id, status, customer_name, people, total, opened_at, closed_at
        FROM comandas
        WHERE restaurant_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY opened_at DESC
        "#,
    )
    .bind(restaurant_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Tab>, BoxError> {
    let row: Option<Tab> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, table_id, status, customer_name, people, total, opened_at, closed_at
        FROM comandas
        WHERE restaurant_id = $1 AND id = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Lock the tab row for the rest of the transaction
pub async fn find_for_update(
    conn: &mut PgConnection,
    restaurant_id: i64,
    id: i64,
) -> Result<Option<Tab>, BoxError> {
    let row: Option<Tab> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, table_id, status, customer_name, people, total, opened_at, closed_at
        FROM comandas
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

/// The open tab on a table, if any
pub async fn find_open_for_table(
    db: impl PgExecutor<'_>,
    table_id: i64,
) -> Result<Option<Tab>, BoxError> {
    let row: Option<Tab> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, table_id, status, customer_name, people, total, opened_at, closed_at
        FROM comandas
        WHERE table_id = $1 AND status = 'aberta'
        ORDER BY opened_at
        LIMIT 1
        "#,
    )
    .bind(table_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Open tabs of a restaurant, locked in id order for the rest of the transaction
///
/// Tabs are always locked before tables; callers that need both must call
/// this before [`super::tables::list_for_update`].
pub async fn list_open_for_update(
    conn: &mut PgConnection,
    restaurant_id: i64,
) -> Result<Vec<Tab>, BoxError> {
    let rows: Vec<Tab> = sqlx::query_as(LIST_OPEN_FOR_UPDATE).bind(restaurant_id).fetch_all(conn).await?;
    Ok(rows)
}

const LIST_OPEN_FOR_UPDATE: &str = r#"
    SELECT id, restaurant_id, table_id, status, customer_name, people, total, opened_at, closed_at
    FROM comandas
    WHERE restaurant_id = $1 AND status = 'aberta'
    ORDER BY id
    FOR UPDATE
"#;

pub async fn insert(db: impl PgExecutor<'_>, tab: &Tab) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO comandas (id, restaurant_id, table_id, status, customer_name, people, total, opened_at, closed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(tab.id)
    .bind(tab.restaurant_id)
    .bind(tab.table_id)
    .bind(tab.status)
    .bind(&tab.customer_name)
    .bind(tab.people)
    .bind(tab.total)
    .bind(tab.opened_at)
    .bind(tab.closed_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_total(db: impl PgExecutor<'_>, id: i64, total: Decimal) -> Result<(), BoxError> {
    sqlx::query("UPDATE comandas SET total = $1 WHERE id = $2")
        .bind(total)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn set_table(db: impl PgExecutor<'_>, id: i64, table_id: i64) -> Result<(), BoxError> {
    sqlx::query("UPDATE comandas SET table_id = $1 WHERE id = $2 AND status = 'aberta'")
        .bind(table_id)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Move an open tab to a terminal status. Returns false if it was no longer open.
pub async fn finish(
    db: impl PgExecutor<'_>,
    id: i64,
    status: TabStatus,
    total: Decimal,
    closed_at: i64,
) -> Result<bool, BoxError> {
    let rows = sqlx::query(
        r#"
        UPDATE comandas SET status = $1, total = $2, closed_at = $3
        WHERE id = $4 AND status = 'aberta'
        "#,
    )
    .bind(status)
    .bind(total)
    .bind(closed_at)
    .bind(id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_tabs_are_locked_in_id_order() {
        let sql = LIST_OPEN_FOR_UPDATE.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(sql.contains("status = 'aberta'"));
        assert!(sql.ends_with("ORDER BY id FOR UPDATE"));
    }
}
