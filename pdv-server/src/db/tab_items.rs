//! Tab item (item de comanda) database operations

use shared::models::{ItemStatus, TabItem};
use sqlx::{PgConnection, PgExecutor};

use super::BoxError;

pub async fn list_by_tab(db: impl PgExecutor<'_>, tab_id: i64) -> Result<Vec<TabItem>, BoxError> {
    let rows: Vec<TabItem> = sqlx::query_as(
        r#"
        SELECT id, tab_id, product_id, product_name, quantity, unit_price, note, status, created_at
        FROM itens_comanda
        WHERE tab_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(tab_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Items of every open tab of a restaurant
pub async fn list_for_open_tabs(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Vec<TabItem>, BoxError> {
    let rows: Vec<TabItem> = sqlx::query_as(
        r#"
        SELECT i.id, i.tab_id, i.product_id, i.product_name, i.quantity, i.unit_price,
               i.note, i.status, i.created_at
        FROM itens_comanda i
        JOIN comandas c ON c.id = i.tab_id
        WHERE c.restaurant_id = $1 AND c.status = 'aberta'
        ORDER BY i.tab_id, i.created_at
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Lock an item row for the rest of the transaction
pub async fn find_for_update(
    conn: &mut PgConnection,
    tab_id: i64,
    id: i64,
) -> Result<Option<TabItem>, BoxError> {
    let row: Option<TabItem> = sqlx::query_as(
        r#"
        SELECT id, tab_id, product_id, product_name, quantity, unit_price, note, status, created_at
        FROM itens_comanda
        WHERE tab_id = $1 AND id = $2
        FOR UPDATE
        "#,
    )
    .bind(tab_id)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn insert(db: impl PgExecutor<'_>, item: &TabItem) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO itens_comanda (id, tab_id, product_id, product_name, quantity, unit_price, note, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(item.id)
    .bind(item.tab_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(&item.note)
    .bind(item.status)
    .bind(item.created_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Change quantity and/or note; `note` is `None` to keep, `Some(None)` to clear
pub async fn update(
    db: impl PgExecutor<'_>,
    id: i64,
    quantity: Option<i32>,
    note: Option<Option<&str>>,
) -> Result<TabItem, BoxError> {
    let row: TabItem = sqlx::query_as(
        r#"
        UPDATE itens_comanda SET
            quantity = COALESCE($1, quantity),
            note = CASE WHEN $2 THEN $3 ELSE note END
        WHERE id = $4
        RETURNING id, tab_id, product_id, product_name, quantity, unit_price, note, status, created_at
        "#,
    )
    .bind(quantity)
    .bind(note.is_some())
    .bind(note.flatten())
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn set_status(
    db: impl PgExecutor<'_>,
    id: i64,
    status: ItemStatus,
) -> Result<TabItem, BoxError> {
    let row: TabItem = sqlx::query_as(
        r#"
        UPDATE itens_comanda SET status = $1
        WHERE id = $2
        RETURNING id, tab_id, product_id, product_name, quantity, unit_price, note, status, created_at
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: impl PgExecutor<'_>, id: i64) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM itens_comanda WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Cancel every live item of a tab, returning the rows that changed
pub async fn cancel_all(db: impl PgExecutor<'_>, tab_id: i64) -> Result<Vec<TabItem>, BoxError> {
    let rows: Vec<TabItem> = sqlx::query_as(
        r#"
        UPDATE itens_comanda SET status = $1
        WHERE tab_id = $2 AND status <> $1
        RETURNING id, tab_id, product_id, product_name, quantity, unit_price, note, status, created_at
        "#,
    )
    .bind(ItemStatus::Cancelled)
    .bind(tab_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
