//! Tab (comanda) actions
//!
//! Every item mutation ends with [`sync_totals`], which re-derives the tab
//! total from its items and mirrors it into the table row.

use rust_decimal::Decimal;
use serde_json::json;
use shared::billing::{self, BillBreakdown, BillOptions};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuditAction, BillRequest, ItemStatus, Tab, TabCancel, TabDetail, TabItem, TabItemCreate,
    TabItemStatusChange, TabItemUpdate, TabMove, TabOpen, TabStatus, TableStatus,
};
use sqlx::{PgConnection, PgPool};

use super::audit::{self, AuditRecord};
use crate::db;
use crate::error::ServiceResult;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_quantity};

// ── Helpers shared with checkout ──

/// Lock a tab and require it to be open
pub(crate) async fn lock_open_tab(
    conn: &mut PgConnection,
    restaurant_id: i64,
    tab_id: i64,
) -> ServiceResult<Tab> {
    let tab = db::tabs::find_for_update(conn, restaurant_id, tab_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TabNotFound).with_detail("tab_id", tab_id))?;
    if !tab.is_open() {
        return Err(AppError::tab_not_open(tab.id, tab.status.as_str()).into());
    }
    Ok(tab)
}

/// Re-derive the tab total from its items and mirror it into its table
pub(crate) async fn sync_totals(conn: &mut PgConnection, tab: &Tab) -> ServiceResult<Decimal> {
    let items = db::tab_items::list_by_tab(&mut *conn, tab.id).await?;
    let total = billing::subtotal(&items);
    db::tabs::set_total(&mut *conn, tab.id, total).await?;
    if let Some(table_id) = tab.table_id {
        db::tables::sync_total(&mut *conn, table_id).await?;
    }
    Ok(total)
}

/// Free a table unless another tab is still open on it
pub(crate) async fn release_table(conn: &mut PgConnection, table_id: i64) -> ServiceResult<()> {
    if db::tabs::find_open_for_table(&mut *conn, table_id).await?.is_some() {
        db::tables::sync_total(&mut *conn, table_id).await?;
    } else {
        db::tables::free(&mut *conn, table_id).await?;
    }
    Ok(())
}

/// Insert an item with the product's current name and price
pub(crate) async fn insert_item(
    conn: &mut PgConnection,
    restaurant_id: i64,
    tab_id: i64,
    data: &TabItemCreate,
) -> ServiceResult<TabItem> {
    validate_quantity(data.quantity)?;
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;

    let product = db::products::find_for_update(&mut *conn, restaurant_id, data.product_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", data.product_id)
        })?;
    if !product.is_available {
        return Err(AppError::new(ErrorCode::ProductUnavailable)
            .with_detail("product_id", product.id)
            .into());
    }
    if !product.has_stock_for(data.quantity) {
        return Err(AppError::new(ErrorCode::ProductOutOfStock)
            .with_detail("product_id", product.id)
            .with_detail("stock", product.stock.unwrap_or_default())
            .into());
    }
    db::products::adjust_stock(&mut *conn, product.id, -data.quantity).await?;

    let item = TabItem {
        id: db::snowflake_id(),
        tab_id,
        product_id: product.id,
        product_name: product.name,
        quantity: data.quantity,
        unit_price: product.price,
        note: data.note.clone().filter(|n| !n.trim().is_empty()),
        status: ItemStatus::Pending,
        created_at: db::now_millis(),
    };
    db::tab_items::insert(&mut *conn, &item).await?;
    Ok(item)
}

async fn lock_item(conn: &mut PgConnection, tab_id: i64, item_id: i64) -> ServiceResult<TabItem> {
    let item = db::tab_items::find_for_update(conn, tab_id, item_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TabItemNotFound).with_detail("item_id", item_id))?;
    Ok(item)
}

// ── Actions ──

pub async fn open_tab(pool: &PgPool, restaurant_id: i64, data: &TabOpen) -> ServiceResult<Tab> {
    validate_optional_text(&data.waiter, "waiter", MAX_NAME_LEN)?;
    validate_optional_text(&data.customer_name, "customer_name", MAX_NAME_LEN)?;
    let people = data.people.unwrap_or(1);
    if people < 1 {
        return Err(AppError::validation(format!("people must be at least 1, got {people}")).into());
    }

    let now = db::now_millis();
    let tab = Tab {
        id: db::snowflake_id(),
        restaurant_id,
        table_id: data.table_id,
        status: TabStatus::Open,
        customer_name: data.customer_name.clone(),
        people,
        total: Decimal::ZERO,
        opened_at: now,
        closed_at: None,
    };

    let mut tx = pool.begin().await?;

    if let Some(table_id) = data.table_id {
        let table = db::tables::find_for_update(&mut tx, restaurant_id, table_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id))?;
        if let Some(open) = db::tabs::find_open_for_table(&mut *tx, table.id).await? {
            return Err(AppError::new(ErrorCode::TableOccupied)
                .with_detail("table_id", table.id)
                .with_detail("tab_id", open.id)
                .into());
        }
        db::tables::occupy(&mut *tx, table.id, data.waiter.as_deref(), now, Decimal::ZERO).await?;
    }

    db::tabs::insert(&mut *tx, &tab).await?;
    tx.commit().await?;

    tracing::info!(tab_id = tab.id, table_id = ?tab.table_id, people, "Tab opened");
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabOpened, "tab")
            .resource(tab.id)
            .operator(data.waiter.as_deref())
            .details(json!({ "table_id": tab.table_id, "people": people })),
    )
    .await;

    Ok(tab)
}

pub async fn get_tab_detail(pool: &PgPool, restaurant_id: i64, tab_id: i64) -> ServiceResult<TabDetail> {
    let tab = db::tabs::find(pool, restaurant_id, tab_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TabNotFound).with_detail("tab_id", tab_id))?;
    let items = db::tab_items::list_by_tab(pool, tab.id).await?;
    let options = BillOptions {
        people: tab.people.max(1),
        ..Default::default()
    };
    let bill = billing::compute_bill(billing::subtotal(&items), &options);
    Ok(TabDetail { tab, items, bill })
}

pub async fn add_item(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    data: &TabItemCreate,
) -> ServiceResult<TabItem> {
    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;
    let item = insert_item(&mut tx, restaurant_id, tab.id, data).await?;
    let total = sync_totals(&mut tx, &tab).await?;

    // New items reopen a table waiting for its bill
    if let Some(table_id) = tab.table_id
        && let Some(table) = db::tables::find_for_update(&mut tx, restaurant_id, table_id).await?
        && table.status == TableStatus::AwaitingPayment
    {
        db::tables::set_status(&mut *tx, table_id, TableStatus::Occupied).await?;
    }
    tx.commit().await?;

    tracing::info!(tab_id, item_id = item.id, quantity = item.quantity, total = %total, "Item added");
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabItemAdded, "tab")
            .resource(tab_id)
            .details(json!({
                "item_id": item.id,
                "product_id": item.product_id,
                "quantity": item.quantity,
                "unit_price": item.unit_price,
            })),
    )
    .await;

    Ok(item)
}

pub async fn update_item(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    item_id: i64,
    data: &TabItemUpdate,
) -> ServiceResult<TabItem> {
    validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;
    if let Some(quantity) = data.quantity {
        validate_quantity(quantity)?;
    }

    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;
    let item = lock_item(&mut tx, tab.id, item_id).await?;

    let delta = data.quantity.map(|q| q - item.quantity).unwrap_or(0);
    if delta != 0 {
        if !item.status.is_editable() {
            return Err(AppError::new(ErrorCode::ItemNotEditable)
                .with_detail("item_id", item.id)
                .with_detail("status", item.status.as_str())
                .into());
        }
        if delta > 0 {
            let product = db::products::find_for_update(&mut tx, restaurant_id, item.product_id).await?;
            if let Some(product) = product
                && !product.has_stock_for(delta)
            {
                return Err(AppError::new(ErrorCode::ProductOutOfStock)
                    .with_detail("product_id", product.id)
                    .into());
            }
        }
        db::products::adjust_stock(&mut *tx, item.product_id, -delta).await?;
    }

    let updated = db::tab_items::update(&mut *tx, item.id, data.quantity, data.note_change()).await?;
    sync_totals(&mut tx, &tab).await?;
    tx.commit().await?;

    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabItemUpdated, "tab")
            .resource(tab_id)
            .details(json!({
                "item_id": item.id,
                "quantity_before": item.quantity,
                "quantity": updated.quantity,
            })),
    )
    .await;

    Ok(updated)
}

pub async fn set_item_status(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    item_id: i64,
    data: &TabItemStatusChange,
) -> ServiceResult<TabItem> {
    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;
    let item = lock_item(&mut tx, tab.id, item_id).await?;

    if !item.status.can_transition_to(data.status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidItemTransition,
            format!("Item cannot go from {} to {}", item.status, data.status),
        )
        .with_detail("item_id", item.id)
        .into());
    }

    if data.status == ItemStatus::Cancelled {
        db::products::adjust_stock(&mut *tx, item.product_id, item.quantity).await?;
    }
    let updated = db::tab_items::set_status(&mut *tx, item.id, data.status).await?;
    sync_totals(&mut tx, &tab).await?;
    tx.commit().await?;

    tracing::debug!(tab_id, item_id, from = %item.status, to = %updated.status, "Item status changed");
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabItemStatusChanged, "tab")
            .resource(tab_id)
            .details(json!({
                "item_id": item.id,
                "from": item.status,
                "to": updated.status,
            })),
    )
    .await;

    Ok(updated)
}

pub async fn remove_item(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    item_id: i64,
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;
    let item = lock_item(&mut tx, tab.id, item_id).await?;

    if !item.status.is_editable() {
        return Err(AppError::new(ErrorCode::ItemNotEditable)
            .with_detail("item_id", item.id)
            .with_detail("status", item.status.as_str())
            .into());
    }

    db::products::adjust_stock(&mut *tx, item.product_id, item.quantity).await?;
    db::tab_items::delete(&mut *tx, item.id).await?;
    sync_totals(&mut tx, &tab).await?;
    tx.commit().await?;

    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabItemRemoved, "tab")
            .resource(tab_id)
            .details(json!({
                "item_id": item.id,
                "product_id": item.product_id,
                "quantity": item.quantity,
            })),
    )
    .await;

    Ok(())
}

/// Move the tab's table to aguardando; repeating the request is a no-op
pub async fn request_bill(pool: &PgPool, restaurant_id: i64, tab_id: i64) -> ServiceResult<TabDetail> {
    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;
    let table_id = tab
        .table_id
        .ok_or_else(|| AppError::invalid_request("Counter tabs have no table"))?;

    let items = db::tab_items::list_by_tab(&mut *tx, tab.id).await?;
    if !items.iter().any(|i| i.status.is_billable()) {
        return Err(AppError::new(ErrorCode::TabEmpty).with_detail("tab_id", tab.id).into());
    }

    let table = db::tables::find_for_update(&mut tx, restaurant_id, table_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound).with_detail("table_id", table_id))?;
    if !needs_bill_transition(table.status)? {
        tx.rollback().await?;
        tracing::debug!(tab_id, table_id, "Bill already requested");
        return get_tab_detail(pool, restaurant_id, tab_id).await;
    }
    db::tables::set_status(&mut *tx, table.id, TableStatus::AwaitingPayment).await?;
    tx.commit().await?;

    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabBillRequested, "tab")
            .resource(tab_id)
            .details(json!({ "table_id": table_id })),
    )
    .await;

    get_tab_detail(pool, restaurant_id, tab_id).await
}

/// Bill for the tab under `request`, without persisting anything
pub async fn preview_bill(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    request: &BillRequest,
) -> ServiceResult<BillBreakdown> {
    let restaurant = db::restaurants::find(pool, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    let tab = db::tabs::find(pool, restaurant_id, tab_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TabNotFound).with_detail("tab_id", tab_id))?;
    let items = db::tab_items::list_by_tab(pool, tab.id).await?;

    let options = request.to_options(restaurant.service_fee_percent, restaurant.cover_charge, tab.people);
    options.validate()?;
    Ok(billing::compute_bill(billing::subtotal(&items), &options))
}

/// Move an open tab to a free table
pub async fn move_tab(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    data: &TabMove,
) -> ServiceResult<Tab> {
    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;

    if tab.table_id == Some(data.target_table_id) {
        return Err(AppError::invalid_request("Tab is already on this table").into());
    }

    let source = match tab.table_id {
        Some(id) => db::tables::find_for_update(&mut tx, restaurant_id, id).await?,
        None => None,
    };
    let target = db::tables::find_for_update(&mut tx, restaurant_id, data.target_table_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TableNotFound).with_detail("table_id", data.target_table_id)
        })?;
    if target.status != TableStatus::Free
        || db::tabs::find_open_for_table(&mut *tx, target.id).await?.is_some()
    {
        return Err(AppError::new(ErrorCode::TableOccupied)
            .with_detail("table_id", target.id)
            .into());
    }

    db::tabs::set_table(&mut *tx, tab.id, target.id).await?;

    let (waiter, opened_at) = match &source {
        Some(s) => (s.waiter.clone(), s.opened_at.unwrap_or(tab.opened_at)),
        None => (None, tab.opened_at),
    };
    db::tables::occupy(&mut *tx, target.id, waiter.as_deref(), opened_at, tab.total).await?;
    if let Some(source) = &source {
        release_table(&mut tx, source.id).await?;
    }
    tx.commit().await?;

    tracing::info!(tab_id, from = ?tab.table_id, to = target.id, "Tab moved");
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabMoved, "tab")
            .resource(tab_id)
            .details(json!({ "from_table_id": tab.table_id, "to_table_id": target.id })),
    )
    .await;

    Ok(Tab {
        table_id: Some(target.id),
        ..tab
    })
}

/// Cancel an open tab: items cancelled with stock restored, table freed
pub async fn cancel_tab(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    data: &TabCancel,
) -> ServiceResult<Tab> {
    validate_optional_text(&data.reason, "reason", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;

    let cancelled = db::tab_items::cancel_all(&mut *tx, tab.id).await?;
    for item in &cancelled {
        db::products::adjust_stock(&mut *tx, item.product_id, item.quantity).await?;
    }

    let now = db::now_millis();
    if !db::tabs::finish(&mut *tx, tab.id, TabStatus::Cancelled, Decimal::ZERO, now).await? {
        return Err(AppError::tab_not_open(tab.id, tab.status.as_str()).into());
    }
    if let Some(table_id) = tab.table_id {
        release_table(&mut tx, table_id).await?;
    }
    tx.commit().await?;

    tracing::info!(tab_id, items = cancelled.len(), "Tab cancelled");
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabCancelled, "tab")
            .resource(tab_id)
            .operator(data.operator.as_deref())
            .details(json!({
                "reason": data.reason,
                "total_before": tab.total,
                "items_cancelled": cancelled.len(),
            })),
    )
    .await;

    Ok(Tab {
        status: TabStatus::Cancelled,
        total: Decimal::ZERO,
        closed_at: Some(now),
        ..tab
    })
}

pub(crate) fn invalid_table_transition(from: TableStatus, to: TableStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidTableTransition,
        format!("Table cannot go from {from} to {to}"),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str())
}

/// Whether requesting the bill moves a table in `status` to aguardando
fn needs_bill_transition(status: TableStatus) -> Result<bool, AppError> {
    match status {
        TableStatus::AwaitingPayment => Ok(false),
        s if s.can_transition_to(TableStatus::AwaitingPayment) => Ok(true),
        s => Err(invalid_table_transition(s, TableStatus::AwaitingPayment)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_request_from_each_table_status() {
        assert!(needs_bill_transition(TableStatus::Occupied).unwrap());
        assert!(!needs_bill_transition(TableStatus::AwaitingPayment).unwrap());

        let err = needs_bill_transition(TableStatus::Free).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTableTransition);
    }
}
