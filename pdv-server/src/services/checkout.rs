//! Checkout: turning an open tab into a sale
//!
//! Settlement runs in one transaction: bill, sale row, cash movement,
//! expected balance, tab closure and table release commit together.

use rust_decimal::Decimal;
use serde_json::json;
use shared::billing::{self, BillBreakdown};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuditAction, BillRequest, CashMovement, CheckoutRequest, CounterSaleRequest, MovementKind,
    PaymentMethod, Sale, Tab, TabStatus,
};
use sqlx::{PgConnection, PgPool};

use super::audit::{self, AuditRecord};
use super::tabs::{insert_item, lock_open_tab, release_table, sync_totals};
use crate::db;
use crate::error::ServiceResult;
use crate::validation::{MAX_NAME_LEN, validate_optional_text};

/// Settle a locked open tab
async fn settle(
    conn: &mut PgConnection,
    tab: &Tab,
    request: &BillRequest,
    payment_method: PaymentMethod,
) -> ServiceResult<(Sale, BillBreakdown)> {
    let restaurant = db::restaurants::find(&mut *conn, tab.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let items = db::tab_items::list_by_tab(&mut *conn, tab.id).await?;
    if !items.iter().any(|i| i.status.is_billable()) {
        return Err(AppError::new(ErrorCode::TabEmpty).with_detail("tab_id", tab.id).into());
    }

    let register = db::cash_registers::find_open_for_update(&mut *conn, tab.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CashRegisterNotOpen))?;

    let options =
        request.to_options(restaurant.service_fee_percent, restaurant.cover_charge, tab.people);
    options.validate()?;
    let bill = billing::compute_bill(billing::subtotal(&items), &options);
    if bill.total < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::NegativeTotal)
            .with_detail("subtotal", bill.subtotal.to_string())
            .with_detail("discount", bill.discount.to_string())
            .with_detail("total", bill.total.to_string())
            .into());
    }

    let now = db::now_millis();
    let sale = Sale {
        id: db::snowflake_id(),
        restaurant_id: tab.restaurant_id,
        tab_id: tab.id,
        table_id: tab.table_id,
        cash_register_id: register.id,
        subtotal: bill.subtotal,
        discount: bill.discount,
        service_fee: bill.service_fee,
        cover_charge: bill.cover_charge,
        total: bill.total,
        payment_method,
        created_at: now,
    };
    db::sales::insert(&mut *conn, &sale).await?;

    let movement = CashMovement {
        id: db::snowflake_id(),
        cash_register_id: register.id,
        kind: MovementKind::Sale,
        payment_method,
        amount: bill.total,
        description: Some(format!("Comanda {}", tab.id)),
        sale_id: Some(sale.id),
        created_at: now,
    };
    db::cash_registers::insert_movement(&mut *conn, &movement).await?;

    let effect = movement.kind.balance_effect(payment_method, bill.total);
    if !effect.is_zero() {
        db::cash_registers::adjust_expected(&mut *conn, register.id, effect).await?;
    }

    if !db::tabs::finish(&mut *conn, tab.id, TabStatus::Closed, bill.total, now).await? {
        return Err(AppError::tab_not_open(tab.id, tab.status.as_str()).into());
    }
    if let Some(table_id) = tab.table_id {
        release_table(conn, table_id).await?;
    }

    Ok((sale, bill))
}

pub async fn checkout_tab(
    pool: &PgPool,
    restaurant_id: i64,
    tab_id: i64,
    request: &CheckoutRequest,
) -> ServiceResult<Sale> {
    validate_optional_text(&request.operator, "operator", MAX_NAME_LEN)?;

    let mut tx = pool.begin().await?;
    let tab = lock_open_tab(&mut tx, restaurant_id, tab_id).await?;
    let (sale, bill) = settle(&mut tx, &tab, &request.bill, request.payment_method).await?;
    tx.commit().await?;

    tracing::info!(
        tab_id,
        sale_id = sale.id,
        payment_method = %sale.payment_method,
        total = %sale.total,
        "Tab checked out"
    );
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::TabCheckedOut, "tab")
            .resource(tab_id)
            .operator(request.operator.as_deref())
            .details(json!({ "sale_id": sale.id, "bill": bill, "payment_method": sale.payment_method })),
    )
    .await;

    Ok(sale)
}

/// PDV sale without a table: a tab is created, filled and settled at once
pub async fn counter_sale(
    pool: &PgPool,
    restaurant_id: i64,
    request: &CounterSaleRequest,
) -> ServiceResult<Sale> {
    validate_optional_text(&request.operator, "operator", MAX_NAME_LEN)?;
    validate_optional_text(&request.customer_name, "customer_name", MAX_NAME_LEN)?;
    if request.items.is_empty() {
        return Err(AppError::with_message(ErrorCode::TabEmpty, "Counter sale has no items").into());
    }

    let now = db::now_millis();
    let tab = Tab {
        id: db::snowflake_id(),
        restaurant_id,
        table_id: None,
        status: TabStatus::Open,
        customer_name: request.customer_name.clone(),
        people: 1,
        total: Decimal::ZERO,
        opened_at: now,
        closed_at: None,
    };

    let mut tx = pool.begin().await?;
    db::tabs::insert(&mut *tx, &tab).await?;
    for item in &request.items {
        insert_item(&mut tx, restaurant_id, tab.id, item).await?;
    }
    sync_totals(&mut tx, &tab).await?;
    let (sale, bill) = settle(&mut tx, &tab, &request.bill, request.payment_method).await?;
    tx.commit().await?;

    tracing::info!(
        tab_id = tab.id,
        sale_id = sale.id,
        payment_method = %sale.payment_method,
        total = %sale.total,
        "Counter sale"
    );
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::CounterSale, "sale")
            .resource(sale.id)
            .operator(request.operator.as_deref())
            .details(json!({ "tab_id": tab.id, "bill": bill, "items": request.items.len() })),
    )
    .await;

    Ok(sale)
}
