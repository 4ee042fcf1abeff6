//! Apply reconciliation plans to the database

use serde_json::json;
use shared::billing::{self, ReconciliationPlan};
use shared::error::{AppError, ErrorCode};
use shared::models::AuditAction;
use sqlx::PgPool;

use super::audit::{self, AuditRecord};
use crate::db;
use crate::error::ServiceResult;

/// Plan and apply the corrections for one restaurant in a single transaction
pub async fn reconcile_restaurant(
    pool: &PgPool,
    restaurant_id: i64,
) -> ServiceResult<ReconciliationPlan> {
    let mut tx = pool.begin().await?;
    if !db::restaurants::lock(&mut tx, restaurant_id).await? {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    }

    // Tab before table, the same order every tab action locks in
    let tabs = db::tabs::list_open_for_update(&mut tx, restaurant_id).await?;
    let tables = db::tables::list_for_update(&mut tx, restaurant_id).await?;
    let items = db::tab_items::list_for_open_tabs(&mut *tx, restaurant_id).await?;

    let plan = billing::reconcile(&tables, &tabs, &items);
    if plan.is_empty() {
        tx.rollback().await?;
        tracing::debug!(restaurant_id, "Reconciliation found nothing to fix");
        return Ok(plan);
    }

    for c in &plan.tabs {
        tracing::warn!(
            restaurant_id,
            tab_id = c.tab_id,
            stored = %c.stored_total,
            actual = %c.total,
            "Tab total corrected"
        );
        db::tabs::set_total(&mut *tx, c.tab_id, c.total).await?;
    }
    for c in &plan.tables {
        tracing::warn!(
            restaurant_id,
            table_id = c.table_id,
            stored_status = %c.stored_status,
            status = %c.status,
            stored_total = %c.stored_total,
            total = %c.total,
            "Table corrected"
        );
        if c.frees_table() {
            db::tables::free(&mut *tx, c.table_id).await?;
        } else {
            db::tables::set_status_and_total(&mut *tx, c.table_id, c.status, c.total).await?;
        }
    }
    tx.commit().await?;

    tracing::info!(restaurant_id, corrections = plan.len(), "Reconciliation applied");
    audit::record(
        pool,
        AuditRecord::new(restaurant_id, AuditAction::Reconciled, "restaurant")
            .resource(restaurant_id)
            .details(json!(plan)),
    )
    .await;

    Ok(plan)
}

/// Reconcile every active restaurant; one failure does not stop the others
pub async fn reconcile_all(pool: &PgPool) -> ServiceResult<usize> {
    let ids = db::restaurants::list_active_ids(pool).await?;
    let mut corrections = 0;
    for restaurant_id in ids {
        match reconcile_restaurant(pool, restaurant_id).await {
            Ok(plan) => corrections += plan.len(),
            Err(e) => {
                let err: AppError = e.into();
                tracing::error!(restaurant_id, error = %err, "Reconciliation failed");
            }
        }
    }
    Ok(corrections)
}

#[cfg(test)]
mod tests {
    /// Locks taken by `reconcile_restaurant`, in the order they are taken
    fn lock_calls() -> Vec<&'static str> {
        let source = include_str!("reconcile.rs");
        let body = source
            .split("pub async fn reconcile_restaurant")
            .nth(1)
            .and_then(|rest| rest.split("pub async fn reconcile_all").next())
            .unwrap_or_default();
        let mut calls: Vec<(usize, &'static str)> = [
            "restaurants::lock(",
            "tabs::list_open_for_update(",
            "tables::list_for_update(",
        ]
        .into_iter()
        .filter_map(|call| body.find(call).map(|at| (at, call)))
        .collect();
        calls.sort();
        calls.into_iter().map(|(_, call)| call).collect()
    }

    #[test]
    fn locks_restaurant_then_tabs_then_tables() {
        assert_eq!(
            lock_calls(),
            ["restaurants::lock(", "tabs::list_open_for_update(", "tables::list_for_update("]
        );
    }
}
