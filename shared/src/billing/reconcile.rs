//! Reconciliation of table, tab and item state
//!
//! Table totals and statuses are denormalized copies of what the open tabs
//! and their items say. When two requests race, the copies drift. The
//! planner below compares them and lists the corrections needed; it never
//! touches storage.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::subtotal;
use crate::models::{Tab, TabItem, Table, TableStatus};

/// Tab whose stored total disagrees with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabCorrection {
    pub tab_id: i64,
    pub stored_total: Decimal,
    pub total: Decimal,
}

/// Table whose status or total disagrees with its open tabs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCorrection {
    pub table_id: i64,
    pub stored_status: TableStatus,
    pub status: TableStatus,
    pub stored_total: Decimal,
    pub total: Decimal,
}

impl TableCorrection {
    /// Freed tables also lose their opened_at and waiter
    pub fn frees_table(&self) -> bool {
        self.status == TableStatus::Free && self.stored_status != TableStatus::Free
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    pub tabs: Vec<TabCorrection>,
    pub tables: Vec<TableCorrection>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty() && self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tabs.len() + self.tables.len()
    }
}

/// Plan the corrections for one restaurant.
///
/// `tabs` may contain closed or cancelled tabs; only open ones count.
/// `items` are the items of those tabs.
pub fn reconcile(tables: &[Table], tabs: &[Tab], items: &[TabItem]) -> ReconciliationPlan {
    let mut items_by_tab: HashMap<i64, Vec<TabItem>> = HashMap::new();
    for item in items {
        items_by_tab.entry(item.tab_id).or_default().push(item.clone());
    }

    let mut plan = ReconciliationPlan::default();
    let mut table_totals: HashMap<i64, Decimal> = HashMap::new();

    for tab in tabs.iter().filter(|t| t.is_open()) {
        let total = items_by_tab
            .get(&tab.id)
            .map(|lines| subtotal(lines))
            .unwrap_or(Decimal::ZERO);

        if total != tab.total {
            plan.tabs.push(TabCorrection {
                tab_id: tab.id,
                stored_total: tab.total,
                total,
            });
        }

        if let Some(table_id) = tab.table_id {
            *table_totals.entry(table_id).or_default() += total;
        }
    }

    for table in tables {
        let (status, total) = match table_totals.get(&table.id) {
            None => (TableStatus::Free, Decimal::ZERO),
            Some(total) if table.status == TableStatus::Free => (TableStatus::Occupied, *total),
            Some(total) => (table.status, *total),
        };

        if status != table.status || total != table.total {
            plan.tables.push(TableCorrection {
                table_id: table.id,
                stored_status: table.status,
                status,
                stored_total: table.total,
                total,
            });
        }
    }

    plan
}
