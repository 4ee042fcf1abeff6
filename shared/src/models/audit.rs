//! Audit log model
//!
//! Every state-changing action leaves one row in `audit_logs`.

use serde::{Deserialize, Serialize};

/// Audited action (enum, not free text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "snake_case"))]
pub enum AuditAction {
    // Restaurant
    RestaurantCreated,
    RestaurantUpdated,

    // Tables
    TableCreated,
    TableUpdated,
    TableDeleted,
    TableStatusChanged,

    // Products
    ProductCreated,
    ProductUpdated,
    ProductDeleted,

    // Tabs
    TabOpened,
    TabItemAdded,
    TabItemUpdated,
    TabItemStatusChanged,
    TabItemRemoved,
    TabBillRequested,
    TabMoved,
    TabCancelled,
    TabCheckedOut,
    CounterSale,

    // Cash register
    CashRegisterOpened,
    CashRegisterClosed,
    CashDeposit,
    CashWithdrawal,

    // Staff
    RoleAssigned,
    RoleRemoved,

    // Maintenance
    Reconciled,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Audit log row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditLog {
    pub id: i64,
    pub restaurant_id: i64,
    pub action: AuditAction,
    /// e.g. "tab", "table", "cash_register"
    pub resource_type: String,
    pub resource_id: Option<i64>,
    pub operator: Option<String>,
    pub details: serde_json::Value,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AuditAction::TabCheckedOut).unwrap(),
            "\"tab_checked_out\""
        );
        let action: AuditAction = serde_json::from_str("\"cash_withdrawal\"").unwrap();
        assert_eq!(action, AuditAction::CashWithdrawal);
    }
}
