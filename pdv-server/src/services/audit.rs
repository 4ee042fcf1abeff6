//! Best-effort audit trail

use serde_json::Value;
use shared::models::AuditAction;
use sqlx::PgPool;

use crate::db;

/// One audit entry to write
pub struct AuditRecord<'a> {
    pub restaurant_id: i64,
    pub action: AuditAction,
    pub resource_type: &'static str,
    pub resource_id: Option<i64>,
    pub operator: Option<&'a str>,
    pub details: Value,
}

impl<'a> AuditRecord<'a> {
    pub fn new(restaurant_id: i64, action: AuditAction, resource_type: &'static str) -> Self {
        Self {
            restaurant_id,
            action,
            resource_type,
            resource_id: None,
            operator: None,
            details: Value::Null,
        }
    }

    pub fn resource(mut self, id: i64) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn operator(mut self, operator: Option<&'a str>) -> Self {
        self.operator = operator;
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Write an audit entry. The action it describes is already committed, so a
/// failure here is logged and swallowed.
pub async fn record(pool: &PgPool, entry: AuditRecord<'_>) {
    if let Err(e) = db::audit::insert(
        pool,
        entry.restaurant_id,
        entry.action,
        entry.resource_type,
        entry.resource_id,
        entry.operator,
        &entry.details,
    )
    .await
    {
        tracing::warn!(
            action = %entry.action,
            resource_type = entry.resource_type,
            resource_id = ?entry.resource_id,
            error = %e,
            "Failed to write audit log"
        );
    }
}
