//! Audit log operations

use shared::models::{AuditAction, AuditLog};
use sqlx::PgExecutor;

use super::BoxError;

/// Write an audit log entry
pub async fn insert(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    action: AuditAction,
    resource_type: &str,
    resource_id: Option<i64>,
    operator: Option<&str>,
    details: &serde_json::Value,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, restaurant_id, action, resource_type, resource_id, operator, details, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(super::snowflake_id())
    .bind(restaurant_id)
    .bind(action)
    .bind(resource_type)
    .bind(resource_id)
    .bind(operator)
    .bind(details)
    .bind(super::now_millis())
    .execute(db)
    .await?;
    Ok(())
}

/// Audit entries of a restaurant, newest first
pub async fn list(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditLog>, BoxError> {
    let rows: Vec<AuditLog> = sqlx::query_as(
        r#"
        SELECT id, restaurant_id, action, resource_type, resource_id, operator, details, created_at
        FROM audit_logs
        WHERE restaurant_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(restaurant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
