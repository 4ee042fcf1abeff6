//! Staff (profiles + user_roles) database operations

use shared::models::{Profile, Role, StaffMember, UserRole};
use sqlx::{PgConnection, PgExecutor};

use super::BoxError;

pub async fn list(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    role: Option<Role>,
) -> Result<Vec<StaffMember>, BoxError> {
    let rows: Vec<StaffMember> = sqlx::query_as(
        r#"
        SELECT p.id AS user_id, p.full_name, p.email, r.role
        FROM user_roles r
        JOIN profiles p ON p.id = r.user_id
        WHERE r.restaurant_id = $1 AND ($2::text IS NULL OR r.role = $2)
        ORDER BY p.full_name
        "#,
    )
    .bind(restaurant_id)
    .bind(role)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_profile(db: impl PgExecutor<'_>, user_id: &str) -> Result<Option<Profile>, BoxError> {
    let row: Option<Profile> =
        sqlx::query_as("SELECT id, full_name, email FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    Ok(row)
}

/// Set the role of a user at a restaurant, inserting the assignment if needed
pub async fn upsert_role(
    conn: &mut PgConnection,
    restaurant_id: i64,
    user_id: &str,
    role: Role,
) -> Result<UserRole, BoxError> {
    let updated: Option<UserRole> = sqlx::query_as(
        r#"
        UPDATE user_roles SET role = $1
        WHERE restaurant_id = $2 AND user_id = $3
        RETURNING id, user_id, restaurant_id, role
        "#,
    )
    .bind(role)
    .bind(restaurant_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(row) = updated {
        return Ok(row);
    }

    let row: UserRole = sqlx::query_as(
        r#"
        INSERT INTO user_roles (id, user_id, restaurant_id, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, restaurant_id, role
        "#,
    )
    .bind(super::snowflake_id())
    .bind(user_id)
    .bind(restaurant_id)
    .bind(role)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row)
}

pub async fn delete_role(
    db: impl PgExecutor<'_>,
    restaurant_id: i64,
    user_id: &str,
) -> Result<bool, BoxError> {
    let rows = sqlx::query("DELETE FROM user_roles WHERE restaurant_id = $1 AND user_id = $2")
        .bind(restaurant_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}
