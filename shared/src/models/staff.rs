//! Staff: profiles and their roles per restaurant

use serde::{Deserialize, Serialize};

/// Staff role at a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum Role {
    Admin,
    Gerente,
    Garcom,
    Caixa,
    Cozinha,
}

/// Profile row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// Role assignment row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserRole {
    pub id: i64,
    pub user_id: String,
    pub restaurant_id: i64,
    pub role: Role,
}

/// Profile joined with its role at one restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Assign role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssign {
    pub user_id: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Garcom).unwrap(), "\"garcom\"");
        let role: Role = serde_json::from_str("\"cozinha\"").unwrap();
        assert_eq!(role, Role::Cozinha);
    }
}
