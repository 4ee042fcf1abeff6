//! Restaurant Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Restaurant entity (restaurante)
///
/// Carries the billing defaults used at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// Service fee rate in percent (10 = 10%)
    pub service_fee_percent: Decimal,
    /// Couvert charged per person
    pub cover_charge: Decimal,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub service_fee_percent: Option<Decimal>,
    pub cover_charge: Option<Decimal>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub service_fee_percent: Option<Decimal>,
    pub cover_charge: Option<Decimal>,
    pub is_active: Option<bool>,
}
