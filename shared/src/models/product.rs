//! Product Model (produto)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub is_available: bool,
    /// Units in stock; `None` means stock is not tracked
    pub stock: Option<i32>,
}

impl Product {
    /// Whether `quantity` more units can be sold
    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock.is_none_or(|s| s >= quantity)
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub is_available: Option<bool>,
    pub stock: Option<i32>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub stock: Option<i32>,
    /// Stop tracking stock (sets it to NULL); wins over `stock`
    #[serde(default)]
    pub clear_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: Option<i32>) -> Product {
        Product {
            id: 1,
            restaurant_id: 1,
            name: "Caipirinha".to_string(),
            price: Decimal::new(2200, 2),
            category: "Bebidas".to_string(),
            is_available: true,
            stock,
        }
    }

    #[test]
    fn untracked_stock_never_runs_out() {
        assert!(product(None).has_stock_for(9999));
    }

    #[test]
    fn tracked_stock_limits_quantity() {
        let p = product(Some(3));
        assert!(p.has_stock_for(3));
        assert!(!p.has_stock_for(4));
    }
}
