//! Cash Register Model (caixa) and cash movements

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sale::PaymentMethod;

/// Cash register session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text"))]
pub enum CashRegisterStatus {
    #[default]
    #[serde(rename = "aberto")]
    #[cfg_attr(feature = "db", sqlx(rename = "aberto"))]
    Open,
    #[serde(rename = "fechado")]
    #[cfg_attr(feature = "db", sqlx(rename = "fechado"))]
    Closed,
}

/// Cash register session entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashRegister {
    pub id: i64,
    pub restaurant_id: i64,
    pub operator: String,
    pub status: CashRegisterStatus,
    pub opening_balance: Decimal,
    /// Cash that should be in the drawer right now
    pub expected_balance: Decimal,
    /// Counted cash at close
    pub closing_balance: Option<Decimal>,
    /// closing_balance - expected_balance
    pub difference: Option<Decimal>,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
    pub note: Option<String>,
}

/// Movement kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text"))]
pub enum MovementKind {
    /// Payment received at checkout
    #[serde(rename = "venda")]
    #[cfg_attr(feature = "db", sqlx(rename = "venda"))]
    Sale,
    /// Cash added to the drawer
    #[serde(rename = "suprimento")]
    #[cfg_attr(feature = "db", sqlx(rename = "suprimento"))]
    Deposit,
    /// Cash taken out of the drawer
    #[serde(rename = "sangria")]
    #[cfg_attr(feature = "db", sqlx(rename = "sangria"))]
    Withdrawal,
}

impl MovementKind {
    /// Signed effect of a movement on the expected drawer balance
    pub fn balance_effect(&self, method: PaymentMethod, amount: Decimal) -> Decimal {
        match self {
            Self::Sale if method.is_cash() => amount,
            Self::Sale => Decimal::ZERO,
            Self::Deposit => amount,
            Self::Withdrawal => -amount,
        }
    }
}

/// Cash movement entity (movimentação de caixa)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: i64,
    pub cash_register_id: i64,
    pub kind: MovementKind,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub description: Option<String>,
    pub sale_id: Option<i64>,
    pub created_at: i64,
}

/// Open cash register payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegisterOpen {
    pub operator: String,
    pub opening_balance: Decimal,
    pub note: Option<String>,
}

/// Close cash register payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegisterClose {
    pub closing_balance: Decimal,
    pub note: Option<String>,
}

/// Manual movement payload (suprimento / sangria)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashMovementCreate {
    pub kind: MovementKind,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Totals for one payment method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentMethodTotal {
    pub payment_method: PaymentMethod,
    pub count: i64,
    pub total: Decimal,
}

/// Session summary shown when closing the register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegisterSummary {
    pub cash_register: CashRegister,
    pub sales_count: i64,
    pub sales_total: Decimal,
    pub by_payment_method: Vec<PaymentMethodTotal>,
    pub deposits: Decimal,
    pub withdrawals: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cash_sales_touch_the_drawer() {
        let amount = Decimal::new(5000, 2);
        assert_eq!(
            MovementKind::Sale.balance_effect(PaymentMethod::Cash, amount),
            amount
        );
        assert_eq!(
            MovementKind::Sale.balance_effect(PaymentMethod::Pix, amount),
            Decimal::ZERO
        );
        assert_eq!(
            MovementKind::Sale.balance_effect(PaymentMethod::CreditCard, amount),
            Decimal::ZERO
        );
    }

    #[test]
    fn deposits_and_withdrawals() {
        let amount = Decimal::new(2000, 2);
        assert_eq!(
            MovementKind::Deposit.balance_effect(PaymentMethod::Cash, amount),
            amount
        );
        assert_eq!(
            MovementKind::Withdrawal.balance_effect(PaymentMethod::Cash, amount),
            -amount
        );
    }

    #[test]
    fn movement_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&MovementKind::Withdrawal).unwrap(),
            "\"sangria\""
        );
        let kind: MovementKind = serde_json::from_str("\"suprimento\"").unwrap();
        assert_eq!(kind, MovementKind::Deposit);
    }
}
