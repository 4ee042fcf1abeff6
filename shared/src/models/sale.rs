//! Sale Model (venda)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cash_register::PaymentMethodTotal;

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text"))]
pub enum PaymentMethod {
    #[serde(rename = "dinheiro")]
    #[cfg_attr(feature = "db", sqlx(rename = "dinheiro"))]
    Cash,
    #[serde(rename = "cartao_credito")]
    #[cfg_attr(feature = "db", sqlx(rename = "cartao_credito"))]
    CreditCard,
    #[serde(rename = "cartao_debito")]
    #[cfg_attr(feature = "db", sqlx(rename = "cartao_debito"))]
    DebitCard,
    #[serde(rename = "pix")]
    #[cfg_attr(feature = "db", sqlx(rename = "pix"))]
    Pix,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "dinheiro",
            Self::CreditCard => "cartao_credito",
            Self::DebitCard => "cartao_debito",
            Self::Pix => "pix",
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sale entity: the persisted result of a checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub restaurant_id: i64,
    pub tab_id: i64,
    pub table_id: Option<i64>,
    pub cash_register_id: i64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub service_fee: Decimal,
    pub cover_charge: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub created_at: i64,
}

/// Sales aggregate over a time range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub count: i64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub service_fee: Decimal,
    pub cover_charge: Decimal,
    pub total: Decimal,
    pub by_payment_method: Vec<PaymentMethodTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_wire_names() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Pix,
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
        assert!(PaymentMethod::Cash.is_cash());
        assert!(!PaymentMethod::DebitCard.is_cash());
    }
}
