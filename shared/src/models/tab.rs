//! Tab Model (comanda) and its line items (itens de comanda)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::billing::{BillBreakdown, BillOptions, Discount};
use crate::models::sale::PaymentMethod;

/// Tab status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text"))]
pub enum TabStatus {
    #[default]
    #[serde(rename = "aberta")]
    #[cfg_attr(feature = "db", sqlx(rename = "aberta"))]
    Open,
    #[serde(rename = "fechada")]
    #[cfg_attr(feature = "db", sqlx(rename = "fechada"))]
    Closed,
    #[serde(rename = "cancelada")]
    #[cfg_attr(feature = "db", sqlx(rename = "cancelada"))]
    Cancelled,
}

impl TabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "aberta",
            Self::Closed => "fechada",
            Self::Cancelled => "cancelada",
        }
    }

    /// Closed and cancelled tabs are terminal
    pub fn can_transition_to(&self, next: TabStatus) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Closed) | (Self::Open, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for TabStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preparation status of a tab item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text"))]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "pendente")]
    #[cfg_attr(feature = "db", sqlx(rename = "pendente"))]
    Pending,
    #[serde(rename = "preparando")]
    #[cfg_attr(feature = "db", sqlx(rename = "preparando"))]
    Preparing,
    #[serde(rename = "pronto")]
    #[cfg_attr(feature = "db", sqlx(rename = "pronto"))]
    Ready,
    #[serde(rename = "entregue")]
    #[cfg_attr(feature = "db", sqlx(rename = "entregue"))]
    Delivered,
    #[serde(rename = "cancelado")]
    #[cfg_attr(feature = "db", sqlx(rename = "cancelado"))]
    Cancelled,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Preparing => "preparando",
            Self::Ready => "pronto",
            Self::Delivered => "entregue",
            Self::Cancelled => "cancelado",
        }
    }

    /// Position along the kitchen flow; `None` for cancelled
    fn step(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Preparing => Some(1),
            Self::Ready => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Items only move forward (skipping is allowed) or get cancelled.
    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        match (self.step(), next.step()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(from), Some(to)) => to > from,
        }
    }

    /// Only pending items may change quantity or be removed
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_billable(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab entity (comanda)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tab {
    pub id: i64,
    pub restaurant_id: i64,
    /// `None` for counter (PDV) sales
    pub table_id: Option<i64>,
    pub status: TabStatus,
    pub customer_name: Option<String>,
    pub people: i32,
    pub total: Decimal,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
}

impl Tab {
    pub fn is_open(&self) -> bool {
        self.status == TabStatus::Open
    }
}

/// Tab line item (item de comanda)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TabItem {
    pub id: i64,
    pub tab_id: i64,
    pub product_id: i64,
    /// Product name at the time the item was added
    pub product_name: String,
    pub quantity: i32,
    /// Product price at the time the item was added
    pub unit_price: Decimal,
    pub note: Option<String>,
    pub status: ItemStatus,
    pub created_at: i64,
}

/// Tab with items and a bill preview without discount or extras
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabDetail {
    #[serde(flatten)]
    pub tab: Tab,
    pub items: Vec<TabItem>,
    pub bill: BillBreakdown,
}

/// Open tab payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabOpen {
    pub table_id: Option<i64>,
    pub waiter: Option<String>,
    pub customer_name: Option<String>,
    pub people: Option<i32>,
}

/// Add item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabItemCreate {
    pub product_id: i64,
    pub quantity: i32,
    pub note: Option<String>,
}

/// Update item payload
///
/// A missing `note` keeps the current one; a blank `note` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabItemUpdate {
    pub quantity: Option<i32>,
    pub note: Option<String>,
}

impl TabItemUpdate {
    /// `None`: keep the note. `Some(None)`: clear it. `Some(Some(n))`: replace it.
    pub fn note_change(&self) -> Option<Option<&str>> {
        self.note
            .as_deref()
            .map(|n| Some(n).filter(|n| !n.trim().is_empty()))
    }
}

/// Item status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabItemStatusChange {
    pub status: ItemStatus,
}

/// Move tab payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabMove {
    pub target_table_id: i64,
}

/// Cancel tab payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabCancel {
    pub reason: Option<String>,
    pub operator: Option<String>,
}

/// Bill options as sent by the client
///
/// Rates left out fall back to the restaurant's configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillRequest {
    pub discount: Option<Discount>,
    #[serde(default)]
    pub include_service: bool,
    #[serde(default)]
    pub include_cover: bool,
}

impl BillRequest {
    /// Resolve against restaurant rates and the tab's head count
    pub fn to_options(&self, service_fee_percent: Decimal, cover_charge: Decimal, people: i32) -> BillOptions {
        BillOptions {
            discount: self.discount.clone(),
            include_service: self.include_service,
            service_fee_percent,
            include_cover: self.include_cover,
            cover_charge,
            people,
        }
    }
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub bill: BillRequest,
    pub payment_method: PaymentMethod,
    pub operator: Option<String>,
}

/// Counter (PDV) sale payload: items sold without a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterSaleRequest {
    pub items: Vec<TabItemCreate>,
    pub customer_name: Option<String>,
    #[serde(flatten)]
    pub bill: BillRequest,
    pub payment_method: PaymentMethod,
    pub operator: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_transitions() {
        assert!(TabStatus::Open.can_transition_to(TabStatus::Closed));
        assert!(TabStatus::Open.can_transition_to(TabStatus::Cancelled));
        assert!(!TabStatus::Closed.can_transition_to(TabStatus::Open));
        assert!(!TabStatus::Cancelled.can_transition_to(TabStatus::Closed));
        assert!(!TabStatus::Open.can_transition_to(TabStatus::Open));
    }

    #[test]
    fn item_moves_forward_with_skips() {
        use ItemStatus::*;
        assert!(Pending.can_transition_to(Preparing));
        assert!(Pending.can_transition_to(Delivered));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Delivered));

        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn item_cancellation() {
        use ItemStatus::*;
        for from in [Pending, Preparing, Ready, Delivered] {
            assert!(from.can_transition_to(Cancelled), "{from} -> cancelado");
        }
        for to in [Pending, Preparing, Ready, Delivered, Cancelled] {
            assert!(!Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn only_pending_is_editable() {
        assert!(ItemStatus::Pending.is_editable());
        assert!(!ItemStatus::Preparing.is_editable());
        assert!(!ItemStatus::Cancelled.is_billable());
        assert!(ItemStatus::Delivered.is_billable());
    }

    #[test]
    fn blank_note_clears_it() {
        let keep = TabItemUpdate { quantity: Some(2), note: None };
        assert_eq!(keep.note_change(), None);

        let clear = TabItemUpdate { quantity: None, note: Some("  ".into()) };
        assert_eq!(clear.note_change(), Some(None));

        let replace = TabItemUpdate { quantity: None, note: Some("sem cebola".into()) };
        assert_eq!(replace.note_change(), Some(Some("sem cebola")));
    }

    #[test]
    fn checkout_request_flattens_bill_options() {
        let json = r#"{
            "discount": {"type": "percent", "value": 10},
            "include_service": true,
            "payment_method": "pix"
        }"#;
        let req: CheckoutRequest = serde_json::from_str(json).unwrap();
        assert!(req.bill.include_service);
        assert!(!req.bill.include_cover);
        assert_eq!(req.payment_method, PaymentMethod::Pix);
        assert!(matches!(req.bill.discount, Some(Discount::Percent(_))));
    }
}
