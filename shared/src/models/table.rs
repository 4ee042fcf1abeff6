//! Table Model (mesa)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Table occupancy / billing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text"))]
pub enum TableStatus {
    /// No open tab
    #[default]
    #[serde(rename = "livre")]
    #[cfg_attr(feature = "db", sqlx(rename = "livre"))]
    Free,
    /// Tab open, guests being served
    #[serde(rename = "ocupada")]
    #[cfg_attr(feature = "db", sqlx(rename = "ocupada"))]
    Occupied,
    /// Bill requested, waiting for payment
    #[serde(rename = "aguardando")]
    #[cfg_attr(feature = "db", sqlx(rename = "aguardando"))]
    AwaitingPayment,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "livre",
            Self::Occupied => "ocupada",
            Self::AwaitingPayment => "aguardando",
        }
    }

    /// Whether a table in this status may move to `next`
    pub fn can_transition_to(&self, next: TableStatus) -> bool {
        use TableStatus::*;
        matches!(
            (self, next),
            (Free, Occupied)
                | (Occupied, AwaitingPayment)
                | (AwaitingPayment, Occupied)
                | (Occupied, Free)
                | (AwaitingPayment, Free)
        )
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table entity (mesa)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Table {
    pub id: i64,
    pub restaurant_id: i64,
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    /// When the current tab was opened (Unix millis)
    pub opened_at: Option<i64>,
    pub waiter: Option<String>,
    /// Running total of the open tab(s) on this table
    pub total: Decimal,
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub number: i32,
    pub capacity: Option<i32>,
}

/// Update table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableUpdate {
    pub number: Option<i32>,
    pub capacity: Option<i32>,
}

/// Manual status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusChange {
    pub status: TableStatus,
    pub waiter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_transitions() {
        use TableStatus::*;
        assert!(Free.can_transition_to(Occupied));
        assert!(Occupied.can_transition_to(AwaitingPayment));
        assert!(AwaitingPayment.can_transition_to(Occupied));
        assert!(Occupied.can_transition_to(Free));
        assert!(AwaitingPayment.can_transition_to(Free));

        assert!(!Free.can_transition_to(Free));
        assert!(!Free.can_transition_to(AwaitingPayment));
        assert!(!Occupied.can_transition_to(Occupied));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TableStatus::AwaitingPayment).unwrap(),
            "\"aguardando\""
        );
        let status: TableStatus = serde_json::from_str("\"ocupada\"").unwrap();
        assert_eq!(status, TableStatus::Occupied);
        assert_eq!(TableStatus::Free.to_string(), "livre");
    }
}
