//! Database access layer
//!
//! One module per table. Functions take any `PgExecutor` so the same query
//! runs against the pool or inside a transaction (`&mut *tx`).

pub mod audit;
pub mod cash_registers;
pub mod products;
pub mod restaurants;
pub mod sales;
pub mod staff;
pub mod tab_items;
pub mod tables;
pub mod tabs;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use shared::util::{now_millis, snowflake_id};
