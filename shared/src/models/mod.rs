//! Data models
//!
//! Shared between pdv-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.
//! Status enums keep their Portuguese wire/database names.

pub mod audit;
pub mod cash_register;
pub mod product;
pub mod restaurant;
pub mod sale;
pub mod staff;
pub mod tab;
pub mod table;

// Re-exports
pub use audit::*;
pub use cash_register::*;
pub use product::*;
pub use restaurant::*;
pub use sale::*;
pub use staff::*;
pub use tab::*;
pub use table::*;
