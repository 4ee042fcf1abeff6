//! Domain actions spanning several tables
//!
//! Each action runs in one transaction and writes its audit entry after commit.

pub mod audit;
pub mod cash_register;
pub mod checkout;
pub mod reconcile;
pub mod tabs;
