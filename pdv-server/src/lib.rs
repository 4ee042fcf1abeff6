//! pdv-server: restaurant point-of-sale backend
//!
//! ```text
//! pdv-server/src/
//! ├── api/         # HTTP routes and handlers
//! ├── services/    # multi-step flows (tabs, checkout, caixa, reconcile, audit)
//! ├── db/          # PostgreSQL queries, one module per table
//! ├── config.rs    # environment configuration
//! ├── error.rs     # service error -> AppError mapping
//! ├── logger.rs    # tracing setup
//! ├── state.rs     # AppState (pool + config)
//! └── validation.rs
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;
pub mod validation;

pub use api::create_router;
pub use config::Config;
pub use state::AppState;
