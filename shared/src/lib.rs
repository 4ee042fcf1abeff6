//! Shared types for the restaurant PDV
//!
//! Domain models, the unified error system, billing arithmetic and
//! reconciliation planning. Nothing here touches the network or the
//! database; row derives are behind the `db` feature.

pub mod billing;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, ErrorCode};
