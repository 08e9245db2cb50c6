//! HTTP deletion surface for the reaper media deletion service.
//!
//! This crate provides the operator-facing control plane:
//! - Single cache eviction
//! - Derivative cache sweeps per item
//! - Recursive item tree deletion
//! - Liveness probe

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
