//! Armoire HTTP admin surface.
//!
//! A thin adapter over the sync engine: integrity previews, single-item
//! checks, and the operator-triggered sync endpoint.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
