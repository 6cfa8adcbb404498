//! HTTP API module for the Tip Pool Engine.
//!
//! This module provides the REST endpoints for running tip distributions
//! and managing the staff roster and calculation history.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculateRequest, StaffQuery, StaffRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
