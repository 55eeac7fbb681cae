//! HTTP API module for the duty calculation engine.
//!
//! A thin adapter that exposes [`DutyEngine`](crate::engine::DutyEngine)
//! over HTTP and maps engine errors to status codes.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CalculationRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, SharedEngine};
