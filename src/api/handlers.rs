//! HTTP request handlers for the duty calculation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::CalculationInput;

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::{AppState, SharedEngine};

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/explain", post(explain_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the full calculation result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    run("calculate", &state, payload, |engine, input| {
        engine.calculate(input)
    })
}

/// Handler for POST /explain endpoint.
///
/// Accepts a calculation request and returns the breakdown report.
async fn explain_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    run("explain", &state, payload, |engine, input| {
        engine.explain(input)
    })
}

/// Handler for GET /health endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Parses the request, runs `operation` and renders the outcome.
fn run<T, F>(
    endpoint: &str,
    state: &AppState,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
    operation: F,
) -> Response
where
    T: Serialize,
    F: FnOnce(&SharedEngine, &CalculationInput) -> EngineResult<T>,
{
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let input: CalculationInput = request.into();

    let start_time = Instant::now();
    match operation(state.engine(), &input) {
        Ok(body) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                endpoint,
                classification_code = %input.classification_code,
                country_code = %input.country_code,
                duration_us = duration.as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, body)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                endpoint,
                error = %err,
                "Calculation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
