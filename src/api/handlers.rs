//! HTTP request handlers for the Tip Pool Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{INVALID_AMOUNT_MESSAGE, calculate_tips, generate_calculation_id};
use crate::error::EngineError;
use crate::models::{DistributionResult, TipCalculation};

use super::request::{CalculateRequest, StaffQuery, StaffRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/roles", get(roles_handler))
        .route("/staff", get(list_staff_handler).post(create_staff_handler))
        .route(
            "/staff/:id",
            put(update_staff_handler).delete(delete_staff_handler),
        )
        .route(
            "/calculations",
            get(list_calculations_handler).post(save_calculation_handler),
        )
        .route("/calculations/summary", get(summary_handler))
        .route(
            "/calculations/:id",
            put(update_calculation_handler).delete(delete_calculation_handler),
        )
        .with_state(state)
}

/// Unwraps a JSON body or turns the rejection into a 400 response.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(value)) => return Ok(value),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Logs an engine error and converts it to a response.
fn engine_failure(correlation_id: Uuid, error: EngineError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

/// Handler for POST /calculate.
///
/// Runs the distribution without saving it.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<Json<DistributionResult>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = parse_json(payload, correlation_id)?;
    let result = run_calculation(&state, &request, correlation_id).await?;
    Ok(Json(result))
}

/// Resolves the staff selection and runs the engine.
async fn run_calculation(
    state: &AppState,
    request: &CalculateRequest,
    correlation_id: Uuid,
) -> ApiResult<DistributionResult> {
    if request.total_amount <= Decimal::ZERO {
        return Err(engine_failure(
            correlation_id,
            EngineError::InvalidAmount {
                input: request.total_amount.to_string(),
                message: INVALID_AMOUNT_MESSAGE.to_string(),
            },
        ));
    }

    let staff = {
        let store = state.store().read().await;
        match (&request.staff_ids, &request.staff) {
            (Some(ids), _) => store.select_staff(ids),
            (None, Some(staff)) => staff.clone(),
            (None, None) => store.active_staff(),
        }
    };

    let start_time = Instant::now();
    let result = calculate_tips(
        request.total_amount,
        &staff,
        request.meal_period,
        state.config().policy(),
    );
    let duration = start_time.elapsed();

    info!(
        correlation_id = %correlation_id,
        meal_period = request.meal_period.as_str(),
        staff_count = staff.len(),
        total_distributed = %result.total_distributed,
        undistributed = %result.undistributed_amount,
        warnings = result.audit_trace.warnings.len(),
        duration_us = duration.as_micros(),
        "Calculation completed successfully"
    );
    Ok(result)
}

/// Handler for GET /roles.
async fn roles_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.config().roles())
}

/// Handler for GET /staff.
///
/// Supports `q` (name fragment), `role` and `active` filters.
async fn list_staff_handler(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
) -> impl IntoResponse {
    let store = state.store().read().await;
    let mut staff = store.search_staff(query.q.as_deref().unwrap_or(""), query.role.as_deref());
    if let Some(active) = query.active {
        staff.retain(|s| s.is_active == active);
    }
    Json(staff)
}

/// Handler for POST /staff.
async fn create_staff_handler(
    State(state): State<AppState>,
    payload: Result<Json<StaffRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;

    let id = request
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let staff = request.into_staff(Some(id.clone()));

    let mut store = state.store().write().await;
    store
        .add_staff(staff)
        .map_err(|e| engine_failure(correlation_id, e))?;
    let created = store
        .find_staff(&id)
        .map_err(|e| engine_failure(correlation_id, e))?
        .clone();

    info!(correlation_id = %correlation_id, staff_id = %id, "Staff created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT /staff/:id.
async fn update_staff_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StaffRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;

    let mut store = state.store().write().await;
    store
        .update_staff(request.into_staff(Some(id.clone())))
        .map_err(|e| engine_failure(correlation_id, e))?;
    let updated = store
        .find_staff(&id)
        .map_err(|e| engine_failure(correlation_id, e))?
        .clone();

    info!(correlation_id = %correlation_id, staff_id = %id, "Staff updated");
    Ok(Json(updated))
}

/// Handler for DELETE /staff/:id.
async fn delete_staff_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    state
        .store()
        .write()
        .await
        .remove_staff(&id)
        .map_err(|e| engine_failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, staff_id = %id, "Staff removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /calculations.
///
/// Lists saved calculations, newest first.
async fn list_calculations_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store().read().await.tip_calculations())
}

/// Handler for GET /calculations/summary.
async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store().read().await.history_summary())
}

/// Handler for POST /calculations.
///
/// Runs the distribution and saves it to the history.
async fn save_calculation_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing save calculation request");

    let request = parse_json(payload, correlation_id)?;
    let result = run_calculation(&state, &request, correlation_id).await?;
    if result.is_empty() {
        return Err(engine_failure(correlation_id, EngineError::NoStaffSelected));
    }

    let record = TipCalculation::from_distribution(
        generate_calculation_id(),
        request.date.unwrap_or_else(Utc::now),
        request.meal_period,
        request.total_amount,
        &result,
    );
    state
        .store()
        .write()
        .await
        .add_tip_calculation(record.clone())
        .map_err(|e| engine_failure(correlation_id, e))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for PUT /calculations/:id.
///
/// Replaces the saved record wholesale; the id in the path wins.
async fn update_calculation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TipCalculation>, JsonRejection>,
) -> ApiResult<Json<TipCalculation>> {
    let correlation_id = Uuid::new_v4();
    let mut calculation = parse_json(payload, correlation_id)?;
    calculation.id = id;

    state
        .store()
        .write()
        .await
        .update_tip_calculation(calculation.clone())
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(Json(calculation))
}

/// Handler for DELETE /calculations/:id.
async fn delete_calculation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    state
        .store()
        .write()
        .await
        .remove_tip_calculation(&id)
        .map_err(|e| engine_failure(correlation_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
