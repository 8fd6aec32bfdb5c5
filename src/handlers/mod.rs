//! REST API handlers mounted under `/api`.

pub mod budgets;
pub mod categories;
pub mod expenses;

use crate::errors::AppError;
use crate::models::{AppData, HealthResponse};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::Query,
    Json,
};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::unprocessable(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::unprocessable(rejection.body_text()))
}

/// A blank query value means no filter.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// Fixed-width timestamps so that string order matches time order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn validate_amount(amount: f64) -> Result<(), AppError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(AppError::unprocessable("amount must be greater than 0"))
    }
}

fn validate_required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::unprocessable(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

fn ensure_category_exists(data: &AppData, name: &str) -> Result<(), AppError> {
    if data.categories.iter().any(|category| category.name == name) {
        Ok(())
    } else {
        Err(AppError::bad_request(format!("Unknown category: {name}")))
    }
}
