use super::{
    ensure_category_exists, json_body, new_id, non_blank, now_timestamp, query_params,
    validate_amount, validate_required,
};
use crate::errors::AppError;
use crate::models::{
    AlertQuery, AlertsResponse, Budget, BudgetPayload, BudgetPeriod, BudgetQuery,
    BudgetStatusResponse, Message, Mutation, StatusQuery,
};
use crate::state::AppState;
use crate::stats::{self, DEFAULT_ALERT_THRESHOLD};
use crate::storage::persist_data;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2030;

/// Checks a budget payload and clears the month of yearly budgets.
fn validate_budget(mut payload: BudgetPayload) -> Result<BudgetPayload, AppError> {
    validate_required("category", &payload.category)?;
    validate_amount(payload.amount)?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&payload.year) {
        return Err(AppError::unprocessable(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        )));
    }

    match payload.period {
        BudgetPeriod::Monthly => match payload.month {
            Some(month) if (1..=12).contains(&month) => {}
            Some(_) => return Err(AppError::unprocessable("month must be between 1 and 12")),
            None => return Err(AppError::unprocessable("month is required for monthly budgets")),
        },
        BudgetPeriod::Yearly => payload.month = None,
    }
    Ok(payload)
}

fn same_slot(budget: &Budget, payload: &BudgetPayload) -> bool {
    budget.category == payload.category
        && budget.period == payload.period
        && budget.year == payload.year
        && budget.month == payload.month
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let query = query_params(params)?;
    let data = state.data.lock().await;
    Ok(Json(filter_budgets(&data.budgets, &query)))
}

fn filter_budgets(budgets: &[Budget], query: &BudgetQuery) -> Vec<Budget> {
    let category = non_blank(query.category.as_deref());
    let mut matching: Vec<Budget> = budgets
        .iter()
        .rev()
        .filter(|budget| query.period.is_none_or(|period| budget.period == period))
        .filter(|budget| query.year.is_none_or(|year| budget.year == year))
        .filter(|budget| query.month.is_none_or(|month| budget.month == Some(month)))
        .filter(|budget| category.is_none_or(|category| budget.category == category))
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<BudgetPayload>, JsonRejection>,
) -> Result<Json<Mutation<Budget>>, AppError> {
    let payload = validate_budget(json_body(payload)?)?;

    let mut data = state.data.lock().await;
    ensure_category_exists(&data, &payload.category)?;
    if data.budgets.iter().any(|budget| same_slot(budget, &payload)) {
        return Err(AppError::bad_request(
            "A budget is already set for this period.",
        ));
    }

    let timestamp = now_timestamp();
    let budget = Budget {
        id: new_id(),
        category: payload.category,
        amount: payload.amount,
        period: payload.period,
        year: payload.year,
        month: payload.month,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    data.budgets.push(budget.clone());
    persist_data(&state.data_path, &data).await?;

    info!(id = %budget.id, category = %budget.category, period = %budget.period, "budget created");
    Ok(Json(Mutation {
        message: "Budget saved.".to_string(),
        data: budget,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BudgetPayload>, JsonRejection>,
) -> Result<Json<Mutation<Budget>>, AppError> {
    let payload = validate_budget(json_body(payload)?)?;

    let mut data = state.data.lock().await;
    ensure_category_exists(&data, &payload.category)?;
    if data
        .budgets
        .iter()
        .any(|budget| budget.id != id && same_slot(budget, &payload))
    {
        return Err(AppError::bad_request(
            "A budget is already set for this period.",
        ));
    }

    let budget = data
        .budgets
        .iter_mut()
        .find(|budget| budget.id == id)
        .ok_or_else(|| AppError::not_found("Budget not found."))?;
    budget.category = payload.category;
    budget.amount = payload.amount;
    budget.period = payload.period;
    budget.year = payload.year;
    budget.month = payload.month;
    budget.updated_at = now_timestamp();
    let updated = budget.clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(Mutation {
        message: "Budget updated.".to_string(),
        data: updated,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let mut data = state.data.lock().await;
    let index = data
        .budgets
        .iter()
        .position(|budget| budget.id == id)
        .ok_or_else(|| AppError::not_found("Budget not found."))?;
    data.budgets.remove(index);
    persist_data(&state.data_path, &data).await?;

    info!(%id, "budget deleted");
    Ok(Json(Message {
        message: "Budget deleted.".to_string(),
    }))
}

pub async fn status(
    State(state): State<AppState>,
    params: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<BudgetStatusResponse>, AppError> {
    let query = query_params(params)?;
    if query.month.is_some_and(|month| !(1..=12).contains(&month)) {
        return Err(AppError::unprocessable("month must be between 1 and 12"));
    }
    let data = state.data.lock().await;
    Ok(Json(stats::budget_status(&data, query.year, query.month)))
}

pub async fn alerts(
    State(state): State<AppState>,
    params: Result<Query<AlertQuery>, QueryRejection>,
) -> Result<Json<AlertsResponse>, AppError> {
    let query = query_params(params)?;
    let threshold = query.threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
    let data = state.data.lock().await;
    Ok(Json(stats::budget_alerts(&data, threshold)))
}
