use super::{
    ensure_category_exists, json_body, new_id, non_blank, now_timestamp, query_params,
    validate_amount, validate_required,
};
use crate::errors::AppError;
use crate::models::{
    CategorySummary, Expense, ExpensePayload, ExpenseQuery, ExpenseUpdate, Message,
    MonthlySummary, Mutation, PeriodQuery,
};
use crate::state::AppState;
use crate::stats;
use crate::storage::persist_data;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 1000;

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let query = query_params(params)?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit > MAX_LIST_LIMIT {
        return Err(AppError::unprocessable(format!(
            "limit must be at most {MAX_LIST_LIMIT}"
        )));
    }

    let data = state.data.lock().await;
    Ok(Json(filter_expenses(&data.expenses, &query, limit as usize)))
}

fn filter_expenses(expenses: &[Expense], query: &ExpenseQuery, limit: usize) -> Vec<Expense> {
    let category = non_blank(query.category.as_deref());
    let mut matching: Vec<Expense> = expenses
        .iter()
        .rev()
        .filter(|expense| category.is_none_or(|category| expense.category == category))
        .filter(|expense| query.start_date.is_none_or(|start| expense.date >= start))
        .filter(|expense| query.end_date.is_none_or(|end| expense.date <= end))
        .cloned()
        .collect();

    matching.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    matching.truncate(limit);
    matching
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<Mutation<Expense>>, AppError> {
    let payload = json_body(payload)?;
    validate_amount(payload.amount)?;
    validate_required("category", &payload.category)?;

    let mut data = state.data.lock().await;
    ensure_category_exists(&data, &payload.category)?;

    let timestamp = now_timestamp();
    let expense = Expense {
        id: new_id(),
        amount: payload.amount,
        category: payload.category,
        date: payload.date,
        description: normalize_description(payload.description),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    data.expenses.push(expense.clone());
    persist_data(&state.data_path, &data).await?;

    info!(id = %expense.id, category = %expense.category, "expense created");
    Ok(Json(Mutation {
        message: "Expense added.".to_string(),
        data: expense,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<Mutation<Expense>>, AppError> {
    let update = json_body(payload)?;
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }
    if let Some(category) = update.category.as_deref() {
        validate_required("category", category)?;
    }

    let mut data = state.data.lock().await;
    if let Some(category) = update.category.as_deref() {
        ensure_category_exists(&data, category)?;
    }

    let expense = data
        .expenses
        .iter_mut()
        .find(|expense| expense.id == id)
        .ok_or_else(|| AppError::not_found("Expense not found."))?;

    if let Some(amount) = update.amount {
        expense.amount = amount;
    }
    if let Some(category) = update.category {
        expense.category = category;
    }
    if let Some(date) = update.date {
        expense.date = date;
    }
    // An explicit empty description clears it.
    if update.description.is_some() {
        expense.description = normalize_description(update.description);
    }
    expense.updated_at = now_timestamp();
    let updated = expense.clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(Mutation {
        message: "Expense updated.".to_string(),
        data: updated,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let mut data = state.data.lock().await;
    let index = data
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or_else(|| AppError::not_found("Expense not found."))?;
    data.expenses.remove(index);
    persist_data(&state.data_path, &data).await?;

    info!(%id, "expense deleted");
    Ok(Json(Message {
        message: "Expense deleted.".to_string(),
    }))
}

pub async fn category_summary(
    State(state): State<AppState>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let query = query_params(params)?;
    let data = state.data.lock().await;
    Ok(Json(stats::category_summary(&data.expenses, query)))
}

pub async fn monthly_summary(
    State(state): State<AppState>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Vec<MonthlySummary>>, AppError> {
    let query = query_params(params)?;
    let data = state.data.lock().await;
    Ok(Json(stats::monthly_summary(&data.expenses, query.year)))
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
