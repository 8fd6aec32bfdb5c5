use super::{json_body, new_id, now_timestamp, query_params};
use crate::errors::AppError;
use crate::models::{
    AppData, Category, CategoryPayload, InitializeResponse, Message, Mutation, PeriodQuery,
    UsageResponse,
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

pub const MAX_NAME_LEN: usize = 50;

pub const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("Food", "#EF4444"),
    ("Transport", "#3B82F6"),
    ("Shopping", "#10B981"),
    ("Medical", "#F59E0B"),
    ("Entertainment", "#8B5CF6"),
    ("Education", "#06B6D4"),
    ("Housing", "#84CC16"),
    ("Other", "#6B7280"),
];

fn validate_category(payload: CategoryPayload) -> Result<CategoryPayload, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::unprocessable(format!(
            "name must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }
    if !is_hex_color(&payload.color) {
        return Err(AppError::unprocessable("color must look like #RRGGBB"));
    }
    Ok(CategoryPayload {
        name,
        color: payload.color,
    })
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}

fn is_in_use(data: &AppData, name: &str) -> bool {
    data.expenses.iter().any(|expense| expense.category == name)
        || data.budgets.iter().any(|budget| budget.category == name)
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let data = state.data.lock().await;
    let mut categories = data.categories.clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Mutation<Category>>, AppError> {
    let payload = validate_category(json_body(payload)?)?;

    let mut data = state.data.lock().await;
    if data
        .categories
        .iter()
        .any(|category| category.name == payload.name)
    {
        return Err(AppError::bad_request("Category name already exists."));
    }

    let timestamp = now_timestamp();
    let category = Category {
        id: new_id(),
        name: payload.name,
        color: payload.color,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    data.categories.push(category.clone());
    persist_data(&state.data_path, &data).await?;

    info!(id = %category.id, name = %category.name, "category created");
    Ok(Json(Mutation {
        message: "Category created.".to_string(),
        data: category,
    }))
}

/// Renames carry over to the expenses and budgets that reference the old name.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Mutation<Category>>, AppError> {
    let payload = validate_category(json_body(payload)?)?;

    let mut data = state.data.lock().await;
    if data
        .categories
        .iter()
        .any(|category| category.id != id && category.name == payload.name)
    {
        return Err(AppError::bad_request("Category name already exists."));
    }

    let category = data
        .categories
        .iter_mut()
        .find(|category| category.id == id)
        .ok_or_else(|| AppError::not_found("Category not found."))?;
    let old_name = std::mem::replace(&mut category.name, payload.name);
    category.color = payload.color;
    category.updated_at = now_timestamp();
    let updated = category.clone();

    if old_name != updated.name {
        for expense in data.expenses.iter_mut().filter(|e| e.category == old_name) {
            expense.category = updated.name.clone();
        }
        for budget in data.budgets.iter_mut().filter(|b| b.category == old_name) {
            budget.category = updated.name.clone();
        }
    }

    persist_data(&state.data_path, &data).await?;
    Ok(Json(Mutation {
        message: "Category updated.".to_string(),
        data: updated,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let mut data = state.data.lock().await;
    let index = data
        .categories
        .iter()
        .position(|category| category.id == id)
        .ok_or_else(|| AppError::not_found("Category not found."))?;

    if is_in_use(&data, &data.categories[index].name) {
        return Err(AppError::bad_request(
            "This category is used by expenses or budgets and cannot be deleted.",
        ));
    }

    let removed = data.categories.remove(index);
    persist_data(&state.data_path, &data).await?;

    info!(%id, name = %removed.name, "category deleted");
    Ok(Json(Message {
        message: "Category deleted.".to_string(),
    }))
}

pub async fn usage(
    State(state): State<AppState>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<UsageResponse>, AppError> {
    let query = query_params(params)?;
    let data = state.data.lock().await;
    Ok(Json(stats::category_usage(&data, query)))
}

pub async fn initialize(State(state): State<AppState>) -> Result<Json<InitializeResponse>, AppError> {
    let mut data = state.data.lock().await;
    let added = add_default_categories(&mut data, &now_timestamp());

    if added.is_empty() {
        return Ok(Json(InitializeResponse {
            message: "All default categories already exist.".to_string(),
            added_categories: Vec::new(),
        }));
    }

    persist_data(&state.data_path, &data).await?;
    info!(count = added.len(), "default categories added");
    Ok(Json(InitializeResponse {
        message: format!("Added {} default categories.", added.len()),
        added_categories: added,
    }))
}

fn add_default_categories(data: &mut AppData, timestamp: &str) -> Vec<String> {
    let mut added = Vec::new();
    for (name, color) in DEFAULT_CATEGORIES {
        if data.categories.iter().any(|category| category.name == name) {
            continue;
        }
        data.categories.push(Category {
            id: new_id(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        });
        added.push(name.to_string());
    }
    added
}
