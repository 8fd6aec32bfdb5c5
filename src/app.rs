use crate::handlers::{self, budgets, categories, expenses};
use crate::pages;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/expenses/new", get(pages::new_expense))
        .route("/expenses/save", post(pages::save_expense))
        .route("/expenses/filter", get(pages::filter_expenses))
        .route("/expenses/:id/edit", get(pages::edit_expense))
        .route(
            "/expenses/:id/delete",
            get(pages::confirm_delete_expense).post(pages::delete_expense),
        )
        .route("/budgets/new", get(pages::new_budget))
        .route("/budgets/save", post(pages::save_budget))
        .route("/budgets/:id/edit", get(pages::edit_budget))
        .route(
            "/budgets/:id/delete",
            get(pages::confirm_delete_budget).post(pages::delete_budget),
        )
        .route("/categories/new", get(pages::new_category))
        .route("/categories/save", post(pages::save_category))
        .route("/categories/initialize", post(pages::initialize_categories))
        .route("/categories/:id/edit", get(pages::edit_category))
        .route(
            "/categories/:id/delete",
            get(pages::confirm_delete_category).post(pages::delete_category),
        )
        .route("/health", get(handlers::health))
        .nest("/api", api_router())
        .with_state(state)
}

/// JSON endpoints, mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/summary/category", get(expenses::category_summary))
        .route("/expenses/summary/monthly", get(expenses::monthly_summary))
        .route("/expenses/:id", put(expenses::update).delete(expenses::delete))
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/status", get(budgets::status))
        .route("/budgets/alerts", get(budgets::alerts))
        .route("/budgets/:id", put(budgets::update).delete(budgets::delete))
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/usage", get(categories::usage))
        .route("/categories/initialize", post(categories::initialize))
        .route("/categories/:id", put(categories::update).delete(categories::delete))
}
