//! Browser-facing routes. Each handler runs one dashboard operation and
//! either renders the page or redirects back to the active tab.

use crate::controller::{
    BudgetForm, CategoryForm, ChartPeriod, Dashboard, EntityKind, ExpenseFilter, ExpenseForm, Tab,
};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    tab: Option<String>,
    chart_period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    confirm: Option<String>,
}

impl DeleteForm {
    fn is_confirmed(&self) -> bool {
        matches!(self.confirm.as_deref(), Some("yes" | "true" | "on"))
    }
}

fn tab_redirect(tab: Tab) -> Response {
    Redirect::to(&format!("/?tab={}", tab.as_str())).into_response()
}

fn page(dashboard: &mut Dashboard) -> Response {
    Html(dashboard.render()).into_response()
}

/// Reloads whatever tab is open so an overlay renders on fresh panels.
async fn refresh_current_tab(dashboard: &mut Dashboard) {
    dashboard.ensure_loaded().await;
    let tab = dashboard.current_tab();
    dashboard.show_tab(tab).await;
}

pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.ensure_loaded().await;
    dashboard.hide_modal();

    if let Some(period) = query.chart_period.as_deref().and_then(ChartPeriod::parse) {
        if period != dashboard.chart_period() {
            dashboard.set_chart_period(period).await;
        }
    }

    let tab = query
        .tab
        .as_deref()
        .and_then(Tab::parse)
        .unwrap_or(Tab::Dashboard);
    dashboard.show_tab(tab).await;
    page(&mut dashboard)
}

async fn open_modal(state: &AppState, kind: EntityKind, id: Option<&str>) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    refresh_current_tab(&mut dashboard).await;
    match kind {
        EntityKind::Expense => dashboard.show_expense_modal(id),
        EntityKind::Budget => dashboard.show_budget_modal(id),
        EntityKind::Category => dashboard.show_category_modal(id),
    }
    page(&mut dashboard)
}

pub async fn new_expense(State(state): State<AppState>) -> Response {
    open_modal(&state, EntityKind::Expense, None).await
}

pub async fn edit_expense(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    open_modal(&state, EntityKind::Expense, Some(&id)).await
}

pub async fn new_budget(State(state): State<AppState>) -> Response {
    open_modal(&state, EntityKind::Budget, None).await
}

pub async fn edit_budget(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    open_modal(&state, EntityKind::Budget, Some(&id)).await
}

pub async fn new_category(State(state): State<AppState>) -> Response {
    open_modal(&state, EntityKind::Category, None).await
}

pub async fn edit_category(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    open_modal(&state, EntityKind::Category, Some(&id)).await
}

pub async fn save_expense(State(state): State<AppState>, Form(form): Form<ExpenseForm>) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    if dashboard.save_expense(form).await {
        tab_redirect(dashboard.current_tab())
    } else {
        page(&mut dashboard)
    }
}

pub async fn save_budget(State(state): State<AppState>, Form(form): Form<BudgetForm>) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    if dashboard.save_budget(form).await {
        tab_redirect(dashboard.current_tab())
    } else {
        page(&mut dashboard)
    }
}

pub async fn save_category(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    if dashboard.save_category(form).await {
        tab_redirect(dashboard.current_tab())
    } else {
        page(&mut dashboard)
    }
}

async fn delete(state: &AppState, kind: EntityKind, id: &str, confirmed: bool) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    if !confirmed {
        refresh_current_tab(&mut dashboard).await;
    }
    let deleted = match kind {
        EntityKind::Expense => dashboard.delete_expense(id, confirmed).await,
        EntityKind::Budget => dashboard.delete_budget(id, confirmed).await,
        EntityKind::Category => dashboard.delete_category(id, confirmed).await,
    };
    if deleted || confirmed {
        tab_redirect(dashboard.current_tab())
    } else {
        page(&mut dashboard)
    }
}

pub async fn confirm_delete_expense(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    delete(&state, EntityKind::Expense, &id, false).await
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    delete(&state, EntityKind::Expense, &id, form.is_confirmed()).await
}

pub async fn confirm_delete_budget(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    delete(&state, EntityKind::Budget, &id, false).await
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    delete(&state, EntityKind::Budget, &id, form.is_confirmed()).await
}

pub async fn confirm_delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    delete(&state, EntityKind::Category, &id, false).await
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    delete(&state, EntityKind::Category, &id, form.is_confirmed()).await
}

pub async fn filter_expenses(
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.ensure_loaded().await;
    dashboard.hide_modal();
    dashboard.filter_expenses(&filter).await;
    page(&mut dashboard)
}

pub async fn initialize_categories(State(state): State<AppState>) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.initialize_categories().await;
    tab_redirect(Tab::Categories)
}
