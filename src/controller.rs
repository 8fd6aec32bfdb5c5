//! Dashboard state and the operations behind every page action.
//!
//! `Dashboard` keeps what the browser would otherwise hold: cached records,
//! the open tab and modal, chart configs and the last toast. Each operation
//! talks to the REST API through [`ApiClient`] and re-renders the affected
//! panels. Failures are logged and surfaced as an error toast.

use crate::client::ApiClient;
use crate::errors::ClientError;
use crate::models::{
    Budget, BudgetPayload, BudgetPeriod, BudgetQuery, Category, CategoryPayload, Expense,
    ExpensePayload, ExpenseQuery, ExpenseUpdate, PeriodQuery, StatusQuery,
    DEFAULT_CATEGORY_COLOR,
};
use crate::ui::{
    self, ChartConfig, ChartKind, DashboardSummary, EmptyAction, PageView, Toast, ToastKind,
};
use crate::utils::{self, current_month_range, days_left_in_month, CurrentDate, Debouncer, LocalStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, info};

const INITIAL_EXPENSE_LIMIT: u32 = 100;
const DASHBOARD_EXPENSE_LIMIT: u32 = 1000;
const RECENT_EXPENSE_COUNT: usize = 5;
const CHART_PERIOD_KEY: &str = "chartPeriod";
const PREFERENCE_SAVE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Expenses,
    Budgets,
    Categories,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Expenses, Tab::Budgets, Tab::Categories];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Expenses => "expenses",
            Self::Budgets => "budgets",
            Self::Categories => "categories",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Expenses => "Expenses",
            Self::Budgets => "Budgets",
            Self::Categories => "Categories",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dashboard => "fa-chart-pie",
            Self::Expenses => "fa-receipt",
            Self::Budgets => "fa-piggy-bank",
            Self::Categories => "fa-tags",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    #[default]
    Month,
    Year,
}

impl ChartPeriod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Expense,
    Budget,
    Category,
}

impl EntityKind {
    pub fn route_segment(self) -> &'static str {
        self.tab().as_str()
    }

    pub fn tab(self) -> Tab {
        match self {
            Self::Expense => Tab::Expenses,
            Self::Budget => Tab::Budgets,
            Self::Category => Tab::Categories,
        }
    }
}

/// Raw expense form fields as submitted by the browser. `id` is blank when
/// adding and names the edited record otherwise.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpenseForm {
    pub id: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

impl ExpenseForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn to_payload(&self) -> Result<ExpensePayload, ClientError> {
        let description = self.description.trim();
        Ok(ExpensePayload {
            amount: parse_amount(&self.amount)?,
            category: self.category.trim().to_string(),
            date: parse_date("date", &self.date)?,
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

impl From<&Expense> for ExpenseForm {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.clone(),
            amount: expense.amount.to_string(),
            category: expense.category.clone(),
            date: expense.date.format("%Y-%m-%d").to_string(),
            description: expense.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BudgetForm {
    pub id: String,
    pub category: String,
    pub amount: String,
    pub period: String,
    pub year: String,
    pub month: String,
}

impl BudgetForm {
    pub fn new(current: &CurrentDate) -> Self {
        Self {
            period: BudgetPeriod::Monthly.as_str().to_string(),
            year: current.year.to_string(),
            month: current.month.to_string(),
            ..Self::default()
        }
    }

    /// Monthly budgets carry the month; yearly budgets never do.
    pub fn to_payload(&self) -> Result<BudgetPayload, ClientError> {
        let period = BudgetPeriod::parse(&self.period).ok_or_else(|| {
            ClientError::InvalidForm(format!("unknown budget period: {}", self.period))
        })?;
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| ClientError::InvalidForm("year must be a whole number".into()))?;
        let month = match period {
            BudgetPeriod::Monthly if !self.month.trim().is_empty() => Some(
                self.month
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ClientError::InvalidForm("month must be a whole number".into()))?,
            ),
            _ => None,
        };

        Ok(BudgetPayload {
            category: self.category.trim().to_string(),
            amount: parse_amount(&self.amount)?,
            period,
            year,
            month,
        })
    }
}

impl From<&Budget> for BudgetForm {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id.clone(),
            category: budget.category.clone(),
            amount: budget.amount.to_string(),
            period: budget.period.as_str().to_string(),
            year: budget.year.to_string(),
            month: budget.month.map(|month| month.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
        }
    }
}

impl CategoryForm {
    pub fn to_payload(&self) -> CategoryPayload {
        let color = self.color.trim();
        CategoryPayload {
            name: self.name.trim().to_string(),
            color: if color.is_empty() {
                DEFAULT_CATEGORY_COLOR.to_string()
            } else {
                color.to_string()
            },
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            color: category.color.clone(),
        }
    }
}

/// Expense list filter; blank fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpenseFilter {
    pub category: String,
    pub start_date: String,
    pub end_date: String,
}

impl ExpenseFilter {
    pub fn to_query(&self) -> Result<ExpenseQuery, ClientError> {
        let optional_date = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Ok(None)
            } else {
                parse_date(field, value).map(Some)
            }
        };
        let category = self.category.trim();
        Ok(ExpenseQuery {
            category: (!category.is_empty()).then(|| category.to_string()),
            start_date: optional_date("start_date", &self.start_date)?,
            end_date: optional_date("end_date", &self.end_date)?,
            limit: None,
        })
    }
}

/// The record a submitted form edits. Blank means a new record.
fn edit_target(id: &str) -> Option<&str> {
    let id = id.trim();
    (!id.is_empty()).then_some(id)
}

fn parse_amount(value: &str) -> Result<f64, ClientError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ClientError::InvalidForm("amount must be a number".into()))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ClientError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ClientError::InvalidForm(format!("{field} must be a YYYY-MM-DD date")))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Expense(ExpenseForm),
    Budget(BudgetForm),
    Category(CategoryForm),
    ConfirmDelete { kind: EntityKind, id: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Charts {
    pub category: Option<ChartConfig>,
    pub monthly: Option<ChartConfig>,
}

/// Last rendered markup for each panel of the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panels {
    pub summary: DashboardSummary,
    pub recent_expenses: String,
    pub expenses_list: String,
    pub budget_status: String,
    pub budgets_list: String,
    pub categories_list: String,
    pub filter_options: String,
}

pub struct Dashboard {
    api: ApiClient,
    store: LocalStore,
    debouncer: Debouncer,
    loaded: bool,
    current_tab: Tab,
    categories: Vec<Category>,
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
    charts: Charts,
    chart_period: ChartPeriod,
    editing_expense: Option<String>,
    editing_budget: Option<String>,
    editing_category: Option<String>,
    modal: Option<Modal>,
    toast: Option<Toast>,
    panels: Panels,
}

impl Dashboard {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            api,
            store,
            debouncer: Debouncer::new(PREFERENCE_SAVE_DELAY),
            loaded: false,
            current_tab: Tab::Dashboard,
            categories: Vec::new(),
            expenses: Vec::new(),
            budgets: Vec::new(),
            charts: Charts::default(),
            chart_period: ChartPeriod::default(),
            editing_expense: None,
            editing_budget: None,
            editing_category: None,
            modal: None,
            toast: None,
            panels: Panels::default(),
        }
    }

    pub fn current_tab(&self) -> Tab {
        self.current_tab
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn charts(&self) -> &Charts {
        &self.charts
    }

    pub fn chart_period(&self) -> ChartPeriod {
        self.chart_period
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn editing_expense(&self) -> Option<&str> {
        self.editing_expense.as_deref()
    }

    pub fn editing_budget(&self) -> Option<&str> {
        self.editing_budget.as_deref()
    }

    pub fn editing_category(&self) -> Option<&str> {
        self.editing_category.as_deref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, ToastKind::Success));
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, ToastKind::Error));
    }

    /// Restores the saved chart period.
    pub async fn restore_preferences(&mut self) {
        self.chart_period = self.store.get(CHART_PERIOD_KEY, ChartPeriod::default()).await;
    }

    /// Loads the caches the first time a page is requested.
    pub async fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.load_initial_data().await;
        }
    }

    pub async fn load_initial_data(&mut self) {
        let result = self.fetch_initial_data().await;

        match result {
            Ok(()) => {
                self.loaded = true;
                info!(
                    categories = self.categories.len(),
                    expenses = self.expenses.len(),
                    budgets = self.budgets.len(),
                    "dashboard data loaded"
                );
            }
            Err(err) => {
                error!("failed to load initial data: {err}");
                self.notify_error("Failed to load data.");
            }
        }
    }

    async fn fetch_initial_data(&mut self) -> Result<(), ClientError> {
        let categories_api = self.api.categories();
        let expenses_api = self.api.expenses();
        let budgets_api = self.api.budgets();
        let expense_query = ExpenseQuery {
            limit: Some(INITIAL_EXPENSE_LIMIT),
            ..ExpenseQuery::default()
        };
        let budget_query = BudgetQuery::default();

        let (categories, expenses, budgets) = tokio::try_join!(
            categories_api.list(),
            expenses_api.list(&expense_query),
            budgets_api.list(&budget_query),
        )?;

        self.categories = categories;
        self.expenses = expenses;
        self.budgets = budgets;
        self.update_category_selects();
        Ok(())
    }

    /// Switches tab and reloads what that tab shows.
    pub async fn show_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        match tab {
            Tab::Dashboard => self.update_dashboard().await,
            Tab::Expenses => self.load_expenses().await,
            Tab::Budgets => self.load_budgets().await,
            Tab::Categories => self.load_categories().await,
        }
    }

    pub async fn update_dashboard(&mut self) {
        if let Err(err) = self.refresh_summary().await {
            error!("failed to update dashboard: {err}");
            self.notify_error("Failed to update the dashboard.");
            return;
        }
        self.update_charts().await;
        self.update_recent_expenses();
    }

    async fn refresh_summary(&mut self) -> Result<(), ClientError> {
        let today = utils::today();
        let current = CurrentDate::at(today);
        let range = current_month_range(today);
        let expense_query = ExpenseQuery {
            start_date: Some(range.start),
            end_date: Some(range.end),
            limit: Some(DASHBOARD_EXPENSE_LIMIT),
            ..ExpenseQuery::default()
        };
        let budget_query = BudgetQuery {
            period: Some(BudgetPeriod::Monthly),
            year: Some(current.year),
            month: Some(current.month),
            category: None,
        };

        let expenses_api = self.api.expenses();
        let budgets_api = self.api.budgets();
        let (monthly_expenses, monthly_budgets) = tokio::try_join!(
            expenses_api.list(&expense_query),
            budgets_api.list(&budget_query),
        )?;

        let total_expense: f64 = monthly_expenses.iter().map(|expense| expense.amount).sum();
        let total_budget: f64 = monthly_budgets.iter().map(|budget| budget.amount).sum();
        let progress = if total_budget > 0.0 {
            (total_expense / total_budget * 100.0).min(100.0)
        } else {
            0.0
        };

        self.panels.summary = DashboardSummary {
            total_expense,
            total_budget,
            remaining: total_budget - total_expense,
            progress,
            days_left: days_left_in_month(today),
        };
        Ok(())
    }

    pub async fn update_charts(&mut self) {
        let (category, monthly) =
            tokio::join!(self.fetch_category_chart(), self.fetch_monthly_chart());

        match category {
            Ok(chart) => self.charts.category = chart,
            Err(err) => error!("failed to update category chart: {err}"),
        }
        match monthly {
            Ok(chart) => self.charts.monthly = chart,
            Err(err) => error!("failed to update monthly chart: {err}"),
        }
    }

    pub async fn update_category_chart(&mut self) {
        match self.fetch_category_chart().await {
            Ok(chart) => self.charts.category = chart,
            Err(err) => error!("failed to update category chart: {err}"),
        }
    }

    async fn fetch_category_chart(&self) -> Result<Option<ChartConfig>, ClientError> {
        let current = CurrentDate::now();
        let query = match self.chart_period {
            ChartPeriod::Month => PeriodQuery {
                year: Some(current.year),
                month: Some(current.month),
            },
            ChartPeriod::Year => PeriodQuery {
                year: Some(current.year),
                month: None,
            },
        };
        let summary = self.api.expenses().category_summary(&query).await?;
        Ok((!summary.is_empty())
            .then(|| ui::create_chart(ChartKind::Doughnut, ui::create_category_chart_data(&summary))))
    }

    async fn fetch_monthly_chart(&self) -> Result<Option<ChartConfig>, ClientError> {
        let current = CurrentDate::now();
        let months = self.api.expenses().monthly_summary(Some(current.year)).await?;
        Ok((!months.is_empty())
            .then(|| ui::create_chart(ChartKind::Line, ui::create_monthly_chart_data(&months))))
    }

    fn update_recent_expenses(&mut self) {
        let recent = &self.expenses[..self.expenses.len().min(RECENT_EXPENSE_COUNT)];
        self.panels.recent_expenses = render_expense_list(recent);
    }

    fn update_category_selects(&mut self) {
        self.panels.filter_options = ui::render_category_options(&self.categories, "");
    }

    pub async fn load_expenses(&mut self) {
        let query = ExpenseQuery {
            limit: Some(INITIAL_EXPENSE_LIMIT),
            ..ExpenseQuery::default()
        };
        let result = self.api.expenses().list(&query).await;

        match result {
            Ok(expenses) => {
                self.expenses = expenses;
                self.panels.expenses_list = render_expense_list(&self.expenses);
            }
            Err(err) => {
                error!("failed to load expenses: {err}");
                self.notify_error("Failed to load expenses.");
            }
        }
    }

    pub async fn load_budgets(&mut self) {
        let current = CurrentDate::now();
        let status_query = StatusQuery {
            year: current.year,
            month: Some(current.month),
        };
        let list_query = BudgetQuery::default();
        let budgets_api = self.api.budgets();
        let result = tokio::try_join!(budgets_api.status(&status_query), budgets_api.list(&list_query));

        match result {
            Ok((status, budgets)) => {
                self.panels.budget_status = if status.budget_status.is_empty() {
                    ui::render_empty_state(
                        "fa-piggy-bank",
                        "No budgets set",
                        "Set a budget to keep your spending in check.",
                        Some(EmptyAction::Link {
                            label: "Set budget",
                            href: "/budgets/new",
                        }),
                    )
                } else {
                    status
                        .budget_status
                        .iter()
                        .map(ui::render_budget_status_item)
                        .collect()
                };
                self.panels.budgets_list = if budgets.is_empty() {
                    ui::render_notice("No budgets set.")
                } else {
                    ui::render_budget_table(&budgets)
                };
                self.budgets = budgets;
            }
            Err(err) => {
                error!("failed to load budgets: {err}");
                self.notify_error("Failed to load budgets.");
            }
        }
    }

    pub async fn load_categories(&mut self) {
        let result = self.api.categories().list().await;

        match result {
            Ok(categories) => {
                self.categories = categories;
                self.panels.categories_list = if self.categories.is_empty() {
                    ui::render_empty_state(
                        "fa-tags",
                        "No categories yet",
                        "Add the default categories or create your own.",
                        Some(EmptyAction::Post {
                            label: "Add default categories",
                            action: "/categories/initialize",
                        }),
                    )
                } else {
                    self.categories.iter().map(ui::render_category_item).collect()
                };
                self.update_category_selects();
            }
            Err(err) => {
                error!("failed to load categories: {err}");
                self.notify_error("Failed to load categories.");
            }
        }
    }

    pub async fn filter_expenses(&mut self, filter: &ExpenseFilter) {
        self.current_tab = Tab::Expenses;
        let result = match filter.to_query() {
            Ok(query) => self.api.expenses().list(&query).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(expenses) if expenses.is_empty() => {
                self.panels.expenses_list = ui::render_notice("No expenses match the filter.");
            }
            Ok(expenses) => {
                self.panels.expenses_list = expenses.iter().map(ui::render_expense_item).collect();
            }
            Err(err) => {
                error!("failed to filter expenses: {err}");
                self.notify_error("Failed to filter expenses.");
            }
        }
    }

    pub fn show_expense_modal(&mut self, expense_id: Option<&str>) {
        self.editing_expense = expense_id.map(str::to_string);
        let mut form = expense_id
            .and_then(|id| self.expenses.iter().find(|expense| expense.id == id))
            .map(ExpenseForm::from)
            .unwrap_or_else(|| ExpenseForm::new(utils::today()));
        form.id = expense_id.unwrap_or_default().to_string();
        self.modal = Some(Modal::Expense(form));
    }

    pub fn show_budget_modal(&mut self, budget_id: Option<&str>) {
        self.editing_budget = budget_id.map(str::to_string);
        let mut form = budget_id
            .and_then(|id| self.budgets.iter().find(|budget| budget.id == id))
            .map(BudgetForm::from)
            .unwrap_or_else(|| BudgetForm::new(&CurrentDate::now()));
        form.id = budget_id.unwrap_or_default().to_string();
        self.modal = Some(Modal::Budget(form));
    }

    pub fn show_category_modal(&mut self, category_id: Option<&str>) {
        self.editing_category = category_id.map(str::to_string);
        let mut form = category_id
            .and_then(|id| self.categories.iter().find(|category| category.id == id))
            .map(CategoryForm::from)
            .unwrap_or_default();
        form.id = category_id.unwrap_or_default().to_string();
        self.modal = Some(Modal::Category(form));
    }

    /// Closes the modal and forgets which record it was editing.
    pub fn hide_modal(&mut self) {
        self.modal = None;
        self.editing_expense = None;
        self.editing_budget = None;
        self.editing_category = None;
    }

    /// Returns whether the expense was saved. On failure the modal stays open.
    pub async fn save_expense(&mut self, form: ExpenseForm) -> bool {
        let result = self.submit_expense(&form).await;

        match result {
            Ok(message) => {
                self.notify(message);
                self.modal = None;
                self.editing_expense = None;
                self.load_initial_data().await;
                self.refresh_expense_views().await;
                true
            }
            Err(err) => {
                error!("failed to save expense: {err}");
                self.notify_error("Failed to save expense.");
                self.editing_expense = edit_target(&form.id).map(str::to_string);
                self.modal = Some(Modal::Expense(form));
                false
            }
        }
    }

    async fn submit_expense(&self, form: &ExpenseForm) -> Result<String, ClientError> {
        let payload = form.to_payload()?;
        let expenses = self.api.expenses();
        match edit_target(&form.id) {
            Some(id) => {
                let mut update = ExpenseUpdate::from(payload);
                // An empty description clears the stored one.
                update.description.get_or_insert_with(String::new);
                expenses.update(id, &update).await?;
                Ok("Expense updated.".to_string())
            }
            None => {
                expenses.create(&payload).await?;
                Ok("Expense added.".to_string())
            }
        }
    }

    async fn refresh_expense_views(&mut self) {
        match self.current_tab {
            Tab::Expenses => self.load_expenses().await,
            Tab::Dashboard => self.update_dashboard().await,
            _ => {}
        }
    }

    async fn refresh_budget_views(&mut self) {
        match self.current_tab {
            Tab::Budgets => self.load_budgets().await,
            Tab::Dashboard => self.update_dashboard().await,
            _ => {}
        }
    }

    pub async fn save_budget(&mut self, form: BudgetForm) -> bool {
        let result = self.submit_budget(&form).await;

        match result {
            Ok(message) => {
                self.notify(message);
                self.modal = None;
                self.editing_budget = None;
                self.refresh_budget_views().await;
                true
            }
            Err(err) => {
                error!("failed to save budget: {err}");
                self.notify_error("Failed to save budget.");
                self.editing_budget = edit_target(&form.id).map(str::to_string);
                self.modal = Some(Modal::Budget(form));
                false
            }
        }
    }

    async fn submit_budget(&self, form: &BudgetForm) -> Result<String, ClientError> {
        let payload = form.to_payload()?;
        let budgets = self.api.budgets();
        match edit_target(&form.id) {
            Some(id) => {
                budgets.update(id, &payload).await?;
                Ok("Budget updated.".to_string())
            }
            None => {
                budgets.create(&payload).await?;
                Ok("Budget saved.".to_string())
            }
        }
    }

    pub async fn save_category(&mut self, form: CategoryForm) -> bool {
        let result = self.submit_category(&form).await;

        match result {
            Ok(message) => {
                self.notify(message);
                self.modal = None;
                self.editing_category = None;
                self.load_categories().await;
                true
            }
            Err(err) => {
                error!("failed to save category: {err}");
                self.notify_error("Failed to save category.");
                self.editing_category = edit_target(&form.id).map(str::to_string);
                self.modal = Some(Modal::Category(form));
                false
            }
        }
    }

    async fn submit_category(&self, form: &CategoryForm) -> Result<String, ClientError> {
        let payload = form.to_payload();
        let categories = self.api.categories();
        match edit_target(&form.id) {
            Some(id) => {
                categories.update(id, &payload).await?;
                Ok("Category updated.".to_string())
            }
            None => {
                categories.create(&payload).await?;
                Ok("Category added.".to_string())
            }
        }
    }

    /// Without confirmation this only opens the confirm dialog.
    pub async fn delete_expense(&mut self, id: &str, confirmed: bool) -> bool {
        if !self.confirm_delete(EntityKind::Expense, id, confirmed) {
            return false;
        }
        let result = self.api.expenses().delete(id).await;

        match result {
            Ok(_) => {
                self.notify("Expense deleted.");
                self.load_initial_data().await;
                self.refresh_expense_views().await;
                true
            }
            Err(err) => {
                error!("failed to delete expense {id}: {err}");
                self.notify_error("Failed to delete expense.");
                false
            }
        }
    }

    pub async fn delete_budget(&mut self, id: &str, confirmed: bool) -> bool {
        if !self.confirm_delete(EntityKind::Budget, id, confirmed) {
            return false;
        }
        let result = self.api.budgets().delete(id).await;

        match result {
            Ok(_) => {
                self.notify("Budget deleted.");
                self.refresh_budget_views().await;
                true
            }
            Err(err) => {
                error!("failed to delete budget {id}: {err}");
                self.notify_error("Failed to delete budget.");
                false
            }
        }
    }

    pub async fn delete_category(&mut self, id: &str, confirmed: bool) -> bool {
        if !self.confirm_delete(EntityKind::Category, id, confirmed) {
            return false;
        }
        let result = self.api.categories().delete(id).await;

        match result {
            Ok(_) => {
                self.notify("Category deleted.");
                self.load_categories().await;
                true
            }
            Err(err) => {
                error!("failed to delete category {id}: {err}");
                self.notify_error("Failed to delete category.");
                false
            }
        }
    }

    /// Opens the confirm dialog when `confirmed` is false; closes it otherwise.
    fn confirm_delete(&mut self, kind: EntityKind, id: &str, confirmed: bool) -> bool {
        if confirmed {
            self.modal = None;
        } else {
            self.modal = Some(Modal::ConfirmDelete {
                kind,
                id: id.to_string(),
            });
        }
        confirmed
    }

    pub async fn initialize_categories(&mut self) {
        let result = self.api.categories().initialize().await;

        match result {
            Ok(response) => {
                self.notify(response.message);
                self.load_categories().await;
            }
            Err(err) => {
                error!("failed to initialize categories: {err}");
                self.notify_error("Failed to add default categories.");
            }
        }
    }

    /// Redraws the category chart and saves the choice in the background.
    pub async fn set_chart_period(&mut self, period: ChartPeriod) {
        self.chart_period = period;
        let store = self.store.clone();
        self.debouncer.call(async move {
            store.set(CHART_PERIOD_KEY, &period).await;
        });
        self.update_category_chart().await;
    }

    /// Renders the whole page. A toast is shown once, and only while fresh.
    pub fn render(&mut self) -> String {
        let toast = self
            .toast
            .take()
            .filter(|toast| toast.is_visible(Instant::now()));

        let tab = self.current_tab;
        let modal = match &self.modal {
            Some(Modal::Expense(form)) => ui::render_expense_modal(form, &self.categories, tab),
            Some(Modal::Budget(form)) => ui::render_budget_modal(form, &self.categories, tab),
            Some(Modal::Category(form)) => ui::render_category_modal(form, tab),
            Some(Modal::ConfirmDelete { kind, id }) => ui::render_confirm_modal(*kind, id, tab),
            None => String::new(),
        };

        let view = PageView {
            tab: self.current_tab,
            summary: &self.panels.summary,
            category_chart: self.charts.category.as_ref(),
            monthly_chart: self.charts.monthly.as_ref(),
            chart_period: self.chart_period,
            recent_expenses: &self.panels.recent_expenses,
            expenses_list: &self.panels.expenses_list,
            budget_status: &self.panels.budget_status,
            budgets_list: &self.panels.budgets_list,
            categories_list: &self.panels.categories_list,
            filter_options: &self.panels.filter_options,
            modal,
            toast: toast.as_ref(),
        };
        ui::render_page(&view)
    }
}

fn render_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        ui::render_empty_state(
            "fa-receipt",
            "No expenses yet",
            "Add your first expense.",
            Some(EmptyAction::Link {
                label: "Add expense",
                href: "/expenses/new",
            }),
        )
    } else {
        expenses.iter().map(ui::render_expense_item).collect()
    }
}
