//! Markup helpers for the dashboard page.
//!
//! Everything here is a pure transform from records to HTML fragments or
//! chart-library data. Fragments are built with `maud`, which escapes every
//! interpolated value. The controller decides which fragments go where.

use crate::controller::{BudgetForm, CategoryForm, ChartPeriod, EntityKind, ExpenseForm, Tab};
use crate::models::{Budget, BudgetPeriod, BudgetStatusItem, Category, CategorySummary, Expense, MonthlySummary};
use crate::utils::{calculate_percentage, format_currency, format_date};
use maud::{html, Markup, PreEscaped};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

const CATEGORY_PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    /// A toast dismisses itself once `TOAST_DURATION` has passed.
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < TOAST_DURATION
    }
}

pub fn render_toast(toast: Option<&Toast>) -> String {
    let markup = match toast {
        Some(toast) => html! {
            div id="toast" class={ "toast " (toast.kind.class()) " show" } role="status" {
                (toast.message)
            }
        },
        None => html! { div id="toast" class="toast" {} },
    };
    markup.into_string()
}

/// The overlay starts hidden. The page script reveals it while a form
/// submits or a tab loads, since every server round trip ends in a new page.
pub fn render_loading() -> String {
    let markup = html! {
        div id="loading" class="loading hidden" { div.spinner {} }
    };
    markup.into_string()
}

fn action_links(segment: &str, id: &str) -> Markup {
    html! {
        a.btn-icon.edit href={ "/" (segment) "/" (id) "/edit" } title="Edit" { i.fas.fa-edit {} }
        a.btn-icon.delete href={ "/" (segment) "/" (id) "/delete" } title="Delete" { i.fas.fa-trash {} }
    }
}

pub fn render_expense_item(expense: &Expense) -> String {
    let title = expense.description.as_deref().unwrap_or("Expense");
    let markup = html! {
        div.expense-item data-id=(expense.id) {
            div.expense-info {
                div.expense-title { (title) }
                div.expense-details { (expense.category) " • " (format_date(expense.date)) }
            }
            div.expense-amount { (format_currency(expense.amount)) }
            div.expense-actions { (action_links("expenses", &expense.id)) }
        }
    };
    markup.into_string()
}

pub fn render_category_item(category: &Category) -> String {
    let markup = html! {
        div.category-item data-id=(category.id) {
            div.category-info {
                div.category-color style={ "background-color: " (category.color) } {}
                div.category-name { (category.name) }
            }
            div.category-actions { (action_links("categories", &category.id)) }
        }
    };
    markup.into_string()
}

/// `safe` below 80%, `warning` from 80%, `danger` from 100%.
pub fn budget_status_class(percentage: i64) -> &'static str {
    if percentage >= 100 {
        "danger"
    } else if percentage >= 80 {
        "warning"
    } else {
        "safe"
    }
}

pub fn render_budget_status_item(budget: &BudgetStatusItem) -> String {
    let percentage = calculate_percentage(budget.spent_amount, budget.budget_amount);
    let status = budget_status_class(percentage);
    let markup = html! {
        div.budget-status-item {
            div.budget-header {
                div.budget-category { (budget.category) }
                div class={ "budget-percentage " (status) } { (percentage) "%" }
            }
            div.budget-progress {
                div class={ "budget-progress-bar " (status) } style={ "width: " (percentage.clamp(0, 100)) "%" } {}
            }
            div.budget-amounts {
                span { "Spent: " (format_currency(budget.spent_amount)) }
                span { "Budget: " (format_currency(budget.budget_amount)) }
            }
        }
    };
    markup.into_string()
}

pub fn render_budget_table(budgets: &[Budget]) -> String {
    let markup = html! {
        div.table-responsive {
            table.table {
                thead {
                    tr {
                        th { "Category" } th { "Amount" } th { "Period" }
                        th { "Year" } th { "Month" } th { "Actions" }
                    }
                }
                tbody {
                    @for budget in budgets {
                        tr {
                            td { (budget.category) }
                            td { (format_currency(budget.amount)) }
                            td { (budget.period.label()) }
                            td { (budget.year) }
                            td {
                                @if let Some(month) = budget.month { (month) } @else { "-" }
                            }
                            td { (action_links("budgets", &budget.id)) }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Follow-up offered by an empty state: a link, or a button posting to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyAction<'a> {
    Link { label: &'a str, href: &'a str },
    Post { label: &'a str, action: &'a str },
}

/// Placeholder for an empty collection.
pub fn render_empty_state(
    icon: &str,
    title: &str,
    description: &str,
    action: Option<EmptyAction<'_>>,
) -> String {
    let markup = html! {
        div.empty-state {
            i class={ "fas " (icon) } {}
            h3 { (title) }
            p { (description) }
            @match action {
                Some(EmptyAction::Link { label, href }) => {
                    a.btn.btn-primary href=(href) { (label) }
                }
                Some(EmptyAction::Post { label, action: target }) => {
                    form method="post" action=(target) {
                        button.btn.btn-primary type="submit" { (label) }
                    }
                }
                None => {}
            }
        }
    };
    markup.into_string()
}

pub fn render_notice(message: &str) -> String {
    let markup = html! { p.notice { (message) } };
    markup.into_string()
}

fn category_options(categories: &[Category], selected: &str) -> Markup {
    html! {
        @for category in categories {
            option value=(category.name) selected[category.name == selected] { (category.name) }
        }
    }
}

pub fn render_category_options(categories: &[Category], selected: &str) -> String {
    category_options(categories, selected).into_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    Each(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: ColorSpec,
    pub border_color: String,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Chart.js configuration object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Value,
}

pub fn create_chart(kind: ChartKind, data: ChartData) -> ChartConfig {
    ChartConfig {
        kind,
        data,
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "position": "bottom" } }
        }),
    }
}

pub fn create_category_chart_data(summary: &[CategorySummary]) -> ChartData {
    let colors = CATEGORY_PALETTE
        .iter()
        .take(summary.len())
        .map(|color| color.to_string())
        .collect();
    ChartData {
        labels: summary.iter().map(|item| item.category.clone()).collect(),
        datasets: vec![Dataset {
            label: None,
            data: summary.iter().map(|item| item.total_amount).collect(),
            background_color: ColorSpec::Each(colors),
            border_color: "#fff".to_string(),
            border_width: 2,
            fill: None,
            tension: None,
        }],
    }
}

pub fn create_monthly_chart_data(months: &[MonthlySummary]) -> ChartData {
    ChartData {
        labels: months.iter().map(|item| item.month.clone()).collect(),
        datasets: vec![Dataset {
            label: Some("Monthly spending".to_string()),
            data: months.iter().map(|item| item.total_amount).collect(),
            background_color: ColorSpec::Single("rgba(59, 130, 246, 0.1)".to_string()),
            border_color: "#3B82F6".to_string(),
            border_width: 2,
            fill: Some(true),
            tension: Some(0.4),
        }],
    }
}

/// A canvas plus its embedded config, or the "No data" placeholder.
pub fn render_chart(canvas_id: &str, chart: Option<&ChartConfig>) -> String {
    let Some(chart) = chart else {
        return html! { div.chart-empty { "No data" } }.into_string();
    };
    // serde_json output cannot fail for these types; fall back to an empty object.
    let config = serde_json::to_string(chart)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    let markup = html! {
        canvas id=(canvas_id) {}
        script type="application/json" data-chart=(canvas_id) { (PreEscaped(config)) }
    };
    markup.into_string()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_expense: f64,
    pub total_budget: f64,
    pub remaining: f64,
    pub progress: f64,
    pub days_left: u32,
}

fn render_summary(summary: &DashboardSummary) -> String {
    let progress = format!("{:.1}", summary.progress.clamp(0.0, 100.0));
    let markup = html! {
        div.summary-grid {
            div.summary-card {
                span.label { "Spent this month" }
                span id="monthly-expense" class="value" { (format_currency(summary.total_expense)) }
            }
            div.summary-card {
                span.label { "Monthly budget" }
                span id="monthly-budget" class="value" { (format_currency(summary.total_budget)) }
            }
            div.summary-card {
                span.label { "Remaining" }
                span id="remaining-budget" class="value" { (format_currency(summary.remaining)) }
            }
        }
        div.progress {
            div id="budget-progress" class="progress-bar" style={ "width: " (progress) "%" } {}
        }
        p id="days-left" class="hint" { (summary.days_left) " days left this month" }
    };
    markup.into_string()
}

/// Hidden field naming the edited record; blank in add mode.
fn id_field(id: &str) -> Markup {
    html! { input type="hidden" name="id" value=(id); }
}

fn modal_actions(back: &str, danger: bool) -> Markup {
    html! {
        div.modal-actions {
            a.btn href=(back) { "Cancel" }
            @if danger {
                button.btn.btn-danger type="submit" { "Delete" }
            } @else {
                button.btn.btn-primary type="submit" { "Save" }
            }
        }
    }
}

fn modal_header(title_id: Option<&str>, title: &str, back: &str) -> Markup {
    html! {
        div.modal-header {
            h3 id=[title_id] { (title) }
            a.close href=(back) { "×" }
        }
    }
}

/// Modals sit over `tab`; closing one returns there.
pub fn render_expense_modal(form: &ExpenseForm, categories: &[Category], tab: Tab) -> String {
    let title = if form.id.is_empty() { "Add Expense" } else { "Edit Expense" };
    let back = format!("/?tab={}", tab.as_str());
    let markup = html! {
        div id="expense-modal" class="modal show" {
            div.modal-content {
                (modal_header(Some("expense-modal-title"), title, &back))
                form id="expense-form" method="post" action="/expenses/save" {
                    (id_field(&form.id))
                    label {
                        "Amount"
                        input id="expense-amount" name="amount" type="number" step="any" min="0" required value=(form.amount);
                    }
                    label {
                        "Category"
                        select id="expense-category" name="category" required {
                            (category_options(categories, &form.category))
                        }
                    }
                    label {
                        "Date"
                        input id="expense-date" name="date" type="date" required value=(form.date);
                    }
                    label {
                        "Description"
                        input id="expense-description" name="description" type="text" value=(form.description);
                    }
                    (modal_actions(&back, false))
                }
            }
        }
    };
    markup.into_string()
}

pub fn render_budget_modal(form: &BudgetForm, categories: &[Category], tab: Tab) -> String {
    let title = if form.id.is_empty() { "Set Budget" } else { "Edit Budget" };
    let back = format!("/?tab={}", tab.as_str());
    let monthly = BudgetPeriod::parse(&form.period) != Some(BudgetPeriod::Yearly);
    let month_style = if monthly { "display: block" } else { "display: none" };
    let markup = html! {
        div id="budget-modal" class="modal show" {
            div.modal-content {
                (modal_header(Some("budget-modal-title"), title, &back))
                form id="budget-form" method="post" action="/budgets/save" {
                    (id_field(&form.id))
                    label {
                        "Category"
                        select id="budget-category" name="category" required {
                            (category_options(categories, &form.category))
                        }
                    }
                    label {
                        "Amount"
                        input id="budget-amount" name="amount" type="number" step="any" min="0" required value=(form.amount);
                    }
                    label {
                        "Period"
                        select id="budget-period" name="period" {
                            option value="monthly" selected[monthly] { "Monthly" }
                            option value="yearly" selected[!monthly] { "Yearly" }
                        }
                    }
                    label {
                        "Year"
                        input id="budget-year" name="year" type="number" min="2020" max="2030" required value=(form.year);
                    }
                    label id="month-field" style=(month_style) {
                        "Month"
                        input id="budget-month" name="month" type="number" min="1" max="12" value=(form.month);
                    }
                    (modal_actions(&back, false))
                }
            }
        }
    };
    markup.into_string()
}

pub fn render_category_modal(form: &CategoryForm, tab: Tab) -> String {
    let title = if form.id.is_empty() { "Add Category" } else { "Edit Category" };
    let back = format!("/?tab={}", tab.as_str());
    let markup = html! {
        div id="category-modal" class="modal show" {
            div.modal-content {
                (modal_header(Some("category-modal-title"), title, &back))
                form id="category-form" method="post" action="/categories/save" {
                    (id_field(&form.id))
                    label {
                        "Name"
                        input id="category-name" name="name" type="text" maxlength="50" required value=(form.name);
                    }
                    label {
                        "Color"
                        input id="category-color" name="color" type="color" value=(form.color);
                        span id="color-preview" class="color-preview" style={ "background-color: " (form.color) } {}
                    }
                    (modal_actions(&back, false))
                }
            }
        }
    };
    markup.into_string()
}

pub fn render_confirm_modal(kind: EntityKind, id: &str, tab: Tab) -> String {
    let prompt = match kind {
        EntityKind::Expense => "Delete this expense?",
        EntityKind::Budget => "Delete this budget?",
        EntityKind::Category => {
            "Delete this category? Categories used by expenses or budgets cannot be deleted."
        }
    };
    let back = format!("/?tab={}", tab.as_str());
    let markup = html! {
        div id="confirm-modal" class="modal show" {
            div.modal-content {
                (modal_header(None, "Confirm", &back))
                p { (prompt) }
                form method="post" action={ "/" (kind.route_segment()) "/" (id) "/delete" } {
                    input type="hidden" name="confirm" value="yes";
                    (modal_actions(&back, true))
                }
            }
        }
    };
    markup.into_string()
}

/// Everything needed to lay out one full page.
pub struct PageView<'a> {
    pub tab: Tab,
    pub summary: &'a DashboardSummary,
    pub category_chart: Option<&'a ChartConfig>,
    pub monthly_chart: Option<&'a ChartConfig>,
    pub chart_period: ChartPeriod,
    pub recent_expenses: &'a str,
    pub expenses_list: &'a str,
    pub budget_status: &'a str,
    pub budgets_list: &'a str,
    pub categories_list: &'a str,
    pub filter_options: &'a str,
    pub modal: String,
    pub toast: Option<&'a Toast>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let nav = html! {
        @for tab in Tab::ALL {
            a.nav-btn.active[tab == view.tab] data-tab=(tab.as_str()) href={ "/?tab=" (tab.as_str()) } {
                i class={ "fas " (tab.icon()) } {}
                " " (tab.label())
            }
        }
    }
    .into_string();

    let section_class = |tab: Tab| {
        if tab == view.tab {
            "tab-content active"
        } else {
            "tab-content"
        }
    };
    let (month_selected, year_selected) = match view.chart_period {
        ChartPeriod::Month => (" selected", ""),
        ChartPeriod::Year => ("", " selected"),
    };

    PAGE_HTML
        .replace("{{NAV}}", &nav)
        .replace("{{DASHBOARD_CLASS}}", section_class(Tab::Dashboard))
        .replace("{{EXPENSES_CLASS}}", section_class(Tab::Expenses))
        .replace("{{BUDGETS_CLASS}}", section_class(Tab::Budgets))
        .replace("{{CATEGORIES_CLASS}}", section_class(Tab::Categories))
        .replace("{{SUMMARY}}", &render_summary(view.summary))
        .replace("{{PERIOD_MONTH}}", month_selected)
        .replace("{{PERIOD_YEAR}}", year_selected)
        .replace("{{CATEGORY_CHART}}", &render_chart("categoryChart", view.category_chart))
        .replace("{{MONTHLY_CHART}}", &render_chart("monthlyChart", view.monthly_chart))
        .replace("{{RECENT_EXPENSES}}", view.recent_expenses)
        .replace("{{FILTER_OPTIONS}}", view.filter_options)
        .replace("{{EXPENSES_LIST}}", view.expenses_list)
        .replace("{{BUDGET_STATUS}}", view.budget_status)
        .replace("{{BUDGETS_LIST}}", view.budgets_list)
        .replace("{{CATEGORIES_LIST}}", view.categories_list)
        .replace("{{MODAL}}", &view.modal)
        .replace("{{TOAST}}", &render_toast(view.toast))
        .replace("{{LOADING}}", &render_loading())
}

const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Expense Tracker</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css" />
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    :root {
      --bg: #f1f5f9;
      --ink: #1e293b;
      --muted: #64748b;
      --primary: #3b82f6;
      --safe: #10b981;
      --warning: #f59e0b;
      --danger: #ef4444;
      --card: #ffffff;
      --shadow: 0 10px 30px rgba(15, 23, 42, 0.08);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    header.topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 18px 28px;
      background: var(--card);
      box-shadow: var(--shadow);
    }

    header.topbar h1 { margin: 0; font-size: 1.5rem; }

    nav { display: flex; gap: 6px; }

    .nav-btn {
      padding: 8px 14px;
      border-radius: 999px;
      color: var(--muted);
      text-decoration: none;
      font-weight: 600;
    }

    .nav-btn.active { background: var(--primary); color: white; }

    main { width: min(1100px, 100%); margin: 0 auto; padding: 24px 18px 48px; }

    .tab-content { display: none; gap: 20px; }
    .tab-content.active { display: grid; }

    .card {
      background: var(--card);
      border-radius: 16px;
      padding: 20px;
      box-shadow: var(--shadow);
    }

    .card-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      margin-bottom: 12px;
    }

    .card-header h2 { margin: 0; font-size: 1.15rem; }

    .summary-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .summary-card { display: grid; gap: 6px; }
    .summary-card .label { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.1em; color: var(--muted); }
    .summary-card .value { font-size: 1.6rem; font-weight: 700; }

    .progress, .budget-progress { height: 10px; border-radius: 999px; background: #e2e8f0; overflow: hidden; margin-top: 14px; }
    .progress-bar, .budget-progress-bar { height: 100%; background: var(--primary); }
    .budget-progress-bar.safe { background: var(--safe); }
    .budget-progress-bar.warning { background: var(--warning); }
    .budget-progress-bar.danger { background: var(--danger); }
    .budget-percentage.safe { color: var(--safe); }
    .budget-percentage.warning { color: var(--warning); }
    .budget-percentage.danger { color: var(--danger); }

    .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 20px; }
    .chart-box { position: relative; height: 280px; }
    .chart-empty { display: grid; place-items: center; height: 100%; color: var(--muted); }

    .expense-item, .category-item {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 12px 0;
      border-bottom: 1px solid #e2e8f0;
    }

    .expense-info, .category-info { flex: 1; display: flex; flex-direction: column; gap: 4px; }
    .category-info { flex-direction: row; align-items: center; gap: 10px; }
    .expense-details { color: var(--muted); font-size: 0.9rem; }
    .expense-amount { font-weight: 700; }
    .category-color, .color-preview { width: 18px; height: 18px; border-radius: 50%; display: inline-block; }

    .budget-status-item { padding: 12px 0; border-bottom: 1px solid #e2e8f0; }
    .budget-header, .budget-amounts { display: flex; justify-content: space-between; }
    .budget-amounts { color: var(--muted); font-size: 0.9rem; margin-top: 8px; }

    .table { width: 100%; border-collapse: collapse; }
    .table th, .table td { text-align: left; padding: 10px 8px; border-bottom: 1px solid #e2e8f0; }

    .btn, .btn-icon {
      display: inline-flex;
      align-items: center;
      gap: 6px;
      border: none;
      border-radius: 10px;
      padding: 9px 14px;
      background: #e2e8f0;
      color: var(--ink);
      font-weight: 600;
      text-decoration: none;
      cursor: pointer;
    }

    .btn-icon { padding: 6px 8px; background: transparent; color: var(--muted); }
    .btn-icon.delete:hover { color: var(--danger); }
    .btn-primary { background: var(--primary); color: white; }
    .btn-danger { background: var(--danger); color: white; }

    .filters { display: flex; flex-wrap: wrap; gap: 10px; align-items: end; margin-bottom: 12px; }

    label { display: grid; gap: 6px; font-size: 0.9rem; color: var(--muted); }

    input, select {
      padding: 9px 10px;
      border-radius: 10px;
      border: 1px solid #cbd5e1;
      font: inherit;
      color: var(--ink);
    }

    .empty-state { text-align: center; padding: 28px 12px; color: var(--muted); }
    .empty-state i { font-size: 2rem; }
    .notice { text-align: center; color: var(--muted); }
    .hint { color: var(--muted); margin: 8px 0 0; }

    .modal {
      position: fixed;
      inset: 0;
      display: none;
      align-items: center;
      justify-content: center;
      background: rgba(15, 23, 42, 0.45);
    }

    .modal.show { display: flex; }
    .modal-content { width: min(460px, 92vw); background: var(--card); border-radius: 16px; padding: 22px; display: grid; gap: 14px; }
    .modal-content form { display: grid; gap: 12px; }
    .modal-header { display: flex; justify-content: space-between; align-items: center; }
    .modal-header h3 { margin: 0; }
    .modal-header .close { font-size: 1.6rem; color: var(--muted); text-decoration: none; }
    .modal-actions { display: flex; justify-content: flex-end; gap: 8px; }

    .toast {
      position: fixed;
      right: 24px;
      bottom: 24px;
      padding: 12px 18px;
      border-radius: 12px;
      color: white;
      opacity: 0;
      pointer-events: none;
    }

    .toast.success { background: var(--safe); }
    .toast.error { background: var(--danger); }
    .toast.show { animation: toast-life 3s ease forwards; }

    @keyframes toast-life {
      0% { opacity: 0; transform: translateY(12px); }
      8% { opacity: 1; transform: translateY(0); }
      90% { opacity: 1; }
      100% { opacity: 0; }
    }

    .loading { position: fixed; inset: 0; display: grid; place-items: center; background: rgba(255, 255, 255, 0.6); }
    .loading.hidden { display: none; }
    .spinner { width: 42px; height: 42px; border-radius: 50%; border: 4px solid #cbd5e1; border-top-color: var(--primary); animation: spin 0.8s linear infinite; }
    @keyframes spin { to { transform: rotate(360deg); } }
  </style>
</head>
<body>
  <header class="topbar">
    <h1><i class="fas fa-wallet"></i> Expense Tracker</h1>
    <nav>{{NAV}}</nav>
  </header>

  <main>
    <section id="dashboard" class="{{DASHBOARD_CLASS}}">
      <div class="card">{{SUMMARY}}</div>
      <div class="charts">
        <div class="card">
          <div class="card-header">
            <h2>Spending by category</h2>
            <form method="get" action="/">
              <input type="hidden" name="tab" value="dashboard">
              <select id="chart-period" name="chart_period" onchange="this.form.submit()">
                <option value="month"{{PERIOD_MONTH}}>This month</option>
                <option value="year"{{PERIOD_YEAR}}>This year</option>
              </select>
            </form>
          </div>
          <div class="chart-box">{{CATEGORY_CHART}}</div>
        </div>
        <div class="card">
          <div class="card-header"><h2>Monthly spending</h2></div>
          <div class="chart-box">{{MONTHLY_CHART}}</div>
        </div>
      </div>
      <div class="card">
        <div class="card-header"><h2>Recent expenses</h2><a class="btn btn-primary" href="/expenses/new"><i class="fas fa-plus"></i> Add expense</a></div>
        <div id="recent-expenses-list">{{RECENT_EXPENSES}}</div>
      </div>
    </section>

    <section id="expenses" class="{{EXPENSES_CLASS}}">
      <div class="card">
        <div class="card-header"><h2>Expenses</h2><a class="btn btn-primary" href="/expenses/new"><i class="fas fa-plus"></i> Add expense</a></div>
        <form class="filters" method="get" action="/expenses/filter">
          <label>Category<select id="expense-filter-category" name="category"><option value="">All</option>{{FILTER_OPTIONS}}</select></label>
          <label>From<input id="expense-filter-start" name="start_date" type="date"></label>
          <label>To<input id="expense-filter-end" name="end_date" type="date"></label>
          <button class="btn" type="submit"><i class="fas fa-filter"></i> Filter</button>
        </form>
        <div id="expenses-list">{{EXPENSES_LIST}}</div>
      </div>
    </section>

    <section id="budgets" class="{{BUDGETS_CLASS}}">
      <div class="card">
        <div class="card-header"><h2>Budget status</h2><a class="btn btn-primary" href="/budgets/new"><i class="fas fa-plus"></i> Set budget</a></div>
        <div id="budget-status">{{BUDGET_STATUS}}</div>
      </div>
      <div class="card">
        <div class="card-header"><h2>All budgets</h2></div>
        <div id="budgets-list">{{BUDGETS_LIST}}</div>
      </div>
    </section>

    <section id="categories" class="{{CATEGORIES_CLASS}}">
      <div class="card">
        <div class="card-header">
          <h2>Categories</h2>
          <div>
            <form method="post" action="/categories/initialize" style="display: inline">
              <button class="btn" type="submit">Add default categories</button>
            </form>
            <a class="btn btn-primary" href="/categories/new"><i class="fas fa-plus"></i> Add category</a>
          </div>
        </div>
        <div id="categories-list">{{CATEGORIES_LIST}}</div>
      </div>
    </section>
  </main>

  {{MODAL}}
  {{TOAST}}
  {{LOADING}}

  <script>
    document.querySelectorAll('script[data-chart]').forEach((node) => {
      const canvas = document.getElementById(node.dataset.chart);
      if (canvas && window.Chart) {
        new Chart(canvas.getContext('2d'), JSON.parse(node.textContent));
      }
    });

    const period = document.getElementById('budget-period');
    if (period) {
      const toggleMonthField = () => {
        const monthly = period.value === 'monthly';
        document.getElementById('month-field').style.display = monthly ? 'block' : 'none';
        document.getElementById('budget-month').required = monthly;
      };
      period.addEventListener('change', toggleMonthField);
      toggleMonthField();
    }

    const color = document.getElementById('category-color');
    if (color) {
      color.addEventListener('change', (event) => {
        document.getElementById('color-preview').style.backgroundColor = event.target.value;
      });
    }

    const showLoading = () => document.getElementById('loading').classList.remove('hidden');
    document.querySelectorAll('form').forEach((form) => form.addEventListener('submit', showLoading));
    document.querySelectorAll('.nav-btn').forEach((link) => link.addEventListener('click', showLoading));
    window.addEventListener('pageshow', () => document.getElementById('loading').classList.add('hidden'));

    document.querySelectorAll('.modal').forEach((modal) => {
      modal.addEventListener('click', (event) => {
        if (event.target === modal) {
          modal.classList.remove('show');
        }
      });
    });
  </script>
</body>
</html>
"##;
