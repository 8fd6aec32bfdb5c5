use expense_dashboard::controller::{
    BudgetForm, ChartPeriod, EntityKind, ExpenseFilter, ExpenseForm, Modal, Tab,
};
use expense_dashboard::models::{AlertKind, AlertQuery, AppData, ExpenseQuery, PeriodQuery};
use expense_dashboard::ui::ToastKind;
use expense_dashboard::utils::{self, CurrentDate};
use expense_dashboard::{router, ApiClient, AppState, Dashboard, LocalStore};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

fn unique_path(prefix: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.json", std::process::id(), nanos))
}

struct TestApp {
    base_url: String,
    api_url: String,
    store_path: PathBuf,
}

impl TestApp {
    fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            ApiClient::new(self.api_url.clone()),
            LocalStore::new(self.store_path.clone()),
        )
    }
}

/// Serves the full router on a random local port with fresh data.
async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{port}");
    let api_url = format!("{base_url}/api");
    let store_path = unique_path("expense_dashboard_store");

    let page_dashboard = Dashboard::new(
        ApiClient::new(api_url.clone()),
        LocalStore::new(store_path.clone()),
    );
    let state = AppState::new(
        unique_path("expense_dashboard_data"),
        AppData::default(),
        page_dashboard,
    );
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    TestApp {
        base_url,
        api_url,
        store_path,
    }
}

async fn seeded_dashboard(app: &TestApp) -> Dashboard {
    let mut dashboard = app.dashboard();
    dashboard.initialize_categories().await;
    dashboard.load_initial_data().await;
    dashboard
}

fn expense_form(amount: &str, category: &str, date: &str) -> ExpenseForm {
    ExpenseForm {
        amount: amount.into(),
        category: category.into(),
        date: date.into(),
        description: "Groceries".into(),
        ..ExpenseForm::default()
    }
}

#[tokio::test]
async fn initialize_categories_reports_server_message() {
    let app = spawn_app().await;
    let mut dashboard = app.dashboard();

    dashboard.initialize_categories().await;
    let toast = dashboard.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Added 8 default categories.");
    assert_eq!(dashboard.categories().len(), 8);
    assert!(dashboard.panels().filter_options.contains("Transport"));

    dashboard.initialize_categories().await;
    assert_eq!(
        dashboard.toast().map(|toast| toast.message.as_str()),
        Some("All default categories already exist.")
    );
}

#[tokio::test]
async fn empty_category_list_offers_defaults() {
    let app = spawn_app().await;
    let mut dashboard = app.dashboard();

    dashboard.show_tab(Tab::Categories).await;
    let panel = &dashboard.panels().categories_list;
    assert!(panel.contains("No categories yet"));
    assert!(panel.contains(r#"action="/categories/initialize""#));
}

#[tokio::test]
async fn saved_expense_appears_in_lists() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    dashboard.show_tab(Tab::Expenses).await;

    dashboard.show_expense_modal(None);
    assert!(dashboard.save_expense(expense_form("42000", "Food", "2026-02-11")).await);
    assert!(dashboard.modal().is_none());
    assert_eq!(
        dashboard.toast().map(|toast| toast.message.as_str()),
        Some("Expense added.")
    );
    assert_eq!(dashboard.expenses().len(), 1);
    assert!(dashboard.panels().expenses_list.contains("₩42,000"));
}

#[tokio::test]
async fn editing_expense_prefills_and_updates() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    dashboard.show_tab(Tab::Expenses).await;
    assert!(dashboard.save_expense(expense_form("42000", "Food", "2026-02-11")).await);
    let id = dashboard.expenses()[0].id.clone();

    dashboard.show_expense_modal(Some(&id));
    assert_eq!(dashboard.editing_expense(), Some(id.as_str()));
    let mut form = match dashboard.modal() {
        Some(Modal::Expense(form)) => form.clone(),
        other => panic!("unexpected modal: {other:?}"),
    };
    assert_eq!(form.amount, "42000");
    assert_eq!(form.category, "Food");

    form.amount = "43000".into();
    form.description.clear();
    assert!(dashboard.save_expense(form).await);
    assert_eq!(dashboard.expenses()[0].amount, 43_000.0);
    assert_eq!(dashboard.expenses()[0].description, None);
    assert_eq!(dashboard.editing_expense(), None);
}

#[tokio::test]
async fn invalid_expense_keeps_modal_open() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;

    dashboard.show_expense_modal(None);
    let form = expense_form("not a number", "Food", "2026-02-11");
    assert!(!dashboard.save_expense(form.clone()).await);
    assert_eq!(dashboard.modal(), Some(&Modal::Expense(form)));
    let toast = dashboard.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Failed to save expense.");
}

#[tokio::test]
async fn category_in_use_survives_delete() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    assert!(dashboard.save_expense(expense_form("9000", "Food", "2026-01-20")).await);
    dashboard.show_tab(Tab::Categories).await;

    let food_id = dashboard
        .categories()
        .iter()
        .find(|category| category.name == "Food")
        .map(|category| category.id.clone())
        .expect("Food category");

    assert!(!dashboard.delete_category(&food_id, true).await);
    let toast = dashboard.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Failed to delete category.");
    assert!(dashboard.categories().iter().any(|category| category.id == food_id));
    assert!(dashboard.panels().categories_list.contains(&food_id));
}

#[tokio::test]
async fn unused_category_is_deleted() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    dashboard.show_tab(Tab::Categories).await;

    let other_id = dashboard
        .categories()
        .iter()
        .find(|category| category.name == "Other")
        .map(|category| category.id.clone())
        .expect("Other category");

    assert!(dashboard.delete_category(&other_id, true).await);
    assert_eq!(
        dashboard.toast().map(|toast| toast.message.as_str()),
        Some("Category deleted.")
    );
    assert!(!dashboard.categories().iter().any(|category| category.id == other_id));
}

#[tokio::test]
async fn unconfirmed_expense_delete_keeps_record() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    assert!(dashboard.save_expense(expense_form("5000", "Transport", "2026-02-01")).await);
    let id = dashboard.expenses()[0].id.clone();

    assert!(!dashboard.delete_expense(&id, false).await);
    assert_eq!(
        dashboard.modal(),
        Some(&Modal::ConfirmDelete {
            kind: EntityKind::Expense,
            id: id.clone()
        })
    );

    dashboard.load_initial_data().await;
    assert!(dashboard.expenses().iter().any(|expense| expense.id == id));

    assert!(dashboard.delete_expense(&id, true).await);
    assert!(dashboard.modal().is_none());
    assert!(dashboard.expenses().is_empty());
}

#[tokio::test]
async fn unmatched_filter_shows_notice() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    assert!(dashboard.save_expense(expense_form("5000", "Transport", "2026-02-01")).await);

    let filter = ExpenseFilter {
        category: "Food".into(),
        start_date: "2026-01-01".into(),
        end_date: "2026-12-31".into(),
    };
    dashboard.filter_expenses(&filter).await;
    assert_eq!(dashboard.current_tab(), Tab::Expenses);
    assert!(dashboard.panels().expenses_list.contains("No expenses match the filter."));

    let filter = ExpenseFilter {
        category: "Transport".into(),
        ..ExpenseFilter::default()
    };
    dashboard.filter_expenses(&filter).await;
    assert!(dashboard.panels().expenses_list.contains("₩5,000"));
}

#[tokio::test]
async fn dashboard_summary_tracks_current_month() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    let current = CurrentDate::now();

    assert!(dashboard.save_expense(expense_form("25000", "Food", &current.date_string)).await);
    let budget = BudgetForm {
        category: "Food".into(),
        amount: "100000".into(),
        ..BudgetForm::new(&current)
    };
    assert!(dashboard.save_budget(budget).await);

    dashboard.show_tab(Tab::Dashboard).await;
    let summary = &dashboard.panels().summary;
    assert_eq!(summary.total_expense, 25_000.0);
    assert_eq!(summary.total_budget, 100_000.0);
    assert_eq!(summary.remaining, 75_000.0);
    assert_eq!(summary.progress, 25.0);
    assert_eq!(summary.days_left, utils::days_left_in_month(utils::today()));
    assert!(dashboard.charts().category.is_some());
    assert!(dashboard.charts().monthly.is_some());
    assert!(dashboard.panels().recent_expenses.contains("₩25,000"));
}

#[tokio::test]
async fn empty_dashboard_has_no_charts() {
    let app = spawn_app().await;
    let mut dashboard = app.dashboard();
    dashboard.load_initial_data().await;

    dashboard.show_tab(Tab::Dashboard).await;
    assert!(dashboard.charts().category.is_none());
    assert!(dashboard.charts().monthly.is_none());
    assert!(dashboard.panels().recent_expenses.contains("No expenses yet"));
    assert!(dashboard.render().contains("No data"));
}

#[tokio::test]
async fn monthly_budget_without_month_is_rejected() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;

    dashboard.show_budget_modal(None);
    let form = BudgetForm {
        category: "Food".into(),
        amount: "100000".into(),
        period: "monthly".into(),
        year: "2026".into(),
        month: String::new(),
        ..BudgetForm::default()
    };
    assert!(!dashboard.save_budget(form).await);
    assert!(matches!(dashboard.modal(), Some(Modal::Budget(_))));
    assert_eq!(
        dashboard.toast().map(|toast| toast.kind),
        Some(ToastKind::Error)
    );
}

#[tokio::test]
async fn yearly_budget_is_listed_without_month() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    dashboard.show_tab(Tab::Budgets).await;
    assert!(dashboard.panels().budgets_list.contains("No budgets set."));

    let form = BudgetForm {
        category: "Housing".into(),
        amount: "6000000".into(),
        period: "yearly".into(),
        year: "2026".into(),
        month: "7".into(),
        ..BudgetForm::default()
    };
    assert!(dashboard.save_budget(form).await);
    assert_eq!(dashboard.budgets().len(), 1);
    assert_eq!(dashboard.budgets()[0].month, None);
    assert!(dashboard.panels().budgets_list.contains("<td>Yearly</td>"));
}

#[tokio::test]
async fn chart_period_is_saved_after_debounce() {
    let app = spawn_app().await;
    let mut dashboard = app.dashboard();

    dashboard.set_chart_period(ChartPeriod::Year).await;
    assert_eq!(dashboard.chart_period(), ChartPeriod::Year);
    sleep(Duration::from_millis(600)).await;

    let mut restored = app.dashboard();
    restored.restore_preferences().await;
    assert_eq!(restored.chart_period(), ChartPeriod::Year);

    let stored: ChartPeriod = LocalStore::new(app.store_path.clone())
        .get("chartPeriod", ChartPeriod::Month)
        .await;
    assert_eq!(stored, ChartPeriod::Year);
}

#[tokio::test]
async fn toast_is_rendered_once() {
    let app = spawn_app().await;
    let mut dashboard = app.dashboard();
    dashboard.initialize_categories().await;

    let first = dashboard.render();
    assert!(first.contains("Added 8 default categories."));
    let second = dashboard.render();
    assert!(!second.contains("Added 8 default categories."));
}

#[tokio::test]
async fn unreachable_api_reports_load_failure() {
    let mut dashboard = Dashboard::new(
        ApiClient::new("http://127.0.0.1:9/api"),
        LocalStore::new(unique_path("expense_dashboard_unreachable")),
    );
    dashboard.load_initial_data().await;
    let toast = dashboard.toast().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Failed to load data.");
}

fn page_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn add_expense_from_dashboard_returns_to_dashboard() {
    let app = spawn_app().await;
    let client = page_client();
    let response = client
        .post(format!("{}/categories/initialize", app.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    client
        .get(format!("{}/?tab=dashboard", app.base_url))
        .send()
        .await
        .unwrap();

    let html = client
        .get(format!("{}/expenses/new", app.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<section id="dashboard" class="tab-content active">"#));
    assert!(html.contains("Add Expense"));

    let today = CurrentDate::now().date_string;
    let response = client
        .post(format!("{}/expenses/save", app.base_url))
        .form(&[
            ("id", ""),
            ("amount", "15000"),
            ("category", "Food"),
            ("date", today.as_str()),
            ("description", "Coffee"),
        ])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/?tab=dashboard"));
}

#[tokio::test]
async fn edit_form_updates_the_record_it_names() {
    let app = spawn_app().await;
    let client = page_client();
    client
        .post(format!("{}/categories/initialize", app.base_url))
        .send()
        .await
        .unwrap();
    let api = ApiClient::new(app.api_url.clone());
    let mut dashboard = app.dashboard();
    dashboard.load_initial_data().await;
    assert!(dashboard.save_expense(expense_form("1000", "Food", "2026-02-01")).await);
    assert!(dashboard.save_expense(expense_form("2000", "Transport", "2026-02-02")).await);
    let first = dashboard
        .expenses()
        .iter()
        .find(|expense| expense.category == "Food")
        .map(|expense| expense.id.clone())
        .expect("Food expense");

    let html = client
        .get(format!("{}/expenses/{first}/edit", app.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!(r#"<input type="hidden" name="id" value="{first}">"#)));

    // Navigating away closes the modal before the stale form is posted.
    client.get(format!("{}/?tab=expenses", app.base_url)).send().await.unwrap();
    let response = client
        .post(format!("{}/expenses/save", app.base_url))
        .form(&[
            ("id", first.as_str()),
            ("amount", "1500"),
            ("category", "Food"),
            ("date", "2026-02-01"),
            ("description", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/?tab=expenses"));

    let expenses = api
        .expenses()
        .list(&ExpenseQuery::default())
        .await
        .unwrap();
    assert_eq!(expenses.len(), 2);
    let updated = expenses.iter().find(|expense| expense.id == first).expect("updated");
    assert_eq!(updated.amount, 1_500.0);
}

#[tokio::test]
async fn client_reads_alerts_and_usage() {
    let app = spawn_app().await;
    let mut dashboard = seeded_dashboard(&app).await;
    let current = CurrentDate::now();

    assert!(dashboard.save_expense(expense_form("90000", "Food", &current.date_string)).await);
    let budget = BudgetForm {
        category: "Food".into(),
        amount: "100000".into(),
        ..BudgetForm::new(&current)
    };
    assert!(dashboard.save_budget(budget).await);

    let client = ApiClient::new(format!("{}/", app.api_url));
    let alerts = client
        .budgets()
        .alerts(&AlertQuery::default())
        .await
        .unwrap();
    assert_eq!(alerts.alert_count, 1);
    assert_eq!(alerts.alerts[0].kind, AlertKind::Warning);
    assert_eq!(alerts.alerts[0].usage_percentage, 90.0);

    let usage = client
        .categories()
        .usage(&PeriodQuery {
            year: Some(current.year),
            month: Some(current.month),
        })
        .await
        .unwrap();
    assert_eq!(usage.total_amount, 90_000.0);
    assert_eq!(usage.categories[0].category_name, "Food");
    assert_eq!(usage.categories[0].percentage, 100.0);

    let missing = client.expenses().delete("nope").await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
    assert_eq!(missing.to_string(), "Expense not found.");
}
