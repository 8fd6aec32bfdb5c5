use expense_dashboard::models::{Budget, Category, Expense, Mutation};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_path(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("{prefix}_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_expense_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", unique_path("expense_http_data"))
        .env("DASHBOARD_STORE_PATH", unique_path("expense_http_store"))
        .env_remove("API_BASE_URL")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn ensure_default_categories(client: &Client, base_url: &str) {
    let response = client
        .post(format!("{base_url}/api/categories/initialize"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_health_reports_healthy() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let body: Value = Client::new()
        .get(format!("{}/api/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn http_created_expense_is_listed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    ensure_default_categories(&client, &server.base_url).await;

    let created: Mutation<Expense> = client
        .post(format!("{}/api/expenses", server.base_url))
        .json(&json!({
            "amount": 8500,
            "category": "Food",
            "date": "2026-03-14",
            "description": "Lunch"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.message, "Expense added.");
    assert_eq!(created.data.amount, 8500.0);

    let listed: Vec<Expense> = client
        .get(format!("{}/api/expenses", server.base_url))
        .query(&[("category", "Food")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().any(|expense| expense.id == created.data.id));
}

#[tokio::test]
async fn http_invalid_expense_is_unprocessable() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    ensure_default_categories(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/expenses", server.base_url))
        .json(&json!({ "amount": 0, "category": "Food", "date": "2026-03-14" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn http_list_limit_above_max_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = Client::new()
        .get(format!("{}/api/expenses?limit=1001", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn http_category_in_use_cannot_be_deleted() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created: Mutation<Category> = client
        .post(format!("{}/api/categories", server.base_url))
        .json(&json!({ "name": "Pets", "color": "#A855F7" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/expenses", server.base_url))
        .json(&json!({ "amount": 30000, "category": "Pets", "date": "2026-03-02" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/api/categories/{}", server.base_url, created.data.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let categories: Vec<Category> = client
        .get(format!("{}/api/categories", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(categories.iter().any(|category| category.name == "Pets"));
}

#[tokio::test]
async fn http_budget_period_rules() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    ensure_default_categories(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/budgets", server.base_url))
        .json(&json!({ "category": "Food", "amount": 300000, "period": "monthly", "year": 2026 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let created: Mutation<Budget> = client
        .post(format!("{}/api/budgets", server.base_url))
        .json(&json!({
            "category": "Education",
            "amount": 1200000,
            "period": "yearly",
            "year": 2026,
            "month": 5
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.data.month, None);

    let duplicate = client
        .post(format!("{}/api/budgets", server.base_url))
        .json(&json!({ "category": "Education", "amount": 10, "period": "yearly", "year": 2026 }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_unmatched_filter_returns_empty_list() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let listed: Vec<Expense> = Client::new()
        .get(format!("{}/api/expenses", server.base_url))
        .query(&[("start_date", "2020-01-01"), ("end_date", "2020-01-31")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn http_blank_category_filter_is_ignored() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    ensure_default_categories(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/expenses", server.base_url))
        .json(&json!({ "amount": 4200, "category": "Transport", "date": "2026-04-02" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let listed: Vec<Expense> = client
        .get(format!("{}/api/expenses?category=", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!listed.is_empty());

    let budgets = client
        .get(format!("{}/api/budgets?category=", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(budgets.status().is_success());
}

#[tokio::test]
async fn http_missing_expense_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = Client::new()
        .delete(format!("{}/api/expenses/does-not-exist", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_dashboard_page_renders() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = Client::new()
        .get(format!("{}/?tab=categories", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("Expense Tracker"));
    assert!(html.contains(r#"<section id="categories" class="tab-content active">"#));
}
