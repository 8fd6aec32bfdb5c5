use expense_dashboard::{load_data, router, ApiClient, AppState, Config, Dashboard, LocalStore};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    for path in [&config.data_path, &config.store_path] {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
    }

    let data = load_data(&config.data_path).await;
    let mut dashboard = Dashboard::new(
        ApiClient::new(config.api_base_url.clone()),
        LocalStore::new(config.store_path.clone()),
    );
    dashboard.restore_preferences().await;
    let state = AppState::new(config.data_path.clone(), data, dashboard);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(api = %config.api_base_url, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
