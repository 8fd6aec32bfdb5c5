pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod utils;
pub mod state;

pub use app::{api_router, router};
pub use client::ApiClient;
pub use config::Config;
pub use controller::Dashboard;
pub use state::AppState;
pub use storage::{load_data, persist_data};
pub use utils::LocalStore;
