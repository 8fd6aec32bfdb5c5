use crate::controller::Dashboard;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, dashboard: Dashboard) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }
}
