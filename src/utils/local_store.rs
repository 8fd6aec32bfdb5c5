use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, sync::Mutex};
use tracing::error;

/// Small key/value store of JSON values kept in one file.
///
/// Failures never reach the caller: they are logged, and reads fall back to
/// the supplied default.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let _guard = self.lock.lock().await;
        let entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(err) => {
                error!("store get error for {key}: {err}");
                return default;
            }
        };

        match entries.get(key) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    error!("store get error for {key}: {err}");
                    default
                }
            },
            None => default,
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let _guard = self.lock.lock().await;
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                error!("store set error for {key}: {err}");
                return;
            }
        };

        let result = async {
            let mut entries = self.read_entries().await?;
            entries.insert(key.to_string(), value);
            self.write_entries(&entries).await
        }
        .await;

        if let Err(err) = result {
            error!("store set error for {key}: {err}");
        }
    }

    pub async fn remove(&self, key: &str) {
        let _guard = self.lock.lock().await;
        let result = async {
            let mut entries = self.read_entries().await?;
            if entries.remove(key).is_some() {
                self.write_entries(&entries).await?;
            }
            Ok::<(), StoreError>(())
        }
        .await;

        if let Err(err) = result {
            error!("store remove error for {key}: {err}");
        }
    }

    async fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read(self.path.as_path()).await {
            Ok(bytes) if bytes.is_empty() => Ok(Map::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(entries)?;
        fs::write(self.path.as_path(), payload).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> LocalStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "expense_local_store_{name}_{}_{nanos}.json",
            std::process::id()
        ));
        LocalStore::new(path)
    }

    #[tokio::test]
    async fn set_then_get_round_trips_values() {
        let store = temp_store("set_get");
        store.set("chart_period", &"year").await;
        store.set("visits", &3u32).await;

        assert_eq!(store.get("chart_period", String::from("month")).await, "year");
        assert_eq!(store.get("visits", 0u32).await, 3);
        let _ = fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn missing_key_returns_default() {
        let store = temp_store("missing");
        assert_eq!(store.get("nothing", 42u32).await, 42);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_default() {
        let store = temp_store("corrupt");
        fs::write(store.path(), b"not json").await.unwrap();
        assert_eq!(store.get("key", String::from("fallback")).await, "fallback");
        let _ = fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn mismatched_type_falls_back_to_default() {
        let store = temp_store("mismatch");
        store.set("count", &"seven").await;
        assert_eq!(store.get("count", 7u32).await, 7);
        let _ = fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn remove_deletes_key() {
        let store = temp_store("remove");
        store.set("tab", &"budgets").await;
        store.remove("tab").await;
        assert_eq!(store.get("tab", String::from("dashboard")).await, "dashboard");
        let _ = fs::remove_file(store.path()).await;
    }
}
