//! In-memory Eagle used by the unit tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{EagleError, Result};
use crate::transport::{endpoints, CatalogTransport};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub body: Option<Value>,
}

/// Answers like Eagle would and records every request
pub struct FakeTransport {
    folders: Option<Value>,
    failing: Mutex<HashSet<String>>,
    failing_suffixes: Mutex<Vec<String>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_id: AtomicUsize,
}

impl FakeTransport {
    pub const BASE_URL: &'static str = "http://fake-eagle:41595";

    pub fn with_folders(folders: Value) -> Self {
        Self::build(Some(folders))
    }

    /// Folder list answers `success` but carries no `data`
    pub fn without_folder_data() -> Self {
        Self::build(None)
    }

    fn build(folders: Option<Value>) -> Self {
        Self {
            folders,
            failing: Mutex::new(HashSet::new()),
            failing_suffixes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Make every request to `endpoint` fail with a transport error
    pub fn fail(&self, endpoint: &str) {
        self.failing.lock().unwrap().insert(endpoint.to_string());
    }

    /// Make adding an item fail when its path ends with `suffix`
    pub fn fail_items_ending_with(&self, suffix: &str) {
        self.failing_suffixes.lock().unwrap().push(suffix.to_string());
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    pub fn bodies_to(&self, endpoint: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .filter_map(|c| c.body.clone())
            .collect()
    }

    fn record(&self, endpoint: &str, body: Option<Value>) -> Result<()> {
        let path_fails = endpoint == endpoints::ITEM_ADD_FROM_PATH
            && body
                .as_ref()
                .and_then(|b| b["path"].as_str())
                .is_some_and(|path| {
                    self.failing_suffixes
                        .lock()
                        .unwrap()
                        .iter()
                        .any(|suffix| path.ends_with(suffix.as_str()))
                });
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            body,
        });
        if path_fails || self.failing.lock().unwrap().contains(endpoint) {
            return Err(EagleError::Transport {
                endpoint: endpoint.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogTransport for FakeTransport {
    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        self.record(endpoint, None)?;
        match endpoint {
            endpoints::APPLICATION_INFO => {
                Ok(json!({"status": "success", "data": {"version": "4.0.0"}}))
            }
            endpoints::FOLDER_LIST => Ok(match &self.folders {
                Some(folders) => json!({"status": "success", "data": folders}),
                None => json!({"status": "success"}),
            }),
            other => Err(EagleError::Status {
                endpoint: other.to_string(),
                status: 404,
            }),
        }
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.record(endpoint, Some(body.clone()))?;
        match endpoint {
            endpoints::FOLDER_CREATE => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                Ok(json!({
                    "status": "success",
                    "data": {"id": format!("NEWFOLDER{}", n), "name": body["folderName"]}
                }))
            }
            endpoints::ITEM_ADD_FROM_PATH => Ok(json!({"status": "success"})),
            other => Err(EagleError::Status {
                endpoint: other.to_string(),
                status: 404,
            }),
        }
    }
}
