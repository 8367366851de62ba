//! Client for the Eagle catalog

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{BestEffort, EagleError, Result};
use crate::folder_cache::{CacheState, FolderCache, MemoryFolderCache};
use crate::path::PathAdapter;
use crate::transport::{endpoints, CatalogTransport};
use crate::types::{CatalogItem, Folder};

/// Folder lookup and item registration against one Eagle instance
pub struct CatalogClient {
    transport: Arc<dyn CatalogTransport>,
    paths: PathAdapter,
    folders: Box<dyn FolderCache>,
    /// Serializes the load / find / create sequence on the folder cache
    folder_lock: Mutex<()>,
}

impl CatalogClient {
    /// Create a client without contacting Eagle
    pub fn new(transport: Arc<dyn CatalogTransport>, paths: PathAdapter) -> Self {
        Self {
            transport,
            paths,
            folders: Box::new(MemoryFolderCache::new()),
            folder_lock: Mutex::new(()),
        }
    }

    /// Swap the folder cache implementation
    pub fn with_folder_cache(mut self, cache: Box<dyn FolderCache>) -> Self {
        self.folders = cache;
        self
    }

    /// Create a client and check that Eagle answers.
    ///
    /// An unreachable Eagle is only logged; the client stays usable and later
    /// calls fail on their own terms.
    pub async fn connect(transport: Arc<dyn CatalogTransport>, paths: PathAdapter) -> Self {
        let client = Self::new(transport, paths);
        let check = client.check_connection().await;
        if let Some(e) = check.error {
            warn!("Could not connect to Eagle API at {}", client.base_url());
            warn!("Error details: {}", e);
            warn!("Make sure Eagle is running and the port is correct");
        }
        client
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn path_adapter(&self) -> &PathAdapter {
        &self.paths
    }

    /// Ping `/api/application/info`; the value tells whether Eagle answered
    pub async fn check_connection(&self) -> BestEffort<bool> {
        match self.transport.get(endpoints::APPLICATION_INFO).await {
            Ok(_) => BestEffort::ok(true),
            Err(e) => BestEffort::degraded(false, e),
        }
    }

    /// Id of the folder named or identified by `name_or_id`, creating it when missing.
    ///
    /// Returns an empty id for empty input and when creation fails.
    pub async fn find_or_create_folder(&self, name_or_id: &str) -> BestEffort<String> {
        if name_or_id.is_empty() {
            return BestEffort::ok(String::new());
        }

        let _guard = self.folder_lock.lock().await;
        let load_error = self.ensure_folders().await;

        if let Some(folder) = self.folders.find(name_or_id) {
            debug!("Using existing folder {} ({})", folder.name, folder.id);
            return BestEffort::ok(folder.id);
        }

        let created = self.create_folder(name_or_id).await;
        match (created.error, load_error) {
            (Some(e), _) => BestEffort::degraded(created.value, e),
            (None, Some(e)) => BestEffort::degraded(created.value, e),
            (None, None) => BestEffort::ok(created.value),
        }
    }

    /// Every folder known to the client, flattened in pre-order
    pub async fn list_folders(&self) -> BestEffort<Vec<Folder>> {
        let _guard = self.folder_lock.lock().await;
        let load_error = self.ensure_folders().await;

        let folders = match self.folders.state() {
            CacheState::Loaded(folders) => folders,
            CacheState::Unloaded => Vec::new(),
        };
        match load_error {
            Some(e) => BestEffort::degraded(folders, e),
            None => BestEffort::ok(folders),
        }
    }

    /// Register a file with Eagle by its path.
    ///
    /// This is the primary action of every send, so failures are returned to
    /// the caller instead of being absorbed.
    pub async fn add_item_from_path(
        &self,
        mut item: CatalogItem,
        folder_id: Option<&str>,
    ) -> Result<Value> {
        item.path = self.paths.adapt(&item.path);

        if let Some(id) = folder_id.filter(|id| !id.is_empty()) {
            item.folder_id = Some(id.to_string());
        }

        info!("Sending {} to Eagle", item.path);
        let body = serde_json::to_value(&item)?;
        self.transport
            .post(endpoints::ITEM_ADD_FROM_PATH, body)
            .await
            .inspect_err(|e| warn!("Eagle request failed: {}", e))
    }

    /// Load the folder list once. Returns the error absorbed by this load, if any.
    async fn ensure_folders(&self) -> Option<EagleError> {
        if self.folders.is_loaded() {
            return None;
        }

        match self.fetch_folders().await {
            Ok(folders) => {
                debug!("Loaded {} Eagle folders", folders.len());
                self.folders.load(folders);
                None
            }
            Err(e) => {
                warn!("Could not load Eagle folders: {}", e);
                self.folders.load(Vec::new());
                Some(e)
            }
        }
    }

    async fn fetch_folders(&self) -> Result<Vec<Folder>> {
        let response = self.transport.get(endpoints::FOLDER_LIST).await?;
        let data = response
            .get("data")
            .ok_or_else(|| EagleError::InvalidResponse {
                endpoint: endpoints::FOLDER_LIST.to_string(),
                message: "missing data field".to_string(),
            })?;
        Ok(flatten_folders(data))
    }

    async fn create_folder(&self, name: &str) -> BestEffort<String> {
        let body = serde_json::json!({ "folderName": name });
        let response = match self.transport.post(endpoints::FOLDER_CREATE, body).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not create Eagle folder {}: {}", name, e);
                return BestEffort::degraded(String::new(), e);
            }
        };

        let id = response["data"]["id"].as_str().unwrap_or_default().to_string();
        if id.is_empty() {
            return BestEffort::degraded(
                id,
                EagleError::InvalidResponse {
                    endpoint: endpoints::FOLDER_CREATE.to_string(),
                    message: "missing folder id".to_string(),
                },
            );
        }

        info!("Created Eagle folder {} ({})", name, id);
        self.folders.append(Folder::new(id.clone(), name));
        BestEffort::ok(id)
    }
}

/// Flatten Eagle's folder tree into `{id, name}` pairs, parents before children
pub fn flatten_folders(data: &Value) -> Vec<Folder> {
    let mut result = Vec::new();
    collect_folders(data, &mut result);
    result
}

fn collect_folders(value: &Value, out: &mut Vec<Folder>) {
    match value {
        Value::Object(map) => {
            if let (Some(Value::String(id)), Some(Value::String(name))) =
                (map.get("id"), map.get("name"))
            {
                out.push(Folder::new(id.clone(), name.clone()));
            }
            if let Some(children @ Value::Array(_)) = map.get("children") {
                collect_folders(children, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_folders(item, out);
            }
        }
        _ => {}
    }
}
