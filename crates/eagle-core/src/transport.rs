//! Transport port for the Eagle local API

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Endpoints of the Eagle local API used by the client
pub mod endpoints {
    pub const APPLICATION_INFO: &str = "/api/application/info";
    pub const FOLDER_LIST: &str = "/api/folder/list";
    pub const FOLDER_CREATE: &str = "/api/folder/create";
    pub const ITEM_ADD_FROM_PATH: &str = "/api/item/addFromPath";
}

/// JSON request/response channel to Eagle.
///
/// Implementations report connection failures, non-success statuses and
/// undecodable bodies as errors; they never retry.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Base URL requests are sent to
    fn base_url(&self) -> &str;

    async fn get(&self, endpoint: &str) -> Result<Value>;

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value>;
}
