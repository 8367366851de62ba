//! HTTP transport for the Eagle local API

use std::sync::Arc;

use async_trait::async_trait;
use eagle_core::{
    default_base_url, CatalogClient, CatalogTransport, EagleError, EnvironmentProbe, PathAdapter,
    Result, Settings, SystemProbe,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde_json::Value;

pub struct HttpTransport {
    http: ReqwestClient,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Value> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| EagleError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EagleError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EagleError::InvalidResponse {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        tracing::debug!("GET {}", self.url(endpoint));
        self.send(self.http.get(self.url(endpoint)), endpoint).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        tracing::debug!("POST {}", self.url(endpoint));
        self.send(self.http.post(self.url(endpoint)).json(&body), endpoint)
            .await
    }
}

/// Base URL to use: explicit override, then settings, then host discovery
pub fn resolve_base_url(
    settings: &Settings,
    override_url: Option<&str>,
    probe: &dyn EnvironmentProbe,
) -> String {
    override_url
        .or(settings.base_url.as_deref())
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| default_base_url(probe, settings.port))
}

/// Build a catalog client for the current machine and ping Eagle
pub async fn connect(settings: &Settings, override_url: Option<&str>) -> CatalogClient {
    let probe: Arc<dyn EnvironmentProbe> = Arc::new(SystemProbe::new());
    let base_url = resolve_base_url(settings, override_url, probe.as_ref());
    let paths = PathAdapter::new(probe).with_translator(settings.path_translator.clone());

    CatalogClient::connect(Arc::new(HttpTransport::new(base_url)), paths).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagle_core::{FixedProbe, Runtime};

    #[test]
    fn test_resolve_base_url_precedence() {
        let wsl = FixedProbe(Runtime::Wsl);
        let mut settings = Settings::default();

        assert_eq!(
            resolve_base_url(&settings, None, &wsl),
            "http://host.docker.internal:41595"
        );

        settings.port = 41600;
        assert_eq!(
            resolve_base_url(&settings, None, &FixedProbe(Runtime::Native)),
            "http://localhost:41600"
        );

        settings.base_url = Some("http://192.168.1.20:41595/".to_string());
        assert_eq!(
            resolve_base_url(&settings, None, &wsl),
            "http://192.168.1.20:41595"
        );
        assert_eq!(
            resolve_base_url(&settings, Some("http://eagle.lan:1234"), &wsl),
            "http://eagle.lan:1234"
        );
    }

    #[tokio::test]
    async fn test_unreachable_eagle_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let err = transport.get("/api/application/info").await.unwrap_err();
        assert!(err.is_transport());
    }
}
