//! AviationStack HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use flightwatch_core::config::ProviderConfig;

use crate::client::{FetchRequest, FlightDataProvider};
use crate::error::ProviderError;
use crate::wire::PageEnvelope;

/// Reads one page per request from the AviationStack REST API.
pub struct AviationStackClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl AviationStackClient {
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }

    /// Build a client from config. The configured timeout bounds every request.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let access_key = config
            .access_key
            .clone()
            .ok_or_else(|| ProviderError::NotConfigured("AVIATIONSTACK_KEY not set".into()))?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(config.base_url.clone(), access_key, client))
    }

    fn url(&self, request: &FetchRequest) -> String {
        format!("{}/{}", self.base_url, request.endpoint.path())
    }
}

#[async_trait]
impl FlightDataProvider for AviationStackClient {
    async fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<serde_json::Value>, ProviderError> {
        let mut params = request.query_params();
        params.push(("access_key".to_string(), self.access_key.clone()));

        debug!(endpoint = %request.endpoint, limit = request.limit, "fetching provider page");

        let response = self.client.get(self.url(request)).query(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let page: PageEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let Some(err) = page.error {
            let code = match err.code {
                Some(serde_json::Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => "unknown".to_string(),
            };
            return Err(ProviderError::Api {
                code,
                message: err.message.unwrap_or_default(),
            });
        }

        if let Some(p) = &page.pagination {
            debug!(
                endpoint = %request.endpoint,
                count = ?p.count,
                total = ?p.total,
                offset = ?p.offset,
                limit = ?p.limit,
                "provider page received"
            );
        }

        Ok(page.data)
    }

    fn name(&self) -> &str {
        "aviationstack"
    }
}
