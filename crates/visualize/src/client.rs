//! HTTP client for `GET /density`.

use crate::error::{VisualizeError, VisualizeResult};
use density::{DensityFilter, DensityRecord};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Clone, Debug)]
pub struct DensityClient {
    client: reqwest::Client,
    base_url: String,
}

impl DensityClient {
    pub fn new(base_url: &str, timeout: Duration) -> VisualizeResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| VisualizeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(VisualizeError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the records matching `filter`. Any non-2xx status is an error.
    pub async fn fetch_density(&self, filter: &DensityFilter) -> VisualizeResult<Vec<DensityRecord>> {
        let url = format!("{}/density", self.base_url);
        let query = filter.to_query_pairs();
        debug!(%url, ?query, "Fetching density records");

        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisualizeError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Vec<DensityRecord>>().await?)
    }
}
