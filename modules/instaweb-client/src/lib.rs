pub mod error;

pub use error::{InstawebError, Result};

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

/// Base origin for Instagram's public web pages.
pub const BASE_URI: &str = "https://www.instagram.com";

/// Query parameter that switches the public pages into JSON mode.
const JSON_MODE_QUERY: (&str, &str) = ("__a", "1");

pub struct InstawebClient {
    client: reqwest::Client,
    base_uri: String,
}

impl InstawebClient {
    pub fn new() -> Self {
        Self::with_base_uri(BASE_URI)
    }

    /// Client against a non-default origin. Used by hosts that front the
    /// endpoints with a proxy.
    pub fn with_base_uri(base_uri: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_uri: base_uri.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// GET a page in JSON mode (`__a=1` plus any extra query pairs) and
    /// decode the body.
    pub async fn get_json(&self, path: &str, extra_query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_uri, path);
        debug!(url = url.as_str(), "instaweb: GET");

        let resp = self
            .client
            .get(&url)
            .query(&[JSON_MODE_QUERY])
            .query(extra_query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InstawebError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}

impl Default for InstawebClient {
    fn default() -> Self {
        Self::new()
    }
}
