//! Authenticated access to the Edge Function backend
//!
//! Every request carries the anon bearer credential and runs under its own
//! timeout budget. Primary/fallback sequencing lives here so the health
//! checker and stats fetcher share one definition of "connection failure".

use crate::core::network::debug_logger::get_debug_logger;
use crate::core::network::http_client::HttpClientTrait;
use crate::core::network::types::{FetchError, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Which endpoint produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptSource {
    Primary,
    Fallback,
}

impl AttemptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptSource::Primary => "primary",
            AttemptSource::Fallback => "fallback",
        }
    }
}

pub struct EdgeFunctionClient {
    http_client: Arc<dyn HttpClientTrait>,
    anon_key: String,
}

impl EdgeFunctionClient {
    pub fn new(http_client: Arc<dyn HttpClientTrait>, anon_key: impl Into<String>) -> Self {
        Self {
            http_client,
            anon_key: anon_key.into(),
        }
    }

    /// Headers attached to every backend call
    pub fn auth_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.anon_key),
        );
        headers.insert("apikey".to_string(), self.anon_key.clone());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }

    /// Single GET bounded by `timeout_ms`
    ///
    /// The deadline is enforced here as well as in the transport, so a
    /// client that never settles still yields `FetchError::Timeout`.
    pub async fn get(&self, url: &str, timeout_ms: u32) -> Result<HttpResponse, FetchError> {
        let request = self
            .http_client
            .get(url.to_string(), self.auth_headers(), timeout_ms);

        match tokio::time::timeout(Duration::from_millis(timeout_ms as u64), request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout_ms)),
        }
    }

    /// GET the primary URL, then the fallback URL if the primary failed at
    /// the connection level
    ///
    /// Any HTTP response from the primary, including 4xx/5xx, is returned
    /// as-is. Each attempt gets the full `timeout_ms` budget.
    pub async fn get_with_fallback(
        &self,
        primary_url: &str,
        fallback_url: &str,
        timeout_ms: u32,
    ) -> Result<(HttpResponse, AttemptSource), FetchError> {
        match self.get(primary_url, timeout_ms).await {
            Ok(response) => Ok((response, AttemptSource::Primary)),
            Err(err) if err.kind().is_connection_level() => {
                get_debug_logger().debug_sync(
                    "EdgeFunctionClient",
                    "primary_failed",
                    &format!("Primary {} failed ({}), trying {}", primary_url, err, fallback_url),
                );
                let response = self.get(fallback_url, timeout_ms).await?;
                Ok((response, AttemptSource::Fallback))
            }
            Err(err) => Err(err),
        }
    }
}
