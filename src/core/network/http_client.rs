/*!
HTTP transport and clock seams for server health monitoring.

Everything that touches the network or the wall clock goes through the two
traits in this module so the checker, fetcher and diagnostics can be driven
by scripted clients and manual clocks in tests.

## Dependencies

- `isahc`: HTTP client with per-request timeouts (feature `http-client`)
- `chrono`: epoch and local timezone timestamps
*/

use crate::core::network::types::{epoch_millis, get_local_timestamp, FetchError, HttpResponse};
#[cfg(feature = "http-client")]
use crate::core::network::types::NetworkError;
use std::collections::HashMap;

#[cfg(feature = "http-client")]
use isahc::config::Configurable;
#[cfg(feature = "http-client")]
use isahc::{AsyncReadResponseExt, HttpClient, Request};
#[cfg(feature = "http-client")]
use std::time::{Duration, Instant};

/// HTTP client abstraction for dependency injection and testing
#[async_trait::async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Execute a GET request and return the full response
    ///
    /// # Returns
    /// * `Ok(HttpResponse)` - Any HTTP response, including 4xx/5xx
    /// * `Err(FetchError::Network | FetchError::Timeout)` - Connection-level failure
    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
        timeout_ms: u32,
    ) -> Result<HttpResponse, FetchError>;
}

/// Clock abstraction for dependency injection and testing
pub trait ClockTrait: Send + Sync {
    /// Current wall-clock time in epoch milliseconds
    fn epoch_ms(&self) -> i64;
    /// Get local timezone timestamp
    fn local_timestamp(&self) -> String;
}

/// Production clock implementation using system time
#[derive(Default)]
pub struct SystemClock;

impl ClockTrait for SystemClock {
    fn epoch_ms(&self) -> i64 {
        epoch_millis()
    }

    fn local_timestamp(&self) -> String {
        get_local_timestamp()
    }
}

/// Production HTTP client implementation using isahc
#[cfg(feature = "http-client")]
pub struct IsahcHttpClient {
    client: HttpClient,
}

#[cfg(feature = "http-client")]
#[async_trait::async_trait]
impl HttpClientTrait for IsahcHttpClient {
    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
        timeout_ms: u32,
    ) -> Result<HttpResponse, FetchError> {
        let start = Instant::now();

        let mut request = Request::get(&url)
            .timeout(Duration::from_millis(timeout_ms as u64))
            .body(Vec::new())
            .map_err(|e| FetchError::Network(format!("Request creation failed: {}", e)))?;

        for (key, value) in headers {
            let header_name = key
                .parse::<isahc::http::header::HeaderName>()
                .map_err(|e| FetchError::Network(format!("Invalid header name: {}", e)))?;
            let header_value = value
                .parse::<isahc::http::header::HeaderValue>()
                .map_err(|e| FetchError::Network(format!("Invalid header value: {}", e)))?;
            request.headers_mut().insert(header_name, header_value);
        }

        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|e| classify_transport_error(&e, timeout_ms))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
            duration: start.elapsed(),
        })
    }
}

#[cfg(feature = "http-client")]
fn classify_transport_error(error: &isahc::Error, timeout_ms: u32) -> FetchError {
    match error.kind() {
        isahc::error::ErrorKind::Timeout => FetchError::Timeout(timeout_ms),
        _ => FetchError::Network(error.to_string()),
    }
}

#[cfg(feature = "http-client")]
impl IsahcHttpClient {
    pub fn new() -> Result<Self, NetworkError> {
        let client = HttpClient::new()
            .map_err(|e| NetworkError::HttpError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

/// Placeholder transport when the `http-client` feature is disabled
#[cfg(not(feature = "http-client"))]
#[derive(Default)]
pub struct OfflineHttpClient;

#[cfg(not(feature = "http-client"))]
#[async_trait::async_trait]
impl HttpClientTrait for OfflineHttpClient {
    async fn get(
        &self,
        _url: String,
        _headers: HashMap<String, String>,
        _timeout_ms: u32,
    ) -> Result<HttpResponse, FetchError> {
        Err(FetchError::Network(
            "HTTP transport disabled (build without http-client feature)".to_string(),
        ))
    }
}
