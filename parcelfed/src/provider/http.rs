//! HTTP client abstraction for testability

use super::types::ProviderError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Response body plus the content type the server declared for it.
///
/// The WFS servers occasionally answer a feature request with an HTML error
/// page under a 200 status, so callers need the content type to tell
/// geographic payloads from noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBody {
    /// Value of the `Content-Type` header, if present
    pub content_type: Option<String>,
    /// Raw response bytes
    pub bytes: Vec<u8>,
}

/// Trait for asynchronous HTTP GET operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Returns
    ///
    /// The response body and content type, or an error for transport
    /// failures, timeouts, and non-success status codes.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpBody, ProviderError>> + Send;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the given per-request timeout.
    ///
    /// `accept_invalid_certs` relaxes TLS certificate validation; the legacy
    /// government endpoints require this in practice.
    pub fn new(timeout_secs: u64, accept_invalid_certs: bool) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpBody, ProviderError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::Http(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            return Err(ProviderError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Http(format!("Failed to read response: {}", e)))?;

        Ok(HttpBody {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
