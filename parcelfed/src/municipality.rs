//! Municipality name resolution
//!
//! Providers frequently ship the municipality as its 7-digit IBGE code
//! rather than a name. This module resolves codes against the IBGE
//! localities service and memoizes successes in a process-wide cache.
//!
//! The cache never evicts and never expires; a cold cache only means more
//! external lookups. Failed lookups are deliberately not cached so a later
//! call can retry them.

use crate::provider::{AsyncHttpClient, ProviderError};
use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, warn};

/// Memoized IBGE code → municipality name resolver.
pub struct MunicipalityResolver<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    cache: DashMap<String, String>,
}

impl<C: AsyncHttpClient> MunicipalityResolver<C> {
    pub fn new(http_client: C, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
            cache: DashMap::new(),
        }
    }

    /// Resolves a municipality code to its name.
    ///
    /// Degrades instead of failing: on any lookup problem (transport error,
    /// non-success status, missing name field) the original code is returned
    /// unchanged and nothing is cached.
    pub async fn resolve(&self, code: &str) -> String {
        if let Some(name) = self.cache.get(code) {
            return name.clone();
        }

        match self.lookup(code).await {
            Ok(name) => {
                debug!(code = code, name = %name, "municipality resolved");
                self.cache.insert(code.to_string(), name.clone());
                name
            }
            Err(e) => {
                warn!(code = code, error = %e, "municipality lookup failed");
                code.to_string()
            }
        }
    }

    async fn lookup(&self, code: &str) -> Result<String, ProviderError> {
        let url = format!("{}/{}", self.base_url, code);
        let body = self.http_client.get(&url).await?;

        let document: Value = serde_json::from_slice(&body.bytes)
            .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse failed: {}", e)))?;

        document
            .get("nome")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::InvalidResponse("missing \"nome\" field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    const BASE: &str = "https://host/api/v1/localidades/municipios";

    #[tokio::test]
    async fn test_resolves_name() {
        let client = MockHttpClient::new().on_json("4103107", r#"{"nome":"Bocaiúva do Sul"}"#);
        let resolver = MunicipalityResolver::new(client, BASE.to_string());

        assert_eq!(resolver.resolve("4103107").await, "Bocaiúva do Sul");
    }

    #[tokio::test]
    async fn test_second_resolution_is_a_cache_hit() {
        let client = MockHttpClient::new().on_json("3550308", r#"{"nome":"São Paulo"}"#);
        let resolver = MunicipalityResolver::new(client.clone(), BASE.to_string());

        assert_eq!(resolver.resolve("3550308").await, "São Paulo");
        assert_eq!(resolver.resolve("3550308").await, "São Paulo");
        assert_eq!(client.request_count("3550308"), 1);
    }

    #[tokio::test]
    async fn test_failure_returns_code_and_is_not_cached() {
        let client = MockHttpClient::new()
            .on("9999999", Err(ProviderError::Http("HTTP 404".to_string())));
        let resolver = MunicipalityResolver::new(client.clone(), BASE.to_string());

        assert_eq!(resolver.resolve("9999999").await, "9999999");
        assert_eq!(resolver.resolve("9999999").await, "9999999");
        // Both calls went out: the failure was not memoized
        assert_eq!(client.request_count("9999999"), 2);
    }

    #[tokio::test]
    async fn test_missing_name_field_degrades_to_code() {
        let client = MockHttpClient::new().on_json("1100015", r#"{"id":1100015}"#);
        let resolver = MunicipalityResolver::new(client, BASE.to_string());

        assert_eq!(resolver.resolve("1100015").await, "1100015");
    }
}
