//! Provider types and response parsing

use super::http::HttpBody;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport failure, timeout, or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(String),
    /// Server answered with something other than a geographic JSON payload
    #[error("non-geographic content type {content_type:?} from {url}")]
    NotGeoJson {
        content_type: Option<String>,
        url: String,
    },
    /// Payload claimed to be JSON but did not parse as a feature collection
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// One feature exactly as delivered by a provider.
///
/// The attribute schema differs between providers and is not under this
/// engine's control, so the feature is kept as opaque JSON with accessors
/// for the parts normalization needs. Serializing a `RawFeature` reproduces
/// the provider's document byte-for-byte-equivalent, which is what the
/// GeoJSON passthrough in query results relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFeature(pub Value);

impl RawFeature {
    /// Feature identifier, rendered as a string when present.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Attribute map; empty when the provider sent none.
    pub fn properties(&self) -> serde_json::Map<String, Value> {
        match self.0.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        }
    }

    /// Geometry passthrough; `null` when absent.
    pub fn geometry(&self) -> Value {
        self.0.get("geometry").cloned().unwrap_or(Value::Null)
    }
}

/// Parses a WFS GetFeature response into its feature list.
///
/// An empty body or a collection with zero features is a normal outcome.
/// A non-JSON content type or an unparseable payload is an error.
pub fn parse_feature_collection(body: &HttpBody, url: &str) -> Result<Vec<RawFeature>, ProviderError> {
    if let Some(content_type) = &body.content_type {
        if !content_type.contains("json") {
            return Err(ProviderError::NotGeoJson {
                content_type: Some(content_type.clone()),
                url: url.to_string(),
            });
        }
    }

    if body.bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_slice(&body.bytes)
        .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse failed: {}", e)))?;

    let features = match document.get("features") {
        Some(Value::Array(features)) => features.iter().cloned().map(RawFeature).collect(),
        Some(_) => {
            return Err(ProviderError::InvalidResponse(
                "\"features\" is not an array".to_string(),
            ))
        }
        None => Vec::new(),
    };

    Ok(features)
}
