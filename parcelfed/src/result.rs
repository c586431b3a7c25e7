//! Query result assembly
//!
//! The result carries both representations of the answer: the canonical
//! normalized records and the verbatim provider features as a GeoJSON
//! `FeatureCollection`, so consumers can use whichever fits.

use crate::normalize::NormalizedRecord;
use crate::provider::RawFeature;
use serde::Serialize;
use std::time::Instant;

/// Aggregate outcome of one federated query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub success: bool,
    pub message: String,
    /// Number of returned records after truncation
    pub total: usize,
    /// Provider(s) that produced the returned data, `+`-joined when several
    pub provider: String,
    /// Resolved layer label
    pub layer: String,
    /// Echo of the queried bounds as `[x_min, y_min, x_max, y_max]`
    pub bbox: [f64; 4],
    /// Wall-clock time from request receipt to assembly
    pub elapsed_ms: f64,
    pub records: Vec<NormalizedRecord>,
    /// GeoJSON FeatureCollection type marker
    #[serde(rename = "type")]
    pub collection_type: &'static str,
    /// Raw provider features, unnormalized passthrough
    pub features: Vec<RawFeature>,
}

impl QueryResult {
    /// Assembles a successful result.
    pub fn completed(
        records: Vec<NormalizedRecord>,
        features: Vec<RawFeature>,
        provider: String,
        layer: String,
        bbox: [f64; 4],
        started: Instant,
    ) -> Self {
        let total = records.len();
        Self {
            success: true,
            message: format!("Query completed successfully. {} records found.", total),
            total,
            provider,
            layer,
            bbox,
            elapsed_ms: elapsed_ms(started),
            records,
            collection_type: "FeatureCollection",
            features,
        }
    }

    /// Assembles a failure envelope. Failures are result values, never
    /// panics or errors escaping the engine boundary.
    pub fn failed(message: String, layer: String, bbox: [f64; 4], started: Instant) -> Self {
        Self {
            success: false,
            message,
            total: 0,
            provider: "error".to_string(),
            layer,
            bbox,
            elapsed_ms: elapsed_ms(started),
            records: Vec::new(),
            collection_type: "FeatureCollection",
            features: Vec::new(),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    (ms * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_counts_records() {
        let result = QueryResult::completed(
            Vec::new(),
            Vec::new(),
            "geoone".to_string(),
            "Assentamentos".to_string(),
            [-47.5, -15.9, -47.3, -15.7],
            Instant::now(),
        );
        assert!(result.success);
        assert_eq!(result.total, 0);
        assert_eq!(result.collection_type, "FeatureCollection");
        assert!(result.message.contains("0 records"));
    }

    #[test]
    fn test_failed_envelope() {
        let result = QueryResult::failed(
            "Query failed: HTTP 502".to_string(),
            "SNCI Privado".to_string(),
            [-47.5, -15.9, -47.3, -15.7],
            Instant::now(),
        );
        assert!(!result.success);
        assert_eq!(result.total, 0);
        assert_eq!(result.provider, "error");
        assert!(result.records.is_empty());
        assert!(result.features.is_empty());
    }
}
