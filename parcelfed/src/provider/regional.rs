//! Regional (per-state) WFS client

use super::http::AsyncHttpClient;
use super::types::{parse_feature_collection, ProviderError, RawFeature};
use crate::bbox::BoundingBox;
use tracing::{debug, info};

/// Client for the regional i3geo server.
///
/// The regional server partitions every layer by state, so it is invoked
/// once per (state, norm-variant) pair by the federation controller. Speaks
/// WFS 1.1.0.
pub struct RegionalWfs<C: AsyncHttpClient> {
    http_client: C,
    max_features: u32,
}

impl<C: AsyncHttpClient> RegionalWfs<C> {
    pub fn new(http_client: C, max_features: u32) -> Self {
        Self {
            http_client,
            max_features,
        }
    }

    /// Provider name used in query-result labels.
    pub fn name(&self) -> &'static str {
        "incra"
    }

    /// Fetches one typename on one endpoint for the given box.
    ///
    /// A valid response with zero features is a normal outcome; transport
    /// failures, non-JSON answers, and malformed payloads are errors the
    /// caller is expected to absorb per sub-query.
    pub async fn query(
        &self,
        bbox: &BoundingBox,
        url: &str,
        typename: &str,
    ) -> Result<Vec<RawFeature>, ProviderError> {
        let request_url = self.build_url(bbox, url, typename);
        debug!(url = %request_url, typename = typename, "regional WFS request");

        let body = self.http_client.get(&request_url).await?;
        let features = parse_feature_collection(&body, &request_url)?;

        info!(
            typename = typename,
            count = features.len(),
            "regional WFS response"
        );
        Ok(features)
    }

    fn build_url(&self, bbox: &BoundingBox, url: &str, typename: &str) -> String {
        format!(
            "{}&service=WFS&version=1.1.0&request=GetFeature&typename={}&bbox={},EPSG:4326&outputFormat=application/json&maxFeatures={}",
            url,
            typename,
            bbox.to_wfs_param(),
            self.max_features
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn bbox() -> BoundingBox {
        BoundingBox::new(-47.5, -15.9, -47.3, -15.7).unwrap()
    }

    #[tokio::test]
    async fn test_query_parses_features() {
        let client = MockHttpClient::new().on_json(
            "tema=snci_privado_df",
            r#"{"features":[{"id":"p.1","geometry":null,"properties":{}}]}"#,
        );
        let wfs = RegionalWfs::new(client, 10_000);

        let features = wfs
            .query(
                &bbox(),
                "https://host/i3geo/ogc.php?tema=snci_privado_df",
                "ms:snci_privado_df",
            )
            .await
            .unwrap();
        assert_eq!(features.len(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_bbox_and_cap() {
        let client = MockHttpClient::new().on_json("tema=", r#"{"features":[]}"#);
        let wfs = RegionalWfs::new(client.clone(), 500);

        wfs.query(&bbox(), "https://host/ogc.php?tema=assentamentos_df", "ms:assentamentos_df")
            .await
            .unwrap();

        let requests = client.requests.lock().unwrap();
        assert!(requests[0].contains("bbox=-47.5,-15.9,-47.3,-15.7,EPSG:4326"));
        assert!(requests[0].contains("maxFeatures=500"));
        assert!(requests[0].contains("version=1.1.0"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client =
            MockHttpClient::new().on("tema=", Err(ProviderError::Http("timeout".to_string())));
        let wfs = RegionalWfs::new(client, 10_000);

        let result = wfs
            .query(&bbox(), "https://host/ogc.php?tema=quilombolas_df", "ms:quilombolas_df")
            .await;
        assert!(matches!(result.unwrap_err(), ProviderError::Http(_)));
    }
}
