//! National WFS client

use super::http::AsyncHttpClient;
use super::types::{parse_feature_collection, ProviderError, RawFeature};
use crate::bbox::BoundingBox;
use tracing::{debug, info};

/// Client for the national GeoServer.
///
/// National layers cover the whole country in one typename, so there is no
/// state loop; the federation controller invokes this once per norm variant.
/// Speaks WFS 2.0.0 and requires an explicit `srsName`.
pub struct NationalWfs<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    max_features: u32,
}

impl<C: AsyncHttpClient> NationalWfs<C> {
    pub fn new(http_client: C, base_url: String, max_features: u32) -> Self {
        Self {
            http_client,
            base_url,
            max_features,
        }
    }

    /// Provider name used in query-result labels.
    pub fn name(&self) -> &'static str {
        "geoone"
    }

    /// Fetches one typename for the given box.
    pub async fn query(
        &self,
        bbox: &BoundingBox,
        typename: &str,
    ) -> Result<Vec<RawFeature>, ProviderError> {
        let request_url = self.build_url(bbox, typename);
        debug!(url = %request_url, typename = typename, "national WFS request");

        let body = self.http_client.get(&request_url).await?;
        let features = parse_feature_collection(&body, &request_url)?;

        info!(
            typename = typename,
            count = features.len(),
            "national WFS response"
        );
        Ok(features)
    }

    fn build_url(&self, bbox: &BoundingBox, typename: &str) -> String {
        format!(
            "{}?service=WFS&version=2.0.0&request=GetFeature&typeName={}&bbox={},EPSG:4326&outputFormat=application/json&srsName=EPSG:4326&maxFeatures={}",
            self.base_url,
            typename,
            bbox.to_wfs_param(),
            self.max_features
        )
    }
}
