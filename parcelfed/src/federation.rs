//! Federation controller
//!
//! Orchestrates which provider(s) answer a query: the regional server needs
//! the box partitioned into states, the national server is queried per norm
//! variant, and `Auto` mode tries regional first with a national fallback.
//! Sub-queries run strictly sequentially so the government servers are never
//! hammered in parallel; failures are absorbed at the smallest enclosing
//! scope and never abort sibling sub-queries.
//!
//! Nothing below this module's boundary surfaces as an error to callers: an
//! unrecoverable failure becomes a `success = false` [`QueryResult`].

use crate::bbox::BoundingBox;
use crate::layer::{LayerType, ALL_LAYERS};
use crate::municipality::MunicipalityResolver;
use crate::normalize::Normalizer;
use crate::provider::{
    AsyncHttpClient, NationalWfs, ProviderError, RawFeature, RegionalWfs, ReqwestClient,
};
use crate::region::regions_intersecting;
use crate::result::QueryResult;
use crate::settings::Settings;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Provider selection for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    /// Per-state server only
    Regional,
    /// National server only
    National,
    /// Regional first, national as fallback; all layers when none is given
    Auto,
}

/// Label reported when no provider contributed data in all-layers mode.
const AUTO_LABEL: &str = "auto";

/// Layer label reported by the all-layers mode.
const ALL_LAYERS_LABEL: &str = "Todas as Camadas";

/// Hard bounds on the caller-supplied result cap.
const MIN_LIMIT: usize = 1;
const MAX_LIMIT: usize = 10_000;

/// Federated query engine over both providers.
pub struct FederationService<C: AsyncHttpClient> {
    regional: RegionalWfs<C>,
    national: NationalWfs<C>,
    normalizer: Normalizer<C>,
    settings: Settings,
}

impl FederationService<ReqwestClient> {
    /// Builds the service with real HTTP clients from the given settings.
    ///
    /// The WFS client relaxes TLS validation per
    /// `settings.accept_invalid_certs`; the municipality client always
    /// validates, since the IBGE endpoint has a sound chain.
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let wfs_client =
            ReqwestClient::new(settings.request_timeout_secs, settings.accept_invalid_certs)?;
        let municipality_client = ReqwestClient::new(settings.municipality_timeout_secs, false)?;
        Ok(Self::with_clients(
            wfs_client,
            municipality_client,
            settings.clone(),
        ))
    }
}

impl<C: AsyncHttpClient + Clone> FederationService<C> {
    /// Builds the service from explicit transports, for tests and embedding.
    pub fn with_clients(wfs_client: C, municipality_client: C, settings: Settings) -> Self {
        let regional = RegionalWfs::new(wfs_client.clone(), settings.max_features);
        let national = NationalWfs::new(
            wfs_client,
            settings.national_base_url.clone(),
            settings.max_features,
        );
        let normalizer = Normalizer::new(MunicipalityResolver::new(
            municipality_client,
            settings.municipality_base_url.clone(),
        ));
        Self {
            regional,
            national,
            normalizer,
            settings,
        }
    }
}

impl<C: AsyncHttpClient> FederationService<C> {
    /// Runs one federated query end to end.
    ///
    /// `bounds` are raw `(x_min, y_min, x_max, y_max)` values; a malformed
    /// box yields a structured failure result rather than an error. `layer`
    /// is required for explicit modes (defaulting to certified private) and
    /// optional for `Auto`, where `None` selects the all-layers sweep.
    /// Results are truncated to `limit` after aggregation.
    pub async fn query_bounds(
        &self,
        bounds: (f64, f64, f64, f64),
        layer: Option<LayerType>,
        mode: ServerMode,
        limit: usize,
    ) -> QueryResult {
        let started = Instant::now();
        let bbox_echo = [bounds.0, bounds.1, bounds.2, bounds.3];
        let layer_label = match (mode, layer) {
            (ServerMode::Auto, None) => ALL_LAYERS_LABEL.to_string(),
            (_, layer) => layer.unwrap_or(LayerType::CertifiedPrivate).label().to_string(),
        };

        let bbox = match BoundingBox::new(bounds.0, bounds.1, bounds.2, bounds.3) {
            Ok(bbox) => bbox,
            Err(e) => {
                warn!(error = %e, "rejected malformed bounding box");
                return QueryResult::failed(
                    format!("Invalid bounding box: {}", e),
                    layer_label,
                    bbox_echo,
                    started,
                );
            }
        };

        let limit = limit.clamp(MIN_LIMIT, MAX_LIMIT);

        match self.run(&bbox, layer, mode).await {
            Ok((mut features, provider)) => {
                // Hard cap applied after aggregation, so later regions and
                // layers lose out once the cap is reached.
                features.truncate(limit);

                let mut records = Vec::with_capacity(features.len());
                for feature in &features {
                    records.push(self.normalizer.normalize(feature).await);
                }

                info!(
                    provider = %provider,
                    total = records.len(),
                    "query completed"
                );
                QueryResult::completed(records, features, provider, layer_label, bbox_echo, started)
            }
            Err(e) => {
                warn!(error = %e, "query failed");
                QueryResult::failed(format!("Query failed: {}", e), layer_label, bbox_echo, started)
            }
        }
    }

    /// Mode dispatch: resolves features and the provider label to report.
    async fn run(
        &self,
        bbox: &BoundingBox,
        layer: Option<LayerType>,
        mode: ServerMode,
    ) -> Result<(Vec<RawFeature>, String), ProviderError> {
        match (mode, layer) {
            (ServerMode::Regional, layer) => {
                let layer = layer.unwrap_or(LayerType::CertifiedPrivate);
                let features = self.fetch_regional(bbox, layer).await;
                Ok((features, self.regional.name().to_string()))
            }
            (ServerMode::National, layer) => {
                let layer = layer.unwrap_or(LayerType::CertifiedPrivate);
                let features = self.fetch_national(bbox, layer).await?;
                Ok((features, self.national.name().to_string()))
            }
            (ServerMode::Auto, Some(layer)) => {
                let (features, provider) = self.fetch_auto(bbox, layer).await?;
                Ok((features, provider.to_string()))
            }
            (ServerMode::Auto, None) => self.fetch_all_layers(bbox).await,
        }
    }

    /// Regional sweep: every intersecting state times every norm variant.
    ///
    /// Per-call failures are logged and skipped; the sweep itself cannot
    /// fail, and an empty aggregate is a valid answer.
    async fn fetch_regional(&self, bbox: &BoundingBox, layer: LayerType) -> Vec<RawFeature> {
        let regions = regions_intersecting(bbox);
        if regions.is_empty() {
            warn!("no region intersects the query box");
            return Vec::new();
        }
        debug!(regions = regions.len(), layer = ?layer, "regional sweep");

        let mut all_features = Vec::new();
        for region in regions {
            for variant in layer.regional_variants(region, &self.settings.regional_base_url) {
                match self
                    .regional
                    .query(bbox, &variant.url, &variant.typename)
                    .await
                {
                    Ok(features) => all_features.extend(features),
                    Err(e) => {
                        warn!(
                            region = region.code(),
                            typename = %variant.typename,
                            error = %e,
                            "regional sub-query skipped"
                        );
                    }
                }
            }
        }
        all_features
    }

    /// National sweep over the layer's norm variants.
    ///
    /// A variant failure is absorbed as long as any variant answered; when
    /// every variant fails the last error is reported so a total failure is
    /// visible to the fallback logic.
    async fn fetch_national(
        &self,
        bbox: &BoundingBox,
        layer: LayerType,
    ) -> Result<Vec<RawFeature>, ProviderError> {
        let mut all_features = Vec::new();
        let mut answered = false;
        let mut last_error = None;

        for typename in layer.national_variants() {
            match self.national.query(bbox, typename).await {
                Ok(features) => {
                    answered = true;
                    all_features.extend(features);
                }
                Err(e) => {
                    debug!(typename = typename, error = %e, "national variant unavailable");
                    last_error = Some(e);
                }
            }
        }

        match (answered, last_error) {
            (false, Some(e)) => Err(e),
            _ => Ok(all_features),
        }
    }

    /// Auto mode for one layer: regional first, national as fallback.
    ///
    /// Falls back when the regional sweep errors *or* comes back empty. The
    /// reported provider is the one whose result is returned, never both.
    async fn fetch_auto(
        &self,
        bbox: &BoundingBox,
        layer: LayerType,
    ) -> Result<(Vec<RawFeature>, &'static str), ProviderError> {
        let regional_features = self.fetch_regional(bbox, layer).await;
        if !regional_features.is_empty() {
            info!(
                layer = ?layer,
                count = regional_features.len(),
                "regional provider answered"
            );
            return Ok((regional_features, self.regional.name()));
        }

        info!(layer = ?layer, "falling back to national provider");
        let features = self.fetch_national(bbox, layer).await?;
        Ok((features, self.national.name()))
    }

    /// Auto mode over every layer: per-layer failures are logged and
    /// excluded from the aggregate without aborting the others.
    ///
    /// The reported label is the distinct union of providers that actually
    /// contributed data, `+`-joined in first-use order.
    async fn fetch_all_layers(
        &self,
        bbox: &BoundingBox,
    ) -> Result<(Vec<RawFeature>, String), ProviderError> {
        let mut all_features = Vec::new();
        let mut providers: Vec<&'static str> = Vec::new();

        for layer in ALL_LAYERS {
            match self.fetch_auto(bbox, layer).await {
                Ok((features, provider)) => {
                    if !features.is_empty() {
                        info!(layer = ?layer, count = features.len(), "layer answered");
                        all_features.extend(features);
                        if !providers.contains(&provider) {
                            providers.push(provider);
                        }
                    }
                }
                Err(e) => {
                    warn!(layer = ?layer, error = %e, "layer skipped");
                }
            }
        }

        let label = if providers.is_empty() {
            AUTO_LABEL.to_string()
        } else {
            providers.join("+")
        };
        info!(total = all_features.len(), providers = %label, "all-layers sweep finished");
        Ok((all_features, label))
    }
}
