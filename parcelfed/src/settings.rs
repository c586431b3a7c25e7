//! Engine settings
//!
//! Pure data types with no parsing or I/O. Callers construct a [`Settings`]
//! (usually via `Default`) and hand it to the federation service, which
//! builds HTTP clients and providers from it.

/// Complete engine configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Regional (per-state) WFS endpoint, i3geo OGC service
    pub regional_base_url: String,
    /// National WFS endpoint, GeoServer
    pub national_base_url: String,
    /// IBGE municipality lookup endpoint, completed with `/{code}`
    pub municipality_base_url: String,
    /// Per-request timeout for WFS queries, in seconds
    pub request_timeout_secs: u64,
    /// Per-request timeout for municipality lookups, in seconds
    pub municipality_timeout_secs: u64,
    /// Result cap sent to the upstream servers (`maxFeatures`)
    pub max_features: u32,
    /// Skip TLS certificate validation on upstream requests.
    ///
    /// The government endpoints serve outdated certificate chains; defaults
    /// to `true` to match them, but can be switched off where the chain is
    /// trusted.
    pub accept_invalid_certs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            regional_base_url: "https://acervofundiario.incra.gov.br/i3geo/ogc.php".to_string(),
            national_base_url: "https://geoonecloud.com/geoserver/GeoINCRA/wfs".to_string(),
            municipality_base_url: "https://servicodados.ibge.gov.br/api/v1/localidades/municipios"
                .to_string(),
            request_timeout_secs: 60,
            municipality_timeout_secs: 5,
            max_features: 10_000,
            accept_invalid_certs: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.request_timeout_secs, 60);
        assert_eq!(settings.max_features, 10_000);
        assert!(settings.accept_invalid_certs);
    }
}
