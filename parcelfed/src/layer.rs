//! Layer catalog
//!
//! Maps each semantic layer of the land registry to the provider-specific
//! identifiers needed to query it: a per-state typename on the regional
//! i3geo server and an unparameterized typename on the national GeoServer.
//!
//! The two certified layers were republished under successive survey norms;
//! for those the catalog yields every historical variant in a fixed order
//! (current norm first) and callers must attempt all of them, aggregating
//! whatever each returns. The registry is immutable, process-wide data.

use crate::region::Region;

/// Semantic layers of certified land-registry records.
///
/// The enumeration is closed: unknown layers cannot reach the catalog, so
/// the "unknown layer" configuration error of the source system is ruled
/// out at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Certified private properties (SIGEF)
    CertifiedPrivate,
    /// Certified public properties (SIGEF)
    CertifiedPublic,
    /// Private properties from the legacy survey system (SNCI)
    SurveyPrivate,
    /// Public properties from the legacy survey system (SNCI)
    SurveyPublic,
    /// Rural settlement projects
    Settlements,
    /// Quilombola community territories
    QuilombolaTerritories,
    /// Properties pending titling
    PendingTitling,
}

/// All layers, in the order the all-layers query mode iterates them.
pub const ALL_LAYERS: [LayerType; 7] = [
    LayerType::CertifiedPrivate,
    LayerType::CertifiedPublic,
    LayerType::SurveyPrivate,
    LayerType::SurveyPublic,
    LayerType::Settlements,
    LayerType::QuilombolaTerritories,
    LayerType::PendingTitling,
];

/// One (url, typename) pair to query on the regional server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalVariant {
    /// Full endpoint URL including the `tema` selector
    pub url: String,
    /// WFS typename for the request parameters
    pub typename: String,
}

impl LayerType {
    /// Human-readable layer label used in query results.
    pub fn label(&self) -> &'static str {
        match self {
            LayerType::CertifiedPrivate => "Imóveis Certificados SIGEF - Particular",
            LayerType::CertifiedPublic => "Imóveis Certificados SIGEF - Público",
            LayerType::SurveyPrivate => "SNCI Privado",
            LayerType::SurveyPublic => "SNCI Público",
            LayerType::Settlements => "Assentamentos",
            LayerType::QuilombolaTerritories => "Quilombolas",
            LayerType::PendingTitling => "Pendentes de Titulação",
        }
    }

    /// Typename stems on the regional server, per-norm, current norm first.
    ///
    /// Stems are completed with `_{uf}` for the queried state.
    fn regional_stems(&self) -> &'static [&'static str] {
        match self {
            LayerType::CertifiedPrivate => &[
                "certificada_sigef_particular",
                "certificada_sigef_particular_2n",
                "certificada_sigef_particular_1n",
            ],
            LayerType::CertifiedPublic => &[
                "certificada_sigef_publico",
                "certificada_sigef_publico_2n",
                "certificada_sigef_publico_1n",
            ],
            LayerType::SurveyPrivate => &["snci_privado"],
            LayerType::SurveyPublic => &["snci_publico"],
            LayerType::Settlements => &["assentamentos"],
            LayerType::QuilombolaTerritories => &["quilombolas"],
            LayerType::PendingTitling => &["pendentes_titulacao"],
        }
    }

    /// Resolves the regional (url, typename) variants for one state.
    ///
    /// `base_url` is the i3geo OGC endpoint; the `tema` selector must match
    /// the requested typename, so both are derived from the same stem.
    pub fn regional_variants(&self, region: Region, base_url: &str) -> Vec<RegionalVariant> {
        self.regional_stems()
            .iter()
            .map(|stem| {
                let tema = format!("{}_{}", stem, region.code_lower());
                RegionalVariant {
                    url: format!("{}?tema={}", base_url, tema),
                    typename: format!("ms:{}", tema),
                }
            })
            .collect()
    }

    /// Typename variants on the national GeoServer, current norm first.
    pub fn national_variants(&self) -> &'static [&'static str] {
        match self {
            LayerType::CertifiedPrivate => &[
                "GeoINCRA:certificado_sigef_privado",
                "GeoINCRA:certificado_sigef_privado_2n",
                "GeoINCRA:certificado_sigef_privado_1n",
            ],
            LayerType::CertifiedPublic => &[
                "GeoINCRA:certificado_sigef_publico",
                "GeoINCRA:certificado_sigef_publico_2n",
                "GeoINCRA:certificado_sigef_publico_1n",
            ],
            LayerType::SurveyPrivate => &["GeoINCRA:snci_privado"],
            LayerType::SurveyPublic => &["GeoINCRA:snci_publico"],
            LayerType::Settlements => &["GeoINCRA:assentamentos"],
            LayerType::QuilombolaTerritories => &["GeoINCRA:quilombolas"],
            LayerType::PendingTitling => &["GeoINCRA:pendentes_titulacao"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certified_layers_have_three_norm_variants() {
        assert_eq!(LayerType::CertifiedPrivate.national_variants().len(), 3);
        assert_eq!(LayerType::CertifiedPublic.national_variants().len(), 3);
        assert_eq!(LayerType::Settlements.national_variants().len(), 1);
    }

    #[test]
    fn test_current_norm_comes_first() {
        let variants = LayerType::CertifiedPrivate.national_variants();
        assert_eq!(variants[0], "GeoINCRA:certificado_sigef_privado");
        assert_eq!(variants[2], "GeoINCRA:certificado_sigef_privado_1n");
    }

    #[test]
    fn test_regional_variant_parameterized_by_state() {
        let variants = LayerType::SurveyPrivate
            .regional_variants(Region::SaoPaulo, "https://example.gov.br/i3geo/ogc.php");
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].typename, "ms:snci_privado_sp");
        assert_eq!(
            variants[0].url,
            "https://example.gov.br/i3geo/ogc.php?tema=snci_privado_sp"
        );
    }

    #[test]
    fn test_regional_certified_variants_share_state_suffix() {
        let variants = LayerType::CertifiedPublic
            .regional_variants(Region::Bahia, "https://example.gov.br/i3geo/ogc.php");
        assert_eq!(variants.len(), 3);
        for variant in &variants {
            assert!(variant.typename.ends_with("_ba"));
        }
    }

    #[test]
    fn test_all_layers_covers_enum() {
        // Guard against a new layer being added without catalog entries
        for layer in ALL_LAYERS {
            assert!(!layer.label().is_empty());
            assert!(!layer.national_variants().is_empty());
        }
    }
}
