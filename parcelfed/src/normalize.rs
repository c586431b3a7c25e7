//! Feature normalization
//!
//! The two providers disagree on attribute naming, units, and coding, so
//! each canonical field is resolved through an ordered list of candidate
//! keys with a fallback to absence. Provider quirks live here as data, not
//! control flow; normalization itself never fails, and the complete raw
//! attribute map always travels along so nothing is lost when no candidate
//! matches.

use crate::municipality::MunicipalityResolver;
use crate::provider::{AsyncHttpClient, RawFeature};
use serde::Serialize;
use serde_json::{Map, Value};

/// Candidate attribute keys per canonical field, in resolution order.
const PROPERTY_CODE_KEYS: &[&str] = &["parcela_codigo", "parcela_co", "codigo", "cod_imovel", "id"];
const NAME_KEYS: &[&str] = &["nome_area", "nome_imovel", "denominacao", "nome"];
const MUNICIPALITY_KEYS: &[&str] = &["municipio_", "municipio", "nome_munic", "nm_municip"];
const STATE_KEYS: &[&str] = &["uf_id", "uf", "sigla_uf", "sg_uf"];
const AREA_KEYS: &[&str] = &["area_ha", "area", "area_hecta", "area_calc"];
const STATUS_KEYS: &[&str] = &["situacao", "situacao_i", "status"];
const CERTIFICATION_DATE_KEYS: &[&str] = &["data_certificacao", "dt_certifi", "data_cert"];

/// Document-download URL templates, keyed by property code.
const VERTICES_CSV_URL: &str = "https://sigef.incra.gov.br/geo/exportar/vertice/csv/{codigo}/";
const BOUNDARY_SHP_URL: &str = "https://sigef.incra.gov.br/geo/exportar/limite/shp/{codigo}/";
const PARCEL_SHP_URL: &str = "https://sigef.incra.gov.br/geo/exportar/parcela/shp/{codigo}/";
const DETAIL_PAGE_URL: &str = "https://sigef.incra.gov.br/geo/parcela/detalhe/{codigo}/";

/// Numeric IBGE state codes mapped to their two-letter codes.
const STATE_CODES: &[(i64, &str)] = &[
    (11, "RO"),
    (12, "AC"),
    (13, "AM"),
    (14, "RR"),
    (15, "PA"),
    (16, "AP"),
    (17, "TO"),
    (21, "MA"),
    (22, "PI"),
    (23, "CE"),
    (24, "RN"),
    (25, "PB"),
    (26, "PE"),
    (27, "AL"),
    (28, "SE"),
    (29, "BA"),
    (31, "MG"),
    (32, "ES"),
    (33, "RJ"),
    (35, "SP"),
    (41, "PR"),
    (42, "SC"),
    (43, "RS"),
    (50, "MS"),
    (51, "MT"),
    (52, "GO"),
    (53, "DF"),
];

/// Area magnitudes above this are assumed to be square meters.
const SQUARE_METER_THRESHOLD: f64 = 1_000_000.0;

/// Derived document-download links for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLinks {
    pub vertices_csv: String,
    pub limites_shp: String,
    pub parcela_shp: String,
    pub detalhes: String,
}

impl DownloadLinks {
    fn for_code(code: &str) -> Self {
        Self {
            vertices_csv: VERTICES_CSV_URL.replace("{codigo}", code),
            limites_shp: BOUNDARY_SHP_URL.replace("{codigo}", code),
            parcela_shp: PARCEL_SHP_URL.replace("{codigo}", code),
            detalhes: DETAIL_PAGE_URL.replace("{codigo}", code),
        }
    }
}

/// Canonical cross-provider record shape.
///
/// Constructed fresh per query; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub property_code: String,
    pub name: Option<String>,
    pub municipality: Option<String>,
    pub state_code: Option<String>,
    pub area_hectares: Option<f64>,
    pub status: Option<String>,
    pub certification_date: Option<String>,
    /// GeoJSON geometry, passed through untouched
    pub geometry: Value,
    pub download_links: Option<DownloadLinks>,
    /// Complete unmodified provider attribute map
    pub original_attributes: Map<String, Value>,
}

/// Maps raw provider features into [`NormalizedRecord`]s.
pub struct Normalizer<C: AsyncHttpClient> {
    municipalities: MunicipalityResolver<C>,
}

impl<C: AsyncHttpClient> Normalizer<C> {
    pub fn new(municipalities: MunicipalityResolver<C>) -> Self {
        Self { municipalities }
    }

    /// Normalizes one raw feature. Infallible: every field resolves
    /// independently and degrades to absence.
    pub async fn normalize(&self, feature: &RawFeature) -> NormalizedRecord {
        let props = feature.properties();
        let id = feature.id().unwrap_or_default();

        let property_code = first_present(&props, PROPERTY_CODE_KEYS)
            .map(render_string)
            .unwrap_or_else(|| id.clone());

        let municipality = match first_present(&props, MUNICIPALITY_KEYS).map(render_string) {
            Some(raw) if is_municipality_code(&raw) => {
                Some(self.municipalities.resolve(&raw).await)
            }
            Some(raw) => Some(raw),
            None => None,
        };

        let download_links = if property_code.is_empty() {
            None
        } else {
            Some(DownloadLinks::for_code(&property_code))
        };

        NormalizedRecord {
            id,
            property_code,
            name: first_present(&props, NAME_KEYS).map(render_string),
            municipality,
            state_code: first_present(&props, STATE_KEYS).map(resolve_state_code),
            area_hectares: parse_area(&props),
            status: first_present(&props, STATUS_KEYS).map(render_string),
            certification_date: first_present(&props, CERTIFICATION_DATE_KEYS).map(render_string),
            geometry: feature.geometry(),
            download_links,
            original_attributes: props,
        }
    }
}

/// First candidate key whose value is present and non-empty.
fn first_present<'a>(props: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| props.get(*key))
        .find(|value| is_present(value))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Bool(b) => *b,
        _ => true,
    }
}

fn render_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A municipality value is a resolvable code when it is exactly 7 digits.
fn is_municipality_code(raw: &str) -> bool {
    raw.len() == 7 && raw.chars().all(|c| c.is_ascii_digit())
}

/// Resolves a state value to its two-letter code.
///
/// Alphabetic codes pass through; numeric codes go through the IBGE table;
/// unknown numeric codes pass through as their string form.
fn resolve_state_code(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(code) => STATE_CODES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, uf)| uf.to_string())
                .unwrap_or_else(|| code.to_string()),
            None => n.to_string(),
        },
        other => render_string(other),
    }
}

/// Resolves the area in hectares.
///
/// Magnitudes above [`SQUARE_METER_THRESHOLD`] are assumed to be square
/// meters and converted; the result is rounded to 4 decimal places.
/// Non-numeric values yield `None` rather than failing.
fn parse_area(props: &Map<String, Value>) -> Option<f64> {
    let value = first_present(props, AREA_KEYS)?;

    let mut area = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if area > SQUARE_METER_THRESHOLD {
        area /= 10_000.0;
    }

    Some((area * 10_000.0).round() / 10_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;
    use serde_json::json;

    fn normalizer(client: MockHttpClient) -> Normalizer<MockHttpClient> {
        Normalizer::new(MunicipalityResolver::new(
            client,
            "https://host/municipios".to_string(),
        ))
    }

    fn feature(props: Value) -> RawFeature {
        RawFeature(json!({
            "id": "layer.42",
            "geometry": {"type": "Point", "coordinates": [-47.4, -15.8]},
            "properties": props
        }))
    }

    #[tokio::test]
    async fn test_property_code_candidate_order() {
        let n = normalizer(MockHttpClient::new());
        let record = n
            .normalize(&feature(json!({"codigo": "abc", "parcela_codigo": "wins"})))
            .await;
        assert_eq!(record.property_code, "wins");
    }

    #[tokio::test]
    async fn test_property_code_falls_back_to_feature_id() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({}))).await;
        assert_eq!(record.property_code, "layer.42");
        assert!(record.download_links.is_some());
    }

    #[tokio::test]
    async fn test_area_in_square_meters_converted() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"area": 2000000}))).await;
        assert_eq!(record.area_hectares, Some(200.0));
    }

    #[tokio::test]
    async fn test_area_already_hectares_unchanged() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"area_ha": 150.25}))).await;
        assert_eq!(record.area_hectares, Some(150.25));
    }

    #[tokio::test]
    async fn test_area_rounded_to_four_decimals() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"area_ha": 10.123456}))).await;
        assert_eq!(record.area_hectares, Some(10.1235));
    }

    #[tokio::test]
    async fn test_non_numeric_area_yields_none() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"area": "n/a"}))).await;
        assert_eq!(record.area_hectares, None);
    }

    #[tokio::test]
    async fn test_numeric_state_code_resolved() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"uf_id": 35}))).await;
        assert_eq!(record.state_code.as_deref(), Some("SP"));
    }

    #[tokio::test]
    async fn test_unknown_numeric_state_code_passes_through() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"uf_id": 99}))).await;
        assert_eq!(record.state_code.as_deref(), Some("99"));
    }

    #[tokio::test]
    async fn test_alphabetic_state_code_passes_through() {
        let n = normalizer(MockHttpClient::new());
        let record = n.normalize(&feature(json!({"sigla_uf": "MG"}))).await;
        assert_eq!(record.state_code.as_deref(), Some("MG"));
    }

    #[tokio::test]
    async fn test_municipality_code_resolved_via_lookup() {
        let client = MockHttpClient::new().on_json("4103107", r#"{"nome":"Bocaiúva do Sul"}"#);
        let n = normalizer(client);
        let record = n.normalize(&feature(json!({"municipio": "4103107"}))).await;
        assert_eq!(record.municipality.as_deref(), Some("Bocaiúva do Sul"));
    }

    #[tokio::test]
    async fn test_municipality_name_passes_through_without_lookup() {
        let client = MockHttpClient::new();
        let n = normalizer(client.clone());
        let record = n.normalize(&feature(json!({"nome_munic": "Luziânia"}))).await;
        assert_eq!(record.municipality.as_deref(), Some("Luziânia"));
        assert!(client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_links_substituted() {
        let n = normalizer(MockHttpClient::new());
        let record = n
            .normalize(&feature(json!({"parcela_codigo": "deadbeef-1234"})))
            .await;
        let links = record.download_links.unwrap();
        assert_eq!(
            links.vertices_csv,
            "https://sigef.incra.gov.br/geo/exportar/vertice/csv/deadbeef-1234/"
        );
        assert_eq!(
            links.detalhes,
            "https://sigef.incra.gov.br/geo/parcela/detalhe/deadbeef-1234/"
        );
    }

    #[tokio::test]
    async fn test_original_attributes_kept_verbatim() {
        let n = normalizer(MockHttpClient::new());
        let props = json!({"weird_provider_field": [1, 2, 3], "area_ha": 10});
        let record = n.normalize(&feature(props.clone())).await;
        assert_eq!(Value::Object(record.original_attributes), props);
    }

    #[tokio::test]
    async fn test_normalization_is_idempotent() {
        let n = normalizer(MockHttpClient::new());
        let f = feature(json!({
            "parcela_co": "p-1",
            "nome_area": "Fazenda Santa Fé",
            "uf": 52,
            "area_calc": 3500000,
            "situacao": "Certificada"
        }));
        let first = n.normalize(&f).await;
        let second = n.normalize(&f).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_candidate_values_skipped() {
        let n = normalizer(MockHttpClient::new());
        let record = n
            .normalize(&feature(json!({"nome_area": "", "denominacao": "Sítio Alegre"})))
            .await;
        assert_eq!(record.name.as_deref(), Some("Sítio Alegre"));
    }
}
