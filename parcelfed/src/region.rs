//! Administrative regions and spatial partitioning
//!
//! The regional provider publishes one feature layer per Brazilian state, so
//! a query bounding box must first be partitioned into the states it touches.
//! Each state carries a static approximate envelope used only for this
//! intersection test; envelopes are configuration data and are never returned
//! to callers.

use crate::bbox::BoundingBox;

/// One of the 27 Brazilian states (including the Federal District).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Acre,
    Alagoas,
    Amapa,
    Amazonas,
    Bahia,
    Ceara,
    DistritoFederal,
    EspiritoSanto,
    Goias,
    Maranhao,
    MatoGrosso,
    MatoGrossoDoSul,
    MinasGerais,
    Para,
    Paraiba,
    Parana,
    Pernambuco,
    Piaui,
    RioDeJaneiro,
    RioGrandeDoNorte,
    RioGrandeDoSul,
    Rondonia,
    Roraima,
    SantaCatarina,
    SaoPaulo,
    Sergipe,
    Tocantins,
}

/// All regions, in catalog order.
pub const ALL_REGIONS: [Region; 27] = [
    Region::Acre,
    Region::Alagoas,
    Region::Amapa,
    Region::Amazonas,
    Region::Bahia,
    Region::Ceara,
    Region::DistritoFederal,
    Region::EspiritoSanto,
    Region::Goias,
    Region::Maranhao,
    Region::MatoGrosso,
    Region::MatoGrossoDoSul,
    Region::MinasGerais,
    Region::Para,
    Region::Paraiba,
    Region::Parana,
    Region::Pernambuco,
    Region::Piaui,
    Region::RioDeJaneiro,
    Region::RioGrandeDoNorte,
    Region::RioGrandeDoSul,
    Region::Rondonia,
    Region::Roraima,
    Region::SantaCatarina,
    Region::SaoPaulo,
    Region::Sergipe,
    Region::Tocantins,
];

impl Region {
    /// Two-letter IBGE state code.
    pub fn code(&self) -> &'static str {
        match self {
            Region::Acre => "AC",
            Region::Alagoas => "AL",
            Region::Amapa => "AP",
            Region::Amazonas => "AM",
            Region::Bahia => "BA",
            Region::Ceara => "CE",
            Region::DistritoFederal => "DF",
            Region::EspiritoSanto => "ES",
            Region::Goias => "GO",
            Region::Maranhao => "MA",
            Region::MatoGrosso => "MT",
            Region::MatoGrossoDoSul => "MS",
            Region::MinasGerais => "MG",
            Region::Para => "PA",
            Region::Paraiba => "PB",
            Region::Parana => "PR",
            Region::Pernambuco => "PE",
            Region::Piaui => "PI",
            Region::RioDeJaneiro => "RJ",
            Region::RioGrandeDoNorte => "RN",
            Region::RioGrandeDoSul => "RS",
            Region::Rondonia => "RO",
            Region::Roraima => "RR",
            Region::SantaCatarina => "SC",
            Region::SaoPaulo => "SP",
            Region::Sergipe => "SE",
            Region::Tocantins => "TO",
        }
    }

    /// Lowercase state code as it appears in regional layer typenames.
    pub fn code_lower(&self) -> String {
        self.code().to_ascii_lowercase()
    }

    /// Approximate bounding envelope as `[x_min, y_min, x_max, y_max]`.
    ///
    /// Coarse by design: the envelope over-approximates the state boundary,
    /// so intersection may select a state the query box does not actually
    /// touch. The regional server then simply returns zero features for it.
    pub fn envelope(&self) -> [f64; 4] {
        match self {
            Region::Acre => [-73.98, -11.15, -66.64, -7.07],
            Region::Alagoas => [-38.23, -10.49, -35.15, -8.82],
            Region::Amapa => [-54.88, -0.04, -49.85, 4.45],
            Region::Amazonas => [-73.79, -9.82, -56.08, 2.24],
            Region::Bahia => [-46.62, -18.35, -37.34, -8.54],
            Region::Ceara => [-41.42, -7.87, -37.24, -2.79],
            Region::DistritoFederal => [-48.28, -16.04, -47.31, -15.50],
            Region::EspiritoSanto => [-41.88, -21.30, -39.67, -17.89],
            Region::Goias => [-53.24, -19.48, -45.91, -12.39],
            Region::Maranhao => [-48.61, -10.27, -41.84, -1.02],
            Region::MatoGrosso => [-61.63, -18.04, -50.22, -7.35],
            Region::MatoGrossoDoSul => [-58.16, -24.07, -50.93, -17.16],
            Region::MinasGerais => [-51.05, -22.92, -39.86, -14.24],
            Region::Para => [-58.88, -9.82, -46.04, 2.61],
            Region::Paraiba => [-38.79, -8.20, -34.79, -6.02],
            Region::Parana => [-54.62, -26.72, -48.02, -22.51],
            Region::Pernambuco => [-41.35, -9.48, -34.80, -7.16],
            Region::Piaui => [-45.98, -10.91, -40.38, -2.74],
            Region::RioDeJaneiro => [-44.89, -23.37, -40.96, -20.76],
            Region::RioGrandeDoNorte => [-38.60, -6.98, -34.96, -4.83],
            Region::RioGrandeDoSul => [-57.65, -33.75, -49.69, -27.08],
            Region::Rondonia => [-66.74, -13.70, -59.78, -7.97],
            Region::Roraima => [-64.82, 1.16, -58.99, 5.27],
            Region::SantaCatarina => [-53.84, -29.35, -48.30, -25.96],
            Region::SaoPaulo => [-53.11, -25.31, -44.19, -19.79],
            Region::Sergipe => [-38.22, -11.57, -36.42, -9.49],
            Region::Tocantins => [-50.74, -13.47, -45.70, -5.17],
        }
    }
}

/// Returns every region whose envelope intersects the query box.
///
/// Two axis-aligned rectangles intersect unless one is strictly to the
/// left/right/above/below the other; touching edges count as intersecting.
/// An empty result means the box touches no state and is a valid outcome,
/// not an error.
pub fn regions_intersecting(bbox: &BoundingBox) -> Vec<Region> {
    ALL_REGIONS
        .iter()
        .copied()
        .filter(|region| envelope_intersects(bbox, &region.envelope()))
        .collect()
}

/// Inclusive half-plane disjointness test against a raw envelope.
fn envelope_intersects(bbox: &BoundingBox, envelope: &[f64; 4]) -> bool {
    !(bbox.x_max < envelope[0]
        || bbox.x_min > envelope[2]
        || bbox.y_max < envelope[1]
        || bbox.y_min > envelope[3])
}
