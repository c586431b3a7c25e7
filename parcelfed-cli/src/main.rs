//! ParcelFed CLI - Command-line interface
//!
//! This binary provides a command-line interface to the ParcelFed library:
//! it runs one federated query for a bounding box and either prints the
//! result to stdout or saves it as a GeoJSON document.

use chrono::Local;
use clap::{Parser, ValueEnum};
use parcelfed::federation::{FederationService, ServerMode};
use parcelfed::layer::LayerType;
use parcelfed::logging::{default_log_dir, default_log_file, init_logging};
use parcelfed::result::QueryResult;
use parcelfed::settings::Settings;
use std::process;
use tracing::info;

#[derive(Debug, Clone, ValueEnum)]
enum LayerArg {
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
    Quilombola,
    /// Properties pending titling
    PendingTitling,
}

impl From<LayerArg> for LayerType {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::CertifiedPrivate => LayerType::CertifiedPrivate,
            LayerArg::CertifiedPublic => LayerType::CertifiedPublic,
            LayerArg::SurveyPrivate => LayerType::SurveyPrivate,
            LayerArg::SurveyPublic => LayerType::SurveyPublic,
            LayerArg::Settlements => LayerType::Settlements,
            LayerArg::Quilombola => LayerType::QuilombolaTerritories,
            LayerArg::PendingTitling => LayerType::PendingTitling,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum ServerArg {
    /// Per-state server only
    Regional,
    /// National server only
    National,
    /// Regional first with national fallback; all layers when no layer given
    Auto,
}

impl From<ServerArg> for ServerMode {
    fn from(arg: ServerArg) -> Self {
        match arg {
            ServerArg::Regional => ServerMode::Regional,
            ServerArg::National => ServerMode::National,
            ServerArg::Auto => ServerMode::Auto,
        }
    }
}

#[derive(Parser)]
#[command(name = "parcelfed")]
#[command(about = "Query certified rural property records by bounding box", long_about = None)]
struct Args {
    /// Bounding box as x_min,y_min,x_max,y_max (WGS84 degrees)
    #[arg(long)]
    bbox: String,

    /// Layer to query (omit with --server auto to sweep every layer)
    #[arg(long, value_enum)]
    layer: Option<LayerArg>,

    /// Which provider to query
    #[arg(long, value_enum, default_value = "auto")]
    server: ServerArg,

    /// Maximum number of returned records (1-10000)
    #[arg(long, default_value = "1000")]
    limit: usize,

    /// Save the result as a GeoJSON file instead of printing it
    #[arg(long)]
    save: bool,

    /// Output path for --save (default: consulta_YYYYMMDD_HHMMSS.geojson)
    #[arg(long)]
    output: Option<String>,
}

fn parse_bounds(raw: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x_min, y_min, x_max, y_max] => Some((*x_min, *y_min, *x_max, *y_max)),
        _ => None,
    }
}

/// GeoJSON document written by --save: the raw feature collection plus a
/// metadata block describing the query that produced it.
fn to_geojson_document(result: &QueryResult) -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": result.features,
        "metadata": {
            "total": result.total,
            "layer": result.layer,
            "provider": result.provider,
            "bbox": {
                "x_min": result.bbox[0],
                "y_min": result.bbox[1],
                "x_max": result.bbox[2],
                "y_max": result.bbox[3],
            },
        },
    })
}

fn default_filename() -> String {
    format!("consulta_{}.geojson", Local::now().format("%Y%m%d_%H%M%S"))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let bounds = match parse_bounds(&args.bbox) {
        Some(bounds) => bounds,
        None => {
            eprintln!("Error: --bbox must be four comma-separated numbers (x_min,y_min,x_max,y_max)");
            process::exit(1);
        }
    };

    let service = match FederationService::from_settings(&Settings::default()) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: failed to build HTTP clients: {}", e);
            process::exit(1);
        }
    };

    let result = service
        .query_bounds(
            bounds,
            args.layer.map(LayerType::from),
            args.server.into(),
            args.limit,
        )
        .await;

    info!(
        success = result.success,
        total = result.total,
        provider = %result.provider,
        elapsed_ms = result.elapsed_ms,
        "query finished"
    );

    if args.save {
        let path = args.output.unwrap_or_else(default_filename);
        let document = to_geojson_document(&result);
        let serialized = match serde_json::to_string_pretty(&document) {
            Ok(serialized) => serialized,
            Err(e) => {
                eprintln!("Error: failed to serialize GeoJSON: {}", e);
                process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&path, serialized) {
            eprintln!("Error: failed to write {}: {}", path, e);
            process::exit(1);
        }
        println!("{} ({} records)", path, result.total);
    } else {
        match serde_json::to_string_pretty(&result) {
            Ok(serialized) => println!("{}", serialized),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                process::exit(1);
            }
        }
    }

    if !result.success {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        assert_eq!(
            parse_bounds("-47.5,-15.9,-47.3,-15.7"),
            Some((-47.5, -15.9, -47.3, -15.7))
        );
        assert_eq!(
            parse_bounds(" -47.5, -15.9, -47.3, -15.7 "),
            Some((-47.5, -15.9, -47.3, -15.7))
        );
    }

    #[test]
    fn test_parse_bounds_rejects_bad_input() {
        assert_eq!(parse_bounds("-47.5,-15.9,-47.3"), None);
        assert_eq!(parse_bounds("a,b,c,d"), None);
        assert_eq!(parse_bounds(""), None);
    }

    #[test]
    fn test_default_filename_shape() {
        let name = default_filename();
        assert!(name.starts_with("consulta_"));
        assert!(name.ends_with(".geojson"));
    }
}
