//! ParcelFed - Federated query engine for certified rural property records
//!
//! This library queries two independently operated geospatial feature servers
//! (the INCRA per-state acervo fundiário and the GeoOne national GeoServer),
//! reconciles their incompatible attribute schemas into one canonical record
//! shape, and assembles the result as GeoJSON plus derived metadata.
//!
//! # High-Level API
//!
//! For most use cases, the [`federation`] module provides the full pipeline:
//!
//! ```ignore
//! use parcelfed::federation::FederationService;
//! use parcelfed::layer::LayerType;
//! use parcelfed::federation::ServerMode;
//! use parcelfed::settings::Settings;
//!
//! let service = FederationService::from_settings(&Settings::default())?;
//! let result = service
//!     .query_bounds(
//!         (-47.5, -15.9, -47.3, -15.7),
//!         Some(LayerType::CertifiedPrivate),
//!         ServerMode::Auto,
//!         1000,
//!     )
//!     .await;
//! ```

pub mod bbox;
pub mod federation;
pub mod layer;
pub mod logging;
pub mod municipality;
pub mod normalize;
pub mod provider;
pub mod region;
pub mod result;
pub mod settings;

/// Version of the ParcelFed library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
