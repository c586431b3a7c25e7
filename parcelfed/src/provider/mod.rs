//! Upstream feature-server clients
//!
//! Two WFS providers publish the certified records: the regional server
//! (one layer per state, WFS 1.1.0) and the national server (country-wide
//! layers, WFS 2.0.0). Both are queried through an [`AsyncHttpClient`]
//! abstraction so tests can substitute a mock transport.

mod http;
mod national;
mod regional;
mod types;

pub use http::{AsyncHttpClient, HttpBody, ReqwestClient};
pub use national::NationalWfs;
pub use regional::RegionalWfs;
pub use types::{ProviderError, RawFeature};

#[cfg(test)]
pub use http::tests::MockHttpClient;
