//! TLE (Two-Line Element) data management module
//!
//! This module handles catalog fetching, parsing, and data structures for satellite
//! orbital elements from external sources like Celestrak or a local TLE file.

use crate::error::{Result, TrackError};
use std::time::Duration;

pub mod fetcher;
#[cfg(test)]
pub mod mock_data;
pub mod parser;
pub mod types;

pub use fetcher::{CatalogSource, STARLINK_TLE_URL, fetch_catalog_text};
pub use parser::{parse_tle_catalog, parse_tle_epoch_to_utc};
pub use types::{Catalog, SatelliteRecord};

/// Load a catalog from a source string, failing with `CatalogUnavailable`
///
/// The catalog is loaded once per run and handed to the sampler; nothing
/// downstream fetches again.
pub fn load_catalog(source: &str, timeout: Duration) -> Result<Catalog> {
    let source = CatalogSource::parse(source);
    let origin = source.describe();
    let body = fetch_catalog_text(&source, timeout).map_err(|e| TrackError::CatalogUnavailable {
        origin: origin.clone(),
        reason: format!("{e:#}"),
    })?;
    catalog_from_text(origin, &body)
}

/// Parse an already-fetched TLE body into a catalog
pub fn catalog_from_text(origin: impl Into<String>, body: &str) -> Result<Catalog> {
    let parsed = parse_tle_catalog(body);
    if parsed.rejected > 0 {
        tracing::warn!("[TLE PARSED] rejected {} malformed TLE block(s)", parsed.rejected);
    }
    let catalog = Catalog::with_rejected(origin, parsed.records, parsed.rejected)?;
    tracing::info!(
        "Loaded {} satellites from {}",
        catalog.len(),
        catalog.origin()
    );
    Ok(catalog)
}
