//! Satellite record and catalog types

use crate::error::{Result, TrackError};
use chrono::{DateTime, Utc};

/// One satellite's orbital elements as published in TLE form
#[derive(Clone, Debug, PartialEq)]
pub struct SatelliteRecord {
    pub norad: u32,
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
}

impl SatelliteRecord {
    /// Display name, falling back to the NORAD number
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", self.norad))
    }
}

/// Ordered, non-empty collection of satellite records loaded from one source
#[derive(Debug)]
pub struct Catalog {
    origin: String,
    records: Vec<SatelliteRecord>,
    rejected: usize,
}

impl Catalog {
    /// Build a catalog, refusing an empty record list
    pub fn new(origin: impl Into<String>, records: Vec<SatelliteRecord>) -> Result<Self> {
        Self::with_rejected(origin, records, 0)
    }

    /// Build a catalog and remember how many TLE blocks were dropped while parsing
    pub fn with_rejected(
        origin: impl Into<String>,
        records: Vec<SatelliteRecord>,
        rejected: usize,
    ) -> Result<Self> {
        let origin = origin.into();
        if records.is_empty() {
            return Err(TrackError::CatalogUnavailable {
                reason: format!("no satellite records found ({} rejected)", rejected),
                origin,
            });
        }
        Ok(Self {
            origin,
            records,
            rejected,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SatelliteRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SatelliteRecord> {
        self.records.iter()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(norad: u32, name: Option<&str>) -> SatelliteRecord {
        SatelliteRecord {
            norad,
            name: name.map(str::to_string),
            line1: String::new(),
            line2: String::new(),
            epoch_utc: Utc.with_ymd_and_hms(2024, 8, 13, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_catalog_is_unavailable() {
        let err = Catalog::with_rejected("memory", Vec::new(), 3).unwrap_err();
        match err {
            TrackError::CatalogUnavailable { origin, reason } => {
                assert_eq!(origin, "memory");
                assert!(reason.contains("3 rejected"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = Catalog::new(
            "memory",
            vec![record(3, Some("C")), record(1, Some("A")), record(2, None)],
        )
        .unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        let ids: Vec<u32> = catalog.iter().map(|r| r.norad).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(catalog.get(2).unwrap().label(), "NORAD 2");
        assert!(catalog.get(3).is_none());
    }
}
