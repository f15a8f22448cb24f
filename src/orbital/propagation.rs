//! Orbital propagation utilities

use crate::orbital::coordinates::{GeoPoint, ecef_to_geodetic, eci_to_ecef_km, gmst_rad};
use crate::tle::{Catalog, SatelliteRecord};
use bevy::math::DVec3;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Why a single position evaluation failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropagationFault {
    #[error("no usable orbital elements: {0}")]
    Elements(String),
    #[error("sgp4: {0}")]
    Sgp4(String),
    #[error("propagated position is not finite")]
    NonFinite,
}

/// Position-at-time capability consumed by the track sampler
pub trait Propagator {
    /// Geodetic longitude/latitude of `record` at `at`, in degrees
    fn geodetic_at(
        &self,
        record: &SatelliteRecord,
        at: DateTime<Utc>,
    ) -> Result<GeoPoint, PropagationFault>;
}

/// Calculate minutes since epoch for SGP4 propagation
pub fn minutes_since_epoch(sim_utc: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    let delta = sim_utc - epoch;
    delta.num_seconds() as f64 / 60.0 + (delta.subsec_nanos() as f64) / 60.0 / 1.0e9
}

/// Constants for one element set, remembered with the lines they came from
struct ElementSet {
    line1: String,
    line2: String,
    constants: Result<sgp4::Constants, String>,
}

/// SGP4 propagator with per-record constants built once per catalog
///
/// Records are grouped by NORAD id and told apart by their element lines, so
/// a catalog may carry several epochs of the same satellite.
pub struct Sgp4Propagator {
    constants: HashMap<u32, Vec<ElementSet>>,
}

impl Sgp4Propagator {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut constants: HashMap<u32, Vec<ElementSet>> = HashMap::with_capacity(catalog.len());
        let mut failed = 0usize;
        for record in catalog.iter() {
            let built = build_constants(record);
            if let Err(e) = &built {
                failed += 1;
                tracing::debug!("[SGP4] norad={} elements error: {}", record.norad, e);
            }
            constants
                .entry(record.norad)
                .or_insert_with(Vec::new)
                .push(ElementSet {
                    line1: record.line1.clone(),
                    line2: record.line2.clone(),
                    constants: built,
                });
        }
        if failed > 0 {
            tracing::warn!(
                "[SGP4] {} of {} satellites have unusable elements",
                failed,
                catalog.len()
            );
        }
        Self { constants }
    }
}

// Build SGP4 model: parse TLE -> Elements -> Constants
fn build_constants(record: &SatelliteRecord) -> Result<sgp4::Constants, String> {
    let elements = sgp4::Elements::from_tle(
        record.name.clone(),
        record.line1.as_bytes(),
        record.line2.as_bytes(),
    )
    .map_err(|e| e.to_string())?;
    sgp4::Constants::from_elements(&elements).map_err(|e| e.to_string())
}

impl Propagator for Sgp4Propagator {
    fn geodetic_at(
        &self,
        record: &SatelliteRecord,
        at: DateTime<Utc>,
    ) -> Result<GeoPoint, PropagationFault> {
        let set = self.constants.get(&record.norad).and_then(|sets| {
            sets.iter()
                .find(|set| set.line1 == record.line1 && set.line2 == record.line2)
        });
        let constants = match set.map(|set| &set.constants) {
            Some(Ok(constants)) => constants,
            Some(Err(e)) => return Err(PropagationFault::Elements(e.clone())),
            None => {
                return Err(PropagationFault::Elements(format!(
                    "NORAD {} is not part of the loaded catalog",
                    record.norad
                )));
            }
        };

        let mins = minutes_since_epoch(at, record.epoch_utc);
        let state = constants
            .propagate(sgp4::MinutesSinceEpoch(mins))
            .map_err(|e| PropagationFault::Sgp4(e.to_string()))?;
        // [f64; 3] in km (TEME)
        let eci = DVec3::new(state.position[0], state.position[1], state.position[2]);
        if !eci.is_finite() {
            return Err(PropagationFault::NonFinite);
        }
        let point = ecef_to_geodetic(eci_to_ecef_km(eci, gmst_rad(at)));
        if !point.is_finite() {
            return Err(PropagationFault::NonFinite);
        }
        Ok(point)
    }
}
