//! Track sampling module
//!
//! Satellite selection, position/track sampling and the interactive
//! session state machine that drives re-selection.

pub mod sampler;
pub mod session;

pub use sampler::{
    PositionSnapshot, SampledPosition, SelectionState, Track, predict_track, resample,
    sample_current_positions, select_random, select_tracks,
};
pub use session::{SessionEvent, SessionState, TrackSession};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::orbital::propagation::minutes_since_epoch;
    use crate::orbital::{GeoPoint, PropagationFault, Propagator};
    use crate::tle::{Catalog, SatelliteRecord};
    use chrono::{DateTime, TimeZone, Utc};

    /// `n` records with NORAD ids 1000.. and a shared epoch; lines are never parsed
    pub fn synthetic_catalog(n: usize) -> Catalog {
        let epoch = Utc.with_ymd_and_hms(2024, 8, 13, 0, 0, 0).unwrap();
        let records = (0..n)
            .map(|i| SatelliteRecord {
                norad: 1000 + i as u32,
                name: Some(format!("TESTSAT-{i}")),
                line1: String::new(),
                line2: String::new(),
                epoch_utc: epoch,
            })
            .collect();
        Catalog::new("synthetic", records).expect("non-empty synthetic catalog")
    }

    /// Deterministic stand-in for SGP4: longitude drifts 4 deg/min, latitude oscillates
    pub struct LinearPropagator;

    impl LinearPropagator {
        pub fn point(&self, record: &SatelliteRecord, at: DateTime<Utc>) -> GeoPoint {
            let mins = minutes_since_epoch(at, record.epoch_utc);
            GeoPoint::new(
                record.norad as f64 * 7.0 + mins * 4.0,
                53.0 * (mins / 15.0 + record.norad as f64).sin(),
            )
        }
    }

    impl Propagator for LinearPropagator {
        fn geodetic_at(
            &self,
            record: &SatelliteRecord,
            at: DateTime<Utc>,
        ) -> Result<GeoPoint, PropagationFault> {
            Ok(self.point(record, at))
        }
    }

    /// Fails for the listed NORAD ids, behaves like `LinearPropagator` otherwise
    pub struct FailingPropagator {
        norads: Vec<u32>,
    }

    impl FailingPropagator {
        pub fn for_norads(norads: &[u32]) -> Self {
            Self {
                norads: norads.to_vec(),
            }
        }
    }

    impl Propagator for FailingPropagator {
        fn geodetic_at(
            &self,
            record: &SatelliteRecord,
            at: DateTime<Utc>,
        ) -> Result<GeoPoint, PropagationFault> {
            if self.norads.contains(&record.norad) {
                Err(PropagationFault::Sgp4("satellite decayed".to_string()))
            } else {
                LinearPropagator.geodetic_at(record, at)
            }
        }
    }
}
