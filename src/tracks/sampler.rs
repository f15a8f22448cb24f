//! Satellite selection and track sampling
//!
//! Every operation takes an already-loaded [`Catalog`] and a [`Propagator`];
//! nothing here fetches data. Indices always refer to the catalog's order.
//!
//! Failure policy: a batch of current positions skips satellites whose
//! propagation fails and reports them in [`PositionSnapshot::failures`]
//! (plus one warning with the count). A track fails as a whole on the first
//! bad sample, so partial tracks never exist.

use crate::error::{Result, TrackError};
use crate::orbital::{GeoPoint, Propagator, TimeWindow};
use crate::tle::Catalog;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Time-ordered geodetic path, one point per minute starting at `start`
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    start: DateTime<Utc>,
    points: Vec<GeoPoint>,
}

impl Track {
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position at the window start
    pub fn current(&self) -> Option<&GeoPoint> {
        self.points.first()
    }

    pub fn instant(&self, i: usize) -> DateTime<Utc> {
        self.start + Duration::minutes(i as i64)
    }
}

/// A selected catalog index and the track computed for it
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionState {
    pub index: usize,
    pub track: Track,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledPosition {
    pub index: usize,
    pub point: GeoPoint,
}

/// Positions of a whole catalog at one instant
#[derive(Clone, Debug)]
pub struct PositionSnapshot {
    pub at: DateTime<Utc>,
    /// Successfully evaluated satellites, in catalog order
    pub positions: Vec<SampledPosition>,
    /// One `TrackError::Propagation` per skipped satellite
    pub failures: Vec<TrackError>,
}

impl PositionSnapshot {
    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
        self.positions.iter().map(|p| &p.point)
    }
}

fn evaluate<P: Propagator + ?Sized>(
    catalog: &Catalog,
    propagator: &P,
    index: usize,
    at: DateTime<Utc>,
) -> Result<GeoPoint> {
    let record = catalog.get(index).ok_or(TrackError::InvalidIndex {
        index,
        len: catalog.len(),
    })?;
    propagator
        .geodetic_at(record, at)
        .map_err(|fault| TrackError::Propagation {
            index,
            norad: record.norad,
            name: record.label(),
            at,
            reason: fault.to_string(),
        })
}

/// Evaluate every satellite in the catalog at `at`
pub fn sample_current_positions<P: Propagator + ?Sized>(
    catalog: &Catalog,
    propagator: &P,
    at: DateTime<Utc>,
) -> PositionSnapshot {
    let mut positions = Vec::with_capacity(catalog.len());
    let mut failures = Vec::new();
    for index in 0..catalog.len() {
        match evaluate(catalog, propagator, index, at) {
            Ok(point) => positions.push(SampledPosition { index, point }),
            Err(e) => {
                tracing::debug!("skipping satellite: {}", e);
                failures.push(e);
            }
        }
    }
    if !failures.is_empty() {
        tracing::warn!(
            "skipped {} of {} satellites whose position could not be evaluated",
            failures.len(),
            catalog.len()
        );
    }
    PositionSnapshot {
        at,
        positions,
        failures,
    }
}

/// Choose `count` distinct indices uniformly at random, without replacement
pub fn select_random<R: Rng>(catalog: &Catalog, count: usize, rng: &mut R) -> Result<Vec<usize>> {
    if count == 0 || count > catalog.len() {
        return Err(TrackError::InvalidSelectionCount {
            requested: count,
            available: catalog.len(),
        });
    }
    Ok(rand::seq::index::sample(rng, catalog.len(), count).into_vec())
}

/// Evaluate satellite `index` at every instant of `window`
pub fn predict_track<P: Propagator + ?Sized>(
    catalog: &Catalog,
    propagator: &P,
    index: usize,
    window: &TimeWindow,
) -> Result<Track> {
    if index >= catalog.len() {
        return Err(TrackError::InvalidIndex {
            index,
            len: catalog.len(),
        });
    }
    if window.sample_count() == 0 {
        return Err(TrackError::InvalidWindow {
            sample_count: window.sample_count(),
        });
    }
    let points = window
        .instants()
        .map(|at| evaluate(catalog, propagator, index, at))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(
        "predicted {} points for index {} until {:?}",
        points.len(),
        index,
        window.end()
    );
    Ok(Track {
        start: window.start(),
        points,
    })
}

/// Pick a fresh random satellite (the previous one may come up again) and compute its track
pub fn resample<P: Propagator + ?Sized, R: Rng>(
    catalog: &Catalog,
    propagator: &P,
    previous: &SelectionState,
    window: &TimeWindow,
    rng: &mut R,
) -> Result<SelectionState> {
    let index = rng.gen_range(0..catalog.len());
    let track = predict_track(catalog, propagator, index, window)?;
    tracing::debug!("resampled index {} -> {}", previous.index, index);
    Ok(SelectionState { index, track })
}

/// `select_random` followed by `predict_track` for each chosen index
pub fn select_tracks<P: Propagator + ?Sized, R: Rng>(
    catalog: &Catalog,
    propagator: &P,
    count: usize,
    window: &TimeWindow,
    rng: &mut R,
) -> Result<Vec<SelectionState>> {
    select_random(catalog, count, rng)?
        .into_iter()
        .map(|index| {
            predict_track(catalog, propagator, index, window)
                .map(|track| SelectionState { index, track })
        })
        .collect()
}
