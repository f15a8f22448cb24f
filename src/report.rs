//! JSON reports for headless runs

use crate::tle::Catalog;
use crate::tracks::{PositionSnapshot, SelectionState};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct SatellitePosition {
    pub norad: u32,
    pub name: String,
    pub lon_deg: f64,
    pub lat_deg: f64,
}

#[derive(Serialize, Debug)]
pub struct SnapshotReport {
    pub at: DateTime<Utc>,
    pub satellites: Vec<SatellitePosition>,
    pub skipped: usize,
}

#[derive(Serialize, Debug)]
pub struct TrackReport {
    pub norad: u32,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step_minutes: u32,
    /// `[lon, lat]` pairs in degrees
    pub points: Vec<[f64; 2]>,
}

impl SnapshotReport {
    pub fn new(catalog: &Catalog, snapshot: &PositionSnapshot) -> Self {
        let satellites = snapshot
            .positions
            .iter()
            .filter_map(|p| {
                catalog.get(p.index).map(|record| SatellitePosition {
                    norad: record.norad,
                    name: record.label(),
                    lon_deg: p.point.lon_deg,
                    lat_deg: p.point.lat_deg,
                })
            })
            .collect();
        Self {
            at: snapshot.at,
            satellites,
            skipped: snapshot.failures.len(),
        }
    }
}

pub fn track_reports(catalog: &Catalog, selections: &[SelectionState]) -> Vec<TrackReport> {
    selections
        .iter()
        .filter(|s| !s.track.is_empty())
        .filter_map(|s| {
            let record = catalog.get(s.index)?;
            Some(TrackReport {
                norad: record.norad,
                name: record.label(),
                start: s.track.start(),
                end: s.track.instant(s.track.len() - 1),
                step_minutes: 1,
                points: s
                    .track
                    .points()
                    .iter()
                    .map(|p| [p.lon_deg, p.lat_deg])
                    .collect(),
            })
        })
        .collect()
}
