//! Plate carrée projection for the 2D map
//!
//! Longitude maps linearly to x and latitude to y, centred on (0, 0) in
//! screen pixels so a 2D camera at the origin sees the whole map.

use crate::orbital::GeoPoint;
use bevy::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapProjection {
    /// Pixels per degree
    pub scale: f32,
}

impl MapProjection {
    /// Largest scale that fits the whole map inside a `width` x `height` viewport
    pub fn fit(width: f32, height: f32, margin_px: f32) -> Self {
        let usable_w = (width - 2.0 * margin_px).max(1.0);
        let usable_h = (height - 2.0 * margin_px).max(1.0);
        Self {
            scale: (usable_w / 360.0).min(usable_h / 180.0),
        }
    }

    pub fn project_deg(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        Vec2::new(lon_deg as f32 * self.scale, lat_deg as f32 * self.scale)
    }

    pub fn project(&self, point: &GeoPoint) -> Vec2 {
        self.project_deg(point.lon_deg, point.lat_deg)
    }

    /// Full map extent in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::new(360.0 * self.scale, 180.0 * self.scale)
    }
}

/// Split a path wherever it crosses the ±180° meridian
///
/// Each crossing ends one segment on the map edge and starts the next one on
/// the opposite edge, at the interpolated crossing latitude.
pub fn split_at_antimeridian(points: &[GeoPoint]) -> Vec<Vec<GeoPoint>> {
    let mut segments = Vec::new();
    let Some(first) = points.first() else {
        return segments;
    };
    let mut current = vec![*first];

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let delta = b.lon_deg - a.lon_deg;
        if delta.abs() > 180.0 {
            // eastward crossing goes out at +180, westward at -180
            let (edge, unwrapped) = if delta < 0.0 {
                (180.0, b.lon_deg + 360.0)
            } else {
                (-180.0, b.lon_deg - 360.0)
            };
            let t = (edge - a.lon_deg) / (unwrapped - a.lon_deg);
            let lat = a.lat_deg + t * (b.lat_deg - a.lat_deg);
            current.push(GeoPoint {
                lon_deg: edge,
                lat_deg: lat,
            });
            segments.push(std::mem::take(&mut current));
            current.push(GeoPoint {
                lon_deg: -edge,
                lat_deg: lat,
            });
        }
        current.push(b);
    }
    segments.push(current);
    segments
}
