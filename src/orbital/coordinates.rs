//! Coordinate transformation utilities for orbital mechanics

use bevy::math::DVec3;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

/// WGS84 equatorial radius in km
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Geodetic longitude/latitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon_deg: normalize_longitude_deg(lon_deg),
            lat_deg: lat_deg.clamp(-90.0, 90.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

/// Wrap a longitude into [-180, 180)
pub fn normalize_longitude_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Compute the Julian Date (UTC) for a given timestamp.
/// Uses the standard Gregorian calendar to JD conversion.
pub fn julian_date_utc(t: DateTime<Utc>) -> f64 {
    let mut y = t.year();
    let mut m = t.month() as i32;
    let d = t.day() as i32;

    let sec = t.second() as f64 + (t.nanosecond() as f64) * 1e-9_f64;
    let day_fraction = (t.hour() as f64 + (t.minute() as f64 + sec / 60.0) / 60.0) / 24.0;

    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let jd0 = (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * ((m + 1) as f64)).floor()
        + d as f64
        + b
        - 1524.5;

    jd0 + day_fraction
}

/// Greenwich Mean Sidereal Time (radians), IAU 1982 polynomial.
/// Assumes UT1 ~= UTC, which is well below map resolution.
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let t_cent = (julian_date_utc(t) - 2451545.0) / 36525.0;

    let gmst_sec =
        67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t_cent + 0.093104 * t_cent * t_cent
            - 6.2e-6 * t_cent * t_cent * t_cent;

    let sec_in_day = 86400.0_f64;
    gmst_sec.rem_euclid(sec_in_day) * (std::f64::consts::TAU / sec_in_day)
}

/// Rotate ECI (TEME) -> ECEF by -GMST about Z
pub fn eci_to_ecef_km(eci: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    DVec3::new(x, y, eci.z)
}

/// ECEF (km) to WGS84 geodetic longitude/latitude, iterating on latitude
pub fn ecef_to_geodetic(ecef: DVec3) -> GeoPoint {
    let e2 = 2.0 * WGS84_F - WGS84_F * WGS84_F;
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let lon = ecef.y.atan2(ecef.x);

    let mut lat = ecef.z.atan2(p * (1.0 - e2));
    for _ in 0..10 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (ecef.z + e2 * n * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-12 {
            lat = next;
            break;
        }
        lat = next;
    }

    GeoPoint::new(lon.to_degrees(), lat.to_degrees())
}
