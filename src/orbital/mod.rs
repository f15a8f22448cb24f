//! Orbital mechanics module
//!
//! This module handles SGP4 propagation, TEME/ECEF/geodetic transformations,
//! and the time windows tracks are sampled over.

pub mod coordinates;
pub mod propagation;
pub mod time;

pub use coordinates::GeoPoint;
pub use propagation::{PropagationFault, Propagator, Sgp4Propagator};
pub use time::TimeWindow;
