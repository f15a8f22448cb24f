//! Visualization module
//!
//! Flat world map rendered with Bevy gizmos: current-position dots for the
//! snapshot modes and predicted ground tracks for the track mode.

use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use crate::orbital::{Propagator, Sgp4Propagator};
use crate::tle::Catalog;
use crate::tracks::{PositionSnapshot, TrackSession};

pub mod config;
pub mod ground_tracks;
pub mod map;
pub mod projection;
pub mod snapshot;

pub use config::MapConfig;
pub use ground_tracks::{ActiveSession, GroundTrackPlugin, SelectionRng, TrackWindowSettings};
pub use map::MapPlugin;
pub use snapshot::{AnimationClock, SnapshotPlugin, SnapshotView};

/// Catalog shared by every view
#[derive(Resource)]
pub struct LoadedCatalog(pub Catalog);

/// Propagator shared by every view
#[derive(Resource)]
pub struct SharedPropagator(pub Box<dyn Propagator + Send + Sync>);

fn base_app(title: &str, map: MapConfig, catalog: Catalog, propagator: Sgp4Propagator) -> App {
    let mut app = App::new();
    // tracing is set up by main; Bevy's LogPlugin would install a second subscriber
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: title.to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .disable::<bevy::log::LogPlugin>(),
    );

    #[cfg(feature = "dev")]
    app.add_plugins(bevy::dev_tools::fps_overlay::FpsOverlayPlugin::default());

    app.insert_resource(map)
        .insert_resource(LoadedCatalog(catalog))
        .insert_resource(SharedPropagator(Box::new(propagator)))
        .add_plugins(MapPlugin);
    app
}

/// Show one snapshot, re-sampled once per second for `updates` seconds when given
pub fn run_snapshot(
    map: MapConfig,
    catalog: Catalog,
    propagator: Sgp4Propagator,
    snapshot: PositionSnapshot,
    updates: Option<u32>,
) -> AppExit {
    let mut app = base_app("Starlink positions", map, catalog, propagator);
    app.insert_resource(SnapshotView { snapshot });
    if let Some(updates) = updates {
        app.insert_resource(AnimationClock::new(updates));
    }
    app.add_plugins(SnapshotPlugin);
    app.run()
}

/// Show the tracks of an already initialised session until it terminates
pub fn run_tracks(
    map: MapConfig,
    catalog: Catalog,
    propagator: Sgp4Propagator,
    session: TrackSession,
    settings: TrackWindowSettings,
    rng: SelectionRng,
) -> AppExit {
    let mut app = base_app("Starlink ground tracks", map, catalog, propagator);
    app.insert_resource(ActiveSession { session, settings })
        .insert_resource(rng)
        .add_plugins(GroundTrackPlugin);
    app.run()
}
