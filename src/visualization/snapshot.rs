//! Current-position dots, optionally refreshed once per second

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use chrono::Utc;
use std::time::Duration;

use super::config::MapConfig;
use super::map::{MapLabel, exit_on_key_system, window_projection};
use super::{LoadedCatalog, SharedPropagator};
use crate::tracks::{PositionSnapshot, sample_current_positions};

/// Snapshot currently on screen
#[derive(Resource)]
pub struct SnapshotView {
    pub snapshot: PositionSnapshot,
}

/// Re-sampling schedule for the animated mode
#[derive(Resource)]
pub struct AnimationClock {
    pub timer: Timer,
    pub remaining: u32,
}

impl AnimationClock {
    pub fn new(updates: u32) -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
            remaining: updates,
        }
    }

    /// Advance by `delta`; true when a refresh is due
    ///
    /// Fires at most once per call and never after `remaining` reaches zero,
    /// so the last snapshot stays on screen.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.timer.tick(delta);
        if !self.timer.just_finished() {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                refresh_snapshot_system.run_if(resource_exists::<AnimationClock>),
                draw_snapshot_system,
                update_snapshot_label_system,
                exit_on_key_system,
            ),
        );
    }
}

fn refresh_snapshot_system(
    time: Res<Time>,
    mut clock: ResMut<AnimationClock>,
    mut view: ResMut<SnapshotView>,
    catalog: Res<LoadedCatalog>,
    propagator: Res<SharedPropagator>,
) {
    // ticking alone is not a visible change
    if !clock.bypass_change_detection().advance(time.delta()) {
        return;
    }
    clock.set_changed();
    view.snapshot = sample_current_positions(&catalog.0, propagator.0.as_ref(), Utc::now());
    debug!(
        "Refreshed {} positions, {} updates left",
        view.snapshot.positions.len(),
        clock.remaining
    );
}

fn draw_snapshot_system(
    mut gizmos: Gizmos,
    view: Res<SnapshotView>,
    config: Res<MapConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(proj) = window_projection(&windows, &config) else {
        return;
    };
    for point in view.snapshot.points() {
        gizmos
            .circle_2d(proj.project(point), config.point_radius_px, config.point_color)
            .resolution(config.point_resolution);
    }
}

fn update_snapshot_label_system(
    view: Res<SnapshotView>,
    clock: Option<Res<AnimationClock>>,
    mut labels: Query<&mut Text, With<MapLabel>>,
) {
    let clock_changed = clock.as_ref().is_some_and(|c| c.is_changed());
    if !view.is_changed() && !clock_changed {
        return;
    }
    let mut label = snapshot_label(&view.snapshot);
    if let Some(clock) = clock {
        label.push_str(&format!("\n{} updates left", clock.remaining));
    }
    for mut text in labels.iter_mut() {
        text.0 = label.clone();
    }
}

fn snapshot_label(snapshot: &PositionSnapshot) -> String {
    let mut label = format!(
        "{} Starlink satellites at {}",
        snapshot.positions.len(),
        snapshot.at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !snapshot.failures.is_empty() {
        label.push_str(&format!(" ({} skipped)", snapshot.failures.len()));
    }
    label
}
