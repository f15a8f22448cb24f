//! Predicted ground tracks for the selected satellites
//!
//! Key presses are turned into [`SessionEvent`]s; the drawing systems only
//! read whatever selection the session currently holds.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;

use super::config::MapConfig;
use super::map::{MapLabel, key_name, window_projection};
use super::projection::split_at_antimeridian;
use super::{LoadedCatalog, SharedPropagator};
use crate::orbital::{Propagator, TimeWindow};
use crate::tle::Catalog;
use crate::tracks::{SelectionState, SessionEvent, TrackSession};

/// How each new track window is laid out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackWindowSettings {
    pub minutes: u32,
    pub align_hour: bool,
}

impl TrackWindowSettings {
    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        if self.align_hour {
            TimeWindow::aligned_to_hour(now, self.minutes)
        } else {
            TimeWindow::new(now, self.minutes)
        }
    }
}

#[derive(Resource)]
pub struct ActiveSession {
    pub session: TrackSession,
    pub settings: TrackWindowSettings,
}

#[derive(Resource)]
pub struct SelectionRng(pub StdRng);

pub struct GroundTrackPlugin;

impl Plugin for GroundTrackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                track_input_system,
                draw_tracks_system.after(track_input_system),
                update_track_legend_system.after(track_input_system),
            ),
        );
    }
}

fn track_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut active: ResMut<ActiveSession>,
    catalog: Res<LoadedCatalog>,
    propagator: Res<SharedPropagator>,
    mut rng: ResMut<SelectionRng>,
    mut exit: MessageWriter<AppExit>,
) {
    for key in keys.get_just_pressed() {
        // only real transitions count as changes for the legend
        let changed = apply_key(
            active.bypass_change_detection(),
            key,
            Utc::now(),
            &catalog.0,
            propagator.0.as_ref(),
            &mut rng.0,
        );
        if changed {
            active.set_changed();
        }
        if active.session.is_terminated() {
            info!("Track session terminated");
            exit.write(AppExit::Success);
            break;
        }
    }
}

/// Feed one key press to the session; true when its state changed
fn apply_key<P: Propagator + ?Sized, R: Rng>(
    active: &mut ActiveSession,
    key: &KeyCode,
    now: DateTime<Utc>,
    catalog: &Catalog,
    propagator: &P,
    rng: &mut R,
) -> bool {
    let event = SessionEvent::from_key_name(&key_name(key));
    let window = active.settings.window(now);
    match active
        .session
        .handle(event, catalog, propagator, &window, rng)
    {
        Ok(true) => {
            if let Some(names) = selection_names(catalog, active.session.selections()) {
                info!("Now tracking {}", names.join(", "));
            }
            true
        }
        Ok(false) => false,
        Err(err) => {
            warn!("Keeping current tracks: {err}");
            false
        }
    }
}

fn draw_tracks_system(
    mut gizmos: Gizmos,
    active: Res<ActiveSession>,
    config: Res<MapConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(proj) = window_projection(&windows, &config) else {
        return;
    };

    for (i, selection) in active.session.selections().iter().enumerate() {
        for segment in split_at_antimeridian(selection.track.points()) {
            gizmos.linestrip_2d(segment.iter().map(|p| proj.project(p)), config.track_color);
        }
        if let Some(current) = selection.track.current() {
            let color = config.palette_color(i);
            let center = proj.project(current);
            gizmos.circle_2d(center, config.marker_radius_px, color);
            gizmos.circle_2d(center, config.marker_radius_px * 0.5, color);
        }
    }
}

fn update_track_legend_system(
    active: Res<ActiveSession>,
    catalog: Res<LoadedCatalog>,
    mut labels: Query<&mut Text, With<MapLabel>>,
) {
    if !active.is_changed() {
        return;
    }
    let label = track_legend(&catalog.0, active.session.selections());
    for mut text in labels.iter_mut() {
        text.0 = label.clone();
    }
}

fn selection_names(catalog: &Catalog, selections: &[SelectionState]) -> Option<Vec<String>> {
    if selections.is_empty() {
        return None;
    }
    Some(
        selections
            .iter()
            .filter_map(|s| catalog.get(s.index).map(|r| r.label()))
            .collect(),
    )
}

/// One line per track, numbered like the marker colors
fn track_legend(catalog: &Catalog, selections: &[SelectionState]) -> String {
    let mut legend = String::from("R: new selection   Esc/Q: quit");
    for (i, selection) in selections.iter().enumerate() {
        let Some(record) = catalog.get(selection.index) else {
            continue;
        };
        let minutes = selection.track.len().saturating_sub(1);
        legend.push_str(&format!(
            "\nC{} {} ({} min from {})",
            i % 10,
            record.label(),
            minutes,
            selection.track.start().format("%H:%M UTC")
        ));
    }
    legend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::test_support::{FailingPropagator, LinearPropagator, synthetic_catalog};
    use crate::tracks::{SessionEvent, SessionState, predict_track};
    use chrono::{TimeZone, Timelike};
    use rand::SeedableRng;

    fn started_session(catalog: &Catalog, rng: &mut StdRng, count: usize) -> ActiveSession {
        let settings = TrackWindowSettings {
            minutes: 30,
            align_hour: false,
        };
        let mut session = TrackSession::new(count);
        session
            .handle(
                SessionEvent::Init,
                catalog,
                &LinearPropagator,
                &settings.window(Utc.with_ymd_and_hms(2024, 8, 13, 12, 0, 0).unwrap()),
                rng,
            )
            .unwrap();
        ActiveSession { session, settings }
    }

    #[test]
    fn test_window_settings() {
        let now = Utc.with_ymd_and_hms(2024, 8, 13, 12, 41, 17).unwrap();

        let plain = TrackWindowSettings {
            minutes: 90,
            align_hour: false,
        }
        .window(now);
        assert_eq!(plain.start(), now);
        assert_eq!(plain.sample_count(), 90);

        let aligned = TrackWindowSettings {
            minutes: 90,
            align_hour: true,
        }
        .window(now);
        assert_eq!(aligned.start().hour(), 12);
        assert_eq!(aligned.start().minute(), 0);
        assert_eq!(aligned.start().second(), 0);
    }

    #[test]
    fn test_track_legend_lists_selections() {
        let catalog = synthetic_catalog(6);
        let window = TimeWindow::new(Utc.with_ymd_and_hms(2024, 8, 13, 12, 0, 0).unwrap(), 61);
        let selections: Vec<_> = [4, 1]
            .iter()
            .map(|&index| SelectionState {
                index,
                track: predict_track(&catalog, &LinearPropagator, index, &window).unwrap(),
            })
            .collect();

        let legend = track_legend(&catalog, &selections);
        let lines: Vec<_> = legend.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "C0 TESTSAT-4 (60 min from 12:00 UTC)");
        assert_eq!(lines[2], "C1 TESTSAT-1 (60 min from 12:00 UTC)");

        assert_eq!(
            selection_names(&catalog, &selections),
            Some(vec!["TESTSAT-4".to_string(), "TESTSAT-1".to_string()])
        );
        assert_eq!(selection_names(&catalog, &[]), None);
    }

    #[test]
    fn test_apply_key_reports_only_real_transitions() {
        let catalog = synthetic_catalog(8);
        let mut rng = StdRng::seed_from_u64(11);
        let mut active = started_session(&catalog, &mut rng, 2);
        let now = Utc.with_ymd_and_hms(2024, 8, 13, 12, 5, 0).unwrap();
        let before = active.session.state().clone();

        assert!(!apply_key(&mut active, &KeyCode::KeyX, now, &catalog, &LinearPropagator, &mut rng));
        assert!(!apply_key(&mut active, &KeyCode::Space, now, &catalog, &LinearPropagator, &mut rng));
        assert_eq!(active.session.state(), &before);

        assert!(apply_key(&mut active, &KeyCode::KeyR, now, &catalog, &LinearPropagator, &mut rng));
        assert_eq!(active.session.selections().len(), 2);
        assert_eq!(active.session.selections()[0].track.start(), now);

        assert!(apply_key(&mut active, &KeyCode::Escape, now, &catalog, &LinearPropagator, &mut rng));
        assert!(active.session.is_terminated());
        assert!(!apply_key(&mut active, &KeyCode::KeyR, now, &catalog, &LinearPropagator, &mut rng));
    }

    #[test]
    fn test_apply_key_failed_resample_is_not_a_change() {
        let catalog = synthetic_catalog(1);
        let mut rng = StdRng::seed_from_u64(5);
        let mut active = started_session(&catalog, &mut rng, 1);
        let before = active.session.state().clone();
        let failing = FailingPropagator::for_norads(&[1000]);
        let now = Utc.with_ymd_and_hms(2024, 8, 13, 12, 5, 0).unwrap();

        assert!(!apply_key(&mut active, &KeyCode::KeyR, now, &catalog, &failing, &mut rng));
        assert_eq!(active.session.state(), &before);
    }

    #[derive(Resource, Default)]
    struct LegendChanges(Vec<bool>);

    fn record_legend_changes(active: Res<ActiveSession>, mut seen: ResMut<LegendChanges>) {
        seen.0.push(active.is_changed());
    }

    #[test]
    fn test_ignored_keys_leave_session_unchanged_for_the_legend() {
        let catalog = synthetic_catalog(6);
        let mut rng = StdRng::seed_from_u64(2);
        let active = started_session(&catalog, &mut rng, 1);
        assert!(matches!(active.session.state(), SessionState::Displaying(_)));

        let mut app = App::new();
        app.add_message::<AppExit>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<LegendChanges>()
            .insert_resource(LoadedCatalog(catalog))
            .insert_resource(SharedPropagator(Box::new(LinearPropagator)))
            .insert_resource(active)
            .insert_resource(SelectionRng(rng))
            .add_systems(
                Update,
                (track_input_system, record_legend_changes.after(track_input_system)),
            );

        app.update();
        press(&mut app, KeyCode::KeyX);
        app.update();
        press(&mut app, KeyCode::KeyR);
        app.update();

        assert_eq!(app.world().resource::<LegendChanges>().0, vec![true, false, true]);
        assert!(!app.world().resource::<ActiveSession>().session.is_terminated());

        press(&mut app, KeyCode::Escape);
        app.update();
        assert!(app.world().resource::<ActiveSession>().session.is_terminated());
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.clear();
        keys.release_all();
        keys.press(key);
    }
}
