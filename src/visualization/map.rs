//! World map backdrop: camera, graticule and the on-screen legend

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::config::MapConfig;
use super::projection::MapProjection;

/// Marker for the legend text node in the top-left corner
#[derive(Component)]
pub struct MapLabel;

/// Marker for the world image sprite behind the gizmos
#[derive(Component)]
pub struct Basemap;

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapConfig>()
            .add_systems(Startup, setup_map)
            .add_systems(
                Update,
                (
                    basemap_fallback_system,
                    fit_basemap_system,
                    draw_graticule_system,
                ),
            );
    }
}

fn setup_map(mut commands: Commands, config: Res<MapConfig>, asset_server: Res<AssetServer>) {
    commands.insert_resource(ClearColor(config.background));
    commands.spawn(Camera2d);
    if let Some(path) = &config.basemap {
        info!("Loading basemap {path}");
        commands.spawn((
            Sprite {
                image: asset_server.load(path.clone()),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, -10.0),
            Basemap,
        ));
    }
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        MapLabel,
    ));
}

/// Projection fitted to the primary window, if there is one
pub fn window_projection(
    windows: &Query<&Window, With<PrimaryWindow>>,
    config: &MapConfig,
) -> Option<MapProjection> {
    let window = windows.single().ok()?;
    Some(MapProjection::fit(
        window.width(),
        window.height(),
        config.margin_px,
    ))
}

/// Drop the basemap sprite when its image cannot be loaded
fn basemap_fallback_system(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    basemaps: Query<(Entity, &Sprite), With<Basemap>>,
) {
    for (entity, sprite) in &basemaps {
        if let LoadState::Failed(err) = asset_server.load_state(sprite.image.id()) {
            warn!("Basemap unavailable, drawing the graticule only: {err}");
            commands.entity(entity).despawn();
        }
    }
}

fn fit_basemap_system(
    config: Res<MapConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut basemaps: Query<&mut Sprite, With<Basemap>>,
) {
    let Some(proj) = window_projection(&windows, &config) else {
        return;
    };
    for mut sprite in &mut basemaps {
        fit_basemap(&mut sprite, &proj);
    }
}

/// Stretch the world image over the projected map extent
pub fn fit_basemap(sprite: &mut Sprite, proj: &MapProjection) {
    let size = proj.size();
    if sprite.custom_size != Some(size) {
        sprite.custom_size = Some(size);
    }
}

fn draw_graticule_system(
    mut gizmos: Gizmos,
    config: Res<MapConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(proj) = window_projection(&windows, &config) else {
        return;
    };
    let step = config.graticule_step_deg.max(1) as usize;

    for lon in (-180..=180).step_by(step) {
        gizmos.line_2d(
            proj.project_deg(lon as f64, -90.0),
            proj.project_deg(lon as f64, 90.0),
            config.graticule_color,
        );
    }
    for lat in (-90..=90).step_by(step) {
        let color = if lat == 0 {
            config.equator_color
        } else {
            config.graticule_color
        };
        gizmos.line_2d(
            proj.project_deg(-180.0, lat as f64),
            proj.project_deg(180.0, lat as f64),
            color,
        );
    }
    gizmos.rect_2d(Isometry2d::IDENTITY, proj.size(), config.frame_color);
}

/// Lower-case key name as understood by `SessionEvent::from_key_name`
pub fn key_name(key: &KeyCode) -> String {
    let debug = format!("{key:?}");
    match debug.strip_prefix("Key") {
        Some(letter) if letter.len() == 1 => letter.to_ascii_lowercase(),
        _ => debug.to_ascii_lowercase(),
    }
}

/// Exit on Escape or Q
pub fn exit_on_key_system(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyQ]) {
        info!("Exit requested from keyboard");
        exit.write(AppExit::Success);
    }
}
