//! Visualization configuration

use bevy::prelude::*;

/// World image looked up in the asset folder when none is given
pub const DEFAULT_BASEMAP: &str = "world.png";

/// Map rendering configuration resource
#[derive(Resource)]
pub struct MapConfig {
    /// Equirectangular world image under the map, relative to the asset folder
    pub basemap: Option<String>,
    pub background: Color,
    pub frame_color: Color,
    pub graticule_color: Color,
    pub equator_color: Color,
    /// Degrees between graticule lines
    pub graticule_step_deg: u32,
    pub margin_px: f32,
    pub point_color: Color,
    pub point_radius_px: f32,
    pub point_resolution: u32,
    pub track_color: Color,
    pub marker_radius_px: f32,
    /// Marker colors, cycled per selected satellite
    pub palette: Vec<Color>,
}

impl MapConfig {
    pub fn palette_color(&self, i: usize) -> Color {
        if self.palette.is_empty() {
            return self.track_color;
        }
        self.palette[i % self.palette.len()]
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            basemap: Some(DEFAULT_BASEMAP.to_string()),
            background: Color::srgb(0.52, 0.68, 0.82),
            frame_color: Color::srgb(0.1, 0.1, 0.1),
            graticule_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
            equator_color: Color::srgba(1.0, 1.0, 1.0, 0.7),
            graticule_step_deg: 30,
            margin_px: 24.0,
            point_color: Color::BLACK,
            point_radius_px: 1.0,
            point_resolution: 6,
            track_color: Color::BLACK,
            marker_radius_px: 5.0,
            // matplotlib's default color cycle, C0..C9
            palette: vec![
                Color::srgb_u8(31, 119, 180),
                Color::srgb_u8(255, 127, 14),
                Color::srgb_u8(44, 160, 44),
                Color::srgb_u8(214, 39, 40),
                Color::srgb_u8(148, 103, 189),
                Color::srgb_u8(140, 86, 75),
                Color::srgb_u8(227, 119, 194),
                Color::srgb_u8(127, 127, 127),
                Color::srgb_u8(188, 189, 34),
                Color::srgb_u8(23, 190, 207),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let config = MapConfig::default();
        assert_eq!(config.palette_color(0), config.palette_color(10));
        assert_ne!(config.palette_color(0), config.palette_color(1));

        let empty = MapConfig {
            palette: Vec::new(),
            ..default()
        };
        assert_eq!(empty.palette_color(3), empty.track_color);
    }

    #[test]
    fn test_default_basemap() {
        assert_eq!(MapConfig::default().basemap.as_deref(), Some(DEFAULT_BASEMAP));
    }
}
