use bevy::prelude::*;

/// Geometry of a single extruded square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquareShape {
    pub side: f32,
    pub depth: f32,
    pub bevel_size: f32,
    pub bevel_thickness: f32,
    pub bevel_segments: u32,
}

impl Default for SquareShape {
    fn default() -> Self {
        Self {
            side: 0.2,
            depth: 0.2,
            bevel_size: 0.03,
            bevel_thickness: 0.02,
            bevel_segments: 12,
        }
    }
}

#[derive(Resource, Clone, Debug)]
pub struct HeroSettings {
    // Grid
    pub cols: usize,
    pub rows: usize,
    pub spacing: Vec2,
    pub start: Vec2,
    pub shape: SquareShape,
    pub rotation_deg: f32,
    pub base_color: Color,
    // Animation
    pub noise_freq: f32,
    pub noise_scale: f32,
    pub time_speed: f32,
    pub noise_seed: Option<u64>,
    pub running: bool,
    // Highlight
    pub highlight_radius: f32,
    pub hue_speed: f32,
    pub emissive_peak: f32,
    /// Intensity lost per 60 Hz frame; scaled by real frame time.
    pub emissive_decay: f32,
    pub emissive_gain: f32,
    // UI
    pub show_settings: bool,
    pub show_help: bool,
    pub show_diagnostics: bool,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            cols: 50,
            rows: 26,
            spacing: Vec2::new(0.2, 0.4),
            start: Vec2::new(-5.0, -5.0),
            shape: SquareShape::default(),
            rotation_deg: 45.0,
            base_color: Color::srgb_u8(0xf0, 0xf0, 0xff),
            noise_freq: 0.33,
            noise_scale: 0.5,
            time_speed: 1.0,
            noise_seed: None,
            running: true,
            highlight_radius: 0.5,
            hue_speed: 0.1,
            emissive_peak: 0.5,
            emissive_decay: 0.005,
            emissive_gain: 4.0,
            show_settings: false,
            show_help: true,
            show_diagnostics: false,
        }
    }
}

impl HeroSettings {
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }
}
