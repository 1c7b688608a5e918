use crate::squares::{HeroState, PointerTracker, RegenerateGrid};
use crate::settings::HeroSettings;
use crate::MainCamera;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use bevy_egui::EguiContexts;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                orbit_camera,
                pause_toggle,
                mount_toggle,
                regenerate_trigger,
                settings_toggle,
                help_toggle,
                diagnostics_toggle,
            ),
        );
    }
}

/// Orbit rig around a focus point. Left drag orbits, right drag pans, the
/// wheel dollies.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            radius: 8.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl OrbitCamera {
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let eye = self.focus + rotation * Vec3::Z * self.radius;
        Transform::from_translation(eye).looking_at(self.focus, rotation * Vec3::Y)
    }
}

/// Window coordinates (origin top-left, y down) to normalized device
/// coordinates (origin centre, y up).
pub fn cursor_to_ndc(cursor: Vec2, window_size: Vec2) -> Option<Vec2> {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        (cursor.x / window_size.x) * 2.0 - 1.0,
        -(cursor.y / window_size.y) * 2.0 + 1.0,
    ))
}

pub fn track_pointer(
    mut cursor_evr: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerTracker>,
) {
    let Ok(win) = windows.get_single() else {
        return;
    };
    let size = Vec2::new(win.width(), win.height());
    for ev in cursor_evr.read() {
        if let Some(ndc) = cursor_to_ndc(ev.position, size) {
            pointer.ndc = ndc;
        }
    }
}

fn orbit_camera(
    mut contexts: EguiContexts,
    mut scroll_evr: EventReader<MouseWheel>,
    mut motion: EventReader<MouseMotion>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut q_cam: Query<(&mut Transform, &mut OrbitCamera), With<MainCamera>>,
) {
    let Ok((mut t, mut orbit)) = q_cam.get_single_mut() else {
        return;
    };
    // Dragging an egui slider should not spin the scene.
    if contexts.ctx_mut().wants_pointer_input() {
        scroll_evr.clear();
        motion.clear();
        return;
    }

    let mut changed = false;
    for ev in scroll_evr.read() {
        let zoom = 1.0 - ev.y * 0.05;
        orbit.radius = (orbit.radius * zoom).clamp(1.0, 100.0);
        changed = true;
    }

    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if delta != Vec2::ZERO {
        if buttons.pressed(MouseButton::Left) {
            orbit.yaw -= delta.x * 0.005;
            orbit.pitch = (orbit.pitch - delta.y * 0.005).clamp(-1.5, 1.5);
            changed = true;
        } else if buttons.pressed(MouseButton::Right) {
            let scale = orbit.radius * 0.0015;
            let right = t.right();
            let up = t.up();
            orbit.focus += (-delta.x * *right + delta.y * *up) * scale;
            changed = true;
        }
    }

    if changed {
        *t = orbit.transform();
    }
}

fn pause_toggle(mut settings: ResMut<HeroSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Space) {
        settings.running = !settings.running;
    }
}

fn mount_toggle(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<HeroState>>,
    mut next_state: ResMut<NextState<HeroState>>,
) {
    if keys.just_pressed(KeyCode::KeyM) {
        next_state.set(match state.get() {
            HeroState::Mounted => HeroState::Unmounted,
            HeroState::Unmounted => HeroState::Mounted,
        });
    }
}

fn regenerate_trigger(mut ev_regen: EventWriter<RegenerateGrid>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyR) {
        ev_regen.send(RegenerateGrid);
    }
}

fn settings_toggle(mut settings: ResMut<HeroSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Tab) {
        settings.show_settings = !settings.show_settings;
    }
}

fn help_toggle(mut settings: ResMut<HeroSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyH) {
        settings.show_help = !settings.show_help;
    }
}

fn diagnostics_toggle(mut settings: ResMut<HeroSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::F3) {
        settings.show_diagnostics = !settings.show_diagnostics;
    }
}
