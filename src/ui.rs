use bevy::diagnostic::{DiagnosticsStore, EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::settings::HeroSettings;
use crate::squares::{HeroState, RegenerateGrid, Square, TargetPoint};

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin).add_systems(Update, ui_system);
    }
}

#[allow(clippy::too_many_arguments)]
fn ui_system(
    mut contexts: EguiContexts,
    mut settings: ResMut<HeroSettings>,
    squares: Query<(), With<Square>>,
    target: Option<Res<TargetPoint>>,
    state: Res<State<HeroState>>,
    mut next_state: ResMut<NextState<HeroState>>,
    mut ev_regen: EventWriter<RegenerateGrid>,
    diagnostics: Res<DiagnosticsStore>,
) {
    if settings.show_settings {
        egui::Window::new("Settings").show(contexts.ctx_mut(), |ui| {
            ui.label(format!("Squares: {}", squares.iter().count()));
            if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                if let Some(value) = fps.smoothed() {
                    ui.label(format!("FPS: {:.1}", value));
                }
            }
            if let Some(target) = target.as_deref() {
                ui.label(format!(
                    "Target: ({:.2}, {:.2}, {:.2})",
                    target.x, target.y, target.z
                ));
            }

            ui.separator();

            ui.checkbox(&mut settings.running, "Running");
            ui.add(egui::Slider::new(&mut settings.time_speed, 0.0..=4.0).text("Time Speed"));
            ui.add(
                egui::Slider::new(&mut settings.noise_freq, 0.01..=2.0).text("Noise Frequency"),
            );
            ui.add(egui::Slider::new(&mut settings.noise_scale, 0.0..=2.0).text("Noise Scale"));

            ui.separator();

            ui.add(
                egui::Slider::new(&mut settings.highlight_radius, 0.0..=3.0)
                    .text("Highlight Radius"),
            );
            ui.add(egui::Slider::new(&mut settings.hue_speed, 0.0..=1.0).text("Hue Speed"));
            ui.add(egui::Slider::new(&mut settings.emissive_peak, 0.0..=2.0).text("Emissive Peak"));
            ui.add(
                egui::Slider::new(&mut settings.emissive_decay, 0.0..=0.05)
                    .text("Emissive Decay"),
            );
            ui.add(egui::Slider::new(&mut settings.emissive_gain, 0.0..=20.0).text("Glow Gain"));

            ui.separator();

            ui.add(egui::Slider::new(&mut settings.cols, 1..=120).text("Columns"));
            ui.add(egui::Slider::new(&mut settings.rows, 1..=80).text("Rows"));
            ui.add(egui::Slider::new(&mut settings.spacing.x, 0.05..=1.0).text("Spacing X"));
            ui.add(egui::Slider::new(&mut settings.spacing.y, 0.05..=1.0).text("Spacing Y"));

            let mut seeded = settings.noise_seed.is_some();
            if ui.checkbox(&mut seeded, "Seeded Noise").changed() {
                settings.noise_seed = seeded.then_some(0);
            }
            if let Some(seed) = settings.noise_seed.as_mut() {
                ui.add(egui::DragValue::new(seed).prefix("Seed: "));
            }

            ui.horizontal(|ui| {
                if ui.button("Regenerate").clicked() {
                    ev_regen.send(RegenerateGrid);
                }
                let label = match state.get() {
                    HeroState::Mounted => "Unmount",
                    HeroState::Unmounted => "Mount",
                };
                if ui.button(label).clicked() {
                    next_state.set(match state.get() {
                        HeroState::Mounted => HeroState::Unmounted,
                        HeroState::Unmounted => HeroState::Mounted,
                    });
                }
            });
        });
    }

    if settings.show_help {
        egui::Window::new("Help").show(contexts.ctx_mut(), |ui| {
            ui.label("Mouse: Light up squares");
            ui.label("Left Mouse: Orbit (drag)");
            ui.label("Right Mouse: Pan (drag)");
            ui.label("Mouse Wheel: Zoom");
            ui.label("Space: Pause Animation");
            ui.label("R: Regenerate Grid");
            ui.label("M: Mount / Unmount");
            ui.label("Tab: Toggle Settings");
            ui.label("H: Toggle Help");
            ui.label("F3: Toggle Diagnostics");
        });
    }

    if settings.show_diagnostics {
        egui::Window::new("Diagnostics").show(contexts.ctx_mut(), |ui| {
            if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                if let Some(value) = fps.smoothed() {
                    ui.label(format!("FPS: {:.1}", value));
                }
            }
            if let Some(entity_count) = diagnostics.get(&EntityCountDiagnosticsPlugin::ENTITY_COUNT)
            {
                if let Some(value) = entity_count.value() {
                    ui.label(format!("Entities: {}", value));
                }
            }
        });
    }
}
