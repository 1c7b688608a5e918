mod input;
mod noise;
mod raycast;
mod settings;
mod shape;
mod squares;
mod ui;

use bevy::core_pipeline::bloom::BloomSettings;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::{EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::pbr::DirectionalLightShadowMap;
use bevy::prelude::*;
use input::{InputPlugin, OrbitCamera};
use squares::SquaresPlugin;
use ui::UiPlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)))
        .insert_resource(Msaa::Sample4)
        .insert_resource(DirectionalLightShadowMap { size: 4096 })
        // Warm tint stands in for a sunset environment map.
        .insert_resource(AmbientLight {
            color: Color::srgb(1.0, 0.82, 0.68),
            brightness: 220.0,
        })
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(EntityCountDiagnosticsPlugin)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "hero-squares".into(),
                resolution: (1000., 1000.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((SquaresPlugin, UiPlugin, InputPlugin))
        .add_systems(Startup, (setup_camera, setup_lights))
        .run();
}

fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3dBundle {
            camera: Camera {
                hdr: true,
                ..default()
            },
            projection: PerspectiveProjection {
                fov: 75f32.to_radians(),
                near: 0.1,
                far: 1000.0,
                ..default()
            }
            .into(),
            tonemapping: Tonemapping::TonyMcMapface,
            transform: orbit.transform(),
            ..default()
        },
        BloomSettings::default(),
        orbit,
        MainCamera,
    ));
}

fn setup_lights(mut commands: Commands) {
    // key light from above, casting the shadows between rows
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 4_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(0.0, 10.0, 0.5).looking_at(Vec3::ZERO, Vec3::Z),
        ..default()
    });
    // weak fill from the camera side
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 600.0,
            ..default()
        },
        transform: Transform::from_xyz(0.0, 0.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

#[derive(Component)]
pub struct MainCamera;
