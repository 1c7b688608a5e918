use bevy::color::LinearRgba;
use bevy::prelude::*;

use crate::input::track_pointer;
use crate::noise::ImprovedNoise;
use crate::raycast::update_target;
use crate::settings::HeroSettings;
use crate::shape::extruded_square;

/// Whether the grid is mounted into the scene. Leaving `Mounted` despawns
/// every cell and detaches pointer tracking.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum HeroState {
    #[default]
    Mounted,
    Unmounted,
}

#[derive(Event, Default)]
pub struct RegenerateGrid;

/// Scene point under the pointer, shared by every cell within a frame.
#[derive(Resource, Clone, Copy, Debug, Deref, DerefMut)]
pub struct TargetPoint(pub Vec3);

impl Default for TargetPoint {
    // Far enough off-grid that nothing lights up before the first hit.
    fn default() -> Self {
        Self(Vec3::new(20.0, 20.0, 0.0))
    }
}

/// Pointer position in normalized device coordinates. Only present while the
/// grid is mounted.
#[derive(Resource, Default, Debug)]
pub struct PointerTracker {
    pub ndc: Vec2,
}

#[derive(Resource, Deref)]
pub struct NoiseSource(pub ImprovedNoise);

/// Animation time in seconds, advanced only while running.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct AnimationClock(pub f32);

#[derive(Component)]
pub struct SquaresRoot;

#[derive(Component, Debug)]
pub struct Square {
    pub base: Vec2,
    pub emissive_intensity: f32,
    glow: LinearRgba,
}

/// What one cell should look like this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareFrame {
    pub z: f32,
    /// Set only while the cell is within the highlight radius.
    pub hue: Option<f32>,
    pub emissive_intensity: f32,
}

impl Square {
    pub fn new(base: Vec2) -> Self {
        Self {
            base,
            emissive_intensity: 0.0,
            glow: LinearRgba::BLACK,
        }
    }

    /// Advances the cell to animation time `t`. `dt` is the wall-clock time
    /// since the previous step and only drives the emissive decay, so lit
    /// cells still fade while the animation clock is slowed or stopped.
    pub fn step(
        &mut self,
        noise: &ImprovedNoise,
        t: f32,
        dt: f32,
        target: Vec3,
        settings: &HeroSettings,
    ) -> SquareFrame {
        let ns = noise.sample(
            (self.base.x * settings.noise_freq) as f64,
            (self.base.y * settings.noise_freq) as f64,
            t as f64,
        ) as f32;
        let z = ns * settings.noise_scale;

        let peak = settings.emissive_peak.max(0.0);
        let distance = self.base.extend(z).distance(target);
        let hue = if distance < settings.highlight_radius {
            self.emissive_intensity = peak;
            Some((t * settings.hue_speed).rem_euclid(1.0))
        } else {
            self.emissive_intensity -= settings.emissive_decay * dt * 60.0;
            None
        };
        self.emissive_intensity = self.emissive_intensity.min(peak).max(0.0);

        SquareFrame {
            z,
            hue,
            emissive_intensity: self.emissive_intensity,
        }
    }
}

pub struct SquaresPlugin;
impl Plugin for SquaresPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeroSettings>()
            .init_resource::<AnimationClock>()
            .init_state::<HeroState>()
            .add_event::<RegenerateGrid>()
            .add_systems(OnEnter(HeroState::Mounted), spawn_squares)
            .add_systems(OnExit(HeroState::Mounted), despawn_squares)
            .add_systems(
                Update,
                (
                    track_pointer.run_if(resource_exists::<PointerTracker>),
                    update_target,
                    animate_squares,
                    regenerate_squares,
                )
                    .chain()
                    .run_if(in_state(HeroState::Mounted)),
            );
    }
}

/// Slot positions, column-major. Odd columns sit half a row lower by
/// `spacing.x` so neighbouring diamonds interlock.
pub fn grid_positions(settings: &HeroSettings) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(settings.cell_count());
    for i in 0..settings.cols {
        let offset_y = (i % 2) as f32 * -settings.spacing.x;
        for j in 0..settings.rows {
            out.push(Vec2::new(
                settings.start.x + i as f32 * settings.spacing.x,
                offset_y + settings.start.y + j as f32 * settings.spacing.y,
            ));
        }
    }
    out
}

fn spawn_grid(
    commands: &mut Commands,
    settings: &HeroSettings,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mesh = meshes.add(extruded_square(&settings.shape));
    let rotation = Quat::from_rotation_z(settings.rotation_deg.to_radians());
    let positions = grid_positions(settings);
    let count = positions.len();

    commands
        .spawn((SpatialBundle::default(), SquaresRoot, Name::new("squares")))
        .with_children(|parent| {
            for pos in positions {
                let material = materials.add(StandardMaterial {
                    base_color: settings.base_color,
                    emissive: LinearRgba::BLACK,
                    perceptual_roughness: 1.0,
                    ..default()
                });
                parent.spawn((
                    PbrBundle {
                        mesh: mesh.clone(),
                        material,
                        transform: Transform::from_translation(pos.extend(0.0))
                            .with_rotation(rotation),
                        ..default()
                    },
                    Square::new(pos),
                ));
            }
        });

    let noise = match settings.noise_seed {
        Some(seed) => ImprovedNoise::seeded(seed),
        None => ImprovedNoise::new(),
    };
    commands.insert_resource(NoiseSource(noise));

    info!(
        "spawned {} squares ({} cols x {} rows)",
        count, settings.cols, settings.rows
    );
}

pub fn spawn_squares(
    mut commands: Commands,
    settings: Res<HeroSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_grid(&mut commands, &settings, &mut meshes, &mut materials);
    commands.insert_resource(TargetPoint::default());
    commands.insert_resource(PointerTracker::default());
}

pub fn despawn_squares(mut commands: Commands, roots: Query<Entity, With<SquaresRoot>>) {
    for root in &roots {
        commands.entity(root).despawn_recursive();
    }
    commands.remove_resource::<PointerTracker>();
    info!("squares unmounted, pointer tracking detached");
}

fn regenerate_squares(
    mut commands: Commands,
    mut ev_regen: EventReader<RegenerateGrid>,
    settings: Res<HeroSettings>,
    roots: Query<Entity, With<SquaresRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if ev_regen.is_empty() {
        return;
    }
    ev_regen.clear();

    for root in &roots {
        commands.entity(root).despawn_recursive();
    }
    spawn_grid(&mut commands, &settings, &mut meshes, &mut materials);
}

fn animate_squares(
    time: Res<Time>,
    settings: Res<HeroSettings>,
    noise: Res<NoiseSource>,
    target: Res<TargetPoint>,
    mut clock: ResMut<AnimationClock>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q: Query<(&mut Square, &mut Transform, &Handle<StandardMaterial>)>,
) {
    if !settings.running {
        return;
    }
    let dt = time.delta_seconds();
    **clock += dt * settings.time_speed;
    let t = **clock;

    for (mut square, mut transform, handle) in &mut q {
        let before = square.emissive_intensity;
        let frame = square.step(&noise, t, dt, **target, &settings);
        transform.translation.z = frame.z;

        // Untouched materials are left alone so they are not re-uploaded.
        if frame.hue.is_none() && frame.emissive_intensity == before {
            continue;
        }
        let Some(material) = materials.get_mut(handle) else {
            continue;
        };
        if let Some(hue) = frame.hue {
            let color = Color::hsl(hue * 360.0, 1.0, 0.5);
            material.base_color = color;
            square.glow = color.to_linear();
        }
        let k = frame.emissive_intensity * settings.emissive_gain;
        material.emissive = LinearRgba::rgb(
            square.glow.red * k,
            square.glow.green * k,
            square.glow.blue * k,
        );
    }
}
