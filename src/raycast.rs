use bevy::math::Affine3A;
use bevy::prelude::*;

use crate::settings::HeroSettings;
use crate::squares::{PointerTracker, Square, TargetPoint};
use crate::MainCamera;

/// Slab test against an axis-aligned box. Returns the ray parameter of the
/// entry point, or 0 when the origin is already inside.
pub fn ray_aabb(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = dir.recip();
    let t1 = (min - origin) * inv;
    let t2 = (max - origin) * inv;
    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();
    if t_far < 0.0 || t_near > t_far || t_near.is_nan() || t_far.is_nan() {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Nearest hit of a world-space ray against a set of identically shaped
/// boxes, each given by its local-to-world transform.
pub fn nearest_hit(
    origin: Vec3,
    dir: Vec3,
    cells: impl IntoIterator<Item = Affine3A>,
    min: Vec3,
    max: Vec3,
) -> Option<Vec3> {
    let mut best: Option<f32> = None;
    for affine in cells {
        let inv = affine.inverse();
        // Affine maps keep the ray parameter, so local t is world t.
        let local_origin = inv.transform_point3(origin);
        let local_dir = inv.transform_vector3(dir);
        if let Some(t) = ray_aabb(local_origin, local_dir, min, max) {
            if best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
    }
    best.map(|t| origin + dir * t)
}

/// Ray from the camera through a point given in normalized device
/// coordinates.
pub fn pointer_ray(camera: &Camera, camera_transform: &GlobalTransform, ndc: Vec2) -> Option<Ray3d> {
    // reverse-z: near plane at 1
    let near = camera.ndc_to_world(camera_transform, ndc.extend(1.0))?;
    let far = camera.ndc_to_world(camera_transform, ndc.extend(f32::EPSILON))?;
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d {
        origin: near,
        direction,
    })
}

pub fn update_target(
    pointer: Option<Res<PointerTracker>>,
    settings: Res<HeroSettings>,
    q_cam: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    cells: Query<&Transform, With<Square>>,
    mut target: ResMut<TargetPoint>,
) {
    let Some(pointer) = pointer else {
        return;
    };
    let Ok((camera, cam_transform)) = q_cam.get_single() else {
        return;
    };
    let Some(ray) = pointer_ray(camera, cam_transform, pointer.ndc) else {
        return;
    };

    let (min, max) = settings.shape.bounds();
    // Cells sit under an identity root, so local transforms are world
    // transforms, including on the frame they were spawned. A miss keeps the
    // last target.
    if let Some(hit) = nearest_hit(
        ray.origin,
        *ray.direction,
        cells.iter().map(Transform::compute_affine),
        min,
        max,
    ) {
        target.0 = hit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SquareShape;

    const UNIT_MIN: Vec3 = Vec3::ZERO;
    const UNIT_MAX: Vec3 = Vec3::splat(0.2);

    #[test]
    fn ray_hits_box_face() {
        let t = ray_aabb(Vec3::new(0.1, 0.1, 8.0), Vec3::NEG_Z, UNIT_MIN, UNIT_MAX)
            .expect("ray points straight at the box");
        assert!((t - 7.8).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_beside_box() {
        assert_eq!(
            ray_aabb(Vec3::new(0.3, 0.1, 8.0), Vec3::NEG_Z, UNIT_MIN, UNIT_MAX),
            None
        );
        // pointing away
        assert_eq!(
            ray_aabb(Vec3::new(0.1, 0.1, 8.0), Vec3::Z, UNIT_MIN, UNIT_MAX),
            None
        );
    }

    #[test]
    fn origin_inside_box_hits_at_zero() {
        let t = ray_aabb(Vec3::splat(0.1), Vec3::X, UNIT_MIN, UNIT_MAX);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn nearest_of_several_cells_wins() {
        let cells = [
            Affine3A::from_translation(Vec3::new(1.0, 0.0, -1.0)),
            Affine3A::from_translation(Vec3::new(1.0, 0.0, 0.5)),
            Affine3A::from_translation(Vec3::new(3.0, 0.0, 2.0)),
        ];
        let hit = nearest_hit(Vec3::new(1.1, 0.1, 8.0), Vec3::NEG_Z, cells, UNIT_MIN, UNIT_MAX)
            .expect("ray passes through two cells");
        assert!(hit.abs_diff_eq(Vec3::new(1.1, 0.1, 0.7), 1e-5), "hit at {hit}");
    }

    #[test]
    fn rotated_cell_uses_local_space() {
        let rotation = Quat::from_rotation_z(45f32.to_radians());
        let cell = Affine3A::from_rotation_translation(rotation, Vec3::ZERO);

        // The rotated diamond reaches straight up the y axis.
        let up = nearest_hit(Vec3::new(0.0, 0.2, 5.0), Vec3::NEG_Z, [cell], UNIT_MIN, UNIT_MAX);
        assert!(up.is_some());
        // Its old x-extent corner is now empty space.
        let side = nearest_hit(Vec3::new(0.19, 0.01, 5.0), Vec3::NEG_Z, [cell], UNIT_MIN, UNIT_MAX);
        assert!(side.is_none());
    }

    #[test]
    fn empty_scene_has_no_hit() {
        assert_eq!(
            nearest_hit(Vec3::Z, Vec3::NEG_Z, std::iter::empty(), UNIT_MIN, UNIT_MAX),
            None
        );
    }

    fn target_app(ndc: Vec2) -> App {
        let mut app = App::new();
        app.init_resource::<HeroSettings>()
            .init_resource::<TargetPoint>()
            .insert_resource(PointerTracker { ndc })
            .add_systems(Update, update_target);
        // A camera that never went through `camera_system` keeps an identity
        // projection, so NDC maps straight through its transform and the ray
        // runs along -z.
        app.world_mut().spawn((
            Camera::default(),
            GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 5.0)),
            MainCamera,
        ));
        app.world_mut().spawn((Square::new(Vec2::ZERO), Transform::IDENTITY));
        app.world_mut()
            .spawn((Square::new(Vec2::X), Transform::from_xyz(1.0, 0.0, 0.3)));
        app
    }

    #[test]
    fn pointer_over_a_cell_moves_the_target() {
        let mut app = target_app(Vec2::new(0.1, 0.1));
        app.update();

        let (_, max) = SquareShape::default().bounds();
        let target = app.world().resource::<TargetPoint>().0;
        assert!(
            target.abs_diff_eq(Vec3::new(0.1, 0.1, max.z), 1e-4),
            "target at {target}"
        );

        // Raised cell at x = 1 is hit on its own top face.
        app.world_mut().resource_mut::<PointerTracker>().ndc = Vec2::new(1.1, 0.1);
        app.update();
        let target = app.world().resource::<TargetPoint>().0;
        assert!(
            target.abs_diff_eq(Vec3::new(1.1, 0.1, 0.3 + max.z), 1e-4),
            "target at {target}"
        );
    }

    #[test]
    fn missing_every_cell_keeps_the_last_target() {
        let mut app = target_app(Vec2::new(0.1, 0.1));
        app.update();
        let hit = app.world().resource::<TargetPoint>().0;

        app.world_mut().resource_mut::<PointerTracker>().ndc = Vec2::new(-3.0, 3.0);
        app.update();
        assert_eq!(app.world().resource::<TargetPoint>().0, hit);
    }

    #[test]
    fn no_target_update_without_pointer_tracking() {
        let mut app = target_app(Vec2::new(0.1, 0.1));
        app.world_mut().remove_resource::<PointerTracker>();
        app.update();
        assert_eq!(
            app.world().resource::<TargetPoint>().0,
            TargetPoint::default().0
        );
    }
}
