use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use std::f32::consts::FRAC_PI_2;

use crate::settings::SquareShape;

impl SquareShape {
    fn beveled(&self) -> bool {
        self.bevel_segments > 0 && self.bevel_thickness > 0.0
    }

    /// Local bounding box of the mesh produced by [`extruded_square`].
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.beveled() {
            let (bs, bt) = (self.bevel_size, self.bevel_thickness);
            (
                Vec3::new(-bs, -bs, -bt),
                Vec3::new(self.side + bs, self.side + bs, self.depth + bt),
            )
        } else {
            (Vec3::ZERO, Vec3::new(self.side, self.side, self.depth))
        }
    }

    /// Cross-section rings from back to front as (z, outward expansion).
    fn rings(&self) -> Vec<(f32, f32)> {
        if !self.beveled() {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }
        let segs = self.bevel_segments;
        let (bs, bt) = (self.bevel_size, self.bevel_thickness);
        let ring = |b: u32| {
            let t = b as f32 / segs as f32;
            (bt * (t * FRAC_PI_2).cos(), bs * (t * FRAC_PI_2).sin())
        };

        let mut rings = Vec::with_capacity(2 * (segs as usize + 1));
        for b in 0..=segs {
            let (z, e) = ring(b);
            rings.push((-z, e));
        }
        for b in (0..=segs).rev() {
            let (z, e) = ring(b);
            rings.push((self.depth + z, e));
        }
        rings
    }
}

/// Builds the flat-shaded, beveled extrusion of a square whose corner sits at
/// the local origin. The profile spans `side` on x and y and the body runs
/// from z = 0 to z = `depth`.
pub fn extruded_square(shape: &SquareShape) -> Mesh {
    let s = shape.side;
    let rings = shape.rings();

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(rings.len() * 4);
    for &(z, e) in &rings {
        positions.extend_from_slice(&[
            [-e, -e, z],
            [s + e, -e, z],
            [s + e, s + e, z],
            [-e, s + e, z],
        ]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity((rings.len() - 1) * 24 + 12);
    for k in 0..rings.len() as u32 - 1 {
        for c in 0..4 {
            let n = (c + 1) % 4;
            let a = k * 4 + c;
            let b = k * 4 + n;
            let cc = (k + 1) * 4 + n;
            let d = (k + 1) * 4 + c;
            indices.extend_from_slice(&[a, b, cc, a, cc, d]);
        }
    }

    // caps
    indices.extend_from_slice(&[0, 2, 1, 0, 3, 2]);
    let f = (rings.len() as u32 - 1) * 4;
    indices.extend_from_slice(&[f, f + 1, f + 2, f, f + 2, f + 3]);

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn positions(mesh: &Mesh) -> Vec<Vec3> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(v)) => v.iter().map(|p| Vec3::from(*p)).collect(),
            _ => panic!("mesh has no positions"),
        }
    }

    #[test]
    fn triangle_count_matches_rings() {
        let shape = SquareShape::default();
        let mesh = extruded_square(&shape);
        let rings = 2 * (shape.bevel_segments as usize + 1);
        let triangles = (rings - 1) * 8 + 4;
        assert_eq!(mesh.count_vertices(), triangles * 3);
        assert!(mesh.indices().is_none());
    }

    #[test]
    fn vertices_inside_bounds() {
        let shape = SquareShape::default();
        let (min, max) = shape.bounds();
        let eps = Vec3::splat(1e-5);
        for p in positions(&extruded_square(&shape)) {
            assert!(p.cmpge(min - eps).all() && p.cmple(max + eps).all(), "{p} escapes bounds");
        }
    }

    #[test]
    fn faces_point_outward() {
        let shape = SquareShape::default();
        let center = Vec3::new(shape.side * 0.5, shape.side * 0.5, shape.depth * 0.5);
        let mesh = extruded_square(&shape);
        for tri in positions(&mesh).chunks_exact(3) {
            let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(normal.length() > 0.0, "degenerate triangle {tri:?}");
            assert!(normal.dot(centroid - center) > 0.0, "inward face {tri:?}");
        }
    }

    #[test]
    fn flat_normals_are_unit_length() {
        let mesh = extruded_square(&SquareShape::default());
        let Some(VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("mesh has no normals");
        };
        for n in normals {
            assert!((Vec3::from(*n).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn unbeveled_square_is_a_box() {
        let shape = SquareShape {
            bevel_segments: 0,
            ..default()
        };
        let mesh = extruded_square(&shape);
        assert_eq!(mesh.count_vertices(), 12 * 3);
        assert_eq!(shape.bounds(), (Vec3::ZERO, Vec3::new(0.2, 0.2, 0.2)));
    }
}
