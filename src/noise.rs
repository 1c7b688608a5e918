use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Ken Perlin's reference permutation table.
const PERLIN_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Improved Perlin noise over three dimensions.
///
/// The permutation is stored twice over so lattice lookups never wrap.
#[derive(Clone)]
pub struct ImprovedNoise {
    perm: [u8; 512],
}

impl Default for ImprovedNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl ImprovedNoise {
    pub fn new() -> Self {
        Self::from_table(&PERLIN_PERMUTATION)
    }

    /// Shuffled permutation; the same seed always yields the same field.
    pub fn seeded(seed: u64) -> Self {
        let mut table = PERLIN_PERMUTATION;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);
        Self::from_table(&table)
    }

    fn from_table(table: &[u8; 256]) -> Self {
        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = table[i & 255];
        }
        Self { perm }
    }

    /// Samples the field. Returns 0 on every integer lattice point and stays
    /// roughly within [-1, 1].
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (fx, fy, fz) = (x.floor(), y.floor(), z.floor());
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;
        let zi = (fz as i64 & 255) as usize;
        let (x, y, z) = (x - fx, y - fy, z - fz);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(u, grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z)),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

// Low 4 bits pick one of the 12 cube-edge gradients (4 repeated).
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_points_are_zero() {
        let noise = ImprovedNoise::new();
        for x in -3..3 {
            for y in -3..3 {
                for z in 0..3 {
                    let n = noise.sample(x as f64, y as f64, z as f64);
                    assert!(n.abs() < 1e-12, "noise at ({x}, {y}, {z}) was {n}");
                }
            }
        }
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let noise = ImprovedNoise::new();
        let mut nonzero = 0;
        for i in 0..2000 {
            let f = i as f64;
            let n = noise.sample(f * 0.137 - 40.0, f * 0.071 + 3.3, f * 0.013);
            assert!(n.abs() <= 1.05, "sample {n} out of range");
            if n.abs() > 1e-3 {
                nonzero += 1;
            }
        }
        assert!(nonzero > 500, "field should not be flat");
    }

    #[test]
    fn same_seed_same_field() {
        let a = ImprovedNoise::seeded(7);
        let b = ImprovedNoise::seeded(7);
        let c = ImprovedNoise::new();
        let mut differs = false;
        for i in 0..64 {
            let p = (i as f64 * 0.31, i as f64 * 0.17 - 2.0, 0.5);
            assert_eq!(a.sample(p.0, p.1, p.2), b.sample(p.0, p.1, p.2));
            if (a.sample(p.0, p.1, p.2) - c.sample(p.0, p.1, p.2)).abs() > 1e-9 {
                differs = true;
            }
        }
        assert!(differs, "seeded table should differ from the reference one");
    }

    #[test]
    fn field_is_continuous() {
        let noise = ImprovedNoise::new();
        let a = noise.sample(1.25, -0.5, 0.75);
        let b = noise.sample(1.25 + 1e-6, -0.5, 0.75);
        assert!((a - b).abs() < 1e-4);
    }
}
