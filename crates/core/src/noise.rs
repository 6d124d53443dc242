//! Seeded simplex noise (2D and 3D) with fractal Brownian motion.
//!
//! The permutation table is owned by a [`NoiseField`] instance and shuffled
//! from an integer seed with a linear congruential generator, so two fields
//! built from the same seed are bit-identical and nothing is global.
//!
//! Both dimensions use a squared kernel radius of 0.5. Each corner's
//! contribution reaches zero exactly on the boundary of the simplices that
//! share it, which keeps the field continuous across lattice cells.

/// 2D skew factor, (sqrt(3) - 1) / 2.
const F2: f32 = 0.366_025_42;
/// 2D unskew factor, (3 - sqrt(3)) / 6.
const G2: f32 = 0.211_324_87;
/// 3D skew factor.
const F3: f32 = 1.0 / 3.0;
/// 3D unskew factor.
const G3: f32 = 1.0 / 6.0;

/// Squared kernel radius shared by both dimensions.
const KERNEL_RADIUS_SQ: f32 = 0.5;
/// Keeps the 2D sum inside [-1, 1]; the peak is just under 1.
const SCALE_2D: f32 = 70.0;
/// Keeps the 3D sum inside [-1, 1] for a 0.5 kernel.
const SCALE_3D: f32 = 76.0;

/// LCG multiplier and increment (Numerical Recipes).
const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// Edge-midpoint gradients of a cube; the 2D path uses the x/y components.
const GRAD3: [[f32; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Seeded gradient noise source.
#[derive(Debug, Clone)]
pub struct NoiseField {
    /// Permutation of 0..=255, doubled so lookups never need masking twice.
    perm: [u8; 512],
}

impl NoiseField {
    /// Creates a noise field shuffled from `seed`.
    pub fn new(seed: u32) -> Self {
        let mut field = Self { perm: [0; 512] };
        field.seed(seed);
        field
    }

    /// Rebuilds the permutation table from `seed`.
    ///
    /// Fisher-Yates over the identity permutation, drawing indices from an
    /// LCG. Same seed, same table.
    pub fn seed(&mut self, seed: u32) {
        let mut source: [u8; 256] = [0; 256];
        for (i, slot) in source.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut state = seed;
        for i in (1..256usize).rev() {
            state = state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
            // High bits of an LCG are the well-mixed ones.
            let j = (state >> 8) as usize % (i + 1);
            source.swap(i, j);
        }

        self.perm[..256].copy_from_slice(&source);
        self.perm[256..].copy_from_slice(&source);
    }

    #[inline]
    fn hash2(&self, i: usize, j: usize) -> usize {
        self.perm[i + self.perm[j] as usize] as usize % 12
    }

    #[inline]
    fn hash3(&self, i: usize, j: usize, k: usize) -> usize {
        self.perm[i + self.perm[j + self.perm[k] as usize] as usize] as usize % 12
    }

    /// 2D simplex noise in [-1, 1].
    pub fn noise2(&self, x: f32, y: f32) -> f32 {
        self.raw2(x, y).clamp(-1.0, 1.0)
    }

    /// 3D simplex noise in [-1, 1].
    pub fn noise3(&self, x: f32, y: f32, z: f32) -> f32 {
        self.raw3(x, y, z).clamp(-1.0, 1.0)
    }

    /// Scaled 2D kernel sum before clamping.
    fn raw2(&self, x: f32, y: f32) -> f32 {
        let s = (x + y) * F2;
        let i = fast_floor(x + s);
        let j = fast_floor(y + s);

        let t = (i + j) as f32 * G2;
        let x0 = x - (i as f32 - t);
        let y0 = y - (j as f32 - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f32 + G2;
        let y1 = y0 - j1 as f32 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let n0 = corner2(self.hash2(ii, jj), x0, y0);
        let n1 = corner2(self.hash2(ii + i1, jj + j1), x1, y1);
        let n2 = corner2(self.hash2(ii + 1, jj + 1), x2, y2);

        SCALE_2D * (n0 + n1 + n2)
    }

    fn raw3(&self, x: f32, y: f32, z: f32) -> f32 {
        let s = (x + y + z) * F3;
        let i = fast_floor(x + s);
        let j = fast_floor(y + s);
        let k = fast_floor(z + s);

        let t = (i + j + k) as f32 * G3;
        let x0 = x - (i as f32 - t);
        let y0 = y - (j as f32 - t);
        let z0 = z - (k as f32 - t);

        // Which of the six tetrahedra of the skewed cube we are in.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f32 + G3;
        let y1 = y0 - j1 as f32 + G3;
        let z1 = z0 - k1 as f32 + G3;
        let x2 = x0 - i2 as f32 + 2.0 * G3;
        let y2 = y0 - j2 as f32 + 2.0 * G3;
        let z2 = z0 - k2 as f32 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let kk = (k & 255) as usize;

        let n0 = corner3(self.hash3(ii, jj, kk), x0, y0, z0);
        let n1 = corner3(self.hash3(ii + i1, jj + j1, kk + k1), x1, y1, z1);
        let n2 = corner3(self.hash3(ii + i2, jj + j2, kk + k2), x2, y2, z2);
        let n3 = corner3(self.hash3(ii + 1, jj + 1, kk + 1), x3, y3, z3);

        SCALE_3D * (n0 + n1 + n2 + n3)
    }

    /// Fractal sum of 2D noise, normalized by total amplitude to stay in [-1, 1].
    ///
    /// Zero octaves yields 0.
    pub fn fbm2(&self, x: f32, y: f32, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
        fbm(octaves, persistence, lacunarity, |f| self.noise2(x * f, y * f))
    }

    /// Fractal sum of 3D noise, normalized by total amplitude to stay in [-1, 1].
    ///
    /// Zero octaves yields 0.
    pub fn fbm3(
        &self,
        x: f32,
        y: f32,
        z: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        fbm(octaves, persistence, lacunarity, |f| {
            self.noise3(x * f, y * f, z * f)
        })
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(0)
    }
}

fn fbm(octaves: u32, persistence: f32, lacunarity: f32, sample: impl Fn(f32) -> f32) -> f32 {
    let (value, total, _, _) = (0..octaves).fold(
        (0.0_f32, 0.0_f32, 1.0_f32, 1.0_f32),
        |(value, total, amplitude, frequency), _| {
            (
                value + amplitude * sample(frequency),
                total + amplitude,
                amplitude * persistence,
                frequency * lacunarity,
            )
        },
    );
    if total > 0.0 {
        (value / total).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[inline(always)]
fn fast_floor(x: f32) -> i32 {
    let xi = x as i32;
    if x < xi as f32 {
        xi - 1
    } else {
        xi
    }
}

#[inline(always)]
fn corner2(gi: usize, x: f32, y: f32) -> f32 {
    let t = KERNEL_RADIUS_SQ - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    let g = &GRAD3[gi];
    t2 * t2 * (g[0] * x + g[1] * y)
}

#[inline(always)]
fn corner3(gi: usize, x: f32, y: f32, z: f32) -> f32 {
    let t = KERNEL_RADIUS_SQ - x * x - y * y - z * z;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    let g = &GRAD3[gi];
    t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
}
