//! A single terrain point: drift position, transient displacement, height.

use crate::prng::Xorshift32;
use glam::Vec2;

/// Magnitude bound of each drift velocity component at creation.
pub const BASE_VELOCITY: f32 = 0.5;

/// One simulated point.
///
/// `base` drifts with constant velocity and wraps toroidally. Forces act on
/// `displacement`, which decays back to zero; the rendered `position` is
/// `base + displacement` and may sit slightly outside the domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Rendered position.
    pub position: Vec2,
    /// Drift position, always inside `[0, width) x [0, height)`.
    pub base: Vec2,
    /// Drift velocity in pixels per unit step.
    pub drift: Vec2,
    /// Offset accumulated from pointer, shockwaves and the gravity well.
    pub displacement: Vec2,
    /// Height in [0, 1].
    pub height: f32,
    /// Noise-derived height before interactive lift.
    pub base_height: f32,
}

impl Point {
    /// Point at rest at `base` with the given drift.
    pub fn new(base: Vec2, drift: Vec2) -> Self {
        Self {
            position: base,
            base,
            drift,
            displacement: Vec2::ZERO,
            height: 0.0,
            base_height: 0.0,
        }
    }

    /// Uniformly placed point with a drift velocity in
    /// `[-BASE_VELOCITY, BASE_VELOCITY]` per axis.
    pub fn random(rng: &mut Xorshift32, width: f32, height: f32) -> Self {
        let x = wrap(rng.next_f32() * width, width);
        let y = wrap(rng.next_f32() * height, height);
        let vx = (rng.next_f32() - 0.5) * 2.0 * BASE_VELOCITY;
        let vy = (rng.next_f32() - 0.5) * 2.0 * BASE_VELOCITY;
        Self::new(Vec2::new(x, y), Vec2::new(vx, vy))
    }

    /// Moves the drift position by `drift * step` and wraps it into the domain.
    pub fn advance_drift(&mut self, step: f32, width: f32, height: f32) {
        let next = self.base + self.drift * step;
        self.base = Vec2::new(wrap(next.x, width), wrap(next.y, height));
        self.position = self.base + self.displacement;
    }

    /// Adds a displacement increment for this step.
    #[inline]
    pub fn push(&mut self, delta: Vec2) {
        self.displacement += delta;
    }

    /// Decays the displacement toward zero and recomputes `position`.
    pub fn settle(&mut self, spring_back: f32, damping: f32) {
        self.displacement *= (1.0 - spring_back) * damping;
        self.position = self.base + self.displacement;
    }

    /// Rescales every spatial quantity after a domain resize.
    pub fn scale(&mut self, sx: f32, sy: f32, width: f32, height: f32) {
        let s = Vec2::new(sx, sy);
        self.base = self.base * s;
        self.base = Vec2::new(wrap(self.base.x, width), wrap(self.base.y, height));
        self.displacement *= s;
        self.position = self.base + self.displacement;
    }
}

/// Wraps `v` into `[0, extent)`. Non-finite input collapses to 0.
#[inline]
pub fn wrap(v: f32, extent: f32) -> f32 {
    if !v.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if w >= extent {
        0.0
    } else {
        w
    }
}
