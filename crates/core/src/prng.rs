//! Deterministic PRNG based on the Xorshift32 algorithm.
//!
//! Seeds point positions and drift velocities. Same seed always produces the
//! same sequence on every platform; the core algorithm is pure integer
//! arithmetic and only the final float conversion touches `f32`.

/// Xorshift32 deterministic PRNG with the classic (13, 17, 5) shift triple.
///
/// A seed of 0 is replaced with a non-zero fallback to avoid the all-zeros
/// fixed point.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Fallback seed used when the caller provides 0.
    const FALLBACK_SEED: u32 = 1;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Returns a float in [0, 1].
    ///
    /// Divides by `u32::MAX`, so 1.0 is reachable. Callers that scale by a
    /// domain size and need a half-open range wrap the result.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }
}
