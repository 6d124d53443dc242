//! Transient interaction state: pointer, shockwaves, gravity well.

use crate::config::clamp_f32;
use glam::Vec2;
use log::debug;

/// Maximum concurrent shockwaves; the oldest is evicted beyond this.
pub const MAX_SHOCKWAVES: usize = 10;
/// Ring growth per step, in pixels.
pub const SHOCKWAVE_SPEED: f32 = 12.0;
/// Strength multiplier applied every step.
pub const SHOCKWAVE_DECAY: f32 = 0.96;
/// Half-thickness of the ring that pushes points.
pub const SHOCKWAVE_WAVE_WIDTH: f32 = 60.0;
/// Below this strength a shockwave is dropped.
pub const SHOCKWAVE_MIN_STRENGTH: f32 = 0.5;
/// Upper bound on a triggered shockwave's strength.
pub const SHOCKWAVE_MAX_STRENGTH: f32 = 500.0;
/// Strength used when the driver does not pass one.
pub const DEFAULT_SHOCKWAVE_STRENGTH: f32 = 100.0;

/// Largest pointer radius honoured, in pixels.
pub const MAX_POINTER_RADIUS: f32 = 2000.0;
/// Largest pointer strength honoured.
pub const MAX_POINTER_STRENGTH: f32 = 1000.0;

/// Force constant of an attracting well.
pub const GRAVITY_WELL_ATTRACT_STRENGTH: f32 = 3.0;
/// Force constant of a repelling well.
pub const GRAVITY_WELL_REPEL_STRENGTH: f32 = -5.0;
/// Distances are floored here so the force stays finite.
pub const GRAVITY_WELL_MIN_DIST: f32 = 20.0;
/// Points farther than this are untouched.
pub const GRAVITY_WELL_MAX_RANGE: f32 = 1000.0;

/// Weight of the newest pointer delta in the smoothed velocity.
const POINTER_VELOCITY_BLEND: f32 = 0.4;
/// Per-update decay of pointer velocity while outside the canvas.
const POINTER_VELOCITY_DECAY: f32 = 0.9;

/// How the pointer displaces nearby points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    /// Away from the pointer.
    #[default]
    Push,
    /// Toward the pointer at half magnitude.
    Pull,
    /// Orbit around the pointer with a slight outward drift.
    Swirl,
}

impl PointerMode {
    /// Decodes the driver's numeric mode; unknown codes fall back to push.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => PointerMode::Pull,
            2 => PointerMode::Swirl,
            _ => PointerMode::Push,
        }
    }

    /// Numeric code understood by [`PointerMode::from_code`].
    pub fn code(self) -> u32 {
        match self {
            PointerMode::Push => 0,
            PointerMode::Pull => 1,
            PointerMode::Swirl => 2,
        }
    }
}

/// Pointer snapshot supplied by the driver each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub in_bounds: bool,
    pub radius: f32,
    pub strength: f32,
    pub mode: PointerMode,
}

impl PointerState {
    /// A pointer that is outside the canvas and affects nothing.
    pub fn disabled() -> Self {
        Self {
            position: Vec2::ZERO,
            in_bounds: false,
            radius: 0.0,
            strength: 0.0,
            mode: PointerMode::Push,
        }
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Pointer state plus a smoothed velocity derived from successive updates.
#[derive(Debug, Clone, Default)]
pub struct Pointer {
    state: PointerState,
    velocity: Vec2,
}

impl Pointer {
    /// Applies a new snapshot. Radius and strength are clamped to be non-negative.
    ///
    /// A non-finite position leaves the pointer where it was and out of
    /// bounds, so it influences nothing until a usable position arrives.
    pub fn update(&mut self, state: PointerState) {
        let previous = self.state.position;
        let finite = state.position.is_finite();
        if !finite && state.in_bounds {
            debug!("ignoring non-finite pointer position {:?}", state.position);
        }
        self.state = PointerState {
            position: if finite { state.position } else { previous },
            in_bounds: state.in_bounds && finite,
            radius: clamp_f32(state.radius, 0.0, MAX_POINTER_RADIUS),
            strength: clamp_f32(state.strength, 0.0, MAX_POINTER_STRENGTH),
            ..state
        };

        if self.state.in_bounds {
            let delta = self.state.position - previous;
            self.velocity = delta * POINTER_VELOCITY_BLEND
                + self.velocity * (1.0 - POINTER_VELOCITY_BLEND);
        } else {
            self.velocity *= POINTER_VELOCITY_DECAY;
        }
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    /// True when the pointer can influence points this step.
    pub fn is_engaged(&self) -> bool {
        self.state.in_bounds && self.state.radius > 0.0 && self.state.strength > 0.0
    }

    /// Magnitude of the smoothed pointer velocity, pixels per update.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Expanding ring that pushes points outward as it passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shockwave {
    pub origin: Vec2,
    /// Steps since the trigger.
    pub age: u32,
    pub strength: f32,
}

impl Shockwave {
    pub fn new(origin: Vec2, strength: f32) -> Self {
        Self {
            origin,
            age: 0,
            strength: if strength.is_finite() {
                strength.clamp(0.0, SHOCKWAVE_MAX_STRENGTH)
            } else {
                0.0
            },
        }
    }

    /// Current ring radius.
    pub fn radius(&self) -> f32 {
        self.age as f32 * SHOCKWAVE_SPEED
    }

    /// Grows the ring and decays its strength by one step.
    pub fn advance(&mut self) {
        self.age += 1;
        self.strength *= SHOCKWAVE_DECAY;
    }

    /// Distance from the origin to the farthest corner of a domain spanning
    /// `(0, 0)..extent`. The origin may lie outside the domain.
    pub fn reach(&self, extent: Vec2) -> f32 {
        [
            Vec2::ZERO,
            Vec2::new(extent.x, 0.0),
            Vec2::new(0.0, extent.y),
            extent,
        ]
        .iter()
        .map(|corner| corner.distance(self.origin))
        .fold(0.0, f32::max)
    }

    /// Live while strong enough and while the ring's inner edge has not yet
    /// passed every corner of the domain.
    pub fn is_active(&self, extent: Vec2) -> bool {
        self.strength > SHOCKWAVE_MIN_STRENGTH
            && self.radius() - SHOCKWAVE_WAVE_WIDTH <= self.reach(extent)
    }

    /// Outward push for a point at distance `dist` from the origin.
    ///
    /// Linear falloff across the ring's width; zero outside it.
    pub fn push_at(&self, dist: f32) -> f32 {
        let ring = (dist - self.radius()).abs();
        if ring >= SHOCKWAVE_WAVE_WIDTH {
            return 0.0;
        }
        self.strength * (1.0 - ring / SHOCKWAVE_WAVE_WIDTH) * 0.15
    }
}

/// Bounded set of live shockwaves, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Shockwaves {
    waves: Vec<Shockwave>,
}

impl Shockwaves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shockwave, evicting the oldest when at capacity.
    ///
    /// Returns false and adds nothing when `origin` is not finite.
    pub fn trigger(&mut self, origin: Vec2, strength: f32) -> bool {
        if !origin.is_finite() {
            debug!("ignoring shockwave with non-finite origin {origin:?}");
            return false;
        }
        if self.waves.len() >= MAX_SHOCKWAVES {
            let evicted = self.waves.remove(0);
            debug!(
                "shockwave cap reached, evicting wave at ({:.1}, {:.1}) aged {}",
                evicted.origin.x, evicted.origin.y, evicted.age
            );
        }
        self.waves.push(Shockwave::new(origin, strength));
        true
    }

    /// Advances every wave and drops the spent ones for a domain of `extent`.
    pub fn advance(&mut self, extent: Vec2) {
        for wave in &mut self.waves {
            wave.advance();
        }
        self.waves.retain(|w| w.is_active(extent));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shockwave> {
        self.waves.iter()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn clear(&mut self) {
        self.waves.clear();
    }

    /// Outer edge of the widest ring, for sizing the spatial grid.
    pub fn max_reach(&self) -> f32 {
        self.waves
            .iter()
            .map(|w| w.radius() + SHOCKWAVE_WAVE_WIDTH)
            .fold(0.0, f32::max)
    }
}

/// Radial attractor or repulsor with a fixed force constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityWell {
    pub position: Vec2,
    pub attract: bool,
}

impl GravityWell {
    pub fn new(position: Vec2, attract: bool) -> Self {
        Self { position, attract }
    }

    /// Signed force constant: positive pulls in, negative pushes out.
    pub fn strength(&self) -> f32 {
        if self.attract {
            GRAVITY_WELL_ATTRACT_STRENGTH
        } else {
            GRAVITY_WELL_REPEL_STRENGTH
        }
    }

    /// Force toward the well for a point at `dist`, inversely proportional
    /// to distance and floored at [`GRAVITY_WELL_MIN_DIST`].
    pub fn force_at(&self, dist: f32) -> f32 {
        self.strength() / (dist.max(GRAVITY_WELL_MIN_DIST) * 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_mode_codes_round_trip_and_default_to_push() {
        for mode in [PointerMode::Push, PointerMode::Pull, PointerMode::Swirl] {
            assert_eq!(PointerMode::from_code(mode.code()), mode);
        }
        assert_eq!(PointerMode::from_code(42), PointerMode::Push);
    }

    #[test]
    fn pointer_velocity_is_smoothed_in_bounds() {
        let mut pointer = Pointer::default();
        let mut state = PointerState {
            position: Vec2::ZERO,
            in_bounds: true,
            radius: 100.0,
            strength: 50.0,
            mode: PointerMode::Push,
        };
        pointer.update(state);
        state.position = Vec2::new(10.0, 0.0);
        pointer.update(state);
        assert!((pointer.speed() - 4.0).abs() < 1e-5, "got {}", pointer.speed());
    }

    #[test]
    fn pointer_velocity_decays_out_of_bounds() {
        let mut pointer = Pointer::default();
        let mut state = PointerState {
            in_bounds: true,
            ..PointerState::disabled()
        };
        pointer.update(state);
        state.position = Vec2::new(10.0, 0.0);
        pointer.update(state);
        let before = pointer.speed();
        state.in_bounds = false;
        pointer.update(state);
        assert!((pointer.speed() - before * 0.9).abs() < 1e-5);
        assert!(!pointer.is_engaged());
    }

    #[test]
    fn pointer_clamps_negative_radius_and_strength() {
        let mut pointer = Pointer::default();
        pointer.update(PointerState {
            position: Vec2::ZERO,
            in_bounds: true,
            radius: -10.0,
            strength: f32::NAN,
            mode: PointerMode::Swirl,
        });
        assert_eq!(pointer.state().radius, 0.0);
        assert_eq!(pointer.state().strength, 0.0);
        assert!(!pointer.is_engaged());

        pointer.update(PointerState {
            radius: f32::INFINITY,
            strength: 1e9,
            ..*pointer.state()
        });
        assert_eq!(pointer.state().radius, MAX_POINTER_RADIUS);
        assert_eq!(pointer.state().strength, MAX_POINTER_STRENGTH);
    }

    #[test]
    fn non_finite_pointer_position_disengages_and_keeps_last_position() {
        let mut pointer = Pointer::default();
        let state = PointerState {
            position: Vec2::new(50.0, 60.0),
            in_bounds: true,
            radius: 100.0,
            strength: 50.0,
            mode: PointerMode::Push,
        };
        pointer.update(state);
        pointer.update(PointerState {
            position: Vec2::new(60.0, 60.0),
            ..state
        });
        let speed = pointer.speed();

        for bad in [
            Vec2::new(f32::NAN, 60.0),
            Vec2::new(60.0, f32::INFINITY),
            Vec2::splat(f32::NEG_INFINITY),
        ] {
            pointer.update(PointerState {
                position: bad,
                ..state
            });
            assert!(!pointer.is_engaged(), "engaged at {bad:?}");
            assert_eq!(pointer.state().position, Vec2::new(60.0, 60.0));
            assert!(pointer.speed().is_finite());
        }
        assert!(pointer.speed() < speed);

        pointer.update(state);
        assert!(pointer.is_engaged());
    }

    #[test]
    fn shockwave_strength_is_clamped() {
        assert_eq!(Shockwave::new(Vec2::ZERO, 9999.0).strength, SHOCKWAVE_MAX_STRENGTH);
        assert_eq!(Shockwave::new(Vec2::ZERO, -3.0).strength, 0.0);
    }

    #[test]
    fn shockwave_grows_and_decays() {
        let mut wave = Shockwave::new(Vec2::ZERO, 100.0);
        wave.advance();
        assert_eq!(wave.radius(), SHOCKWAVE_SPEED);
        assert!((wave.strength - 96.0).abs() < 1e-4);
    }

    #[test]
    fn shockwave_push_peaks_on_ring_and_vanishes_outside() {
        let mut wave = Shockwave::new(Vec2::ZERO, 100.0);
        for _ in 0..10 {
            wave.advance();
        }
        let r = wave.radius();
        assert!(wave.push_at(r) > wave.push_at(r + 30.0));
        assert_eq!(wave.push_at(r + SHOCKWAVE_WAVE_WIDTH), 0.0);
        assert_eq!(wave.push_at(r - SHOCKWAVE_WAVE_WIDTH - 1.0), 0.0);
    }

    #[test]
    fn shockwave_set_evicts_oldest_at_cap() {
        let mut waves = Shockwaves::new();
        for i in 0..(MAX_SHOCKWAVES + 3) {
            waves.trigger(Vec2::new(i as f32, 0.0), 100.0);
        }
        assert_eq!(waves.len(), MAX_SHOCKWAVES);
        assert_eq!(waves.iter().next().unwrap().origin.x, 3.0);
    }

    #[test]
    fn shockwave_set_expires_weak_waves() {
        let mut waves = Shockwaves::new();
        waves.trigger(Vec2::ZERO, 100.0);
        let mut steps = 0;
        while !waves.is_empty() {
            waves.advance(Vec2::splat(1e6));
            steps += 1;
            assert!(steps < 1000, "shockwave never expired");
        }
        // 100 * 0.96^n <= 0.5  =>  n >= 130
        assert!(steps >= 100);
    }

    #[test]
    fn shockwave_set_expires_waves_past_reach() {
        // Farthest corner of a 100x100 domain is ~141 from the origin.
        let mut waves = Shockwaves::new();
        waves.trigger(Vec2::ZERO, 500.0);
        for _ in 0..16 {
            waves.advance(Vec2::splat(100.0));
        }
        assert_eq!(waves.len(), 1);
        waves.advance(Vec2::splat(100.0));
        assert!(waves.is_empty());
    }

    #[test]
    fn reach_is_distance_to_farthest_corner() {
        let extent = Vec2::new(800.0, 600.0);
        let center = Shockwave::new(Vec2::new(400.0, 300.0), 100.0);
        assert!((center.reach(extent) - 500.0).abs() < 1e-3);
        let corner = Shockwave::new(Vec2::ZERO, 100.0);
        assert!((corner.reach(extent) - 1000.0).abs() < 1e-3);
        let outside = Shockwave::new(Vec2::new(1500.0, 300.0), 100.0);
        let expected = Vec2::new(1500.0, 300.0).length();
        assert!((outside.reach(extent) - expected).abs() < 1e-2);
        assert!(outside.reach(extent) > extent.length());
    }

    #[test]
    fn wave_outside_domain_lives_until_it_crosses_the_far_corner() {
        // Farthest corner from (1500, 300) is ~1529.7 away, so the inner
        // edge passes it at age 133 while strength is still ~2.2.
        let extent = Vec2::new(800.0, 600.0);
        let mut waves = Shockwaves::new();
        waves.trigger(Vec2::new(1500.0, 300.0), 500.0);
        for _ in 0..132 {
            waves.advance(extent);
        }
        assert_eq!(waves.len(), 1);
        let wave = *waves.iter().next().unwrap();
        assert!(wave.strength > SHOCKWAVE_MIN_STRENGTH);
        waves.advance(extent);
        assert!(waves.is_empty());
    }

    #[test]
    fn wave_above_left_of_domain_outlives_the_diagonal() {
        // Far corner (800, 600) is ~1220.7 from (-200, -100); the 1000px
        // diagonal is crossed by the inner edge at age 89.
        let extent = Vec2::new(800.0, 600.0);
        let mut waves = Shockwaves::new();
        waves.trigger(Vec2::new(-200.0, -100.0), 500.0);
        for _ in 0..106 {
            waves.advance(extent);
        }
        assert_eq!(waves.len(), 1);
        waves.advance(extent);
        assert!(waves.is_empty());
    }

    #[test]
    fn non_finite_shockwave_origin_is_ignored() {
        let mut waves = Shockwaves::new();
        assert!(!waves.trigger(Vec2::new(f32::NAN, 10.0), 100.0));
        assert!(!waves.trigger(Vec2::new(10.0, f32::INFINITY), 100.0));
        assert!(waves.is_empty());
        assert!(waves.trigger(Vec2::new(10.0, 10.0), 100.0));
        assert_eq!(waves.len(), 1);
    }

    #[test]
    fn max_reach_tracks_widest_ring() {
        let mut waves = Shockwaves::new();
        assert_eq!(waves.max_reach(), 0.0);
        waves.trigger(Vec2::ZERO, 100.0);
        waves.advance(Vec2::splat(1e6));
        waves.trigger(Vec2::ZERO, 100.0);
        assert_eq!(waves.max_reach(), SHOCKWAVE_SPEED + SHOCKWAVE_WAVE_WIDTH);
    }

    #[test]
    fn gravity_well_sign_and_singularity_floor() {
        let attract = GravityWell::new(Vec2::ZERO, true);
        let repel = GravityWell::new(Vec2::ZERO, false);
        assert!(attract.force_at(100.0) > 0.0);
        assert!(repel.force_at(100.0) < 0.0);
        assert_eq!(attract.force_at(0.0), attract.force_at(GRAVITY_WELL_MIN_DIST));
        assert!(attract.force_at(50.0) > attract.force_at(500.0));
    }
}
