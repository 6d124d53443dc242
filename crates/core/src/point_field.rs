//! The simulated point set and its per-step integration.
//!
//! One [`PointField::step`] runs, in order: shockwave aging, drift with
//! toroidal wrap, height update, grid rebuild, pointer / gravity-well /
//! shockwave forces, displacement decay, height clamp.

use crate::config::{
    clamp_dimension, clamp_f32, clamp_point_count, HeightMode, NoiseParams, PhysicsParams,
    PointerParams, SimulationConfig, MAX_DELTA_TIME, MAX_SPEED,
};
use crate::effects::{GravityWell, Pointer, PointerState, Shockwaves, GRAVITY_WELL_MAX_RANGE};
use crate::noise::NoiseField;
use crate::physics::{apply_gravity_well, apply_pointer, apply_shockwaves};
use crate::point::Point;
use crate::prng::Xorshift32;
use crate::spatial::SpatialIndex;
use glam::Vec2;
use log::{debug, trace};

/// Grid cells are never smaller than this.
pub const MIN_GRID_CELL: f32 = 50.0;

/// Points, effects and the parameters that drive them.
#[derive(Debug, Clone)]
pub struct PointField {
    width: f32,
    height: f32,
    points: Vec<Point>,
    rng: Xorshift32,
    noise: NoiseField,
    noise_params: NoiseParams,
    physics: PhysicsParams,
    pointer_params: PointerParams,
    pointer: Pointer,
    shockwaves: Shockwaves,
    gravity_well: Option<GravityWell>,
    grid: SpatialIndex,
    scratch: Vec<usize>,
    time: f32,
}

impl PointField {
    /// Creates `count` random points with default parameters.
    pub fn new(width: f32, height: f32, count: usize, seed: u32) -> Self {
        Self::with_config(width, height, count, seed, &SimulationConfig::default())
    }

    /// Creates `count` random points with the given parameters.
    ///
    /// Dimensions and count are clamped; the seed drives both point placement
    /// and the noise table.
    pub fn with_config(
        width: f32,
        height: f32,
        count: usize,
        seed: u32,
        config: &SimulationConfig,
    ) -> Self {
        let width = clamp_dimension(width);
        let height = clamp_dimension(height);
        let count = clamp_point_count(count);
        let mut field = Self {
            width,
            height,
            points: Vec::with_capacity(count),
            rng: Xorshift32::new(seed),
            noise: NoiseField::new(seed),
            noise_params: config.noise.clamped(),
            physics: config.physics.clamped(),
            pointer_params: config.pointer.clamped(),
            pointer: Pointer::default(),
            shockwaves: Shockwaves::new(),
            gravity_well: None,
            grid: SpatialIndex::new(width, height, MIN_GRID_CELL),
            scratch: Vec::new(),
            time: 0.0,
        };
        field.spawn(count);
        field.regenerate_heights();
        debug!("point field initialised: {width}x{height}, {count} points, seed {seed}");
        field
    }

    fn spawn(&mut self, count: usize) {
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;
        self.points
            .extend((0..count).map(|_| Point::random(rng, w, h)));
    }

    // -- Accessors --

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn noise_params(&self) -> &NoiseParams {
        &self.noise_params
    }

    pub fn physics_params(&self) -> &PhysicsParams {
        &self.physics
    }

    pub fn pointer_params(&self) -> &PointerParams {
        &self.pointer_params
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn shockwaves(&self) -> &Shockwaves {
        &self.shockwaves
    }

    pub fn gravity_well(&self) -> Option<&GravityWell> {
        self.gravity_well.as_ref()
    }

    /// Accumulated `dt * speed` since creation.
    pub fn time(&self) -> f32 {
        self.time
    }

    // -- Configuration --

    /// Rescales positions proportionally to a new domain. Count is unchanged.
    pub fn resize(&mut self, width: f32, height: f32) {
        let width = clamp_dimension(width);
        let height = clamp_dimension(height);
        if width == self.width && height == self.height {
            return;
        }
        let sx = width / self.width;
        let sy = height / self.height;
        for p in &mut self.points {
            p.scale(sx, sy, width, height);
        }
        self.width = width;
        self.height = height;
        self.regenerate_heights();
        debug!("point field resized to {width}x{height}");
    }

    /// Grows with new points drawn from `seed`, or truncates from the end.
    pub fn set_point_count(&mut self, count: usize, seed: u32) {
        let count = clamp_point_count(count);
        let current = self.points.len();
        if count < current {
            self.points.truncate(count);
        } else if count > current {
            self.rng = Xorshift32::new(seed);
            self.spawn(count - current);
            let z = self.height_z();
            for i in current..count {
                let h = self.sample_height(self.points[i].position, z);
                let p = &mut self.points[i];
                p.base_height = h;
                p.height = h;
            }
        }
        debug!("point count {current} -> {count}");
    }

    /// Updates noise scale and height intensity and regenerates every height.
    pub fn set_noise_params(&mut self, scale: f32, intensity: f32) {
        self.set_noise(NoiseParams {
            scale,
            intensity,
            ..self.noise_params
        });
    }

    /// Replaces every noise parameter and regenerates every height.
    pub fn set_noise(&mut self, params: NoiseParams) {
        self.noise_params = params.clamped();
        self.regenerate_heights();
        debug!(
            "noise params: scale {}, intensity {}, mode {}",
            self.noise_params.scale,
            self.noise_params.intensity,
            self.noise_params.mode.name()
        );
    }

    pub fn set_physics_params(&mut self, spring_back: f32, damping: f32, velocity_influence: f32) {
        self.physics = PhysicsParams::new(spring_back, damping, velocity_influence);
        debug!(
            "physics params: spring-back {}, damping {}, velocity influence {}",
            self.physics.spring_back, self.physics.damping, self.physics.velocity_influence
        );
    }

    pub fn set_pointer_params(&mut self, params: PointerParams) {
        self.pointer_params = params.clamped();
    }

    pub fn set_pointer_state(&mut self, state: PointerState) {
        self.pointer.update(state);
    }

    pub fn trigger_shockwave(&mut self, x: f32, y: f32, strength: f32) {
        self.shockwaves.trigger(Vec2::new(x, y), strength);
    }

    /// Starts, moves or stops the gravity well.
    ///
    /// Activating at a non-finite position is ignored; stopping always works.
    pub fn set_gravity_well(&mut self, x: f32, y: f32, active: bool, attract: bool) {
        if active && !(x.is_finite() && y.is_finite()) {
            debug!("ignoring gravity well at non-finite ({x}, {y})");
            return;
        }
        let was_active = self.gravity_well.is_some();
        self.gravity_well = active.then(|| GravityWell::new(Vec2::new(x, y), attract));
        if active != was_active {
            debug!(
                "gravity well {} at ({x:.1}, {y:.1})",
                if active { "started" } else { "stopped" }
            );
        }
    }

    /// Moves an active well; no-op when none is active or the position is
    /// not finite.
    pub fn update_gravity_well_position(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        if let Some(well) = &mut self.gravity_well {
            well.position = Vec2::new(x, y);
        }
    }

    // -- Heights --

    fn height_z(&self) -> f32 {
        match self.noise_params.mode {
            HeightMode::Animate => self.time * self.noise_params.anim_speed,
            HeightMode::Static | HeightMode::Mouse => 0.0,
        }
    }

    /// Noise height at `position`, attenuated toward the corners.
    fn sample_height(&self, position: Vec2, z: f32) -> f32 {
        let n = &self.noise_params;
        let center = Vec2::new(self.width, self.height) * 0.5;
        let max_dist = center.length();
        let falloff = 1.0 - position.distance(center) / max_dist * n.falloff;
        let value = self.noise.fbm3(
            position.x * n.scale,
            position.y * n.scale,
            z,
            n.octaves,
            n.persistence,
            n.lacunarity,
        );
        clamp_f32((value + 1.0) * 0.5 * falloff * n.intensity, 0.0, 1.0)
    }

    fn regenerate_heights(&mut self) {
        let z = self.height_z();
        for i in 0..self.points.len() {
            let h = self.sample_height(self.points[i].position, z);
            let p = &mut self.points[i];
            p.base_height = h;
            p.height = h;
        }
    }

    // -- Stepping --

    /// Side of a grid cell for this step's largest query radius.
    fn cell_size(&self) -> f32 {
        let mut max_radius = self.shockwaves.max_reach();
        if self.pointer.is_engaged() {
            max_radius = max_radius.max(self.pointer.state().radius);
        }
        if self.gravity_well.is_some() {
            max_radius = max_radius.max(GRAVITY_WELL_MAX_RANGE);
        }
        (max_radius * 0.5).max(MIN_GRID_CELL)
    }

    /// Advances the simulation by `dt * speed`. Both factors are clamped to [0, 10].
    pub fn step(&mut self, dt: f32, speed: f32) {
        let step = clamp_f32(dt, 0.0, MAX_DELTA_TIME) * clamp_f32(speed, 0.0, MAX_SPEED);
        let (w, h) = (self.width, self.height);
        self.time += step;

        self.shockwaves.advance(Vec2::new(w, h));

        for p in &mut self.points {
            p.advance_drift(step, w, h);
        }

        match self.noise_params.mode {
            HeightMode::Static => {
                for p in &mut self.points {
                    p.height = p.base_height;
                }
            }
            HeightMode::Animate | HeightMode::Mouse => self.regenerate_heights(),
        }

        let cell = self.cell_size();
        self.grid
            .rebuild(self.points.iter().map(|p| p.position), w, h, cell);

        let lift = match self.noise_params.mode {
            HeightMode::Mouse => self.pointer_params.height_influence,
            HeightMode::Static | HeightMode::Animate => 0.0,
        };
        apply_pointer(
            &mut self.points,
            &self.grid,
            &mut self.scratch,
            &self.pointer,
            self.physics.velocity_influence,
            lift,
        );
        if let Some(well) = &self.gravity_well {
            apply_gravity_well(&mut self.points, &self.grid, &mut self.scratch, well);
        }
        apply_shockwaves(
            &mut self.points,
            &self.grid,
            &mut self.scratch,
            &self.shockwaves,
        );

        let PhysicsParams {
            spring_back,
            damping,
            ..
        } = self.physics;
        for p in &mut self.points {
            p.settle(spring_back, damping);
            p.height = clamp_f32(p.height, 0.0, 1.0);
        }

        trace!(
            "step {step:.3}: {} points, {} shockwaves, well {}",
            self.points.len(),
            self.shockwaves.len(),
            self.gravity_well.is_some()
        );
    }

    /// Drops every point and effect.
    pub fn clear(&mut self) {
        self.points.clear();
        self.shockwaves.clear();
        self.gravity_well = None;
        self.grid.clear();
        self.scratch.clear();
    }
}
