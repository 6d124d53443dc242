//! Frame-level facade: physics, triangulation and shading in one call.
//!
//! [`Simulation`] owns a [`PointField`], an [`EdgeWrapTriangulator`] and a
//! [`LightingModel`], and keeps flat `f32` buffers a renderer can upload
//! as-is. The buffers live as long as the simulation and are refilled in
//! place every step.

use crate::color::Rgba;
use crate::config::{LightingParams, NoiseParams, PointerParams, SimulationConfig};
use crate::effects::PointerState;
use crate::lighting::LightingModel;
use crate::point::Point;
use crate::point_field::PointField;
use crate::theme::Theme;
use crate::triangulation::{EdgeWrapTriangulator, Mesh};
use glam::Vec2;
use log::debug;
use serde::Serialize;

/// Floats per triangle vertex: `x, y, height, centroid_y, centroid_x, centroid_y`.
pub const TRIANGLE_VERTEX_STRIDE: usize = 6;
/// Floats per stroke or point vertex.
pub const POINT_STRIDE: usize = 2;
/// Floats per color vertex.
pub const COLOR_STRIDE: usize = 4;

/// Lengths, in floats, of the frame buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BufferSizes {
    pub triangle_vertices: usize,
    pub stroke_vertices: usize,
    pub point_vertices: usize,
    pub color_vertices: usize,
}

#[derive(Debug, Clone, Default)]
struct FrameBuffers {
    triangle_vertices: Vec<f32>,
    stroke_vertices: Vec<f32>,
    point_vertices: Vec<f32>,
    color_vertices: Vec<f32>,
    triangle_colors: Vec<Rgba>,
}

impl FrameBuffers {
    fn clear(&mut self) {
        self.triangle_vertices.clear();
        self.stroke_vertices.clear();
        self.point_vertices.clear();
        self.color_vertices.clear();
        self.triangle_colors.clear();
    }

    fn release(&mut self) {
        *self = Self::default();
    }

    /// Refills every buffer from `mesh`. Returns the triangle count.
    fn fill(
        &mut self,
        mesh: Mesh<'_>,
        points: &[Point],
        lighting: &LightingModel,
        light: Vec2,
        domain_height: f32,
    ) -> usize {
        self.clear();
        let triangles = mesh.triangle_count();
        self.triangle_vertices
            .reserve(triangles * 3 * TRIANGLE_VERTEX_STRIDE);
        self.color_vertices.reserve(triangles * 3 * COLOR_STRIDE);
        self.triangle_colors.reserve(triangles);

        for tri in mesh.iter_triangles() {
            let centroid = (tri[0].position + tri[1].position + tri[2].position) / 3.0;
            let avg_height = (tri[0].height + tri[1].height + tri[2].height) / 3.0;
            for v in &tri {
                self.triangle_vertices.extend_from_slice(&[
                    v.position.x,
                    v.position.y,
                    avg_height,
                    centroid.y,
                    centroid.x,
                    centroid.y,
                ]);
            }

            let color = lighting.shade(&tri, light, domain_height);
            for _ in 0..3 {
                self.color_vertices
                    .extend_from_slice(&[color.r, color.g, color.b, color.a]);
            }
            self.triangle_colors.push(color);
        }

        for (a, b) in mesh.unique_edges() {
            self.stroke_vertices
                .extend_from_slice(&[a.position.x, a.position.y, b.position.x, b.position.y]);
        }

        self.point_vertices.reserve(points.len() * POINT_STRIDE);
        for p in points {
            self.point_vertices
                .extend_from_slice(&[p.position.x, p.position.y]);
        }
        triangles
    }
}

/// A complete terrain simulation with render-ready output buffers.
#[derive(Debug, Clone)]
pub struct Simulation {
    field: PointField,
    triangulator: EdgeWrapTriangulator,
    lighting: LightingModel,
    light_position: Vec2,
    buffers: FrameBuffers,
    triangle_count: usize,
}

impl Simulation {
    /// New simulation with default configuration.
    pub fn new(width: f32, height: f32, point_count: usize, seed: u32) -> Self {
        Self::with_config(width, height, point_count, seed, &SimulationConfig::default())
    }

    pub fn with_config(
        width: f32,
        height: f32,
        point_count: usize,
        seed: u32,
        config: &SimulationConfig,
    ) -> Self {
        let field = PointField::with_config(width, height, point_count, seed, config);
        let light_position = default_light(field.width(), field.height());
        let mut sim = Self {
            field,
            triangulator: EdgeWrapTriangulator::default(),
            lighting: LightingModel::new(config.lighting, config.theme.clone()),
            light_position,
            buffers: FrameBuffers::default(),
            triangle_count: 0,
        };
        sim.rebuild_frame();
        sim
    }

    /// Replaces the point set, keeping parameters, theme and lighting.
    ///
    /// Effects are dropped and the light returns to its default spot.
    pub fn initialize(&mut self, width: f32, height: f32, point_count: usize, seed: u32) {
        let config = self.config();
        self.field = PointField::with_config(width, height, point_count, seed, &config);
        self.light_position = default_light(self.field.width(), self.field.height());
        self.rebuild_frame();
    }

    /// Current parameters gathered into one config.
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            noise: *self.field.noise_params(),
            physics: *self.field.physics_params(),
            pointer: *self.field.pointer_params(),
            lighting: *self.lighting.params(),
            theme: self.lighting.theme().clone(),
        }
    }

    /// Applies every parameter group at once. Heights are regenerated; the
    /// point set, effects and light position are kept.
    pub fn set_config(&mut self, config: &SimulationConfig) {
        let config = config.clone().clamped();
        self.field.set_noise(config.noise);
        let p = config.physics;
        self.field
            .set_physics_params(p.spring_back, p.damping, p.velocity_influence);
        self.field.set_pointer_params(config.pointer);
        self.lighting.set_params(config.lighting);
        self.lighting.set_theme(config.theme);
    }

    pub fn field(&self) -> &PointField {
        &self.field
    }

    pub fn width(&self) -> f32 {
        self.field.width()
    }

    pub fn height(&self) -> f32 {
        self.field.height()
    }

    // -- Stepping --

    /// Applies the pointer snapshot, advances physics, then re-triangulates
    /// and re-shades. Returns the number of triangles produced.
    pub fn step(&mut self, dt: f32, speed: f32, pointer: PointerState) -> u32 {
        self.field.set_pointer_state(pointer);
        self.field.step(dt, speed);
        self.rebuild_frame();
        u32::try_from(self.triangle_count).unwrap_or(u32::MAX)
    }

    fn rebuild_frame(&mut self) {
        let (w, h) = (self.field.width(), self.field.height());
        let mesh = self.triangulator.triangulate(self.field.points(), w, h);
        self.triangle_count = self.buffers.fill(
            mesh,
            self.field.points(),
            &self.lighting,
            self.light_position,
            h,
        );
    }

    // -- Output --

    /// `[x, y, height, centroid_y, centroid_x, centroid_y]` per vertex, three
    /// vertices per triangle.
    pub fn triangle_vertices(&self) -> &[f32] {
        &self.buffers.triangle_vertices
    }

    /// `[x1, y1, x2, y2]` per distinct edge.
    pub fn stroke_vertices(&self) -> &[f32] {
        &self.buffers.stroke_vertices
    }

    /// `[x, y]` per real point.
    pub fn point_vertices(&self) -> &[f32] {
        &self.buffers.point_vertices
    }

    /// `[r, g, b, a]` per vertex; the three vertices of a triangle share a color.
    pub fn color_vertices(&self) -> &[f32] {
        &self.buffers.color_vertices
    }

    /// One flat color per triangle, in triangle order.
    pub fn triangle_colors(&self) -> &[Rgba] {
        &self.buffers.triangle_colors
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn stroke_vertex_count(&self) -> usize {
        self.buffers.stroke_vertices.len() / POINT_STRIDE
    }

    pub fn point_count(&self) -> usize {
        self.field.len()
    }

    pub fn buffer_sizes(&self) -> BufferSizes {
        BufferSizes {
            triangle_vertices: self.buffers.triangle_vertices.len(),
            stroke_vertices: self.buffers.stroke_vertices.len(),
            point_vertices: self.buffers.point_vertices.len(),
            color_vertices: self.buffers.color_vertices.len(),
        }
    }

    /// Lowest and highest point height, or `None` without points.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.field.points().iter().map(|p| p.height).fold(None, |acc, h| {
            Some(match acc {
                None => (h, h),
                Some((lo, hi)) => (lo.min(h), hi.max(h)),
            })
        })
    }

    // -- Configuration --

    /// Rescales points and the light to a new domain.
    pub fn resize(&mut self, width: f32, height: f32) {
        let (old_w, old_h) = (self.field.width(), self.field.height());
        self.field.resize(width, height);
        let scale = Vec2::new(self.field.width() / old_w, self.field.height() / old_h);
        self.light_position *= scale;
        self.rebuild_frame();
    }

    pub fn set_point_count(&mut self, count: usize, seed: u32) {
        self.field.set_point_count(count, seed);
        self.rebuild_frame();
    }

    pub fn set_noise_params(&mut self, scale: f32, intensity: f32) {
        self.field.set_noise_params(scale, intensity);
    }

    pub fn set_noise(&mut self, params: NoiseParams) {
        self.field.set_noise(params);
    }

    pub fn set_physics_params(&mut self, spring_back: f32, damping: f32, velocity_influence: f32) {
        self.field
            .set_physics_params(spring_back, damping, velocity_influence);
    }

    pub fn set_pointer_params(&mut self, params: PointerParams) {
        self.field.set_pointer_params(params);
    }

    pub fn set_pointer_state(&mut self, state: PointerState) {
        self.field.set_pointer_state(state);
    }

    pub fn trigger_shockwave(&mut self, x: f32, y: f32, strength: f32) {
        self.field.trigger_shockwave(x, y, strength);
    }

    pub fn set_gravity_well(&mut self, x: f32, y: f32, active: bool, attract: bool) {
        self.field.set_gravity_well(x, y, active, attract);
    }

    pub fn update_gravity_well_position(&mut self, x: f32, y: f32) {
        self.field.update_gravity_well_position(x, y);
    }

    pub fn theme(&self) -> &Theme {
        self.lighting.theme()
    }

    /// Takes effect on the next frame.
    pub fn set_theme(&mut self, theme: Theme) {
        self.lighting.set_theme(theme);
    }

    pub fn set_lighting_params(&mut self, params: LightingParams) {
        self.lighting.set_params(params);
    }

    pub fn light_position(&self) -> Vec2 {
        self.light_position
    }

    /// Non-finite coordinates are ignored.
    pub fn set_light_position(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.light_position = Vec2::new(x, y);
        }
    }

    /// Drops all points, effects and buffer storage. Later steps produce
    /// empty frames until [`Simulation::initialize`] is called.
    pub fn dispose(&mut self) {
        self.field.clear();
        self.buffers.release();
        self.triangulator = EdgeWrapTriangulator::default();
        self.triangle_count = 0;
        debug!("simulation disposed");
    }
}

/// Top center, a quarter of the way down.
fn default_light(width: f32, height: f32) -> Vec2 {
    Vec2::new(width * 0.5, height * 0.25)
}
