#![deny(unsafe_code)]
//! Browser bindings for terrain-mesh.
//!
//! Buffers cross the boundary as copied `Float32Array`s. A host draws
//! `triangleVertices` (x, y, height, centroid y, centroid x, centroid y per
//! vertex) with the matching `colorVertices`, then the deduplicated
//! `strokeVertices` as lines.

use glam::Vec2;
use js_sys::{Float32Array, Uint32Array};
use terrain_mesh_core::{
    EngineError, HeightMode, PointerMode, PointerState, Scene, Simulation, SimulationConfig,
    Theme,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console")]
    {
        console_error_panic_hook::set_once();
        // A logger may already be installed by the host.
        console_log::init_with_level(log::Level::Info).ok();
    }
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmSimulation {
    inner: Simulation,
}

#[wasm_bindgen]
impl WasmSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, point_count: usize, seed: u32) -> WasmSimulation {
        WasmSimulation {
            inner: Simulation::new(width, height, point_count, seed),
        }
    }

    /// Builds a simulation from a JSON scene without stepping it.
    #[wasm_bindgen(js_name = fromScene)]
    pub fn from_scene(json: &str) -> Result<WasmSimulation, JsValue> {
        let scene = Scene::from_json(json).map_err(to_js)?;
        Ok(WasmSimulation {
            inner: scene.build(),
        })
    }

    /// Re-creates the field in place; configuration survives.
    pub fn initialize(&mut self, width: f32, height: f32, point_count: usize, seed: u32) {
        self.inner.initialize(width, height, point_count, seed);
    }

    /// Advances one frame and rebuilds every buffer. Returns the triangle count.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt: f32,
        speed: f32,
        pointer_x: f32,
        pointer_y: f32,
        pointer_in_bounds: bool,
        pointer_radius: f32,
        pointer_strength: f32,
        pointer_mode: u32,
    ) -> u32 {
        let pointer = PointerState {
            position: Vec2::new(pointer_x, pointer_y),
            in_bounds: pointer_in_bounds,
            radius: pointer_radius,
            strength: pointer_strength,
            mode: PointerMode::from_code(pointer_mode),
        };
        self.inner.step(dt, speed, pointer)
    }

    /// Advances one frame with the pointer idle.
    pub fn step(&mut self, dt: f32, speed: f32) -> u32 {
        self.inner.step(dt, speed, PointerState::disabled())
    }

    #[wasm_bindgen(js_name = triangleVertices)]
    pub fn triangle_vertices(&self) -> Float32Array {
        Float32Array::from(self.inner.triangle_vertices())
    }

    #[wasm_bindgen(js_name = strokeVertices)]
    pub fn stroke_vertices(&self) -> Float32Array {
        Float32Array::from(self.inner.stroke_vertices())
    }

    #[wasm_bindgen(js_name = pointVertices)]
    pub fn point_vertices(&self) -> Float32Array {
        Float32Array::from(self.inner.point_vertices())
    }

    #[wasm_bindgen(js_name = colorVertices)]
    pub fn color_vertices(&self) -> Float32Array {
        Float32Array::from(self.inner.color_vertices())
    }

    #[wasm_bindgen(js_name = triangleCount)]
    pub fn triangle_count(&self) -> usize {
        self.inner.triangle_count()
    }

    #[wasm_bindgen(js_name = strokeVertexCount)]
    pub fn stroke_vertex_count(&self) -> usize {
        self.inner.stroke_vertex_count()
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.inner.point_count()
    }

    /// Float lengths of the triangle, stroke, point and color buffers.
    #[wasm_bindgen(js_name = bufferSizes)]
    pub fn buffer_sizes(&self) -> Uint32Array {
        Uint32Array::from(&self.sizes()[..])
    }

    pub fn width(&self) -> f32 {
        self.inner.width()
    }

    pub fn height(&self) -> f32 {
        self.inner.height()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(width, height);
    }

    #[wasm_bindgen(js_name = setPointCount)]
    pub fn set_point_count(&mut self, count: usize, seed: u32) {
        self.inner.set_point_count(count, seed);
    }

    #[wasm_bindgen(js_name = setNoiseParams)]
    pub fn set_noise_params(&mut self, scale: f32, intensity: f32) {
        self.inner.set_noise_params(scale, intensity);
    }

    /// Height mode by name: `static`, `animate` or `mouse`.
    #[wasm_bindgen(js_name = setHeightMode)]
    pub fn set_height_mode(&mut self, mode: &str) {
        let mut noise = self.inner.config().noise;
        noise.mode = HeightMode::from_name(mode);
        self.inner.set_noise(noise);
    }

    /// Applies a JSON settings object (`noise`, `physics`, `pointer`,
    /// `lighting`, `theme`). Missing or mistyped keys take their defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.set_config(&SimulationConfig::from_json(&value));
        Ok(())
    }

    #[wasm_bindgen(js_name = setPhysicsParams)]
    pub fn set_physics_params(&mut self, spring_back: f32, damping: f32, velocity_influence: f32) {
        self.inner
            .set_physics_params(spring_back, damping, velocity_influence);
    }

    #[wasm_bindgen(js_name = triggerShockwave)]
    pub fn trigger_shockwave(&mut self, x: f32, y: f32, strength: f32) {
        self.inner.trigger_shockwave(x, y, strength);
    }

    #[wasm_bindgen(js_name = setGravityWell)]
    pub fn set_gravity_well(&mut self, x: f32, y: f32, active: bool, attract: bool) {
        self.inner.set_gravity_well(x, y, active, attract);
    }

    #[wasm_bindgen(js_name = updateGravityWellPosition)]
    pub fn update_gravity_well_position(&mut self, x: f32, y: f32) {
        self.inner.update_gravity_well_position(x, y);
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, name: &str) -> Result<(), JsValue> {
        let theme = Theme::from_name(name).map_err(to_js)?;
        self.inner.set_theme(theme);
        Ok(())
    }

    #[wasm_bindgen(js_name = setLightPosition)]
    pub fn set_light_position(&mut self, x: f32, y: f32) {
        self.inner.set_light_position(x, y);
    }

    /// Releases every buffer; the instance is empty until re-initialized.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}

impl WasmSimulation {
    fn sizes(&self) -> [u32; 4] {
        let s = self.inner.buffer_sizes();
        [
            s.triangle_vertices as u32,
            s.stroke_vertices as u32,
            s.point_vertices as u32,
            s.color_vertices as u32,
        ]
    }
}

#[wasm_bindgen(js_name = createSimulation)]
pub fn create_simulation(width: f32, height: f32, point_count: usize, seed: u32) -> WasmSimulation {
    WasmSimulation::new(width, height, point_count, seed)
}
