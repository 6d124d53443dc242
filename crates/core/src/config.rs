//! Tunable parameters for noise, physics, pointer interaction and lighting.
//!
//! Every group has reference defaults, lenient JSON loading and a `clamped()`
//! normaliser. Out-of-range values are pulled into range silently.

use crate::effects::{PointerMode, PointerState, MAX_POINTER_RADIUS, MAX_POINTER_STRENGTH};
use crate::params::{param_f32, param_string, param_u32};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_DIMENSION: f32 = 1.0;
pub const MAX_DIMENSION: f32 = 100_000.0;
pub const MIN_POINT_COUNT: usize = 3;
pub const MAX_POINT_COUNT: usize = 10_000;
pub const MAX_DELTA_TIME: f32 = 10.0;
pub const MAX_SPEED: f32 = 10.0;

/// Clamps `v` into `[lo, hi]`, mapping NaN to `lo`.
pub(crate) fn clamp_f32(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}

/// Domain extent clamped to `[MIN_DIMENSION, MAX_DIMENSION]`.
pub fn clamp_dimension(v: f32) -> f32 {
    clamp_f32(v, MIN_DIMENSION, MAX_DIMENSION)
}

pub fn clamp_point_count(count: usize) -> usize {
    count.clamp(MIN_POINT_COUNT, MAX_POINT_COUNT)
}

/// When point heights are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightMode {
    /// Heights come from static noise and only change on parameter updates.
    #[default]
    Static,
    /// Heights sample 3D noise whose third axis advances with time.
    Animate,
    /// Static noise plus a lift under the pointer.
    Mouse,
}

impl HeightMode {
    /// Decodes the driver's numeric mode; unknown codes fall back to static.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => HeightMode::Animate,
            2 => HeightMode::Mouse,
            _ => HeightMode::Static,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            HeightMode::Static => 0,
            HeightMode::Animate => 1,
            HeightMode::Mouse => 2,
        }
    }

    /// Parses `static`, `animate` or `mouse`; anything else is static.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "animate" => HeightMode::Animate,
            "mouse" => HeightMode::Mouse,
            _ => HeightMode::Static,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeightMode::Static => "static",
            HeightMode::Animate => "animate",
            HeightMode::Mouse => "mouse",
        }
    }
}

/// Terrain height generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoiseParams {
    /// Spatial frequency applied to pixel coordinates.
    pub scale: f32,
    /// Final height multiplier.
    pub intensity: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub mode: HeightMode,
    /// Rate of the time axis in animate mode.
    pub anim_speed: f32,
    /// Fraction of height lost at the far corners relative to the center.
    pub falloff: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 0.003,
            intensity: 0.6,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            mode: HeightMode::Static,
            anim_speed: 0.01,
            falloff: 0.3,
        }
    }
}

impl NoiseParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            scale: param_f32(params, "scale", d.scale),
            intensity: param_f32(params, "intensity", d.intensity),
            octaves: param_u32(params, "octaves", d.octaves),
            persistence: param_f32(params, "persistence", d.persistence),
            lacunarity: param_f32(params, "lacunarity", d.lacunarity),
            mode: HeightMode::from_name(&param_string(params, "mode", d.mode.name())),
            anim_speed: param_f32(params, "animSpeed", d.anim_speed),
            falloff: param_f32(params, "falloff", d.falloff),
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            scale: clamp_f32(self.scale, 0.0001, 1.0),
            intensity: clamp_f32(self.intensity, 0.0, 2.0),
            octaves: self.octaves.clamp(1, 8),
            persistence: clamp_f32(self.persistence, 0.0, 1.0),
            lacunarity: clamp_f32(self.lacunarity, 1.0, 4.0),
            mode: self.mode,
            anim_speed: clamp_f32(self.anim_speed, 0.0, 1.0),
            falloff: clamp_f32(self.falloff, 0.0, 1.0),
        }
    }
}

/// Spring-back and damping of interaction displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsParams {
    /// Fraction of displacement removed per step.
    pub spring_back: f32,
    /// Per-step retention of displacement.
    pub damping: f32,
    /// How much pointer speed amplifies pointer forces.
    pub velocity_influence: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            spring_back: 0.06,
            damping: 0.92,
            velocity_influence: 0.3,
        }
    }
}

impl PhysicsParams {
    pub fn new(spring_back: f32, damping: f32, velocity_influence: f32) -> Self {
        Self {
            spring_back,
            damping,
            velocity_influence,
        }
        .clamped()
    }

    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self::new(
            param_f32(params, "springBack", d.spring_back),
            param_f32(params, "damping", d.damping),
            param_f32(params, "velocityInfluence", d.velocity_influence),
        )
    }

    pub fn clamped(self) -> Self {
        Self {
            spring_back: clamp_f32(self.spring_back, 0.0, 1.0),
            damping: clamp_f32(self.damping, 0.0, 1.0),
            velocity_influence: clamp_f32(self.velocity_influence, 0.0, 5.0),
        }
    }
}

/// Defaults for pointer interaction when the driver does not supply them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointerParams {
    pub radius: f32,
    pub strength: f32,
    /// Height added under the pointer in mouse height mode.
    pub height_influence: f32,
}

impl Default for PointerParams {
    fn default() -> Self {
        Self {
            radius: 150.0,
            strength: 80.0,
            height_influence: 0.3,
        }
    }
}

impl PointerParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            radius: param_f32(params, "radius", d.radius),
            strength: param_f32(params, "strength", d.strength),
            height_influence: param_f32(params, "heightInfluence", d.height_influence),
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            radius: clamp_f32(self.radius, 0.0, MAX_POINTER_RADIUS),
            strength: clamp_f32(self.strength, 0.0, MAX_POINTER_STRENGTH),
            height_influence: clamp_f32(self.height_influence, 0.0, 1.0),
        }
    }

    /// An in-bounds pointer at `position` with these radius and strength.
    pub fn pointer_at(&self, position: glam::Vec2, mode: PointerMode) -> PointerState {
        PointerState {
            position,
            in_bounds: true,
            radius: self.radius,
            strength: self.strength,
            mode,
        }
    }
}

/// Geometry of the point light and the shading response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightingParams {
    /// Height of the light above the plane, in pixels.
    pub elevation: f32,
    /// Full intensity within this distance of the light.
    pub near: f32,
    /// Intensity reaches `falloff_floor` at this distance.
    pub far: f32,
    pub falloff_floor: f32,
    pub shininess: f32,
    /// Vertical exaggeration of height when building normals.
    pub height_scale: f32,
    /// Intensity added per unit of average height.
    pub height_bonus: f32,
    /// Specular values at or below this are ignored.
    pub specular_threshold: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            elevation: 300.0,
            near: 200.0,
            far: 1200.0,
            falloff_floor: 0.3,
            shininess: 24.0,
            height_scale: 80.0,
            height_bonus: 0.15,
            specular_threshold: 0.05,
        }
    }
}

impl LightingParams {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            elevation: param_f32(params, "elevation", d.elevation),
            near: param_f32(params, "near", d.near),
            far: param_f32(params, "far", d.far),
            falloff_floor: param_f32(params, "falloffFloor", d.falloff_floor),
            shininess: param_f32(params, "shininess", d.shininess),
            height_scale: param_f32(params, "heightScale", d.height_scale),
            height_bonus: param_f32(params, "heightBonus", d.height_bonus),
            specular_threshold: param_f32(params, "specularThreshold", d.specular_threshold),
        }
        .clamped()
    }

    /// `far` is kept at or beyond `near`.
    pub fn clamped(self) -> Self {
        let near = clamp_f32(self.near, 0.0, MAX_DIMENSION);
        Self {
            elevation: clamp_f32(self.elevation, 1.0, MAX_DIMENSION),
            near,
            far: clamp_f32(self.far, near, MAX_DIMENSION),
            falloff_floor: clamp_f32(self.falloff_floor, 0.0, 1.0),
            shininess: clamp_f32(self.shininess, 1.0, 256.0),
            height_scale: clamp_f32(self.height_scale, 0.0, 1000.0),
            height_bonus: clamp_f32(self.height_bonus, 0.0, 1.0),
            specular_threshold: clamp_f32(self.specular_threshold, 0.0, 1.0),
        }
    }
}

/// Everything a simulation needs besides its dimensions, count and seed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub noise: NoiseParams,
    pub physics: PhysicsParams,
    pub pointer: PointerParams,
    pub lighting: LightingParams,
    pub theme: Theme,
}

impl SimulationConfig {
    /// Reads `{"noise": {...}, "physics": {...}, ...}`; missing groups use defaults.
    ///
    /// `theme` may be a built-in name or an object of overrides on the default.
    pub fn from_json(params: &Value) -> Self {
        let group = |key: &str| params.get(key).cloned().unwrap_or(Value::Null);
        let theme = match params.get("theme") {
            Some(Value::String(name)) => Theme::from_name(name).unwrap_or_default(),
            Some(obj @ Value::Object(_)) => Theme::from_json(obj, &Theme::default()),
            _ => Theme::default(),
        };
        Self {
            noise: NoiseParams::from_json(&group("noise")),
            physics: PhysicsParams::from_json(&group("physics")),
            pointer: PointerParams::from_json(&group("pointer")),
            lighting: LightingParams::from_json(&group("lighting")),
            theme,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            noise: self.noise.clamped(),
            physics: self.physics.clamped(),
            pointer: self.pointer.clamped(),
            lighting: self.lighting.clamped(),
            theme: self.theme.clamped(),
        }
    }
}
