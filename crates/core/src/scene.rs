//! Reproducible description of a simulation run.
//!
//! A [`Scene`] captures everything needed to replay a frame: dimensions,
//! point count, seed, how many steps to take and at what rate, and the full
//! configuration. The same scene always yields bit-identical buffers.

use crate::config::SimulationConfig;
use crate::effects::PointerState;
use crate::error::EngineError;
use crate::simulation::Simulation;
use serde::{Deserialize, Serialize};

fn default_rate() -> f32 {
    1.0
}

/// Serializable recipe for a [`Simulation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub point_count: usize,
    pub seed: u32,
    #[serde(default)]
    pub steps: usize,
    #[serde(default = "default_rate")]
    pub dt: f32,
    #[serde(default = "default_rate")]
    pub speed: f32,
    #[serde(default)]
    pub config: SimulationConfig,
}

impl Scene {
    /// Scene with default configuration, no steps and unit rates.
    pub fn new(width: f32, height: f32, point_count: usize, seed: u32) -> Self {
        Self {
            width,
            height,
            point_count,
            seed,
            steps: 0,
            dt: 1.0,
            speed: 1.0,
            config: SimulationConfig::default(),
        }
    }

    /// Parses and validates a JSON scene.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let scene: Scene =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidScene(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Rejects scenes that clamping would silently rescue from nonsense:
    /// zero or non-finite dimensions, zero points, non-finite rates.
    pub fn validate(&self) -> Result<(), EngineError> {
        let valid_dim = |v: f32| v.is_finite() && v > 0.0;
        if !valid_dim(self.width) || !valid_dim(self.height) {
            return Err(EngineError::InvalidDimensions);
        }
        if self.point_count == 0 {
            return Err(EngineError::InvalidScene(
                "point count must be at least 1".to_string(),
            ));
        }
        if !self.dt.is_finite() || !self.speed.is_finite() {
            return Err(EngineError::InvalidScene(
                "dt and speed must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates the simulation without stepping it.
    pub fn build(&self) -> Simulation {
        Simulation::with_config(
            self.width,
            self.height,
            self.point_count,
            self.seed,
            &self.config,
        )
    }

    /// Builds the simulation and runs `steps` steps with the pointer idle.
    pub fn run(&self) -> Simulation {
        let mut sim = self.build();
        for _ in 0..self.steps {
            sim.step(self.dt, self.speed, PointerState::disabled());
        }
        sim
    }
}
