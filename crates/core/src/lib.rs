#![deny(unsafe_code)]
//! Core of the terrain-mesh animation.
//!
//! A field of drifting points gets noise-driven heights and reacts to a
//! pointer, shockwaves and a gravity well. Each frame the points are
//! triangulated over a wrapping domain and every triangle is flat-shaded from
//! a single point light. [`Simulation`] ties the stages together and exposes
//! flat `f32` buffers for a renderer.

pub mod color;
pub mod config;
pub mod effects;
pub mod error;
pub mod lighting;
pub mod noise;
pub mod params;
pub mod physics;
pub mod point;
pub mod point_field;
pub mod prng;
pub mod scene;
pub mod simulation;
pub mod spatial;
pub mod theme;
pub mod triangulation;

pub use color::Rgba;
pub use config::{
    HeightMode, LightingParams, NoiseParams, PhysicsParams, PointerParams, SimulationConfig,
};
pub use effects::{GravityWell, PointerMode, PointerState, Shockwave};
pub use error::EngineError;
pub use lighting::LightingModel;
pub use noise::NoiseField;
pub use point::Point;
pub use point_field::PointField;
pub use prng::Xorshift32;
pub use scene::Scene;
pub use simulation::{BufferSizes, Simulation};
pub use spatial::SpatialIndex;
pub use theme::Theme;
pub use triangulation::{EdgeWrapTriangulator, GhostPoint, MeshVertex};
