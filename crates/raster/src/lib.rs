#![deny(unsafe_code)]
//! CPU rendering of terrain-mesh frames.
//!
//! Turns the shaded triangles of a [`terrain_mesh_core::Simulation`] into an
//! RGBA8 pixel buffer and, with the `png` feature, writes it to disk.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{frame_size, frame_to_rgba};
