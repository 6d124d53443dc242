//! Error types for the terrain-mesh core.
//!
//! The simulation itself never fails: out-of-range parameters are clamped and
//! degenerate geometry produces an empty frame. These errors only surface at
//! the boundaries where text or files come in or go out.

use thiserror::Error;

/// Errors produced at the boundaries of the core.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A theme name did not match any built-in theme.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A scene description was structurally invalid.
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// Reading or writing an artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}
