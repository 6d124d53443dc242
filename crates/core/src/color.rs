//! RGBA color type with CSS-style parsing and linear interpolation.
//!
//! Themes hand colors over as strings (`"#1a2b3c"`, `"rgb(26, 43, 60)"`,
//! `"rgba(26, 43, 60, 0.5)"`); the lighting model works on the parsed
//! components. Components are `f32` in [0, 1] to match the vertex buffers.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight (non-premultiplied) RGBA color with components in [0, 1].
///
/// Serializes as a CSS `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    /// Opaque color from components in [0, 1].
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Same color with a different alpha, clamped to [0, 1].
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    ///
    /// Functional channels are 0–255, alpha is 0–1. Whitespace and case are
    /// ignored. Returns `EngineError::InvalidColor` for anything else.
    pub fn parse(input: &str) -> Result<Rgba, EngineError> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex_digits(hex)
                .map_err(|e| EngineError::InvalidColor(format!("{input}: {e}")));
        }
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::from_functional(body)
                .map_err(|e| EngineError::InvalidColor(format!("{input}: {e}")));
        }
        Err(EngineError::InvalidColor(format!(
            "{input}: expected #hex, rgb() or rgba()"
        )))
    }

    fn from_hex_digits(hex: &str) -> Result<Rgba, String> {
        if !hex.is_ascii() {
            return Err("non-ascii hex digits".to_string());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("bad hex digit: {e}"))
        };
        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Self::from_rgb8(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)
                .with_alpha(channel(6..8)? as f32 / 255.0)),
            n => Err(format!("expected 3, 6 or 8 hex digits, got {n}")),
        }
    }

    fn from_functional(body: &str) -> Result<Rgba, String> {
        let parts: Vec<f32> = body
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f32>()
                    .map_err(|e| format!("bad channel '{}': {e}", p.trim()))
            })
            .collect::<Result<_, _>>()?;
        let channel = |v: f32| (v / 255.0).clamp(0.0, 1.0);
        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(channel(*r), channel(*g), channel(*b))),
            [r, g, b, a] => Ok(Self::rgb(channel(*r), channel(*g), channel(*b)).with_alpha(*a)),
            other => Err(format!("expected 3 or 4 channels, got {}", other.len())),
        }
    }

    /// Formats as `rgba(r, g, b, a)` with 8-bit color channels.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {})", round_alpha(self.a))
    }

    /// Quantizes to four 8-bit channels with rounding.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Component-wise linear interpolation; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Alpha printed with at most three decimals and no trailing zeros.
fn round_alpha(a: f32) -> f32 {
    (a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}
