//! Lenient extraction of typed settings from a `serde_json::Value` object.
//!
//! Scene files and the browser driver hand settings over as loose JSON. Each
//! helper looks up one key and falls back to the default when the key is
//! missing, null, or of the wrong type. None of them fail.

use crate::color::Rgba;
use serde_json::Value;

/// Extracts an `f32` from `params[name]`.
///
/// Values that are not finite after narrowing fall back to `default`.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Extracts a `u32` from `params[name]`, saturating values above `u32::MAX`.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(default)
}

/// Extracts a `String` from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Extracts a color string from `params[name]` and parses it.
///
/// Unparseable strings fall back to `default` like any other mistyped value.
pub fn param_color(params: &Value, name: &str, default: Rgba) -> Rgba {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Rgba::parse(s).ok())
        .unwrap_or(default)
}
