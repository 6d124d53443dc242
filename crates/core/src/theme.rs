//! Surface colors and lighting weights consumed by the shading pass.
//!
//! Themes normally come from the driver. A handful of built-ins ship for the
//! command-line renderer and for tests.

use crate::color::Rgba;
use crate::error::EngineError;
use crate::params::{param_color, param_f32};
use serde::{Deserialize, Serialize};

/// Colors and weights for the lighting model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    /// Base color at the top of the canvas.
    pub gradient_start: Rgba,
    /// Base color at the bottom of the canvas.
    pub gradient_end: Rgba,
    /// Specular highlight color.
    pub light_color: Rgba,
    /// Color of fully unlit surfaces.
    pub shadow_color: Rgba,
    pub ambient_light: f32,
    pub shadow_intensity: f32,
    pub highlight_intensity: f32,
    /// Alpha applied to every shaded triangle.
    pub fill_opacity: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}

impl Theme {
    /// Names accepted by [`Theme::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        &["midnight", "ember", "glacier", "moss"]
    }

    /// Looks up a built-in theme by name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Theme, EngineError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "midnight" => Ok(Self::midnight()),
            "ember" => Ok(Self::ember()),
            "glacier" => Ok(Self::glacier()),
            "moss" => Ok(Self::moss()),
            _ => Err(EngineError::UnknownTheme(name.to_string())),
        }
    }

    /// Deep blue gradient with a cool highlight.
    pub fn midnight() -> Self {
        Self {
            gradient_start: Rgba::from_rgb8(0x1b, 0x26, 0x4f),
            gradient_end: Rgba::from_rgb8(0x27, 0x4c, 0x77),
            light_color: Rgba::from_rgb8(0xa8, 0xda, 0xdc),
            shadow_color: Rgba::from_rgb8(0x0b, 0x0f, 0x1e),
            ambient_light: 0.25,
            shadow_intensity: 0.7,
            highlight_intensity: 0.8,
            fill_opacity: 1.0,
        }
    }

    /// Warm reds fading to orange.
    pub fn ember() -> Self {
        Self {
            gradient_start: Rgba::from_rgb8(0x6a, 0x04, 0x0f),
            gradient_end: Rgba::from_rgb8(0xe8, 0x5d, 0x04),
            light_color: Rgba::from_rgb8(0xff, 0xba, 0x08),
            shadow_color: Rgba::from_rgb8(0x1a, 0x05, 0x05),
            ambient_light: 0.2,
            shadow_intensity: 0.75,
            highlight_intensity: 0.9,
            fill_opacity: 1.0,
        }
    }

    /// Pale blues with bright white highlights.
    pub fn glacier() -> Self {
        Self {
            gradient_start: Rgba::from_rgb8(0xca, 0xf0, 0xf8),
            gradient_end: Rgba::from_rgb8(0x00, 0x77, 0xb6),
            light_color: Rgba::WHITE,
            shadow_color: Rgba::from_rgb8(0x03, 0x04, 0x5e),
            ambient_light: 0.35,
            shadow_intensity: 0.6,
            highlight_intensity: 1.0,
            fill_opacity: 0.95,
        }
    }

    /// Muted greens.
    pub fn moss() -> Self {
        Self {
            gradient_start: Rgba::from_rgb8(0x58, 0x81, 0x57),
            gradient_end: Rgba::from_rgb8(0x34, 0x5e, 0x37),
            light_color: Rgba::from_rgb8(0xe9, 0xf5, 0xdb),
            shadow_color: Rgba::from_rgb8(0x13, 0x2a, 0x13),
            ambient_light: 0.3,
            shadow_intensity: 0.65,
            highlight_intensity: 0.6,
            fill_opacity: 1.0,
        }
    }

    /// Reads a theme from loose JSON, starting from `base` for missing keys.
    pub fn from_json(params: &serde_json::Value, base: &Theme) -> Theme {
        Theme {
            gradient_start: param_color(params, "gradientStart", base.gradient_start),
            gradient_end: param_color(params, "gradientEnd", base.gradient_end),
            light_color: param_color(params, "lightColor", base.light_color),
            shadow_color: param_color(params, "shadowColor", base.shadow_color),
            ambient_light: param_f32(params, "ambientLight", base.ambient_light),
            shadow_intensity: param_f32(params, "shadowIntensity", base.shadow_intensity),
            highlight_intensity: param_f32(params, "highlightIntensity", base.highlight_intensity),
            fill_opacity: param_f32(params, "fillOpacity", base.fill_opacity),
        }
        .clamped()
    }

    /// Weights and opacity clamped to [0, 1].
    pub fn clamped(self) -> Theme {
        Theme {
            ambient_light: unit(self.ambient_light),
            shadow_intensity: unit(self.shadow_intensity),
            highlight_intensity: unit(self.highlight_intensity),
            fill_opacity: unit(self.fill_opacity),
            ..self
        }
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_listed_name_resolves() {
        for name in Theme::list_names() {
            assert!(Theme::from_name(name).is_ok(), "missing theme {name}");
        }
    }

    #[test]
    fn from_name_ignores_case_and_whitespace() {
        assert_eq!(Theme::from_name("  Ember ").unwrap(), Theme::ember());
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            Theme::from_name("sunset"),
            Err(EngineError::UnknownTheme(n)) if n == "sunset"
        ));
    }

    #[test]
    fn builtins_are_already_clamped() {
        for name in Theme::list_names() {
            let t = Theme::from_name(name).unwrap();
            assert_eq!(t.clone().clamped(), t);
        }
    }

    #[test]
    fn from_json_overrides_and_clamps() {
        let t = Theme::from_json(
            &json!({"lightColor": "#00ff00", "ambientLight": 4.0, "fillOpacity": "x"}),
            &Theme::midnight(),
        );
        assert_eq!(t.light_color.to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(t.ambient_light, 1.0);
        assert_eq!(t.fill_opacity, Theme::midnight().fill_opacity);
        assert_eq!(t.gradient_start, Theme::midnight().gradient_start);
    }

    #[test]
    fn serde_uses_camel_case_and_css_colors() {
        let v = serde_json::to_value(Theme::moss()).unwrap();
        assert!(v.get("gradientStart").unwrap().as_str().unwrap().starts_with("rgba("));
        assert!(v.get("fillOpacity").is_some());
    }

    #[test]
    fn partial_json_deserializes_over_defaults() {
        let t: Theme = serde_json::from_str(r##"{"shadowColor": "#000"}"##).unwrap();
        assert_eq!(t.shadow_color, Rgba::BLACK);
        assert_eq!(t.gradient_end, Theme::default().gradient_end);
    }
}
