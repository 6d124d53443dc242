//! Flat per-triangle shading from a single elevated point light.
//!
//! The base color is a vertical gradient. A surface normal built from the
//! height-exaggerated triangle drives a Lambert diffuse term and a Phong
//! highlight, both attenuated with planar distance to the light. Higher
//! terrain gets a flat brightness bonus.

use crate::color::Rgba;
use crate::config::LightingParams;
use crate::theme::Theme;
use crate::triangulation::MeshVertex;
use glam::{Vec2, Vec3};

/// Share of the diffuse term in the lit intensity; the rest is constant.
const DIFFUSE_WEIGHT: f32 = 0.6;
const DIFFUSE_BASE: f32 = 0.4;
/// Scales the highlight blend toward the light color.
const HIGHLIGHT_WEIGHT: f32 = 0.6;

/// Intermediate terms of one shading evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingTerms {
    pub normal: Vec3,
    pub diffuse: f32,
    pub specular: f32,
    pub falloff: f32,
    pub intensity: f32,
}

/// Lighting parameters plus the theme colors they blend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightingModel {
    params: LightingParams,
    theme: Theme,
}

impl LightingModel {
    pub fn new(params: LightingParams, theme: Theme) -> Self {
        Self {
            params: params.clamped(),
            theme: theme.clamped(),
        }
    }

    pub fn params(&self) -> &LightingParams {
        &self.params
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_params(&mut self, params: LightingParams) {
        self.params = params.clamped();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme.clamped();
    }

    /// Computes the lighting terms for one triangle.
    pub fn terms(&self, tri: &[MeshVertex; 3], light: Vec2) -> ShadingTerms {
        let p = &self.params;
        let centroid = (tri[0].position + tri[1].position + tri[2].position) / 3.0;
        let avg_height = (tri[0].height + tri[1].height + tri[2].height) / 3.0;

        let normal = surface_normal(tri, p.height_scale);
        let to_light = (light - centroid).extend(p.elevation).normalize_or_zero();
        let n_dot_l = normal.dot(to_light);
        let diffuse = n_dot_l.max(0.0);

        let specular = if n_dot_l > 0.0 {
            let reflected = 2.0 * n_dot_l * normal - to_light;
            reflected.dot(Vec3::Z).max(0.0).powf(p.shininess)
        } else {
            0.0
        };

        let falloff = distance_falloff(centroid.distance(light), p);
        let t = &self.theme;
        let lit = (diffuse * DIFFUSE_WEIGHT + DIFFUSE_BASE) * t.shadow_intensity * falloff;
        let intensity = clamp01(t.ambient_light + lit + avg_height * p.height_bonus);

        ShadingTerms {
            normal,
            diffuse,
            specular,
            falloff,
            intensity,
        }
    }

    /// Flat color of one triangle. `domain_height` positions the gradient.
    pub fn shade(&self, tri: &[MeshVertex; 3], light: Vec2, domain_height: f32) -> Rgba {
        let terms = self.terms(tri, light);
        let t = &self.theme;

        let cy = (tri[0].position.y + tri[1].position.y + tri[2].position.y) / 3.0;
        let gradient_t = if domain_height > 0.0 {
            cy / domain_height
        } else {
            0.0
        };
        let base = t.gradient_start.lerp(t.gradient_end, gradient_t);
        let mut color = t.shadow_color.lerp(base, terms.intensity);

        if terms.specular > self.params.specular_threshold {
            let amount = terms.specular * t.highlight_intensity * terms.falloff * HIGHLIGHT_WEIGHT;
            color = color.lerp(t.light_color, amount);
        }
        color.with_alpha(t.fill_opacity)
    }
}

/// Unit normal of the triangle with heights scaled by `height_scale`,
/// oriented toward the viewer. Degenerate triangles face straight up.
pub fn surface_normal(tri: &[MeshVertex; 3], height_scale: f32) -> Vec3 {
    let v = |m: &MeshVertex| m.position.extend(m.height * height_scale);
    let (a, b, c) = (v(&tri[0]), v(&tri[1]), v(&tri[2]));
    let n = (b - a).cross(c - a).normalize_or_zero();
    if n == Vec3::ZERO {
        Vec3::Z
    } else if n.z < 0.0 {
        -n
    } else {
        n
    }
}

/// 1 within `near`, linearly down to `falloff_floor` at `far`, flat beyond.
pub fn distance_falloff(dist: f32, p: &LightingParams) -> f32 {
    if dist <= p.near {
        1.0
    } else if dist >= p.far {
        p.falloff_floor
    } else {
        let t = (dist - p.near) / (p.far - p.near);
        1.0 - t * (1.0 - p.falloff_floor)
    }
}

fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
