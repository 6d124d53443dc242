//! Per-step interaction forces applied to point displacement.
//!
//! Each function gathers candidates from the spatial grid into a reused
//! scratch buffer, re-checks the exact distance, and pushes the point. Forces
//! are per step; time scaling only applies to drift.

use crate::effects::{
    GravityWell, Pointer, PointerMode, Shockwaves, GRAVITY_WELL_MAX_RANGE, GRAVITY_WELL_MIN_DIST,
    SHOCKWAVE_WAVE_WIDTH,
};
use crate::point::Point;
use crate::spatial::SpatialIndex;
use glam::Vec2;

/// Points closer than 1px to the pointer or a shockwave origin are skipped.
///
/// Range checks are written so that a NaN distance also skips the point.
pub const MIN_DIST_SQ: f32 = 1.0;

/// Scales pointer magnitude into pixels of displacement.
const POINTER_FORCE_SCALE: f32 = 0.08;
const PULL_FACTOR: f32 = 0.5;
const SWIRL_TANGENT_FACTOR: f32 = 0.7;
const SWIRL_OUTWARD_FACTOR: f32 = 0.2;

/// Hermite smoothstep of `t` clamped to [0, 1].
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Displacement direction and size for one point under the pointer.
///
/// `offset` points from the pointer to the point and is non-zero.
pub fn pointer_displacement(mode: PointerMode, offset: Vec2, magnitude: f32) -> Vec2 {
    let dir = offset.normalize_or_zero();
    match mode {
        PointerMode::Push => dir * magnitude,
        PointerMode::Pull => -dir * magnitude * PULL_FACTOR,
        PointerMode::Swirl => {
            let tangent = Vec2::new(-dir.y, dir.x);
            tangent * magnitude * SWIRL_TANGENT_FACTOR + dir * magnitude * SWIRL_OUTWARD_FACTOR
        }
    }
}

/// Pushes, pulls or swirls points inside the pointer radius.
///
/// With `lift > 0` the pointer also raises heights by `influence * lift`.
pub fn apply_pointer(
    points: &mut [Point],
    grid: &SpatialIndex,
    scratch: &mut Vec<usize>,
    pointer: &Pointer,
    velocity_influence: f32,
    lift: f32,
) {
    if !pointer.is_engaged() {
        return;
    }
    let state = pointer.state();
    let radius = state.radius;
    let boost = 1.0 + pointer.speed() * velocity_influence;

    scratch.clear();
    scratch.extend(grid.query_radius(state.position, radius));
    for &i in scratch.iter() {
        let p = &mut points[i];
        let offset = p.position - state.position;
        let dist_sq = offset.length_squared();
        if !(MIN_DIST_SQ..=radius * radius).contains(&dist_sq) {
            continue;
        }
        let influence = smoothstep(1.0 - dist_sq.sqrt() / radius);
        if lift > 0.0 {
            p.height += influence * lift;
        }
        let magnitude = state.strength * influence * boost * POINTER_FORCE_SCALE;
        p.push(pointer_displacement(state.mode, offset, magnitude));
    }
}

/// Pushes points caught in any shockwave ring radially outward.
pub fn apply_shockwaves(
    points: &mut [Point],
    grid: &SpatialIndex,
    scratch: &mut Vec<usize>,
    waves: &Shockwaves,
) {
    for wave in waves.iter() {
        scratch.clear();
        scratch.extend(grid.query_radius(wave.origin, wave.radius() + SHOCKWAVE_WAVE_WIDTH));
        for &i in scratch.iter() {
            let p = &mut points[i];
            let offset = p.position - wave.origin;
            let dist_sq = offset.length_squared();
            if !(MIN_DIST_SQ..).contains(&dist_sq) {
                continue;
            }
            let dist = dist_sq.sqrt();
            let push = wave.push_at(dist);
            if push > 0.0 {
                p.push(offset / dist * push);
            }
        }
    }
}

/// Draws points toward (or away from) the well within its range.
///
/// Distances below [`GRAVITY_WELL_MIN_DIST`] are raised to it, so points
/// right at the well still feel a bounded pull.
pub fn apply_gravity_well(
    points: &mut [Point],
    grid: &SpatialIndex,
    scratch: &mut Vec<usize>,
    well: &GravityWell,
) {
    scratch.clear();
    scratch.extend(grid.query_radius(well.position, GRAVITY_WELL_MAX_RANGE));
    for &i in scratch.iter() {
        let p = &mut points[i];
        let toward = well.position - p.position;
        let dist_sq = toward.length_squared();
        if !(0.0..=GRAVITY_WELL_MAX_RANGE * GRAVITY_WELL_MAX_RANGE).contains(&dist_sq) {
            continue;
        }
        let dist = dist_sq.sqrt().max(GRAVITY_WELL_MIN_DIST);
        p.push(toward / dist * well.force_at(dist));
    }
}
