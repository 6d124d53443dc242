//! End-to-end checks across physics, triangulation and shading.

use glam::Vec2;
use terrain_mesh_core::{
    NoiseField, Point, PointField, PointerState, Scene, Simulation, SpatialIndex, Xorshift32,
};

fn scenario() -> Simulation {
    let mut sim = Simulation::new(800.0, 600.0, 50, 42);
    sim.step(1.0, 1.0, PointerState::disabled());
    sim
}

// -- Full frame --

#[test]
fn single_step_produces_bounded_deterministic_mesh() {
    let sim = scenario();
    assert!(sim.triangle_count() > 0);

    for v in sim.triangle_vertices().chunks_exact(6) {
        assert!((-120.0..=920.0).contains(&v[0]), "x out of range: {}", v[0]);
        assert!((-90.0..=690.0).contains(&v[1]), "y out of range: {}", v[1]);
    }
    for p in sim.point_vertices().chunks_exact(2) {
        assert!((0.0..800.0).contains(&p[0]));
        assert!((0.0..600.0).contains(&p[1]));
    }

    let again = scenario();
    let bits = |s: &Simulation| -> Vec<u32> {
        s.triangle_vertices().iter().map(|f| f.to_bits()).collect()
    };
    assert_eq!(bits(&sim), bits(&again));
    assert_eq!(sim.color_vertices(), again.color_vertices());
    assert_eq!(sim.stroke_vertices(), again.stroke_vertices());
}

#[test]
fn scene_replays_the_same_frame_as_direct_stepping() {
    let mut scene = Scene::new(800.0, 600.0, 50, 42);
    scene.steps = 1;
    let replayed = scene.run();
    assert_eq!(replayed.triangle_vertices(), scenario().triangle_vertices());
}

#[test]
fn triangle_buffer_is_whole_triangles_for_any_count() {
    for count in [3, 4, 10, 100, 1000] {
        let mut sim = Simulation::new(640.0, 480.0, count, 9);
        let n = sim.step(1.0, 1.0, PointerState::disabled()) as usize;
        assert!(n >= 1, "{count} points gave no triangles");
        assert_eq!(sim.triangle_vertices().len(), n * 18);
    }
}

// -- Noise --

#[test]
fn noise_is_reproducible_after_reseeding() {
    let mut noise = NoiseField::new(99);
    let a = noise.noise2(12.34, 56.78);
    let f = noise.fbm3(1.5, 2.5, 3.5, 4, 0.5, 2.0);
    noise.seed(7);
    noise.seed(99);
    assert_eq!(noise.noise2(12.34, 56.78).to_bits(), a.to_bits());
    assert_eq!(noise.fbm3(1.5, 2.5, 3.5, 4, 0.5, 2.0).to_bits(), f.to_bits());
}

// -- Spatial index --

#[test]
fn grid_query_matches_brute_force_after_filtering() {
    let mut rng = Xorshift32::new(2024);
    let points: Vec<Vec2> = (0..2000)
        .map(|_| Vec2::new(rng.next_f32() * 1000.0, rng.next_f32() * 1000.0))
        .collect();
    let mut grid = SpatialIndex::new(1000.0, 1000.0, 75.0);
    grid.rebuild(points.iter().copied(), 1000.0, 1000.0, 75.0);

    for (center, radius) in [
        (Vec2::new(500.0, 500.0), 150.0),
        (Vec2::new(0.0, 0.0), 80.0),
        (Vec2::new(990.0, 10.0), 300.0),
    ] {
        let mut hits: Vec<usize> = grid
            .query_radius(center, radius)
            .filter(|&i| points[i].distance(center) <= radius)
            .collect();
        hits.sort_unstable();
        let brute: Vec<usize> = (0..points.len())
            .filter(|&i| points[i].distance(center) <= radius)
            .collect();
        assert_eq!(hits, brute);
    }
}

// -- Wrap --

#[test]
fn point_crossing_right_edge_reappears_on_left() {
    let mut p = Point::new(Vec2::new(800.0 - 0.5, 300.0), Vec2::new(1.0, 0.0));
    p.advance_drift(1.0, 800.0, 600.0);
    assert!((p.base.x - 0.5).abs() < 1e-3);
    assert_eq!(p.base.y, 300.0);
}

#[test]
fn field_drift_never_leaves_domain() {
    let mut field = PointField::new(200.0, 100.0, 300, 5);
    for _ in 0..500 {
        field.step(3.0, 2.0);
    }
    for p in field.points() {
        assert!(p.base.x >= 0.0 && p.base.x < 200.0);
        assert!(p.base.y >= 0.0 && p.base.y < 100.0);
    }
}

// -- Effects --

#[test]
fn shockwave_weakens_every_step_then_expires() {
    let mut field = PointField::new(800.0, 600.0, 200, 3);
    field.trigger_shockwave(400.0, 300.0, 100.0);
    let mut last = f32::MAX;
    let mut steps = 0;
    loop {
        let next = field.shockwaves().iter().next().copied();
        let Some(wave) = next else { break };
        assert!(wave.strength < last);
        last = wave.strength;
        field.step(1.0, 0.0);
        steps += 1;
        assert!(steps < 500, "shockwave never expired");
    }
    assert!(field.shockwaves().is_empty());
}

#[test]
fn shockwave_push_on_ring_shrinks_with_age() {
    let mut field = PointField::new(800.0, 600.0, 10, 3);
    field.trigger_shockwave(400.0, 300.0, 300.0);
    let mut last = f32::MAX;
    for _ in 0..20 {
        field.step(1.0, 0.0);
        let Some(wave) = field.shockwaves().iter().next() else {
            break;
        };
        let peak = wave.push_at(wave.radius());
        assert!(peak < last);
        last = peak;
    }
}

#[test]
fn gravity_well_sign_controls_direction() {
    let well = Vec2::new(400.0, 300.0);
    for attract in [true, false] {
        let mut field = PointField::new(800.0, 600.0, 200, 11);
        field.set_gravity_well(well.x, well.y, true, attract);
        let before: Vec<f32> = field.points().iter().map(|p| p.position.distance(well)).collect();
        field.step(1.0, 0.0);
        for (d0, p) in before.iter().zip(field.points()) {
            if *d0 <= 1.0 || *d0 > 1000.0 {
                continue;
            }
            let d1 = p.position.distance(well);
            if attract {
                assert!(d1 < *d0, "attract: {d0} -> {d1}");
            } else {
                assert!(d1 > *d0, "repel: {d0} -> {d1}");
            }
        }
    }
}

#[test]
fn heights_stay_in_unit_range_under_every_effect() {
    let mut sim = Simulation::new(500.0, 400.0, 400, 77);
    sim.set_noise_params(1.0, 2.0);
    sim.set_gravity_well(250.0, 200.0, true, false);
    for i in 0..60 {
        if i % 5 == 0 {
            sim.trigger_shockwave(250.0, 200.0, 500.0);
        }
        sim.step(
            10.0,
            10.0,
            PointerState {
                position: Vec2::new(250.0, 200.0),
                in_bounds: true,
                radius: 2000.0,
                strength: 1000.0,
                mode: terrain_mesh_core::PointerMode::from_code(i % 3),
            },
        );
        for p in sim.field().points() {
            assert!((0.0..=1.0).contains(&p.height));
        }
        for v in sim.triangle_vertices().chunks_exact(6) {
            assert!((0.0..=1.0).contains(&v[2]));
        }
    }
}

// -- Non-finite input --

fn assert_frame_is_sound(sim: &Simulation) {
    assert!(sim.triangle_count() > 0);
    for p in sim.field().points() {
        assert!(p.position.is_finite(), "point left the plane: {:?}", p.position);
        assert!(p.height.is_finite());
    }
    assert!(sim.triangle_vertices().iter().all(|v| v.is_finite()));
    assert!(sim.color_vertices().iter().all(|v| v.is_finite()));
}

#[test]
fn nan_pointer_position_leaves_the_mesh_intact() {
    let mut sim = Simulation::new(800.0, 600.0, 200, 11);
    for position in [
        Vec2::new(f32::NAN, 300.0),
        Vec2::new(400.0, f32::INFINITY),
        Vec2::splat(f32::NEG_INFINITY),
    ] {
        sim.step(
            1.0,
            1.0,
            PointerState {
                position,
                in_bounds: true,
                radius: 200.0,
                strength: 100.0,
                mode: terrain_mesh_core::PointerMode::Swirl,
            },
        );
        assert_frame_is_sound(&sim);
    }
}

#[test]
fn non_finite_gravity_well_is_rejected() {
    let mut sim = Simulation::new(800.0, 600.0, 200, 11);
    sim.set_gravity_well(f32::NAN, 300.0, true, true);
    assert!(sim.field().gravity_well().is_none());
    sim.step(1.0, 1.0, PointerState::disabled());
    assert_frame_is_sound(&sim);

    sim.set_gravity_well(400.0, 300.0, true, true);
    sim.update_gravity_well_position(f32::INFINITY, 300.0);
    assert_eq!(
        sim.field().gravity_well().map(|w| w.position),
        Some(Vec2::new(400.0, 300.0))
    );
    for _ in 0..5 {
        sim.step(1.0, 1.0, PointerState::disabled());
        assert_frame_is_sound(&sim);
    }
}

#[test]
fn non_finite_shockwave_origin_is_dropped() {
    let mut sim = Simulation::new(800.0, 600.0, 200, 11);
    sim.trigger_shockwave(f32::NAN, 300.0, 500.0);
    sim.trigger_shockwave(400.0, f32::NEG_INFINITY, 500.0);
    assert!(sim.field().shockwaves().is_empty());
    sim.step(1.0, 1.0, PointerState::disabled());
    assert_frame_is_sound(&sim);
}

// -- Shockwave reach --

#[test]
fn shockwave_outside_the_domain_lives_until_it_clears_the_far_corner() {
    let mut field = PointField::new(800.0, 600.0, 50, 5);
    field.trigger_shockwave(1500.0, 300.0, 500.0);
    // The diagonal is 1000px; the far corner is ~1529.7px away.
    for _ in 0..88 {
        field.step(1.0, 0.0);
    }
    assert_eq!(field.shockwaves().len(), 1);
    for _ in 88..132 {
        field.step(1.0, 0.0);
    }
    assert_eq!(field.shockwaves().len(), 1);
    field.step(1.0, 0.0);
    assert!(field.shockwaves().is_empty());
}
