//! Scan conversion of a shaded frame into an RGBA8 pixel buffer.
//!
//! Always available (no feature gate) so the PNG path and any in-memory
//! consumer share the same conversion.

use terrain_mesh_core::{Rgba, Simulation};

/// Pixel dimensions of a frame: the domain rounded up to whole pixels.
pub fn frame_size(sim: &Simulation) -> (usize, usize) {
    (
        sim.width().ceil().max(1.0) as usize,
        sim.height().ceil().max(1.0) as usize,
    )
}

/// Rasterizes every triangle of the current frame over an opaque background.
///
/// Triangles are filled in buffer order with source-over blending using each
/// triangle's alpha. A pixel is covered when its center lies inside or on the
/// triangle; zero-area triangles cover nothing. The buffer length is
/// `width * height * 4` and every alpha byte is 255.
pub fn frame_to_rgba(sim: &Simulation, background: Rgba) -> Vec<u8> {
    let (width, height) = frame_size(sim);
    let mut rgb: Vec<[f32; 3]> = vec![[background.r, background.g, background.b]; width * height];

    let vertices = sim.triangle_vertices();
    for (tri, color) in vertices.chunks_exact(18).zip(sim.triangle_colors()) {
        let corners = [[tri[0], tri[1]], [tri[6], tri[7]], [tri[12], tri[13]]];
        fill_triangle(&mut rgb, width, height, corners, *color);
    }

    rgb.iter()
        .flat_map(|&[r, g, b]| {
            let [r, g, b, _] = Rgba::rgb(r, g, b).to_rgba8();
            [r, g, b, 255]
        })
        .collect()
}

#[inline]
fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

fn fill_triangle(
    rgb: &mut [[f32; 3]],
    width: usize,
    height: usize,
    [a, b, c]: [[f32; 2]; 3],
    color: Rgba,
) {
    let area = edge(a, b, c);
    if area.abs() <= f32::EPSILON || !area.is_finite() {
        return;
    }
    // Orient counter-clockwise so "inside" means all edge values >= 0.
    let (b, c) = if area < 0.0 { (c, b) } else { (b, c) };

    let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0) as usize;
    let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0) as usize;
    let max_x = (a[0].max(b[0]).max(c[0]).ceil().max(0.0) as usize).min(width);
    let max_y = (a[1].max(b[1]).max(c[1]).ceil().max(0.0) as usize).min(height);

    let alpha = color.a.clamp(0.0, 1.0);
    let src = [color.r * alpha, color.g * alpha, color.b * alpha];
    let keep = 1.0 - alpha;

    for y in min_y..max_y {
        let row = y * width;
        for x in min_x..max_x {
            let p = [x as f32 + 0.5, y as f32 + 0.5];
            if edge(a, b, p) >= 0.0 && edge(b, c, p) >= 0.0 && edge(c, a, p) >= 0.0 {
                for (d, s) in rgb[row + x].iter_mut().zip(src) {
                    *d = s + *d * keep;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_mesh_core::PointerState;

    fn solid(r: f32, g: f32, b: f32) -> Rgba {
        Rgba::rgb(r, g, b)
    }

    #[test]
    fn buffer_has_one_opaque_pixel_per_domain_pixel() {
        let sim = Simulation::new(64.0, 48.0, 30, 1);
        let buf = frame_to_rgba(&sim, Rgba::BLACK);
        assert_eq!(buf.len(), 64 * 48 * 4);
        assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn fractional_domain_rounds_up() {
        let sim = Simulation::new(10.5, 7.2, 10, 1);
        assert_eq!(frame_size(&sim), (11, 8));
        assert_eq!(frame_to_rgba(&sim, Rgba::WHITE).len(), 11 * 8 * 4);
    }

    #[test]
    fn mesh_covers_the_whole_canvas() {
        // Ghost points extend the mesh past every edge, so no background
        // pixel should survive with an opaque theme.
        let mut sim = Simulation::new(120.0, 90.0, 1000, 4);
        sim.step(1.0, 1.0, PointerState::disabled());
        let magenta = solid(1.0, 0.0, 1.0);
        let buf = frame_to_rgba(&sim, magenta);
        let leaked = buf
            .chunks_exact(4)
            .filter(|px| px[..3] == magenta.to_rgba8()[..3])
            .count();
        assert_eq!(leaked, 0);
    }

    #[test]
    fn fill_triangle_covers_inside_only() {
        let mut rgb = vec![[0.0; 3]; 10 * 10];
        fill_triangle(
            &mut rgb,
            10,
            10,
            [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]],
            solid(1.0, 1.0, 1.0),
        );
        assert_eq!(rgb[0], [1.0; 3]);
        assert_eq!(rgb[9 * 10 + 9], [0.0; 3]);
    }

    #[test]
    fn fill_triangle_ignores_winding() {
        let mut cw = vec![[0.0; 3]; 16];
        let mut ccw = vec![[0.0; 3]; 16];
        let white = solid(1.0, 1.0, 1.0);
        fill_triangle(&mut cw, 4, 4, [[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]], white);
        fill_triangle(&mut ccw, 4, 4, [[0.0, 0.0], [0.0, 4.0], [4.0, 0.0]], white);
        assert_eq!(cw, ccw);
    }

    #[test]
    fn translucent_fill_blends_over_background() {
        let mut rgb = vec![[0.0, 0.0, 1.0]; 4];
        fill_triangle(
            &mut rgb,
            2,
            2,
            [[-1.0, -1.0], [10.0, -1.0], [-1.0, 10.0]],
            solid(1.0, 0.0, 0.0).with_alpha(0.5),
        );
        assert_eq!(rgb[0], [0.5, 0.0, 0.5]);
    }

    #[test]
    fn degenerate_and_offscreen_triangles_draw_nothing() {
        let mut rgb = vec![[0.0; 3]; 25];
        let white = solid(1.0, 1.0, 1.0);
        fill_triangle(&mut rgb, 5, 5, [[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]], white);
        fill_triangle(&mut rgb, 5, 5, [[-9.0, -9.0], [-5.0, -9.0], [-9.0, -5.0]], white);
        fill_triangle(&mut rgb, 5, 5, [[50.0, 50.0], [60.0, 50.0], [50.0, 60.0]], white);
        assert!(rgb.iter().all(|px| *px == [0.0; 3]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn never_panics_on_arbitrary_triangles(
                coords in proptest::array::uniform6(-100.0_f32..200.0),
                alpha in 0.0_f32..=1.0,
            ) {
                let mut rgb = vec![[0.0; 3]; 50 * 50];
                fill_triangle(
                    &mut rgb,
                    50,
                    50,
                    [[coords[0], coords[1]], [coords[2], coords[3]], [coords[4], coords[5]]],
                    Rgba::rgb(0.3, 0.6, 0.9).with_alpha(alpha),
                );
                for px in &rgb {
                    for &c in px {
                        prop_assert!((0.0..=1.0001).contains(&c));
                    }
                }
            }
        }
    }
}
