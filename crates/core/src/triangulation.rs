//! Delaunay triangulation over a wrapping domain.
//!
//! Points near an edge are duplicated across it as ghosts so the mesh has no
//! seam where drifting points leave one side and re-enter the other. The
//! geometry is planar; heights ride along for shading.

use crate::point::Point;
use delaunator::EMPTY;
use glam::Vec2;
use log::trace;

/// Fraction of each dimension, measured from an edge, that spawns ghosts.
pub const GHOST_THRESHOLD: f32 = 0.15;

/// Position and height of one mesh vertex, real or ghost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec2,
    pub height: f32,
}

/// Copy of a real point shifted by the domain size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostPoint {
    pub position: Vec2,
    pub height: f32,
    /// Index of the real point this duplicates.
    pub source_index: usize,
}

/// Appends ghosts for every point within `threshold * dimension` of an edge.
///
/// One ghost per nearby edge, plus the diagonal ghost near a corner.
pub fn extend_ghosts(
    points: &[Point],
    width: f32,
    height: f32,
    threshold: f32,
    out: &mut Vec<GhostPoint>,
) {
    let tx = width * threshold;
    let ty = height * threshold;
    for (source_index, p) in points.iter().enumerate() {
        let Vec2 { x, y } = p.position;
        let dx = if x < tx {
            Some(width)
        } else if x > width - tx {
            Some(-width)
        } else {
            None
        };
        let dy = if y < ty {
            Some(height)
        } else if y > height - ty {
            Some(-height)
        } else {
            None
        };

        let offsets = [
            dx.map(|dx| Vec2::new(dx, 0.0)),
            dy.map(|dy| Vec2::new(0.0, dy)),
            dx.zip(dy).map(|(dx, dy)| Vec2::new(dx, dy)),
        ];
        out.extend(offsets.into_iter().flatten().map(|offset| GhostPoint {
            position: p.position + offset,
            height: p.height,
            source_index,
        }));
    }
}

/// Ghosts for `points`, collected into a fresh vector.
pub fn generate_ghosts(points: &[Point], width: f32, height: f32, threshold: f32) -> Vec<GhostPoint> {
    let mut out = Vec::new();
    extend_ghosts(points, width, height, threshold, &mut out);
    out
}

/// Borrowed view of the last triangulation.
#[derive(Debug, Clone, Copy)]
pub struct Mesh<'a> {
    /// Vertex index triples into `vertices`.
    pub triangles: &'a [usize],
    /// Opposite half-edge per half-edge, `delaunator::EMPTY` on the hull.
    pub halfedges: &'a [usize],
    /// Real points first, then ghosts.
    pub vertices: &'a [MeshVertex],
    /// Vertices below this index are real points.
    pub real_count: usize,
}

impl<'a> Mesh<'a> {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn iter_triangles(&self) -> impl Iterator<Item = [MeshVertex; 3]> + 'a {
        let vertices = self.vertices;
        self.triangles
            .chunks_exact(3)
            .map(move |t| [vertices[t[0]], vertices[t[1]], vertices[t[2]]])
    }

    /// Every edge once: shared interior edges are reported by one side only.
    pub fn unique_edges(&self) -> impl Iterator<Item = (MeshVertex, MeshVertex)> + 'a {
        let Mesh {
            triangles,
            halfedges,
            vertices,
            ..
        } = *self;
        (0..triangles.len())
            .filter(move |&e| halfedges[e] == EMPTY || e > halfedges[e])
            .map(move |e| (vertices[triangles[e]], vertices[triangles[next_halfedge(e)]]))
    }
}

#[inline]
fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

/// Triangulates real points plus ghosts, reusing its buffers across calls.
#[derive(Debug, Clone)]
pub struct EdgeWrapTriangulator {
    threshold: f32,
    ghosts: Vec<GhostPoint>,
    vertices: Vec<MeshVertex>,
    coords: Vec<delaunator::Point>,
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    real_count: usize,
}

impl Default for EdgeWrapTriangulator {
    fn default() -> Self {
        Self::new(GHOST_THRESHOLD)
    }
}

impl EdgeWrapTriangulator {
    /// Threshold is clamped to [0, 0.5].
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: if threshold.is_nan() {
                GHOST_THRESHOLD
            } else {
                threshold.clamp(0.0, 0.5)
            },
            ghosts: Vec::new(),
            vertices: Vec::new(),
            coords: Vec::new(),
            triangles: Vec::new(),
            halfedges: Vec::new(),
            real_count: 0,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Ghosts produced by the last call.
    pub fn ghosts(&self) -> &[GhostPoint] {
        &self.ghosts
    }

    /// Real index behind any vertex index of the last mesh.
    pub fn source_index(&self, vertex: usize) -> usize {
        if vertex < self.real_count {
            vertex
        } else {
            self.ghosts[vertex - self.real_count].source_index
        }
    }

    /// The last mesh.
    pub fn mesh(&self) -> Mesh<'_> {
        Mesh {
            triangles: &self.triangles,
            halfedges: &self.halfedges,
            vertices: &self.vertices,
            real_count: self.real_count,
        }
    }

    /// Rebuilds the mesh for `points` in a `width x height` wrapping domain.
    ///
    /// Fewer than three points, or a fully collinear set, yields no triangles.
    pub fn triangulate(&mut self, points: &[Point], width: f32, height: f32) -> Mesh<'_> {
        self.ghosts.clear();
        self.vertices.clear();
        self.coords.clear();
        self.triangles.clear();
        self.halfedges.clear();
        self.real_count = points.len();

        self.vertices.extend(points.iter().map(|p| MeshVertex {
            position: p.position,
            height: p.height,
        }));
        if points.len() < 3 {
            return self.mesh();
        }

        extend_ghosts(points, width, height, self.threshold, &mut self.ghosts);
        self.vertices.extend(self.ghosts.iter().map(|g| MeshVertex {
            position: g.position,
            height: g.height,
        }));

        self.coords.extend(self.vertices.iter().map(|v| delaunator::Point {
            x: v.position.x as f64,
            y: v.position.y as f64,
        }));
        let result = delaunator::triangulate(&self.coords);
        self.triangles.extend_from_slice(&result.triangles);
        self.halfedges.extend_from_slice(&result.halfedges);

        trace!(
            "triangulated {} real + {} ghost points into {} triangles",
            self.real_count,
            self.ghosts.len(),
            self.triangles.len() / 3
        );
        self.mesh()
    }
}
