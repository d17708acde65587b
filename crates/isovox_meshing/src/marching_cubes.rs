//! # Marching Cubes
//!
//! Table-driven isosurface extraction, one unit cell at a time.
//!
//! Each cell samples its 8 corners, builds a case index from which corners
//! are at or above the isolevel, and emits the case's triangles with vertices
//! linearly interpolated along the crossed edges. Ambiguous faces are
//! resolved by [`TRI_TABLE`] alone.
//!
//! The full-volume pass runs cell origins over `[-1, size]` on every axis so
//! that surfaces touching the field boundary close against the empty
//! outside.

use std::time::Instant;

use isovox_core::mesh::normalize_or_up;
use isovox_core::{empty_density, Density, DensityField, MeshBuffer};

use crate::tables::{is_uniform_case, CORNER_OFFSETS, EDGE_CONNECTIONS, EDGE_TABLE, TRI_TABLE};

/// Below this, two values are treated as equal during interpolation.
const EPSILON: f32 = 1e-5;

/// One cell's corner samples in [`CORNER_OFFSETS`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridCell {
    /// Corner positions.
    pub position: [[f32; 3]; 8],
    /// Corner values.
    pub value: [f32; 8],
}

impl GridCell {
    /// Unit cell at `origin` with the given corner values.
    #[must_use]
    pub fn unit(origin: [f32; 3], value: [f32; 8]) -> Self {
        let position = CORNER_OFFSETS.map(|[dx, dy, dz]| {
            [
                origin[0] + dx as f32,
                origin[1] + dy as f32,
                origin[2] + dz as f32,
            ]
        });
        Self { position, value }
    }

    /// Case index: bit `i` set when corner `i` is at or above `isolevel`.
    #[must_use]
    pub fn case_index(&self, isolevel: f32) -> u8 {
        self.value
            .iter()
            .enumerate()
            .fold(0u8, |case, (i, &v)| if v >= isolevel { case | 1 << i } else { case })
    }
}

/// Crossing point between `p0` (value `v0`) and `p1` (value `v1`).
///
/// Returns an endpoint instead of dividing when the values are equal or one
/// of them sits on the isolevel.
#[must_use]
pub fn interpolate(isolevel: f32, p0: [f32; 3], p1: [f32; 3], v0: f32, v1: f32) -> [f32; 3] {
    let t = interpolation_factor(isolevel, v0, v1);
    lerp(p0, p1, t)
}

fn interpolation_factor(isolevel: f32, v0: f32, v1: f32) -> f32 {
    if (isolevel - v0).abs() < EPSILON || (v1 - v0).abs() < EPSILON {
        return 0.0;
    }
    if (isolevel - v1).abs() < EPSILON {
        return 1.0;
    }
    (isolevel - v0) / (v1 - v0)
}

#[inline]
fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + t * (b[0] - a[0]),
        a[1] + t * (b[1] - a[1]),
        a[2] + t * (b[2] - a[2]),
    ]
}

/// Triangulates one cell, appending position triples to `out`.
///
/// Returns the number of triangles added. Uniform cells return 0 without
/// touching the tables.
pub fn polygonise(cell: &GridCell, isolevel: f32, out: &mut Vec<[[f32; 3]; 3]>) -> usize {
    let case = cell.case_index(isolevel);
    if is_uniform_case(case) {
        return 0;
    }
    let edges = EDGE_TABLE[case as usize];
    if edges == 0 {
        return 0;
    }

    let mut vertices = [[0.0f32; 3]; 12];
    for (edge, &[a, b]) in EDGE_CONNECTIONS.iter().enumerate() {
        if edges & (1 << edge) != 0 {
            vertices[edge] = interpolate(
                isolevel,
                cell.position[a],
                cell.position[b],
                cell.value[a],
                cell.value[b],
            );
        }
    }

    let row = &TRI_TABLE[case as usize];
    let mut count = 0;
    for tri in row.chunks_exact(3).take_while(|t| t[0] != -1) {
        out.push([
            vertices[tri[0] as usize],
            vertices[tri[1] as usize],
            vertices[tri[2] as usize],
        ]);
        count += 1;
    }
    count
}

/// Full-volume Marching Cubes extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarchingCubes {
    gradient_normals: bool,
}

impl Default for MarchingCubes {
    fn default() -> Self {
        Self::new()
    }
}

impl MarchingCubes {
    /// Extractor with interpolated gradient normals.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gradient_normals: true,
        }
    }

    /// Chooses between gradient normals and flat face normals.
    #[must_use]
    pub const fn with_gradient_normals(mut self, enabled: bool) -> Self {
        self.gradient_normals = enabled;
        self
    }

    /// Extracts the isosurface of `field` at `isolevel`.
    ///
    /// Vertices are not shared between triangles.
    #[must_use]
    pub fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        let start = Instant::now();
        let [nx, ny, nz] = field.dims();
        let mut mesh = MeshBuffer::new();
        let mut triangles = Vec::with_capacity(5);
        let outside = empty_density(isolevel);

        for x in -1..=nx as i32 {
            for y in -1..=ny as i32 {
                for z in -1..=nz as i32 {
                    let cell = sample_cell(field, outside, [x, y, z]);
                    triangles.clear();
                    if polygonise(&cell, isolevel, &mut triangles) == 0 {
                        continue;
                    }
                    for &[a, b, c] in &triangles {
                        if self.gradient_normals {
                            let ia = mesh.push_vertex(a, surface_normal(field, outside, a));
                            let ib = mesh.push_vertex(b, surface_normal(field, outside, b));
                            let ic = mesh.push_vertex(c, surface_normal(field, outside, c));
                            mesh.push_triangle(ia, ib, ic);
                        } else {
                            mesh.push_flat_triangle(a, b, c);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            mesher = "marching_cubes",
            isolevel = f64::from(isolevel),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "marching cubes pass complete"
        );
        mesh
    }
}

fn sample_cell(field: &DensityField, outside: Density, origin: [i32; 3]) -> GridCell {
    let mut cell = GridCell::default();
    for (i, [dx, dy, dz]) in CORNER_OFFSETS.into_iter().enumerate() {
        let (x, y, z) = (origin[0] + dx, origin[1] + dy, origin[2] + dz);
        cell.position[i] = [x as f32, y as f32, z as f32];
        cell.value[i] = f32::from(field.sample_or(x, y, z, outside));
    }
    cell
}

/// Gradient normal at a point on a cell edge.
///
/// The point lies on an axis-aligned edge, so the two corner gradients along
/// that edge are blended by the fractional coordinate.
fn surface_normal(field: &DensityField, outside: Density, p: [f32; 3]) -> [f32; 3] {
    let base = p.map(f32::floor);
    let frac = [p[0] - base[0], p[1] - base[1], p[2] - base[2]];
    let [x, y, z] = base.map(|c| c as i32);

    let axis = (0..3)
        .max_by(|&a, &b| frac[a].total_cmp(&frac[b]))
        .unwrap_or(0);
    let t = frac[axis];
    let mut next = [x, y, z];
    next[axis] += 1;

    let g0 = field.gradient_or(x, y, z, outside);
    let g1 = field.gradient_or(next[0], next[1], next[2], outside);
    normalize_or_up(lerp(g0, g1, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovox_core::mesh::{dot, face_normal};

    fn single_corner_cell() -> GridCell {
        // Corner 7 is the only one below the isolevel.
        GridCell::unit([0.0, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0])
    }

    #[test]
    fn test_single_corner_emits_midpoint_triangle() {
        let mut out = Vec::new();
        let count = polygonise(&single_corner_cell(), 0.0, &mut out);
        assert_eq!(count, 1);

        // Corner 7 is (0, 1, 1); its edges run to corners 3, 4 and 6.
        let mut expected = vec![[0.0, 1.0, 0.5], [0.0, 0.5, 1.0], [0.5, 1.0, 1.0]];
        let mut got: Vec<[f32; 3]> = out[0].to_vec();
        let key = |p: &[f32; 3]| {
            (p[0] * 100.0) as i32 * 10_000 + (p[1] * 100.0) as i32 * 100 + (p[2] * 100.0) as i32
        };
        expected.sort_by_key(key);
        got.sort_by_key(key);
        assert_eq!(got, expected);
    }

    #[test]
    fn test_single_corner_triangle_faces_empty_side() {
        let mut out = Vec::new();
        polygonise(&single_corner_cell(), 0.0, &mut out);
        let [a, b, c] = out[0];
        let n = face_normal(a, b, c);
        // The solid corner is at (0, 1, 1); the normal points away from it.
        let towards_centre = [0.5, -0.5, -0.5];
        assert!(dot(n, towards_centre) > 0.0);
    }

    #[test]
    fn test_uniform_cells_emit_nothing() {
        let mut out = Vec::new();
        assert_eq!(polygonise(&GridCell::unit([0.0; 3], [5.0; 8]), 0.0, &mut out), 0);
        assert_eq!(polygonise(&GridCell::unit([0.0; 3], [-5.0; 8]), 0.0, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_interpolate_handles_equal_values() {
        let p = interpolate(0.0, [0.0; 3], [1.0, 0.0, 0.0], 2.0, 2.0);
        assert_eq!(p, [0.0; 3]);
        let q = interpolate(0.0, [0.0; 3], [1.0, 0.0, 0.0], 3.0, -1.0);
        assert!((q[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_isolated_solid_point_forms_closed_blob() {
        let mut field = DensityField::cubic(3);
        field.fill(1);
        field.set(1, 1, 1, -1);

        let mesh = MarchingCubes::new().extract(&field, 0.0);
        // One triangle in each of the 8 cells around the point.
        assert_eq!(mesh.triangle_count(), 8);
        for p in mesh.positions() {
            let d = [p[0] - 1.0, p[1] - 1.0, p[2] - 1.0];
            assert!((dot(d, d) - 0.25).abs() < 1e-6, "vertex {p:?} not at an edge midpoint");
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_gradient_normals_point_outward() {
        let field = DensityField::from_fn([8, 8, 8], |x, y, z| {
            let d = [x as f32 - 3.5, y as f32 - 3.5, z as f32 - 3.5];
            ((dot(d, d).sqrt() - 2.5) * 20.0).clamp(-127.0, 127.0) as i8
        });
        let mesh = MarchingCubes::new().extract(&field, 0.0);
        assert!(mesh.triangle_count() > 0);
        for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
            let radial = [p[0] - 3.5, p[1] - 3.5, p[2] - 3.5];
            assert!(dot(radial, *n) > 0.0);
        }
    }

    #[test]
    fn test_empty_field() {
        let mesh = MarchingCubes::new().extract(&DensityField::cubic(4), 0.0);
        assert!(mesh.is_empty());
    }
}
