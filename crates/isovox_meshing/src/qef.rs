//! # Dual Contouring
//!
//! Hermite-data dual contouring over the full sample grid.
//!
//! 1. Every cell with a sign-changing edge gets one vertex. The vertex
//!    minimises the squared distance to the tangent planes of its edge
//!    crossings, pulled towards the crossings' mass point and clamped to the
//!    cell.
//! 2. Every sign-changing grid edge emits one quad joining the vertices of
//!    the four cells around it, wound so the face points from solid to
//!    empty.
//!
//! Cells run from `-1` to `size - 1` on each axis so surfaces close against
//! the empty outside.

use std::time::Instant;

use isovox_core::mesh::{cross, dot, normalize_or_up};
use isovox_core::{empty_density, Density, DensityField, MeshBuffer};

use crate::tables::{CORNER_OFFSETS, EDGE_CONNECTIONS};

/// Determinants below this are treated as singular.
const SINGULAR: f32 = 1e-6;

/// Least-squares vertex placement from edge crossings.
///
/// Minimises `Σ (nᵢ · (x - pᵢ))² + λ |x - c|²`, where `c` is the mean of the
/// crossing points.
#[derive(Clone, Debug, Default)]
pub struct Qef {
    ata: [[f32; 3]; 3],
    points: Vec<([f32; 3], [f32; 3])>,
}

impl Qef {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a crossing point with its unit normal.
    pub fn add(&mut self, point: [f32; 3], normal: [f32; 3]) {
        for (r, row) in self.ata.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell += normal[r] * normal[c];
            }
        }
        self.points.push((point, normal));
    }

    /// Number of crossings added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of the crossing points.
    #[must_use]
    pub fn mass_point(&self) -> [f32; 3] {
        let n = self.points.len().max(1) as f32;
        let mut sum = [0.0f32; 3];
        for (p, _) in &self.points {
            for a in 0..3 {
                sum[a] += p[a];
            }
        }
        sum.map(|s| s / n)
    }

    /// Solves for the vertex with regularisation weight `lambda`.
    ///
    /// Falls back to the mass point when the system is singular.
    #[must_use]
    pub fn solve(&self, lambda: f32) -> [f32; 3] {
        let c = self.mass_point();
        let mut m = self.ata;
        for (a, row) in m.iter_mut().enumerate() {
            row[a] += lambda;
        }
        let mut rhs = [0.0f32; 3];
        for (p, n) in &self.points {
            let b = dot(*n, [p[0] - c[0], p[1] - c[1], p[2] - c[2]]);
            for a in 0..3 {
                rhs[a] += n[a] * b;
            }
        }
        match solve3(m, rhs) {
            Some(y) => [c[0] + y[0], c[1] + y[1], c[2] + y[2]],
            None => c,
        }
    }
}

/// Cramer's rule on a 3x3 system.
fn solve3(m: [[f32; 3]; 3], b: [f32; 3]) -> Option<[f32; 3]> {
    let det = dot(m[0], cross(m[1], m[2]));
    if det.abs() < SINGULAR {
        return None;
    }
    let column = |i: usize| -> f32 {
        let mut r = m;
        for (row, value) in r.iter_mut().zip(b) {
            row[i] = value;
        }
        dot(r[0], cross(r[1], r[2])) / det
    };
    Some([column(0), column(1), column(2)])
}

/// Full 3-axis dual contouring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QefDualContour {
    regularization: f32,
}

impl Default for QefDualContour {
    fn default() -> Self {
        Self::new()
    }
}

impl QefDualContour {
    /// Default pull towards the mass point.
    pub const REGULARIZATION: f32 = 0.05;

    /// Creates a mesher with the default regularisation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regularization: Self::REGULARIZATION,
        }
    }

    /// Extracts the surface of `field` at `isolevel`.
    #[must_use]
    pub fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        let start = Instant::now();
        let grid = CellGrid::new(field);
        let mut mesh = MeshBuffer::new();
        let mut cell_vertices = vec![None; grid.len()];
        let outside = empty_density(isolevel);
        let solid =
            |x: i32, y: i32, z: i32| f32::from(field.sample_or(x, y, z, outside)) < isolevel;

        for [x, y, z] in grid.cells() {
            let vertex = self.cell_vertex(field, isolevel, outside, [x, y, z]);
            if let Some((position, normal)) = vertex {
                cell_vertices[grid.index([x, y, z])] = Some(mesh.push_vertex(position, normal));
            }
        }

        let [nx, ny, nz] = field.dims().map(|d| d as i32);
        for x in -1..nx {
            for y in -1..ny {
                for z in -1..nz {
                    let here = solid(x, y, z);
                    // +X edge
                    if y >= 0 && z >= 0 && here != solid(x + 1, y, z) {
                        let cells = [[x, y - 1, z - 1], [x, y, z - 1], [x, y, z], [x, y - 1, z]];
                        emit_quad(&mut mesh, &grid, &cell_vertices, cells, !here);
                    }
                    // +Y edge
                    if x >= 0 && z >= 0 && here != solid(x, y + 1, z) {
                        let cells = [[x - 1, y, z - 1], [x - 1, y, z], [x, y, z], [x, y, z - 1]];
                        emit_quad(&mut mesh, &grid, &cell_vertices, cells, !here);
                    }
                    // +Z edge
                    if x >= 0 && y >= 0 && here != solid(x, y, z + 1) {
                        let cells = [[x - 1, y - 1, z], [x, y - 1, z], [x, y, z], [x - 1, y, z]];
                        emit_quad(&mut mesh, &grid, &cell_vertices, cells, !here);
                    }
                }
            }
        }

        tracing::debug!(
            mesher = "qef_dual_contour",
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "dual contouring pass complete"
        );
        mesh
    }

    /// Places the vertex of one cell, if any of its edges cross the surface.
    fn cell_vertex(
        &self,
        field: &DensityField,
        isolevel: f32,
        outside: Density,
        origin: [i32; 3],
    ) -> Option<([f32; 3], [f32; 3])> {
        let corner = |i: usize| {
            let [dx, dy, dz] = CORNER_OFFSETS[i];
            [origin[0] + dx, origin[1] + dy, origin[2] + dz]
        };
        let value = |p: [i32; 3]| f32::from(field.sample_or(p[0], p[1], p[2], outside));

        let mut qef = Qef::new();
        let mut normal_sum = [0.0f32; 3];
        for [a, b] in EDGE_CONNECTIONS {
            let (pa, pb) = (corner(a), corner(b));
            let (va, vb) = (value(pa), value(pb));
            if (va < isolevel) == (vb < isolevel) {
                continue;
            }
            let t = (isolevel - va) / (vb - va);
            let point = [0usize, 1, 2].map(|i| pa[i] as f32 + t * (pb[i] - pa[i]) as f32);
            let ga = field.gradient_or(pa[0], pa[1], pa[2], outside);
            let gb = field.gradient_or(pb[0], pb[1], pb[2], outside);
            let normal = normalize_or_up([0usize, 1, 2].map(|i| ga[i] + t * (gb[i] - ga[i])));
            for i in 0..3 {
                normal_sum[i] += normal[i];
            }
            qef.add(point, normal);
        }
        if qef.is_empty() {
            return None;
        }

        let mut position = qef.solve(self.regularization);
        for i in 0..3 {
            let lo = origin[i] as f32;
            position[i] = position[i].clamp(lo, lo + 1.0);
        }
        Some((position, normalize_or_up(normal_sum)))
    }
}

/// Cells with origins in `[-1, size - 1]` on each axis.
struct CellGrid {
    dims: [usize; 3],
}

impl CellGrid {
    fn new(field: &DensityField) -> Self {
        Self {
            dims: field.dims().map(|d| d + 1),
        }
    }

    fn len(&self) -> usize {
        self.dims.iter().product()
    }

    fn index(&self, [x, y, z]: [i32; 3]) -> usize {
        let [_, ny, nz] = self.dims;
        ((x + 1) as usize * ny + (y + 1) as usize) * nz + (z + 1) as usize
    }

    fn contains(&self, cell: [i32; 3]) -> bool {
        (0..3).all(|a| cell[a] >= -1 && cell[a] + 1 < self.dims[a] as i32)
    }

    fn cells(&self) -> impl Iterator<Item = [i32; 3]> {
        let [nx, ny, nz] = self.dims.map(|d| d as i32);
        (-1..nx - 1).flat_map(move |x| {
            (-1..ny - 1).flat_map(move |y| (-1..nz - 1).map(move |z| [x, y, z]))
        })
    }
}

fn emit_quad(
    mesh: &mut MeshBuffer,
    grid: &CellGrid,
    cell_vertex: &[Option<u32>],
    cells: [[i32; 3]; 4],
    reverse: bool,
) {
    let mut quad = [0u32; 4];
    for (slot, cell) in quad.iter_mut().zip(cells) {
        if !grid.contains(cell) {
            return;
        }
        match cell_vertex[grid.index(cell)] {
            Some(v) => *slot = v,
            None => return,
        }
    }
    let [a, b, c, d] = quad;
    if reverse {
        mesh.push_quad(a, d, c, b);
    } else {
        mesh.push_quad(a, b, c, d);
    }
}
