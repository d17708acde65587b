//! # Transvoxel Regular Cells
//!
//! Marching Cubes with vertex reuse and fixed-point edge interpolation.
//!
//! ## Sweep
//!
//! ```text
//! for y in slices:            previous ◄── swap ── current
//!   for z in rows:
//!     for x in cells:         reuse from (x-1), (z-1) in current
//!                             or from the same column in previous
//! ```
//!
//! Every cell owns the three edges meeting at its corner 7. A vertex on any
//! other edge belongs to a neighbour at -X, -Z or -Y and is looked up in the
//! reuse cache, provided the direction mask says that neighbour exists.
//!
//! ## Precision
//!
//! The crossing parameter is `t = (d1 << 8) / (d1 - d0)`, an 8-bit fraction.
//! Positions are assembled as integers in 1/256 units before a single
//! conversion to `f32`, so two chunks that see the same samples on a shared
//! face produce bit-identical vertices there.
//!
//! Transition cells between LOD levels are not generated.

use std::time::Instant;

use isovox_core::mesh::normalize_or_up;
use isovox_core::sync::DoubleBuffer;
use isovox_core::{empty_density, Density, DensityField, MeshBuffer};

use crate::tables::{
    is_uniform_case, regular_cell, VertexCode, REGULAR_VERTEX_DATA, REUSE_NEG_Y, REUSE_OWNED,
    TRANSVOXEL_CORNERS,
};

/// Cache entry sentinel: no vertex created yet.
const NO_VERTEX: i32 = -1;

/// Per-cell cache entry. Slot 0 is unused; slots 1-3 hold the X, Z and Y
/// edge vertices owned by the cell.
type CacheCell = [i32; 4];

/// Regular-cell Transvoxel extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transvoxel {
    reuse: bool,
    origin: [i32; 3],
    stride: i32,
}

impl Default for Transvoxel {
    fn default() -> Self {
        Self::new()
    }
}

impl Transvoxel {
    /// Extractor with reuse enabled, unit stride and origin at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reuse: true,
            origin: [0, 0, 0],
            stride: 1,
        }
    }

    /// Enables or disables the vertex-reuse cache.
    ///
    /// With reuse off every vertex is created fresh. Triangle positions are
    /// unchanged; only the vertex count grows.
    #[must_use]
    pub const fn with_reuse(mut self, reuse: bool) -> Self {
        self.reuse = reuse;
        self
    }

    /// World position of sample `(0, 0, 0)`.
    #[must_use]
    pub const fn with_origin(mut self, origin: [i32; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// World distance between adjacent samples.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is not positive.
    #[must_use]
    pub const fn with_stride(mut self, stride: i32) -> Self {
        assert!(stride > 0, "transvoxel stride must be positive");
        self.stride = stride;
        self
    }

    /// Extracts the isosurface of `field` at `isolevel`.
    ///
    /// The isolevel is rounded to the nearest integer density.
    #[must_use]
    pub fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        let start = Instant::now();
        let iso = isolevel.round().clamp(-128.0, 127.0) as i16;
        let border = empty_density(f32::from(iso));
        let padded = field.inflate_with(border);
        let [px, py, pz] = padded.dims();
        let (cells_x, cells_y, cells_z) = (px - 1, py - 1, pz - 1);

        let mut mesh = MeshBuffer::new();
        let mut cache = DoubleBuffer::filled(vec![[NO_VERTEX; 4]; cells_x * cells_z]);
        let mut reused = 0usize;

        for y in 0..cells_y {
            for z in 0..cells_z {
                for x in 0..cells_x {
                    let cell = [x, y, z];
                    let mut values = [0i16; 8];
                    let mut case = 0u8;
                    for (i, [dx, dy, dz]) in TRANSVOXEL_CORNERS.into_iter().enumerate() {
                        let d = padded.get(x + dx as usize, y + dy as usize, z + dz as usize);
                        values[i] = i16::from(d) - iso;
                        if values[i] < 0 {
                            case |= 1 << i;
                        }
                    }
                    if is_uniform_case(case) {
                        continue;
                    }

                    let mask = u8::from(x > 0) | u8::from(z > 0) << 1 | u8::from(y > 0) << 2;
                    let data = regular_cell(case);
                    let codes = &REGULAR_VERTEX_DATA[case as usize][..data.vertex_count()];
                    let (current, previous) = cache.split_mut();

                    let mut local = [0u32; 12];
                    for (k, &raw) in codes.iter().enumerate() {
                        let code = VertexCode(raw);
                        let dir = code.direction();
                        let slot = code.slot();

                        let mut index = NO_VERTEX;
                        if self.reuse && dir != REUSE_OWNED && dir & mask == dir {
                            let owner_x = x - usize::from(dir & 1);
                            let owner_z = z - usize::from((dir >> 1) & 1);
                            let row: &[CacheCell] = if dir & REUSE_NEG_Y != 0 {
                                &previous[..]
                            } else {
                                &current[..]
                            };
                            index = row[owner_z * cells_x + owner_x][slot];
                        }

                        if index == NO_VERTEX {
                            index = self.edge_vertex(&padded, border, cell, &values, code, &mut mesh) as i32;
                            if self.reuse && dir == REUSE_OWNED {
                                current[z * cells_x + x][slot] = index;
                            }
                        } else {
                            reused += 1;
                        }
                        local[k] = index as u32;
                    }

                    for tri in data.indices().chunks_exact(3) {
                        mesh.push_triangle(
                            local[tri[2] as usize],
                            local[tri[1] as usize],
                            local[tri[0] as usize],
                        );
                    }
                }
            }

            cache.swap();
            cache.current_mut().fill([NO_VERTEX; 4]);
        }

        tracing::debug!(
            mesher = "transvoxel",
            reuse = self.reuse,
            reused,
            slices = cache.swap_count(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "transvoxel pass complete"
        );
        mesh
    }

    /// Interpolates a fresh vertex on the edge named by `code`.
    ///
    /// `cell` is in padded coordinates; sample `(0, 0, 0)` of the original
    /// field is padded `(1, 1, 1)`.
    fn edge_vertex(
        &self,
        padded: &DensityField,
        border: Density,
        cell: [usize; 3],
        values: &[i16; 8],
        code: VertexCode,
        mesh: &mut MeshBuffer,
    ) -> u32 {
        let (low, high) = (code.low_corner(), code.high_corner());
        let d0 = i32::from(values[low]);
        let d1 = i32::from(values[high]);
        // Exactly one end is solid, so d1 != d0.
        let t = (d1 << 8) / (d1 - d0);
        let u = 256 - t;

        let lo = TRANSVOXEL_CORNERS[low];
        let hi = TRANSVOXEL_CORNERS[high];
        let mut position = [0.0f32; 3];
        for axis in 0..3 {
            let base = (cell[axis] as i64 - 1) << 8;
            let local = base + i64::from(lo[axis] * t + hi[axis] * u);
            let world = (i64::from(self.origin[axis]) << 8) + i64::from(self.stride) * local;
            position[axis] = world as f32 / 256.0;
        }

        let g0 = corner_gradient(padded, border, cell, lo);
        let g1 = corner_gradient(padded, border, cell, hi);
        let (wt, wu) = (t as f32, u as f32);
        let normal = normalize_or_up([
            g0[0] * wt + g1[0] * wu,
            g0[1] * wt + g1[1] * wu,
            g0[2] * wt + g1[2] * wu,
        ]);

        mesh.push_vertex(position, normal)
    }
}

fn corner_gradient(
    padded: &DensityField,
    border: Density,
    cell: [usize; 3],
    offset: [i32; 3],
) -> [f32; 3] {
    padded.gradient_or(
        cell[0] as i32 + offset[0],
        cell[1] as i32 + offset[1],
        cell[2] as i32 + offset[2],
        border,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marching_cubes::MarchingCubes;
    use isovox_core::mesh::dot;

    fn sphere(size: usize, radius: f32) -> DensityField {
        let c = (size as f32 - 1.0) / 2.0;
        DensityField::from_fn([size; 3], |x, y, z| {
            let d = [x as f32 - c, y as f32 - c, z as f32 - c];
            ((dot(d, d).sqrt() - radius) * 24.0).clamp(-127.0, 127.0) as i8
        })
    }

    fn sorted_triangles(mesh: &MeshBuffer) -> Vec<[[u32; 3]; 3]> {
        let mut tris: Vec<_> = mesh
            .triangle_positions()
            .map(|t| t.map(|p| p.map(f32::to_bits)))
            .collect();
        tris.sort_unstable();
        tris
    }

    #[test]
    fn test_empty_and_full_fields() {
        assert!(Transvoxel::new().extract(&DensityField::cubic(4), 0.0).is_empty());

        // A solid block closes against the padded border.
        let mut full = DensityField::cubic(4);
        full.fill(-127);
        let mesh = Transvoxel::new().extract(&full, 0.0);
        assert!(mesh.triangle_count() > 0);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_isolated_point_uses_edge_midpoints() {
        let mut field = DensityField::cubic(3);
        field.fill(1);
        field.set(1, 1, 1, -1);
        let mesh = Transvoxel::new().extract(&field, 0.0);

        assert_eq!(mesh.triangle_count(), 8);
        // Six axis-edge crossings, each shared by four cells.
        assert_eq!(mesh.vertex_count(), 6);
        for p in mesh.positions() {
            let d = [p[0] - 1.0, p[1] - 1.0, p[2] - 1.0];
            assert!((dot(d, d) - 0.25).abs() < 1e-6, "vertex {p:?}");
        }
    }

    #[test]
    fn test_reuse_only_changes_vertex_count() {
        let field = sphere(12, 4.0);
        let shared = Transvoxel::new().extract(&field, 0.0);
        let fresh = Transvoxel::new().with_reuse(false).extract(&field, 0.0);

        assert_eq!(shared.triangle_count(), fresh.triangle_count());
        assert!(shared.vertex_count() < fresh.vertex_count());
        assert_eq!(sorted_triangles(&shared), sorted_triangles(&fresh));
    }

    #[test]
    fn test_matches_marching_cubes_triangle_count() {
        let field = sphere(14, 5.0);
        let tv = Transvoxel::new().extract(&field, 0.0);
        let mc = MarchingCubes::new().extract(&field, 0.0);
        assert_eq!(tv.triangle_count(), mc.triangle_count());
        assert!((tv.surface_area() - mc.surface_area()).abs() / mc.surface_area() < 0.05);
    }

    #[test]
    fn test_triangles_face_outward() {
        let field = sphere(12, 4.0);
        let mesh = Transvoxel::new().extract(&field, 0.0);
        let c = 5.5;
        for [a, b, d] in mesh.triangle_positions() {
            let n = isovox_core::mesh::face_normal(a, b, d);
            let mid = [
                (a[0] + b[0] + d[0]) / 3.0 - c,
                (a[1] + b[1] + d[1]) / 3.0 - c,
                (a[2] + b[2] + d[2]) / 3.0 - c,
            ];
            assert!(dot(n, mid) > 0.0);
        }
    }

    #[test]
    fn test_origin_and_stride_transform_positions() {
        let field = sphere(8, 2.5);
        let unit = Transvoxel::new().extract(&field, 0.0);
        let placed = Transvoxel::new()
            .with_origin([32, -16, 8])
            .with_stride(4)
            .extract(&field, 0.0);

        assert_eq!(unit.vertex_count(), placed.vertex_count());
        for (p, q) in unit.positions().iter().zip(placed.positions()) {
            assert_eq!(q[0], 32.0 + p[0] * 4.0);
            assert_eq!(q[1], -16.0 + p[1] * 4.0);
            assert_eq!(q[2], 8.0 + p[2] * 4.0);
        }
    }
}
