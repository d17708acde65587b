//! # Cuboid Mesher
//!
//! One unit cube per solid voxel: 8 vertices, 12 triangles. The baseline
//! every other mesher is measured against.
//!
//! The culled variant adds the interior check: a voxel whose six face
//! neighbours are all solid cannot be seen and emits nothing. Hidden faces
//! between two visible voxels are still emitted; merging those is the greedy
//! mesher's job.

use std::time::Instant;

use isovox_core::material::VoxelGrid;
use isovox_core::mesh::normalize_or_up;
use isovox_core::MeshBuffer;

/// Cube corners, bit 2 = Y, bit 1 = X, bit 0 = Z.
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
];

/// Outward-wound triangles over [`CUBE_CORNERS`], two per face:
/// bottom, top, +Z, -Z, -X, +X.
const CUBE_TRIANGLES: [[u32; 3]; 12] = [
    [0, 2, 1],
    [1, 2, 3],
    [4, 5, 6],
    [6, 5, 7],
    [5, 1, 7],
    [7, 1, 3],
    [4, 6, 0],
    [0, 6, 2],
    [0, 1, 4],
    [4, 1, 5],
    [3, 2, 7],
    [7, 2, 6],
];

/// Face neighbour offsets.
const FACE_NEIGHBOURS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Appends an axis-aligned cube with minimum corner `min` and edge `size`.
///
/// Corner normals point diagonally away from the cube centre.
pub fn push_cube(mesh: &mut MeshBuffer, min: [f32; 3], size: f32) {
    let base = mesh.vertex_count() as u32;
    for corner in CUBE_CORNERS {
        let position = [
            min[0] + corner[0] * size,
            min[1] + corner[1] * size,
            min[2] + corner[2] * size,
        ];
        let normal = normalize_or_up([corner[0] - 0.5, corner[1] - 0.5, corner[2] - 0.5]);
        mesh.push_vertex(position, normal);
    }
    for [a, b, c] in CUBE_TRIANGLES {
        mesh.push_triangle(base + a, base + b, base + c);
    }
}

/// Per-voxel cube emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaiveMesher {
    skip_interior: bool,
}

impl NaiveMesher {
    /// Emits a cube for every solid voxel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skip_interior: false,
        }
    }

    /// Emits a cube for every solid voxel with at least one open face.
    #[must_use]
    pub const fn culled() -> Self {
        Self {
            skip_interior: true,
        }
    }

    /// Meshes any material grid.
    pub fn mesh<G: VoxelGrid + ?Sized>(&self, grid: &G) -> MeshBuffer {
        let start = Instant::now();
        let [nx, ny, nz] = grid.dims();
        let mut mesh = MeshBuffer::new();

        for x in 0..nx as i32 {
            for y in 0..ny as i32 {
                for z in 0..nz as i32 {
                    if !grid.is_solid_at(x, y, z) {
                        continue;
                    }
                    if self.skip_interior && is_interior(grid, x, y, z) {
                        continue;
                    }
                    push_cube(&mut mesh, [x as f32, y as f32, z as f32], 1.0);
                }
            }
        }

        let mesher = if self.skip_interior { "culled" } else { "naive" };
        tracing::debug!(
            mesher,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "cuboid pass complete"
        );
        mesh
    }
}

/// True if all six face neighbours are solid and inside the grid.
fn is_interior<G: VoxelGrid + ?Sized>(grid: &G, x: i32, y: i32, z: i32) -> bool {
    FACE_NEIGHBOURS
        .iter()
        .all(|[dx, dy, dz]| grid.is_solid_at(x + dx, y + dy, z + dz))
}

/// Counts faces between a solid voxel and an empty (or out-of-range) neighbour.
#[must_use]
pub fn visible_face_count<G: VoxelGrid + ?Sized>(grid: &G) -> usize {
    let [nx, ny, nz] = grid.dims();
    let mut faces = 0;
    for x in 0..nx as i32 {
        for y in 0..ny as i32 {
            for z in 0..nz as i32 {
                if !grid.is_solid_at(x, y, z) {
                    continue;
                }
                faces += FACE_NEIGHBOURS
                    .iter()
                    .filter(|[dx, dy, dz]| !grid.is_solid_at(x + dx, y + dy, z + dz))
                    .count();
            }
        }
    }
    faces
}

/// Area of the visible voxel surface, one unit per visible face.
#[must_use]
pub fn visible_surface_area<G: VoxelGrid + ?Sized>(grid: &G) -> f64 {
    visible_face_count(grid) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovox_core::mesh::{dot, face_normal};
    use isovox_core::{DensityField, DENSITY_SOLID};

    fn solid_block(size: usize) -> DensityField {
        let mut field = DensityField::cubic(size);
        field.fill(DENSITY_SOLID);
        field
    }

    #[test]
    fn test_empty_field() {
        let mesh = NaiveMesher::new().mesh(&DensityField::cubic(4));
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_single_voxel_cube() {
        let mut field = DensityField::cubic(3);
        field.set(1, 2, 0, -1);
        let mesh = NaiveMesher::new().mesh(&field);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-9);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let mut mesh = MeshBuffer::new();
        push_cube(&mut mesh, [0.0, 0.0, 0.0], 1.0);
        let centre = [0.5, 0.5, 0.5];
        for [a, b, c] in mesh.triangle_positions() {
            let n = face_normal(a, b, c);
            let mid = [
                (a[0] + b[0] + c[0]) / 3.0 - centre[0],
                (a[1] + b[1] + c[1]) / 3.0 - centre[1],
                (a[2] + b[2] + c[2]) / 3.0 - centre[2],
            ];
            assert!(dot(n, mid) > 0.0, "inward face {a:?} {b:?} {c:?}");
        }
    }

    #[test]
    fn test_culling_drops_interior_voxel() {
        let field = solid_block(3);
        let naive = NaiveMesher::new().mesh(&field);
        let culled = NaiveMesher::culled().mesh(&field);
        assert_eq!(naive.triangle_count(), 27 * 12);
        assert_eq!(culled.triangle_count(), 26 * 12);
    }

    #[test]
    fn test_visible_faces_of_block() {
        assert_eq!(visible_face_count(&solid_block(2)), 24);
        assert_eq!(visible_face_count(&solid_block(3)), 54);
    }
}
