//! Greedy meshing for block grids.
//!
//! Merges coplanar faces of the same material into larger quads.
//!
//! ## Algorithm
//!
//! 1. For each axis, sweep the `S + 1` slice boundaries perpendicular to it
//! 2. Build a 2D mask of the faces crossing that boundary
//! 3. Grow each unconsumed face into a `w x h` rectangle, width first
//! 4. Clear the rectangle from the mask and emit one quad
//!
//! Height growth stops at the first row with any mismatching cell in
//! `[i, i + w)`. The result is greedy, not minimal.

use std::time::Instant;

use isovox_core::material::{MaterialId, VoxelGrid};
use isovox_core::MeshBuffer;

/// A merged rectangle of voxel faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyQuad {
    /// Minimum corner of the quad in grid units.
    pub origin: [usize; 3],
    /// Extent along `(axis + 1) % 3`.
    pub width: usize,
    /// Extent along `(axis + 2) % 3`.
    pub height: usize,
    /// Axis the quad is perpendicular to: 0 = X, 1 = Y, 2 = Z.
    pub axis: usize,
    /// True if the face points towards `+axis`.
    pub positive: bool,
    /// Material of the solid side.
    pub material: MaterialId,
}

impl GreedyQuad {
    /// Number of unit faces merged into this quad.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Outward unit normal.
    #[must_use]
    pub fn normal(&self) -> [f32; 3] {
        let mut n = [0.0; 3];
        n[self.axis] = if self.positive { 1.0 } else { -1.0 };
        n
    }

    /// Corners in counter-clockwise order seen from the normal side.
    #[must_use]
    pub fn corners(&self) -> [[f32; 3]; 4] {
        let u = (self.axis + 1) % 3;
        let v = (self.axis + 2) % 3;
        let p0 = self.origin.map(|c| c as f32);
        let mut pu = p0;
        pu[u] += self.width as f32;
        let mut puv = pu;
        puv[v] += self.height as f32;
        let mut pv = p0;
        pv[v] += self.height as f32;

        // u x v = +axis, so (p0, pu, puv, pv) faces +axis.
        if self.positive {
            [p0, pu, puv, pv]
        } else {
            [p0, pv, puv, pu]
        }
    }
}

/// Face mask entry. Faces merge only when entries are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FaceMask {
    material: MaterialId,
    positive: bool,
}

/// Greedy meshing engine.
///
/// Keeps its mask and quad list between calls so repeated meshing of
/// same-sized chunks does not reallocate.
#[derive(Debug, Default)]
pub struct GreedyMesher {
    mask: Vec<Option<FaceMask>>,
    quads: Vec<GreedyQuad>,
}

impl GreedyMesher {
    /// Creates a mesher with empty working buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes a cubic grid and returns the triangulated quads.
    ///
    /// The merged quads stay available through [`quads`](Self::quads) until
    /// the next call.
    ///
    /// # Panics
    ///
    /// Panics if the grid is not cubic.
    pub fn mesh<G: VoxelGrid + ?Sized>(&mut self, grid: &G) -> MeshBuffer {
        let start = Instant::now();
        let [nx, ny, nz] = grid.dims();
        assert!(
            nx == ny && ny == nz,
            "greedy meshing needs a cubic grid, got {:?}",
            [nx, ny, nz]
        );
        let size = nx;

        self.quads.clear();
        self.mask.clear();
        self.mask.resize(size * size, None);

        for axis in 0..3 {
            for slice in 0..=size {
                self.build_mask(grid, axis, slice, size);
                self.extract(axis, slice, size);
            }
        }

        let mut mesh = MeshBuffer::with_capacity(self.quads.len() * 4, self.quads.len() * 2);
        for quad in &self.quads {
            let normal = quad.normal();
            let [a, b, c, d] = quad.corners().map(|p| mesh.push_vertex(p, normal));
            mesh.push_quad(a, b, c, d);
        }

        tracing::debug!(
            mesher = "greedy",
            quads = self.quads.len(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "greedy pass complete"
        );
        mesh
    }

    /// Quads from the last [`mesh`](Self::mesh) call.
    #[must_use]
    pub fn quads(&self) -> &[GreedyQuad] {
        &self.quads
    }

    /// Total merged face area from the last call.
    #[must_use]
    pub fn quad_area(&self) -> usize {
        self.quads.iter().map(GreedyQuad::area).sum()
    }

    /// Fills the mask for the boundary between layer `slice - 1` and `slice`.
    fn build_mask<G: VoxelGrid + ?Sized>(&mut self, grid: &G, axis: usize, slice: usize, size: usize) {
        let u_axis = (axis + 1) % 3;
        let v_axis = (axis + 2) % 3;

        for v in 0..size {
            for u in 0..size {
                let mut pos = [0i32; 3];
                pos[u_axis] = u as i32;
                pos[v_axis] = v as i32;
                pos[axis] = slice as i32 - 1;
                let behind = grid.material_at(pos[0], pos[1], pos[2]);
                pos[axis] = slice as i32;
                let ahead = grid.material_at(pos[0], pos[1], pos[2]);

                self.mask[v * size + u] = match (behind != 0, ahead != 0) {
                    (true, false) => Some(FaceMask {
                        material: behind,
                        positive: true,
                    }),
                    (false, true) => Some(FaceMask {
                        material: ahead,
                        positive: false,
                    }),
                    _ => None,
                };
            }
        }
    }

    /// Greedily consumes the mask into quads.
    fn extract(&mut self, axis: usize, slice: usize, size: usize) {
        let u_axis = (axis + 1) % 3;
        let v_axis = (axis + 2) % 3;

        for v in 0..size {
            let mut u = 0;
            while u < size {
                let Some(face) = self.mask[v * size + u] else {
                    u += 1;
                    continue;
                };

                let mut width = 1;
                while u + width < size && self.mask[v * size + u + width] == Some(face) {
                    width += 1;
                }

                let mut height = 1;
                'height: while v + height < size {
                    for du in 0..width {
                        if self.mask[(v + height) * size + u + du] != Some(face) {
                            break 'height;
                        }
                    }
                    height += 1;
                }

                let mut origin = [0usize; 3];
                origin[axis] = slice;
                origin[u_axis] = u;
                origin[v_axis] = v;
                self.quads.push(GreedyQuad {
                    origin,
                    width,
                    height,
                    axis,
                    positive: face.positive,
                    material: face.material,
                });

                for dv in 0..height {
                    for du in 0..width {
                        self.mask[(v + dv) * size + u + du] = None;
                    }
                }

                u += width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naive::visible_face_count;
    use isovox_core::mesh::face_normal;
    use isovox_core::{Block, DensityField, MaterialGrid};

    #[test]
    fn test_empty_grid() {
        let mut mesher = GreedyMesher::new();
        let mesh = mesher.mesh(&DensityField::cubic(8));
        assert!(mesh.is_empty());
        assert!(mesher.quads().is_empty());
    }

    #[test]
    fn test_single_voxel() {
        let mut mesher = GreedyMesher::new();
        let mut field = DensityField::cubic(4);
        field.set(1, 1, 1, -10);
        let mesh = mesher.mesh(&field);

        assert_eq!(mesher.quads().len(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_slab_merges_into_six_quads() {
        let mut mesher = GreedyMesher::new();
        let mut field = DensityField::cubic(4);
        for x in 0..4 {
            for z in 0..4 {
                field.set(x, 0, z, -1);
            }
        }
        mesher.mesh(&field);

        assert_eq!(mesher.quads().len(), 6);
        assert_eq!(mesher.quad_area(), 16 * 2 + 4 * 4);
    }

    #[test]
    fn test_quads_face_outward() {
        let mut mesher = GreedyMesher::new();
        let mut field = DensityField::cubic(3);
        field.set(1, 1, 1, -1);
        field.set(1, 2, 1, -1);
        mesher.mesh(&field);

        for quad in mesher.quads() {
            let [a, b, c, _] = quad.corners();
            let n = face_normal(a, b, c);
            let expected = quad.normal();
            for i in 0..3 {
                assert!((n[i] - expected[i]).abs() < 1e-6, "{quad:?}");
            }
        }
    }

    #[test]
    fn test_materials_do_not_merge() {
        let mut grid = MaterialGrid::new([2, 2, 2]);
        grid.set(0, 0, 0, Block::Rock.id());
        grid.set(1, 0, 0, Block::Dirt.id());
        let mut mesher = GreedyMesher::new();
        mesher.mesh(&grid);

        // The shared bottom face splits by material, the hidden face between
        // the two blocks is not emitted.
        let bottoms = mesher
            .quads()
            .iter()
            .filter(|q| q.axis == 1 && !q.positive)
            .count();
        assert_eq!(bottoms, 2);
        assert_eq!(mesher.quad_area(), visible_face_count(&grid));
    }

    #[test]
    fn test_height_growth_stops_at_first_gap() {
        // An L-shape on the bottom layer: a full row on top of a half row.
        let mut field = DensityField::cubic(4);
        for x in 0..4 {
            field.set(x, 0, 0, -1);
        }
        for x in 0..2 {
            field.set(x, 0, 1, -1);
        }
        let mut mesher = GreedyMesher::new();
        mesher.mesh(&field);

        // Bottom faces (axis 1, negative): v runs along X, u along Z.
        let bottoms: Vec<_> = mesher
            .quads()
            .iter()
            .filter(|q| q.axis == 1 && !q.positive)
            .collect();
        let area: usize = bottoms.iter().map(|q| q.area()).sum();
        assert_eq!(area, 6);
        assert_eq!(bottoms.len(), 2);
    }

    #[test]
    #[should_panic(expected = "cubic grid")]
    fn test_rejects_non_cubic_grid() {
        let field = DensityField::new([4, 4, 2]);
        GreedyMesher::new().mesh(&field);
    }
}
