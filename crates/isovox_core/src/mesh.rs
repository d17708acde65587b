//! # Mesh Buffer
//!
//! Renderer-agnostic triangle output shared by every mesher.
//!
//! Positions and normals are parallel streams; indices form counter-clockwise
//! triangles when viewed from outside the solid.

use bytemuck::{Pod, Zeroable};

use crate::error::{CoreError, CoreResult};

/// Interleaved vertex, ready for upload as raw bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position [x, y, z].
    pub position: [f32; 3],
    /// Unit normal [nx, ny, nz].
    pub normal: [f32; 3],
}

/// Fallback normal for degenerate gradients and zero-area faces.
pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Vector difference `a - b`.
#[inline]
#[must_use]
pub fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Cross product.
#[inline]
#[must_use]
pub fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Dot product.
#[inline]
#[must_use]
pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Normalises `v`, falling back to [`UP`] when its length is zero.
#[inline]
#[must_use]
pub fn normalize_or_up(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        UP
    }
}

/// Unit normal of the triangle `a, b, c` under counter-clockwise winding.
#[inline]
#[must_use]
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    normalize_or_up(cross(sub(b, a), sub(c, a)))
}

/// Collected mesher output.
///
/// # Invariants
///
/// - `positions.len() == normals.len()`
/// - every index is `< positions.len()`
/// - `indices.len()` is a multiple of 3
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl MeshBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for the given counts.
    #[must_use]
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Appends a vertex and returns its index.
    #[inline]
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        index
    }

    /// Appends a triangle over existing vertices.
    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert!(
            [a, b, c].iter().all(|&i| (i as usize) < self.positions.len()),
            "triangle ({a}, {b}, {c}) references a missing vertex"
        );
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends a quad `a, b, c, d` (counter-clockwise) as two triangles.
    #[inline]
    pub fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
    }

    /// Appends three fresh vertices sharing the triangle's face normal.
    pub fn push_flat_triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
        let n = face_normal(a, b, c);
        let ia = self.push_vertex(a, n);
        let ib = self.push_vertex(b, n);
        let ic = self.push_vertex(c, n);
        self.push_triangle(ia, ib, ic);
    }

    /// Appends another buffer, offsetting its indices by the current vertex count.
    pub fn append(&mut self, other: &Self) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&i| i + base));
    }

    /// Returns true if there are no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex positions.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Vertex normals, parallel to [`MeshBuffer::positions`].
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// Triangle indices, three per triangle.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Positions as one flat `[x0, y0, z0, x1, ...]` slice.
    #[inline]
    #[must_use]
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Iterates triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Iterates triangles as position triples.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.triangles().map(|[a, b, c]| {
            [
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            ]
        })
    }

    /// Sum of triangle areas.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangle_positions()
            .map(|[a, b, c]| {
                let n = cross(sub(b, a), sub(c, a));
                0.5 * f64::from(dot(n, n)).sqrt()
            })
            .sum()
    }

    /// Replaces every normal with the area-weighted average of its faces.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![[0.0f32; 3]; self.positions.len()];
        for [a, b, c] in self.triangles() {
            let pa = self.positions[a as usize];
            let n = cross(sub(self.positions[b as usize], pa), sub(self.positions[c as usize], pa));
            for i in [a, b, c] {
                let slot = &mut accum[i as usize];
                slot[0] += n[0];
                slot[1] += n[1];
                slot[2] += n[2];
            }
        }
        self.normals = accum.into_iter().map(normalize_or_up).collect();
    }

    /// Interleaves positions and normals.
    #[must_use]
    pub fn to_vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| MeshVertex { position, normal })
            .collect()
    }

    /// Index buffer as raw bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Checks the buffer invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> CoreResult<()> {
        if self.positions.len() != self.normals.len() {
            return Err(CoreError::NormalCountMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(CoreError::IncompleteTriangle(self.indices.len()));
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(CoreError::IndexOutOfRange {
                index,
                vertex_count: self.positions.len(),
            });
        }
        Ok(())
    }
}
