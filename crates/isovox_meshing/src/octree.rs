//! # Material Octree
//!
//! A sparse octree of material cells stored in an [`Arena`].
//!
//! ## Node States
//!
//! ```text
//! Uninitialized  no children, material 0
//! Leaf           size <= min_size, material set
//! Homogeneous    larger than a leaf, no children, material set (from merge)
//! Subdivided     has children, own material possibly 0
//! ```
//!
//! Children are created lazily by [`Octree::locate`]. Parents are stored as
//! [`NodeId`]s, so upward traversal is O(1) and ownership stays with the
//! arena.
//!
//! Child octant `i` has bit 2 = +X, bit 1 = +Y, bit 0 = +Z. Points on a
//! splitting plane belong to the lower octant.

use std::time::Instant;

use isovox_core::material::{MaterialId, EMPTY, SOLID};
use isovox_core::memory::{Arena, NodeId};
use isovox_core::mesh::UP;
use isovox_core::{DensityField, MeshBuffer, DENSITY_SOLID};

use crate::naive::push_cube;

/// One octree cell.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeNode {
    center: [f32; 3],
    size: f32,
    parent: Option<NodeId>,
    children: [Option<NodeId>; 8],
    /// Material id, 0 = empty.
    pub material: MaterialId,
    /// Fill fraction used when merging.
    pub density: f32,
}

impl OctreeNode {
    fn new(center: [f32; 3], size: f32, parent: Option<NodeId>) -> Self {
        Self {
            center,
            size,
            parent,
            children: [None; 8],
            material: EMPTY,
            density: 0.0,
        }
    }

    /// Centre of the cube.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> [f32; 3] {
        self.center
    }

    /// Edge length.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Minimum corner of the cube.
    #[must_use]
    pub fn min(&self) -> [f32; 3] {
        let h = self.size / 2.0;
        [self.center[0] - h, self.center[1] - h, self.center[2] - h]
    }

    /// Parent node, `None` for the root.
    #[inline]
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child slots by octant.
    #[inline]
    #[must_use]
    pub const fn children(&self) -> &[Option<NodeId>; 8] {
        &self.children
    }

    /// True if no child slot is occupied.
    #[must_use]
    pub fn is_childless(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Inclusive bounds test.
    #[must_use]
    pub fn contains(&self, p: [f32; 3]) -> bool {
        let h = self.size / 2.0;
        (0..3).all(|a| self.center[a] - h <= p[a] && p[a] <= self.center[a] + h)
    }

    fn octant(&self, p: [f32; 3]) -> usize {
        usize::from(p[0] > self.center[0]) << 2
            | usize::from(p[1] > self.center[1]) << 1
            | usize::from(p[2] > self.center[2])
    }

    fn child_center(&self, octant: usize) -> [f32; 3] {
        let o = self.size / 4.0;
        let sign = |bit: usize| if octant & bit != 0 { o } else { -o };
        [
            self.center[0] + sign(4),
            self.center[1] + sign(2),
            self.center[2] + sign(1),
        ]
    }
}

/// Lifecycle state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// No children and no material.
    Uninitialized,
    /// Minimum-size node carrying a material.
    Leaf,
    /// Larger-than-leaf node standing for a uniform region.
    Homogeneous,
    /// Node with at least one child.
    Subdivided,
}

/// Structural summary of one node, used to compare trees.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSummary {
    /// Depth below the root.
    pub depth: usize,
    /// Centre of the node.
    pub center: [f32; 3],
    /// Edge length.
    pub size: f32,
    /// Material id.
    pub material: MaterialId,
    /// Occupied child octants as a bit mask.
    pub child_mask: u8,
}

/// A material octree.
///
/// ## Example
///
/// ```rust
/// use isovox_meshing::octree::Octree;
///
/// let mut tree = Octree::new([4.0, 4.0, 4.0], 8.0, 1.0);
/// tree.set_voxel(1, 2, 3, 5);
/// assert_eq!(tree.material_at(1.5, 2.5, 3.5), 5);
/// assert_eq!(tree.material_at(6.5, 2.5, 3.5), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Octree {
    nodes: Arena<OctreeNode>,
    root: NodeId,
    min_size: f32,
}

impl Octree {
    /// Creates a tree with a single uninitialized root cube.
    ///
    /// # Panics
    ///
    /// Panics if `min_size` is not positive or exceeds `size`.
    #[must_use]
    pub fn new(center: [f32; 3], size: f32, min_size: f32) -> Self {
        assert!(
            min_size > 0.0 && min_size <= size,
            "octree leaf size {min_size} must be in (0, {size}]"
        );
        let mut nodes = Arena::with_capacity(9);
        let root = nodes.alloc(OctreeNode::new(center, size, None));
        Self {
            nodes,
            root,
            min_size,
        }
    }

    /// Builds a tree from the solid samples of a field, then merges it.
    ///
    /// The root is the smallest power-of-two cube covering the field, with
    /// its minimum corner at the origin. Each sample below `isolevel` marks
    /// the leaf holding its voxel centre with material 1 and density
    /// `|d - isolevel| / 127`. With `leaf_size` 1 every voxel is its own leaf;
    /// larger leaves coarsen the field.
    ///
    /// # Panics
    ///
    /// Panics if `leaf_size` is not positive.
    #[must_use]
    pub fn from_field(field: &DensityField, isolevel: f32, leaf_size: f32) -> Self {
        let [nx, ny, nz] = field.dims();
        let size = (nx.max(ny).max(nz).next_power_of_two() as f32).max(leaf_size);
        let half = size / 2.0;
        let mut tree = Self::new([half, half, half], size, leaf_size);

        let mut cursor = tree.root;
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let d = f32::from(field.get(x, y, z));
                    if d >= isolevel {
                        continue;
                    }
                    let p = [x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5];
                    if let Some(leaf) = tree.locate(cursor, p[0], p[1], p[2]) {
                        let node = &mut tree.nodes[leaf];
                        node.material = SOLID;
                        node.density = (d - isolevel).abs() / -f32::from(DENSITY_SOLID);
                        cursor = leaf;
                    }
                }
            }
        }

        tree.merge();
        tree
    }

    /// The root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Edge length at which descent stops.
    #[inline]
    #[must_use]
    pub const fn min_size(&self) -> f32 {
        self.min_size
    }

    /// Borrows a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` has been released by a merge.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &OctreeNode {
        &self.nodes[id]
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// State of a node.
    #[must_use]
    pub fn state(&self, id: NodeId) -> NodeState {
        let node = &self.nodes[id];
        if !node.is_childless() {
            NodeState::Subdivided
        } else if node.material == EMPTY {
            NodeState::Uninitialized
        } else if node.size <= self.min_size {
            NodeState::Leaf
        } else {
            NodeState::Homogeneous
        }
    }

    /// Returns the leaf containing `(x, y, z)`, creating nodes on the way.
    ///
    /// Starts at `from` and climbs towards the root while the point lies
    /// outside the current node. Descending into a homogeneous node splits it
    /// into 8 children of the same material. Returns `None` if the point is
    /// outside the root.
    pub fn locate(&mut self, from: NodeId, x: f32, y: f32, z: f32) -> Option<NodeId> {
        let p = [x, y, z];
        let mut id = from;
        while !self.nodes[id].contains(p) {
            id = self.nodes[id].parent?;
        }

        loop {
            if self.nodes[id].size <= self.min_size {
                return Some(id);
            }
            if self.state(id) == NodeState::Homogeneous {
                self.split(id);
            }
            let octant = self.nodes[id].octant(p);
            id = match self.nodes[id].children[octant] {
                Some(child) => child,
                None => self.create_child(id, octant),
            };
        }
    }

    /// Sets the material of a node.
    pub fn set_material(&mut self, id: NodeId, material: MaterialId) {
        self.nodes[id].material = material;
    }

    /// Sets the unit voxel whose minimum corner is `(x, y, z)`.
    ///
    /// Marks it fully dense when `material` is non-empty.
    ///
    /// # Panics
    ///
    /// Panics if the voxel centre lies outside the root.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, material: MaterialId) -> NodeId {
        let p = [x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5];
        let Some(leaf) = self.locate(self.root, p[0], p[1], p[2]) else {
            panic!("voxel ({x}, {y}, {z}) lies outside the octree root");
        };
        let node = &mut self.nodes[leaf];
        node.material = material;
        node.density = if material == EMPTY { 0.0 } else { 1.0 };
        leaf
    }

    /// Deepest existing node containing the point. Never creates nodes.
    #[must_use]
    pub fn find(&self, x: f32, y: f32, z: f32) -> Option<NodeId> {
        let p = [x, y, z];
        if !self.nodes[self.root].contains(p) {
            return None;
        }
        let mut id = self.root;
        loop {
            let node = &self.nodes[id];
            match node.children[node.octant(p)] {
                Some(child) => id = child,
                None => return Some(id),
            }
        }
    }

    /// Material observed at a point.
    ///
    /// A childless node reports its own material. A missing child under a
    /// subdivided node reads as empty, as does anything outside the root.
    #[must_use]
    pub fn material_at(&self, x: f32, y: f32, z: f32) -> MaterialId {
        let Some(id) = self.find(x, y, z) else {
            return EMPTY;
        };
        let node = &self.nodes[id];
        if node.is_childless() {
            node.material
        } else {
            EMPTY
        }
    }

    /// Collapses every node whose 8 children are uniform leaves.
    ///
    /// Depth-first: children merge before their parent is considered. A node
    /// collapses when all 8 children exist, none has children of its own, all
    /// share one non-empty material, their mean density is positive, and the
    /// node's own material is empty or already equal. The children are
    /// released. Running it twice is the same as running it once.
    pub fn merge(&mut self) {
        let start = Instant::now();
        let before = self.nodes.len();
        self.merge_node(self.root);
        tracing::debug!(
            before,
            after = self.nodes.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "octree merged"
        );
    }

    fn merge_node(&mut self, id: NodeId) {
        let children = self.nodes[id].children;
        for child in children.into_iter().flatten() {
            self.merge_node(child);
        }

        let Some(ids) = children.into_iter().collect::<Option<Vec<NodeId>>>() else {
            return;
        };
        let material = self.nodes[ids[0]].material;
        if material == EMPTY {
            return;
        }
        let uniform = ids.iter().all(|&c| {
            let child = &self.nodes[c];
            child.is_childless() && child.material == material
        });
        if !uniform {
            return;
        }
        let density = ids.iter().map(|&c| self.nodes[c].density).sum::<f32>() / 8.0;
        if density <= 0.0 {
            return;
        }
        let own = self.nodes[id].material;
        if own != EMPTY && own != material {
            return;
        }

        for &c in &ids {
            self.nodes.release(c);
        }
        let node = &mut self.nodes[id];
        node.children = [None; 8];
        node.material = material;
        node.density = density;
    }

    fn create_child(&mut self, parent: NodeId, octant: usize) -> NodeId {
        let (center, size) = {
            let node = &self.nodes[parent];
            (node.child_center(octant), node.size / 2.0)
        };
        let child = self.nodes.alloc(OctreeNode::new(center, size, Some(parent)));
        self.nodes[parent].children[octant] = Some(child);
        child
    }

    /// Materialises 8 children carrying the node's material and density.
    fn split(&mut self, id: NodeId) {
        let (material, density) = {
            let node = &self.nodes[id];
            (node.material, node.density)
        };
        for octant in 0..8 {
            let child = self.create_child(id, octant);
            let node = &mut self.nodes[child];
            node.material = material;
            node.density = density;
        }
    }

    /// Pre-order traversal from the root, children in octant order.
    #[must_use]
    pub fn dfs(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for child in self.nodes[id].children.iter().rev().flatten() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// Structural summary in traversal order.
    #[must_use]
    pub fn structure(&self) -> Vec<NodeSummary> {
        self.dfs()
            .into_iter()
            .map(|(id, depth)| {
                let node = &self.nodes[id];
                let child_mask = node
                    .children
                    .iter()
                    .enumerate()
                    .fold(0u8, |m, (i, c)| if c.is_some() { m | 1 << i } else { m });
                NodeSummary {
                    depth,
                    center: node.center,
                    size: node.size,
                    material: node.material,
                    child_mask,
                }
            })
            .collect()
    }

    /// Checks that every child points back at its parent and that every live
    /// node is reachable from the root.
    #[must_use]
    pub fn check_parent_links(&self) -> bool {
        let reachable = self.dfs();
        let links_ok = reachable.iter().all(|&(id, _)| {
            self.nodes[id]
                .children
                .iter()
                .flatten()
                .all(|&child| self.nodes.get(child).and_then(OctreeNode::parent) == Some(id))
        });
        links_ok && reachable.len() == self.nodes.len()
    }

    /// One cube per non-empty childless node, at the node's own size.
    #[must_use]
    pub fn naive_mesh(&self) -> MeshBuffer {
        let start = Instant::now();
        let mut mesh = MeshBuffer::new();
        for (id, _) in self.dfs() {
            let node = &self.nodes[id];
            if node.material != EMPTY && node.is_childless() {
                push_cube(&mut mesh, node.min(), node.size);
            }
        }
        tracing::debug!(
            mesher = "octree_cubes",
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "octree cube pass complete"
        );
        mesh
    }

    /// Top faces of non-empty leaves whose upper neighbour is empty.
    ///
    /// Only the +Y direction is contoured.
    #[must_use]
    pub fn dual_contour_mesh(&self) -> MeshBuffer {
        let start = Instant::now();
        let mut mesh = MeshBuffer::new();
        for (id, _) in self.dfs() {
            let node = &self.nodes[id];
            if node.material == EMPTY || !node.is_childless() {
                continue;
            }
            let [cx, cy, cz] = node.center;
            if self.material_at(cx, cy + node.size, cz) != EMPTY {
                continue;
            }
            let [x0, _, z0] = node.min();
            let top = cy + node.size / 2.0;
            let s = node.size;
            let a = mesh.push_vertex([x0, top, z0], UP);
            let b = mesh.push_vertex([x0, top, z0 + s], UP);
            let c = mesh.push_vertex([x0 + s, top, z0 + s], UP);
            let d = mesh.push_vertex([x0 + s, top, z0], UP);
            mesh.push_quad(a, b, c, d);
        }
        tracing::debug!(
            mesher = "dual_contour",
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "octree top-face pass complete"
        );
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovox_core::mesh::face_normal;

    fn count_filled(tree: &Octree) -> usize {
        tree.dfs()
            .into_iter()
            .filter(|&(id, _)| {
                let node = tree.node(id);
                node.material > 0 && node.density > 0.0
            })
            .count()
    }

    /// A 2x2x2 block in one corner plus one voxel in the opposite corner.
    fn corner_block_tree() -> Octree {
        let mut tree = Octree::new([4.0, 4.0, 4.0], 8.0, 1.0);
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    tree.set_voxel(x, y, z, 1);
                }
            }
        }
        tree.set_voxel(7, 7, 7, 1);
        tree
    }

    #[test]
    fn test_merge_collapses_uniform_block() {
        let mut tree = corner_block_tree();
        assert_eq!(count_filled(&tree), 9);

        tree.merge();
        assert_eq!(count_filled(&tree), 2);
        assert!(tree.check_parent_links());

        let block = tree.find(1.0, 1.0, 1.0).unwrap_or_else(|| tree.root());
        assert_eq!(tree.state(block), NodeState::Homogeneous);
        assert_eq!(tree.node(block).size(), 2.0);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut tree = corner_block_tree();
        tree.merge();
        let once = tree.structure();
        let count = tree.node_count();
        tree.merge();
        assert_eq!(tree.structure(), once);
        assert_eq!(tree.node_count(), count);
    }

    #[test]
    fn test_uniform_cube_collapses_to_root() {
        let mut tree = Octree::new([2.0, 2.0, 2.0], 4.0, 1.0);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    tree.set_voxel(x, y, z, 3);
                }
            }
        }
        assert_eq!(tree.node_count(), 1 + 8 + 64);
        tree.merge();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.state(tree.root()), NodeState::Homogeneous);
        assert_eq!(tree.material_at(0.5, 3.5, 2.5), 3);
    }

    #[test]
    fn test_merge_keeps_observable_materials() {
        let mut tree = corner_block_tree();
        tree.set_voxel(4, 0, 0, 2);
        let probe = |t: &Octree| {
            let mut out = Vec::new();
            for x in 0..8 {
                for y in 0..8 {
                    for z in 0..8 {
                        out.push(t.material_at(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5));
                    }
                }
            }
            out
        };
        let before = probe(&tree);
        tree.merge();
        assert_eq!(probe(&tree), before);
    }

    #[test]
    fn test_mixed_children_do_not_merge() {
        let mut tree = Octree::new([1.0, 1.0, 1.0], 2.0, 1.0);
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    tree.set_voxel(x, y, z, if x == 0 { 1 } else { 2 });
                }
            }
        }
        tree.merge();
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.state(tree.root()), NodeState::Subdivided);
    }

    #[test]
    fn test_locate_ascends_from_sibling() {
        let mut tree = Octree::new([4.0, 4.0, 4.0], 8.0, 1.0);
        let a = tree.set_voxel(0, 0, 0, 1);
        let b = tree.locate(a, 6.5, 6.5, 6.5).unwrap_or(a);
        assert_ne!(a, b);
        assert_eq!(tree.node(b).center(), [6.5, 6.5, 6.5]);
        assert_eq!(tree.locate(a, 9.0, 0.0, 0.0), None);
        assert!(tree.check_parent_links());
    }

    #[test]
    fn test_locate_splits_homogeneous_node() {
        let mut tree = Octree::new([1.0, 1.0, 1.0], 2.0, 1.0);
        tree.set_material(tree.root(), 4);
        assert_eq!(tree.state(tree.root()), NodeState::Homogeneous);

        let leaf = tree.locate(tree.root(), 0.5, 0.5, 0.5).unwrap_or(tree.root());
        assert_eq!(tree.state(leaf), NodeState::Leaf);
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.material_at(1.5, 1.5, 1.5), 4);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut tree = corner_block_tree();
        let copy = tree.clone();
        tree.merge();
        assert_eq!(count_filled(&copy), 9);
        assert_ne!(copy.node_count(), tree.node_count());
    }

    #[test]
    #[should_panic(expected = "outside the octree root")]
    fn test_set_voxel_outside_root_panics() {
        let mut tree = Octree::new([1.0, 1.0, 1.0], 2.0, 1.0);
        tree.set_voxel(5, 0, 0, 1);
    }

    #[test]
    fn test_merged_block_emits_one_cube() {
        let mut tree = corner_block_tree();
        tree.merge();
        let mesh = tree.naive_mesh();
        assert_eq!(mesh.triangle_count(), 24);
        assert!((mesh.surface_area() - (24.0 + 6.0)).abs() < 1e-6);
    }

    #[test]
    fn test_top_faces_only_where_open() {
        let mut tree = Octree::new([2.0, 2.0, 2.0], 4.0, 1.0);
        tree.set_voxel(0, 0, 0, 1);
        tree.set_voxel(0, 1, 0, 1);
        tree.set_voxel(2, 0, 0, 1);
        let mesh = tree.dual_contour_mesh();

        // The lower voxel of the column is covered.
        assert_eq!(mesh.triangle_count(), 4);
        for [a, b, c] in mesh.triangle_positions() {
            assert_eq!(face_normal(a, b, c), UP);
        }
    }

    #[test]
    fn test_from_field_matches_solid_samples() {
        let mut field = DensityField::cubic(3);
        field.set(0, 0, 0, -127);
        field.set(2, 1, 2, -64);
        let tree = Octree::from_field(&field, 0.0, 1.0);

        assert_eq!(tree.node(tree.root()).size(), 4.0);
        assert_eq!(tree.material_at(0.5, 0.5, 0.5), 1);
        assert_eq!(tree.material_at(2.5, 1.5, 2.5), 1);
        assert_eq!(tree.material_at(1.5, 1.5, 1.5), 0);
        let leaf = tree.find(0.5, 0.5, 0.5).unwrap_or(tree.root());
        assert!((tree.node(leaf).density - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_field_with_coarse_leaves() {
        let mut field = DensityField::cubic(4);
        field.set(0, 0, 0, -20);
        let tree = Octree::from_field(&field, 0.0, 2.0);

        // The whole 2x2x2 block around the solid voxel becomes one leaf.
        assert_eq!(tree.material_at(1.5, 1.5, 1.5), 1);
        assert_eq!(tree.material_at(2.5, 0.5, 0.5), 0);
        assert_eq!(tree.naive_mesh().triangle_count(), 12);
    }
}
