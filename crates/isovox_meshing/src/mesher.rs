//! # Mesher Dispatch
//!
//! One closed set of meshers behind one `extract(field, isolevel)` contract.
//!
//! ```text
//! ┌────────────────┐   extract(field, iso)   ┌────────────┐
//! │ Mesher variant │ ──────────────────────► │ MeshBuffer │
//! └────────────────┘                         └────────────┘
//!        │
//!        ├── block meshers see the field through an isolevel threshold
//!        ├── surface meshers read the densities directly
//!        └── octree meshers build and merge a tree first
//! ```

use std::fmt;
use std::str::FromStr;

use isovox_core::material::{MaterialId, VoxelGrid, EMPTY, SOLID};
use isovox_core::{DensityField, MeshBuffer};
use serde::{Deserialize, Serialize};

use crate::config::MeshingConfig;
use crate::error::{MeshingError, MeshingResult};
use crate::greedy::GreedyMesher;
use crate::marching_cubes::MarchingCubes;
use crate::naive::NaiveMesher;
use crate::octree::Octree;
use crate::qef::QefDualContour;
use crate::transvoxel::Transvoxel;

/// Anything that turns a density field into a mesh.
pub trait SurfaceExtractor: Send + Sync {
    /// Extracts the surface of `field` at `isolevel`.
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// The available meshers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mesher {
    /// One cube per solid voxel.
    Naive,
    /// Cubes for solid voxels with at least one open face.
    Culled,
    /// Merged coplanar faces. Needs a cubic field.
    Greedy,
    /// Classic table-driven isosurface.
    MarchingCubes,
    /// Marching Cubes with vertex reuse and fixed-point edges.
    #[default]
    Transvoxel,
    /// Cubes over a merged octree.
    OctreeCubes,
    /// +Y top faces over a merged octree.
    DualContour,
    /// Full 3-axis dual contouring with a QEF vertex per cell.
    QefDualContour,
}

impl Mesher {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Naive,
        Self::Culled,
        Self::Greedy,
        Self::MarchingCubes,
        Self::Transvoxel,
        Self::OctreeCubes,
        Self::DualContour,
        Self::QefDualContour,
    ];

    /// Config and log name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Culled => "culled",
            Self::Greedy => "greedy",
            Self::MarchingCubes => "marching_cubes",
            Self::Transvoxel => "transvoxel",
            Self::OctreeCubes => "octree_cubes",
            Self::DualContour => "dual_contour",
            Self::QefDualContour => "qef_dual_contour",
        }
    }

    /// True for meshers that emit axis-aligned block faces.
    #[must_use]
    pub const fn is_blocky(self) -> bool {
        matches!(
            self,
            Self::Naive | Self::Culled | Self::Greedy | Self::OctreeCubes | Self::DualContour
        )
    }

    /// Checks that `field` has a shape this mesher accepts.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::UnsupportedField`] for greedy meshing of a
    /// non-cubic field.
    pub fn check_field(self, field: &DensityField) -> MeshingResult<()> {
        if self == Self::Greedy && !field.is_cubic() {
            return Err(MeshingError::UnsupportedField {
                mesher: self.name(),
                dims: field.dims(),
            });
        }
        Ok(())
    }

    /// Extracts with default settings.
    ///
    /// # Panics
    ///
    /// [`Mesher::Greedy`] panics if the field is not cubic.
    #[must_use]
    pub fn extract(self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        self.extractor(&MeshingConfig::default()).extract(field, isolevel)
    }

    /// Builds the extractor for this variant, tuned by `config`.
    ///
    /// Only the per-mesher options are read; `config.mesher` is ignored.
    #[must_use]
    pub fn extractor(self, config: &MeshingConfig) -> Box<dyn SurfaceExtractor> {
        match self {
            Self::Naive => Box::new(NaiveMesher::new()),
            Self::Culled => Box::new(NaiveMesher::culled()),
            Self::Greedy => Box::new(GreedyExtractor),
            Self::MarchingCubes => {
                Box::new(MarchingCubes::new().with_gradient_normals(config.gradient_normals))
            }
            Self::Transvoxel => Box::new(Transvoxel::new().with_reuse(config.transvoxel_reuse)),
            Self::OctreeCubes => Box::new(OctreeExtractor {
                leaf_size: config.octree_min_leaf,
                top_faces_only: false,
            }),
            Self::DualContour => Box::new(OctreeExtractor {
                leaf_size: config.octree_min_leaf,
                top_faces_only: true,
            }),
            Self::QefDualContour => Box::new(QefDualContour::new()),
        }
    }
}

impl fmt::Display for Mesher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mesher {
    type Err = MeshingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MeshingError::UnknownMesher(s.to_owned()))
    }
}

/// A density field seen as a block grid: samples below the isolevel are
/// solid.
#[derive(Clone, Copy, Debug)]
pub struct IsoGrid<'a> {
    field: &'a DensityField,
    isolevel: f32,
}

impl<'a> IsoGrid<'a> {
    /// Thresholds `field` at `isolevel`.
    #[must_use]
    pub const fn new(field: &'a DensityField, isolevel: f32) -> Self {
        Self { field, isolevel }
    }
}

impl VoxelGrid for IsoGrid<'_> {
    fn dims(&self) -> [usize; 3] {
        self.field.dims()
    }

    fn material(&self, x: usize, y: usize, z: usize) -> MaterialId {
        if f32::from(self.field.get(x, y, z)) < self.isolevel {
            SOLID
        } else {
            EMPTY
        }
    }
}

impl SurfaceExtractor for NaiveMesher {
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        self.mesh(&IsoGrid::new(field, isolevel))
    }

    fn name(&self) -> &'static str {
        if *self == Self::culled() {
            "culled"
        } else {
            "naive"
        }
    }
}

impl SurfaceExtractor for MarchingCubes {
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        MarchingCubes::extract(self, field, isolevel)
    }

    fn name(&self) -> &'static str {
        "marching_cubes"
    }
}

impl SurfaceExtractor for Transvoxel {
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        Transvoxel::extract(self, field, isolevel)
    }

    fn name(&self) -> &'static str {
        "transvoxel"
    }
}

impl SurfaceExtractor for QefDualContour {
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        QefDualContour::extract(self, field, isolevel)
    }

    fn name(&self) -> &'static str {
        "qef_dual_contour"
    }
}

/// Greedy meshing with fresh working buffers per call.
#[derive(Clone, Copy, Debug, Default)]
struct GreedyExtractor;

impl SurfaceExtractor for GreedyExtractor {
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        GreedyMesher::new().mesh(&IsoGrid::new(field, isolevel))
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Builds a merged octree per call and meshes it.
#[derive(Clone, Copy, Debug)]
struct OctreeExtractor {
    leaf_size: f32,
    top_faces_only: bool,
}

impl SurfaceExtractor for OctreeExtractor {
    fn extract(&self, field: &DensityField, isolevel: f32) -> MeshBuffer {
        let tree = Octree::from_field(field, isolevel, self.leaf_size);
        if self.top_faces_only {
            tree.dual_contour_mesh()
        } else {
            tree.naive_mesh()
        }
    }

    fn name(&self) -> &'static str {
        if self.top_faces_only {
            "dual_contour"
        } else {
            "octree_cubes"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for mesher in Mesher::ALL {
            assert_eq!(mesher.name().parse::<Mesher>().ok(), Some(mesher));
            assert_eq!(mesher.to_string(), mesher.name());
            assert_eq!(mesher.extractor(&MeshingConfig::default()).name(), mesher.name());
        }
        assert!(matches!(
            "blocky".parse::<Mesher>(),
            Err(MeshingError::UnknownMesher(name)) if name == "blocky"
        ));
    }

    #[test]
    fn test_iso_grid_threshold() {
        let mut field = DensityField::cubic(2);
        field.set(0, 0, 0, -5);
        field.set(1, 0, 0, 10);
        let grid = IsoGrid::new(&field, 0.0);
        assert_eq!(grid.material(0, 0, 0), SOLID);
        assert_eq!(grid.material(1, 0, 0), EMPTY);
        // Samples exactly on the isolevel count as empty.
        assert_eq!(grid.material(0, 1, 0), EMPTY);

        let raised = IsoGrid::new(&field, 20.0);
        assert_eq!(raised.material(1, 0, 0), SOLID);
    }

    #[test]
    fn test_single_voxel_through_every_mesher() {
        let mut field = DensityField::cubic(4);
        field.set(1, 1, 1, -100);
        for mesher in Mesher::ALL {
            let mesh = mesher.extract(&field, 0.0);
            assert!(mesh.triangle_count() > 0, "{mesher} produced nothing");
            assert!(mesh.validate().is_ok(), "{mesher} produced an invalid mesh");
        }
        // The top-face pass sees exactly one open top.
        assert_eq!(Mesher::DualContour.extract(&field, 0.0).triangle_count(), 2);
    }

    #[test]
    fn test_raised_isolevel_keeps_the_outside_empty() {
        let mut field = DensityField::cubic(4);
        field.fill(50);
        for mesher in Mesher::ALL {
            let mesh = mesher.extract(&field, 10.0);
            assert!(mesh.is_empty(), "{mesher} meshed an empty field at isolevel 10");
        }

        field.set(1, 1, 1, 0);
        for mesher in Mesher::ALL {
            let mesh = mesher.extract(&field, 10.0);
            assert!(mesh.triangle_count() > 0, "{mesher} missed the voxel at isolevel 10");
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn test_check_field_rejects_non_cubic_greedy() {
        let flat = DensityField::new([4, 4, 2]);
        assert!(matches!(
            Mesher::Greedy.check_field(&flat),
            Err(MeshingError::UnsupportedField { mesher: "greedy", dims: [4, 4, 2] })
        ));
        for mesher in Mesher::ALL.into_iter().filter(|&m| m != Mesher::Greedy) {
            assert!(mesher.check_field(&flat).is_ok(), "{mesher} rejected a flat field");
        }
        assert!(Mesher::Greedy.check_field(&DensityField::cubic(4)).is_ok());
    }

    #[test]
    fn test_blocky_variants() {
        assert!(Mesher::Greedy.is_blocky());
        assert!(!Mesher::Transvoxel.is_blocky());
        assert_eq!(Mesher::default(), Mesher::Transvoxel);
    }
}
