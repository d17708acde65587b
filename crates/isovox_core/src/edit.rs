//! # Brush Edits
//!
//! A voxel click nudges the 3x3x3 neighbourhood around the clicked sample
//! one step toward solid or toward empty. Callers re-extract the whole chunk
//! afterwards; there is no incremental remesh.

use crate::field::{Density, DensityField, DENSITY_SOLID};

/// Direction of a brush edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// Push samples toward solid, stopping at [`DENSITY_SOLID`].
    Fill,
    /// Pull solid samples back toward the surface, stopping at 0.
    Carve,
}

impl EditOp {
    /// Applies one brush step to a single sample.
    #[inline]
    #[must_use]
    pub const fn apply(self, value: Density) -> Density {
        match self {
            Self::Fill if value > DENSITY_SOLID => value - 1,
            Self::Carve if value < 0 => value + 1,
            _ => value,
        }
    }
}

/// Brush radius in samples along each axis.
pub const BRUSH_RADIUS: i32 = 1;

/// Applies `op` to every sample within [`BRUSH_RADIUS`] of `(x, y, z)`.
///
/// Neighbours outside the field are skipped. Returns the number of samples
/// whose value changed.
pub fn apply_brush(field: &mut DensityField, x: i32, y: i32, z: i32, op: EditOp) -> usize {
    let [nx, ny, nz] = field.dims();
    let mut changed = 0;

    for dx in -BRUSH_RADIUS..=BRUSH_RADIUS {
        for dy in -BRUSH_RADIUS..=BRUSH_RADIUS {
            for dz in -BRUSH_RADIUS..=BRUSH_RADIUS {
                let (px, py, pz) = (x + dx, y + dy, z + dz);
                if px < 0 || py < 0 || pz < 0 {
                    continue;
                }
                let (px, py, pz) = (px as usize, py as usize, pz as usize);
                if px >= nx || py >= ny || pz >= nz {
                    continue;
                }
                let before = field.get(px, py, pz);
                let after = op.apply(before);
                if after != before {
                    field.set(px, py, pz, after);
                    changed += 1;
                }
            }
        }
    }

    tracing::trace!(x, y, z, ?op, changed, "brush applied");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_clamps_at_solid() {
        assert_eq!(EditOp::Fill.apply(0), -1);
        assert_eq!(EditOp::Fill.apply(-126), -127);
        assert_eq!(EditOp::Fill.apply(DENSITY_SOLID), DENSITY_SOLID);
    }

    #[test]
    fn test_carve_stops_at_surface() {
        assert_eq!(EditOp::Carve.apply(-3), -2);
        assert_eq!(EditOp::Carve.apply(-1), 0);
        assert_eq!(EditOp::Carve.apply(0), 0);
        assert_eq!(EditOp::Carve.apply(40), 40);
    }

    #[test]
    fn test_brush_touches_full_neighbourhood() {
        let mut field = DensityField::cubic(5);
        let changed = apply_brush(&mut field, 2, 2, 2, EditOp::Fill);
        assert_eq!(changed, 27);
        assert_eq!(field.solid_count(), 27);
        assert_eq!(field.get(1, 1, 1), -1);
        assert_eq!(field.get(0, 0, 0), 0);
    }

    #[test]
    fn test_brush_clipped_at_corner() {
        let mut field = DensityField::cubic(4);
        let changed = apply_brush(&mut field, 0, 0, 0, EditOp::Fill);
        assert_eq!(changed, 8);
    }

    #[test]
    fn test_carve_undoes_fill() {
        let mut field = DensityField::cubic(4);
        apply_brush(&mut field, 1, 1, 1, EditOp::Fill);
        apply_brush(&mut field, 1, 1, 1, EditOp::Carve);
        assert_eq!(field, DensityField::cubic(4));
    }
}
