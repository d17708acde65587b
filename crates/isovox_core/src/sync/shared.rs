//! Per-chunk read/write exclusion.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::field::DensityField;

/// A density field shared between an editor and mesh workers.
///
/// Writers (brush edits) hold the lock for the duration of the edit only.
/// Readers clone the field under the read lock and extract from the copy,
/// so a long extraction never blocks an edit.
pub type SharedField = Arc<RwLock<DensityField>>;

/// Wraps a field for sharing.
#[must_use]
pub fn share(field: DensityField) -> SharedField {
    Arc::new(RwLock::new(field))
}
