//! container types for fields moving through the conversion pipeline
//!
//! A [`DenseField`] is what the loader and both resamplers hand to each other. It
//! is indexed `(x, y, z)` while it is being interpolated. [`finalize`](crate::finalize())
//! turns it into a [`MeshRecord`], stored `(z, y, x)` the way openPMD readers
//! expect it.

mod dense;
mod record;

pub use dense::DenseField;
pub use record::{DataOrder, MeshRecord, AXIS_LABELS};

/// names of the internal `(x, y, z)` axes, used in error messages
pub(crate) const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];
