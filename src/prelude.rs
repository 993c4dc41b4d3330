//! Common traits and types that are useful for working with `flash2openpmd`
#![allow(unused_imports)]

pub use crate::array::{DenseField, MeshRecord};
pub use crate::interp::InterpolationKind;
pub use crate::loader::{LoadRequest, SnapshotInfo, SnapshotRef};
pub use crate::mesh::{DomainBox, DomainOverride, Geometry};
pub use crate::resample::RefinementFactors;
pub use crate::traits::{GridSource, MeshSink};
pub use crate::Error;

pub(crate) use crate::error;
pub(crate) use crate::utils;

pub(crate) use derive_more::{Deref, Display, From};

pub(crate) use ndarray::{Array3, ArrayView1, ArrayView3, Axis};

pub(crate) use tracing::{debug, info, instrument, warn};
