//! # flash2openpmd
//!
//! Convert FLASH adaptive-mesh-refinement snapshots into openPMD mesh records.
//!
//! A conversion runs in a straight line:
//!
//! ```text
//! GridSource -> load -> [rotate_to_cartesian] -> resample -> finalize -> MeshSink
//! ```
//!
//! The AMR reader and the container writer are reached only through the
//! [`GridSource`] and [`MeshSink`] traits, so the resamplers can be driven from
//! synthetic in-memory snapshots (see [`source::MemorySource`]).
//!
//! ```no_run
//! use flash2openpmd::config::ConversionConfig;
//! use flash2openpmd::source::JsonSource;
//!
//! let config = ConversionConfig::from_path("conversion.json".as_ref())?;
//! let report = flash2openpmd::pipeline::convert(&JsonSource, &config)?;
//! println!("wrote {}", report.output.display());
//! # Ok::<(), flash2openpmd::Error>(())
//! ```

pub mod array;
pub mod config;
pub mod cylindrical;
pub mod emit;
pub mod error;
pub mod finalize;
pub mod interp;
pub mod loader;
pub mod mesh;
pub mod pipeline;
pub mod prelude;
pub mod resample;
pub mod source;
mod traits;
mod utils;

pub use traits::GridSource;
pub use traits::MeshSink;

pub use array::{DataOrder, DenseField, MeshRecord, AXIS_LABELS};
pub use mesh::{DomainBox, DomainOverride, Geometry};

pub use cylindrical::rotate_to_cartesian;
pub use finalize::finalize;
pub use interp::InterpolationKind;
pub use loader::{load, LoadRequest, LoadedGrid, SnapshotRef};
pub use resample::{resample, RefinementFactors};

pub use ndarray;

use derive_more::From;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug, From)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(error::InvalidInput),
    #[error("failed to load snapshot: {0}")]
    SnapshotLoad(error::SnapshotLoad),
    #[error("precondition failed: {0}")]
    Precondition(error::Precondition),
    #[error("insufficient samples: {0}")]
    InsufficientSamples(error::InsufficientSamples),
    #[error("degenerate field: {0}")]
    DegenerateField(error::DegenerateField),
    #[error("could not emit mesh record: {0}")]
    Emit(error::Emit),
    #[error("could not read mesh container: {0}")]
    Container(error::ContainerRead),
}
