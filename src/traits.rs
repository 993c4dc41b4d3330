//! # Traits
//!
//! The two seams between the conversion core and the outside world. Neither the
//! AMR file format nor the container encoding is implemented by the core; they
//! are reached through these traits so alternate backends (including purely
//! in-memory ones for tests) can be substituted.
//!

use crate::array::MeshRecord;
use crate::loader::{CoveringGridRequest, SnapshotInfo, SnapshotRef};
use crate::Error;

use ndarray::Array3;
use std::path::PathBuf;

/// describes how to read a uniform covering grid out of a snapshot
///
/// Implementations are used for the duration of a single call and must not keep
/// the snapshot open between calls. A snapshot that cannot be opened or parsed is
/// reported as [`Error::SnapshotLoad`].
///
/// ```ignore
/// struct Constant;
///
/// impl GridSource for Constant {
///     fn describe(&self, _: &SnapshotRef) -> Result<SnapshotInfo, Error> {
///         Ok(SnapshotInfo { /* header values */ })
///     }
///
///     fn covering_grid(
///         &self,
///         _: &SnapshotRef,
///         request: &CoveringGridRequest,
///     ) -> Result<Array3<f32>, Error> {
///         let [nx, ny, nz] = request.dims;
///         Ok(Array3::from_elem((nx, ny, nz), 1.0))
///     }
/// }
/// ```
pub trait GridSource {
    /// Read the header information of a snapshot: domain edges, native
    /// resolution, refinement levels, geometry and the available fields.
    fn describe(&self, snapshot: &SnapshotRef) -> Result<SnapshotInfo, Error>;

    /// Sample `request.field` on a uniform grid of `request.dims` cells spanning
    /// `request.left_edge..request.right_edge` at refinement `request.level`.
    ///
    /// The returned array is indexed `(x, y, z)` and its shape must equal
    /// `request.dims`.
    fn covering_grid(
        &self,
        snapshot: &SnapshotRef,
        request: &CoveringGridRequest,
    ) -> Result<Array3<f32>, Error>;
}

/// describes how a finished mesh record is persisted
///
/// Records are handed over with [`store`](MeshSink::store) and nothing is
/// considered written until [`flush`](MeshSink::flush) succeeds. A sink that
/// fails, or is dropped before flushing, must not leave a complete looking
/// container behind.
pub trait MeshSink {
    /// queue a record for writing. The record is never modified afterwards.
    fn store(&mut self, record: MeshRecord) -> Result<(), Error>;

    /// write every stored record and return the path of the finished container
    fn flush(&mut self) -> Result<PathBuf, Error>;
}
