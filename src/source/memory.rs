use super::DenseSnapshot;
use crate::loader::{CoveringGridRequest, SnapshotInfo};
use crate::prelude::*;

use std::collections::HashMap;
use std::path::PathBuf;

/// Snapshots held in memory, keyed by their path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    snapshots: HashMap<PathBuf, DenseSnapshot>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// register `data` under the location of `snapshot`, replacing what was there
    pub fn insert(&mut self, snapshot: &SnapshotRef, data: DenseSnapshot) {
        self.snapshots.insert(snapshot.path(), data);
    }

    pub fn with(mut self, snapshot: &SnapshotRef, data: DenseSnapshot) -> Self {
        self.insert(snapshot, data);
        self
    }

    fn get(&self, snapshot: &SnapshotRef) -> Result<&DenseSnapshot, Error> {
        self.snapshots
            .get(&snapshot.path())
            .ok_or_else(|| error::SnapshotLoad::new(snapshot, "no such snapshot").into())
    }
}

impl GridSource for MemorySource {
    fn describe(&self, snapshot: &SnapshotRef) -> Result<SnapshotInfo, Error> {
        Ok(self.get(snapshot)?.info())
    }

    fn covering_grid(
        &self,
        snapshot: &SnapshotRef,
        request: &CoveringGridRequest,
    ) -> Result<Array3<f32>, Error> {
        self.get(snapshot)?
            .covering_grid(request)
            .map_err(|reason| error::SnapshotLoad::new(snapshot, reason).into())
    }
}

#[test]
fn unknown_snapshot_fails_to_load() {
    let source = MemorySource::new();
    let snapshot = SnapshotRef::new("runs", "lasslab_hdf5_plt_cnt_0001").unwrap();

    assert!(matches!(
        source.describe(&snapshot),
        Err(Error::SnapshotLoad(_))
    ));
}
