use super::DenseSnapshot;
use crate::loader::{CoveringGridRequest, SnapshotInfo};
use crate::prelude::*;

use std::fs;

/// Reads [`DenseSnapshot`] documents stored as JSON at `<directory>/<filename>`.
///
/// The file is opened and parsed again on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSource;

impl JsonSource {
    pub fn read(&self, snapshot: &SnapshotRef) -> Result<DenseSnapshot, Error> {
        let path = snapshot.path();

        let text = fs::read_to_string(&path)
            .map_err(|e| error::SnapshotLoad::new(snapshot, e.to_string()))?;

        let data = serde_json::from_str(&text)
            .map_err(|e| error::SnapshotLoad::new(snapshot, format!("malformed snapshot: {e}")))?;

        debug!(path = %path.display(), "parsed json snapshot");
        Ok(data)
    }
}

impl GridSource for JsonSource {
    fn describe(&self, snapshot: &SnapshotRef) -> Result<SnapshotInfo, Error> {
        Ok(self.read(snapshot)?.info())
    }

    fn covering_grid(
        &self,
        snapshot: &SnapshotRef,
        request: &CoveringGridRequest,
    ) -> Result<Array3<f32>, Error> {
        self.read(snapshot)?
            .covering_grid(request)
            .map_err(|reason| error::SnapshotLoad::new(snapshot, reason).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_document_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let domain = DomainBox::new([0.0; 3], [1.0; 3]).unwrap();
        let data = DenseSnapshot::new("cylindrical", 2, &domain, [4, 4, 1])
            .with_field("density", Array3::from_elem((4, 4, 1), 3.0));

        fs::write(
            dir.path().join("plt_0001.json"),
            serde_json::to_string(&data).unwrap(),
        )
        .unwrap();

        let snapshot = SnapshotRef::new(dir.path(), "plt_0001.json").unwrap();
        let info = JsonSource.describe(&snapshot).unwrap();
        assert_eq!(info.geometry, "cylindrical");
        assert_eq!(info.fields, vec!["density".to_string()]);
    }

    #[test]
    fn unreadable_snapshots_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ \"geometry\": ").unwrap();

        let missing = SnapshotRef::new(dir.path(), "missing.json").unwrap();
        let broken = SnapshotRef::new(dir.path(), "broken.json").unwrap();

        assert!(matches!(JsonSource.describe(&missing), Err(Error::SnapshotLoad(_))));
        assert!(matches!(JsonSource.describe(&broken), Err(Error::SnapshotLoad(_))));
    }
}
