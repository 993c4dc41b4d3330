//! Grid loader: turn a snapshot into a [`DenseField`] on a uniform covering grid.

use crate::prelude::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Location of one snapshot, a directory plus a file name.
///
/// The path is used exactly as given: no glob matching and no home directory
/// expansion happen here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotRef {
    directory: PathBuf,
    filename: String,
}

impl SnapshotRef {
    pub fn new<P: Into<PathBuf>, T: Into<String>>(directory: P, filename: T) -> Result<Self, Error> {
        let directory = directory.into();
        let filename = filename.into();

        if directory.as_os_str().is_empty() {
            return Err(error::InvalidInput::new("snapshot directory", "must not be empty").into());
        }

        if filename.trim().is_empty() {
            return Err(error::InvalidInput::new("snapshot filename", "must not be empty").into());
        }

        Ok(Self {
            directory,
            filename,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

impl fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Header information of a snapshot, as reported by a [`GridSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    /// declared coordinate system, e.g. `"cartesian"` or `"cylindrical"`
    pub geometry: String,
    /// number of refining axes (2 for planar runs, the third axis is flat)
    pub dimensionality: usize,
    pub domain_left_edge: [f64; 3],
    pub domain_right_edge: [f64; 3],
    /// cells across the domain at level 0
    pub domain_dimensions: [usize; 3],
    /// branching factor between refinement levels
    pub refine_by: usize,
    pub max_level: u32,
    /// names of the scalar fields that can be sampled
    pub fields: Vec<String>,
}

/// What the loader asks a [`GridSource`] for.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveringGridRequest {
    pub field: String,
    pub level: u32,
    pub left_edge: [f64; 3],
    pub right_edge: [f64; 3],
    /// number of cells along x, y and z
    pub dims: [usize; 3],
}

/// Parameters of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// scalar field to extract, e.g. `density` or `El_number_density`
    pub field: String,
    pub level: u32,
    pub domain: Option<DomainOverride>,
}

/// Output of the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGrid {
    pub field: DenseField,
    pub geometry: Geometry,
}

/// field names are plain identifiers: ASCII letters, digits and underscores
pub fn validate_field_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(error::InvalidInput::new("field name", "must not be empty").into());
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        let reason = format!("`{name}` contains the character {bad:?}");
        return Err(error::InvalidInput::new("field name", reason).into());
    }

    Ok(())
}

/// Load `request.field` from `snapshot` as a uniform covering grid.
///
/// The grid resolution is the native resolution multiplied by
/// `refine_by ^ level` along every refining axis; axes beyond the snapshot's
/// dimensionality keep their native resolution. When a domain override is
/// given the number of cells shrinks in proportion so the cell size is the same
/// as for the whole domain.
#[instrument(skip_all, fields(snapshot = %snapshot, field = %request.field, level = request.level))]
pub fn load<S>(source: &S, snapshot: &SnapshotRef, request: &LoadRequest) -> Result<LoadedGrid, Error>
where
    S: GridSource + ?Sized,
{
    validate_field_name(&request.field)?;

    let info = source.describe(snapshot)?;

    let geometry = Geometry::from_declared(&info.geometry, info.dimensionality).ok_or_else(|| {
        error::SnapshotLoad::new(
            snapshot,
            format!(
                "unsupported geometry `{}` with {} dimensions",
                info.geometry, info.dimensionality
            ),
        )
    })?;

    if request.level > info.max_level {
        let reason = format!(
            "level {} requested, the snapshot refines up to level {}",
            request.level, info.max_level
        );
        return Err(error::InvalidInput::new("refinement level", reason).into());
    }

    if !info.fields.iter().any(|field| field == &request.field) {
        let reason = format!(
            "field `{}` is not present, available fields: {}",
            request.field,
            info.fields.join(", ")
        );
        return Err(error::SnapshotLoad::new(snapshot, reason).into());
    }

    let native = DomainBox::new(info.domain_left_edge, info.domain_right_edge)
        .map_err(|e| error::SnapshotLoad::new(snapshot, format!("bad domain edges: {e}")))?;

    let domain = match &request.domain {
        Some(over) => over.resolve(&native)?,
        None => native.clone(),
    };

    let scale = axis_scales(&info, request.level)
        .ok_or_else(|| error::InvalidInput::new("refinement level", "grid size overflows"))?;

    let mut dims = [0; 3];
    for axis in 0..3 {
        let full = (info.domain_dimensions[axis] * scale[axis]) as f64;
        let fraction = domain.extent(axis) / native.extent(axis);
        dims[axis] = ((full * fraction).round() as usize).max(1);
    }

    debug!(?dims, ?scale, %geometry, "requesting covering grid");

    let covering = CoveringGridRequest {
        field: request.field.clone(),
        level: request.level,
        left_edge: domain.lower(),
        right_edge: domain.upper(),
        dims,
    };

    let values = source.covering_grid(snapshot, &covering)?;

    let (nx, ny, nz) = values.dim();
    if [nx, ny, nz] != dims {
        let reason = format!("covering grid has shape {:?}, expected {dims:?}", [nx, ny, nz]);
        return Err(error::SnapshotLoad::new(snapshot, reason).into());
    }

    info!(?dims, %geometry, "loaded covering grid");

    Ok(LoadedGrid {
        field: DenseField::new(values, domain),
        geometry,
    })
}

/// resolution multiplier per axis, `None` on overflow or a zero branching factor
fn axis_scales(info: &SnapshotInfo, level: u32) -> Option<[usize; 3]> {
    if info.refine_by == 0 {
        return None;
    }

    let refined = info.refine_by.checked_pow(level)?;
    let mut scale = [1; 3];

    for (axis, s) in scale.iter_mut().enumerate() {
        if axis < info.dimensionality && info.domain_dimensions[axis] > 1 {
            *s = refined;
        }
        info.domain_dimensions[axis].checked_mul(*s)?;
    }

    Some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planar_info() -> SnapshotInfo {
        SnapshotInfo {
            geometry: "cartesian".into(),
            dimensionality: 2,
            domain_left_edge: [0.0, 0.0, 0.0],
            domain_right_edge: [1.0, 1.0, 1.0],
            domain_dimensions: [8, 4, 1],
            refine_by: 2,
            max_level: 4,
            fields: vec!["density".into()],
        }
    }

    #[test]
    fn flattened_axis_is_not_refined() {
        assert_eq!(axis_scales(&planar_info(), 3), Some([8, 8, 1]));
        assert_eq!(axis_scales(&planar_info(), 0), Some([1, 1, 1]));
    }

    #[test]
    fn zero_branching_factor_is_rejected() {
        let mut info = planar_info();
        info.refine_by = 0;
        assert_eq!(axis_scales(&info, 1), None);
    }

    #[test]
    fn field_names_are_identifiers() {
        assert!(validate_field_name("density").is_ok());
        assert!(validate_field_name("El_number_density").is_ok());
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name("gas density").is_err());
        assert!(validate_field_name("dens/../x").is_err());
    }

    #[test]
    fn empty_snapshot_reference_is_rejected() {
        assert!(matches!(
            SnapshotRef::new("data", ""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            SnapshotRef::new("", "lasslab_hdf5_plt_cnt_0043"),
            Err(Error::InvalidInput(_))
        ));

        let snapshot = SnapshotRef::new("data", "lasslab_hdf5_plt_cnt_0043").unwrap();
        assert_eq!(
            snapshot.path(),
            Path::new("data").join("lasslab_hdf5_plt_cnt_0043")
        );
    }
}
