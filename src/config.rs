//! Explicit parameters of one conversion run.
//!
//! A run is described entirely by a [`ConversionConfig`]; nothing in the
//! conversion core consults the environment or prompts for input. The value is
//! usually read from a JSON document:
//!
//! ```json
//! {
//!     "snapshot": { "directory": "runs/lasslab", "filename": "lasslab_hdf5_plt_cnt_0043" },
//!     "level": 4,
//!     "domain": { "lower": [0.0, 0.0, 0.0] },
//!     "field": "density",
//!     "refinement": [2, 2, 1],
//!     "normalize": true,
//!     "output": { "directory": "output", "name": "lasslab_0043", "record": "e_density" }
//! }
//! ```

use crate::loader::{validate_field_name, LoadRequest};
use crate::prelude::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    pub snapshot: SnapshotConfig,
    /// refinement level of the covering grid
    #[serde(default = "default_level")]
    pub level: u32,
    /// replaces the snapshot's domain edges when given
    #[serde(default)]
    pub domain: Option<DomainOverride>,
    #[serde(default = "default_field")]
    pub field: String,
    /// refinement factors along x, y and z; signed so that negative values are
    /// reported instead of failing to parse
    #[serde(default = "default_refinement")]
    pub refinement: [i64; 3],
    #[serde(default)]
    pub interpolation: InterpolationKind,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    pub directory: PathBuf,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// openPMD series in the JSON layout
    #[default]
    OpenpmdJson,
    /// VTK rectilinear grid with ascii arrays
    VtkAscii,
    /// VTK rectilinear grid with base64 arrays
    VtkBase64,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::OpenpmdJson => "json",
            Self::VtkAscii | Self::VtkBase64 => "vtr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// file name of the container, without extension
    pub name: String,
    /// name of the mesh record inside the container
    pub record: String,
    pub author: Option<String>,
    pub format: OutputFormat,
    /// conversion of the stored values to SI
    pub unit_si: f64,
    /// powers of `(L, M, T, I, theta, N, J)` of the stored quantity
    pub unit_dimension: [f64; 7],
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            name: "converted".to_string(),
            record: "e_density".to_string(),
            author: None,
            format: OutputFormat::default(),
            unit_si: 1.0,
            unit_dimension: [0.0; 7],
        }
    }
}

impl OutputConfig {
    /// `<directory>/<name>.<extension>`
    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.name, self.format.extension()))
    }

    fn validate(&self) -> Result<(), Error> {
        let name = self.name.trim();
        if name.is_empty()
            || name.contains(|c: char| c == '/' || c == '\\')
            || name == "."
            || name == ".."
        {
            let reason = format!("`{}` is not a plain file name", self.name);
            return Err(error::InvalidInput::new("output name", reason).into());
        }

        if self.record.trim().is_empty() {
            return Err(error::InvalidInput::new("record name", "must not be empty").into());
        }

        if !self.unit_si.is_finite() || self.unit_si <= 0.0 {
            let reason = format!("{} is not a positive finite number", self.unit_si);
            return Err(error::InvalidInput::new("unit_si", reason).into());
        }

        Ok(())
    }
}

fn default_level() -> u32 {
    4
}

fn default_field() -> String {
    "density".to_string()
}

fn default_refinement() -> [i64; 3] {
    [1, 1, 1]
}

impl ConversionConfig {
    /// a configuration with every optional parameter at its default
    pub fn new<P: Into<PathBuf>, T: Into<String>>(directory: P, filename: T) -> Self {
        Self {
            snapshot: SnapshotConfig {
                directory: directory.into(),
                filename: filename.into(),
            },
            level: default_level(),
            domain: None,
            field: default_field(),
            refinement: default_refinement(),
            interpolation: InterpolationKind::default(),
            normalize: false,
            output: OutputConfig::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| {
            error::InvalidInput::new("configuration", format!("{}: {e}", path.display()))
        })?;

        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text)
            .map_err(|e| error::InvalidInput::new("configuration", e.to_string()).into())
    }

    /// Check every parameter that can be checked without opening the snapshot.
    pub fn validate(&self) -> Result<(), Error> {
        self.snapshot_ref()?;
        validate_field_name(&self.field)?;
        self.refinement_factors()?;

        if let Some(domain) = &self.domain {
            let finite = domain
                .lower
                .iter()
                .chain(domain.upper.iter().flatten())
                .all(|v| v.is_finite());

            if !finite {
                let reason = format!("{domain:?} contains a non finite edge");
                return Err(error::InvalidInput::new("domain override", reason).into());
            }
        }

        self.output.validate()
    }

    /// refinement factors as unsigned counts, rejecting anything below one
    pub fn refinement_factors(&self) -> Result<RefinementFactors, Error> {
        let mut factors = [0usize; 3];

        for (axis, (&given, factor)) in self.refinement.iter().zip(&mut factors).enumerate() {
            *factor = usize::try_from(given).ok().filter(|&f| f > 0).ok_or_else(|| {
                let reason = format!(
                    "factor along {} is {given}, factors must be positive",
                    crate::array::AXIS_NAMES[axis]
                );
                error::InvalidInput::new("refinement factors", reason)
            })?;
        }

        Ok(RefinementFactors::new(factors[0], factors[1], factors[2]))
    }

    pub fn snapshot_ref(&self) -> Result<SnapshotRef, Error> {
        SnapshotRef::new(&self.snapshot.directory, self.snapshot.filename.as_str())
    }

    pub fn load_request(&self) -> LoadRequest {
        LoadRequest {
            field: self.field.clone(),
            level: self.level,
            domain: self.domain.clone(),
        }
    }
}
