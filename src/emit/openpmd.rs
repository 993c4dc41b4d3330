use super::write_atomically;
use crate::array::{DataOrder, MeshRecord};
use crate::error::{self, EmitFailure};
use crate::prelude::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const OPENPMD_VERSION: &str = "1.1.0";
const BASE_PATH: &str = "/data/%T/";
const MESHES_PATH: &str = "meshes/";
const ITERATION: &str = "0";

/// An openPMD series in the JSON layout of the openPMD-api, holding a single
/// iteration.
///
/// ```no_run
/// use flash2openpmd::emit::OpenPmdJson;
/// use flash2openpmd::MeshSink;
/// # fn record() -> flash2openpmd::MeshRecord { unimplemented!() }
///
/// let mut sink = OpenPmdJson::create("output/laser.json").with_author("A. Physicist");
/// sink.store(record())?;
/// let path = sink.flush()?;
/// # Ok::<(), flash2openpmd::Error>(())
/// ```
#[derive(Debug)]
pub struct OpenPmdJson {
    path: PathBuf,
    author: Option<String>,
    records: Vec<MeshRecord>,
    flushed: bool,
}

impl OpenPmdJson {
    pub fn create<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            author: None,
            records: Vec::new(),
            flushed: false,
        }
    }

    pub fn with_author<T: Into<String>>(mut self, author: T) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fail<T: Into<EmitFailure>>(&self, failure: T) -> Error {
        error::Emit::new(&self.path, failure).into()
    }
}

impl MeshSink for OpenPmdJson {
    fn store(&mut self, record: MeshRecord) -> Result<(), Error> {
        if self.flushed {
            return Err(self.fail(EmitFailure::AlreadyFlushed));
        }

        if self.records.iter().any(|r| r.name() == record.name()) {
            return Err(self.fail(EmitFailure::DuplicateRecord(record.name().to_string())));
        }

        self.records.push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<PathBuf, Error> {
        if self.flushed {
            return Err(self.fail(EmitFailure::AlreadyFlushed));
        }

        if self.records.is_empty() {
            return Err(self.fail(EmitFailure::Empty));
        }

        let series = Series::new(self.author.clone(), &self.records);

        write_atomically(&self.path, |writer| {
            serde_json::to_writer_pretty(writer, &series)?;
            Ok(())
        })?;

        self.flushed = true;
        info!(path = %self.path.display(), records = self.records.len(), "wrote openPMD series");

        Ok(self.path.clone())
    }
}

/// Read the mesh record `name` back out of a series written by [`OpenPmdJson`].
pub fn read_mesh_record(path: &Path, name: &str) -> Result<MeshRecord, Error> {
    let fail = |reason: String| -> Error { error::ContainerRead::new(path, reason).into() };

    let text = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    let series: Series = serde_json::from_str(&text).map_err(|e| fail(e.to_string()))?;

    if series.attributes.open_pmd.value != OPENPMD_VERSION {
        return Err(fail(format!(
            "unsupported openPMD version {}",
            series.attributes.open_pmd.value
        )));
    }

    let mesh = series
        .data
        .into_values()
        .find_map(|mut iteration| iteration.meshes.remove(name))
        .ok_or_else(|| fail(format!("no mesh record named `{name}`")))?;

    mesh.into_record(name).map_err(fail)
}

/// `{ "datatype": ..., "value": ... }`, the way the JSON backend stores attributes
#[derive(Debug, Serialize, Deserialize)]
struct Attribute<T> {
    datatype: String,
    value: T,
}

impl<T> Attribute<T> {
    fn new(datatype: &str, value: T) -> Self {
        Self {
            datatype: datatype.to_string(),
            value,
        }
    }
}

impl Attribute<String> {
    fn string<T: Into<String>>(value: T) -> Self {
        Self::new("STRING", value.into())
    }
}

impl Attribute<f64> {
    fn double(value: f64) -> Self {
        Self::new("DOUBLE", value)
    }
}

impl Attribute<Vec<f64>> {
    fn doubles(value: &[f64]) -> Self {
        Self::new("VEC_DOUBLE", value.to_vec())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Series {
    attributes: SeriesAttributes,
    data: BTreeMap<String, Iteration>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesAttributes {
    #[serde(rename = "openPMD")]
    open_pmd: Attribute<String>,
    #[serde(rename = "openPMDextension")]
    open_pmd_extension: Attribute<u32>,
    base_path: Attribute<String>,
    meshes_path: Attribute<String>,
    iteration_encoding: Attribute<String>,
    iteration_format: Attribute<String>,
    software: Attribute<String>,
    software_version: Attribute<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<Attribute<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Iteration {
    attributes: IterationAttributes,
    meshes: BTreeMap<String, Mesh>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IterationAttributes {
    dt: Attribute<f64>,
    time: Attribute<f64>,
    #[serde(rename = "timeUnitSI")]
    time_unit_si: Attribute<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Mesh {
    attributes: MeshAttributes,
    datatype: String,
    /// `null` stands in for values JSON cannot represent
    data: Vec<Vec<Vec<Option<f32>>>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeshAttributes {
    axis_labels: Attribute<Vec<String>>,
    data_order: Attribute<String>,
    geometry: Attribute<String>,
    grid_global_offset: Attribute<Vec<f64>>,
    grid_spacing: Attribute<Vec<f64>>,
    #[serde(rename = "gridUnitSI")]
    grid_unit_si: Attribute<f64>,
    time_offset: Attribute<f32>,
    unit_dimension: Attribute<[f64; 7]>,
    position: Attribute<Vec<f64>>,
    #[serde(rename = "unitSI")]
    unit_si: Attribute<f64>,
}

impl Series {
    fn new(author: Option<String>, records: &[MeshRecord]) -> Self {
        let attributes = SeriesAttributes {
            open_pmd: Attribute::string(OPENPMD_VERSION),
            open_pmd_extension: Attribute::new("UINT", 0),
            base_path: Attribute::string(BASE_PATH),
            meshes_path: Attribute::string(MESHES_PATH),
            iteration_encoding: Attribute::string("groupBased"),
            iteration_format: Attribute::string(BASE_PATH),
            software: Attribute::string(env!("CARGO_PKG_NAME")),
            software_version: Attribute::string(env!("CARGO_PKG_VERSION")),
            author: author.map(Attribute::<String>::string),
        };

        let meshes = records
            .iter()
            .map(|record| (record.name().to_string(), Mesh::from_record(record)))
            .collect();

        let iteration = Iteration {
            attributes: IterationAttributes {
                dt: Attribute::double(1.0),
                time: Attribute::double(0.0),
                time_unit_si: Attribute::double(1.0),
            },
            meshes,
        };

        Self {
            attributes,
            data: BTreeMap::from([(ITERATION.to_string(), iteration)]),
        }
    }
}

impl Mesh {
    fn from_record(record: &MeshRecord) -> Self {
        let data = record
            .values()
            .outer_iter()
            .map(|plane| {
                plane
                    .outer_iter()
                    .map(|row| row.iter().map(|&v| v.is_finite().then_some(v)).collect())
                    .collect()
            })
            .collect();

        let attributes = MeshAttributes {
            axis_labels: Attribute::new("VEC_STRING", record.axis_labels().to_vec()),
            data_order: Attribute::string(record.data_order().to_string()),
            geometry: Attribute::string("cartesian"),
            grid_global_offset: Attribute::doubles(&record.grid_global_offset()),
            grid_spacing: Attribute::doubles(&record.grid_spacing()),
            grid_unit_si: Attribute::double(record.grid_unit_si()),
            time_offset: Attribute::new("FLOAT", 0.0),
            unit_dimension: Attribute::new("ARR_DBL_7", record.unit_dimension()),
            position: Attribute::doubles(&[0.0; 3]),
            unit_si: Attribute::double(record.unit_si()),
        };

        Self {
            attributes,
            datatype: "FLOAT".to_string(),
            data,
        }
    }

    fn into_record(self, name: &str) -> Result<MeshRecord, String> {
        if self.datatype != "FLOAT" {
            return Err(format!("dataset type {} is not FLOAT", self.datatype));
        }

        let attributes = self.attributes;

        let data_order = DataOrder::parse(&attributes.data_order.value)
            .ok_or_else(|| format!("unknown data order `{}`", attributes.data_order.value))?;

        let spacing = three("gridSpacing", attributes.grid_spacing.value)?;
        let offset = three("gridGlobalOffset", attributes.grid_global_offset.value)?;

        let nz = self.data.len();
        let ny = self.data.first().map_or(0, Vec::len);
        let nx = self
            .data
            .first()
            .and_then(|plane| plane.first())
            .map_or(0, Vec::len);

        let rectangular = self
            .data
            .iter()
            .all(|plane| plane.len() == ny && plane.iter().all(|row| row.len() == nx));
        if !rectangular {
            return Err(format!(
                "dataset of `{name}` is not a rectangular {nz}x{ny}x{nx} block"
            ));
        }

        let flat: Vec<f32> = self
            .data
            .into_iter()
            .flatten()
            .flatten()
            .map(|v| v.unwrap_or(f32::NAN))
            .collect();

        let values = Array3::from_shape_vec((nz, ny, nx), flat)
            .map_err(|_| format!("dataset of `{name}` is not a rectangular {nz}x{ny}x{nx} block"))?;

        Ok(MeshRecord::from_parts(
            name.to_string(),
            values,
            data_order,
            attributes.axis_labels.value,
            spacing,
            offset,
            attributes.grid_unit_si.value,
            attributes.unit_si.value,
            attributes.unit_dimension.value,
        ))
    }
}

fn three(what: &str, values: Vec<f64>) -> Result<[f64; 3], String> {
    let found = values.len();
    values
        .try_into()
        .map_err(|_| format!("{what} has {found} entries, expected 3"))
}
