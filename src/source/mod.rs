//! [`GridSource`](crate::GridSource) backends.
//!
//! Neither backend reads FLASH HDF5 files. [`DenseSnapshot`] holds a snapshot
//! that was already exported at one resolution; [`MemorySource`] serves such
//! snapshots from memory and [`JsonSource`] reads them from JSON documents.

mod json;
mod memory;

pub use json::JsonSource;
pub use memory::MemorySource;

use crate::loader::{CoveringGridRequest, SnapshotInfo};
use crate::prelude::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// cell centred values of one field, `values` in C order over `(x, y, z)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredField {
    pub shape: [usize; 3],
    pub values: Vec<f32>,
}

impl StoredField {
    fn view(&self) -> Result<ArrayView3<'_, f32>, String> {
        let [nx, ny, nz] = self.shape;
        ArrayView3::from_shape((nx, ny, nz), &self.values).map_err(|_| {
            format!(
                "{} values stored for shape {:?}",
                self.values.len(),
                self.shape
            )
        })
    }
}

/// A snapshot exported on a single uniform resolution, with the header values
/// FLASH would report for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSnapshot {
    pub geometry: String,
    pub dimensionality: usize,
    pub domain_left_edge: [f64; 3],
    pub domain_right_edge: [f64; 3],
    pub domain_dimensions: [usize; 3],
    #[serde(default = "default_refine_by")]
    pub refine_by: usize,
    #[serde(default)]
    pub max_level: u32,
    pub fields: BTreeMap<String, StoredField>,
}

fn default_refine_by() -> usize {
    2
}

impl DenseSnapshot {
    /// an empty snapshot spanning `domain` with `domain_dimensions` cells at level 0
    pub fn new<T: Into<String>>(
        geometry: T,
        dimensionality: usize,
        domain: &DomainBox,
        domain_dimensions: [usize; 3],
    ) -> Self {
        Self {
            geometry: geometry.into(),
            dimensionality,
            domain_left_edge: domain.lower(),
            domain_right_edge: domain.upper(),
            domain_dimensions,
            refine_by: default_refine_by(),
            max_level: 0,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_levels(mut self, refine_by: usize, max_level: u32) -> Self {
        self.refine_by = refine_by;
        self.max_level = max_level;
        self
    }

    /// add a field given as cell centred values indexed `(x, y, z)`
    pub fn with_field<T: Into<String>>(mut self, name: T, values: Array3<f32>) -> Self {
        let (nx, ny, nz) = values.dim();
        let values = values.as_standard_layout().iter().copied().collect();

        self.fields.insert(
            name.into(),
            StoredField {
                shape: [nx, ny, nz],
                values,
            },
        );
        self
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            geometry: self.geometry.clone(),
            dimensionality: self.dimensionality,
            domain_left_edge: self.domain_left_edge,
            domain_right_edge: self.domain_right_edge,
            domain_dimensions: self.domain_dimensions,
            refine_by: self.refine_by,
            max_level: self.max_level,
            fields: self.fields.keys().cloned().collect(),
        }
    }

    /// Sample a field at the cell centres of the requested grid.
    ///
    /// Each requested cell takes the value of the stored cell containing its
    /// centre, so refining past the stored resolution replicates cells.
    pub fn covering_grid(&self, request: &CoveringGridRequest) -> Result<Array3<f32>, String> {
        let stored = self
            .fields
            .get(&request.field)
            .ok_or_else(|| format!("no field named `{}`", request.field))?;
        let stored_values = stored.view()?;

        if request.dims.iter().any(|&n| n == 0) {
            return Err(format!("covering grid dimensions {:?} are empty", request.dims));
        }

        // index of the stored cell for every requested cell, per axis
        let lookup: Vec<Vec<usize>> = (0..3)
            .map(|axis| {
                let lo = self.domain_left_edge[axis];
                let extent = self.domain_right_edge[axis] - lo;
                let n_stored = stored.shape[axis];
                let width = (request.right_edge[axis] - request.left_edge[axis])
                    / request.dims[axis] as f64;

                (0..request.dims[axis])
                    .map(|i| {
                        let centre = request.left_edge[axis] + (i as f64 + 0.5) * width;
                        let cell = ((centre - lo) / extent * n_stored as f64).floor();
                        (cell.max(0.0) as usize).min(n_stored.saturating_sub(1))
                    })
                    .collect()
            })
            .collect();

        let [nx, ny, nz] = request.dims;
        Ok(Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| {
            stored_values[[lookup[0][i], lookup[1][j], lookup[2][k]]]
        }))
    }
}
