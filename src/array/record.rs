use crate::prelude::*;

/// outermost to innermost axis of every stored mesh record
pub const AXIS_LABELS: [&str; 3] = ["z", "y", "x"];

/// FLASH works in centimetres
pub(crate) const FLASH_LENGTH_UNIT_SI: f64 = 0.01;

/// memory layout of the stored dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataOrder {
    /// row major, last axis contiguous
    #[display(fmt = "C")]
    C,
    /// column major, first axis contiguous
    #[display(fmt = "F")]
    F,
}

impl DataOrder {
    pub(crate) fn parse(order: &str) -> Option<Self> {
        match order {
            "C" => Some(Self::C),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

/// A finalized scalar mesh: a named `f32` array stored `(z, y, x)` plus the
/// openPMD metadata describing it.
///
/// Records cannot be modified once built; sinks only read from them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    name: String,
    values: Array3<f32>,
    data_order: DataOrder,
    axis_labels: Vec<String>,
    grid_spacing: [f64; 3],
    grid_global_offset: [f64; 3],
    grid_unit_si: f64,
    unit_si: f64,
    unit_dimension: [f64; 7],
}

impl MeshRecord {
    /// `values` must already be in `(z, y, x)` order; `grid_spacing` and
    /// `grid_global_offset` follow the same order.
    pub(crate) fn new(
        name: &str,
        values: Array3<f32>,
        grid_spacing: [f64; 3],
        grid_global_offset: [f64; 3],
    ) -> Self {
        Self {
            name: name.to_string(),
            values,
            data_order: DataOrder::C,
            axis_labels: AXIS_LABELS.iter().map(|label| label.to_string()).collect(),
            grid_spacing,
            grid_global_offset,
            grid_unit_si: FLASH_LENGTH_UNIT_SI,
            unit_si: 1.0,
            unit_dimension: [0.0; 7],
        }
    }

    /// rebuild a record from attributes read out of a container
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        values: Array3<f32>,
        data_order: DataOrder,
        axis_labels: Vec<String>,
        grid_spacing: [f64; 3],
        grid_global_offset: [f64; 3],
        grid_unit_si: f64,
        unit_si: f64,
        unit_dimension: [f64; 7],
    ) -> Self {
        Self {
            name,
            values,
            data_order,
            axis_labels,
            grid_spacing,
            grid_global_offset,
            grid_unit_si,
            unit_si,
            unit_dimension,
        }
    }

    /// attach the SI conversion of the values and their powers of
    /// `(L, M, T, I, theta, N, J)`
    pub fn with_units(mut self, unit_si: f64, unit_dimension: [f64; 7]) -> Self {
        self.unit_si = unit_si;
        self.unit_dimension = unit_dimension;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> ArrayView3<'_, f32> {
        self.values.view()
    }

    /// dataset extent, `[nz, ny, nx]`
    pub fn shape(&self) -> [usize; 3] {
        let (nz, ny, nx) = self.values.dim();
        [nz, ny, nx]
    }

    pub fn data_order(&self) -> DataOrder {
        self.data_order
    }

    pub fn axis_labels(&self) -> &[String] {
        &self.axis_labels
    }

    /// `[dz, dy, dx]` in simulation length units
    pub fn grid_spacing(&self) -> [f64; 3] {
        self.grid_spacing
    }

    /// `[z_min, y_min, x_min]` in simulation length units
    pub fn grid_global_offset(&self) -> [f64; 3] {
        self.grid_global_offset
    }

    pub fn grid_unit_si(&self) -> f64 {
        self.grid_unit_si
    }

    pub fn unit_si(&self) -> f64 {
        self.unit_si
    }

    pub fn unit_dimension(&self) -> [f64; 7] {
        self.unit_dimension
    }

    /// sample coordinates along stored axis `axis` (0 = z, 1 = y, 2 = x)
    pub fn coordinates(&self, axis: usize) -> Vec<f64> {
        let n = self.shape()[axis];
        let offset = self.grid_global_offset[axis];
        let spacing = self.grid_spacing[axis];
        (0..n).map(|i| offset + spacing * i as f64).collect()
    }
}
