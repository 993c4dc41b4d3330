use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// Physical extent of a grid: `lower[axis] < upper[axis]` on all three axes.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainBox {
    lower: [f64; 3],
    upper: [f64; 3],
}

impl DomainBox {
    /// create a new box, rejecting any axis that is empty, inverted or not finite
    pub fn new(lower: [f64; 3], upper: [f64; 3]) -> Result<Self, Error> {
        for axis in 0..3 {
            let (lo, hi) = (lower[axis], upper[axis]);

            if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
                let reason = format!(
                    "axis {} spans [{lo}, {hi}], the lower edge must lie below the upper edge",
                    crate::array::AXIS_NAMES[axis]
                );
                return Err(error::InvalidInput::new("domain box", reason).into());
            }
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> [f64; 3] {
        self.lower
    }

    pub fn upper(&self) -> [f64; 3] {
        self.upper
    }

    /// length of the box along `axis`
    pub fn extent(&self, axis: usize) -> f64 {
        self.upper[axis] - self.lower[axis]
    }

    /// sample locations of `n` points along `axis`, both box edges included
    pub fn coordinates(&self, axis: usize, n: usize) -> Vec<f64> {
        utils::linspace(self.lower[axis], self.upper[axis], n)
    }

    /// distance between neighbouring samples when `n` points are placed along `axis`.
    ///
    /// A single sample covers the whole extent.
    pub fn spacing(&self, axis: usize, n: usize) -> f64 {
        if n > 1 {
            self.extent(axis) / (n - 1) as f64
        } else {
            self.extent(axis)
        }
    }

    /// true when `other` lies completely inside this box (shared edges allowed)
    pub fn contains(&self, other: &DomainBox) -> bool {
        (0..3).all(|axis| {
            other.lower[axis] >= self.lower[axis] && other.upper[axis] <= self.upper[axis]
        })
    }
}

/// Explicit domain edges replacing the snapshot's native bounds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainOverride {
    /// `x_min, y_min, z_min`
    pub lower: [f64; 3],
    /// `x_max, y_max, z_max`; the native right edge when absent
    #[serde(default)]
    pub upper: Option<[f64; 3]>,
}

impl DomainOverride {
    /// resolve the override against the native box of a snapshot
    pub fn resolve(&self, native: &DomainBox) -> Result<DomainBox, Error> {
        let upper = self.upper.unwrap_or_else(|| native.upper());
        let requested = DomainBox::new(self.lower, upper)?;

        if !native.contains(&requested) {
            let reason = format!(
                "requested [{:?}, {:?}] leaves the native domain [{:?}, {:?}]",
                requested.lower,
                requested.upper,
                native.lower,
                native.upper
            );
            return Err(error::InvalidInput::new("domain override", reason).into());
        }

        Ok(requested)
    }
}
