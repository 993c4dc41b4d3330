//! one dimensional interpolation over strictly increasing knots
//!
//! Both resamplers work one axis at a time, so everything here is 1D:
//!
//! - [`Stencil`] brackets a query point between two knots. It depends only on the
//!   knot positions, which lets a resampler locate every output point once and
//!   reuse the stencils for each lane (or z slice) of the array.
//! - [`SplineKnots`] holds the factorised natural cubic spline system for a set
//!   of knots; [`SplineKnots::fit`] produces a [`NaturalCubic`] for one lane of
//!   values.
//!
//! Applying either of them along each axis of a lattice in turn gives exactly the
//! multilinear (or tensor product spline) interpolant of the whole grid.

mod cubic;
mod linear;

pub use cubic::{NaturalCubic, SplineKnots};
pub use linear::Stencil;

use serde::{Deserialize, Serialize};

/// interpolation basis used by the uniform resampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationKind {
    /// piecewise linear along every axis
    Linear,
    /// natural cubic spline, axes with fewer than four samples fall back to linear
    #[default]
    Cubic,
    /// natural cubic spline, axes with fewer than four samples are an error
    CubicStrict,
}

impl InterpolationKind {
    /// minimum number of samples on an axis for the cubic basis
    pub const CUBIC_SAMPLES: usize = 4;

    /// minimum number of samples on an axis for any basis
    pub const LINEAR_SAMPLES: usize = 2;
}
