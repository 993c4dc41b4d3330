//! Uniform resampling of a [`DenseField`] onto a finer lattice.
//!
//! Sample positions always include both edges of the domain box. An axis with
//! `n` samples and refinement factor `f` is resampled onto `n * f` evenly spaced
//! points across the same box, so a factor of one leaves the axis untouched.
//! Planar fields are only resampled along x and y.
//!
//! Interpolation is separable: the field is interpolated along x, then y, then z,
//! which equals the multilinear (or tensor product spline) interpolant of the
//! whole lattice. All arithmetic is done in `f64`.

use crate::interp::{SplineKnots, Stencil};
use crate::prelude::*;

use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// number of output samples replacing each input sample along x, y and z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementFactors {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl RefinementFactors {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// the same factor along every axis
    pub fn uniform(factor: usize) -> Self {
        Self::new(factor, factor, factor)
    }

    /// every factor must be at least one
    pub fn validate(&self) -> Result<(), Error> {
        for axis in 0..3 {
            if self.along(axis) == 0 {
                let reason = format!(
                    "factor along {} is 0, factors must be positive",
                    crate::array::AXIS_NAMES[axis]
                );
                return Err(error::InvalidInput::new("refinement factors", reason).into());
            }
        }

        Ok(())
    }

    /// factor for axis index `axis` (0 = x, 1 = y, 2 = z)
    pub fn along(&self, axis: usize) -> usize {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl Default for RefinementFactors {
    fn default() -> Self {
        Self::uniform(1)
    }
}

/// Resample `field` onto a lattice refined by `factors`.
///
/// ```
/// use flash2openpmd::ndarray::Array3;
/// use flash2openpmd::prelude::*;
/// use flash2openpmd::resample;
///
/// let domain = DomainBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])?;
/// let field = DenseField::new(Array3::from_elem((8, 8, 1), 1.0), domain);
///
/// let fine = resample(&field, RefinementFactors::uniform(2), InterpolationKind::Linear)?;
/// assert_eq!(fine.samples(), [16, 16, 1]);
/// # Ok::<(), flash2openpmd::Error>(())
/// ```
#[instrument(skip(field), fields(shape = ?field.samples()))]
pub fn resample(
    field: &DenseField,
    factors: RefinementFactors,
    kind: InterpolationKind,
) -> Result<DenseField, Error> {
    factors.validate()?;

    let planar = field.is_planar();
    if planar && factors.z != 1 {
        warn!(factor = factors.z, "ignoring z refinement of a planar field");
    }

    let n_out = output_samples(field.samples(), factors, planar)?;

    let domain = field.domain();
    let mut values = field.mapv(f64::from);

    for axis in 0..3 {
        if (planar && axis == 2) || factors.along(axis) == 1 {
            continue;
        }

        let n_in = values.len_of(Axis(axis));

        let basis = Basis::select(kind, axis, n_in)?;

        let knots = domain.coordinates(axis, n_in);
        let targets = domain.coordinates(axis, n_out[axis]);

        debug!(axis, n_in, n_out = targets.len(), ?basis, "resampling axis");

        values = resample_axis(values.view(), Axis(axis), &knots, &targets, basis)?;
    }

    let values = values.mapv(|v| v as f32);
    info!(shape = ?values.dim(), "resampled field");

    Ok(DenseField::new(values, domain.clone()))
}

/// Sample counts after refinement, `[nx, ny, nz]`.
///
/// The z factor of a planar field is ignored. The refined lattice must fit in an
/// `f64` array.
fn output_samples(
    samples: [usize; 3],
    factors: RefinementFactors,
    planar: bool,
) -> Result<[usize; 3], Error> {
    let too_large = || {
        error::InvalidInput::new(
            "refinement factors",
            format!("refining {samples:?} by {factors:?} is too large"),
        )
    };

    let mut n_out = samples;
    for (axis, n) in n_out.iter_mut().enumerate() {
        if planar && axis == 2 {
            continue;
        }
        *n = n.checked_mul(factors.along(axis)).ok_or_else(too_large)?;
    }

    let max_elements = isize::MAX as usize / std::mem::size_of::<f64>();
    match n_out.iter().try_fold(1_usize, |total, &n| total.checked_mul(n)) {
        Some(total) if total <= max_elements => Ok(n_out),
        _ => Err(too_large().into()),
    }
}

/// 1D basis used along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Basis {
    Linear,
    Cubic,
}

impl Basis {
    fn select(kind: InterpolationKind, axis: usize, samples: usize) -> Result<Self, Error> {
        let insufficient = |required| error::InsufficientSamples {
            axis: crate::array::AXIS_NAMES[axis],
            found: samples,
            required,
        };

        if samples < InterpolationKind::LINEAR_SAMPLES {
            return Err(insufficient(InterpolationKind::LINEAR_SAMPLES).into());
        }

        match kind {
            InterpolationKind::Linear => Ok(Self::Linear),
            InterpolationKind::Cubic if samples < InterpolationKind::CUBIC_SAMPLES => {
                debug!(axis, samples, "too few samples for a cubic spline, using linear");
                Ok(Self::Linear)
            }
            InterpolationKind::Cubic => Ok(Self::Cubic),
            InterpolationKind::CubicStrict if samples < InterpolationKind::CUBIC_SAMPLES => {
                Err(insufficient(InterpolationKind::CUBIC_SAMPLES).into())
            }
            InterpolationKind::CubicStrict => Ok(Self::Cubic),
        }
    }
}

/// interpolate every lane of `input` along `axis` from `knots` onto `targets`
fn resample_axis(
    input: ArrayView3<f64>,
    axis: Axis,
    knots: &[f64],
    targets: &[f64],
    basis: Basis,
) -> Result<Array3<f64>, Error> {
    let mut shape = input.raw_dim();
    shape[axis.index()] = targets.len();
    let mut output = Array3::zeros(shape);

    match basis {
        Basis::Linear => {
            let stencils: Vec<Stencil> = targets
                .iter()
                .map(|&target| Stencil::locate(knots, target))
                .collect();

            Zip::from(output.lanes_mut(axis))
                .and(input.lanes(axis))
                .for_each(|mut out, lane| {
                    for (value, stencil) in out.iter_mut().zip(&stencils) {
                        *value = stencil.apply(|i| lane[i]);
                    }
                });
        }
        Basis::Cubic => {
            let spline_knots = SplineKnots::new(knots)?;

            Zip::from(output.lanes_mut(axis))
                .and(input.lanes(axis))
                .for_each(|mut out, lane| {
                    let spline = spline_knots.fit(lane.to_vec());
                    for (value, &target) in out.iter_mut().zip(targets) {
                        *value = spline.eval(target);
                    }
                });
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_domain() -> DomainBox {
        DomainBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap()
    }

    fn wavy(shape: (usize, usize, usize)) -> DenseField {
        let values = Array3::from_shape_fn(shape, |(i, j, k)| {
            ((i as f32 * 0.7).sin() + (j as f32 * 0.3).cos()) * (1.0 + k as f32)
        });
        DenseField::new(values, unit_domain())
    }

    #[test]
    fn unit_factors_reproduce_the_input() {
        let field = wavy((5, 6, 7));

        for kind in [
            InterpolationKind::Linear,
            InterpolationKind::Cubic,
            InterpolationKind::CubicStrict,
        ] {
            let out = resample(&field, RefinementFactors::default(), kind).unwrap();
            assert_eq!(out, field);
        }
    }

    #[test]
    fn output_grows_by_factor_and_keeps_edges() {
        let field = wavy((8, 8, 1));
        let out = resample(
            &field,
            RefinementFactors::new(2, 3, 1),
            InterpolationKind::Linear,
        )
        .unwrap();

        assert_eq!(out.samples(), [16, 24, 1]);
        assert_eq!(out.domain(), field.domain());

        assert!((out[[0, 0, 0]] - field[[0, 0, 0]]).abs() < 1e-6);
        assert!((out[[15, 23, 0]] - field[[7, 7, 0]]).abs() < 1e-6);
        assert!((out[[0, 23, 0]] - field[[0, 7, 0]]).abs() < 1e-6);
    }

    #[test]
    fn linear_output_stays_within_input_bounds() {
        let field = wavy((8, 8, 1));
        let out = resample(&field, RefinementFactors::uniform(2), InterpolationKind::Linear).unwrap();

        let min = field.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = field.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        assert!(out.iter().all(|&v| v >= min && v <= max));
    }

    #[test]
    fn oversized_factor_is_invalid_input() {
        let field = wavy((4, 4, 1));

        let err = resample(
            &field,
            RefinementFactors::new(usize::MAX / 2, 1, 1),
            InterpolationKind::Linear,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // each axis fits, the whole lattice does not
        let err = resample(
            &field,
            RefinementFactors::new(1 << 30, 1 << 30, 1),
            InterpolationKind::Linear,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn planar_fields_ignore_z_factor() {
        let field = wavy((4, 4, 1));
        let out = resample(&field, RefinementFactors::new(1, 1, 5), InterpolationKind::Cubic).unwrap();
        assert_eq!(out, field);
    }

    #[test]
    fn zero_factor_is_rejected() {
        let field = wavy((4, 4, 1));
        let err = resample(&field, RefinementFactors::new(2, 0, 1), InterpolationKind::Linear)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn single_sample_axis_cannot_be_refined() {
        let field = wavy((4, 1, 4));
        let err = resample(&field, RefinementFactors::new(1, 2, 1), InterpolationKind::Linear)
            .unwrap_err();

        match err {
            Error::InsufficientSamples(e) => {
                assert_eq!(e.axis, 'y');
                assert_eq!(e.found, 1);
                assert_eq!(e.required, 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn strict_cubic_needs_four_samples() {
        let field = wavy((3, 6, 1));

        let err = resample(&field, RefinementFactors::uniform(2), InterpolationKind::CubicStrict)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientSamples(ref e) if e.required == 4));

        // plain cubic falls back to linear on the short axis
        let out = resample(&field, RefinementFactors::uniform(2), InterpolationKind::Cubic).unwrap();
        assert_eq!(out.samples(), [6, 12, 1]);
    }

    #[test]
    fn cubic_reproduces_linear_ramps() {
        let values = Array3::from_shape_fn((6, 5, 4), |(i, j, k)| {
            (2.0 * i as f64 - j as f64 + 0.5 * k as f64) as f32
        });
        let field = DenseField::new(values, unit_domain());

        let out = resample(&field, RefinementFactors::new(2, 2, 3), InterpolationKind::Cubic).unwrap();
        let [nx, ny, nz] = out.samples();
        assert_eq!([nx, ny, nz], [12, 10, 12]);

        for ((i, j, k), &v) in out.indexed_iter() {
            // positions in units of input sample spacing
            let x = i as f64 * 5.0 / (nx - 1) as f64;
            let y = j as f64 * 4.0 / (ny - 1) as f64;
            let z = k as f64 * 3.0 / (nz - 1) as f64;
            let expected = 2.0 * x - y + 0.5 * z;
            assert!((v as f64 - expected).abs() < 1e-4, "{v} vs {expected}");
        }
    }
}
