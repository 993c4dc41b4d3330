use crate::error;
use crate::Error;

use num_traits::Float;

/// `n` evenly spaced samples across `[start, end]`, both endpoints included.
///
/// A single sample sits at `start`.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let mut points = ndarray::Array1::linspace(start, end, n).to_vec();
            // accumulated rounding must not move the far edge
            points[n - 1] = end;
            points
        }
    }
}

/// largest finite value, `None` when there is none
pub(crate) fn finite_max<T, I>(values: I) -> Option<T>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |max, v| match max {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

pub(crate) fn check_strictly_increasing(knots: &[f64], name: &str) -> Result<(), Error> {
    if knots.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(error::Precondition::new(format!("{name} must be strictly increasing")).into())
    }
}

#[test]
fn linspace_includes_both_endpoints() {
    let points = linspace(-1.0, 1.0, 5);
    assert_eq!(points.len(), 5);
    assert_eq!(points[0], -1.0);
    assert_eq!(points[4], 1.0);
    assert!((points[2]).abs() < 1e-12);
}

#[test]
fn linspace_single_sample_sits_at_start() {
    assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    assert!(linspace(3.0, 7.0, 0).is_empty());
}

#[test]
fn repeated_knot_is_rejected() {
    let err = check_strictly_increasing(&[0.0, 1.0, 1.0, 2.0], "r").unwrap_err();
    match err {
        Error::Precondition(p) => assert_eq!(p.message(), "r must be strictly increasing"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn finite_max_skips_nan_and_infinity() {
    let values = [1.0_f32, f32::NAN, 4.0, f32::INFINITY, -2.0];
    assert_eq!(finite_max(values), Some(4.0));
    assert_eq!(finite_max([f32::NAN]), None);
    assert_eq!(finite_max(Vec::<f64>::new()), None);
}
