use crate::prelude::*;

/// Knot positions of a natural cubic spline together with the forward
/// elimination of its tridiagonal system.
///
/// The system matrix only depends on the knots, so it is factorised once and
/// shared by every lane that is fitted over the same axis.
#[derive(Debug, Clone)]
pub struct SplineKnots {
    knots: Vec<f64>,
    /// knot spacing `h[i] = knots[i + 1] - knots[i]`
    h: Vec<f64>,
    /// eliminated diagonal of the interior system
    diag: Vec<f64>,
    /// elimination multipliers of the interior system
    factors: Vec<f64>,
}

impl SplineKnots {
    pub fn new(knots: &[f64]) -> Result<Self, Error> {
        if knots.len() < InterpolationKind::LINEAR_SAMPLES {
            return Err(error::InsufficientSamples {
                axis: '?',
                found: knots.len(),
                required: InterpolationKind::LINEAR_SAMPLES,
            }
            .into());
        }
        utils::check_strictly_increasing(knots, "knots")?;

        let h: Vec<f64> = knots.windows(2).map(|pair| pair[1] - pair[0]).collect();

        // interior unknowns are the second derivatives at knots 1..n-1;
        // the natural boundary fixes them to zero at both ends
        let interior = knots.len() - 2;
        let mut diag = Vec::with_capacity(interior);
        let mut factors = Vec::with_capacity(interior);

        for j in 0..interior {
            let d = 2.0 * (h[j] + h[j + 1]);

            if j == 0 {
                factors.push(0.0);
                diag.push(d);
            } else {
                // sub diagonal entry of row j is h[j], super diagonal of row j-1 is h[j]
                let w = h[j] / diag[j - 1];
                factors.push(w);
                diag.push(d - w * h[j]);
            }
        }

        Ok(Self {
            knots: knots.to_vec(),
            h,
            diag,
            factors,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// fit the spline through `values`, one per knot
    pub fn fit(&self, values: Vec<f64>) -> NaturalCubic<'_> {
        debug_assert_eq!(values.len(), self.knots.len());

        let n = self.knots.len();
        let interior = n - 2;
        let h = &self.h;

        let mut rhs: Vec<f64> = (0..interior)
            .map(|j| {
                let i = j + 1;
                6.0 * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1])
            })
            .collect();

        for j in 1..interior {
            rhs[j] -= self.factors[j] * rhs[j - 1];
        }

        let mut second = vec![0.0; n];

        for j in (0..interior).rev() {
            let upper = if j + 1 < interior {
                h[j + 1] * second[j + 2]
            } else {
                0.0
            };
            second[j + 1] = (rhs[j] - upper) / self.diag[j];
        }

        NaturalCubic {
            basis: self,
            values,
            second,
        }
    }
}

/// A natural cubic spline through one lane of values.
///
/// Queries outside the knot range are clamped onto it.
#[derive(Debug, Clone)]
pub struct NaturalCubic<'a> {
    basis: &'a SplineKnots,
    values: Vec<f64>,
    /// second derivative at each knot
    second: Vec<f64>,
}

impl<'a> NaturalCubic<'a> {
    pub fn eval(&self, x: f64) -> f64 {
        let knots = &self.basis.knots;
        let n = knots.len();
        let x = x.clamp(knots[0], knots[n - 1]);

        let i = knots
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(n - 2);

        let h = self.basis.h[i];
        let a = (knots[i + 1] - x) / h;
        let b = (x - knots[i]) / h;

        a * self.values[i]
            + b * self.values[i + 1]
            + ((a * a * a - a) * self.second[i] + (b * b * b - b) * self.second[i + 1]) * h * h
                / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knots_are_reproduced_exactly() {
        let knots = [0.0, 0.5, 1.5, 2.0, 4.0];
        let values = vec![1.0, -2.0, 3.5, 0.25, 8.0];

        let basis = SplineKnots::new(&knots).unwrap();
        let spline = basis.fit(values.clone());

        for (knot, value) in knots.iter().zip(values) {
            assert_eq!(spline.eval(*knot), value);
        }
    }

    #[test]
    fn linear_data_is_reproduced() {
        let knots = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let values = knots.iter().map(|x| 3.0 * x - 1.0).collect();

        let basis = SplineKnots::new(&knots).unwrap();
        let spline = basis.fit(values);

        for x in [0.25, 1.7, 3.3, 4.9] {
            assert!((spline.eval(x) - (3.0 * x - 1.0)).abs() < 1e-10);
        }
    }

    #[test]
    fn matches_hand_solved_natural_spline() {
        // uniform knots, values 0 1 0: 4 * M1 = 6 * (-1 - 1)
        let basis = SplineKnots::new(&[0.0, 1.0, 2.0]).unwrap();
        let spline = basis.fit(vec![0.0, 1.0, 0.0]);

        assert!((spline.second[1] + 3.0).abs() < 1e-12);
        // s(0.5) = 0.5 * 1 + (0.125 - 0.5) * (-3) / 6
        assert!((spline.eval(0.5) - 0.6875).abs() < 1e-12);
    }

    #[test]
    fn unsorted_knots_are_rejected() {
        let err = SplineKnots::new(&[0.0, 2.0, 1.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}
