/// Location of a query point between two neighbouring knots.
///
/// Points left of the first knot or right of the last one clamp to the boundary
/// sample (flat extrapolation). A point exactly on a knot has `weight == 0` and
/// evaluates to that knot's value without any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stencil {
    /// index of the knot at or left of the query point
    pub lower: usize,
    /// fractional distance towards `lower + 1`, in `[0, 1)`
    pub weight: f64,
}

impl Stencil {
    /// bracket `x` inside `knots`, which must be strictly increasing and non-empty
    pub fn locate(knots: &[f64], x: f64) -> Self {
        let n = knots.len();
        debug_assert!(n > 0, "cannot locate a point without knots");

        if x <= knots[0] {
            return Self {
                lower: 0,
                weight: 0.0,
            };
        }

        if x >= knots[n - 1] {
            return Self {
                lower: n - 1,
                weight: 0.0,
            };
        }

        // first knot strictly right of x, always in 1..n here
        let upper = knots.partition_point(|&knot| knot <= x);
        let lower = upper - 1;
        let weight = (x - knots[lower]) / (knots[upper] - knots[lower]);

        Self { lower, weight }
    }

    /// evaluate the linear interpolant given a lookup of sample values by knot index
    #[inline]
    pub fn apply<F>(&self, value: F) -> f64
    where
        F: Fn(usize) -> f64,
    {
        let low = value(self.lower);

        if self.weight == 0.0 {
            low
        } else {
            low + self.weight * (value(self.lower + 1) - low)
        }
    }
}
