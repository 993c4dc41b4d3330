use crate::prelude::*;

#[derive(Deref, Clone, PartialEq, Debug)]
/// Array container for a scalar field on a uniform grid, such as a density
///
/// The first axis holds X samples, the second Y and the third Z. Two dimensional
/// data keeps a third axis of length one. For cylindrical snapshots the axes are
/// `(r, z, phi)` until the field is rotated onto a Cartesian lattice.
///
/// ## Example
///
/// For a density field with `nx=100`, `ny=200` and `nz=300` the array shape is
/// `(100, 200, 300)`, and sample `(i, j, k)` sits at the `i`-th of 100 evenly
/// spaced x coordinates spanning the domain box (edges included).
pub struct DenseField {
    #[deref]
    values: Array3<f32>,
    domain: DomainBox,
}

impl DenseField {
    /// Construct a `DenseField` from an array and the box it spans.
    pub fn new(values: Array3<f32>, domain: DomainBox) -> Self {
        Self { values, domain }
    }

    pub fn domain(&self) -> &DomainBox {
        &self.domain
    }

    pub fn values(&self) -> &Array3<f32> {
        &self.values
    }

    /// get the array that this type wraps.
    /// usually this method is not required because `DenseField` implements
    /// [`Deref`](std::ops::Deref)
    pub fn into_values(self) -> Array3<f32> {
        self.values
    }

    /// sample counts `[nx, ny, nz]`
    pub fn samples(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.values.dim();
        [nx, ny, nz]
    }

    /// true for two dimensional data (a single sample along the third axis)
    pub fn is_planar(&self) -> bool {
        self.values.len_of(Axis(2)) == 1
    }

    /// sample coordinates along `axis`
    pub fn coordinates(&self, axis: usize) -> Vec<f64> {
        self.domain.coordinates(axis, self.values.len_of(Axis(axis)))
    }
}

#[test]
fn coordinates_follow_sample_counts() {
    let domain = DomainBox::new([0.0, -1.0, 0.0], [3.0, 1.0, 1.0]).unwrap();
    let field = DenseField::new(Array3::zeros((4, 3, 1)), domain);

    assert_eq!(field.samples(), [4, 3, 1]);
    assert!(field.is_planar());
    assert_eq!(field.coordinates(0), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(field.coordinates(2), vec![0.0]);
}
