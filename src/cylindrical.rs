//! rotation of cylindrical `(r, z, phi)` data onto a Cartesian lattice
//!
//! The transverse lattice is symmetric: `2 * n_r` points spanning
//! `[-r_max, r_max]` along both x and y, so the full disk is recovered from the
//! half plane of radial samples. Every lattice column is bracketed against the
//! radial knots once and that stencil is reused for every z sample.

use crate::interp::Stencil;
use crate::prelude::*;

use ndarray::Zip;
use std::f64::consts::TAU;

/// Rotate a cylindrical field onto a Cartesian volume indexed `(x, y, z)`.
///
/// `field` is indexed `(r, z, phi)`, `r` and `z` hold the sample coordinates of
/// its first two axes. Radii outside `[r[0], r_max]` take the nearest boundary
/// sample. When more than one azimuthal sample is present each lattice point
/// reads the phi cell containing its azimuth, otherwise the field is treated as
/// axisymmetric.
///
/// The result has shape `(2 n_r, 2 n_r, n_z)` and stays in `(x, y, z)` order so it
/// can go straight to [`resample`](crate::resample()). The `(z, y, x)` order of
/// stored openPMD records is only produced by [`finalize`](crate::finalize()).
///
/// ```
/// use flash2openpmd::ndarray::Array3;
/// use flash2openpmd::rotate_to_cartesian;
///
/// let field = Array3::from_elem((4, 2, 1), 5.0_f32);
/// let volume = rotate_to_cartesian(field.view(), &[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0])?;
///
/// assert_eq!(volume.dim(), (8, 8, 2));
/// assert!(volume.iter().all(|&v| v == 5.0));
/// # Ok::<(), flash2openpmd::Error>(())
/// ```
pub fn rotate_to_cartesian(
    field: ArrayView3<f32>,
    r: &[f64],
    z: &[f64],
) -> Result<Array3<f32>, Error> {
    let (n_r, n_z, n_phi) = field.dim();

    if n_r == 0 || n_z == 0 || n_phi == 0 {
        let reason = format!("shape {:?} has an empty axis", field.dim());
        return Err(error::InvalidInput::new("cylindrical field", reason).into());
    }

    if r.len() != n_r {
        let reason = format!("{} coordinates for {n_r} radial samples", r.len());
        return Err(error::InvalidInput::new("radial coordinates", reason).into());
    }

    if z.len() != n_z {
        let reason = format!("{} coordinates for {n_z} axial samples", z.len());
        return Err(error::InvalidInput::new("axial coordinates", reason).into());
    }

    utils::check_strictly_increasing(r, "r")?;

    let r_max = r[n_r - 1];
    let lattice = utils::linspace(-r_max, r_max, 2 * n_r);

    debug!(n_r, n_z, n_phi, r_max, "rotating cylindrical field");

    Ok(rotate_on_lattice(field, r, &lattice))
}

/// Rotate a loaded cylindrical [`DenseField`] and return the Cartesian field
/// spanning `[-r_max, r_max]² × [z_min, z_max]`.
///
/// The radial and axial coordinates are the inclusive sample positions across
/// the field's domain box.
#[instrument(skip_all, fields(shape = ?field.samples()))]
pub fn to_cartesian_field(field: &DenseField) -> Result<DenseField, Error> {
    let r = field.coordinates(0);
    let z = field.coordinates(1);

    let values = rotate_to_cartesian(field.view(), &r, &z)?;

    let r_max = field.domain().upper()[0];
    let (z_lo, z_hi) = (field.domain().lower()[1], field.domain().upper()[1]);
    let domain = DomainBox::new([-r_max, -r_max, z_lo], [r_max, r_max, z_hi])?;

    info!(shape = ?values.dim(), "rotated cylindrical field onto cartesian lattice");

    Ok(DenseField::new(values, domain))
}

fn rotate_on_lattice(field: ArrayView3<f32>, r: &[f64], lattice: &[f64]) -> Array3<f32> {
    let (_, n_z, n_phi) = field.dim();
    let n = lattice.len();
    let mut volume = Array3::zeros((n, n, n_z));

    Zip::indexed(volume.lanes_mut(Axis(2))).for_each(|(i, j), mut column| {
        let (x, y) = (lattice[i], lattice[j]);
        let stencil = Stencil::locate(r, x.hypot(y));
        let plane = field.index_axis(Axis(2), azimuth_cell(x, y, n_phi));

        for (k, out) in column.iter_mut().enumerate() {
            *out = stencil.apply(|l| plane[[l, k]] as f64) as f32;
        }
    });

    volume
}

/// index of the phi cell holding the azimuth of `(x, y)`, cells of width `2π / n_phi`
fn azimuth_cell(x: f64, y: f64, n_phi: usize) -> usize {
    if n_phi == 1 {
        return 0;
    }

    let theta = y.atan2(x).rem_euclid(TAU);
    ((theta / TAU * n_phi as f64).floor() as usize).min(n_phi - 1)
}
