use crate::prelude::*;

/// Turn a resampled field into an immutable [`MeshRecord`].
///
/// With `normalize` set every value is divided by the field maximum, which must be
/// finite and positive; an infinite sample is a [`DegenerateField`](Error::DegenerateField)
/// too. NaN samples are ignored when looking for the maximum. The `(x, y, z)`
/// array is transposed to `(z, y, x)` in standard (C) layout, so a planar field
/// is stored with shape `(1, ny, nx)`. Grid spacing and offset are taken from the
/// field's domain box and listed in the same `z, y, x` order.
#[instrument(skip(field), fields(shape = ?field.samples()))]
pub fn finalize(field: &DenseField, name: &str, normalize: bool) -> Result<MeshRecord, Error> {
    if name.trim().is_empty() {
        return Err(error::InvalidInput::new("record name", "must not be empty").into());
    }

    let mut values = field.values().clone();

    if normalize {
        if let Some(&max) = values.iter().find(|v| v.is_infinite()) {
            return Err(error::DegenerateField { max }.into());
        }

        // only a positive maximum maps onto 1
        let max = utils::finite_max(values.iter().copied()).unwrap_or(f32::NAN);

        if !max.is_finite() || max <= 0.0 {
            return Err(error::DegenerateField { max }.into());
        }

        debug!(max, "normalizing field");
        values.mapv_inplace(|v| v / max);
    }

    let values = values
        .reversed_axes()
        .as_standard_layout()
        .into_owned();

    let [nx, ny, nz] = field.samples();
    let domain = field.domain();
    let lower = domain.lower();

    let spacing = [
        domain.spacing(2, nz),
        domain.spacing(1, ny),
        domain.spacing(0, nx),
    ];
    let offset = [lower[2], lower[1], lower[0]];

    info!(name, shape = ?values.dim(), "finalized mesh record");

    Ok(MeshRecord::new(name, values, spacing, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DataOrder;

    fn ramp(shape: (usize, usize, usize)) -> DenseField {
        let domain = DomainBox::new([0.0, -1.0, 2.0], [4.0, 1.0, 3.0]).unwrap();
        let values = Array3::from_shape_fn(shape, |(i, j, k)| (100 * i + 10 * j + k) as f32);
        DenseField::new(values, domain)
    }

    #[test]
    fn axes_are_stored_z_y_x() {
        let field = ramp((5, 3, 2));
        let record = finalize(&field, "e_density", false).unwrap();

        assert_eq!(record.shape(), [2, 3, 5]);
        assert!(record.values().is_standard_layout());

        for ((i, j, k), &v) in field.indexed_iter() {
            assert_eq!(record.values()[[k, j, i]], v);
        }

        assert_eq!(record.axis_labels(), ["z", "y", "x"]);
        assert_eq!(record.data_order(), DataOrder::C);
        assert_eq!(record.grid_spacing(), [1.0, 1.0, 1.0]);
        assert_eq!(record.grid_global_offset(), [2.0, -1.0, 0.0]);
    }

    #[test]
    fn planar_fields_gain_leading_axis() {
        let record = finalize(&ramp((4, 6, 1)), "density", false).unwrap();
        assert_eq!(record.shape(), [1, 6, 4]);
    }

    #[test]
    fn normalized_maximum_is_one() {
        let record = finalize(&ramp((3, 3, 3)), "density", true).unwrap();
        let max = record.values().iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn all_zero_field_cannot_be_normalized() {
        let domain = DomainBox::new([0.0; 3], [1.0; 3]).unwrap();
        let field = DenseField::new(Array3::zeros((2, 2, 1)), domain);

        let err = finalize(&field, "density", true).unwrap_err();
        assert!(matches!(err, Error::DegenerateField(ref e) if e.max == 0.0));

        // no normalization, no complaint
        assert!(finalize(&field, "density", false).is_ok());
    }

    #[test]
    fn non_positive_maximum_cannot_be_normalized() {
        let domain = DomainBox::new([0.0; 3], [1.0; 3]).unwrap();
        let field = DenseField::new(
            Array3::from_shape_vec((2, 1, 1), vec![-4.0, -1.0]).unwrap(),
            domain,
        );

        let err = finalize(&field, "density", true).unwrap_err();
        assert!(matches!(err, Error::DegenerateField(ref e) if e.max == -1.0));
    }

    #[test]
    fn infinite_samples_cannot_be_normalized() {
        let domain = DomainBox::new([0.0; 3], [1.0; 3]).unwrap();

        for bad in [f32::INFINITY, f32::NEG_INFINITY] {
            let field = DenseField::new(
                Array3::from_shape_vec((2, 1, 1), vec![2.0, bad]).unwrap(),
                domain.clone(),
            );

            let err = finalize(&field, "density", true).unwrap_err();
            assert!(matches!(err, Error::DegenerateField(ref e) if e.max == bad));

            assert!(finalize(&field, "density", false).is_ok());
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = finalize(&ramp((2, 2, 1)), " ", false).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
