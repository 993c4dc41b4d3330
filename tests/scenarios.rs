use flash2openpmd::ndarray::Array3;
use flash2openpmd::prelude::*;
use flash2openpmd::{finalize, resample, rotate_to_cartesian};

fn planar_field() -> DenseField {
    let domain = DomainBox::new([0.0, 0.0, 0.0], [0.8, 0.8, 1.0]).unwrap();
    let values = Array3::from_shape_fn((8, 8, 1), |(i, j, _)| {
        (i as f32 - 3.5).powi(2) + 0.5 * (j as f32).sin()
    });
    DenseField::new(values, domain)
}

#[test]
fn planar_field_doubles_on_both_axes() {
    let field = planar_field();
    let fine = resample(&field, RefinementFactors::new(2, 2, 1), InterpolationKind::Linear).unwrap();

    assert_eq!(fine.samples(), [16, 16, 1]);

    let min = field.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = field.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert!(fine.iter().all(|&v| (min..=max).contains(&v)));

    let record = finalize(&fine, "e_density", false).unwrap();
    assert_eq!(record.shape(), [1, 16, 16]);
}

#[test]
fn uniform_cylinder_survives_rotation() {
    let field = Array3::from_elem((4, 6, 1), 5.0_f32);
    let z: Vec<f64> = (0..6).map(|k| k as f64 * 0.1).collect();

    let volume = rotate_to_cartesian(field.view(), &[0.0, 1.0, 2.0, 3.0], &z).unwrap();

    assert_eq!(volume.dim(), (8, 8, 6));
    assert!(volume.iter().all(|&v| v == 5.0));
}

#[test]
fn zero_refinement_factor_is_invalid_input() {
    let err = resample(&planar_field(), RefinementFactors::uniform(0), InterpolationKind::Cubic)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn unit_refinement_is_identity() {
    let field = planar_field();
    let same = resample(&field, RefinementFactors::default(), InterpolationKind::Cubic).unwrap();
    assert_eq!(same, field);
}

#[test]
fn normalizing_a_blank_field_fails() {
    let domain = DomainBox::new([0.0; 3], [1.0; 3]).unwrap();
    let blank = DenseField::new(Array3::zeros((3, 3, 3)), domain);

    assert!(matches!(
        finalize(&blank, "e_density", true),
        Err(Error::DegenerateField(_))
    ));

    let record = finalize(&planar_field(), "e_density", true).unwrap();
    let max = record.values().iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(max, 1.0);
}
