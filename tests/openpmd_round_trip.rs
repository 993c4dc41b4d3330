use flash2openpmd::emit::{read_mesh_record, OpenPmdJson};
use flash2openpmd::ndarray::Array3;
use flash2openpmd::prelude::*;
use flash2openpmd::{finalize, DataOrder};

fn ramp() -> DenseField {
    let domain = DomainBox::new([-1.0, 0.0, 2.0], [1.0, 3.0, 4.0]).unwrap();
    let values = Array3::from_shape_fn((5, 4, 3), |(i, j, k)| (100 * i + 10 * j + k) as f32);
    DenseField::new(values, domain)
}

#[test]
fn axis_order_survives_writer_and_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.json");

    let field = ramp();
    let record = finalize(&field, "e_density", false).unwrap();

    let mut sink = OpenPmdJson::create(&path);
    sink.store(record.clone()).unwrap();
    sink.flush().unwrap();

    let back = read_mesh_record(&path, "e_density").unwrap();
    assert_eq!(back, record);

    assert_eq!(back.axis_labels(), ["z", "y", "x"]);
    assert_eq!(back.data_order(), DataOrder::C);
    assert_eq!(back.shape(), [3, 4, 5]);

    for ((i, j, k), &v) in field.indexed_iter() {
        assert_eq!(back.values()[[k, j, i]], v);
    }

    assert_eq!(back.grid_global_offset(), [2.0, 0.0, -1.0]);
    assert_eq!(back.grid_spacing(), [1.0, 1.0, 0.5]);
}

#[test]
fn several_records_share_one_series() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.json");

    let density = finalize(&ramp(), "density", false).unwrap();
    let normalized = finalize(&ramp(), "density_normalized", true).unwrap();

    let mut sink = OpenPmdJson::create(&path).with_author("A. Physicist");
    sink.store(density.clone()).unwrap();
    sink.store(normalized.clone()).unwrap();
    sink.flush().unwrap();

    assert_eq!(read_mesh_record(&path, "density").unwrap(), density);
    assert_eq!(read_mesh_record(&path, "density_normalized").unwrap(), normalized);
}
