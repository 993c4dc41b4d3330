use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array3;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use flash2openpmd::emit::{write_vtk, Encoding};
use flash2openpmd::prelude::*;
use flash2openpmd::finalize;

fn record(n: usize) -> MeshRecord {
    let values: Array3<f32> = Array3::random((n, n, n), Uniform::new(0., 10.));
    let domain = DomainBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();
    finalize(&DenseField::new(values, domain), "density", false).unwrap()
}

fn write(records: &[MeshRecord], encoding: Encoding) {
    let writer: Vec<u8> = Vec::new();
    let buf_writer = std::io::BufWriter::new(writer);
    write_vtk(buf_writer, records, encoding).unwrap();
}

fn write_vtk_bench(c: &mut Criterion) {
    let records = [record(100)];

    c.bench_function("write vtk ascii 100", |b| {
        b.iter(|| write(black_box(&records), Encoding::Ascii))
    });

    c.bench_function("write vtk base64 100", |b| {
        b.iter(|| write(black_box(&records), Encoding::Base64))
    });
}

criterion_group!(benches, write_vtk_bench);
criterion_main!(benches);
