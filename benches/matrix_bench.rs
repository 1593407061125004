use criterion::{Criterion, criterion_group, criterion_main};
use em_matrix_runner::core::directives;
use em_matrix_runner::core::matrix::{default_axes, generate};
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let axes = default_axes();
    c.bench_function("generate_default_matrix", |b| {
        b.iter(|| generate(black_box(&axes)));
    });
}

fn bench_extract_directives(c: &mut Criterion) {
    let mut source = String::from("// flags: -pthread -sPROXY_TO_PTHREAD\n// run: browser\n");
    for i in 0..500 {
        source.push_str(&format!("int f{i}(int x) {{ return x * {i}; }} // helper\n"));
    }
    c.bench_function("extract_directives", |b| {
        b.iter(|| directives::extract(black_box(&source)));
    });
}

criterion_group!(benches, bench_generate, bench_extract_directives);
criterion_main!(benches);
