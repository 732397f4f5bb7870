//! Benchmarks for the propagation pipeline.
//!
//! Includes:
//! - Expression parsing
//! - Symbolic differentiation
//! - End-to-end uncertainty propagation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use incerta_calculus::differentiate;
use incerta_parser::parse;
use incerta_propagate::{propagate, BindingStore};

const FORMULAS: &[(&str, &str)] = &[
    ("density", "m/V"),
    ("kinetic", "1/2*m*v^2"),
    ("ideal_gas", "n*R*T/V"),
    ("lens", "d_i*d_o/(d_i + d_o)"),
    ("polynomial", "3*x^4 - 2*x^3 + x^2 - 5*x + 7"),
];

fn bind_all(store: &mut BindingStore, variables: &[String]) {
    for (i, name) in variables.iter().enumerate() {
        // Offset values keep every variable nonzero.
        let value = 1.5 + i as f64;
        store.set_value(name, value).unwrap();
        store.set_uncertainty(name, 0.01 * value).unwrap();
    }
}

/// Benchmark parsing alone.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, text) in FORMULAS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| black_box(parse(text).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark differentiation with respect to every free variable.
fn bench_differentiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("differentiate");

    for (name, text) in FORMULAS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            let formula = parse(text).unwrap();
            let root = formula.root();
            let variables: Vec<String> = formula.variables().to_vec();
            b.iter(|| {
                // Differentiation interns new nodes, so clone the arena
                // each iteration to keep runs independent.
                let mut arena = formula.arena().clone();
                for var in &variables {
                    black_box(differentiate(&mut arena, root, var).unwrap());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark the full propagation pipeline from source text.
fn bench_propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate");

    for (name, text) in FORMULAS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| {
                let mut formula = parse(text).unwrap();
                let mut store = BindingStore::new();
                store.reconcile(formula.variables());
                let variables: Vec<String> = formula.variables().to_vec();
                bind_all(&mut store, &variables);
                black_box(propagate(&mut formula, &store).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_differentiate, bench_propagate);
criterion_main!(benches);
