//! Benchmarks for Sum/Product canonicalization (§4.4, §9 "Sort thresholds").

use criterion::{Criterion, criterion_group, criterion_main};
use may_kernel::arena::Arena;
use may_kernel::eval;
use may_numerics::Numeric;
use std::hint::black_box;

fn build_sum(arena: &mut Arena, n: i64) -> Vec<may_kernel::NodeId> {
    let x = eval::symbol(arena, "x");
    (0..n)
        .map(|k| {
            let coeff = eval::numeric(arena, Numeric::integer(k + 1));
            eval::product(arena, vec![coeff, x])
        })
        .collect()
}

fn bench_sum_canonicalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_canonicalize");

    for &size in &[8_i64, 64, 256] {
        group.bench_function(format!("like_terms_{size}"), |b| {
            b.iter(|| {
                let mut arena = Arena::new();
                let terms = build_sum(&mut arena, black_box(size));
                eval::sum(&mut arena, terms)
            });
        });
    }

    group.finish();
}

fn bench_product_canonicalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_canonicalize");

    for &size in &[8_i64, 64, 256] {
        group.bench_function(format!("repeated_powers_{size}"), |b| {
            b.iter(|| {
                let mut arena = Arena::new();
                let x = eval::symbol(&mut arena, "x");
                let factors: Vec<_> = (0..black_box(size)).map(|_| x).collect();
                eval::product(&mut arena, factors)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sum_canonicalization, bench_product_canonicalization);
criterion_main!(benches);
