//! Benchmarks for the polynomial GCD engine (C8, §4.7).

use criterion::{Criterion, criterion_group, criterion_main};
use may_kernel::arena::Arena;
use may_kernel::eval;
use may_kernel::poly;
use may_numerics::Numeric;
use std::hint::black_box;

/// `(x+1)^degree`, expanded.
fn power_of_binomial(arena: &mut Arena, degree: i64) -> may_kernel::NodeId {
    let x = eval::symbol(arena, "x");
    let one = eval::one(arena);
    let sum = eval::sum(arena, vec![x, one]);
    let exp = eval::numeric(arena, Numeric::integer(degree));
    let power = eval::power(arena, sum, exp);
    poly::expand(arena, power)
}

fn bench_gcd_of_shared_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("polynomial_gcd");

    for &degree in &[2_i64, 4, 6] {
        group.bench_function(format!("shared_factor_degree_{degree}"), |b| {
            b.iter(|| {
                let mut arena = Arena::new();
                let a = power_of_binomial(&mut arena, black_box(degree + 1));
                let b_poly = power_of_binomial(&mut arena, black_box(degree));
                poly::gcd(&mut arena, a, b_poly)
            });
        });
    }

    group.finish();
}

fn bench_karatsuba_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("karatsuba_multiply");

    for &degree in &[4_i64, 8, 16] {
        group.bench_function(format!("binomial_power_times_itself_{degree}"), |b| {
            b.iter(|| {
                let mut arena = Arena::new();
                let x = eval::symbol(&mut arena, "x");
                let one = eval::one(&mut arena);
                let sum = eval::sum(&mut arena, vec![x, one]);
                let exp = eval::numeric(&mut arena, Numeric::integer(black_box(degree)));
                let base = eval::power(&mut arena, sum, exp);
                let expanded = poly::expand(&mut arena, base);
                poly::multiply(&mut arena, expanded, expanded)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gcd_of_shared_power, bench_karatsuba_multiply);
criterion_main!(benches);
