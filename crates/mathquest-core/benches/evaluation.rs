use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mathquest_core::evaluator::{check_text, parse_submission};
use mathquest_core::problem::{Fraction, LcmMethod, Problem};
use mathquest_core::topic::DifficultyLevel;

fn bench_check_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_text");
    let level = DifficultyLevel::Medium;

    let divide = Problem::divide(level, 100, 7);
    group.bench_function("divide", |b| {
        b.iter(|| check_text(black_box(&divide), black_box("14 r 2")))
    });

    let fraction = Problem::fraction_sum(level, Fraction::new(3, 8), Fraction::new(1, 6));
    group.bench_function("fraction", |b| {
        b.iter(|| check_text(black_box(&fraction), black_box("26/48")))
    });
    let whole = Problem::fraction_simplify(level, Fraction::new(3, 1), 4);
    group.bench_function("fraction_decimal", |b| {
        b.iter(|| check_text(black_box(&whole), black_box("3.0")))
    });

    let factorization = Problem::prime_factorization(level, 2 * 2 * 3 * 5 * 7 * 11 * 13);
    group.bench_function("prime_factorization", |b| {
        b.iter(|| check_text(black_box(&factorization), black_box("13 11 7 5 3 2 2")))
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_submission");
    let lcm = Problem::lcm(DifficultyLevel::Hard, &[12, 18, 30], LcmMethod::DivisionMethod);

    group.bench_function("integer", |b| {
        b.iter(|| parse_submission(black_box(&lcm), black_box("180")))
    });
    group.bench_function("shape_error", |b| {
        b.iter(|| parse_submission(black_box(&lcm), black_box("one hundred eighty")))
    });

    group.finish();
}

criterion_group!(benches, bench_check_text, bench_parse);
criterion_main!(benches);
