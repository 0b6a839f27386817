use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mathquest_core::generator::ProblemGenerator;
use mathquest_core::plan::{build_plan, PlanSlot, SessionRequest};
use mathquest_core::topic::{DifficultyLevel, Topic};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let generator = ProblemGenerator::default();

    for topic in [
        Topic::Divide,
        Topic::Fraction,
        Topic::FactorsPrimes,
        Topic::PrimeFactorization,
        Topic::Hcf,
        Topic::Lcm,
    ] {
        let slot = PlanSlot {
            topic,
            level: DifficultyLevel::Hard,
        };
        group.bench_function(format!("{topic}/hard"), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| generator.generate(black_box(slot), &mut rng))
        });
    }

    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_plan");
    let levels: BTreeMap<Topic, DifficultyLevel> = Topic::ALL
        .iter()
        .zip(DifficultyLevel::ALL.iter().cycle())
        .map(|(&t, &l)| (t, l))
        .collect();

    for n in [10, 100, 1000] {
        let request = SessionRequest::new(Topic::ALL, n);
        group.bench_function(format!("all_topics/n={n}"), |b| {
            let mut rng = StdRng::seed_from_u64(3);
            b.iter(|| build_plan(black_box(&request), black_box(&levels), &mut rng))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_plan);
criterion_main!(benches);
