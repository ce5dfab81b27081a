//! Benchmarks for the gym formula and session simulation

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;
use tornlink_gym::{
    GymSessionInput, GymStat, HappinessLoss, gain_per_action, simulate_session,
    simulate_session_with_rng,
};

fn session(loss: HappinessLoss) -> GymSessionInput {
    GymSessionInput {
        stat: GymStat::Defense,
        initial_stat: 75_000_000.0,
        initial_happiness: 5_025.0,
        total_energy_budget: 1_000,
        energy_per_action: 10,
        gym_factor: 7.5,
        modifier: 1.1,
        happiness_loss: loss,
    }
}

fn bench_gain(c: &mut Criterion) {
    c.bench_function("gain_per_action", |b| {
        b.iter(|| {
            gain_per_action(
                black_box(1000.0),
                black_box(2000.0),
                black_box(10.0),
                black_box(5.0),
                black_box(1.0),
            )
        })
    });
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_session");
    group.throughput(Throughput::Elements(100));

    let average = session(HappinessLoss::Average);
    group.bench_function("average", |b| {
        b.iter(|| simulate_session(black_box(&average)))
    });

    let random = session(HappinessLoss::Random);
    let mut rng = StdRng::seed_from_u64(42);
    group.bench_function("random", |b| {
        b.iter(|| simulate_session_with_rng(black_box(&random), &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_gain, bench_session);
criterion_main!(benches);
