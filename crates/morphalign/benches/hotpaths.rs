use std::f64::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use morphalign::{
    angle_profile, local_minima, BorderContour, Profile, ProfileAggregate,
};

fn jittered_circle(n: usize, radius: f64, noise: f64, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let theta = TAU * i as f64 / n as f64;
            let r = radius + rng.gen_range(-noise..=noise);
            [r * theta.cos(), r * theta.sin()]
        })
        .collect()
}

fn bench_angle_profile(c: &mut Criterion) {
    let contour = BorderContour::new(jittered_circle(720, 60.0, 1.0, 7)).unwrap();
    c.bench_function("angle_profile_720", |b| {
        b.iter(|| angle_profile(black_box(&contour), black_box(23)).unwrap())
    });
}

fn bench_aggregate_reduce(c: &mut Criterion) {
    let profiles: Vec<Profile> = (0..50)
        .map(|seed| {
            let contour = BorderContour::new(jittered_circle(360, 50.0, 1.5, seed)).unwrap();
            angle_profile(&contour, 23).unwrap()
        })
        .collect();
    c.bench_function("aggregate_reduce_50x360", |b| {
        b.iter(|| {
            let mut aggregate = ProfileAggregate::new(0.5);
            for profile in &profiles {
                aggregate.add(
                    black_box(&profile.normalized_positions()),
                    black_box(profile.values()),
                );
            }
            aggregate.reduce().unwrap()
        })
    });
}

fn bench_local_minima(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let profile = Profile::new(
        (0..2000)
            .map(|i| 180.0 + 20.0 * (TAU * i as f64 / 2000.0).sin() + rng.gen_range(-2.0..2.0))
            .collect(),
    );
    c.bench_function("local_minima_2000", |b| {
        b.iter(|| local_minima(black_box(&profile), black_box(5)))
    });
}

criterion_group!(
    benches,
    bench_angle_profile,
    bench_aggregate_reduce,
    bench_local_minima
);
criterion_main!(benches);
