use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lemsim::{LevelSetup, SimConfig, SimWorld, Terrain};
use std::time::Duration;

/// Wide level with a thick floor and `entrances` hatches spread along it.
fn bench_level(entrances: i32) -> LevelSetup {
    let width = 2048;
    let mut terrain = Terrain::new(width as usize, 256);
    terrain.fill_rect(0, 160, width, 96);
    let spacing = width / (entrances + 1);
    let mut level = LevelSetup::new(terrain).with_release(99, 0);
    for i in 0..entrances {
        level = level.with_entrance(spacing * (i + 1) - 24, 40);
    }
    level
}

fn bench_colony_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("colony_step");
    let steps: u32 = std::env::var("LEMSIM_BENCH_STEPS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(64);
    group.sample_size(20);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for &entrances in &[4, 16, 64] {
        group.bench_function(format!("steps{}_entrances{}", steps, entrances), |b| {
            b.iter_batched(
                || {
                    let config = SimConfig { bench_mode: true, ..Default::default() };
                    let mut sim = SimWorld::with_config(bench_level(entrances), config)
                        .expect("bench level is valid");
                    // Fill the level before measuring.
                    sim.run(400);
                    sim
                },
                |mut sim| {
                    sim.run(steps);
                    sim
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_colony_steps);
criterion_main!(benches);
