//! A small level run from start to finish.
//!
//! Run with: cargo run --example basic_demo
//! Set `RUST_LOG=lemsim=debug` to see spawns, skills and deaths.

use lemsim::{
    ActionTag, LevelSetup, SimConfig, SimWorld, SkillKind, StressProfiler, Terrain, TriggerKind,
    TriggerRegion,
};

fn build_level() -> LevelSetup {
    let mut terrain = Terrain::new(320, 160);
    // Floor, a wall halfway along, and a steel plate under the exit.
    terrain.fill_rect(0, 100, 320, 40);
    terrain.fill_rect(150, 80, 10, 20);
    terrain.set_steel_rect(260, 100, 40, 4);

    LevelSetup::new(terrain)
        .with_entrance(10, 20)
        .with_trigger(TriggerRegion::new(270, 90, 290, 101, TriggerKind::Exit))
        .with_trigger(TriggerRegion::new(300, 95, 320, 101, TriggerKind::Drown))
        .with_release(80, 10)
        .with_need(5)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut sim = SimWorld::new(build_level())?;
    let mut builder_assigned = false;

    for second in 1..=40 {
        // One second of wall time per report.
        sim.step(1.0);

        if !builder_assigned {
            let at_wall = sim
                .lemmings()
                .iter()
                .find(|l| l.action == ActionTag::Walking && (135..145).contains(&l.x))
                .map(|l| l.id);
            if let Some(id) = at_wall {
                builder_assigned = sim.apply_skill(id, SkillKind::Builder);
                println!("builder assigned to lemming {}: {}", id.0, builder_assigned);
            }
        }

        let progress = sim.progress();
        println!(
            "t={:>2}s tick={:>4} out={:>2} saved={:>2} lost={:>2} remaining={:>2}",
            second,
            sim.current_tick(),
            progress.out,
            progress.survivors,
            progress.lost,
            progress.remaining_to_release
        );
        for event in sim.drain_events() {
            println!("    {:?}", event);
        }
        if sim.is_finished() {
            break;
        }
    }

    if !sim.is_finished() {
        println!("\n--- nuking the rest ---");
        sim.nuke();
        sim.run(400);
    }

    let progress = sim.progress();
    println!(
        "\nsaved {} of {} needed ({} lost)",
        progress.survivors, progress.need, progress.lost
    );
    println!("{}", sim.snapshot().to_json_pretty()?);

    stress_run()
}

/// Same level in bench mode: releases never stop, timings go to the log.
fn stress_run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SimConfig { bench_mode: true, ..Default::default() };
    let mut sim = SimWorld::with_config(build_level().with_release(99, 10), config)?;
    let mut stress = StressProfiler::new();
    sim.run_profiled(1000, &mut stress);
    stress.log_summary();

    let report = stress.report();
    println!(
        "\nstress: {} ticks, {:.3} ms/tick, peak {} live",
        report.ticks, report.avg_tick_ms, report.peak_live
    );
    Ok(())
}
