//! Lightweight timing for stress runs.
//!
//! `Profiler` accumulates named sections; `StressProfiler` wraps it with
//! per-tick totals and the colony size, and is what
//! `SimWorld::run_profiled` feeds.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Aggregated timings for one named section.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionStats {
    pub total_time: Duration,
    pub call_count: u64,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl SectionStats {
    pub fn avg_time(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.call_count as u32
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.call_count += 1;
        self.min_time = Some(self.min_time.map_or(elapsed, |m| m.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |m| m.max(elapsed)));
    }
}

/// Named section timer. Sections are kept in name order so reports are stable.
#[derive(Debug, Default)]
pub struct Profiler {
    sections: BTreeMap<&'static str, SectionStats>,
    tick_count: u64,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time `f` under `name`.
    pub fn time_section<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.sections.entry(name).or_default().record(start.elapsed());
        result
    }

    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn get_section(&self, name: &str) -> Option<&SectionStats> {
        self.sections.get(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.keys().copied()
    }

    /// Log every section at `debug`, busiest first.
    pub fn log_sections(&self) {
        let mut sections: Vec<_> = self.sections.iter().collect();
        sections.sort_by(|a, b| b.1.total_time.cmp(&a.1.total_time));
        for (name, stats) in sections {
            tracing::debug!(
                target: "lemsim::profile",
                section = *name,
                total_ms = stats.total_time.as_secs_f64() * 1000.0,
                avg_us = stats.avg_time().as_secs_f64() * 1_000_000.0,
                max_us = stats.max_time.unwrap_or_default().as_secs_f64() * 1_000_000.0,
                calls = stats.call_count,
                "section"
            );
        }
    }

    pub fn reset(&mut self) {
        self.sections.clear();
        self.tick_count = 0;
    }
}

/// Summary of a stress run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressReport {
    pub ticks: u64,
    pub total_ms: f64,
    pub avg_tick_ms: f64,
    pub ticks_per_second: f64,
    pub peak_live: usize,
    pub final_live: usize,
}

/// Per-tick totals and colony size over a stress run.
#[derive(Debug, Default)]
pub struct StressProfiler {
    pub profiler: Profiler,
    pub total_time: Duration,
    peak_live: usize,
    final_live: usize,
}

impl StressProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tick's wall time and the live count after it.
    pub fn record_tick(&mut self, duration: Duration, live: usize) {
        self.total_time += duration;
        self.peak_live = self.peak_live.max(live);
        self.final_live = live;
        self.profiler.tick();
    }

    pub fn report(&self) -> StressReport {
        let ticks = self.profiler.tick_count();
        let total = self.total_time.as_secs_f64();
        let avg = if ticks > 0 { total / ticks as f64 } else { 0.0 };
        StressReport {
            ticks,
            total_ms: total * 1000.0,
            avg_tick_ms: avg * 1000.0,
            ticks_per_second: if avg > 0.0 { 1.0 / avg } else { 0.0 },
            peak_live: self.peak_live,
            final_live: self.final_live,
        }
    }

    /// Log the report at `info`, then the section breakdown at `debug`.
    pub fn log_summary(&self) {
        let report = self.report();
        tracing::info!(
            target: "lemsim::profile",
            ticks = report.ticks,
            total_ms = report.total_ms,
            avg_tick_ms = report.avg_tick_ms,
            ticks_per_second = report.ticks_per_second,
            peak_live = report.peak_live,
            "stress run"
        );
        self.profiler.log_sections();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_sections_accumulate() {
        let mut profiler = Profiler::new();
        for _ in 0..3 {
            profiler.time_section("fast", || sleep(Duration::from_millis(1)));
            profiler.time_section("slow", || sleep(Duration::from_millis(4)));
            profiler.tick();
        }

        assert_eq!(profiler.tick_count(), 3);
        let fast = profiler.get_section("fast").unwrap();
        let slow = profiler.get_section("slow").unwrap();
        assert_eq!(fast.call_count, 3);
        assert!(slow.total_time > fast.total_time);
        assert_eq!(profiler.section_names().collect::<Vec<_>>(), vec!["fast", "slow"]);
    }

    #[test]
    fn test_time_section_returns_value() {
        let mut profiler = Profiler::new();
        assert_eq!(profiler.time_section("answer", || 42), 42);
        profiler.reset();
        assert!(profiler.get_section("answer").is_none());
    }

    #[test]
    fn test_stress_report() {
        let mut stress = StressProfiler::new();
        stress.record_tick(Duration::from_millis(2), 5);
        stress.record_tick(Duration::from_millis(4), 9);
        stress.record_tick(Duration::from_millis(3), 7);

        let report = stress.report();
        assert_eq!(report.ticks, 3);
        assert_eq!(report.peak_live, 9);
        assert_eq!(report.final_live, 7);
        assert!((report.avg_tick_ms - 3.0).abs() < 1e-9);
    }
}
