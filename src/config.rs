//! Simulation tuning and the global tick counter.

use crate::error::{SimError, SimResult};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Highest release rate a level may run at.
pub const MAX_RELEASE_RATE: i32 = 99;

/// Configuration for simulation tuning.
///
/// All distances are in terrain pixels, all durations in ticks except
/// `fixed_timestep`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds used by `SimWorld::step`.
    pub fixed_timestep: f32,
    /// Edge length of a trigger index bucket.
    pub trigger_cell_size: i32,
    /// Spawns happen every `release_cadence_base - release_rate` ticks.
    pub release_cadence_base: i32,
    /// Offset from an entrance's anchor to the spawned lemming's foot.
    pub spawn_offset: (i32, i32),
    /// Longest fall (pixels) a lemming survives without a parachute.
    pub max_safe_fall: i32,
    /// Fall height after which an opened parachute takes over.
    pub parachute_open_height: i32,
    /// Ticks between arming a bomber and the oh-no.
    pub countdown_ticks: i32,
    /// Bricks a builder lays before shrugging.
    pub builder_max_steps: i32,
    /// Pixels below the bottom edge before a lemming is out of the level.
    pub out_of_level_margin: i32,
    /// Keep releasing past the level's release count (stress runs).
    pub bench_mode: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 0.06,
            trigger_cell_size: 16,
            release_cadence_base: 104,
            spawn_offset: (24, 14),
            max_safe_fall: 60,
            parachute_open_height: 16,
            countdown_ticks: 80,
            builder_max_steps: 12,
            out_of_level_margin: 6,
            bench_mode: false,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the tick loop cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.fixed_timestep > 0.0) {
            return Err(SimError::InvalidConfig("fixed_timestep must be positive"));
        }
        if self.trigger_cell_size <= 0 {
            return Err(SimError::InvalidConfig("trigger_cell_size must be positive"));
        }
        if self.release_cadence_base <= MAX_RELEASE_RATE {
            return Err(SimError::InvalidConfig(
                "release_cadence_base must exceed the maximum release rate",
            ));
        }
        if self.countdown_ticks <= 0 {
            return Err(SimError::InvalidConfig("countdown_ticks must be positive"));
        }
        if self.builder_max_steps <= 0 {
            return Err(SimError::InvalidConfig("builder_max_steps must be positive"));
        }
        if self.max_safe_fall < 0 || self.parachute_open_height < 0 || self.out_of_level_margin < 0 {
            return Err(SimError::InvalidConfig("heights and margins must not be negative"));
        }
        Ok(())
    }

    /// Ticks between two release waves at the given rate.
    #[inline]
    pub fn release_interval(&self, release_rate: i32) -> i32 {
        (self.release_cadence_base - release_rate).max(1)
    }
}

/// Global simulation tick counter.
/// Incremented before every schedule run, read by trigger cooldowns.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "bench_mode": true, "trigger_cell_size": 31 }"#).unwrap();
        assert!(config.bench_mode);
        assert_eq!(config.trigger_cell_size, 31);
        assert_eq!(config.release_cadence_base, 104);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = SimConfig { trigger_cell_size: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let config = SimConfig { release_cadence_base: 50, ..Default::default() };
        assert!(config.validate().is_err());

        assert!(matches!(SimConfig::from_json("{ nope"), Err(SimError::Json(_))));
    }

    #[test]
    fn test_release_interval() {
        let config = SimConfig::default();
        assert_eq!(config.release_interval(50), 54);
        assert_eq!(config.release_interval(99), 5);
    }

    #[test]
    fn test_sim_tick_increment() {
        let mut tick = SimTick(0);
        tick.increment();
        tick.increment();
        assert_eq!(tick.0, 2);
    }
}
