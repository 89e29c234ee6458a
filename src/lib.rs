//! Lemming colony simulation core.
//!
//! A deterministic, tick-driven simulation of a colony of small walkers on a
//! destructible 2D pixel terrain. Uses `bevy_ecs` resources and a chained,
//! single-threaded schedule; `SimWorld` is the public entry point.

pub mod actions;
pub mod api;
pub mod colony;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod level;
pub mod masks;
pub mod minimap;
pub mod profiler;
pub mod progress;
pub mod render_bridge;
pub mod spatial;
pub mod systems;
pub mod terrain;
pub mod world;

pub use actions::{ActionContext, ActionRegistry};
pub use api::SimWorld;
pub use colony::Colony;
pub use components::*;
pub use config::{SimConfig, SimTick};
pub use error::{SimError, SimResult};
pub use events::{SimEvent, SimEvents};
pub use level::{Entrance, LevelSetup};
pub use masks::{Mask, MaskSet};
pub use minimap::Minimap;
pub use profiler::{StressProfiler, StressReport};
pub use progress::LevelProgress;
pub use render_bridge::{DisplaySink, FlatBuffer, LemmingDraw};
pub use spatial::{RegionId, TriggerIndex, TriggerKind, TriggerRegion};
pub use terrain::{ArrowZone, Terrain, TerrainSnapshot};
pub use world::{LemmingSnapshot, Snapshot};
