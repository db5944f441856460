//! Ringside - frame-paced presentation of a two-fighter boxing simulation
//!
//! Core modules:
//! - `sim`: Engine boundary (snapshots, async constructor, stepping handle)
//! - `scheduler`: Drift-compensated frame pacing on host timestamps
//! - `fight`: Snapshot diffing and the fight lifecycle state machine
//! - `renderer`: Snapshot to draw commands on a fixed-size surface
//! - `effects`: Decorative hit effect timelines
//! - `platform`: Browser/synthetic frame hosts, timers and surfaces

pub mod catalog;
pub mod color;
pub mod config;
pub mod effects;
pub mod error;
pub mod fight;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod sim;

pub use catalog::{Catalog, FighterDescriptor, FighterId};
pub use color::Color;
pub use config::FightConfig;
pub use error::FightError;
pub use fight::{FightLifecycle, FightOutcome, HitEvent, LifecyclePhase};

/// Fight presentation constants
pub mod consts {
    /// Target presentation rate (simulation steps per second)
    pub const TARGET_FPS: f64 = 48.0;
    /// Delay between simulation completion and the "fight ended" notification
    pub const RESOLUTION_DELAY_MS: f64 = 2000.0;

    /// Logical world size (square, engine units)
    pub const WORLD_SIZE: f32 = 400.0;
    /// Drawing surface size (square, pixels)
    pub const SURFACE_SIZE: f32 = 440.0;

    /// Fighter body radius in world units
    pub const BODY_RADIUS: f32 = 26.0;
    /// Fist radius in world units
    pub const FIST_RADIUS: f32 = 15.0;

    /// Health range reported by the engine
    pub const MAX_HEALTH: u8 = 5;
    /// Energy range reported by the engine
    pub const MAX_ENERGY: u8 = 10;

    /// Lifetime of one hit effect
    pub const HIT_EFFECT_MS: f64 = 500.0;
}
