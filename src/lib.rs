//! Powder Keg - top-down survival shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, chain reactions)
//! - `tuning`: Data-driven game balance (archetypes, weapons)
//! - `stats`: Per-run statistics handed to the presentation layer
//!
//! Rendering, input capture, and audio live outside this crate. The
//! presentation layer drives the sim through `SimState` boundary calls and
//! drains `SimEvent`s once per frame.

pub mod sim;
pub mod stats;
pub mod tuning;

pub use stats::RunStats;
pub use tuning::{ArchetypeSpec, ProjectileKind, Tuning, WeaponSpec};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions (one screen, origin top-left)
    pub const WORLD_WIDTH: f32 = 1280.0;
    pub const WORLD_HEIGHT: f32 = 720.0;

    /// Player body radius
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Player movement speed (units/s)
    pub const PLAYER_SPEED: f32 = 220.0;

    /// Trees may not stand closer than this to any wall candidate
    pub const TREE_WALL_CLEARANCE: f32 = 50.0;
    /// Barrels may not stand closer than this to any placed wall or tree
    pub const BARREL_CLEARANCE: f32 = 60.0;

    /// Minimum distance from every active obstacle for a safe spawn point
    pub const SAFE_SPAWN_CLEARANCE: f32 = 80.0;
    /// Random safe-spawn samples before giving up
    pub const SAFE_SPAWN_ATTEMPTS: u32 = 100;
    /// Random safe-spawn search radius around screen center
    pub const SAFE_SPAWN_SEARCH_RADIUS: f32 = 200.0;
    /// Last-resort spawn point when the search exhausts
    pub const SAFE_SPAWN_FALLBACK: (f32, f32) = (96.0, 96.0);

    /// Agents spawn this far outside the world edge
    pub const EDGE_SPAWN_MARGIN: f32 = 40.0;
    /// Per-edge agent count range for the opening batch
    pub const INITIAL_BATCH_MIN: u32 = 3;
    pub const INITIAL_BATCH_MAX: u32 = 5;

    /// Difficulty ramp: flat before this many elapsed seconds
    pub const RAMP_START_SECS: f32 = 60.0;
    /// One multiplier step per window after the ramp starts
    pub const RAMP_WINDOW_SECS: f32 = 30.0;
    /// Growth factor per window
    pub const RAMP_FACTOR: f32 = 1.3;
    /// Spawn-rate multiplier cap
    pub const RAMP_CAP: f32 = 3.0;

    /// Delay before the first chained barrel blast fires
    pub const CHAIN_DELAY_BASE_MS: u64 = 100;
    /// Additional stagger per chained barrel in one pass
    pub const CHAIN_DELAY_STEP_MS: u64 = 50;
}

/// Unit vector for an aim angle (radians, 0 = +x)
#[inline]
pub fn angle_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Center of the world rectangle
#[inline]
pub fn world_center() -> Vec2 {
    Vec2::new(consts::WORLD_WIDTH / 2.0, consts::WORLD_HEIGHT / 2.0)
}

/// Clamp a point into the world rectangle
#[inline]
pub fn clamp_to_world(p: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(0.0, consts::WORLD_WIDTH),
        p.y.clamp(0.0, consts::WORLD_HEIGHT),
    )
}
