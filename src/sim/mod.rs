//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The presentation layer drives the sim with `tick` plus the boundary
//! calls (`fire_weapon`, `purchase_weapon`, `SimState::restart_run`) and
//! drains `SimState::drain_events` once per frame.

pub mod collision;
pub mod combat;
pub mod explosion;
pub mod layout;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod zone;

pub use combat::{fire_weapon, purchase_weapon};
pub use spawn::find_safe_spawn;
pub use state::{
    Agent, Obstacle, ObstacleKind, Phase, Player, Projectile, ProjectileShape, SimEvent, SimState,
};
pub use tick::{tick, TickInput};
pub use zone::{ProtectedZone, ZoneKind};
