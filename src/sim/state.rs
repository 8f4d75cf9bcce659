//! Game state and core simulation types
//!
//! All state for one run lives on `SimState`: the simulation owns every
//! entity collection exclusively, and the presentation layer only reads
//! positions and drains events. Same seed + same inputs = identical run.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::explosion::PendingBlast;
use super::{layout, spawn, zone};
use crate::consts::{PLAYER_RADIUS, SIM_DT};
use crate::stats::RunStats;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ticking normally, agents spawning
    Running,
    /// Terminal: defeat raised, tick is a no-op
    GameOver,
}

/// Static destructible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Tree,
    Barrel,
}

impl ObstacleKind {
    /// Tight radius that blocks locomotion
    pub fn move_radius(self) -> f32 {
        match self {
            Self::Wall => 22.0,
            Self::Tree => 14.0,
            Self::Barrel => 12.0,
        }
    }

    /// Generous radius that absorbs projectiles
    pub fn hit_radius(self) -> f32 {
        match self {
            Self::Wall => 30.0,
            Self::Tree => 24.0,
            Self::Barrel => 20.0,
        }
    }
}

/// A static destructible. The movement and hit-detection representations
/// die independently but share this record, so destroying one can always
/// find its counterpart by id.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    /// Remaining hits on the hit-detection shape (barrels bypass this)
    pub health: i32,
    /// Part of the landmark glyph, tagged at generation time
    pub landmark: bool,
    /// Chain-trigger guard: transitions false -> true at most once
    pub exploding: bool,
    pub move_alive: bool,
    pub hit_alive: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, landmark: bool) -> Self {
        Self {
            id,
            kind,
            pos,
            health: 1,
            landmark,
            exploding: false,
            move_alive: true,
            hit_alive: true,
        }
    }

    /// Still occupies the field in any form
    pub fn active(&self) -> bool {
        self.move_alive || self.hit_alive
    }

    /// Destroy both representations; parts already gone stay gone
    pub fn destroy(&mut self) {
        self.move_alive = false;
        self.hit_alive = false;
    }
}

/// A hostile agent in pure pursuit of the player
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: u32,
    /// Index into `Tuning::archetypes`
    pub archetype: usize,
    pub health: i32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Projectile geometry tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileShape {
    Point { radius: f32 },
    /// Beams keep their full extent for their whole lifetime
    Beam { start: Vec2, end: Vec2, width: f32 },
}

/// A live round or beam
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub damage: i32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks until cleanup if nothing is hit first
    pub ttl_ticks: u32,
    pub shape: ProjectileShape,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
}

/// Spawn pacing and difficulty state for the single continuous wave
#[derive(Debug, Clone)]
pub struct SpawnControl {
    /// Current interval between spawns (base / multiplier)
    pub interval_ms: f32,
    /// Counts down to the next spawn
    pub timer_ms: f32,
    /// Monotonically non-decreasing, capped
    pub multiplier: f32,
    /// One-shot: the scripted elite has been forced in
    pub elite_spawned: bool,
}

/// Everything the presentation layer reacts to, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    AgentSpawned {
        id: u32,
        archetype: String,
        pos: Vec2,
        elite: bool,
    },
    AgentDamaged {
        id: u32,
        health: i32,
        max_health: i32,
    },
    AgentKilled {
        id: u32,
        archetype: String,
        reward: u32,
    },
    ObstacleDestroyed {
        kind: ObstacleKind,
        pos: Vec2,
    },
    ExplosionTriggered {
        pos: Vec2,
        radius: f32,
    },
    DifficultyIncreased {
        multiplier: f32,
    },
    PlayerDefeated {
        survival_secs: u64,
        stats: RunStats,
    },
    PurchaseApplied {
        weapon: String,
    },
}

/// Complete simulation state for one run
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: Phase,
    /// Simulation tick counter, anchored at run start
    pub time_ticks: u64,
    pub tuning: Tuning,
    pub player: Player,
    pub agents: Vec<Agent>,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub spawn: SpawnControl,
    /// Delayed chain blasts, ordered by fire time
    pub pending_blasts: BinaryHeap<Reverse<PendingBlast>>,
    pub stats: RunStats,
    /// This tick's events, drained by the presentation layer
    pub events: Vec<SimEvent>,
    next_id: u32,
}

impl SimState {
    /// Build a fresh run: generate the layout, find a safe player spawn,
    /// place the opening batch of agents.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let interval = tuning.base_spawn_interval_ms as f32;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Running,
            time_ticks: 0,
            tuning,
            player: Player {
                pos: crate::world_center(),
                radius: PLAYER_RADIUS,
            },
            agents: Vec::new(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            spawn: SpawnControl {
                interval_ms: interval,
                timer_ms: interval,
                multiplier: 1.0,
                elite_spawned: false,
            },
            pending_blasts: BinaryHeap::new(),
            stats: RunStats::default(),
            events: Vec::new(),
            next_id: 1,
        };

        let zones = zone::default_zones();
        for planned in layout::generate(&zones) {
            let id = state.next_entity_id();
            state
                .obstacles
                .push(Obstacle::new(id, planned.kind, planned.pos, planned.landmark));
        }

        state.player.pos = spawn::find_safe_spawn(&state.obstacles, &zones, &mut state.rng);
        spawn::spawn_initial_batch(&mut state);
        state
    }

    /// Tear down the current run and start a new one. Cancels the spawn
    /// timer and every pending chain blast along with the rest of the world.
    pub fn restart_run(&mut self) {
        let next_seed = self.rng.random();
        let tuning = self.tuning.clone();
        log::info!("Run restarted (seed {next_seed})");
        *self = Self::new(next_seed, tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Milliseconds since run start
    pub fn elapsed_ms(&self) -> u64 {
        (self.time_ticks as f64 * SIM_DT as f64 * 1000.0) as u64
    }

    /// Seconds since run start
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Hand this frame's events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn obstacle_mut(&mut self, id: u32) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }
}
