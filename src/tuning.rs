//! Data-driven game balance
//!
//! Archetype and weapon tables plus spawn pacing knobs. The defaults below
//! are the shipped balance; hosts can replace them wholesale with a JSON
//! document at startup.

use serde::{Deserialize, Serialize};

/// A hostile agent archetype, shared by every agent of one kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub id: String,
    pub max_health: i32,
    /// Movement speed (units/s)
    pub speed: f32,
    /// Body radius used for contact and area checks
    pub radius: f32,
    /// Relative weight in random selection
    pub spawn_weight: f32,
    /// Coins credited on kill
    pub reward: u32,
    /// Not eligible for selection before this much elapsed time
    #[serde(default)]
    pub min_spawn_ms: Option<u64>,
    /// Force-spawned exactly once when its time gate first passes
    #[serde(default)]
    pub guaranteed_first: bool,
    /// Elite marker: tagged for the renderer, excluded from the opening batch
    #[serde(default)]
    pub elite: bool,
}

/// Projectile geometry produced by a weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// A moving round with a small collision radius
    Point { radius: f32, speed: f32 },
    /// An instantaneous beam from the muzzle to muzzle + range along the aim
    Beam { width: f32, range: f32 },
}

/// A weapon the presentation layer can fire or sell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub id: String,
    /// Health subtracted per hit
    pub damage: i32,
    /// Projectile lifetime before cleanup
    pub lifetime_ms: u64,
    pub kind: ProjectileKind,
    /// Shop price in coins (0 = starting weapon)
    pub price: u32,
}

/// Complete balance table for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub archetypes: Vec<ArchetypeSpec>,
    pub weapons: Vec<WeaponSpec>,
    /// Spawn interval at multiplier 1.0
    pub base_spawn_interval_ms: u64,
    /// Barrel blast radius
    pub blast_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            archetypes: vec![
                ArchetypeSpec {
                    id: "walker".into(),
                    max_health: 2,
                    speed: 60.0,
                    radius: 14.0,
                    spawn_weight: 50.0,
                    reward: 5,
                    min_spawn_ms: None,
                    guaranteed_first: false,
                    elite: false,
                },
                ArchetypeSpec {
                    id: "runner".into(),
                    max_health: 1,
                    speed: 120.0,
                    radius: 11.0,
                    spawn_weight: 30.0,
                    reward: 8,
                    min_spawn_ms: Some(30_000),
                    guaranteed_first: false,
                    elite: false,
                },
                ArchetypeSpec {
                    id: "brute".into(),
                    max_health: 6,
                    speed: 40.0,
                    radius: 22.0,
                    spawn_weight: 15.0,
                    reward: 20,
                    min_spawn_ms: Some(60_000),
                    guaranteed_first: false,
                    elite: false,
                },
                // The stalker is scripted: exactly one is forced in as soon
                // as its gate passes, after that it rolls like the rest.
                ArchetypeSpec {
                    id: "stalker".into(),
                    max_health: 4,
                    speed: 90.0,
                    radius: 13.0,
                    spawn_weight: 6.0,
                    reward: 50,
                    min_spawn_ms: Some(15_000),
                    guaranteed_first: true,
                    elite: true,
                },
            ],
            weapons: vec![
                WeaponSpec {
                    id: "pistol".into(),
                    damage: 1,
                    lifetime_ms: 900,
                    kind: ProjectileKind::Point {
                        radius: 4.0,
                        speed: 520.0,
                    },
                    price: 0,
                },
                WeaponSpec {
                    id: "smg".into(),
                    damage: 1,
                    lifetime_ms: 600,
                    kind: ProjectileKind::Point {
                        radius: 3.0,
                        speed: 640.0,
                    },
                    price: 150,
                },
                WeaponSpec {
                    id: "arc-lance".into(),
                    damage: 3,
                    lifetime_ms: 80,
                    kind: ProjectileKind::Beam {
                        width: 8.0,
                        range: 600.0,
                    },
                    price: 400,
                },
            ],
            base_spawn_interval_ms: 2_000,
            blast_radius: 120.0,
        }
    }
}

impl Tuning {
    /// Parse a full tuning table from JSON, falling back to the defaults on
    /// any parse error.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Tuning override rejected ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Look up a weapon by catalog id
    pub fn weapon(&self, id: &str) -> Option<&WeaponSpec> {
        self.weapons.iter().find(|w| w.id == id)
    }

    /// Archetype by table index (agents store the index)
    pub fn archetype(&self, index: usize) -> &ArchetypeSpec {
        &self.archetypes[index]
    }
}
