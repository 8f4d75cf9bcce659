//! Agent spawning, spawn safety, and difficulty control
//!
//! One continuous wave: an opening batch walks in from every edge, then a
//! timer-driven trickle whose interval shrinks as the run drags on. There
//! are no discrete levels, only an intensity ramp.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Agent, Obstacle, SimEvent, SimState};
use super::zone::{ProtectedZone, ZoneKind};
use crate::consts::{
    EDGE_SPAWN_MARGIN, INITIAL_BATCH_MAX, INITIAL_BATCH_MIN, RAMP_CAP, RAMP_FACTOR,
    RAMP_START_SECS, RAMP_WINDOW_SECS, SAFE_SPAWN_ATTEMPTS, SAFE_SPAWN_CLEARANCE,
    SAFE_SPAWN_FALLBACK, SAFE_SPAWN_SEARCH_RADIUS, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::{angle_to_vec, clamp_to_world, world_center};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

const EDGES: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

/// Preferred safe-spawn candidates, center-relative, tried in order
const PREFERRED_OFFSETS: &[(f32, f32)] = &[
    (0.0, 0.0),
    (120.0, 0.0),
    (-120.0, 0.0),
    (0.0, 120.0),
    (0.0, -120.0),
    (160.0, 160.0),
    (-160.0, -160.0),
];

/// Find a player spawn point clear of every active obstacle.
///
/// Preferred candidates first, then up to 100 random samples around the
/// center, then a fixed fallback. Always returns a coordinate inside the
/// world; exhaustion is logged, never surfaced as a failure. The landmark
/// band counts as unsafe: it is the one region where zone pruning leaves
/// obstacles standing.
pub fn find_safe_spawn(
    obstacles: &[Obstacle],
    zones: &[ProtectedZone],
    rng: &mut Pcg32,
) -> Vec2 {
    let center = world_center();
    let is_safe = |p: Vec2| {
        zones
            .iter()
            .all(|z| z.kind != ZoneKind::Landmark || !z.contains(p))
            && obstacles
                .iter()
                .filter(|o| o.active())
                .all(|o| o.pos.distance(p) >= SAFE_SPAWN_CLEARANCE)
    };

    for &(dx, dy) in PREFERRED_OFFSETS {
        let p = clamp_to_world(center + Vec2::new(dx, dy));
        if is_safe(p) {
            return p;
        }
    }

    for _ in 0..SAFE_SPAWN_ATTEMPTS {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let radius = rng.random_range(0.0..=SAFE_SPAWN_SEARCH_RADIUS);
        let p = clamp_to_world(center + angle_to_vec(angle) * radius);
        if is_safe(p) {
            return p;
        }
    }

    let fallback = clamp_to_world(Vec2::from(SAFE_SPAWN_FALLBACK));
    log::warn!("Safe-spawn search exhausted, using fallback ({}, {})", fallback.x, fallback.y);
    fallback
}

/// Place the opening batch: for each edge, a random count in [3,5] of
/// non-elite agents just outside that edge.
pub fn spawn_initial_batch(state: &mut SimState) {
    for edge in EDGES {
        let count = state.rng.random_range(INITIAL_BATCH_MIN..=INITIAL_BATCH_MAX);
        for _ in 0..count {
            let eligible: Vec<(usize, f32)> = state
                .tuning
                .archetypes
                .iter()
                .enumerate()
                .filter(|(_, a)| !a.elite)
                .map(|(i, a)| (i, a.spawn_weight))
                .collect();
            let Some(idx) = weighted_pick(&eligible, &mut state.rng) else {
                log::warn!("No non-elite archetype configured, skipping batch spawn");
                return;
            };
            let pos = point_on_edge(edge, &mut state.rng);
            spawn_agent(state, idx, pos);
        }
    }
}

/// Spawn a single agent at a random edge.
///
/// The scripted elite pre-empts weighted selection exactly once, at the
/// first call after its time gate passes. Everything else is a weighted
/// linear scan over time-eligible archetypes.
pub fn spawn_one(state: &mut SimState) {
    if state.tuning.archetypes.is_empty() {
        log::warn!("Archetype table is empty, nothing to spawn");
        return;
    }
    let elapsed = state.elapsed_ms();

    if !state.spawn.elite_spawned {
        let forced = state
            .tuning
            .archetypes
            .iter()
            .position(|a| a.guaranteed_first && elapsed >= a.min_spawn_ms.unwrap_or(0));
        if let Some(idx) = forced {
            state.spawn.elite_spawned = true;
            let edge = EDGES[state.rng.random_range(0..EDGES.len())];
            let pos = point_on_edge(edge, &mut state.rng);
            spawn_agent(state, idx, pos);
            return;
        }
    }

    let eligible: Vec<(usize, f32)> = state
        .tuning
        .archetypes
        .iter()
        .enumerate()
        .filter(|(_, a)| a.min_spawn_ms.is_none_or(|gate| elapsed >= gate))
        .map(|(i, a)| (i, a.spawn_weight))
        .collect();

    // Empty set is a configuration problem, not a crash: take the first
    // archetype and keep the wave going.
    let idx = weighted_pick(&eligible, &mut state.rng).unwrap_or_else(|| {
        log::warn!("No eligible archetype at {elapsed}ms, defaulting to first");
        0
    });
    let edge = EDGES[state.rng.random_range(0..EDGES.len())];
    let pos = point_on_edge(edge, &mut state.rng);
    spawn_agent(state, idx, pos);
}

/// Weighted selection: draw in [0, sum), subtract weights in declaration
/// order, select where the remainder crosses zero. Ties favor the earlier
/// entry; a fall-through (float rounding) takes the first entry.
fn weighted_pick(eligible: &[(usize, f32)], rng: &mut Pcg32) -> Option<usize> {
    let first = eligible.first().map(|&(i, _)| i)?;
    let total: f32 = eligible.iter().map(|&(_, w)| w).sum();
    if total <= 0.0 {
        return Some(first);
    }
    let mut remainder = rng.random_range(0.0..total);
    for &(idx, weight) in eligible {
        remainder -= weight;
        if remainder <= 0.0 {
            return Some(idx);
        }
    }
    Some(first)
}

fn point_on_edge(edge: Edge, rng: &mut Pcg32) -> Vec2 {
    match edge {
        Edge::Top => Vec2::new(rng.random_range(0.0..=WORLD_WIDTH), -EDGE_SPAWN_MARGIN),
        Edge::Bottom => Vec2::new(
            rng.random_range(0.0..=WORLD_WIDTH),
            WORLD_HEIGHT + EDGE_SPAWN_MARGIN,
        ),
        Edge::Left => Vec2::new(-EDGE_SPAWN_MARGIN, rng.random_range(0.0..=WORLD_HEIGHT)),
        Edge::Right => Vec2::new(
            WORLD_WIDTH + EDGE_SPAWN_MARGIN,
            rng.random_range(0.0..=WORLD_HEIGHT),
        ),
    }
}

fn spawn_agent(state: &mut SimState, archetype: usize, pos: Vec2) {
    let spec = state.tuning.archetype(archetype).clone();
    let id = state.next_entity_id();
    state.agents.push(Agent {
        id,
        archetype,
        health: spec.max_health,
        pos,
        vel: Vec2::ZERO,
    });
    state.push_event(SimEvent::AgentSpawned {
        id,
        archetype: spec.id,
        pos,
        elite: spec.elite,
    });
}

/// Spawn-rate multiplier for an elapsed time: flat for the first minute,
/// then one 1.3x step per half-minute window, capped at 3.0.
pub fn multiplier_for(secs: f32) -> f32 {
    if secs < RAMP_START_SECS {
        return 1.0;
    }
    let steps = ((secs - RAMP_START_SECS) / RAMP_WINDOW_SECS).floor() as i32;
    RAMP_FACTOR.powi(steps).min(RAMP_CAP)
}

/// Recompute the multiplier and, when it moved more than 0.01, replace the
/// spawn interval and notify the presentation layer.
pub fn recalculate_spawn_rate(state: &mut SimState) {
    let secs = state.elapsed_secs();
    if secs < RAMP_START_SECS {
        return;
    }
    let multiplier = multiplier_for(secs);
    if (multiplier - state.spawn.multiplier).abs() > 0.01 {
        state.spawn.multiplier = multiplier;
        state.spawn.interval_ms = state.tuning.base_spawn_interval_ms as f32 / multiplier;
        state.push_event(SimEvent::DifficultyIncreased { multiplier });
        log::info!("Spawn rate x{multiplier:.2} at {secs:.0}s");
    }
}
