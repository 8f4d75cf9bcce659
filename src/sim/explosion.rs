//! Blast resolution and the chain-reaction queue
//!
//! A barrel blast damages everything within a straight-line radius (no
//! line of sight) and trips every other barrel in range. Tripped barrels
//! fire their own blasts after a staggered delay, queued by fire time, so
//! a cascade walks outward instead of resolving in one frame. The
//! candidate set is snapshotted at the moment of the triggering blast, and
//! the `exploding` flag only ever goes false -> true, so a cascade over N
//! barrels fires exactly N blasts.

use std::cmp::{Ordering, Reverse};

use glam::Vec2;

use super::combat;
use super::state::{ObstacleKind, SimEvent, SimState};
use crate::consts::{CHAIN_DELAY_BASE_MS, CHAIN_DELAY_STEP_MS};

/// A scheduled chain blast. Ordered by fire time, then insertion order so
/// same-tick blasts resolve in trigger order.
#[derive(Debug, Clone, Copy)]
pub struct PendingBlast {
    pub fire_at_ms: u64,
    pub seq: u32,
    pub barrel_id: u32,
}

impl PartialEq for PendingBlast {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at_ms == other.fire_at_ms && self.seq == other.seq
    }
}

impl Eq for PendingBlast {}

impl Ord for PendingBlast {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at_ms
            .cmp(&other.fire_at_ms)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for PendingBlast {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Resolve one blast: area-kill agents, level walls and trees, trip and
/// schedule neighboring barrels, and check the player.
pub fn explode(state: &mut SimState, center: Vec2, radius: f32) {
    state.push_event(SimEvent::ExplosionTriggered { pos: center, radius });

    // Agents caught in the blast die outright, rewards still count
    let mut killed = Vec::new();
    state.agents.retain(|a| {
        if a.pos.distance(center) <= radius {
            killed.push((a.id, a.archetype));
            false
        } else {
            true
        }
    });
    for (id, archetype) in killed {
        let spec = state.tuning.archetype(archetype).clone();
        state.stats.record_kill(&spec.id, spec.reward);
        state.push_event(SimEvent::AgentKilled {
            id,
            archetype: spec.id,
            reward: spec.reward,
        });
    }

    // Walls and trees go down, both representations at once
    let mut leveled = Vec::new();
    for o in &mut state.obstacles {
        if o.kind == ObstacleKind::Barrel {
            continue;
        }
        if o.active() && o.pos.distance(center) <= radius {
            o.destroy();
            leveled.push((o.kind, o.pos));
        }
    }
    for (kind, pos) in leveled {
        state.push_event(SimEvent::ObstacleDestroyed { kind, pos });
    }

    // Chain: snapshot the not-yet-tripped barrels in range right now and
    // stagger their blasts. Draining the queue never re-evaluates this set.
    let now = state.elapsed_ms();
    let chained: Vec<u32> = state
        .obstacles
        .iter_mut()
        .filter(|o| {
            o.kind == ObstacleKind::Barrel
                && o.active()
                && !o.exploding
                && o.pos.distance(center) <= radius
        })
        .map(|o| {
            o.exploding = true;
            o.id
        })
        .collect();
    for (index, barrel_id) in chained.into_iter().enumerate() {
        let fire_at_ms = now + CHAIN_DELAY_BASE_MS + index as u64 * CHAIN_DELAY_STEP_MS;
        let seq = state.next_entity_id();
        state.pending_blasts.push(Reverse(PendingBlast {
            fire_at_ms,
            seq,
            barrel_id,
        }));
    }

    // The blast does not spare the player
    if state.player.pos.distance(center) <= radius {
        combat::defeat(state);
    }
}

/// Fire every scheduled blast whose time has come.
pub fn drain_due(state: &mut SimState) {
    let now = state.elapsed_ms();
    while let Some(&Reverse(blast)) = state.pending_blasts.peek() {
        if blast.fire_at_ms > now {
            break;
        }
        state.pending_blasts.pop();
        detonate_barrel(state, blast.barrel_id);
    }
}

/// A tripped barrel's own blast: destroy it, then explode at its position.
/// A barrel record that vanished in the meantime is skipped silently.
fn detonate_barrel(state: &mut SimState, barrel_id: u32) {
    let Some(barrel) = state.obstacle_mut(barrel_id) else {
        return;
    };
    let pos = barrel.pos;
    barrel.destroy();
    state.push_event(SimEvent::ObstacleDestroyed {
        kind: ObstacleKind::Barrel,
        pos,
    });
    let radius = state.tuning.blast_radius;
    explode(state, pos, radius);
}
