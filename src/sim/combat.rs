//! Combat resolution
//!
//! Projectile damage bookkeeping, pure-pursuit steering, the one-touch
//! defeat rule, and the weapon-fire/purchase boundary calls.

use glam::Vec2;

use super::collision;
use super::state::{Phase, Projectile, ProjectileShape, SimEvent, SimState};
use crate::consts::{PLAYER_SPEED, SIM_DT};
use crate::tuning::{ProjectileKind, WeaponSpec};
use crate::{angle_to_vec, clamp_to_world};

/// Apply one projectile hit to the agent at `agent_index`.
///
/// Damaged agents persist with reduced health (the renderer shows the
/// proportion); at zero or below the agent is removed and its reward
/// credited.
pub fn on_projectile_hit_agent(state: &mut SimState, agent_index: usize, damage: i32) {
    let agent = &mut state.agents[agent_index];
    agent.health -= damage;
    if agent.health > 0 {
        let (id, health, archetype) = (agent.id, agent.health, agent.archetype);
        let max_health = state.tuning.archetype(archetype).max_health;
        state.push_event(SimEvent::AgentDamaged {
            id,
            health,
            max_health,
        });
        return;
    }

    let agent = state.agents.remove(agent_index);
    let spec = state.tuning.archetype(agent.archetype).clone();
    state.stats.record_kill(&spec.id, spec.reward);
    state.push_event(SimEvent::AgentKilled {
        id: agent.id,
        archetype: spec.id,
        reward: spec.reward,
    });
}

/// Move the player by the input direction, clamped to the world and
/// blocked by movement shapes.
pub fn move_player(state: &mut SimState, move_dir: Vec2, dt: f32) {
    let step = move_dir.normalize_or_zero() * PLAYER_SPEED * dt;
    let mut pos = clamp_to_world(state.player.pos + step);
    collision::resolve_movement(&mut pos, state.player.radius, &state.obstacles);
    state.player.pos = pos;
}

/// Pure pursuit: every agent re-aims straight at the player each tick and
/// is blocked, not rerouted, by obstacle movement shapes.
pub fn steer_agents(state: &mut SimState, dt: f32) {
    let target = state.player.pos;
    for i in 0..state.agents.len() {
        let spec = state.tuning.archetype(state.agents[i].archetype);
        let (speed, radius) = (spec.speed, spec.radius);

        let agent = &mut state.agents[i];
        agent.vel = (target - agent.pos).normalize_or_zero() * speed;
        let mut pos = agent.pos + agent.vel * dt;
        collision::resolve_movement(&mut pos, radius, &state.obstacles);
        state.agents[i].pos = pos;
    }
}

/// One touch ends the run: exact overlap, no grace period, no damage
/// accumulation.
pub fn check_player_contact(state: &mut SimState) {
    let player = state.player.clone();
    let touched = state.agents.iter().any(|a| {
        let radius = state.tuning.archetype(a.archetype).radius;
        collision::circles_overlap(a.pos, radius, player.pos, player.radius)
    });
    if touched {
        defeat(state);
    }
}

/// Raise the terminal defeat condition exactly once: snapshot the survival
/// time, hand the run stats over, and freeze the sim.
pub fn defeat(state: &mut SimState) {
    if state.phase == Phase::GameOver {
        return;
    }
    state.phase = Phase::GameOver;
    let survival_secs = state.elapsed_ms() / 1000;
    state.stats.survival_secs = survival_secs;
    log::info!(
        "Run over after {survival_secs}s with {} kills",
        state.stats.total_kills()
    );
    let stats = state.stats.clone();
    state.push_event(SimEvent::PlayerDefeated {
        survival_secs,
        stats,
    });
}

/// Boundary call: the presentation layer fires the player's weapon.
pub fn fire_weapon(state: &mut SimState, origin: Vec2, aim_angle: f32, weapon: &WeaponSpec) {
    if state.phase == Phase::GameOver {
        return;
    }
    let dir = angle_to_vec(aim_angle);
    let ttl_ticks = (((weapon.lifetime_ms as f32 / 1000.0) / SIM_DT).ceil() as u32).max(1);
    let id = state.next_entity_id();
    let projectile = match weapon.kind {
        ProjectileKind::Point { radius, speed } => Projectile {
            id,
            damage: weapon.damage,
            pos: origin,
            vel: dir * speed,
            ttl_ticks,
            shape: ProjectileShape::Point { radius },
        },
        ProjectileKind::Beam { width, range } => Projectile {
            id,
            damage: weapon.damage,
            pos: origin,
            vel: Vec2::ZERO,
            ttl_ticks,
            shape: ProjectileShape::Beam {
                start: origin,
                end: origin + dir * range,
                width,
            },
        },
    };
    state.projectiles.push(projectile);
}

/// Boundary call: buy a weapon from the catalog. Unknown items and thin
/// wallets are warned no-ops; only a completed purchase emits an event.
pub fn purchase_weapon(state: &mut SimState, item_id: &str) -> bool {
    let Some(weapon) = state.tuning.weapon(item_id).cloned() else {
        log::warn!("Unknown shop item '{item_id}'");
        return false;
    };
    if state.stats.coins < weapon.price {
        log::warn!(
            "Cannot afford '{item_id}': {} coins of {}",
            state.stats.coins,
            weapon.price
        );
        return false;
    }
    state.stats.coins -= weapon.price;
    state.stats.weapons_purchased.push(weapon.id.clone());
    state.push_event(SimEvent::PurchaseApplied { weapon: weapon.id });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Agent;
    use crate::tuning::Tuning;

    fn empty_state() -> SimState {
        let mut state = SimState::new(1, Tuning::default());
        state.agents.clear();
        state.obstacles.clear();
        state.drain_events();
        state
    }

    fn add_agent(state: &mut SimState, archetype: usize, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let health = state.tuning.archetype(archetype).max_health;
        state.agents.push(Agent {
            id,
            archetype,
            health,
            pos,
            vel: Vec2::ZERO,
        });
        id
    }

    #[test]
    fn test_two_hit_archetype_dies_on_second_hit() {
        // walker: max_health 2, pistol damage 1
        let mut state = empty_state();
        let id = add_agent(&mut state, 0, Vec2::new(100.0, 100.0));
        assert_eq!(state.tuning.archetype(0).max_health, 2);

        on_projectile_hit_agent(&mut state, 0, 1);
        assert_eq!(state.agents.len(), 1, "survives the first hit");
        assert_eq!(state.agents[0].health, 1);
        assert!(state.events.iter().any(|e| matches!(
            e,
            SimEvent::AgentDamaged {
                health: 1,
                max_health: 2,
                ..
            }
        )));

        on_projectile_hit_agent(&mut state, 0, 1);
        assert!(state.agents.is_empty(), "dies on the second hit");
        let reward = state.tuning.archetype(0).reward;
        assert_eq!(state.stats.coins, reward);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::AgentKilled { id: k, .. } if *k == id)));
    }

    #[test]
    fn test_pursuit_aims_at_player() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(200.0, 100.0);
        add_agent(&mut state, 0, Vec2::new(100.0, 100.0));

        steer_agents(&mut state, SIM_DT);
        let agent = &state.agents[0];
        let speed = state.tuning.archetype(0).speed;
        assert!((agent.vel.length() - speed).abs() < 0.01);
        assert!(agent.vel.x > 0.0 && agent.vel.y.abs() < 0.01);
        assert!(agent.pos.x > 100.0);
    }

    #[test]
    fn test_contact_defeat_fires_once() {
        let mut state = empty_state();
        state.time_ticks = 150; // 2.5s
        let player_pos = state.player.pos;
        add_agent(&mut state, 0, player_pos);

        check_player_contact(&mut state);
        check_player_contact(&mut state);

        assert_eq!(state.phase, Phase::GameOver);
        let defeats: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::PlayerDefeated { survival_secs, .. } => Some(*survival_secs),
                _ => None,
            })
            .collect();
        assert_eq!(defeats, vec![state.elapsed_ms() / 1000]);
        assert_eq!(state.stats.survival_secs, defeats[0]);
    }

    #[test]
    fn test_no_contact_no_defeat() {
        let mut state = empty_state();
        let player_pos = state.player.pos;
        add_agent(&mut state, 0, player_pos + Vec2::new(500.0, 0.0));
        check_player_contact(&mut state);
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_fire_point_weapon() {
        let mut state = empty_state();
        let pistol = state.tuning.weapon("pistol").unwrap().clone();
        fire_weapon(&mut state, Vec2::new(100.0, 100.0), 0.0, &pistol);

        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert_eq!(p.damage, pistol.damage);
        assert!(p.vel.x > 0.0);
        assert!(matches!(p.shape, ProjectileShape::Point { .. }));
    }

    #[test]
    fn test_fire_beam_weapon_extends_along_aim() {
        let mut state = empty_state();
        let lance = state.tuning.weapon("arc-lance").unwrap().clone();
        let origin = Vec2::new(100.0, 100.0);
        fire_weapon(&mut state, origin, std::f32::consts::FRAC_PI_2, &lance);

        let ProjectileShape::Beam { start, end, .. } = state.projectiles[0].shape else {
            panic!("expected a beam");
        };
        assert_eq!(start, origin);
        assert!((end.y - (100.0 + 600.0)).abs() < 0.01);
        assert!((end.x - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_no_fire_after_defeat() {
        let mut state = empty_state();
        defeat(&mut state);
        let pistol = state.tuning.weapon("pistol").unwrap().clone();
        fire_weapon(&mut state, Vec2::ZERO, 0.0, &pistol);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_purchase_happy_path() {
        let mut state = empty_state();
        state.stats.coins = 200;
        assert!(purchase_weapon(&mut state, "smg"));
        assert_eq!(state.stats.coins, 50);
        assert_eq!(state.stats.weapons_purchased, vec!["smg".to_string()]);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::PurchaseApplied { .. })));
    }

    #[test]
    fn test_purchase_rejected_paths() {
        let mut state = empty_state();
        state.stats.coins = 10;
        assert!(!purchase_weapon(&mut state, "smg"), "too expensive");
        assert!(!purchase_weapon(&mut state, "bfg"), "not in the catalog");
        assert_eq!(state.stats.coins, 10);
        assert!(state.events.is_empty());
    }
}
