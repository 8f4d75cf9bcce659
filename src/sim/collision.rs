//! Collision tests and dual-representation destruction
//!
//! Every obstacle carries two bounds: a tight movement shape that blocks
//! locomotion and a generous hit-detection shape that absorbs projectiles.
//! The two die independently but share one obstacle record, so destroying
//! either always finds its counterpart through the id.

use glam::Vec2;

use super::state::{Obstacle, ObstacleKind, Projectile, ProjectileShape, SimEvent, SimState};

/// Circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Distance from a point to the segment [a, b]
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 0.0001 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Does this projectile touch a circle? Beams test their whole extent.
pub fn projectile_hits_circle(projectile: &Projectile, center: Vec2, radius: f32) -> bool {
    match projectile.shape {
        ProjectileShape::Point { radius: pr } => {
            circles_overlap(projectile.pos, pr, center, radius)
        }
        ProjectileShape::Beam { start, end, width } => {
            point_segment_distance(center, start, end) < width / 2.0 + radius
        }
    }
}

/// What a projectile-obstacle hit produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The hit shape absorbed the round and survives
    Absorbed,
    /// Obstacle destroyed outright, both representations gone
    Destroyed,
    /// A barrel went up: the caller owes a blast at its position
    Detonated,
}

/// Resolve a projectile hit on an obstacle's hit-detection shape.
///
/// Walls and trees run down their hit counter; at zero the hit shape dies
/// and takes the movement counterpart with it. Barrels skip the counter
/// and detonate on any hit. A counterpart that is already gone stays gone.
pub fn on_projectile_hit_obstacle(state: &mut SimState, obstacle_id: u32) -> HitOutcome {
    let Some(obstacle) = state.obstacle_mut(obstacle_id) else {
        return HitOutcome::Absorbed; // stale hit, nothing to do
    };
    if !obstacle.hit_alive {
        return HitOutcome::Absorbed;
    }

    if obstacle.kind == ObstacleKind::Barrel {
        obstacle.exploding = true;
        obstacle.destroy();
        let (kind, pos) = (obstacle.kind, obstacle.pos);
        state.push_event(SimEvent::ObstacleDestroyed { kind, pos });
        return HitOutcome::Detonated;
    }

    obstacle.health -= 1;
    if obstacle.health > 0 {
        return HitOutcome::Absorbed;
    }
    obstacle.destroy();
    let (kind, pos) = (obstacle.kind, obstacle.pos);
    state.push_event(SimEvent::ObstacleDestroyed { kind, pos });
    HitOutcome::Destroyed
}

/// Push a circle out of every alive movement shape. Agents and the player
/// rely on this to be physically blocked; nobody routes around cover.
pub fn resolve_movement(pos: &mut Vec2, radius: f32, obstacles: &[Obstacle]) {
    for _ in 0..5 {
        let mut pushed = false;
        for o in obstacles {
            if !o.move_alive {
                continue;
            }
            let min_dist = radius + o.kind.move_radius();
            let delta = *pos - o.pos;
            let dist = delta.length().max(0.001);
            let overlap = min_dist - dist;
            if overlap > 0.0 {
                *pos += delta / dist * overlap;
                pushed = true;
                break;
            }
        }
        if !pushed {
            break;
        }
    }
}
