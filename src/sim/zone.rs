//! Protected zones and point-in-circle tests
//!
//! A protected zone is a circular exclusion region: obstacle generation is
//! suppressed inside it, and spawn safety checks consult it. Zones are pure
//! predicates, never stored per-entity.

use glam::Vec2;

use crate::world_center;

/// What a zone protects; landmark-tagged walls are exempt from their own
/// zone's pruning but nobody else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    /// Clear ground around the player's starting area
    PlayerSpawn,
    /// The band the landmark glyph is drawn in
    Landmark,
}

/// A circular exclusion region
#[derive(Debug, Clone, Copy)]
pub struct ProtectedZone {
    pub center: Vec2,
    pub radius: f32,
    pub kind: ZoneKind,
}

impl ProtectedZone {
    pub fn contains(&self, p: Vec2) -> bool {
        in_circle(p, self.center, self.radius)
    }
}

/// Strict point-in-circle test
#[inline]
pub fn in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) < radius * radius
}

/// The level's zone set: player spawn clearing plus the landmark band
pub fn default_zones() -> Vec<ProtectedZone> {
    vec![
        ProtectedZone {
            center: world_center(),
            radius: 150.0,
            kind: ZoneKind::PlayerSpawn,
        },
        ProtectedZone {
            center: Vec2::new(640.0, 120.0),
            radius: 140.0,
            kind: ZoneKind::Landmark,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_circle_boundary_is_outside() {
        let c = Vec2::new(100.0, 100.0);
        assert!(in_circle(Vec2::new(100.0, 149.0), c, 50.0));
        assert!(!in_circle(Vec2::new(100.0, 150.0), c, 50.0));
    }

    #[test]
    fn test_default_zones_cover_center_and_glyph() {
        let zones = default_zones();
        assert_eq!(zones.len(), 2);
        assert!(
            zones
                .iter()
                .any(|z| z.kind == ZoneKind::PlayerSpawn && z.contains(world_center()))
        );
        assert!(
            zones
                .iter()
                .any(|z| z.kind == ZoneKind::Landmark && z.contains(Vec2::new(640.0, 120.0)))
        );
    }
}
