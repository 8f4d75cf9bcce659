//! Static obstacle layout generation
//!
//! Placements come from authored candidate lists: the landmark glyph (a
//! large X of walls in the top band), structural wall clusters, scattered
//! trees, and barrel caches. Candidates are filtered in a fixed order:
//!
//! 1. Trees keep clear of every wall candidate, placed or not.
//! 2. Protected zones prune walls and trees; landmark-tagged walls skip
//!    only the landmark band itself and still answer to every other zone.
//! 3. Barrels keep clear of the surviving walls and trees and of all zones.
//!
//! The filter order matters: barrels are checked against final placements,
//! trees against raw candidates.

use glam::Vec2;

use super::state::ObstacleKind;
use super::zone::{ProtectedZone, ZoneKind};
use crate::consts::{BARREL_CLEARANCE, TREE_WALL_CLEARANCE};

/// A placement the generator decided on; ids are assigned by the sim
#[derive(Debug, Clone, Copy)]
pub struct PlannedObstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub landmark: bool,
}

/// The landmark glyph: an X of walls centered on the top band
const GLYPH_WALLS: &[(f32, f32)] = &[
    (560.0, 60.0),
    (600.0, 90.0),
    (640.0, 120.0),
    (680.0, 150.0),
    (720.0, 180.0),
    (720.0, 60.0),
    (680.0, 90.0),
    (600.0, 150.0),
    (560.0, 180.0),
];

/// Structural wall clusters: corner bunkers, side barriers, the south arc,
/// and two forward posts that sit inside the spawn clearing on purpose
/// (the zone filter eats them).
const STRUCT_WALLS: &[(f32, f32)] = &[
    (120.0, 120.0),
    (180.0, 120.0),
    (120.0, 180.0),
    (200.0, 300.0),
    (200.0, 360.0),
    (200.0, 420.0),
    (1080.0, 300.0),
    (1080.0, 360.0),
    (1080.0, 420.0),
    (1100.0, 560.0),
    (1160.0, 560.0),
    (1100.0, 620.0),
    (560.0, 620.0),
    (640.0, 650.0),
    (720.0, 620.0),
    (600.0, 420.0),
    (700.0, 300.0),
];

const TREE_CANDIDATES: &[(f32, f32)] = &[
    (320.0, 160.0),
    (420.0, 520.0),
    (900.0, 180.0),
    (980.0, 480.0),
    (180.0, 560.0),
    (760.0, 520.0),
    (210.0, 360.0), // hugs the west barrier, removed by rule 1
    (640.0, 280.0), // inside the spawn clearing, removed by rule 2
    (640.0, 10.0),  // inside the landmark band, removed by rule 2
];

const BARREL_CANDIDATES: &[(f32, f32)] = &[
    (400.0, 300.0),
    (460.0, 240.0), // close enough to the one above to chain
    (880.0, 360.0),
    (480.0, 600.0),
    (840.0, 600.0),
    (600.0, 400.0), // inside the spawn clearing, removed by rule 3
    (300.0, 180.0), // hugs a tree, removed by rule 3
];

/// Run the full candidate filter and return the placements for one level
pub fn generate(zones: &[ProtectedZone]) -> Vec<PlannedObstacle> {
    let wall_candidates: Vec<(Vec2, bool)> = GLYPH_WALLS
        .iter()
        .map(|&(x, y)| (Vec2::new(x, y), true))
        .chain(STRUCT_WALLS.iter().map(|&(x, y)| (Vec2::new(x, y), false)))
        .collect();

    // Rule 1: trees vs every wall candidate (placed or not)
    let trees: Vec<Vec2> = TREE_CANDIDATES
        .iter()
        .map(|&(x, y)| Vec2::new(x, y))
        .filter(|t| {
            wall_candidates
                .iter()
                .all(|(w, _)| t.distance(*w) >= TREE_WALL_CLEARANCE)
        })
        .collect();

    // Rule 2: protected-zone pruning with the landmark exemption
    let walls: Vec<(Vec2, bool)> = wall_candidates
        .into_iter()
        .filter(|(pos, landmark)| {
            zones
                .iter()
                .all(|z| (*landmark && z.kind == ZoneKind::Landmark) || !z.contains(*pos))
        })
        .collect();
    let trees: Vec<Vec2> = trees
        .into_iter()
        .filter(|t| zones.iter().all(|z| !z.contains(*t)))
        .collect();

    // Rule 3: barrels vs the surviving placements and all zones
    let barrels: Vec<Vec2> = BARREL_CANDIDATES
        .iter()
        .map(|&(x, y)| Vec2::new(x, y))
        .filter(|b| {
            walls
                .iter()
                .all(|(w, _)| b.distance(*w) >= BARREL_CLEARANCE)
                && trees.iter().all(|t| b.distance(*t) >= BARREL_CLEARANCE)
                && zones.iter().all(|z| !z.contains(*b))
        })
        .collect();

    let landmark_count = walls.iter().filter(|(_, l)| *l).count();
    log::info!(
        "Layout: {} walls ({} landmark), {} trees, {} barrels",
        walls.len(),
        landmark_count,
        trees.len(),
        barrels.len()
    );

    let mut placements = Vec::with_capacity(walls.len() + trees.len() + barrels.len());
    placements.extend(walls.into_iter().map(|(pos, landmark)| PlannedObstacle {
        kind: ObstacleKind::Wall,
        pos,
        landmark,
    }));
    placements.extend(trees.into_iter().map(|pos| PlannedObstacle {
        kind: ObstacleKind::Tree,
        pos,
        landmark: false,
    }));
    placements.extend(barrels.into_iter().map(|pos| PlannedObstacle {
        kind: ObstacleKind::Barrel,
        pos,
        landmark: false,
    }));
    placements
}
