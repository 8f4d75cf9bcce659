//! Headless demo driver
//!
//! Runs a scripted survivor against the sim at full speed: the "player"
//! kites in a circle and shoots the nearest agent. Useful for balance
//! passes and for watching the event stream without a renderer.
//!
//! Usage: `powder-keg [seed]` with logging via `RUST_LOG`.

use glam::Vec2;
use powder_keg::consts::SIM_DT;
use powder_keg::sim::{self, Phase, SimEvent, SimState, TickInput};
use powder_keg::Tuning;

/// Ten minutes of sim time before we call the run a survival
const MAX_TICKS: u64 = 10 * 60 * 60;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Demo run, seed {seed}");

    let mut state = SimState::new(seed, Tuning::default());
    let mut shots = 0u32;

    while state.phase == Phase::Running && state.time_ticks < MAX_TICKS {
        // Kite in a slow circle
        let t = state.time_ticks as f32 * SIM_DT * 0.4;
        let input = TickInput {
            move_dir: Vec2::new(t.cos(), t.sin()),
        };

        // Shoot the nearest agent every 12 ticks
        if state.time_ticks % 12 == 0 {
            let player = state.player.pos;
            let aim = state
                .agents
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(player)
                        .partial_cmp(&b.pos.distance_squared(player))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|a| (a.pos.y - player.y).atan2(a.pos.x - player.x));
            if let (Some(aim), Some(pistol)) = (aim, state.tuning.weapon("pistol").cloned()) {
                sim::fire_weapon(&mut state, player, aim, &pistol);
                shots += 1;
            }
        }

        sim::tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                SimEvent::PlayerDefeated {
                    survival_secs,
                    stats,
                } => {
                    log::info!(
                        "Defeated after {survival_secs}s: {} kills, {} coins, {shots} shots",
                        stats.total_kills(),
                        stats.coins
                    );
                }
                SimEvent::DifficultyIncreased { multiplier } => {
                    log::info!("Difficulty up: x{multiplier:.2}");
                }
                SimEvent::ExplosionTriggered { pos, radius } => {
                    log::debug!("Boom at ({:.0}, {:.0}) r={radius:.0}", pos.x, pos.y);
                }
                _ => {}
            }
        }
    }

    if state.phase == Phase::Running {
        log::info!(
            "Survived the whole demo: {} kills, {} coins, {shots} shots",
            state.stats.total_kills(),
            state.stats.coins
        );
    }
}
