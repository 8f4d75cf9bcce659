//! Per-run statistics
//!
//! Everything the presentation layer shows on the defeat screen. Lives for
//! exactly one run and is cloned into the `PlayerDefeated` event; nothing
//! here is persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Accumulated results of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Spendable reward balance
    pub coins: u32,
    /// Kill tally keyed by archetype id
    pub kills: BTreeMap<String, u32>,
    /// Weapon ids bought this run, in purchase order
    pub weapons_purchased: Vec<String>,
    /// Whole seconds survived, snapshotted at defeat
    pub survival_secs: u64,
}

impl RunStats {
    /// Credit a kill: reward coins plus the archetype's tally bucket
    pub fn record_kill(&mut self, archetype_id: &str, reward: u32) {
        self.coins += reward;
        *self.kills.entry(archetype_id.to_owned()).or_insert(0) += 1;
    }

    /// Total kills across all archetypes
    pub fn total_kills(&self) -> u32 {
        self.kills.values().sum()
    }
}
