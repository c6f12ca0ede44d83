//! World initialization: deterministic chest placement from a seed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::WorldPos;

use super::chest::Chest;
use super::reward::SeededRng;
use super::types::{ChestId, DEFAULT_CHEST_COUNT, DEFAULT_CHEST_SPREAD, MAX_CHEST_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldInitConfig {
    pub seed: u64,
    pub chest_count: usize,
    /// Side length of the square, centered on the origin, chests spawn in.
    pub chest_spread: f64,
    pub chest_id_prefix: String,
}

impl Default for WorldInitConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chest_count: DEFAULT_CHEST_COUNT,
            chest_spread: DEFAULT_CHEST_SPREAD,
            chest_id_prefix: "chest-".to_string(),
        }
    }
}

impl WorldInitConfig {
    pub fn sanitized(mut self) -> Self {
        self.chest_count = self.chest_count.min(MAX_CHEST_COUNT);
        if !self.chest_spread.is_finite() || self.chest_spread < 0.0 {
            self.chest_spread = DEFAULT_CHEST_SPREAD;
        }
        if self.chest_id_prefix.is_empty() {
            self.chest_id_prefix = "chest-".to_string();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInitReport {
    pub seed: u64,
    pub chests: usize,
}

pub fn build_chests(init: &WorldInitConfig) -> (BTreeMap<ChestId, Chest>, WorldInitReport) {
    let init = init.clone().sanitized();
    let mut rng = SeededRng::new(init.seed);
    let mut chests = BTreeMap::new();
    for idx in 0..init.chest_count {
        let x = (rng.next_f64() - 0.5) * init.chest_spread;
        let z = (rng.next_f64() - 0.5) * init.chest_spread;
        let id = format!("{}{idx}", init.chest_id_prefix);
        chests.insert(id.clone(), Chest::new(id, WorldPos::new(x, 0.0, z)));
    }
    let report = WorldInitReport {
        seed: init.seed,
        chests: chests.len(),
    };
    (chests, report)
}
