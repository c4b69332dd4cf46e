//! Simulation configuration.

use crate::rewards::types::Difficulty;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Total pulls to make (rounded up to whole batches when `multi` is set)
    pub pulls: u32,

    /// Pull in batches of ten instead of singles
    pub multi: bool,

    /// Pity counter at the start of the run
    pub starting_pity: u32,

    /// Number of auto-battles to run
    pub battles: u32,

    /// Actions per battle before it is closed as-is
    pub max_actions_per_battle: u32,

    /// Difficulty used for the reward step of each battle
    pub difficulty: Difficulty,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per battle)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pulls: 10_000,
            multi: false,
            starting_pity: 0,
            battles: 100,
            max_actions_per_battle: 500,
            difficulty: Difficulty::Normal,
            seed: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Large single-pull run for checking that observed rates match the table
    pub fn rate_check(pulls: u32) -> Self {
        Self {
            pulls,
            multi: false,
            battles: 0,
            ..Default::default()
        }
    }

    /// Ten-pull batches for checking pity placement and the SR guarantee
    pub fn multi_pull_check(batches: u32) -> Self {
        Self {
            pulls: batches * 10,
            multi: true,
            battles: 0,
            ..Default::default()
        }
    }

    /// Battles only, at a given difficulty
    pub fn battle_balance(battles: u32, difficulty: Difficulty) -> Self {
        Self {
            pulls: 0,
            battles,
            difficulty,
            ..Default::default()
        }
    }
}
