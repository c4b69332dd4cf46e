use serde::{Deserialize, Serialize};

use crate::battle::types::BattleOutcome;
use crate::core::constants::DEFAULT_MAX_TURNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Nightmare,
    ];

    pub fn xp_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
            Difficulty::Nightmare => 1.8,
        }
    }

    pub fn coin_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.0,
        }
    }

    pub fn item_drop_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
            Difficulty::Nightmare => 1.5,
        }
    }

    pub fn equipment_drop_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.5,
        }
    }

    /// Equipment rarity weights as `[R, SR, SSR]`.
    pub fn equipment_rarity_weights(&self) -> [u32; 3] {
        match self {
            Difficulty::Easy => [85, 14, 1],
            Difficulty::Normal => [75, 22, 3],
            Difficulty::Hard => [60, 33, 7],
            Difficulty::Nightmare => [45, 40, 15],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleType {
    Normal,
    Elite,
    Boss,
}

/// Battle-level settings the reward step needs beyond the session itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardContext {
    pub difficulty: Difficulty,
    pub battle_type: BattleType,
    pub max_turns: u32,
}

impl Default for RewardContext {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            battle_type: BattleType::Normal,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl RewardContext {
    pub fn new(difficulty: Difficulty, battle_type: BattleType) -> Self {
        Self {
            difficulty,
            battle_type,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardBundle {
    pub outcome: BattleOutcome,
    pub experience: u64,
    pub coins: u64,
    pub items: Vec<String>,
    pub equipment: Vec<String>,
    pub rare_drops: Vec<String>,
    pub performance_multiplier: f64,
}
