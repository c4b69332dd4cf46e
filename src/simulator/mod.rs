//! Balance simulator for Monte Carlo analysis.
//!
//! Runs large numbers of pulls and auto-battles to check:
//! - Observed rarity rates against the configured table
//! - How often hard pity and the 10-pull SR guarantee fire
//! - Win rates, battle length and reward totals
//!
//! Everything goes through the same pull, battle and reward functions the
//! game uses.

mod battle_sim;
mod config;
mod gacha_sim;
mod report;
mod runner;

pub use battle_sim::{choose_action, simulate_battle, BattleSimReport};
pub use config::SimConfig;
pub use gacha_sim::{simulate_pulls, GachaSimReport};
pub use report::SimReport;
pub use runner::{run_simulation, sample_enemies, sample_game_data, sample_party};
