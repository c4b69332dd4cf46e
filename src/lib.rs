//! Gacha Arena - gacha pulls, turn-based battles and battle rewards.
//!
//! The library holds all game logic; the `simulator` binary drives it
//! headlessly for balance analysis.

pub mod battle;
pub mod config;
pub mod core;
pub mod error;
pub mod gacha;
pub mod rewards;
pub mod simulator;
