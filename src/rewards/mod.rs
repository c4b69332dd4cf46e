//! Reward calculator: experience, coins and drops from a finished battle.

pub mod drops;
pub mod logic;
pub mod types;

pub use drops::*;
pub use logic::*;
pub use types::*;
