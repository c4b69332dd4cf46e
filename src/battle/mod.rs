//! Battle engine: combatant and session types, the session store contract
//! and the turn-based state machine.

pub mod engine;
pub mod store;
pub mod types;

pub use engine::*;
pub use store::*;
pub use types::*;
