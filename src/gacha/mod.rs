//! Gacha pull engine: catalog types, pull selection and the validated pull flow.

pub mod flow;
pub mod logic;
pub mod types;

pub use flow::*;
pub use logic::*;
pub use types::*;
