//! Shared tunables and random helpers.

pub mod constants;
pub mod rng;
