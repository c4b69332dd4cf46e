//! Error types surfaced by the gacha engine, the battle engine and the
//! configuration loader.

use thiserror::Error;

/// Errors raised by pull selection and the pull flow around it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GachaError {
    #[error("gacha pool has no items")]
    EmptyPool,

    #[error("banner {0} is not active")]
    InactiveBanner(String),

    #[error("insufficient currency: need {required}, have {available}")]
    InsufficientCurrency { required: u64, available: u64 },

    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors raised while creating or advancing a battle session.
///
/// Every variant is returned before the session is touched, so a failed call
/// never leaves a partially applied action behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("battle session not found: {0}")]
    NotFound(String),

    #[error("not {actual}'s turn, waiting on {expected}")]
    IllegalTurn { expected: String, actual: String },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("skill not found: {0}")]
    SkillNotFound(String),

    #[error("insufficient energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("battle {0} is already completed")]
    BattleCompleted(String),

    #[error("session store lock was poisoned")]
    StorePoisoned,
}

/// Errors raised while loading catalog and banner data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rarity rates: {0}")]
    InvalidRates(String),

    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),

    #[error("banner {banner} features unknown item {item}")]
    UnknownFeatured { banner: String, item: String },

    #[error("banner {banner} ends before it starts")]
    InvalidWindow { banner: String },
}

/// Errors surfaced by a simulation run, which drives all three engines.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Gacha(#[from] GachaError),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
