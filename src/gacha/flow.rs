//! Validated pull round trip: banner availability, cost, selection and the
//! updated pity counter the caller should persist.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::logic::{perform_multi_pull, perform_single_pull, tag_pull};
use super::types::{Banner, GachaPool, PityTrack, PullResult, Rarity};
use crate::core::constants::{HARD_PITY, MULTI_PULL_SIZE};
use crate::error::GachaError;

type Result<T> = std::result::Result<T, GachaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullKind {
    Single,
    Multi,
}

impl PullKind {
    pub fn count(&self) -> usize {
        match self {
            PullKind::Single => 1,
            PullKind::Multi => MULTI_PULL_SIZE,
        }
    }
}

/// Everything the caller needs to persist after a pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullOutcome {
    pub pulls: Vec<PullResult>,
    pub guaranteed_sr: bool,
    pub cost: u64,
    pub track: PityTrack,
    pub new_pity: u32,
}

/// Currency charged for a pull. Multi-pull cost is ten singles minus the
/// banner discount, rounded to the nearest unit.
pub fn pull_cost(banner: &Banner, kind: PullKind) -> u64 {
    match kind {
        PullKind::Single => banner.cost.amount,
        PullKind::Multi => {
            let discount = banner
                .cost
                .multi_pull_discount
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);
            let full = banner.cost.amount as f64 * MULTI_PULL_SIZE as f64;
            (full * (1.0 - discount)).round() as u64
        }
    }
}

/// Rejects a pull against an unavailable banner or an insufficient balance.
/// Returns the cost on success.
pub fn validate_pull(
    banner: &Banner,
    kind: PullKind,
    balance: u64,
    now: DateTime<Utc>,
) -> Result<u64> {
    if !banner.is_available(now) {
        return Err(GachaError::InactiveBanner(banner.id.clone()));
    }
    let required = pull_cost(banner, kind);
    if balance < required {
        return Err(GachaError::InsufficientCurrency {
            required,
            available: balance,
        });
    }
    Ok(required)
}

/// Pity after a batch: reset when the batch held an SSR, otherwise advanced
/// by the batch size and held at the hard pity ceiling.
pub fn next_pity(pity_count: u32, pulls: &[PullResult]) -> u32 {
    if pulls.iter().any(|p| p.rarity() == Rarity::SSR) {
        0
    } else {
        pity_count
            .saturating_add(pulls.len() as u32)
            .min(HARD_PITY)
    }
}

/// Validate, pull and report cost plus the new pity value.
pub fn execute_pull(
    pool: &GachaPool,
    banner: &Banner,
    kind: PullKind,
    balance: u64,
    pity_count: u32,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<PullOutcome> {
    let cost = validate_pull(banner, kind, balance, now)?;

    let (pulls, guaranteed_sr) = match kind {
        PullKind::Single => {
            let item = perform_single_pull(pool, banner, pity_count, rng)?;
            (vec![tag_pull(pool, banner, item)], false)
        }
        PullKind::Multi => {
            let result = perform_multi_pull(pool, banner, pity_count, rng)?;
            (result.pulls, result.guaranteed_sr)
        }
    };

    let new_pity = next_pity(pity_count, &pulls);
    info!(
        banner = %banner.id,
        pulls = pulls.len(),
        cost,
        pity_before = pity_count,
        pity_after = new_pity,
        "pull executed"
    );

    Ok(PullOutcome {
        pulls,
        guaranteed_sr,
        cost,
        track: banner.pity_track(),
        new_pity,
    })
}
