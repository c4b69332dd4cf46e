//! Monte Carlo pull simulation using the real pull logic.

use rand::Rng;

use crate::core::constants::{HARD_PITY, MULTI_PULL_SIZE};
use crate::error::GachaError;
use crate::gacha::flow::next_pity;
use crate::gacha::logic::{perform_multi_pull, perform_single_pull, tag_pull};
use crate::gacha::types::{Banner, GachaPool, PullResult, Rarity};

use super::config::SimConfig;

/// Statistics about a run of pulls.
#[derive(Debug, Clone, Default)]
pub struct GachaSimReport {
    pub total_pulls: u64,
    /// Counts indexed by `Rarity as usize`.
    pub by_rarity: [u64; 3],
    pub featured_pulls: u64,
    pub hard_pity_hits: u64,
    pub soft_guarantee_hits: u64,
    /// Longest streak without an SSR.
    pub longest_dry_streak: u32,
    pub final_pity: u32,
}

impl GachaSimReport {
    fn record(&mut self, pull: &PullResult) {
        self.total_pulls += 1;
        self.by_rarity[pull.rarity() as usize] += 1;
        if pull.is_featured {
            self.featured_pulls += 1;
        }
    }

    pub fn count(&self, rarity: Rarity) -> u64 {
        self.by_rarity[rarity as usize]
    }

    /// Observed share of pulls at `rarity`.
    pub fn frequency(&self, rarity: Rarity) -> f64 {
        if self.total_pulls == 0 {
            0.0
        } else {
            self.count(rarity) as f64 / self.total_pulls as f64
        }
    }
}

/// Whether a batch drawn at `pity_count` got its SSR from the pity slot
/// rather than naturally before it.
fn batch_hit_pity(pity_count: u32, pulls: &[PullResult]) -> bool {
    let forced = (0..MULTI_PULL_SIZE).find(|&i| pity_count.saturating_add(i as u32 + 1) >= HARD_PITY);
    match forced {
        Some(index) => pulls
            .iter()
            .take(index)
            .all(|p| p.rarity() != Rarity::SSR),
        None => false,
    }
}

/// Runs `config.pulls` pulls, carrying pity between pulls and resetting it
/// after every SSR the way real play does.
pub fn simulate_pulls(
    pool: &GachaPool,
    banner: &Banner,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<GachaSimReport, GachaError> {
    let mut report = GachaSimReport::default();
    let mut pity = config.starting_pity;
    let mut dry_streak = pity;

    let mut track_streak = |report: &mut GachaSimReport, pulls: &[PullResult]| {
        for pull in pulls {
            if pull.rarity() == Rarity::SSR {
                dry_streak = 0;
            } else {
                dry_streak += 1;
                report.longest_dry_streak = report.longest_dry_streak.max(dry_streak);
            }
        }
    };

    if config.multi {
        let batches = (config.pulls as usize).div_ceil(MULTI_PULL_SIZE);
        for _ in 0..batches {
            let result = perform_multi_pull(pool, banner, pity, rng)?;
            if batch_hit_pity(pity, &result.pulls) {
                report.hard_pity_hits += 1;
            }
            if result.guaranteed_sr {
                report.soft_guarantee_hits += 1;
            }
            result.pulls.iter().for_each(|p| report.record(p));
            track_streak(&mut report, &result.pulls);
            pity = next_pity(pity, &result.pulls);
        }
    } else {
        for _ in 0..config.pulls {
            if pity >= HARD_PITY {
                report.hard_pity_hits += 1;
            }
            let item = perform_single_pull(pool, banner, pity, rng)?;
            let pulls = [tag_pull(pool, banner, item)];
            report.record(&pulls[0]);
            track_streak(&mut report, &pulls);
            pity = next_pity(pity, &pulls);
        }
    }

    report.final_pity = pity;
    Ok(report)
}
