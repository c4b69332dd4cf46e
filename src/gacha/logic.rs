//! Pull selection: rarity odds, banner rate-up and pity guarantees.
//!
//! Everything here is pure apart from the injected random source. Callers
//! own currency, inventory and the pity counter; see `gacha::flow` for the
//! validated round trip.

use rand::Rng;
use tracing::{debug, warn};

use super::types::{
    Banner, CatalogEntry, GachaPool, ItemCategory, MultiPullResult, PullResult, Rarity,
    RarityRates,
};
use crate::core::constants::{HARD_PITY, MULTI_PULL_SIZE};
use crate::core::rng::{pick_uniform, roll_unit};
use crate::error::GachaError;

type Result<T> = std::result::Result<T, GachaError>;

/// Draws a tier from the cumulative table `R`, `R + SR`, then `SSR`.
///
/// The table is not normalized here: a table summing below 1 sends the
/// remainder to SSR. `config::GameData` normalizes pools at load time.
pub fn determine_rarity(rates: &RarityRates, rng: &mut impl Rng) -> Rarity {
    let roll = roll_unit(rng);
    if roll < rates.r {
        Rarity::R
    } else if roll < rates.r + rates.sr {
        Rarity::SR
    } else {
        Rarity::SSR
    }
}

/// Uniform pick among every entry of one rarity. `None` if the tier is empty.
pub fn pick_of_rarity(pool: &GachaPool, rarity: Rarity, rng: &mut impl Rng) -> Option<CatalogEntry> {
    let candidates = pool.entries_of_rarity(rarity);
    pick_uniform(&candidates, rng).cloned()
}

/// Performs one pull honouring hard pity.
pub fn perform_single_pull(
    pool: &GachaPool,
    banner: &Banner,
    pity_count: u32,
    rng: &mut impl Rng,
) -> Result<CatalogEntry> {
    pull_once(pool, banner, pity_count, false, rng)
}

/// One pull. With `ignore_pity_guarantee` the hard pity check is skipped,
/// which multi-pulls use because they place the guarantee themselves.
pub fn pull_once(
    pool: &GachaPool,
    banner: &Banner,
    pity_count: u32,
    ignore_pity_guarantee: bool,
    rng: &mut impl Rng,
) -> Result<CatalogEntry> {
    if pool.is_empty() {
        return Err(GachaError::EmptyPool);
    }

    if !ignore_pity_guarantee && pity_count >= HARD_PITY {
        if let Some(item) = pick_of_rarity(pool, Rarity::SSR, rng) {
            debug!(pity_count, item = item.id(), "hard pity forced SSR");
            return Ok(item);
        }
        warn!(pity_count, "hard pity reached but pool has no SSR items");
    }

    let drawn = determine_rarity(&pool.rates, rng);

    // Empty tiers fall through to the nearest populated tier.
    let Some((used, candidates)) = drawn
        .fallback_order()
        .into_iter()
        .map(|rarity| (rarity, pool.entries_of_rarity(rarity)))
        .find(|(_, entries)| !entries.is_empty())
    else {
        return Err(GachaError::EmptyPool);
    };
    if used != drawn {
        warn!(drawn = %drawn, used = %used, "drawn rarity tier is empty");
    }

    let (featured, non_featured): (Vec<&CatalogEntry>, Vec<&CatalogEntry>) =
        candidates.iter().partition(|entry| banner.features(entry.id()));

    let use_featured = roll_unit(rng) < banner.featured.rate_up;
    let partition = if use_featured { &featured } else { &non_featured };

    let chosen = match pick_uniform(partition, rng) {
        Some(entry) => (*entry).clone(),
        None => pick_uniform(&candidates, rng)
            .cloned()
            .ok_or(GachaError::EmptyPool)?,
    };

    debug!(
        rarity = %chosen.rarity(),
        item = chosen.id(),
        featured = banner.features(chosen.id()),
        "pull resolved"
    );
    Ok(chosen)
}

/// Ten pulls with the batch-level pity placement and the SR-or-better
/// guarantee on the last slot.
pub fn perform_multi_pull(
    pool: &GachaPool,
    banner: &Banner,
    pity_count: u32,
    rng: &mut impl Rng,
) -> Result<MultiPullResult> {
    if pool.is_empty() {
        return Err(GachaError::EmptyPool);
    }

    // First slot whose running count reaches hard pity: 95 forces slot 4.
    let forced_ssr_index = (0..MULTI_PULL_SIZE)
        .find(|&i| pity_count.saturating_add(i as u32 + 1) >= HARD_PITY);

    let mut pulls = Vec::with_capacity(MULTI_PULL_SIZE);
    let mut got_ssr = false;
    let mut got_sr_or_better = false;

    for i in 0..MULTI_PULL_SIZE {
        let item = if Some(i) == forced_ssr_index && !got_ssr {
            match pick_of_rarity(pool, Rarity::SSR, rng) {
                Some(item) => {
                    debug!(index = i, item = item.id(), "batch pity forced SSR");
                    item
                }
                None => {
                    warn!(index = i, "batch pity slot reached but pool has no SSR items");
                    pull_once(pool, banner, pity_count, true, rng)?
                }
            }
        } else {
            pull_once(pool, banner, pity_count, true, rng)?
        };

        got_ssr |= item.rarity() == Rarity::SSR;
        got_sr_or_better |= item.rarity() >= Rarity::SR;
        pulls.push(tag_pull(pool, banner, item));
    }

    let mut guaranteed_sr = false;
    if !got_sr_or_better {
        match pick_of_rarity(pool, Rarity::SR, rng) {
            Some(item) => {
                debug!(item = item.id(), "soft guarantee replaced last pull with SR");
                if let Some(last) = pulls.last_mut() {
                    *last = tag_pull(pool, banner, item);
                }
                guaranteed_sr = true;
            }
            None => warn!("soft guarantee skipped: pool has no SR items"),
        }
    }

    Ok(MultiPullResult {
        pulls,
        guaranteed_sr,
    })
}

/// Resolves an entry's category by id membership, checked in the order
/// character, pet, equipment, with item as the default.
pub fn determine_item_type(pool: &GachaPool, item: &CatalogEntry) -> ItemCategory {
    let id = item.id();
    if pool.characters.iter().any(|c| c.id == id) {
        ItemCategory::Character
    } else if pool.pets.iter().any(|p| p.id == id) {
        ItemCategory::Pet
    } else if pool.equipment.iter().any(|e| e.id == id) {
        ItemCategory::Equipment
    } else {
        ItemCategory::Item
    }
}

pub fn tag_pull(pool: &GachaPool, banner: &Banner, item: CatalogEntry) -> PullResult {
    let category = determine_item_type(pool, &item);
    let is_featured = banner.features(item.id());
    PullResult {
        item,
        category,
        is_featured,
    }
}
