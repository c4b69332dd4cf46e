//! Integration test: Banner -> Pull -> Pity pipeline
//!
//! Drives the public gacha API the way a game server would: choose rarity,
//! resolve the item, honour hard pity and the 10-pull guarantee, then charge
//! currency and carry the pity counter forward.

use chrono::{Duration, Utc};
use gacha_arena::core::constants::{HARD_PITY, MULTI_PULL_SIZE};
use gacha_arena::error::GachaError;
use gacha_arena::gacha::{
    determine_item_type, determine_rarity, execute_pull, next_pity, perform_multi_pull,
    perform_single_pull, pull_cost, Banner, BannerCost, BannerType, BannerWindow, BaseStats,
    CatalogEntry, CharacterEntry, Currency, EquipmentEntry, EquipmentStats, FeaturedConfig,
    GachaPool, ItemCategory, ItemEntry, PetEntry, PityTrack, PullKind, Rarity, RarityRates,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn create_test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn item(id: &str, rarity: Rarity) -> ItemEntry {
    ItemEntry {
        id: id.to_string(),
        name: id.to_string(),
        rarity,
        effects: Vec::new(),
    }
}

fn character(id: &str, rarity: Rarity) -> CharacterEntry {
    CharacterEntry {
        id: id.to_string(),
        name: id.to_string(),
        rarity,
        base_stats: BaseStats {
            hp: 1000,
            attack: 100,
            defense: 50,
            speed: 100,
            crit_rate: 5.0,
            crit_damage: 150.0,
        },
        element: None,
        skill_ids: Vec::new(),
    }
}

/// One entry per category and tier, so every rarity is populated.
fn full_pool(rates: RarityRates) -> GachaPool {
    let mut pool = GachaPool::new(rates);
    pool.characters = vec![
        character("hero_ssr", Rarity::SSR),
        character("hero_ssr_2", Rarity::SSR),
        character("hero_sr", Rarity::SR),
    ];
    pool.pets = vec![PetEntry {
        id: "pet_sr".to_string(),
        name: "Fox".to_string(),
        rarity: Rarity::SR,
        bonuses: Vec::new(),
    }];
    pool.items = vec![item("potion", Rarity::R), item("stone", Rarity::R)];
    pool.equipment = vec![EquipmentEntry {
        id: "sword_r".to_string(),
        name: "Sword".to_string(),
        rarity: Rarity::R,
        slot: "weapon".to_string(),
        stats: EquipmentStats::default(),
    }];
    pool
}

fn banner(banner_type: BannerType) -> Banner {
    Banner {
        id: "banner".to_string(),
        name: "Banner".to_string(),
        banner_type,
        featured: FeaturedConfig::default(),
        cost: BannerCost {
            currency: Currency::Gems,
            amount: 160,
            multi_pull_discount: Some(0.1),
        },
        duration: None,
        is_active: true,
    }
}

// =========================================================================
// Rarity rates
// =========================================================================

#[test]
fn test_rates_converge_over_100k_pulls_with_pity_reset() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::default());
    let banner = banner(BannerType::Standard);
    let total = 100_000;
    let mut counts = [0u32; 3];
    let mut pity = 0;

    for _ in 0..total {
        let pulled = perform_single_pull(&pool, &banner, pity, &mut rng).unwrap();
        counts[pulled.rarity() as usize] += 1;
        pity = if pulled.rarity() == Rarity::SSR { 0 } else { pity + 1 };
    }

    for rarity in Rarity::ALL {
        let observed = counts[rarity as usize] as f64 / total as f64;
        let nominal = pool.rates.get(rarity);
        assert!(
            (observed - nominal).abs() < 0.01,
            "{rarity}: observed {observed:.4}, nominal {nominal:.4}"
        );
    }
}

#[test]
fn test_determine_rarity_boundaries() {
    let mut rng = create_test_rng();
    let only_r = RarityRates::new(1.0, 0.0, 0.0);
    let only_ssr = RarityRates::new(0.0, 0.0, 1.0);
    for _ in 0..1_000 {
        assert_eq!(determine_rarity(&only_r, &mut rng), Rarity::R);
        assert_eq!(determine_rarity(&only_ssr, &mut rng), Rarity::SSR);
    }
}

// =========================================================================
// Hard pity and the 10-pull guarantee
// =========================================================================

#[test]
fn test_hard_pity_ignores_rate_up() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(1.0, 0.0, 0.0));
    let mut banner = banner(BannerType::Limited);
    banner.featured = FeaturedConfig {
        items: vec!["hero_ssr".to_string()],
        rate_up: 1.0,
    };
    let others = (0..400)
        .filter(|_| {
            perform_single_pull(&pool, &banner, HARD_PITY, &mut rng)
                .map(|p| p.id() == "hero_ssr_2")
                .unwrap_or(false)
        })
        .count();
    assert!(others > 100, "pity picks among all SSRs, got {others} non-featured");
}

#[test]
fn test_single_pull_at_hard_pity_is_always_ssr() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(1.0, 0.0, 0.0));
    let banner = banner(BannerType::Standard);
    for pity in [HARD_PITY, HARD_PITY + 20] {
        for _ in 0..200 {
            let pulled = perform_single_pull(&pool, &banner, pity, &mut rng).unwrap();
            assert_eq!(pulled.rarity(), Rarity::SSR, "pity {pity} must force SSR");
        }
    }
}

#[test]
fn test_multi_pull_at_pity_95_forces_fifth_slot() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(1.0, 0.0, 0.0));
    let banner = banner(BannerType::Standard);

    for _ in 0..50 {
        let result = perform_multi_pull(&pool, &banner, 95, &mut rng).unwrap();
        assert_eq!(result.pulls.len(), MULTI_PULL_SIZE);
        assert_eq!(result.pulls[4].rarity(), Rarity::SSR);
        let ssr_count = result.pulls.iter().filter(|p| p.rarity() == Rarity::SSR).count();
        assert_eq!(ssr_count, 1);
        assert!(!result.guaranteed_sr, "SSR already satisfies the SR guarantee");
    }
}

#[test]
fn test_multi_pull_guarantees_sr_on_last_slot() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(1.0, 0.0, 0.0));
    let banner = banner(BannerType::Standard);

    let result = perform_multi_pull(&pool, &banner, 0, &mut rng).unwrap();
    assert!(result.guaranteed_sr);
    assert_eq!(result.pulls[MULTI_PULL_SIZE - 1].rarity(), Rarity::SR);
    assert!(result.pulls[..MULTI_PULL_SIZE - 1]
        .iter()
        .all(|p| p.rarity() == Rarity::R));
}

#[test]
fn test_multi_pull_guarantee_skipped_without_sr_items() {
    let mut rng = create_test_rng();
    let mut pool = GachaPool::new(RarityRates::new(1.0, 0.0, 0.0));
    pool.items = vec![item("potion", Rarity::R)];
    let result = perform_multi_pull(&pool, &banner(BannerType::Standard), 0, &mut rng).unwrap();
    assert!(!result.guaranteed_sr);
    assert!(result.pulls.iter().all(|p| p.rarity() == Rarity::R));
}

#[test]
fn test_every_multi_pull_contains_sr_or_better() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::default());
    let banner = banner(BannerType::Standard);
    for _ in 0..500 {
        let result = perform_multi_pull(&pool, &banner, 0, &mut rng).unwrap();
        assert!(result.pulls.iter().any(|p| p.rarity() >= Rarity::SR));
    }
}

// =========================================================================
// Empty tiers and pools
// =========================================================================

#[test]
fn test_empty_pool_is_an_error() {
    let mut rng = create_test_rng();
    let pool = GachaPool::default();
    let banner = banner(BannerType::Standard);
    assert_eq!(
        perform_single_pull(&pool, &banner, 0, &mut rng),
        Err(GachaError::EmptyPool)
    );
    assert_eq!(
        perform_multi_pull(&pool, &banner, 0, &mut rng).unwrap_err(),
        GachaError::EmptyPool
    );
}

#[test]
fn test_empty_tier_falls_back_to_populated_tier() {
    let mut rng = create_test_rng();
    let mut pool = GachaPool::new(RarityRates::new(0.0, 0.0, 1.0));
    pool.items = vec![item("potion", Rarity::R)];
    for _ in 0..100 {
        let pulled = perform_single_pull(&pool, &banner(BannerType::Standard), 0, &mut rng).unwrap();
        assert_eq!(pulled.id(), "potion");
    }
}

// =========================================================================
// Featured items and categories
// =========================================================================

#[test]
fn test_full_rate_up_always_picks_featured() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(0.0, 0.0, 1.0));
    let mut banner = banner(BannerType::Limited);
    banner.featured = FeaturedConfig {
        items: vec!["hero_ssr".to_string()],
        rate_up: 1.0,
    };
    for _ in 0..300 {
        let pulled = perform_single_pull(&pool, &banner, 0, &mut rng).unwrap();
        assert_eq!(pulled.id(), "hero_ssr");
    }
}

#[test]
fn test_featured_rate_up_split() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(0.0, 0.0, 1.0));
    let mut banner = banner(BannerType::Event);
    banner.featured = FeaturedConfig {
        items: vec!["hero_ssr".to_string()],
        rate_up: 0.5,
    };
    let trials = 4_000;
    let featured = (0..trials)
        .filter(|_| {
            perform_single_pull(&pool, &banner, 0, &mut rng)
                .map(|p| p.id() == "hero_ssr")
                .unwrap_or(false)
        })
        .count();
    // The non-featured half always lands on the other SSR
    let share = featured as f64 / trials as f64;
    assert!((share - 0.5).abs() < 0.05, "featured share {share:.3}");
}

#[test]
fn test_item_type_by_membership() {
    let pool = full_pool(RarityRates::default());
    let find = |id: &str| pool.find(id).unwrap();
    assert_eq!(determine_item_type(&pool, &find("hero_sr")), ItemCategory::Character);
    assert_eq!(determine_item_type(&pool, &find("pet_sr")), ItemCategory::Pet);
    assert_eq!(determine_item_type(&pool, &find("sword_r")), ItemCategory::Equipment);
    assert_eq!(determine_item_type(&pool, &find("potion")), ItemCategory::Item);

    let stranger = CatalogEntry::Item(item("not_in_pool", Rarity::R));
    assert_eq!(determine_item_type(&pool, &stranger), ItemCategory::Item);
}

#[test]
fn test_multi_pull_results_are_tagged() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::default());
    let result = perform_multi_pull(&pool, &banner(BannerType::Standard), 0, &mut rng).unwrap();
    for pull in &result.pulls {
        assert_eq!(pull.category, pull.item.category());
        assert!(!pull.is_featured);
    }
}

// =========================================================================
// Pull flow: cost, availability, pity carry
// =========================================================================

#[test]
fn test_pull_cost_applies_multi_discount() {
    let banner = banner(BannerType::Standard);
    assert_eq!(pull_cost(&banner, PullKind::Single), 160);
    assert_eq!(pull_cost(&banner, PullKind::Multi), 1_440);
}

#[test]
fn test_execute_pull_rejects_poor_players() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::default());
    let result = execute_pull(
        &pool,
        &banner(BannerType::Standard),
        PullKind::Multi,
        1_000,
        0,
        Utc::now(),
        &mut rng,
    );
    assert_eq!(
        result.unwrap_err(),
        GachaError::InsufficientCurrency {
            required: 1_440,
            available: 1_000
        }
    );
}

#[test]
fn test_execute_pull_rejects_expired_banner() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::default());
    let now = Utc::now();
    let mut banner = banner(BannerType::Event);
    banner.duration = Some(BannerWindow {
        start: now - Duration::days(14),
        end: now - Duration::days(7),
    });
    let result = execute_pull(&pool, &banner, PullKind::Single, 10_000, 0, now, &mut rng);
    assert_eq!(
        result.unwrap_err(),
        GachaError::InactiveBanner("banner".to_string())
    );
}

#[test]
fn test_execute_pull_carries_pity() {
    let mut rng = create_test_rng();
    let pool = full_pool(RarityRates::new(1.0, 0.0, 0.0));
    let banner = banner(BannerType::Limited);

    let first = execute_pull(&pool, &banner, PullKind::Multi, 5_000, 0, Utc::now(), &mut rng).unwrap();
    assert_eq!(first.cost, 1_440);
    assert_eq!(first.new_pity, 10);
    assert_eq!(first.track, PityTrack::Event);

    let forced = execute_pull(&pool, &banner, PullKind::Single, 5_000, HARD_PITY, Utc::now(), &mut rng)
        .unwrap();
    assert_eq!(forced.pulls[0].rarity(), Rarity::SSR);
    assert_eq!(forced.new_pity, 0);
    assert_eq!(next_pity(HARD_PITY, &first.pulls), HARD_PITY);
}
