//! Main simulation runner.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::battle_sim::simulate_battle;
use super::config::SimConfig;
use super::gacha_sim::simulate_pulls;
use super::report::SimReport;
use crate::battle::types::{Combatant, CombatantStats, EffectKind, Skill, StatusEffect};
use crate::config::GameData;
use crate::error::{GachaError, SimError};
use crate::gacha::types::{
    Banner, BannerCost, BannerType, BaseStats, CharacterEntry, Currency, EquipmentEntry,
    EquipmentStats, FeaturedConfig, GachaPool, ItemEntry, PetEntry, Rarity, RarityRates,
};
use crate::rewards::types::{BattleType, RewardContext};

fn rng_for(seed: Option<u64>, offset: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(offset)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Run pulls against `banner_id` (or the first banner) and the configured
/// number of auto-battles, returning a combined report.
pub fn run_simulation(
    config: &SimConfig,
    data: &GameData,
    banner_id: Option<&str>,
) -> Result<SimReport, SimError> {
    let mut report = SimReport {
        nominal_rates: data.pool.rates,
        ..Default::default()
    };

    if config.pulls > 0 {
        let banner = match banner_id {
            Some(id) => data.banner(id)?,
            None => data
                .banners
                .first()
                .ok_or_else(|| GachaError::NotFound("no banners configured".to_string()))?,
        };
        let mut rng = rng_for(config.seed, 0);
        report.gacha = Some(simulate_pulls(&data.pool, banner, config, &mut rng)?);
        info!(banner = %banner.id, pulls = config.pulls, multi = config.multi, "pull simulation done");
    }

    let context = RewardContext::new(config.difficulty, BattleType::Normal);
    for battle_idx in 0..config.battles {
        let mut rng = rng_for(config.seed, battle_idx as u64 + 1);
        let result = simulate_battle(
            sample_party(),
            sample_enemies(),
            &context,
            config.max_actions_per_battle,
            &mut rng,
        )?;

        if config.verbosity >= 2 {
            println!(
                "Battle {}/{} - {:?} in {} actions, {} xp, {} coins",
                battle_idx + 1,
                config.battles,
                result.outcome,
                result.actions,
                result.rewards.experience,
                result.rewards.coins
            );
        }
        report.battles.push(result);
    }

    Ok(report)
}

fn character(id: &str, name: &str, rarity: Rarity, hp: u32, attack: u32) -> CharacterEntry {
    CharacterEntry {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        base_stats: BaseStats {
            hp,
            attack,
            defense: attack / 2,
            speed: 100,
            crit_rate: 5.0,
            crit_damage: 150.0,
        },
        element: None,
        skill_ids: Vec::new(),
    }
}

fn item(id: &str, name: &str, rarity: Rarity) -> ItemEntry {
    ItemEntry {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        effects: Vec::new(),
    }
}

/// Built-in catalog used when no data file is given.
pub fn sample_game_data() -> GameData {
    let pool = GachaPool {
        rates: RarityRates::default(),
        characters: vec![
            character("aria", "Aria", Rarity::SSR, 1_200, 150),
            character("brom", "Brom", Rarity::SR, 1_000, 110),
            character("cael", "Cael", Rarity::R, 800, 80),
        ],
        pets: vec![PetEntry {
            id: "ember_fox".to_string(),
            name: "Ember Fox".to_string(),
            rarity: Rarity::SR,
            bonuses: Vec::new(),
        }],
        items: vec![
            item("health_potion", "Health Potion", Rarity::R),
            item("upgrade_stone", "Upgrade Stone", Rarity::R),
            item("phoenix_feather", "Phoenix Feather", Rarity::SSR),
        ],
        equipment: vec![EquipmentEntry {
            id: "iron_sword".to_string(),
            name: "Iron Sword".to_string(),
            rarity: Rarity::R,
            slot: "weapon".to_string(),
            stats: EquipmentStats {
                attack: 12,
                ..Default::default()
            },
        }],
    };
    let banners = vec![
        Banner {
            id: "standard".to_string(),
            name: "Standard Summon".to_string(),
            banner_type: BannerType::Standard,
            featured: FeaturedConfig::default(),
            cost: BannerCost {
                currency: Currency::Gems,
                amount: 160,
                multi_pull_discount: Some(0.1),
            },
            duration: None,
            is_active: true,
        },
        Banner {
            id: "aria_rate_up".to_string(),
            name: "Aria Rate Up".to_string(),
            banner_type: BannerType::Limited,
            featured: FeaturedConfig {
                items: vec!["aria".to_string()],
                rate_up: 0.5,
            },
            cost: BannerCost {
                currency: Currency::Gems,
                amount: 160,
                multi_pull_discount: Some(0.1),
            },
            duration: None,
            is_active: true,
        },
    ];
    GameData { pool, banners }
}

/// Two-member party used by the battle simulation.
pub fn sample_party() -> Vec<Combatant> {
    let guard = StatusEffect {
        name: "Guard Break".to_string(),
        kind: EffectKind::Debuff,
        duration: 2,
        value: 10.0,
    };
    let mut shatter = Skill::damaging("shatter", "Shatter", 60.0, 30);
    shatter.status_effects.push(guard);

    vec![
        Combatant::new(
            "aria",
            "Aria",
            20,
            CombatantStats::new(1_200, 150, 75, 100).with_crit(15.0, 160.0),
            true,
        )
        .with_skills(vec![shatter]),
        Combatant::new(
            "brom",
            "Brom",
            20,
            CombatantStats::new(1_000, 110, 55, 90).with_crit(5.0, 150.0),
            true,
        )
        .with_skills(vec![Skill::damaging("cleave", "Cleave", 40.0, 20)]),
    ]
}

/// Mixed enemy group used by the battle simulation.
pub fn sample_enemies() -> Vec<Combatant> {
    vec![
        Combatant::new("goblin_1", "Goblin Archer", 15, CombatantStats::new(600, 90, 40, 95), false),
        Combatant::new("slime_1", "Green Slime", 12, CombatantStats::new(500, 70, 30, 60), false),
        Combatant::new("orc_1", "Orc Warrior", 18, CombatantStats::new(900, 120, 60, 70), false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_is_valid() {
        let data = sample_game_data().validated().unwrap();
        assert_eq!(data.banners.len(), 2);
        assert!(data.pool.has_rarity(Rarity::SSR));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SimConfig {
            pulls: 500,
            battles: 3,
            seed: Some(99),
            verbosity: 0,
            ..Default::default()
        };
        let data = sample_game_data();
        let a = run_simulation(&config, &data, None).unwrap();
        let b = run_simulation(&config, &data, None).unwrap();
        assert_eq!(a.gacha.unwrap().by_rarity, b.gacha.unwrap().by_rarity);
        let outcomes_a: Vec<_> = a.battles.iter().map(|r| (r.outcome, r.actions)).collect();
        let outcomes_b: Vec<_> = b.battles.iter().map(|r| (r.outcome, r.actions)).collect();
        assert_eq!(outcomes_a, outcomes_b);
    }

    #[test]
    fn test_unknown_banner_is_an_error() {
        let config = SimConfig::rate_check(10);
        let result = run_simulation(&config, &sample_game_data(), Some("missing"));
        assert!(matches!(result, Err(SimError::Gacha(GachaError::NotFound(_)))));
    }
}
