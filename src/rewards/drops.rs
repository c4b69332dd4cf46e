use rand::Rng;

use super::types::{BattleType, Difficulty, RewardContext};
use crate::battle::types::{BattleOutcome, CombatStatistics, Combatant};
use crate::core::constants::{
    BOSS_CORE_DROP, CRITICAL_ESSENCE_DROP, CRITICAL_ESSENCE_MIN_CRITS, ENEMY_BONUS_DROPS,
    EQUIPMENT_DROP_BASE_CHANCE, EQUIPMENT_DROP_MAX_CHANCE, EQUIPMENT_FALLBACK_TYPES,
    EQUIPMENT_HIGH_LEVEL_SHIFT, EQUIPMENT_HIGH_LEVEL_THRESHOLD, EQUIPMENT_KEYWORD_TYPES,
    ITEM_DROP_MAX_CHANCE, ITEM_DROP_TABLE, PERFECT_VICTORY_DROP,
};
use crate::core::rng::{pick_uniform, pick_weighted, roll_chance};
use crate::gacha::types::Rarity;

fn push_unique(drops: &mut Vec<String>, id: &str) {
    if !drops.iter().any(|d| d == id) {
        drops.push(id.to_string());
    }
}

pub fn item_drop_chance(base: f64, difficulty: Difficulty, performance: f64) -> f64 {
    (base * difficulty.item_drop_multiplier() * performance).min(ITEM_DROP_MAX_CHANCE)
}

/// One trial per table entry, then enemy-name bonus trials. Duplicates are
/// dropped.
pub fn roll_item_drops(
    defeated: &[&Combatant],
    difficulty: Difficulty,
    performance: f64,
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut drops = Vec::new();

    for (item, base) in ITEM_DROP_TABLE {
        if roll_chance(item_drop_chance(base, difficulty, performance), rng) {
            push_unique(&mut drops, item);
        }
    }

    for enemy in defeated {
        let name = enemy.name.to_lowercase();
        for (keyword, item, chance) in ENEMY_BONUS_DROPS {
            if name.contains(keyword) && roll_chance(chance, rng) {
                push_unique(&mut drops, item);
            }
        }
    }

    drops
}

pub fn equipment_drop_chance(difficulty: Difficulty) -> f64 {
    (EQUIPMENT_DROP_BASE_CHANCE * difficulty.equipment_drop_multiplier())
        .min(EQUIPMENT_DROP_MAX_CHANCE)
}

/// Rarity weights for one drop, shifted upward for high level enemies.
pub fn equipment_rarity_weights(difficulty: Difficulty, enemy_level: u32) -> [u32; 3] {
    let [mut r, mut sr, mut ssr] = difficulty.equipment_rarity_weights();
    if enemy_level >= EQUIPMENT_HIGH_LEVEL_THRESHOLD {
        let (to_sr, to_ssr) = EQUIPMENT_HIGH_LEVEL_SHIFT;
        r = r.saturating_sub(to_sr + to_ssr);
        sr += to_sr;
        ssr += to_ssr;
    }
    [r, sr, ssr]
}

pub fn roll_equipment_rarity(difficulty: Difficulty, enemy_level: u32, rng: &mut impl Rng) -> Rarity {
    let weights = equipment_rarity_weights(difficulty, enemy_level);
    match pick_weighted(&weights, rng) {
        Some(2) => Rarity::SSR,
        Some(1) => Rarity::SR,
        _ => Rarity::R,
    }
}

/// Equipment kind from the enemy's name, or a random generic kind.
pub fn equipment_type_for(enemy_name: &str, rng: &mut impl Rng) -> &'static str {
    let name = enemy_name.to_lowercase();
    EQUIPMENT_KEYWORD_TYPES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, kind)| *kind)
        .or_else(|| pick_uniform(&EQUIPMENT_FALLBACK_TYPES, rng).copied())
        .unwrap_or("sword")
}

/// One trial per defeated enemy. Ids look like `sr_sword`.
pub fn roll_equipment_drops(
    defeated: &[&Combatant],
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Vec<String> {
    let chance = equipment_drop_chance(difficulty);
    let mut drops = Vec::new();
    for enemy in defeated {
        if !roll_chance(chance, rng) {
            continue;
        }
        let rarity = roll_equipment_rarity(difficulty, enemy.level, rng);
        let kind = equipment_type_for(&enemy.name, rng);
        drops.push(format!("{}_{}", rarity.name().to_lowercase(), kind));
    }
    drops
}

pub fn roll_rare_drops(
    outcome: BattleOutcome,
    stats: &CombatStatistics,
    context: &RewardContext,
    fast_clear: bool,
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut drops = Vec::new();

    let perfect = outcome == BattleOutcome::Victory && stats.damage_taken == 0;
    if perfect && fast_clear && roll_chance(PERFECT_VICTORY_DROP.1, rng) {
        push_unique(&mut drops, PERFECT_VICTORY_DROP.0);
    }
    if context.battle_type == BattleType::Boss && roll_chance(BOSS_CORE_DROP.1, rng) {
        push_unique(&mut drops, BOSS_CORE_DROP.0);
    }
    if stats.critical_hits >= CRITICAL_ESSENCE_MIN_CRITS && roll_chance(CRITICAL_ESSENCE_DROP.1, rng)
    {
        push_unique(&mut drops, CRITICAL_ESSENCE_DROP.0);
    }

    drops
}
