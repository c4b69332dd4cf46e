//! Battle reward calculation.
//!
//! Pure apart from the random source: the same session, statistics and
//! context always produce the same experience and coins, while drops are
//! independent trials per call.

use rand::Rng;
use tracing::debug;

use super::drops::{roll_equipment_drops, roll_item_drops, roll_rare_drops};
use super::types::{Difficulty, RewardBundle, RewardContext};
use crate::battle::engine::derive_outcome;
use crate::battle::types::{BattleOutcome, BattleSession, CombatStatistics, Combatant};
use crate::core::constants::{
    COINS_HP_DIVISOR, COINS_PER_ENEMY_LEVEL, CRIT_COUNT_BONUS, CRIT_COUNT_THRESHOLD,
    DAMAGE_RATIO_BONUS, DAMAGE_RATIO_THRESHOLD, FAST_CLEAR_BONUS, FAST_CLEAR_TURN_FRACTION,
    HEALTHY_FINISH_BONUS, HEALTHY_FINISH_THRESHOLD, PERFORMANCE_MULTIPLIER_CAP,
    XP_HP_DIVISOR, XP_PER_ENEMY_LEVEL,
};

pub fn defeated_enemies(session: &BattleSession) -> Vec<&Combatant> {
    session.enemies().filter(|c| !c.is_alive()).collect()
}

/// Experience and coins before the performance multiplier, summed over
/// defeated enemies and scaled by difficulty.
pub fn base_rewards(defeated: &[&Combatant], difficulty: Difficulty) -> (f64, f64) {
    let (xp, coins) = defeated.iter().fold((0u64, 0u64), |(xp, coins), enemy| {
        let level = enemy.level as u64;
        let max_hp = enemy.stats.max_hp as u64;
        (
            xp + level * XP_PER_ENEMY_LEVEL + max_hp / XP_HP_DIVISOR,
            coins + level * COINS_PER_ENEMY_LEVEL + max_hp / COINS_HP_DIVISOR,
        )
    });
    (
        xp as f64 * difficulty.xp_multiplier(),
        coins as f64 * difficulty.coin_multiplier(),
    )
}

pub fn is_fast_clear(stats: &CombatStatistics, max_turns: u32) -> bool {
    stats.turns_taken as f64 <= max_turns as f64 * FAST_CLEAR_TURN_FRACTION
}

/// Mean hp fraction over the player side at the end of the battle.
pub fn average_player_health(session: &BattleSession) -> f64 {
    let fractions: Vec<f64> = session.players().map(Combatant::hp_fraction).collect();
    if fractions.is_empty() {
        return 0.0;
    }
    fractions.iter().sum::<f64>() / fractions.len() as f64
}

/// `1.0` plus stacked bonuses, capped at `PERFORMANCE_MULTIPLIER_CAP`.
pub fn calculate_performance_multiplier(
    session: &BattleSession,
    stats: &CombatStatistics,
    max_turns: u32,
) -> f64 {
    let mut multiplier = 1.0;

    if is_fast_clear(stats, max_turns) {
        multiplier += FAST_CLEAR_BONUS;
    }
    if average_player_health(session) > HEALTHY_FINISH_THRESHOLD {
        multiplier += HEALTHY_FINISH_BONUS;
    }
    if stats.critical_hits >= CRIT_COUNT_THRESHOLD {
        multiplier += CRIT_COUNT_BONUS;
    }

    // No damage taken counts as an unbounded ratio
    let dominant = if stats.damage_taken == 0 {
        stats.damage_dealt > 0
    } else {
        stats.damage_dealt as f64 / stats.damage_taken as f64 > DAMAGE_RATIO_THRESHOLD
    };
    if dominant {
        multiplier += DAMAGE_RATIO_BONUS;
    }

    f64::min(multiplier, PERFORMANCE_MULTIPLIER_CAP)
}

/// Converts a finished battle into a reward bundle.
///
/// Experience and coins come from defeated enemies whatever the outcome;
/// item, equipment and rare drops are only rolled on a victory.
pub fn calculate_battle_rewards(
    session: &BattleSession,
    stats: &CombatStatistics,
    context: &RewardContext,
    rng: &mut impl Rng,
) -> RewardBundle {
    let outcome = derive_outcome(session);
    let defeated = defeated_enemies(session);
    let performance = calculate_performance_multiplier(session, stats, context.max_turns);
    let (base_xp, base_coins) = base_rewards(&defeated, context.difficulty);

    let (items, equipment, rare_drops) = if outcome == BattleOutcome::Victory {
        (
            roll_item_drops(&defeated, context.difficulty, performance, rng),
            roll_equipment_drops(&defeated, context.difficulty, rng),
            roll_rare_drops(
                outcome,
                stats,
                context,
                is_fast_clear(stats, context.max_turns),
                rng,
            ),
        )
    } else {
        (Vec::new(), Vec::new(), Vec::new())
    };

    let bundle = RewardBundle {
        outcome,
        experience: (base_xp * performance).round() as u64,
        coins: (base_coins * performance).round() as u64,
        items,
        equipment,
        rare_drops,
        performance_multiplier: performance,
    };
    debug!(
        battle = %session.id,
        ?outcome,
        experience = bundle.experience,
        coins = bundle.coins,
        drops = bundle.items.len() + bundle.equipment.len() + bundle.rare_drops.len(),
        "rewards calculated"
    );
    bundle
}
