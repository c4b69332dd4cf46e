//! Auto-battle simulation driving the real battle engine.

use rand::Rng;
use tracing::debug;

use crate::battle::engine::BattleEngine;
use crate::battle::types::{BattleAction, BattleOutcome, BattleSession, CombatStatistics, Combatant};
use crate::error::BattleError;
use crate::rewards::logic::calculate_battle_rewards;
use crate::rewards::types::{RewardBundle, RewardContext};

/// Result of one simulated battle.
#[derive(Debug, Clone)]
pub struct BattleSimReport {
    pub outcome: BattleOutcome,
    pub actions: u32,
    /// True when the action cap closed the battle before either side fell.
    pub timed_out: bool,
    pub statistics: CombatStatistics,
    pub rewards: RewardBundle,
    pub log: Vec<String>,
}

/// Picks the current actor's move: the first affordable damage skill on every
/// living opponent, otherwise a basic attack on the weakest opponent.
pub fn choose_action(session: &BattleSession) -> Option<BattleAction> {
    let actor = session.combatant(session.current_actor_id()?)?;
    let opponents: Vec<&Combatant> = session
        .characters
        .iter()
        .filter(|c| c.is_player != actor.is_player && c.is_alive())
        .collect();

    let skill = actor
        .skills
        .iter()
        .find(|s| s.damage.is_some() && s.energy_cost <= actor.current_energy);
    if let Some(skill) = skill {
        let targets: Vec<&str> = opponents.iter().map(|c| c.id.as_str()).collect();
        if !targets.is_empty() {
            return Some(BattleAction::skill(&actor.id, &targets, &skill.id));
        }
    }

    let weakest = opponents.iter().min_by_key(|c| c.stats.hp)?;
    Some(BattleAction::basic_attack(&actor.id, &weakest.id))
}

/// Runs one battle to completion (or the action cap) and computes rewards.
pub fn simulate_battle(
    players: Vec<Combatant>,
    enemies: Vec<Combatant>,
    context: &RewardContext,
    max_actions: u32,
    rng: &mut impl Rng,
) -> Result<BattleSimReport, BattleError> {
    let engine = BattleEngine::in_memory();
    let session = engine.create_battle(players, enemies)?;
    let id = session.id;

    let mut actions = 0;
    while actions < max_actions {
        let state = engine.get_battle_state(&id)?;
        if state.is_completed() {
            break;
        }
        let Some(action) = choose_action(&state) else {
            break;
        };
        engine.perform_action(&id, &action, rng)?;
        actions += 1;
    }

    let timed_out = !engine.get_battle_state(&id)?.is_completed();
    let (outcome, session) = engine.complete_battle(&id)?;
    let statistics = session.metrics.clone();
    let rewards = calculate_battle_rewards(&session, &statistics, context, rng);

    debug!(battle = %id, ?outcome, actions, timed_out, "simulated battle finished");
    Ok(BattleSimReport {
        outcome,
        actions,
        timed_out,
        statistics,
        rewards,
        log: session.log,
    })
}
