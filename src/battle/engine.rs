//! Turn-based battle state machine.
//!
//! A session moves `waiting -> in_progress` on creation and to `completed`
//! once one side has no living combatants. Each `perform_action` works on a
//! copy loaded from the store and only writes it back after every check has
//! passed, so a rejected action never changes the stored session.
//!
//! The engine does not serialize concurrent actions against one session;
//! callers that accept concurrent clients must hold a per-session lock.

use chrono::Utc;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use super::store::{InMemorySessionStore, SessionStore};
use super::types::{
    ActionKind, BattleAction, BattleOutcome, BattleResult, BattleSession, BattleSide,
    BattleStatus, Combatant, CombatStatistics, Skill,
};
use crate::core::constants::{
    BASIC_ATTACK_ENERGY_GAIN, CRIT_DAMAGE_DIVISOR, DEFENSE_MITIGATION_BASE,
    SKILL_ATTACK_SCALING_DIVISOR,
};
use crate::core::rng::roll_percent;
use crate::error::BattleError;

type Result<T> = std::result::Result<T, BattleError>;

/// Stable descending sort on speed; equal speeds keep input order.
pub fn compute_turn_order(combatants: &[Combatant]) -> Vec<String> {
    let mut order: Vec<&Combatant> = combatants.iter().collect();
    order.sort_by(|a, b| b.stats.speed.cmp(&a.stats.speed));
    order.into_iter().map(|c| c.id.clone()).collect()
}

/// `attack * (1 - defense / (100 + defense))`
pub fn mitigated_damage(attack: f64, defense: f64) -> f64 {
    attack * (1.0 - defense / (DEFENSE_MITIGATION_BASE + defense))
}

/// Rolls against the attacker's crit rate and applies crit damage on success.
fn apply_crit_roll(attacker: &Combatant, raw: f64, rng: &mut impl Rng) -> (f64, bool) {
    if roll_percent(attacker.stats.crit_rate, rng) {
        (raw * attacker.stats.crit_damage / CRIT_DAMAGE_DIVISOR, true)
    } else {
        (raw, false)
    }
}

pub fn calculate_basic_attack(
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut impl Rng,
) -> BattleResult {
    let raw = mitigated_damage(
        attacker.stats.attack as f64,
        defender.stats.defense as f64,
    );
    let (raw, is_critical) = apply_crit_roll(attacker, raw, rng);

    BattleResult {
        damage: Some(raw.max(0.0).round() as u32),
        healing: None,
        is_critical: Some(is_critical),
        status_effects_applied: Vec::new(),
        energy_change: BASIC_ATTACK_ENERGY_GAIN,
    }
}

/// Skill damage ignores defense and scales with attack; every target takes
/// the full amount. One crit roll covers all targets.
pub fn calculate_skill(attacker: &Combatant, skill: &Skill, rng: &mut impl Rng) -> BattleResult {
    let mut result = BattleResult {
        status_effects_applied: skill.status_effects.clone(),
        energy_change: -(skill.energy_cost as i32),
        ..Default::default()
    };

    if let Some(base) = skill.damage {
        let raw = base * (1.0 + attacker.stats.attack as f64 / SKILL_ATTACK_SCALING_DIVISOR);
        let (raw, is_critical) = apply_crit_roll(attacker, raw, rng);
        result.damage = Some(raw.max(0.0).round() as u32);
        result.is_critical = Some(is_critical);
    }

    if let Some(healing) = skill.healing {
        result.healing = Some(healing.max(0.0).round() as u32);
    }

    result
}

/// Victory, defeat or draw from the number of living combatants per side.
pub fn derive_outcome(session: &BattleSession) -> BattleOutcome {
    let players = session.players_alive();
    let enemies = session.enemies_alive();
    if players > enemies {
        BattleOutcome::Victory
    } else if players < enemies {
        BattleOutcome::Defeat
    } else {
        BattleOutcome::Draw
    }
}

fn describe_action(
    actor: &str,
    targets: &[String],
    skill_name: Option<&str>,
    result: &BattleResult,
) -> String {
    let target_list = targets.join(", ");
    let mut line = match skill_name {
        Some(skill) => format!("{actor} uses {skill} on {target_list}"),
        None => format!("{actor} attacks {target_list}"),
    };
    if let Some(damage) = result.damage {
        line.push_str(&format!(" for {damage} damage"));
    }
    if result.is_critical == Some(true) {
        line.push_str(" (critical hit!)");
    }
    if let Some(healing) = result.healing {
        line.push_str(&format!(", healing {healing} HP"));
    }
    if !result.status_effects_applied.is_empty() {
        let names: Vec<&str> = result
            .status_effects_applied
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        line.push_str(&format!(", applying {}", names.join(", ")));
    }
    line
}

/// Everything resolved about an action before the session is mutated.
struct ResolvedAction {
    result: BattleResult,
    log_line: String,
    actor_is_player: bool,
}

fn resolve_action(
    session: &BattleSession,
    action: &BattleAction,
    rng: &mut impl Rng,
) -> Result<ResolvedAction> {
    let expected = session
        .current_actor_id()
        .ok_or_else(|| BattleError::InvalidInput("battle has no turn order".to_string()))?;
    if action.character_id != expected {
        return Err(BattleError::IllegalTurn {
            expected: expected.to_string(),
            actual: action.character_id.clone(),
        });
    }

    let actor = session.combatant(&action.character_id).ok_or_else(|| {
        BattleError::InvalidTarget(format!("actor {} is not in this battle", action.character_id))
    })?;
    if !actor.is_alive() {
        return Err(BattleError::InvalidTarget(format!(
            "actor {} is defeated",
            actor.id
        )));
    }

    if action.target_ids.is_empty() {
        return Err(BattleError::InvalidTarget("no targets given".to_string()));
    }
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(action.target_ids.len());
    for target_id in &action.target_ids {
        if !seen.insert(target_id.as_str()) {
            return Err(BattleError::InvalidInput(format!(
                "target {target_id} listed twice"
            )));
        }
        let target = session.combatant(target_id).ok_or_else(|| {
            BattleError::InvalidTarget(format!("target {target_id} is not in this battle"))
        })?;
        if !target.is_alive() {
            return Err(BattleError::InvalidTarget(format!(
                "target {target_id} is defeated"
            )));
        }
        targets.push(target);
    }

    let (result, skill_name) = match action.action_type {
        ActionKind::BasicAttack => {
            if targets.len() != 1 {
                return Err(BattleError::InvalidInput(
                    "basic attack takes exactly one target".to_string(),
                ));
            }
            (calculate_basic_attack(actor, targets[0], rng), None)
        }
        ActionKind::Skill => {
            let skill_id = action
                .skill_id
                .as_deref()
                .ok_or_else(|| BattleError::SkillNotFound("no skill id given".to_string()))?;
            let skill = actor
                .find_skill(skill_id)
                .ok_or_else(|| BattleError::SkillNotFound(skill_id.to_string()))?;
            if actor.current_energy < skill.energy_cost {
                return Err(BattleError::InsufficientEnergy {
                    required: skill.energy_cost,
                    available: actor.current_energy,
                });
            }
            (calculate_skill(actor, skill, rng), Some(skill.name.as_str()))
        }
    };

    let target_names: Vec<String> = targets.iter().map(|t| t.name.clone()).collect();
    let log_line = describe_action(&actor.name, &target_names, skill_name, &result);

    Ok(ResolvedAction {
        result,
        log_line,
        actor_is_player: actor.is_player,
    })
}

fn apply_result(session: &mut BattleSession, action: &BattleAction, resolved: &ResolvedAction) {
    let result = &resolved.result;
    let mut metrics = CombatStatistics {
        turns_taken: session.metrics.turns_taken + 1,
        ..session.metrics.clone()
    };

    for target_id in &action.target_ids {
        let Some(target) = session.combatant_mut(target_id) else {
            continue;
        };
        let same_side = target.is_player == resolved.actor_is_player;
        if let Some(damage) = result.damage {
            target.take_damage(damage);
            if !same_side {
                if target.is_player {
                    metrics.damage_taken += damage as u64;
                } else {
                    metrics.damage_dealt += damage as u64;
                }
            }
        }
        if let Some(healing) = result.healing {
            target.heal(healing);
            if same_side && target.is_player {
                metrics.healing_done += healing as u64;
            }
        }
        target
            .status_effects
            .extend(result.status_effects_applied.iter().cloned());
    }

    if resolved.actor_is_player && result.is_critical == Some(true) {
        metrics.critical_hits += 1;
    }

    if let Some(actor) = session.combatant_mut(&action.character_id) {
        actor.adjust_energy(result.energy_change);
    }

    session.metrics = metrics;
    session.log.push(resolved.log_line.clone());
}

fn check_completion(session: &mut BattleSession) {
    let winner = if session.players_alive() == 0 {
        Some(BattleSide::Enemy)
    } else if session.enemies_alive() == 0 {
        Some(BattleSide::Player)
    } else {
        None
    };

    if let Some(side) = winner {
        session.status = BattleStatus::Completed;
        session.winner = Some(side);
        session
            .log
            .push(format!("Battle ended: {} side wins", side.name()));
    }
}

/// Moves to the next slot, passing over defeated combatants while the
/// battle is still running.
fn advance_turn(session: &mut BattleSession) {
    let len = session.turn_order.len();
    if len == 0 {
        return;
    }
    let mut next = (session.current_turn + 1) % len;
    if !session.is_completed() {
        for _ in 0..len {
            let alive = session
                .combatant(&session.turn_order[next])
                .is_some_and(|c| c.is_alive());
            if alive {
                break;
            }
            next = (next + 1) % len;
        }
    }
    session.current_turn = next;
}

/// Assigns the side and pulls hp and energy back within their maximums.
fn enlist(mut combatant: Combatant, is_player: bool) -> Combatant {
    combatant.is_player = is_player;
    combatant.stats.hp = combatant.stats.hp.min(combatant.stats.max_hp);
    combatant.current_energy = combatant.current_energy.min(combatant.max_energy);
    combatant
}

pub struct BattleEngine<S: SessionStore = InMemorySessionStore> {
    store: S,
}

impl BattleEngine<InMemorySessionStore> {
    pub fn in_memory() -> Self {
        Self::new(InMemorySessionStore::new())
    }
}

impl Default for BattleEngine<InMemorySessionStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: SessionStore> BattleEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a battle and registers it in the store.
    pub fn create_battle(
        &self,
        players: Vec<Combatant>,
        enemies: Vec<Combatant>,
    ) -> Result<BattleSession> {
        if players.is_empty() {
            return Err(BattleError::InvalidInput(
                "at least one player combatant is required".to_string(),
            ));
        }
        if enemies.is_empty() {
            return Err(BattleError::InvalidInput(
                "at least one enemy combatant is required".to_string(),
            ));
        }

        let mut characters = Vec::with_capacity(players.len() + enemies.len());
        characters.extend(players.into_iter().map(|c| enlist(c, true)));
        characters.extend(enemies.into_iter().map(|c| enlist(c, false)));

        let mut ids = HashSet::new();
        for combatant in &characters {
            if !ids.insert(combatant.id.as_str()) {
                return Err(BattleError::InvalidInput(format!(
                    "duplicate combatant id {}",
                    combatant.id
                )));
            }
            if !combatant.is_alive() {
                return Err(BattleError::InvalidInput(format!(
                    "combatant {} enters the battle defeated",
                    combatant.id
                )));
            }
        }

        let mut session = BattleSession {
            id: Uuid::new_v4(),
            turn_order: compute_turn_order(&characters),
            characters,
            current_turn: 0,
            status: BattleStatus::Waiting,
            winner: None,
            log: Vec::new(),
            metrics: CombatStatistics::default(),
            created_at: Utc::now(),
        };
        session.status = BattleStatus::InProgress;
        session.log.push("Battle started".to_string());

        self.store.put(session.clone())?;
        info!(
            battle = %session.id,
            combatants = session.characters.len(),
            first = session.current_actor_id().unwrap_or_default(),
            "battle created"
        );
        Ok(session)
    }

    pub fn get_battle_state(&self, id: &Uuid) -> Result<BattleSession> {
        self.store
            .get(id)?
            .ok_or_else(|| BattleError::NotFound(id.to_string()))
    }

    /// Validates and applies one action for the combatant whose turn it is.
    pub fn perform_action(
        &self,
        id: &Uuid,
        action: &BattleAction,
        rng: &mut impl Rng,
    ) -> Result<BattleResult> {
        let mut session = self.get_battle_state(id)?;
        if session.is_completed() {
            return Err(BattleError::BattleCompleted(id.to_string()));
        }

        let resolved = resolve_action(&session, action, rng)?;

        apply_result(&mut session, action, &resolved);
        check_completion(&mut session);
        advance_turn(&mut session);

        debug!(battle = %id, "{}", resolved.log_line);
        if let Some(winner) = session.winner {
            info!(battle = %id, winner = winner.name(), turns = session.metrics.turns_taken, "battle completed");
        }

        self.store.put(session)?;
        Ok(resolved.result)
    }

    /// Removes a session from the store and returns its final state with the
    /// derived outcome. A session closed before either side fell is marked
    /// completed here.
    pub fn complete_battle(&self, id: &Uuid) -> Result<(BattleOutcome, BattleSession)> {
        let mut session = self
            .store
            .delete(id)?
            .ok_or_else(|| BattleError::NotFound(id.to_string()))?;
        let outcome = derive_outcome(&session);

        if !session.is_completed() {
            session.status = BattleStatus::Completed;
            session.winner = match outcome {
                BattleOutcome::Victory => Some(BattleSide::Player),
                BattleOutcome::Defeat => Some(BattleSide::Enemy),
                BattleOutcome::Draw => None,
            };
            session.log.push(format!("Battle closed: {outcome:?}"));
        }

        info!(battle = %id, ?outcome, "battle closed");
        Ok((outcome, session))
    }
}
