use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::core::constants::DEFAULT_MAX_ENERGY;
use crate::error::BattleError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    /// Percentage, 0-100.
    #[serde(default)]
    pub crit_rate: f64,
    /// Percentage applied on a critical hit, e.g. 150 for +50%.
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f64,
}

fn default_crit_damage() -> f64 {
    150.0
}

impl CombatantStats {
    /// Full-health stats.
    pub fn new(max_hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            attack,
            defense,
            speed,
            crit_rate: 0.0,
            crit_damage: default_crit_damage(),
        }
    }

    pub fn with_crit(mut self, crit_rate: f64, crit_damage: f64) -> Self {
        self.crit_rate = crit_rate;
        self.crit_damage = crit_damage;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Buff,
    Debuff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub kind: EffectKind,
    /// Remaining turns.
    pub duration: u32,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub damage: Option<f64>,
    #[serde(default)]
    pub healing: Option<f64>,
    #[serde(default)]
    pub energy_cost: u32,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
}

impl Skill {
    pub fn damaging(id: &str, name: &str, damage: f64, energy_cost: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            damage: Some(damage),
            healing: None,
            energy_cost,
            status_effects: Vec::new(),
        }
    }

    pub fn healing(id: &str, name: &str, healing: f64, energy_cost: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            damage: None,
            healing: Some(healing),
            energy_cost,
            status_effects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub stats: CombatantStats,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub current_energy: u32,
    #[serde(default = "default_max_energy")]
    pub max_energy: u32,
    pub is_player: bool,
}

fn default_max_energy() -> u32 {
    DEFAULT_MAX_ENERGY
}

impl Combatant {
    pub fn new(id: &str, name: &str, level: u32, stats: CombatantStats, is_player: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level,
            stats,
            skills: Vec::new(),
            status_effects: Vec::new(),
            current_energy: 0,
            max_energy: DEFAULT_MAX_ENERGY,
            is_player,
        }
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_energy(mut self, current: u32) -> Self {
        self.current_energy = current.min(self.max_energy);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.stats.max_hp == 0 {
            return 0.0;
        }
        self.stats.hp as f64 / self.stats.max_hp as f64
    }

    pub fn find_skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == skill_id)
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.stats.hp = self.stats.hp.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.stats.hp = self.stats.hp.saturating_add(amount).min(self.stats.max_hp);
    }

    /// Applies a signed energy change clamped to `[0, max_energy]`.
    pub fn adjust_energy(&mut self, delta: i32) {
        let next = self.current_energy as i64 + delta as i64;
        self.current_energy = next.clamp(0, self.max_energy as i64) as u32;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    Waiting,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleSide {
    Player,
    Enemy,
}

impl BattleSide {
    pub fn name(&self) -> &'static str {
        match self {
            BattleSide::Player => "player",
            BattleSide::Enemy => "enemy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Draw,
}

/// Running totals the engine keeps for the reward step. Damage and crit
/// counts are from the player side's point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStatistics {
    pub turns_taken: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub critical_hits: u32,
    pub healing_done: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSession {
    pub id: Uuid,
    pub characters: Vec<Combatant>,
    pub turn_order: Vec<String>,
    pub current_turn: usize,
    pub status: BattleStatus,
    pub winner: Option<BattleSide>,
    pub log: Vec<String>,
    #[serde(default)]
    pub metrics: CombatStatistics,
    pub created_at: DateTime<Utc>,
}

impl BattleSession {
    /// Id of the combatant whose turn it is.
    pub fn current_actor_id(&self) -> Option<&str> {
        self.turn_order.get(self.current_turn).map(String::as_str)
    }

    pub fn combatant(&self, id: &str) -> Option<&Combatant> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Combatant> {
        self.characters.iter().filter(|c| c.is_player)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.characters.iter().filter(|c| !c.is_player)
    }

    pub fn players_alive(&self) -> usize {
        self.players().filter(|c| c.is_alive()).count()
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies().filter(|c| c.is_alive()).count()
    }

    pub fn is_completed(&self) -> bool {
        self.status == BattleStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    BasicAttack,
    Skill,
}

impl FromStr for ActionKind {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic_attack" => Ok(ActionKind::BasicAttack),
            "skill" => Ok(ActionKind::Skill),
            other => Err(BattleError::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleAction {
    #[serde(rename = "type")]
    pub action_type: ActionKind,
    pub character_id: String,
    pub target_ids: Vec<String>,
    #[serde(default)]
    pub skill_id: Option<String>,
}

impl BattleAction {
    pub fn basic_attack(actor: &str, target: &str) -> Self {
        Self {
            action_type: ActionKind::BasicAttack,
            character_id: actor.to_string(),
            target_ids: vec![target.to_string()],
            skill_id: None,
        }
    }

    pub fn skill(actor: &str, targets: &[&str], skill_id: &str) -> Self {
        Self {
            action_type: ActionKind::Skill,
            character_id: actor.to_string(),
            target_ids: targets.iter().map(|t| t.to_string()).collect(),
            skill_id: Some(skill_id.to_string()),
        }
    }

    /// Builds an action from loosely typed caller input.
    pub fn parse(
        kind: &str,
        actor: &str,
        targets: &[&str],
        skill_id: Option<&str>,
    ) -> Result<Self, BattleError> {
        Ok(Self {
            action_type: kind.parse()?,
            character_id: actor.to_string(),
            target_ids: targets.iter().map(|t| t.to_string()).collect(),
            skill_id: skill_id.map(str::to_string),
        })
    }
}

/// Outcome of a single action, before it is written into the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub damage: Option<u32>,
    pub healing: Option<u32>,
    pub is_critical: Option<bool>,
    pub status_effects_applied: Vec<StatusEffect>,
    pub energy_change: i32,
}
