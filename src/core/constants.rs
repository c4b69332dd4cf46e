// Gacha
pub const HARD_PITY: u32 = 100;
pub const MULTI_PULL_SIZE: usize = 10;

// Battle
pub const BASIC_ATTACK_ENERGY_GAIN: i32 = 10;
pub const DEFENSE_MITIGATION_BASE: f64 = 100.0;
pub const SKILL_ATTACK_SCALING_DIVISOR: f64 = 100.0;
pub const CRIT_DAMAGE_DIVISOR: f64 = 100.0;
pub const DEFAULT_MAX_ENERGY: u32 = 100;

// Reward base values (per defeated enemy)
pub const XP_PER_ENEMY_LEVEL: u64 = 10;
pub const XP_HP_DIVISOR: u64 = 10;
pub const COINS_PER_ENEMY_LEVEL: u64 = 5;
pub const COINS_HP_DIVISOR: u64 = 20;

// Performance multiplier
pub const PERFORMANCE_MULTIPLIER_CAP: f64 = 2.0;
pub const DEFAULT_MAX_TURNS: u32 = 50;
pub const FAST_CLEAR_TURN_FRACTION: f64 = 0.3;
pub const FAST_CLEAR_BONUS: f64 = 0.20;
pub const HEALTHY_FINISH_THRESHOLD: f64 = 0.8;
pub const HEALTHY_FINISH_BONUS: f64 = 0.15;
pub const CRIT_COUNT_THRESHOLD: u32 = 5;
pub const CRIT_COUNT_BONUS: f64 = 0.10;
pub const DAMAGE_RATIO_THRESHOLD: f64 = 3.0;
pub const DAMAGE_RATIO_BONUS: f64 = 0.10;

// Item drops: (item id, base chance)
pub const ITEM_DROP_TABLE: [(&str, f64); 4] = [
    ("health_potion", 0.30),
    ("energy_potion", 0.20),
    ("upgrade_stone", 0.10),
    ("skill_book", 0.05),
];
pub const ITEM_DROP_MAX_CHANCE: f64 = 0.9;

// Enemy name keyword -> (item id, chance)
pub const ENEMY_BONUS_DROPS: [(&str, &str, f64); 5] = [
    ("slime", "slime_gel", 0.40),
    ("goblin", "goblin_ear", 0.30),
    ("skeleton", "bone_fragment", 0.30),
    ("dragon", "dragon_scale", 0.15),
    ("demon", "demon_horn", 0.10),
];

// Equipment drops
pub const EQUIPMENT_DROP_BASE_CHANCE: f64 = 0.05;
pub const EQUIPMENT_DROP_MAX_CHANCE: f64 = 0.5;
pub const EQUIPMENT_HIGH_LEVEL_THRESHOLD: u32 = 20;
// Weight moved out of R for high level enemies: (to SR, to SSR)
pub const EQUIPMENT_HIGH_LEVEL_SHIFT: (u32, u32) = (7, 3);
pub const EQUIPMENT_KEYWORD_TYPES: [(&str, &str); 8] = [
    ("knight", "armor"),
    ("archer", "bow"),
    ("mage", "staff"),
    ("wizard", "staff"),
    ("warrior", "sword"),
    ("orc", "sword"),
    ("thief", "dagger"),
    ("rogue", "dagger"),
];
pub const EQUIPMENT_FALLBACK_TYPES: [&str; 5] = ["sword", "armor", "ring", "helmet", "boots"];

// Rare drops
pub const PERFECT_VICTORY_DROP: (&str, f64) = ("perfect_victory_gem", 0.10);
pub const BOSS_CORE_DROP: (&str, f64) = ("boss_core", 0.05);
pub const CRITICAL_ESSENCE_DROP: (&str, f64) = ("critical_essence", 0.08);
pub const CRITICAL_ESSENCE_MIN_CRITS: u32 = 10;
