//! Integration test: JSON game data -> validated pool and banners -> pulls

use std::io::Write;

use chrono::Utc;
use gacha_arena::config::GameData;
use gacha_arena::error::{ConfigError, GachaError};
use gacha_arena::gacha::{execute_pull, ItemCategory, PullKind, Rarity};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::NamedTempFile;

const GAME_DATA: &str = r#"{
    "pool": {
        "rates": { "R": 0.85, "SR": 0.13, "SSR": 0.02 },
        "characters": [
            { "id": "aria", "name": "Aria", "rarity": "SSR", "element": "fire",
              "base_stats": { "hp": 1200, "attack": 150, "defense": 75, "speed": 100,
                              "crit_rate": 15, "crit_damage": 160 },
              "skill_ids": ["shatter"] },
            { "id": "brom", "name": "Brom", "rarity": "SR",
              "base_stats": { "hp": 1000, "attack": 110, "defense": 55, "speed": 90 } }
        ],
        "pets": [
            { "id": "ember_fox", "name": "Ember Fox", "rarity": "SR",
              "bonuses": [ { "stat": "attack", "value": 5, "is_percent": true } ] }
        ],
        "items": [
            { "id": "health_potion", "name": "Health Potion", "rarity": "R",
              "effects": [ { "kind": "heal", "value": 200 } ] }
        ],
        "equipment": [
            { "id": "iron_sword", "name": "Iron Sword", "rarity": "R", "slot": "weapon",
              "stats": { "attack": 12 } }
        ]
    },
    "banners": [
        { "id": "standard", "name": "Standard Summon", "type": "standard",
          "cost": { "currency": "gems", "amount": 160, "multi_pull_discount": 0.1 } },
        { "id": "aria_rate_up", "name": "Aria Rate Up", "type": "limited",
          "featured": { "items": ["aria"], "rate_up": 0.5 },
          "cost": { "currency": "tickets", "amount": 1 },
          "duration": { "start": "2020-01-01T00:00:00Z", "end": "2020-02-01T00:00:00Z" } }
    ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn test_load_from_file() {
    let file = write_temp(GAME_DATA);
    let data = GameData::from_path(file.path()).unwrap();

    assert_eq!(data.pool.len(), 5);
    assert_eq!(data.banners.len(), 2);
    let aria = &data.pool.characters[0];
    assert_eq!(aria.element.as_deref(), Some("fire"));
    assert_eq!(aria.base_stats.crit_damage, 160.0);
    assert_eq!(data.pool.pets[0].bonuses[0].stat, "attack");
    assert_eq!(data.pool.equipment[0].stats.attack, 12);
    assert_eq!(data.pool.equipment[0].stats.hp, 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = GameData::from_path(dir.path().join("missing.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_unnormalized_rates_are_rescaled() {
    let json = GAME_DATA.replace(
        r#""R": 0.85, "SR": 0.13, "SSR": 0.02"#,
        r#""R": 170, "SR": 26, "SSR": 4"#,
    );
    let data = GameData::from_json_str(&json).unwrap();
    assert!((data.pool.rates.r - 0.85).abs() < 1e-9);
    assert!((data.pool.rates.sr - 0.13).abs() < 1e-9);
    assert!((data.pool.rates.ssr - 0.02).abs() < 1e-9);
}

#[test]
fn test_negative_rate_rejected() {
    let json = GAME_DATA.replace(r#""SSR": 0.02"#, r#""SSR": -0.02"#);
    assert!(matches!(
        GameData::from_json_str(&json),
        Err(ConfigError::InvalidRates(_))
    ));
}

#[test]
fn test_duplicate_id_across_categories_rejected() {
    let json = GAME_DATA.replace(r#""id": "iron_sword""#, r#""id": "brom""#);
    match GameData::from_json_str(&json) {
        Err(ConfigError::DuplicateId(id)) => assert_eq!(id, "brom"),
        other => panic!("expected duplicate id error, got {other:?}"),
    }
}

#[test]
fn test_rate_up_out_of_range_rejected() {
    let json = GAME_DATA.replace(r#""rate_up": 0.5"#, r#""rate_up": 1.5"#);
    assert!(matches!(
        GameData::from_json_str(&json),
        Err(ConfigError::InvalidRates(_))
    ));
}

// =========================================================================
// Using loaded data
// =========================================================================

#[test]
fn test_loaded_banners_drive_pulls() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let data = GameData::from_json_str(GAME_DATA).unwrap();
    let now = Utc::now();

    let available: Vec<&str> = data
        .available_banners(now)
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(available, vec!["standard"]);

    let standard = data.banner("standard").unwrap();
    let outcome = execute_pull(&data.pool, standard, PullKind::Multi, 2_000, 0, now, &mut rng).unwrap();
    assert_eq!(outcome.pulls.len(), 10);
    assert_eq!(outcome.cost, 1_440);
    assert!(outcome.pulls.iter().any(|p| p.rarity() >= Rarity::SR));
    for pull in &outcome.pulls {
        let expected = match pull.item.id() {
            "aria" | "brom" => ItemCategory::Character,
            "ember_fox" => ItemCategory::Pet,
            "iron_sword" => ItemCategory::Equipment,
            _ => ItemCategory::Item,
        };
        assert_eq!(pull.category, expected);
    }

    let expired = data.banner("aria_rate_up").unwrap();
    assert_eq!(
        execute_pull(&data.pool, expired, PullKind::Single, 10, 0, now, &mut rng).unwrap_err(),
        GachaError::InactiveBanner("aria_rate_up".to_string())
    );
}
