use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    R = 0,
    SR = 1,
    SSR = 2,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::R, Rarity::SR, Rarity::SSR];

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
        }
    }

    /// Tiers to try when this tier has no catalog items: itself, then lower
    /// tiers from the top down, then higher tiers.
    pub fn fallback_order(&self) -> [Rarity; 3] {
        match self {
            Rarity::R => [Rarity::R, Rarity::SR, Rarity::SSR],
            Rarity::SR => [Rarity::SR, Rarity::R, Rarity::SSR],
            Rarity::SSR => [Rarity::SSR, Rarity::SR, Rarity::R],
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base per-tier probabilities of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityRates {
    #[serde(rename = "R")]
    pub r: f64,
    #[serde(rename = "SR")]
    pub sr: f64,
    #[serde(rename = "SSR")]
    pub ssr: f64,
}

impl RarityRates {
    pub fn new(r: f64, sr: f64, ssr: f64) -> Self {
        Self { r, sr, ssr }
    }

    pub fn total(&self) -> f64 {
        self.r + self.sr + self.ssr
    }

    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::R => self.r,
            Rarity::SR => self.sr,
            Rarity::SSR => self.ssr,
        }
    }

    /// Rejects negative, non-finite or all-zero tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("R", self.r), ("SR", self.sr), ("SSR", self.ssr)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRates(format!(
                    "{name} rate must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.total() <= 0.0 {
            return Err(ConfigError::InvalidRates("rates sum to zero".to_string()));
        }
        Ok(())
    }

    /// Rescales the table so the three tiers sum to exactly 1.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        self.validate()?;
        let total = self.total();
        Ok(Self {
            r: self.r / total,
            sr: self.sr / total,
            ssr: self.ssr / total,
        })
    }
}

impl Default for RarityRates {
    fn default() -> Self {
        Self::new(0.85, 0.13, 0.02)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Character,
    Pet,
    Item,
    Equipment,
}

impl ItemCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Character => "character",
            ItemCategory::Pet => "pet",
            ItemCategory::Item => "item",
            ItemCategory::Equipment => "equipment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f64,
}

fn default_crit_damage() -> f64 {
    150.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub skill_ids: Vec<String>,
}

/// Passive bonus a pet grants its owner, e.g. `+5% attack`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetBonus {
    pub stat: String,
    pub value: f64,
    #[serde(default)]
    pub is_percent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetEntry {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub bonuses: Vec<PetBonus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub kind: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStats {
    #[serde(default)]
    pub hp: u32,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub slot: String,
    #[serde(default)]
    pub stats: EquipmentStats,
}

/// One pullable catalog entry. The `{id, rarity}` projection is shared by all
/// categories; payloads are only reachable after matching on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CatalogEntry {
    Character(CharacterEntry),
    Pet(PetEntry),
    Item(ItemEntry),
    Equipment(EquipmentEntry),
}

impl CatalogEntry {
    pub fn id(&self) -> &str {
        match self {
            CatalogEntry::Character(c) => &c.id,
            CatalogEntry::Pet(p) => &p.id,
            CatalogEntry::Item(i) => &i.id,
            CatalogEntry::Equipment(e) => &e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Character(c) => &c.name,
            CatalogEntry::Pet(p) => &p.name,
            CatalogEntry::Item(i) => &i.name,
            CatalogEntry::Equipment(e) => &e.name,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            CatalogEntry::Character(c) => c.rarity,
            CatalogEntry::Pet(p) => p.rarity,
            CatalogEntry::Item(i) => i.rarity,
            CatalogEntry::Equipment(e) => e.rarity,
        }
    }

    /// The category implied by the variant itself.
    pub fn category(&self) -> ItemCategory {
        match self {
            CatalogEntry::Character(_) => ItemCategory::Character,
            CatalogEntry::Pet(_) => ItemCategory::Pet,
            CatalogEntry::Item(_) => ItemCategory::Item,
            CatalogEntry::Equipment(_) => ItemCategory::Equipment,
        }
    }
}

/// The pullable catalog plus the base odds used to draw a tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GachaPool {
    #[serde(default)]
    pub rates: RarityRates,
    #[serde(default)]
    pub characters: Vec<CharacterEntry>,
    #[serde(default)]
    pub pets: Vec<PetEntry>,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub equipment: Vec<EquipmentEntry>,
}

impl GachaPool {
    pub fn new(rates: RarityRates) -> Self {
        Self {
            rates,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.pets.len() + self.items.len() + self.equipment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry in category order: characters, pets, items, equipment.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries = Vec::with_capacity(self.len());
        entries.extend(self.characters.iter().cloned().map(CatalogEntry::Character));
        entries.extend(self.pets.iter().cloned().map(CatalogEntry::Pet));
        entries.extend(self.items.iter().cloned().map(CatalogEntry::Item));
        entries.extend(self.equipment.iter().cloned().map(CatalogEntry::Equipment));
        entries
    }

    /// All entries of one rarity across every category.
    pub fn entries_of_rarity(&self, rarity: Rarity) -> Vec<CatalogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.rarity() == rarity)
            .collect()
    }

    pub fn has_rarity(&self, rarity: Rarity) -> bool {
        self.characters.iter().any(|c| c.rarity == rarity)
            || self.pets.iter().any(|p| p.rarity == rarity)
            || self.items.iter().any(|i| i.rarity == rarity)
            || self.equipment.iter().any(|e| e.rarity == rarity)
    }

    pub fn find(&self, id: &str) -> Option<CatalogEntry> {
        self.entries().into_iter().find(|entry| entry.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerType {
    Standard,
    Event,
    Limited,
}

/// Which pity counter a banner draws against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PityTrack {
    Standard,
    Event,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturedConfig {
    #[serde(default)]
    pub items: Vec<String>,
    /// Chance, inside a drawn tier, of picking from the featured items.
    #[serde(default)]
    pub rate_up: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Coins,
    Gems,
    Tickets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerCost {
    pub currency: Currency,
    pub amount: u64,
    /// Fractional discount on a 10-pull, e.g. `0.1` for 10% off.
    #[serde(default)]
    pub multi_pull_discount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BannerWindow {
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub banner_type: BannerType,
    #[serde(default)]
    pub featured: FeaturedConfig,
    pub cost: BannerCost,
    #[serde(default)]
    pub duration: Option<BannerWindow>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Banner {
    /// A banner can be pulled when it is flagged active and `now` falls inside
    /// its window, if it has one.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self
                .duration
                .as_ref()
                .map_or(true, |window| window.contains(now))
    }

    pub fn features(&self, item_id: &str) -> bool {
        self.featured.items.iter().any(|id| id == item_id)
    }

    pub fn pity_track(&self) -> PityTrack {
        match self.banner_type {
            BannerType::Standard => PityTrack::Standard,
            BannerType::Event | BannerType::Limited => PityTrack::Event,
        }
    }
}

/// One pulled entry tagged with its pool category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullResult {
    pub item: CatalogEntry,
    pub category: ItemCategory,
    pub is_featured: bool,
}

impl PullResult {
    pub fn rarity(&self) -> Rarity {
        self.item.rarity()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPullResult {
    pub pulls: Vec<PullResult>,
    /// True when the last pull was replaced to honour the SR-or-better
    /// guarantee.
    pub guaranteed_sr: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn banner() -> Banner {
        Banner {
            id: "b1".to_string(),
            name: "Test Banner".to_string(),
            banner_type: BannerType::Event,
            featured: FeaturedConfig {
                items: vec!["hero".to_string()],
                rate_up: 0.5,
            },
            cost: BannerCost {
                currency: Currency::Gems,
                amount: 160,
                multi_pull_discount: None,
            },
            duration: None,
            is_active: true,
        }
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::R < Rarity::SR);
        assert!(Rarity::SR < Rarity::SSR);
    }

    #[test]
    fn test_rarity_serde_names() {
        assert_eq!(serde_json::to_string(&Rarity::SSR).unwrap(), "\"SSR\"");
        let parsed: Rarity = serde_json::from_str("\"SR\"").unwrap();
        assert_eq!(parsed, Rarity::SR);
    }

    #[test]
    fn test_rates_normalized_sum_to_one() {
        let rates = RarityRates::new(8.5, 1.3, 0.2).normalized().unwrap();
        assert!((rates.total() - 1.0).abs() < 1e-9);
        assert!((rates.r - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_rates_reject_negative_and_zero() {
        assert!(RarityRates::new(-0.1, 0.5, 0.6).validate().is_err());
        assert!(RarityRates::new(0.0, 0.0, 0.0).validate().is_err());
        assert!(RarityRates::new(f64::NAN, 0.5, 0.5).validate().is_err());
    }

    #[test]
    fn test_banner_available_without_window() {
        let b = banner();
        assert!(b.is_available(Utc::now()));
    }

    #[test]
    fn test_banner_inactive_flag_wins() {
        let mut b = banner();
        b.is_active = false;
        assert!(!b.is_available(Utc::now()));
    }

    #[test]
    fn test_banner_window_bounds() {
        let now = Utc::now();
        let mut b = banner();
        b.duration = Some(BannerWindow {
            start: now - Duration::days(1),
            end: now + Duration::days(1),
        });
        assert!(b.is_available(now));
        assert!(!b.is_available(now + Duration::days(2)));
        assert!(!b.is_available(now - Duration::days(2)));
    }

    #[test]
    fn test_pity_track_by_banner_type() {
        let mut b = banner();
        assert_eq!(b.pity_track(), PityTrack::Event);
        b.banner_type = BannerType::Limited;
        assert_eq!(b.pity_track(), PityTrack::Event);
        b.banner_type = BannerType::Standard;
        assert_eq!(b.pity_track(), PityTrack::Standard);
    }

    #[test]
    fn test_catalog_entry_tagged_serde() {
        let json = r#"{"category":"pet","id":"p1","name":"Fox","rarity":"SR"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id(), "p1");
        assert_eq!(entry.rarity(), Rarity::SR);
        assert_eq!(entry.category(), ItemCategory::Pet);
    }

    #[test]
    fn test_fallback_order_starts_with_self() {
        for rarity in Rarity::ALL {
            assert_eq!(rarity.fallback_order()[0], rarity);
        }
    }
}
