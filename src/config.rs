//! Catalog and banner data loaded from JSON.
//!
//! Loading validates the data the pull engine assumes: rarity rates are
//! rescaled to sum to 1, ids are unique across categories, featured ids
//! point at real catalog entries and banner windows are well ordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ConfigError, GachaError};
use crate::gacha::types::{Banner, GachaPool};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub pool: GachaPool,
    #[serde(default)]
    pub banners: Vec<Banner>,
}

impl GameData {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let data: GameData = serde_json::from_str(json)?;
        data.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let data = Self::from_json_str(&contents)?;
        info!(
            path = %path.as_ref().display(),
            items = data.pool.len(),
            banners = data.banners.len(),
            "game data loaded"
        );
        Ok(data)
    }

    /// Checks the data and returns it with normalized rates.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.pool.rates = self.pool.rates.normalized()?;

        let mut ids = HashSet::new();
        for entry in self.pool.entries() {
            if !ids.insert(entry.id().to_string()) {
                return Err(ConfigError::DuplicateId(entry.id().to_string()));
            }
        }

        let mut banner_ids = HashSet::new();
        for banner in &self.banners {
            if !banner_ids.insert(banner.id.as_str()) {
                return Err(ConfigError::DuplicateId(banner.id.clone()));
            }
            if !(0.0..=1.0).contains(&banner.featured.rate_up) {
                return Err(ConfigError::InvalidRates(format!(
                    "banner {} rate_up must be within [0, 1], got {}",
                    banner.id, banner.featured.rate_up
                )));
            }
            if banner.duration.as_ref().is_some_and(|w| w.start > w.end) {
                return Err(ConfigError::InvalidWindow {
                    banner: banner.id.clone(),
                });
            }
            if let Some(missing) = banner.featured.items.iter().find(|id| !ids.contains(*id)) {
                return Err(ConfigError::UnknownFeatured {
                    banner: banner.id.clone(),
                    item: missing.clone(),
                });
            }
        }

        Ok(self)
    }

    pub fn banner(&self, id: &str) -> Result<&Banner, GachaError> {
        self.banners
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| GachaError::NotFound(format!("banner {id}")))
    }

    pub fn available_banners(&self, now: DateTime<Utc>) -> Vec<&Banner> {
        self.banners.iter().filter(|b| b.is_available(now)).collect()
    }
}
