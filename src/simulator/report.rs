//! Simulation report generation.

use super::battle_sim::BattleSimReport;
use super::gacha_sim::GachaSimReport;
use crate::battle::types::BattleOutcome;
use crate::gacha::types::{Rarity, RarityRates};

/// Aggregated results from a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimReport {
    pub gacha: Option<GachaSimReport>,
    /// Rates the pulls were drawn against, for comparison in the text report.
    pub nominal_rates: RarityRates,

    pub battles: Vec<BattleSimReport>,
}

impl SimReport {
    pub fn count_outcome(&self, outcome: BattleOutcome) -> usize {
        self.battles.iter().filter(|b| b.outcome == outcome).count()
    }

    pub fn win_rate(&self) -> f64 {
        if self.battles.is_empty() {
            return 0.0;
        }
        self.count_outcome(BattleOutcome::Victory) as f64 / self.battles.len() as f64
    }

    fn average(&self, value: impl Fn(&BattleSimReport) -> f64) -> f64 {
        if self.battles.is_empty() {
            return 0.0;
        }
        self.battles.iter().map(value).sum::<f64>() / self.battles.len() as f64
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        if let Some(gacha) = &self.gacha {
            report.push_str("── PULLS ────────────────────────────────────────────────────────\n");
            report.push_str(&format!("  Total Pulls:         {}\n", gacha.total_pulls));
            report.push_str("  Rarity   Count      Observed   Nominal\n");
            report.push_str("  ──────   ────────   ────────   ───────\n");
            for rarity in Rarity::ALL {
                report.push_str(&format!(
                    "  {:<6}   {:>8}   {:>7.3}%   {:>6.2}%\n",
                    rarity.name(),
                    gacha.count(rarity),
                    gacha.frequency(rarity) * 100.0,
                    self.nominal_rates.get(rarity) * 100.0
                ));
            }
            report.push_str(&format!("  Featured Pulls:      {}\n", gacha.featured_pulls));
            report.push_str(&format!("  Hard Pity Hits:      {}\n", gacha.hard_pity_hits));
            report.push_str(&format!("  SR Guarantee Hits:   {}\n", gacha.soft_guarantee_hits));
            report.push_str(&format!("  Longest Dry Streak:  {}\n", gacha.longest_dry_streak));
            report.push_str(&format!("  Final Pity:          {}\n\n", gacha.final_pity));
        }

        if !self.battles.is_empty() {
            report.push_str("── BATTLES ──────────────────────────────────────────────────────\n");
            report.push_str(&format!(
                "  Battles: {} total, {} won, {} lost, {} drawn\n",
                self.battles.len(),
                self.count_outcome(BattleOutcome::Victory),
                self.count_outcome(BattleOutcome::Defeat),
                self.count_outcome(BattleOutcome::Draw)
            ));
            report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate() * 100.0));
            report.push_str(&format!(
                "  Avg Actions:         {:.1}\n",
                self.average(|b| b.actions as f64)
            ));
            report.push_str(&format!(
                "  Avg Damage Dealt:    {:.0}\n",
                self.average(|b| b.statistics.damage_dealt as f64)
            ));
            report.push_str(&format!(
                "  Avg Damage Taken:    {:.0}\n",
                self.average(|b| b.statistics.damage_taken as f64)
            ));
            report.push_str(&format!(
                "  Avg Experience:      {:.1}\n",
                self.average(|b| b.rewards.experience as f64)
            ));
            report.push_str(&format!(
                "  Avg Coins:           {:.1}\n",
                self.average(|b| b.rewards.coins as f64)
            ));
            report.push_str(&format!(
                "  Avg Performance:     {:.2}x\n",
                self.average(|b| b.rewards.performance_multiplier)
            ));
            let drops: usize = self
                .battles
                .iter()
                .map(|b| b.rewards.items.len() + b.rewards.equipment.len() + b.rewards.rare_drops.len())
                .sum();
            report.push_str(&format!("  Total Drops:         {}\n", drops));
            let timed_out = self.battles.iter().filter(|b| b.timed_out).count();
            if timed_out > 0 {
                report.push_str(&format!("  Hit Action Cap:      {}\n", timed_out));
            }
        }

        report
    }

    /// One-line summary for `--quiet` runs.
    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(gacha) = &self.gacha {
            parts.push(format!(
                "pulls={} R={:.4} SR={:.4} SSR={:.4} pity_hits={}",
                gacha.total_pulls,
                gacha.frequency(Rarity::R),
                gacha.frequency(Rarity::SR),
                gacha.frequency(Rarity::SSR),
                gacha.hard_pity_hits
            ));
        }
        if !self.battles.is_empty() {
            parts.push(format!(
                "battles={} win_rate={:.3}",
                self.battles.len(),
                self.win_rate()
            ));
        }
        parts.join(" ")
    }
}
