// src/config.rs
//! Scoring configuration: the program cutoff date, category point weights,
//! and the ordered milestone tier list.
//!
//! Loaded from TOML (`config/scoring.toml`, overridable via
//! `SCORING_CONFIG_PATH`). A built-in seed keeps the service usable when no
//! config file is shipped.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::types::Category;

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";

/// Point weight per category. Exactly these four categories exist.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CategoryWeights {
    pub arcade: f64,
    pub trivia: f64,
    pub skill: f64,
    pub extra: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            arcade: 1.0,
            trivia: 1.0,
            skill: 0.5,
            extra: 2.0,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Arcade => self.arcade,
            Category::Trivia => self.trivia,
            Category::Skill => self.skill,
            Category::Extra => self.extra,
        }
    }
}

/// Minimum badge counts a profile must reach for a tier.
/// `extra` badges count toward `arcade` at evaluation time.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TierRequirements {
    pub arcade: u32,
    pub trivia: u32,
    pub skill: u32,
}

/// One milestone tier. The list is ordered by ascending difficulty;
/// the awarded tier is the last one whose requirements are fully met.
#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneTier {
    pub name: String,
    pub requirements: TierRequirements,
    pub bonus_points: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoringSection {
    /// Badges earned strictly before this date are excluded from scoring.
    cutoff_date: NaiveDate,
}

/// Full scoring configuration handed into the analysis pipeline.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    cutoff: DateTime<Utc>,
    pub weights: CategoryWeights,
    pub milestones: Vec<MilestoneTier>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoringRoot {
    scoring: ScoringSection,
    #[serde(default)]
    weights: CategoryWeights,
    #[serde(default)]
    milestones: Vec<MilestoneTier>,
}

impl ScoringConfig {
    /// Load using `SCORING_CONFIG_PATH`, falling back to the default path,
    /// then to the built-in seed. A present-but-broken file logs a warning
    /// rather than taking the service down.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_SCORING_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCORING_CONFIG_PATH));

        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %path.display(), "invalid scoring config, using seed");
                    Self::default_seed()
                }
            },
            Err(_) => Self::default_seed(),
        }
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: ScoringRoot = toml::from_str(toml_str)?;
        let mut cfg = Self {
            cutoff: midnight_utc(root.scoring.cutoff_date),
            weights: root.weights,
            milestones: root.milestones,
        };
        if cfg.milestones.is_empty() {
            cfg.milestones = Self::default_seed().milestones;
        }
        Ok(cfg)
    }

    /// The fixed earliest-eligible instant (UTC midnight of the cutoff date).
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Built-in configuration matching the running program season.
    pub fn default_seed() -> Self {
        let tier = |name: &str, arcade, trivia, skill, bonus_points, icon: &str, color: &str| {
            MilestoneTier {
                name: name.to_string(),
                requirements: TierRequirements {
                    arcade,
                    trivia,
                    skill,
                },
                bonus_points,
                icon: icon.to_string(),
                color: color.to_string(),
            }
        };

        Self {
            cutoff: midnight_utc(NaiveDate::from_ymd_opt(2025, 7, 15).expect("valid seed date")),
            weights: CategoryWeights::default(),
            milestones: vec![
                tier("Milestone 1", 4, 4, 10, 5, "fa-medal", "#6c757d"),
                tier("Milestone 2", 6, 6, 20, 10, "fa-award", "#007bff"),
                tier("Milestone 3", 8, 7, 30, 15, "fa-trophy", "#ffc107"),
                tier("Ultimate Milestone", 10, 8, 44, 25, "fa-crown", "#8a2be2"),
            ],
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight exists"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_ascending_tiers_and_known_weights() {
        let cfg = ScoringConfig::default_seed();
        assert_eq!(cfg.milestones.len(), 4);
        assert_eq!(cfg.milestones[3].name, "Ultimate Milestone");
        for pair in cfg.milestones.windows(2) {
            assert!(pair[0].bonus_points < pair[1].bonus_points);
            assert!(pair[0].requirements.skill < pair[1].requirements.skill);
        }
        assert_eq!(cfg.weights.weight(Category::Skill), 0.5);
        assert_eq!(cfg.weights.weight(Category::Extra), 2.0);
        assert_eq!(cfg.cutoff().to_rfc3339(), "2025-07-15T00:00:00+00:00");
    }

    #[test]
    fn toml_roundtrip_with_overrides() {
        let toml_str = r##"
[scoring]
cutoff_date = "2025-01-01"

[weights]
arcade = 2.0
trivia = 1.0
skill = 1.0
extra = 3.0

[[milestones]]
name = "Only Tier"
bonus_points = 7
icon = "fa-star"
color = "#000000"

[milestones.requirements]
arcade = 1
trivia = 1
skill = 1
"##;
        let cfg = ScoringConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.weights.weight(Category::Arcade), 2.0);
        assert_eq!(cfg.milestones.len(), 1);
        assert_eq!(cfg.milestones[0].bonus_points, 7);
        assert_eq!(cfg.cutoff().date_naive().to_string(), "2025-01-01");
    }

    #[test]
    fn missing_milestones_fall_back_to_seed() {
        let cfg = ScoringConfig::from_toml_str("[scoring]\ncutoff_date = \"2025-07-15\"\n").unwrap();
        assert_eq!(cfg.milestones.len(), 4);
    }
}
