// src/types.rs
//! Core data model: badge categories, extracted profile data, and the derived
//! score summary. Everything here is built fresh per analyzed document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of badge categories. Scoring weights and milestone thresholds
/// are defined over exactly these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arcade,
    Trivia,
    Skill,
    Extra,
}

impl Category {
    /// Fixed display order used by the chart arrays.
    pub const ALL: [Category; 4] = [
        Category::Arcade,
        Category::Trivia,
        Category::Skill,
        Category::Extra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Arcade => "arcade",
            Category::Trivia => "trivia",
            Category::Skill => "skill",
            Category::Extra => "extra",
        }
    }
}

/// A single timestamped achievement record extracted from a profile page.
/// Identity is positional; duplicate cards become duplicate badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub display_name: String,
    pub category: Category,
    pub earned_at: DateTime<Utc>,
}

/// Profile metadata plus the filtered, classified badge list
/// (descending by `earned_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub member_since: String,
    pub photo_url: Option<String>,
    pub league_name: String,
    pub league_points: u32,
    pub league_icon_url: Option<String>,
    pub badges: Vec<Badge>,
}

/// Per-category badge counts. Zero for categories with no badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub arcade: usize,
    pub trivia: usize,
    pub skill: usize,
    pub extra: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Arcade => self.arcade,
            Category::Trivia => self.trivia,
            Category::Skill => self.skill,
            Category::Extra => self.extra,
        }
    }
}

/// Progress toward one category requirement of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub current: usize,
    pub required: u32,
    /// Clamped to [0, 100]; 100 when nothing is required.
    pub percentage: f64,
}

/// Progress record for a single milestone tier, emitted for every tier
/// whether or not it is complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierProgress {
    pub name: String,
    pub bonus_points: u32,
    pub icon: String,
    pub color: String,
    pub is_complete: bool,
    pub arcade: CategoryProgress,
    pub trivia: CategoryProgress,
    pub skill: CategoryProgress,
}

/// Label reported when no milestone tier is met yet.
pub const NO_MILESTONE: &str = "None yet";

/// Derived scoring result. Recomputed on every request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub counts: CategoryCounts,
    pub base_points: f64,
    /// Awarded tier name, or [`NO_MILESTONE`].
    pub milestone: String,
    pub bonus_points: u32,
    pub total_points: f64,
    /// Counts in fixed order `[arcade, trivia, skill, extra]`.
    pub chart_counts: [usize; 4],
    /// Points in the same order, rounded to one decimal.
    pub chart_points: [f64; 4],
    pub milestone_progress: Vec<TierProgress>,
}

/// Badge count for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub count: usize,
}

/// Everything the analysis pipeline produces for one profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub profile: ProfileSummary,
    pub score: ScoreSummary,
    /// Ascending by date.
    pub daily_activity: Vec<DailyActivity>,
}
