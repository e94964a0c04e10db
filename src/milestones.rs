// src/milestones.rs
//! Milestone evaluation: walk the ordered tier list with adjusted counts,
//! award the highest fully-met tier, and emit a progress record for every
//! tier so the UI can render distance-to-next-tier bars.

use crate::config::MilestoneTier;
use crate::types::{CategoryCounts, CategoryProgress, TierProgress};

/// Counts as seen by the milestone model: `extra` badges count toward the
/// `arcade` requirement (they are scored separately at their own weight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustedCounts {
    pub arcade: usize,
    pub trivia: usize,
    pub skill: usize,
}

impl AdjustedCounts {
    pub fn from_counts(counts: &CategoryCounts) -> Self {
        Self {
            arcade: counts.arcade + counts.extra,
            trivia: counts.trivia,
            skill: counts.skill,
        }
    }
}

/// Result of the tier walk.
#[derive(Debug, Clone)]
pub struct MilestoneAward<'a> {
    /// The last (highest-index) tier whose requirements are fully met.
    pub tier: Option<&'a MilestoneTier>,
    pub bonus_points: u32,
    pub progress: Vec<TierProgress>,
}

fn tier_met(tier: &MilestoneTier, counts: &AdjustedCounts) -> bool {
    counts.arcade >= tier.requirements.arcade as usize
        && counts.trivia >= tier.requirements.trivia as usize
        && counts.skill >= tier.requirements.skill as usize
}

fn progress_for(current: usize, required: u32) -> CategoryProgress {
    let percentage = if required > 0 {
        (current as f64 / required as f64 * 100.0).min(100.0)
    } else {
        100.0
    };
    CategoryProgress {
        current,
        required,
        percentage,
    }
}

/// Evaluate all tiers. The award is the *last* met tier in list order, not
/// the first match — a monotonically increasing threshold walk.
pub fn evaluate<'a>(counts: &CategoryCounts, tiers: &'a [MilestoneTier]) -> MilestoneAward<'a> {
    let adjusted = AdjustedCounts::from_counts(counts);

    let mut awarded: Option<&MilestoneTier> = None;
    let mut progress = Vec::with_capacity(tiers.len());

    for tier in tiers {
        let is_complete = tier_met(tier, &adjusted);
        if is_complete {
            awarded = Some(tier);
        }
        progress.push(TierProgress {
            name: tier.name.clone(),
            bonus_points: tier.bonus_points,
            icon: tier.icon.clone(),
            color: tier.color.clone(),
            is_complete,
            arcade: progress_for(adjusted.arcade, tier.requirements.arcade),
            trivia: progress_for(adjusted.trivia, tier.requirements.trivia),
            skill: progress_for(adjusted.skill, tier.requirements.skill),
        });
    }

    MilestoneAward {
        tier: awarded,
        bonus_points: awarded.map(|t| t.bonus_points).unwrap_or(0),
        progress,
    }
}
