// src/pipeline.rs
//! The analysis pipeline: extraction → date resolution → classification →
//! aggregation → milestone evaluation, producing one [`ProfileReport`].
//!
//! Pure over its inputs; the only side effects are drop-reason counters and
//! a parse-time histogram.

use metrics::{counter, histogram};
use std::collections::BTreeMap;

use crate::catalog::SkillCatalog;
use crate::classify::{self, CardContext};
use crate::config::ScoringConfig;
use crate::dates;
use crate::extract::{self, ExtractError};
use crate::milestones;
use crate::scoring;
use crate::types::{
    Badge, DailyActivity, ProfileReport, ProfileSummary, ScoreSummary, NO_MILESTONE,
};

/// Analyze one fetched profile page. An empty badge list is a valid result;
/// the only error is a structurally unrecognizable document.
pub fn analyze_document(
    html: &str,
    config: &ScoringConfig,
    catalog: &SkillCatalog,
) -> Result<ProfileReport, ExtractError> {
    let t0 = std::time::Instant::now();

    let raw = extract::parse_profile_document(html)?;

    let mut badges = Vec::with_capacity(raw.cards.len());
    let mut dropped_undated = 0usize;
    let mut dropped_stale = 0usize;
    let mut dropped_unclassified = 0usize;

    for card in &raw.cards {
        let Some(earned_at) = dates::resolve_earned_at(&card.date_text) else {
            dropped_undated += 1;
            continue;
        };
        if !dates::within_program(earned_at, config.cutoff()) {
            dropped_stale += 1;
            continue;
        }

        let normalized = classify::normalize_title(&card.title);
        let dialog = card.modal_id.as_deref().and_then(|id| raw.dialogs.get(id));
        let ctx = CardContext {
            title: &card.title,
            normalized_title: &normalized,
            dialog,
        };
        let Some((rule, category)) = classify::classify_with_rule(&ctx, catalog) else {
            dropped_unclassified += 1;
            continue;
        };
        tracing::trace!(rule, category = category.as_str(), "badge classified");

        badges.push(Badge {
            display_name: card.title.clone(),
            category,
            earned_at,
        });
    }

    // Newest first; ties keep document order (stable sort).
    badges.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));

    counter!("badges_kept_total").increment(badges.len() as u64);
    counter!("badges_dropped_malformed_total").increment(raw.malformed_cards as u64);
    counter!("badges_dropped_undated_total").increment(dropped_undated as u64);
    counter!("badges_dropped_stale_total").increment(dropped_stale as u64);
    counter!("badges_dropped_unclassified_total").increment(dropped_unclassified as u64);

    let score = summarize(&badges, config);
    let daily_activity = daily_activity(&badges);

    let profile = ProfileSummary {
        name: raw.name,
        member_since: raw.member_since,
        photo_url: raw.photo_url,
        league_name: raw.league_name,
        league_points: raw.league_points,
        league_icon_url: raw.league_icon_url,
        badges,
    };

    histogram!("analyze_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    Ok(ProfileReport {
        profile,
        score,
        daily_activity,
    })
}

/// Aggregate a final badge list into the score summary.
pub fn summarize(badges: &[Badge], config: &ScoringConfig) -> ScoreSummary {
    let counts = scoring::count_by_category(badges);
    let base_points = scoring::base_points(&counts, &config.weights);
    let (chart_counts, chart_points) = scoring::chart_series(&counts, &config.weights);
    let award = milestones::evaluate(&counts, &config.milestones);

    ScoreSummary {
        counts,
        base_points,
        milestone: award
            .tier
            .map(|t| t.name.clone())
            .unwrap_or_else(|| NO_MILESTONE.to_string()),
        bonus_points: award.bonus_points,
        total_points: base_points + f64::from(award.bonus_points),
        chart_counts,
        chart_points,
        milestone_progress: award.progress,
    }
}

/// Badges-per-day series, ascending by date.
pub fn daily_activity(badges: &[Badge]) -> Vec<DailyActivity> {
    let mut per_day = BTreeMap::new();
    for b in badges {
        *per_day.entry(b.earned_at.date_naive()).or_insert(0usize) += 1;
    }
    per_day
        .into_iter()
        .map(|(date, count)| DailyActivity { date, count })
        .collect()
}
