// src/scoring.rs
//! Score aggregation: category counts, the weighted base score, and the
//! chart arrays consumed by the UI. Pure functions over the final badge
//! list — no mutable tally survives a call.

use crate::config::CategoryWeights;
use crate::types::{Badge, Category, CategoryCounts};

/// Count badges per category. Absent categories stay at zero.
pub fn count_by_category(badges: &[Badge]) -> CategoryCounts {
    badges
        .iter()
        .fold(CategoryCounts::default(), |mut acc, b| {
            match b.category {
                Category::Arcade => acc.arcade += 1,
                Category::Trivia => acc.trivia += 1,
                Category::Skill => acc.skill += 1,
                Category::Extra => acc.extra += 1,
            }
            acc
        })
}

/// Weighted base score over the four fixed categories.
pub fn base_points(counts: &CategoryCounts, weights: &CategoryWeights) -> f64 {
    Category::ALL
        .iter()
        .map(|&c| counts.get(c) as f64 * weights.weight(c))
        .sum()
}

/// Parallel count and point arrays in fixed category order
/// `[arcade, trivia, skill, extra]`, points rounded to one decimal.
pub fn chart_series(
    counts: &CategoryCounts,
    weights: &CategoryWeights,
) -> ([usize; 4], [f64; 4]) {
    let mut chart_counts = [0usize; 4];
    let mut chart_points = [0f64; 4];
    for (i, &c) in Category::ALL.iter().enumerate() {
        chart_counts[i] = counts.get(c);
        chart_points[i] = round1(counts.get(c) as f64 * weights.weight(c));
    }
    (chart_counts, chart_points)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn badge(category: Category) -> Badge {
        Badge {
            display_name: "b".into(),
            category,
            earned_at: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
        }
    }

    fn badges(arcade: usize, trivia: usize, skill: usize, extra: usize) -> Vec<Badge> {
        let mut v = Vec::new();
        v.extend(std::iter::repeat_with(|| badge(Category::Arcade)).take(arcade));
        v.extend(std::iter::repeat_with(|| badge(Category::Trivia)).take(trivia));
        v.extend(std::iter::repeat_with(|| badge(Category::Skill)).take(skill));
        v.extend(std::iter::repeat_with(|| badge(Category::Extra)).take(extra));
        v
    }

    #[test]
    fn counts_and_base_points() {
        let weights = CategoryWeights::default();
        let counts = count_by_category(&badges(10, 8, 44, 0));
        assert_eq!(counts.arcade, 10);
        assert_eq!(counts.skill, 44);
        // 10*1.0 + 8*1.0 + 44*0.5 = 40
        assert_eq!(base_points(&counts, &weights), 40.0);
    }

    #[test]
    fn empty_list_scores_zero() {
        let weights = CategoryWeights::default();
        let counts = count_by_category(&[]);
        assert_eq!(counts, CategoryCounts::default());
        assert_eq!(base_points(&counts, &weights), 0.0);
    }

    #[test]
    fn chart_series_is_ordered_and_rounded() {
        let weights = CategoryWeights::default();
        let counts = count_by_category(&badges(2, 1, 3, 1));
        let (cc, cp) = chart_series(&counts, &weights);
        assert_eq!(cc, [2, 1, 3, 1]);
        assert_eq!(cp, [2.0, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn odd_weights_round_to_one_decimal() {
        let weights = CategoryWeights {
            arcade: 0.33,
            trivia: 1.0,
            skill: 0.5,
            extra: 2.0,
        };
        let counts = count_by_category(&badges(1, 0, 0, 0));
        let (_, cp) = chart_series(&counts, &weights);
        assert_eq!(cp[0], 0.3);
    }
}
