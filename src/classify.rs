// src/classify.rs
//! Badge classification: an ordered table of named rules, evaluated until one
//! matches. Order encodes specificity — explicit lexical markers first, then
//! the game-dialog heuristic, finally the skill-catalog test. A badge that
//! matches no rule is dropped from scoring entirely.

use crate::catalog::SkillCatalog;
use crate::types::Category;

/// Modal dialog content a badge card may reference, used by the
/// `game-dialog` rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogInfo {
    pub headline: Option<String>,
    pub action_href: Option<String>,
}

/// Everything a rule may look at for one card. `normalized_title` is the
/// title lowercased with internal whitespace collapsed.
#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    pub title: &'a str,
    pub normalized_title: &'a str,
    pub dialog: Option<&'a DialogInfo>,
}

type RuleFn = fn(&CardContext<'_>, &SkillCatalog) -> Option<Category>;

/// The classification pipeline. First matching rule wins; no fallthrough
/// once a category is assigned.
pub const RULES: &[(&str, RuleFn)] = &[
    ("extra-marker", extra_marker),
    ("trivia-marker", trivia_marker),
    ("level-marker", level_marker),
    ("game-dialog", game_dialog),
    ("skill-catalog", skill_catalog),
];

/// Classify one card, or decide to drop it (`None`).
/// Pure: identical (title, dialog) input always yields identical output.
pub fn classify(ctx: &CardContext<'_>, catalog: &SkillCatalog) -> Option<Category> {
    RULES.iter().find_map(|(_, rule)| rule(ctx, catalog))
}

/// Like [`classify`], but also reports which rule decided.
pub fn classify_with_rule(
    ctx: &CardContext<'_>,
    catalog: &SkillCatalog,
) -> Option<(&'static str, Category)> {
    RULES
        .iter()
        .find_map(|(name, rule)| rule(ctx, catalog).map(|c| (*name, c)))
}

/// Lowercase and collapse internal whitespace to single spaces.
pub fn normalize_title(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !out.is_empty() {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

// --- rules, in evaluation order ---

fn extra_marker(ctx: &CardContext<'_>, _: &SkillCatalog) -> Option<Category> {
    ctx.normalized_title
        .contains("extra")
        .then_some(Category::Extra)
}

fn trivia_marker(ctx: &CardContext<'_>, _: &SkillCatalog) -> Option<Category> {
    ctx.normalized_title
        .contains("trivia")
        .then_some(Category::Trivia)
}

fn level_marker(ctx: &CardContext<'_>, _: &SkillCatalog) -> Option<Category> {
    ctx.normalized_title
        .contains("level")
        .then_some(Category::Arcade)
}

/// Recovers badges whose title omits the marker but whose underlying game
/// type is discoverable through the referenced dialog's action link.
fn game_dialog(ctx: &CardContext<'_>, _: &SkillCatalog) -> Option<Category> {
    let dialog = ctx.dialog?;
    let href = dialog.action_href.as_deref()?.trim();
    if !href.starts_with("/games/") {
        return None;
    }
    let headline = dialog
        .headline
        .as_deref()
        .map(normalize_title)
        .unwrap_or_default();
    if ctx.normalized_title.contains("trivia") || headline.contains("trivia") {
        Some(Category::Trivia)
    } else {
        Some(Category::Arcade)
    }
}

/// Whitelist policy: only names from the curated catalog may count as
/// `skill`. Anything else (course-completion badges and the like) is
/// dropped rather than mis-scored.
fn skill_catalog(ctx: &CardContext<'_>, catalog: &SkillCatalog) -> Option<Category> {
    catalog
        .contains_normalized(ctx.normalized_title)
        .then_some(Category::Skill)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(
        title: &'a str,
        normalized: &'a str,
        dialog: Option<&'a DialogInfo>,
    ) -> CardContext<'a> {
        CardContext {
            title,
            normalized_title: normalized,
            dialog,
        }
    }

    fn classify_title(title: &str, dialog: Option<&DialogInfo>, catalog: &SkillCatalog) -> Option<Category> {
        let normalized = normalize_title(title);
        classify(&ctx(title, &normalized, dialog), catalog)
    }

    #[test]
    fn normalize_lowercases_and_collapses() {
        assert_eq!(normalize_title("  The   Arcade\tBase Camp "), "the arcade base camp");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn lexical_markers_win_in_order() {
        let empty = SkillCatalog::default();
        assert_eq!(
            classify_title("Level 3: Security Expert", None, &empty),
            Some(Category::Arcade)
        );
        assert_eq!(
            classify_title("Trivia: Cloud Basics", None, &empty),
            Some(Category::Trivia)
        );
        assert_eq!(
            classify_title("Arcade ExtraSpecial Points", None, &empty),
            Some(Category::Extra)
        );
        // "extra" outranks "trivia" when both appear.
        assert_eq!(
            classify_title("Extra Trivia Round", None, &empty),
            Some(Category::Extra)
        );
        // "trivia" outranks "level" when both appear.
        assert_eq!(
            classify_title("Trivia Level 2", None, &empty),
            Some(Category::Trivia)
        );
    }

    #[test]
    fn dialog_link_recovers_game_badges() {
        let empty = SkillCatalog::default();
        let dialog = DialogInfo {
            headline: Some("Weekly Trivia Challenge".into()),
            action_href: Some("/games/12345".into()),
        };
        assert_eq!(
            classify_title("Cloud Quest Week 4", Some(&dialog), &empty),
            Some(Category::Trivia)
        );

        let plain = DialogInfo {
            headline: Some("Base Camp August".into()),
            action_href: Some("/games/777".into()),
        };
        assert_eq!(
            classify_title("Base Camp Badge", Some(&plain), &empty),
            Some(Category::Arcade)
        );
    }

    #[test]
    fn dialog_without_games_link_falls_through() {
        let empty = SkillCatalog::default();
        let dialog = DialogInfo {
            headline: Some("Course completion".into()),
            action_href: Some("/course_templates/99".into()),
        };
        assert_eq!(classify_title("Some Course", Some(&dialog), &empty), None);

        let no_link = DialogInfo {
            headline: Some("Anything".into()),
            action_href: None,
        };
        assert_eq!(classify_title("Some Course", Some(&no_link), &empty), None);
    }

    #[test]
    fn skill_catalog_is_the_last_resort() {
        let catalog = SkillCatalog::from_names(["Implement Load Balancing on Compute Engine"]);
        assert_eq!(
            classify_title(
                "Implement Load Balancing on  Compute Engine",
                None,
                &catalog
            ),
            Some(Category::Skill)
        );
        // Not in the catalog, no marker, no dialog: dropped.
        assert_eq!(classify_title("Digital Transformation Intro", None, &catalog), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let catalog = SkillCatalog::from_names(["known badge"]);
        let dialog = DialogInfo {
            headline: None,
            action_href: Some("/games/1".into()),
        };
        for _ in 0..3 {
            assert_eq!(
                classify_title("Mystery Challenge", Some(&dialog), &catalog),
                Some(Category::Arcade)
            );
            assert_eq!(classify_title("known badge", None, &catalog), Some(Category::Skill));
        }
    }

    #[test]
    fn rule_names_stay_ordered() {
        let names: Vec<_> = RULES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "extra-marker",
                "trivia-marker",
                "level-marker",
                "game-dialog",
                "skill-catalog"
            ]
        );
    }

    #[test]
    fn deciding_rule_is_reported() {
        let catalog = SkillCatalog::from_names(["known badge"]);
        let normalized = normalize_title("Known  Badge");
        let decided = classify_with_rule(&ctx("Known  Badge", &normalized, None), &catalog);
        assert_eq!(decided, Some(("skill-catalog", Category::Skill)));

        let normalized = normalize_title("Level 2: Anything");
        let decided = classify_with_rule(&ctx("Level 2: Anything", &normalized, None), &catalog);
        assert_eq!(decided, Some(("level-marker", Category::Arcade)));
    }
}
