// src/dates.rs
//! Date resolution for badge cards: find the single calendar-date substring
//! in free-form card text, parse it, and normalize to UTC midnight.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches dates like "Jul 20, 2025" or "September 1, 2025".
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]{3,})\s+(\d{1,2}),\s+(\d{4})").expect("date regex"));

/// Find the first date substring in `text` and return it as a UTC-midnight
/// instant. `None` means the card carries no recognizable date and must be
/// dropped — not an error.
pub fn resolve_earned_at(text: &str) -> Option<DateTime<Utc>> {
    let caps = DATE_RE.captures(text)?;
    let month = parse_month(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(midnight_utc(date))
}

/// Cutoff test: only badges earned at or after the program start survive.
pub fn within_program(earned_at: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
    earned_at >= cutoff
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight exists"))
}

/// Month name to number; accepts the 3-letter abbreviation or the full name,
/// case-insensitively.
fn parse_month(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lower = name.to_ascii_lowercase();
    MONTHS.iter().position(|m| {
        *m == lower || (lower.len() >= 3 && m.starts_with(&lower))
    }).map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cutoff() -> DateTime<Utc> {
        midnight_utc(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap())
    }

    #[test]
    fn finds_abbreviated_and_full_months() {
        let d = resolve_earned_at("Earned Jul 20, 2025 EDT").unwrap();
        assert_eq!(d.to_rfc3339(), "2025-07-20T00:00:00+00:00");

        let d = resolve_earned_at("Earned September 1, 2025 EDT").unwrap();
        assert_eq!(d.to_rfc3339(), "2025-09-01T00:00:00+00:00");
    }

    #[test]
    fn first_match_wins() {
        let d = resolve_earned_at("Aug 2, 2025 (updated Sep 9, 2025)").unwrap();
        assert_eq!(d.date_naive().to_string(), "2025-08-02");
    }

    #[test]
    fn garbage_yields_none() {
        assert!(resolve_earned_at("no date here").is_none());
        assert!(resolve_earned_at("Earned 2025-07-20").is_none());
        // Month token that is not a month name.
        assert!(resolve_earned_at("Xyz 20, 2025").is_none());
        // Impossible day-of-month.
        assert!(resolve_earned_at("Feb 31, 2025").is_none());
    }

    #[test]
    fn cutoff_is_inclusive() {
        let on = resolve_earned_at("Jul 15, 2025").unwrap();
        let before = resolve_earned_at("Jul 14, 2025").unwrap();
        let after = resolve_earned_at("Jul 16, 2025").unwrap();
        assert!(within_program(on, cutoff()));
        assert!(!within_program(before, cutoff()));
        assert!(within_program(after, cutoff()));
    }
}
