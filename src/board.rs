// src/board.rs
//! In-memory score board: per-profile stats, a score history log, the
//! top-N leaderboard, and daily-best progress series. Replaces the external
//! database the service used to write to; the operation set is the same.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize)]
pub struct StatEntry {
    pub id: u64,
    pub name: String,
    pub profile_url: String,
    pub photo_url: Option<String>,
    pub score: f64,
    pub last_check: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistoryPoint {
    pub ts: DateTime<Utc>,
    pub score: f64,
}

/// Leaderboard row as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub score: f64,
    pub photo_url: Option<String>,
}

/// Best score per calendar day, ascending.
#[derive(Debug, Clone, Serialize)]
pub struct DailyBest {
    pub date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Default)]
struct BoardState {
    next_id: u64,
    entries: Vec<StatEntry>,
    history: HashMap<u64, Vec<HistoryPoint>>,
}

#[derive(Debug)]
pub struct ScoreBoard {
    inner: Mutex<BoardState>,
    history_cap: usize,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::with_history_cap(1000)
    }

    pub fn with_history_cap(cap: usize) -> Self {
        Self {
            inner: Mutex::new(BoardState::default()),
            history_cap: cap.min(10_000),
        }
    }

    /// Upsert the stat row for a profile URL and append a history point.
    /// Returns the stat id.
    pub fn record(
        &self,
        profile_url: &str,
        name: &str,
        photo_url: Option<&str>,
        score: f64,
    ) -> u64 {
        let now = Utc::now();
        let mut state = self.inner.lock().expect("board mutex poisoned");

        let existing = state
            .entries
            .iter_mut()
            .find(|e| e.profile_url == profile_url)
            .map(|entry| {
                entry.score = score;
                entry.name = name.to_string();
                entry.photo_url = photo_url.map(str::to_string);
                entry.last_check = now;
                entry.id
            });

        let id = existing.unwrap_or_else(|| {
            state.next_id += 1;
            let id = state.next_id;
            state.entries.push(StatEntry {
                id,
                name: name.to_string(),
                profile_url: profile_url.to_string(),
                photo_url: photo_url.map(str::to_string),
                score,
                last_check: now,
            });
            id
        });

        let points = state.history.entry(id).or_default();
        points.push(HistoryPoint { ts: now, score });
        if points.len() > self.history_cap {
            let excess = points.len() - self.history_cap;
            points.drain(0..excess);
        }

        metrics::gauge!("board_entries").set(state.entries.len() as f64);
        id
    }

    /// Top `n` entries by score, descending.
    pub fn top_n(&self, n: usize) -> Vec<LeaderboardRow> {
        let state = self.inner.lock().expect("board mutex poisoned");
        let mut rows: Vec<_> = state.entries.iter().cloned().collect();
        rows.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        rows.into_iter()
            .take(n)
            .map(|e| LeaderboardRow {
                name: e.name,
                score: e.score,
                photo_url: e.photo_url,
            })
            .collect()
    }

    pub fn stat(&self, id: u64) -> Option<StatEntry> {
        let state = self.inner.lock().expect("board mutex poisoned");
        state.entries.iter().find(|e| e.id == id).cloned()
    }

    /// Best score per day for one stat, ascending by date.
    pub fn daily_best(&self, id: u64) -> Vec<DailyBest> {
        let state = self.inner.lock().expect("board mutex poisoned");
        let Some(points) = state.history.get(&id) else {
            return Vec::new();
        };
        let mut per_day = std::collections::BTreeMap::<NaiveDate, f64>::new();
        for p in points {
            let day = p.ts.date_naive();
            per_day
                .entry(day)
                .and_modify(|best| *best = best.max(p.score))
                .or_insert(p.score);
        }
        per_day
            .into_iter()
            .map(|(date, score)| DailyBest { date, score })
            .collect()
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
