// src/api.rs
//! HTTP surface: the axum router and its handlers. Handlers stay thin —
//! validate, call the fetch collaborator, run the pipeline, record, reply.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::access::{self, AccessPolicy};
use crate::board::{DailyBest, LeaderboardRow, ScoreBoard, StatEntry};
use crate::catalog::SkillCatalog;
use crate::config::ScoringConfig;
use crate::fetch::{self, HttpProfileFetcher, ProfileFetcher};
use crate::pipeline;
use crate::types::{DailyActivity, ProfileSummary, ScoreSummary};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ScoringConfig>,
    pub catalog: Arc<SkillCatalog>,
    pub fetcher: Arc<dyn ProfileFetcher>,
    pub board: Arc<ScoreBoard>,
    pub access: Arc<AccessPolicy>,
}

impl AppState {
    /// Production wiring: configs from disk/env, HTTP fetcher, fresh board.
    pub fn from_env() -> Self {
        Self::with_fetcher(Arc::new(HttpProfileFetcher::new()))
    }

    /// Same wiring with an injected fetcher (tests use a fixture).
    pub fn with_fetcher(fetcher: Arc<dyn ProfileFetcher>) -> Self {
        Self {
            config: Arc::new(ScoringConfig::load_default()),
            catalog: Arc::new(SkillCatalog::load_default()),
            fetcher,
            board: Arc::new(ScoreBoard::new()),
            access: Arc::new(AccessPolicy::load_default()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/score", post(score_profile))
        .route("/leaderboard", get(leaderboard))
        .route("/progress/{id}", get(progress))
        .route("/skill-badges", get(skill_badges))
        .layer(middleware::from_fn_with_state(
            state.access.clone(),
            access::gate,
        ))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct ScoreReq {
    profile_url: String,
}

#[derive(serde::Serialize)]
struct ScoreResp {
    stat_id: u64,
    profile: ProfileSummary,
    score: ScoreSummary,
    daily_activity: Vec<DailyActivity>,
}

type ApiError = (StatusCode, Json<Value>);

fn error_body(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

async fn score_profile(
    State(state): State<AppState>,
    Json(body): Json<ScoreReq>,
) -> Result<Json<ScoreResp>, ApiError> {
    let url = body.profile_url.trim();
    if !fetch::is_profile_url(url) {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "profile_url must be a public profile on cloudskillsboost.google",
        ));
    }

    // Profile URLs are never logged raw.
    let profile_id = anon_hash(url);

    let html = match state.fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            counter!("profile_fetch_errors_total").increment(1);
            tracing::warn!(error = ?e, profile = %profile_id, fetcher = state.fetcher.name(), "profile fetch failed");
            return Err(error_body(
                StatusCode::BAD_GATEWAY,
                "could not fetch the profile page",
            ));
        }
    };

    let report = pipeline::analyze_document(&html, &state.config, &state.catalog).map_err(|e| {
        tracing::info!(profile = %profile_id, error = %e, "unusable profile document");
        error_body(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
    })?;

    let stat_id = state.board.record(
        url,
        &report.profile.name,
        report.profile.photo_url.as_deref(),
        report.score.total_points,
    );

    counter!("profiles_scored_total").increment(1);
    tracing::info!(
        profile = %profile_id,
        badges = report.profile.badges.len(),
        total = report.score.total_points,
        "profile scored"
    );

    Ok(Json(ScoreResp {
        stat_id,
        profile: report.profile,
        score: report.score,
        daily_activity: report.daily_activity,
    }))
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

const LEADERBOARD_DEFAULT_LIMIT: usize = 20;
const LEADERBOARD_MAX_LIMIT: usize = 100;

async fn leaderboard(
    State(state): State<AppState>,
    Query(q): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardRow>> {
    let limit = q
        .limit
        .unwrap_or(LEADERBOARD_DEFAULT_LIMIT)
        .min(LEADERBOARD_MAX_LIMIT);
    Json(state.board.top_n(limit))
}

#[derive(serde::Serialize)]
struct ProgressResp {
    user: StatEntry,
    daily: Vec<DailyBest>,
}

async fn progress(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ProgressResp>, ApiError> {
    let user = state
        .board
        .stat(id)
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "unknown stat id"))?;
    let daily = state.board.daily_best(id);
    Ok(Json(ProgressResp { user, daily }))
}

async fn skill_badges(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.sorted_names())
}

/// Short, anonymized identifier for a profile URL (first 6 digest bytes).
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("https://www.cloudskillsboost.google/public_profiles/x");
        let b = anon_hash("https://www.cloudskillsboost.google/public_profiles/x");
        let c = anon_hash("https://www.cloudskillsboost.google/public_profiles/y");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 12);
    }
}
