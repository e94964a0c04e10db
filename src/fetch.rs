// src/fetch.rs
//! The external fetch collaborator. The core never performs I/O; this trait
//! hands it an already-fetched page. Network policy (timeouts, TLS) lives
//! here — retry/backoff is deliberately out of scope.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Only public profile URLs on the platform host are accepted.
pub const PROFILE_URL_PREFIX: &str = "https://www.cloudskillsboost.google/public_profiles/";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Quick shape check used by the API layer before any network traffic.
pub fn is_profile_url(url: &str) -> bool {
    url.starts_with(PROFILE_URL_PREFIX) && url.len() > PROFILE_URL_PREFIX.len()
}

#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Fetch the page body for a (pre-validated) profile URL.
    async fn fetch(&self, url: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Production fetcher: a single GET per profile, 30 s timeout.
pub struct HttpProfileFetcher {
    client: reqwest::Client,
}

impl HttpProfileFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self { client }
    }
}

impl Default for HttpProfileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileFetcher for HttpProfileFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("profile http get()")?;
        let resp = resp.error_for_status().context("profile http status")?;
        resp.text().await.context("profile http .text()")
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Test fetcher serving a fixed body regardless of URL.
pub struct FixtureFetcher {
    body: String,
}

impl FixtureFetcher {
    pub fn from_str(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl ProfileFetcher for FixtureFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        Ok(self.body.clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
