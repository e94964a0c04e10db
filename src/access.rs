// src/access.rs
//! Access gate by network origin: a client-IP allowlist applied as router
//! middleware. Loopback is always admitted, an empty list means the service
//! is open, and every verdict is logged.

use axum::{
    extract::{connect_info::ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::{fs, path::PathBuf};

pub const DEFAULT_ACCESS_CONFIG_PATH: &str = "config/access.toml";
pub const ENV_ACCESS_CONFIG_PATH: &str = "ACCESS_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct AccessPolicy {
    /// Exact addresses ("203.0.113.7") or prefixes ("10.", "2001:db8:").
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default = "default_true")]
    allow_loopback: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::open()
    }
}

impl AccessPolicy {
    /// No restrictions beyond logging.
    pub fn open() -> Self {
        Self {
            allow: Vec::new(),
            allow_loopback: true,
        }
    }

    pub fn with_allowlist<I, S>(allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: allow.into_iter().map(Into::into).collect(),
            allow_loopback: true,
        }
    }

    /// Load using `ACCESS_CONFIG_PATH`, falling back to the default path,
    /// then to the open policy.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_ACCESS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ACCESS_CONFIG_PATH));
        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(policy) => policy,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %path.display(), "invalid access config, running open");
                    Self::open()
                }
            },
            Err(_) => Self::open(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.allow.is_empty()
    }

    pub fn is_allowed(&self, ip: IpAddr) -> bool {
        if ip.is_loopback() {
            return self.allow_loopback;
        }
        if self.allow.is_empty() {
            return true;
        }
        let rendered = ip.to_string();
        self.allow.iter().any(|entry| {
            let e = entry.trim();
            !e.is_empty()
                && (rendered.eq_ignore_ascii_case(e)
                    || ((e.ends_with('.') || e.ends_with(':'))
                        && rendered.to_ascii_lowercase().starts_with(&e.to_ascii_lowercase())))
        })
    }
}

/// Pick the client address: first `X-Forwarded-For` entry (the service sits
/// behind a proxy in production), else the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or(peer)
}

/// Router middleware enforcing the policy.
pub async fn gate(
    State(policy): State<Arc<AccessPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|c| c.0.ip());
    let ip = client_ip(req.headers(), peer);

    let allowed = match ip {
        Some(ip) => policy.is_allowed(ip),
        // No address information at all (e.g. in-process callers): only an
        // open policy lets the request through.
        None => policy.is_open(),
    };

    if allowed {
        tracing::debug!(ip = ?ip, "access allowed");
        next.run(req).await
    } else {
        tracing::info!(ip = ?ip, "access denied");
        metrics::counter!("access_denied_total").increment(1);
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "access restricted" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn open_policy_admits_everyone() {
        let p = AccessPolicy::open();
        assert!(p.is_allowed(ip("127.0.0.1")));
        assert!(p.is_allowed(ip("203.0.113.9")));
        assert!(p.is_allowed(ip("2001:db8::1")));
    }

    #[test]
    fn allowlist_matches_exact_and_prefix() {
        let p = AccessPolicy::with_allowlist(["203.0.113.7", "10.", "2001:db8:"]);
        assert!(p.is_allowed(ip("203.0.113.7")));
        assert!(!p.is_allowed(ip("203.0.113.8")));
        assert!(p.is_allowed(ip("10.1.2.3")));
        assert!(p.is_allowed(ip("2001:db8::42")));
        assert!(!p.is_allowed(ip("192.168.0.1")));
    }

    #[test]
    fn loopback_always_admitted_even_with_allowlist() {
        let p = AccessPolicy::with_allowlist(["203.0.113.7"]);
        assert!(p.is_allowed(ip("127.0.0.1")));
        assert!(p.is_allowed(ip("::1")));
    }

    #[test]
    fn forwarded_header_wins_over_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.5, 10.0.0.1".parse().unwrap());
        assert_eq!(
            client_ip(&headers, Some(ip("192.168.1.1"))),
            Some(ip("203.0.113.5"))
        );
        assert_eq!(
            client_ip(&HeaderMap::new(), Some(ip("192.168.1.1"))),
            Some(ip("192.168.1.1"))
        );
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }

    #[test]
    fn toml_policy_parses() {
        let p: AccessPolicy = toml::from_str("allow = [\"10.\"]\nallow_loopback = false\n").unwrap();
        assert!(!p.is_allowed(ip("127.0.0.1")));
        assert!(p.is_allowed(ip("10.9.9.9")));
    }
}
