//! Per-client access control: a static IP blacklist and a burst limiter.
//!
//! A client that sends `max_requests` requests inside one `window` is
//! blocked for `block`. The request that reaches the limit is itself
//! refused. When the block expires the client starts with a clean history.

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::{ConnectInfo, Extension, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, warn};

use crate::config::AccessConfig;
use crate::metrics;
use crate::state::AppState;

/// Outcome of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Blacklisted,
    RateLimited,
}

#[derive(Debug, Default)]
struct ClientHistory {
    hits: VecDeque<Instant>,
    blocked_at: Option<Instant>,
}

impl ClientHistory {
    fn is_blocked(&self, now: Instant, block: Duration) -> bool {
        self.blocked_at
            .is_some_and(|at| now.saturating_duration_since(at) < block)
    }

    /// Nothing left that could affect a future decision.
    fn is_stale(&self, now: Instant, window: Duration, block: Duration) -> bool {
        !self.is_blocked(now, block)
            && self
                .hits
                .back()
                .map_or(true, |&last| now.saturating_duration_since(last) >= window)
    }
}

#[derive(Default)]
struct ClientTable {
    clients: HashMap<IpAddr, ClientHistory>,
    last_sweep: Option<Instant>,
}

impl ClientTable {
    /// Drop stale clients, at most once per window.
    fn sweep(&mut self, now: Instant, window: Duration, block: Duration) {
        let due = self
            .last_sweep
            .map_or(true, |at| now.saturating_duration_since(at) >= window);
        if !due {
            return;
        }
        self.last_sweep = Some(now);

        let before = self.clients.len();
        self.clients.retain(|_, history| !history.is_stale(now, window, block));
        let removed = before - self.clients.len();
        if removed > 0 {
            debug!(removed, remaining = self.clients.len(), "Dropped idle clients");
        }
    }
}

pub struct AccessGuard {
    blacklist: HashSet<IpAddr>,
    max_requests: usize,
    window: Duration,
    block: Duration,
    table: Mutex<ClientTable>,
}

impl AccessGuard {
    pub fn new(blacklist: HashSet<IpAddr>, max_requests: usize, window: Duration, block: Duration) -> Self {
        Self {
            blacklist,
            max_requests: max_requests.max(1),
            window,
            block,
            table: Mutex::new(ClientTable::default()),
        }
    }

    /// Build from configuration, reading the blacklist file if one is set.
    pub fn from_config(config: &AccessConfig) -> Result<Self> {
        let blacklist = match &config.blacklist_path {
            Some(path) => load_blacklist(path)?,
            None => HashSet::new(),
        };
        info!(
            blacklisted = blacklist.len(),
            max_requests = config.max_requests,
            window_secs = config.window_secs,
            block_secs = config.block_secs,
            "Access guard configured"
        );
        Ok(Self::new(
            blacklist,
            config.max_requests,
            Duration::from_secs(config.window_secs),
            Duration::from_secs(config.block_secs),
        ))
    }

    pub fn is_blacklisted(&self, ip: &IpAddr) -> bool {
        self.blacklist.contains(ip)
    }

    /// Register a request from `ip` arriving at `now`.
    pub fn check(&self, ip: IpAddr, now: Instant) -> AccessDecision {
        if self.is_blacklisted(&ip) {
            return AccessDecision::Blacklisted;
        }

        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        table.sweep(now, self.window, self.block);
        let history = table.clients.entry(ip).or_default();

        if history.blocked_at.is_some() {
            if history.is_blocked(now, self.block) {
                return AccessDecision::RateLimited;
            }
            history.blocked_at = None;
            history.hits.clear();
        }

        while let Some(&oldest) = history.hits.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                history.hits.pop_front();
            } else {
                break;
            }
        }
        history.hits.push_back(now);

        if history.hits.len() >= self.max_requests {
            history.blocked_at = Some(now);
            warn!(client = %ip, block_secs = self.block.as_secs(), "Client blocked for request burst");
            return AccessDecision::RateLimited;
        }

        AccessDecision::Allow
    }

    /// Number of clients with tracked history.
    pub fn tracked_clients(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).clients.len()
    }
}

/// Read a blacklist file: one IP address per line, `#` starts a comment.
pub fn load_blacklist(path: &Path) -> Result<HashSet<IpAddr>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read blacklist: {}", path.display()))?;

    let mut ips = HashSet::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let ip: IpAddr = line
            .parse()
            .with_context(|| format!("{}:{}: invalid IP address '{}'", path.display(), lineno + 1, line))?;
        ips.insert(ip);
    }
    Ok(ips)
}

/// Middleware applying the [`AccessGuard`] to the peer address.
///
/// Requests without connection info (in-process calls) pass through.
pub async fn access_guard(
    Extension(state): Extension<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ConnectInfo(addr)) = connect_info else {
        return next.run(request).await;
    };

    match state.access.check(addr.ip(), Instant::now()) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Blacklisted => {
            metrics::record_access_denied("blacklisted");
            denied(StatusCode::FORBIDDEN, "Forbidden")
        }
        AccessDecision::RateLimited => {
            metrics::record_access_denied("rate_limited");
            denied(StatusCode::TOO_MANY_REQUESTS, "TooManyRequests")
        }
    }
}

fn denied(status: StatusCode, code: &str) -> Response {
    let body = serde_json::json!({
        "code": code,
        "description": status.canonical_reason().unwrap_or_default(),
    });
    (status, [(header::CONTENT_TYPE, "application/json")], body.to_string()).into_response()
}
