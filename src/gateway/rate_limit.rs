//! Fixed-window rate limiting.
//!
//! Per-client counters behind a mutex: the window restarts when it expires,
//! and the request that pushes a client past the cap gets a 429. Applied to
//! every inbound request, including health checks, matching the original
//! service.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::config::RateLimitConfig;

use super::errors::error_response;
use super::server::GatewayState;

/// Counters are pruned once the map grows past this many clients.
const PRUNE_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window per-client rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` and return whether it is allowed.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    /// `check` with an injected clock, for tests.
    fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut clients = self.clients.lock().unwrap();

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        entry.count <= self.max_requests
    }
}

/// Middleware enforcing the rate limit for every request.
pub async fn enforce(
    State(state): State<Arc<GatewayState>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    if state.limiter.check(&client) {
        next.run(req).await
    } else {
        error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests",
            "Please try again later",
        )
    }
}

/// Key requests by client IP when the connection info is available (it is
/// whenever the router is served with connect info; in-process test
/// requests share one bucket).
fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_secs: u64, max_requests: u32) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_secs,
            max_requests,
        })
    }

    #[test]
    fn allows_up_to_the_cap_then_rejects() {
        let limiter = limiter(900, 100);
        for i in 0..100 {
            assert!(limiter.check("1.2.3.4"), "request {i} should pass");
        }
        // The 101st request within the window is rejected.
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = limiter(900, 2);
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = limiter(60, 1);
        let start = Instant::now();
        assert!(limiter.check_at("a", start));
        assert!(!limiter.check_at("a", start + Duration::from_secs(30)));
        // A new window starts once the old one has elapsed.
        assert!(limiter.check_at("a", start + Duration::from_secs(61)));
    }

    #[test]
    fn rejected_requests_still_count_toward_the_window() {
        let limiter = limiter(60, 1);
        let start = Instant::now();
        assert!(limiter.check_at("a", start));
        for i in 1..5 {
            assert!(!limiter.check_at("a", start + Duration::from_secs(i)));
        }
    }
}
