use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::warn;

/// Fixed-window per-IP request limiter covering the whole API prefix.
/// Entries whose window has fully elapsed are swept out at most once per
/// window, so the map stays bounded by the set of recently active IPs.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    hits: Mutex<Hits>,
}

struct Hits {
    windows: HashMap<IpAddr, WindowState>,
    last_sweep: Instant,
}

struct WindowState {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests: max_requests.max(1),
            hits: Mutex::new(Hits {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Register one hit; false when the caller exhausted the current window.
    pub fn allow(&self, ip: IpAddr) -> bool {
        self.allow_at(ip, Instant::now())
    }

    fn allow_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut hits = self.hits.lock();

        if now.duration_since(hits.last_sweep) >= self.window {
            let window = self.window;
            hits.windows
                .retain(|_, state| now.duration_since(state.started) < window);
            hits.last_sweep = now;
        }

        let state = hits.windows.entry(ip).or_insert(WindowState {
            started: now,
            count: 0,
        });

        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }

        state.count += 1;
        state.count <= self.max_requests
    }

    #[cfg(test)]
    fn tracked_ips(&self) -> usize {
        self.hits.lock().windows.len()
    }
}

pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(limiter): Extension<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.allow(addr.ip()) {
        warn!("Rate limit exceeded for {}", addr.ip());
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "error": "Too many requests from this IP, please try again later.",
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip() -> IpAddr {
        "10.0.0.1".parse().unwrap()
    }

    #[test]
    fn allows_up_to_threshold_within_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let start = Instant::now();
        assert!(limiter.allow_at(ip(), start));
        assert!(limiter.allow_at(ip(), start));
        assert!(limiter.allow_at(ip(), start));
        assert!(!limiter.allow_at(ip(), start));
    }

    #[test]
    fn window_resets_after_elapsing() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        assert!(limiter.allow_at(ip(), start));
        assert!(!limiter.allow_at(ip(), start));
        assert!(limiter.allow_at(ip(), start + Duration::from_secs(61)));
    }

    #[test]
    fn expired_entries_are_evicted_not_just_reset() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let start = Instant::now();

        for octet in 0..200u8 {
            let client: IpAddr = std::net::Ipv4Addr::new(10, 1, 0, octet).into();
            assert!(limiter.allow_at(client, start));
        }
        assert_eq!(limiter.tracked_ips(), 200);

        // One request after the window elapses sweeps every stale entry.
        assert!(limiter.allow_at(ip(), start + Duration::from_secs(61)));
        assert_eq!(limiter.tracked_ips(), 1);
    }

    #[test]
    fn sweep_keeps_entries_whose_window_is_still_open() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let start = Instant::now();
        let other: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.allow_at(ip(), start));
        assert!(limiter.allow_at(other, start + Duration::from_secs(45)));

        // Sweep at t+61 drops the first window but not the one opened at t+45.
        assert!(limiter.allow_at(ip(), start + Duration::from_secs(61)));
        assert_eq!(limiter.tracked_ips(), 2);
    }

    #[test]
    fn tracks_ips_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        let other: IpAddr = "10.0.0.2".parse().unwrap();
        assert!(limiter.allow_at(ip(), start));
        assert!(limiter.allow_at(other, start));
        assert!(!limiter.allow_at(ip(), start));
    }
}
