/*
 * Responsibility
 * - Fixed-window request counting per {route class, client key}
 * - Atomic admit/reject decisions under one lock (no await while held)
 * - Lazy window reset on access; opportunistic GC of stale keys
 */
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub max_requests: u32,
    pub window: Duration,
}

/// Per-route-class budgets: tight for login/register, looser for general
/// traffic, bounded for expensive (AI-task) routes.
#[derive(Debug, Clone, Copy)]
pub struct RouteQuotas {
    pub login: Quota,
    pub general: Quota,
    pub expensive: Quota,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Login,
    General,
    Expensive,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Login => "login",
            RouteClass::General => "general",
            RouteClass::Expensive => "expensive",
        }
    }
}

impl RouteQuotas {
    pub fn for_class(&self, class: RouteClass) -> Quota {
        match class {
            RouteClass::Login => self.login,
            RouteClass::General => self.general,
            RouteClass::Expensive => self.expensive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    Allowed { remaining: u32 },
    Rejected { retry_after: Duration },
}

impl Acquire {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Acquire::Allowed { .. })
    }
}

#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
    length: Duration,
}

// Above this many live keys, a lock-holder sweeps out elapsed windows.
const GC_THRESHOLD: usize = 4096;

/// In-memory fixed-window limiter. Owned state inside `AppState`, never a
/// process global; swap the store for a shared cache in a distributed
/// deployment.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, class: RouteClass, key: &str, quota: Quota) -> Acquire {
        self.try_acquire_at(class, key, quota, Instant::now())
    }

    /// Count this request against the window for `{class}:{key}`.
    ///
    /// The whole read-reset-increment sequence runs under the lock, so two
    /// interleaved requests can never both take the last slot. Window reset
    /// is lazy: evaluated here on access, never by a background sweep.
    pub fn try_acquire_at(
        &self,
        class: RouteClass,
        key: &str,
        quota: Quota,
        now: Instant,
    ) -> Acquire {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() > GC_THRESHOLD {
            windows.retain(|_, w| now.saturating_duration_since(w.started_at) < w.length);
        }

        let window = windows
            .entry(format!("{}:{}", class.as_str(), key))
            .or_insert(Window {
                count: 0,
                started_at: now,
                length: quota.window,
            });

        if now.saturating_duration_since(window.started_at) >= quota.window {
            window.count = 0;
            window.started_at = now;
            window.length = quota.window;
        }

        if window.count < quota.max_requests {
            window.count += 1;
            Acquire::Allowed {
                remaining: quota.max_requests - window.count,
            }
        } else {
            Acquire::Rejected {
                retry_after: quota
                    .window
                    .saturating_sub(now.saturating_duration_since(window.started_at)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    fn quota(max_requests: u32, window_secs: u64) -> Quota {
        Quota {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    #[test]
    fn budget_is_enforced_per_key() {
        let limiter = RateLimiter::new();
        let quota = quota(3, 60);

        for _ in 0..3 {
            assert!(
                limiter
                    .try_acquire(RouteClass::Login, "10.0.0.1", quota)
                    .is_allowed()
            );
        }

        match limiter.try_acquire(RouteClass::Login, "10.0.0.1", quota) {
            Acquire::Rejected { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn keys_and_classes_are_independent() {
        let limiter = RateLimiter::new();
        let quota = quota(1, 60);

        assert!(
            limiter
                .try_acquire(RouteClass::Login, "10.0.0.1", quota)
                .is_allowed()
        );
        assert!(
            !limiter
                .try_acquire(RouteClass::Login, "10.0.0.1", quota)
                .is_allowed()
        );

        // Other clients and other route classes keep their own windows.
        assert!(
            limiter
                .try_acquire(RouteClass::Login, "10.0.0.2", quota)
                .is_allowed()
        );
        assert!(
            limiter
                .try_acquire(RouteClass::General, "10.0.0.1", quota)
                .is_allowed()
        );
    }

    #[test]
    fn window_resets_lazily() {
        let limiter = RateLimiter::new();
        let quota = quota(2, 60);
        let start = Instant::now();

        assert!(
            limiter
                .try_acquire_at(RouteClass::General, "k", quota, start)
                .is_allowed()
        );
        assert!(
            limiter
                .try_acquire_at(RouteClass::General, "k", quota, start)
                .is_allowed()
        );
        assert!(
            !limiter
                .try_acquire_at(RouteClass::General, "k", quota, start)
                .is_allowed()
        );

        // Next access after the window elapsed starts a fresh count.
        let later = start + Duration::from_secs(61);
        assert!(
            limiter
                .try_acquire_at(RouteClass::General, "k", quota, later)
                .is_allowed()
        );
    }

    #[test]
    fn concurrent_acquires_admit_exactly_the_budget() {
        let limiter = Arc::new(RateLimiter::new());
        let quota = quota(8, 60);
        let contenders = 16;
        let barrier = Arc::new(Barrier::new(contenders));

        let handles: Vec<_> = (0..contenders)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    limiter
                        .try_acquire(RouteClass::General, "shared", quota)
                        .is_allowed()
                })
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(admitted, 8);
    }
}
