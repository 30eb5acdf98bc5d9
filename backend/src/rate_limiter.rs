use std::collections::HashMap;
use std::sync::Mutex;
use time::{OffsetDateTime, Duration};
use tracing::{warn, error};
use crate::error::ApiError;

#[derive(Debug)]
struct Failures {
    count: u32,
    first_failure: OffsetDateTime,
}

/// Counts failed attempts per key inside a fixed window. Successful
/// attempts are not counted; callers clear the key instead.
#[derive(Debug)]
pub struct RateLimiter {
    failures: Mutex<HashMap<String, Failures>>,
    max_attempts: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(5, 15)
    }
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window_minutes: i64) -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
            max_attempts,
            window: Duration::minutes(window_minutes),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Failures>>, ApiError> {
        self.failures.lock().map_err(|e| {
            error!("Failed to acquire rate limit lock: {}", e);
            ApiError::Internal("rate limiter unavailable".into())
        })
    }

    pub fn check(&self, key: &str) -> Result<(), ApiError> {
        self.check_at(key, OffsetDateTime::now_utc())
    }

    pub fn check_at(&self, key: &str, now: OffsetDateTime) -> Result<(), ApiError> {
        let mut failures = self.lock()?;
        failures.retain(|_, f| now - f.first_failure <= self.window);

        match failures.get(key) {
            Some(f) if f.attempts_exhausted(self.max_attempts) => {
                let minutes_to_wait = (f.first_failure + self.window - now).whole_minutes().max(1);
                warn!("Rate limit triggered for key {}: wait {} minutes", key, minutes_to_wait);
                Err(ApiError::RateLimited(minutes_to_wait))
            }
            _ => Ok(()),
        }
    }

    pub fn record_failure(&self, key: &str) -> u32 {
        self.record_failure_at(key, OffsetDateTime::now_utc())
    }

    /// Returns how many attempts are left in the current window.
    pub fn record_failure_at(&self, key: &str, now: OffsetDateTime) -> u32 {
        let Ok(mut failures) = self.lock() else {
            return 0;
        };

        let entry = failures.entry(key.to_string()).or_insert(Failures {
            count: 0,
            first_failure: now,
        });
        if now - entry.first_failure > self.window {
            *entry = Failures { count: 0, first_failure: now };
        }
        entry.count += 1;
        self.max_attempts.saturating_sub(entry.count)
    }

    pub fn clear(&self, key: &str) {
        if let Ok(mut failures) = self.lock() {
            failures.remove(key);
        }
    }
}

impl Failures {
    fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.count >= max_attempts
    }
}
