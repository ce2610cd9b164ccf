//! TMDB API rate limiter.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Request pacer shared by every call of one client.
///
/// Enforces a minimum interval between consecutive requests and, after an
/// HTTP 429, holds every caller until the cooldown the server asked for has
/// passed. Concurrent list fetches share one limiter, so one throttled
/// request pauses the others too.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Last request timestamp.
    last_request: Option<Instant>,
    /// No request may start before this instant.
    cooldown_until: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
            cooldown_until: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Blocks further requests for `duration` from now.
    ///
    /// A shorter cooldown never shortens one already in effect.
    pub(crate) fn cool_down(&mut self, duration: Duration) {
        let until = Instant::now().checked_add(duration);
        self.cooldown_until = match (self.cooldown_until, until) {
            (Some(current), Some(new)) => Some(current.max(new)),
            (current, new) => new.or(current),
        };
    }

    /// Returns when the next request may start.
    fn next_slot(&self) -> Option<Instant> {
        let interval_slot = self
            .last_request
            .and_then(|last| last.checked_add(self.min_interval));
        match (interval_slot, self.cooldown_until) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Waits until the next request is allowed.
    pub async fn wait(&mut self) {
        if let Some(slot) = self.next_slot() {
            let now = Instant::now();
            if slot > now {
                tokio::time::sleep(slot.saturating_duration_since(now)).await;
            }
        }

        self.cooldown_until = None;
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_first_request_no_wait() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_secs(1));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_rate_limiter_min_interval() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_cool_down_delays_next_request() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::ZERO);
        limiter.cool_down(Duration::from_millis(60));

        // Act
        let start = Instant::now();
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed >= Duration::from_millis(60));
        assert!(limiter.cooldown_until.is_none());
    }

    #[test]
    fn test_shorter_cool_down_keeps_longer_one() {
        // Arrange
        let mut limiter = TmdbRateLimiter::new(Duration::ZERO);
        limiter.cool_down(Duration::from_secs(10));
        let long = limiter.cooldown_until.unwrap();

        // Act
        limiter.cool_down(Duration::from_millis(1));

        // Assert
        assert_eq!(limiter.cooldown_until, Some(long));
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let limiter = TmdbRateLimiter::default_interval();

        // Assert
        assert_eq!(limiter.min_interval, Duration::from_millis(25));
        assert!(limiter.next_slot().is_none());
    }
}
