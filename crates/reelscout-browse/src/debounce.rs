//! Deadline-based trailing debounce.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer driven by caller-supplied instants.
///
/// Every [`arm`](Self::arm) pushes the deadline out by the window, so a burst
/// of events fires once, `window` after the last one. The caller polls with
/// [`fire`](Self::fire); nothing here sleeps or spawns.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period required before firing.
    window: Duration,
    /// Pending deadline, if armed.
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates a disarmed debouncer.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Quiet period.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// (Re)arms the debouncer to fire `window` after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.arm_after(now, self.window);
    }

    /// (Re)arms the debouncer to fire `delay` after `now`.
    pub fn arm_after(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now.checked_add(delay).unwrap_or(now));
    }

    /// Drops the pending deadline.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` once when the deadline has passed, disarming it.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const WINDOW: Duration = Duration::from_millis(200);

    #[test]
    fn test_disarmed_never_fires() {
        // Arrange
        let mut debouncer = Debouncer::new(WINDOW);

        // Act & Assert
        assert!(!debouncer.fire(Instant::now() + Duration::from_secs(60)));
        assert!(!debouncer.is_armed());
    }

    #[test]
    fn test_fires_once_after_window() {
        // Arrange
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(t0);

        // Act & Assert
        assert!(!debouncer.fire(t0 + Duration::from_millis(199)));
        assert!(debouncer.fire(t0 + WINDOW));
        assert!(!debouncer.fire(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn test_rearm_pushes_deadline() {
        // Arrange
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(t0);

        // Act
        debouncer.arm(t0 + Duration::from_millis(150));

        // Assert
        assert!(!debouncer.fire(t0 + Duration::from_millis(250)));
        assert!(debouncer.fire(t0 + Duration::from_millis(350)));
    }

    #[test]
    fn test_cancel() {
        // Arrange
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm_after(t0, Duration::from_millis(100));

        // Act
        debouncer.cancel();

        // Assert
        assert!(debouncer.deadline().is_none());
        assert!(!debouncer.fire(t0 + Duration::from_secs(1)));
    }
}
