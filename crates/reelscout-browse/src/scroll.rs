//! Scroll-trigger sensor.
//!
//! Watches the scroll position of a list view and decides when the list
//! should load its next page. Independent of the list's data shape; the
//! caller forwards a `true` from [`ScrollSensor::poll`] to
//! [`PagedList::load_next`](crate::list::PagedList::load_next).

use std::time::{Duration, Instant};

use crate::debounce::Debouncer;

/// Default distance from the bottom that counts as "near", in view units.
pub const DEFAULT_THRESHOLD: u32 = 400;

/// Default trailing debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default delay of the check scheduled on attach.
pub const DEFAULT_MOUNT_DELAY: Duration = Duration::from_millis(100);

/// Default item count past which the scroll-to-top affordance is shown.
pub const DEFAULT_SCROLL_TO_TOP_ITEMS: usize = 20;

/// Scroll geometry of a list view.
///
/// Units are whatever the view measures in (pixels, terminal rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Total content height.
    pub scroll_height: u32,
    /// Offset of the first visible unit.
    pub scroll_top: u32,
    /// Visible height.
    pub client_height: u32,
}

impl ScrollMetrics {
    /// Remaining content below the viewport.
    #[must_use]
    pub const fn distance_to_bottom(&self) -> u32 {
        self.scroll_height
            .saturating_sub(self.scroll_top)
            .saturating_sub(self.client_height)
    }

    /// Whether the viewport is within `threshold` of the bottom.
    #[must_use]
    pub const fn is_near_bottom(&self, threshold: u32) -> bool {
        self.distance_to_bottom() < threshold
    }
}

/// Sensor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Near-bottom distance.
    pub threshold: u32,
    /// Trailing debounce window for scroll events.
    pub debounce: Duration,
    /// Delay of the initial check after attach.
    pub mount_delay: Duration,
    /// Item count past which scroll-to-top is offered.
    pub scroll_to_top_items: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            debounce: DEFAULT_DEBOUNCE,
            mount_delay: DEFAULT_MOUNT_DELAY,
            scroll_to_top_items: DEFAULT_SCROLL_TO_TOP_ITEMS,
        }
    }
}

/// Scroll-trigger sensor for one list view.
#[derive(Debug, Clone)]
pub struct ScrollSensor {
    config: ScrollConfig,
    debouncer: Debouncer,
    metrics: Option<ScrollMetrics>,
    attached: bool,
}

impl Default for ScrollSensor {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollSensor {
    /// Creates a detached sensor.
    #[must_use]
    pub const fn new(config: ScrollConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce),
            config,
            metrics: None,
            attached: false,
        }
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Whether the sensor is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Last recorded metrics.
    #[must_use]
    pub const fn metrics(&self) -> Option<ScrollMetrics> {
        self.metrics
    }

    /// Attaches the sensor and schedules one check after the mount delay,
    /// so a first page that does not fill the view still pulls the next one.
    pub fn attach(&mut self, now: Instant) {
        self.attached = true;
        self.debouncer.arm_after(now, self.config.mount_delay);
    }

    /// Detaches the sensor; later events and polls are ignored.
    pub const fn detach(&mut self) {
        self.attached = false;
        self.metrics = None;
        self.debouncer.cancel();
    }

    /// Records a scroll event and (re)arms the trailing debounce.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Instant) {
        if !self.attached {
            return;
        }
        self.metrics = Some(metrics);
        self.debouncer.arm(now);
    }

    /// Records a layout change (resize, new content) without arming.
    pub const fn observe(&mut self, metrics: ScrollMetrics) {
        if self.attached {
            self.metrics = Some(metrics);
        }
    }

    /// Returns `true` when the list should load its next page.
    ///
    /// Fires at most once per armed deadline, and only while `has_more`
    /// holds and the last metrics are near the bottom.
    pub fn poll(&mut self, now: Instant, has_more: bool) -> bool {
        if !self.attached || !self.debouncer.fire(now) {
            return false;
        }
        let Some(metrics) = self.metrics else {
            return false;
        };
        let trigger = has_more && metrics.is_near_bottom(self.config.threshold);
        if trigger {
            tracing::debug!(
                distance = metrics.distance_to_bottom(),
                threshold = self.config.threshold,
                "near bottom, requesting next page"
            );
        }
        trigger
    }

    /// Whether the scroll-to-top affordance should be shown.
    #[must_use]
    pub const fn show_scroll_to_top(&self, metrics: ScrollMetrics, item_count: usize) -> bool {
        metrics.scroll_top > metrics.client_height || item_count > self.config.scroll_to_top_items
    }
}
