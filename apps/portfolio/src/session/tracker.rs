use serde::Serialize;

/// Coarse engagement counts for one page session. Only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InteractionCounters {
    pub scroll_count: u32,
    pub click_count: u32,
}

impl InteractionCounters {
    pub fn total(&self) -> u32 {
        self.scroll_count.saturating_add(self.click_count)
    }
}

/// Counts scroll and click events. Every event counts; there is no debouncing.
#[derive(Debug, Default)]
pub struct InteractionTracker {
    counters: InteractionCounters,
    scroll_depth: f64,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one scroll event and the page's scroll depth at that moment
    /// (fraction 0-1, clamped). Non-finite depths keep the previous value.
    pub fn record_scroll(&mut self, depth: f64) {
        self.counters.scroll_count = self.counters.scroll_count.saturating_add(1);
        if depth.is_finite() {
            self.scroll_depth = depth.clamp(0.0, 1.0);
        }
    }

    pub fn record_click(&mut self) {
        self.counters.click_count = self.counters.click_count.saturating_add(1);
    }

    pub fn counters(&self) -> InteractionCounters {
        self.counters
    }

    pub fn scroll_depth(&self) -> f64 {
        self.scroll_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_event_increments_by_one() {
        let mut tracker = InteractionTracker::new();
        tracker.record_scroll(0.1);
        tracker.record_scroll(0.2);
        tracker.record_click();

        assert_eq!(
            tracker.counters(),
            InteractionCounters {
                scroll_count: 2,
                click_count: 1
            }
        );
        assert_eq!(tracker.counters().total(), 3);
    }

    #[test]
    fn test_scroll_depth_is_clamped() {
        let mut tracker = InteractionTracker::new();
        tracker.record_scroll(1.7);
        assert_eq!(tracker.scroll_depth(), 1.0);
        tracker.record_scroll(-0.3);
        assert_eq!(tracker.scroll_depth(), 0.0);
    }

    #[test]
    fn test_nan_depth_keeps_previous_value_but_still_counts() {
        let mut tracker = InteractionTracker::new();
        tracker.record_scroll(0.4);
        tracker.record_scroll(f64::NAN);
        assert_eq!(tracker.scroll_depth(), 0.4);
        assert_eq!(tracker.counters().scroll_count, 2);
    }

    #[test]
    fn test_total_saturates() {
        let counters = InteractionCounters {
            scroll_count: u32::MAX,
            click_count: 3,
        };
        assert_eq!(counters.total(), u32::MAX);
    }
}
