use crate::session::tracker::InteractionCounters;

/// Single-shot guard for personalization.
///
/// Fires at most once per session: the first evaluation where the interaction
/// total exceeds the threshold, provided no call is in flight. `fired` is
/// never reset; `in_flight` is cleared by `complete`.
#[derive(Debug)]
pub struct PersonalizationTrigger {
    threshold: u32,
    fired: bool,
    in_flight: bool,
}

impl PersonalizationTrigger {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            fired: false,
            in_flight: false,
        }
    }

    /// Checks and, if the guard passes, arms the trigger in the same call.
    /// Returns `true` exactly when the caller must issue the request.
    pub fn evaluate(&mut self, counters: &InteractionCounters) -> bool {
        if self.fired || self.in_flight || counters.total() <= self.threshold {
            return false;
        }
        self.fired = true;
        self.in_flight = true;
        true
    }

    /// Marks the outstanding call as finished, whatever its result.
    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(scroll_count: u32, click_count: u32) -> InteractionCounters {
        InteractionCounters {
            scroll_count,
            click_count,
        }
    }

    #[test]
    fn test_does_not_fire_at_threshold() {
        let mut trigger = PersonalizationTrigger::new(5);
        assert!(!trigger.evaluate(&counters(3, 2)));
        assert!(!trigger.has_fired());
    }

    #[test]
    fn test_fires_above_threshold() {
        let mut trigger = PersonalizationTrigger::new(5);
        assert!(trigger.evaluate(&counters(4, 2)));
        assert!(trigger.has_fired());
        assert!(trigger.is_in_flight());
    }

    #[test]
    fn test_never_fires_twice() {
        let mut trigger = PersonalizationTrigger::new(5);
        assert!(trigger.evaluate(&counters(6, 0)));
        trigger.complete();

        for extra in 0..50 {
            assert!(!trigger.evaluate(&counters(6 + extra, extra)));
        }
        assert!(!trigger.is_in_flight());
    }

    #[test]
    fn test_in_flight_blocks_even_before_fired_is_observed() {
        let mut trigger = PersonalizationTrigger::new(5);
        assert!(trigger.evaluate(&counters(0, 6)));
        assert!(!trigger.evaluate(&counters(0, 7)));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let mut trigger = PersonalizationTrigger::new(0);
        assert_eq!(trigger.threshold(), 0);
        assert!(trigger.evaluate(&counters(1, 0)));
    }
}
