//! Persistence counter with an irreversible alert latch.

/// Debounce that needs `limit` net deviating decisions before latching.
///
/// The counter climbs on deviating ticks and decays on quiet ones, so a short
/// burst never reaches the limit. Once latched the flag stays set until
/// [`HysteresisLatch::reset`], whatever the counter does afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HysteresisLatch {
    limit: u32,
    counter: u32,
    latched: bool,
}

impl HysteresisLatch {
    /// Create a latch that fires after `limit` net deviating ticks
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero
    #[must_use]
    pub fn new(limit: u32) -> Self {
        assert!(limit > 0, "Persist limit must be greater than 0");
        Self {
            limit,
            counter: 0,
            latched: false,
        }
    }

    /// Fold one decision into the counter and return whether the latch is set
    pub fn update(&mut self, deviating: bool) -> bool {
        if deviating {
            self.counter = (self.counter + 1).min(self.limit);
        } else {
            self.counter = self.counter.saturating_sub(1);
        }

        if self.counter >= self.limit {
            self.latched = true;
        }

        self.latched
    }

    /// Current persistence counter, always within `[0, limit]`
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Whether the alert has latched
    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Counter value at which the latch fires
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Clear the counter and the latch
    pub fn reset(&mut self) {
        self.counter = 0;
        self.latched = false;
    }
}
