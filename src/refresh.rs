//! Countdown shown below the heatmap.
//!
//! The countdown is ticked once per second by its own timer and is only
//! reset when a fetch really hits the network and succeeds.  It is not tied
//! to the data timer, so a failing API leaves it parked on
//! `"Updating data..."` until the next success.

use crate::source::FetchOutcome;
use std::time::Duration;

/// Seconds-to-next-update counter with a floor of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    interval_secs: u64,
    remaining_secs: u64,
    label: String,
}

impl Countdown {
    /// Start a countdown at `interval`.  The label is empty until the
    /// first [`tick`](Self::tick).
    pub fn new(interval: Duration) -> Self {
        let interval_secs = interval.as_secs();
        Self {
            interval_secs,
            remaining_secs: interval_secs,
            label: String::new(),
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// The text to display.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Advance by one second and return the new label.
    pub fn tick(&mut self) -> &str {
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            self.label = format!("Next update in: {} seconds", self.remaining_secs);
        } else {
            self.label = "Updating data...".to_string();
        }
        &self.label
    }

    /// Restart from the full interval.
    pub fn reset(&mut self) {
        self.remaining_secs = self.interval_secs;
    }

    /// Reset only if `outcome` was a real, successful fetch.
    ///
    /// Returns whether the countdown was reset.
    pub fn observe(&mut self, outcome: &FetchOutcome) -> bool {
        if matches!(outcome, FetchOutcome::Fetched) {
            self.reset();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;

    #[test]
    fn ticks_down_to_zero_then_updating() {
        let mut c = Countdown::new(Duration::from_secs(3));
        assert_eq!(c.label(), "");
        assert_eq!(c.tick(), "Next update in: 2 seconds");
        assert_eq!(c.tick(), "Next update in: 1 seconds");
        assert_eq!(c.tick(), "Next update in: 0 seconds");
        assert_eq!(c.tick(), "Updating data...");
        assert_eq!(c.tick(), "Updating data...");
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn only_real_fetch_resets() {
        let mut c = Countdown::new(Duration::from_secs(30));
        for _ in 0..10 {
            c.tick();
        }
        assert_eq!(c.remaining_secs(), 20);

        assert!(!c.observe(&FetchOutcome::Cached));
        assert!(!c.observe(&FetchOutcome::Failed(FetchError::Status(500))));
        assert_eq!(c.remaining_secs(), 20);

        assert!(c.observe(&FetchOutcome::Fetched));
        assert_eq!(c.remaining_secs(), 30);
    }

    #[test]
    fn reset_after_reaching_zero() {
        let mut c = Countdown::new(Duration::from_secs(1));
        c.tick();
        c.tick();
        assert_eq!(c.label(), "Updating data...");
        c.reset();
        assert_eq!(c.tick(), "Next update in: 0 seconds");
    }
}
