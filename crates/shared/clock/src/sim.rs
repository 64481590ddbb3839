use std::sync::Mutex;

use chrono::Duration;
use hermes_core::Timestamp;
use hermes_ports::Clock;

/// Simulated clock: frozen at an instant until explicitly moved
///
/// Used wherever tests need to control the calendar - most importantly
/// settlement, where delivery lags are whole-day counts.
pub struct SimClock {
    now: Mutex<Timestamp>,
}

impl SimClock {
    /// Create a clock frozen at the given instant
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now += by;
    }

    /// Jump the clock to an absolute instant
    pub fn set(&self, to: Timestamp) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now = to;
    }
}

impl Clock for SimClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().expect("clock poisoned")
    }

    fn name(&self) -> &str {
        "SimClock"
    }
}
