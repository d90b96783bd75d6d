// Utility for spacing out requests to the results site.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Enforce a minimum spacing between consecutive events, across all threads sharing this value.
pub struct RateLimiter {
    min_spacing : Duration,
    last : Mutex<Option<Instant>>, // when the last event was allowed to happen.
}

impl RateLimiter {
    pub fn new(min_spacing : Duration) -> Self {
        RateLimiter{ min_spacing, last: Mutex::new(None) }
    }

    /// Block until at least `min_spacing` has passed since the previous call returned.
    /// The lock is held while sleeping, so concurrent callers queue up behind each other.
    pub fn wait(&self) {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(), // only a timestamp, still usable.
        };
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed<self.min_spacing { std::thread::sleep(self.min_spacing-elapsed); }
        }
        *last = Some(Instant::now());
    }
}
