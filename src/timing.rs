//! Stage timing.

use std::time::Instant;

use tracing::debug;

/// A simple timer for measuring pipeline stage durations.
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        debug!("stage '{}' started", name);
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Finish the timer and print the elapsed time.
    pub fn finish(self) {
        let secs = self.start.elapsed().as_secs_f64();
        if secs >= 60.0 {
            println!("  [{:.1}m] {}", secs / 60.0, self.name);
        } else {
            println!("  [{:.1}s] {}", secs, self.name);
        }
    }
}
