//! System clock adapter

use apiprobe_application::ports::Clock;
use chrono::{DateTime, Utc};

/// Wall-clock time, used by the response-time assertions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
