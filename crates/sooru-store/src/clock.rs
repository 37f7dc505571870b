use sooru_core::ClockPort;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Deterministic clock for tests. Every read advances by one millisecond so
/// records saved in sequence get distinct timestamps.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicU64,
}

impl FixedClock {
    #[must_use]
    pub fn starting_at(ms: u64) -> Self {
        Self {
            now: AtomicU64::new(ms),
        }
    }
}

impl ClockPort for FixedClock {
    fn now_unix_ms(&self) -> u64 {
        self.now.fetch_add(1, Ordering::Relaxed)
    }
}
