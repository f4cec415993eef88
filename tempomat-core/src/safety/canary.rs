//! Canary: heartbeat source

/// Canary task state
///
/// Remembers when it last ran. A release that comes less than two periods
/// after the previous one means the task was delayed by at most one period
/// and earns a heartbeat; anything later stays silent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Canary {
    period_ms: u32,
    last_release_ms: u64,
    heartbeats: u32,
    skipped: u32,
}

impl Canary {
    /// Create a canary whose previous release is taken as `start_ms`
    pub const fn new(period_ms: u32, start_ms: u64) -> Self {
        Self {
            period_ms,
            last_release_ms: start_ms,
            heartbeats: 0,
            skipped: 0,
        }
    }

    /// Record a release at `now_ms`; returns true if a heartbeat is due
    pub fn on_release(&mut self, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_release_ms);
        self.last_release_ms = now_ms;

        let on_time = elapsed < 2 * u64::from(self.period_ms);
        if on_time {
            self.heartbeats = self.heartbeats.wrapping_add(1);
        } else {
            self.skipped = self.skipped.wrapping_add(1);
        }
        on_time
    }

    /// Heartbeats sent so far
    pub fn heartbeats(&self) -> u32 {
        self.heartbeats
    }

    /// Releases that came too late to send a heartbeat
    pub fn skipped(&self) -> u32 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_time_release_sends_heartbeat() {
        let mut canary = Canary::new(25, 0);
        assert!(canary.on_release(25));
        assert!(canary.on_release(50));
        assert_eq!(canary.heartbeats(), 2);
    }

    #[test]
    fn test_late_by_less_than_a_period_still_sends() {
        let mut canary = Canary::new(25, 0);
        assert!(canary.on_release(49));
    }

    #[test]
    fn test_skipped_period_stays_silent() {
        let mut canary = Canary::new(25, 0);
        assert!(canary.on_release(25));
        assert!(!canary.on_release(75));
        assert_eq!(canary.skipped(), 1);
        // Back on schedule
        assert!(canary.on_release(100));
    }
}
