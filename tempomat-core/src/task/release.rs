//! Absolute release-time computation

/// Release schedule of one periodic task
///
/// Each release instant is derived from the previous *release*, never from
/// the time the task body finished, so execution-time jitter does not
/// accumulate into drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReleaseSchedule {
    period_ms: u32,
    last_release_ms: u64,
}

impl ReleaseSchedule {
    /// Create a schedule whose first release is `start_ms + period_ms`
    pub const fn new(period_ms: u32, start_ms: u64) -> Self {
        Self {
            period_ms,
            last_release_ms: start_ms,
        }
    }

    /// Instant of the most recent release
    pub fn last_release_ms(&self) -> u64 {
        self.last_release_ms
    }

    /// Advance to the next release and return its absolute instant
    ///
    /// If the task overran and that instant is already in the past the
    /// caller's timer fires immediately; the schedule itself stays on the
    /// original grid.
    pub fn advance(&mut self) -> u64 {
        self.last_release_ms += u64::from(self.period_ms);
        self.last_release_ms
    }

    /// Whether the release after the current one is already due at `now_ms`
    pub fn is_overrun(&self, now_ms: u64) -> bool {
        now_ms >= self.last_release_ms + u64::from(self.period_ms)
    }
}
