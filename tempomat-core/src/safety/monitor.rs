//! Watchdog monitor
//!
//! Consumes the outcome of each bounded heartbeat wait and decides whether
//! the system is overloaded. The wait itself (timer + notification) belongs
//! to the scheduler; this type only holds the two-state verdict.

/// Default heartbeat timeout
pub const DEFAULT_TIMEOUT_MS: u32 = 1_000;

/// Result of one bounded wait for a heartbeat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    /// A heartbeat arrived before the timeout
    Heartbeat,
    /// The timeout elapsed without a heartbeat
    TimedOut,
}

/// What to do with the alarm indicators after a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// Assert all alarm indicators
    Raise,
    /// Release all alarm indicators
    Clear,
}

/// Watchdog monitor state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Monitor {
    timeout_ms: u32,
    overloaded: bool,
    timeouts: u32,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

impl Monitor {
    /// Create a monitor that is not overloaded
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            overloaded: false,
            timeouts: 0,
        }
    }

    /// Heartbeat wait timeout in milliseconds
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Check if the system is currently considered overloaded
    pub fn is_overloaded(&self) -> bool {
        self.overloaded
    }

    /// Number of timeouts seen since start
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    /// Apply the outcome of one wait
    ///
    /// Every timeout (re-)raises the alarm. A heartbeat clears it only if it
    /// was raised; otherwise nothing changes.
    pub fn observe(&mut self, outcome: WaitOutcome) -> Option<Alarm> {
        match outcome {
            WaitOutcome::TimedOut => {
                self.overloaded = true;
                self.timeouts = self.timeouts.wrapping_add(1);
                Some(Alarm::Raise)
            }
            WaitOutcome::Heartbeat if self.overloaded => {
                self.overloaded = false;
                Some(Alarm::Clear)
            }
            WaitOutcome::Heartbeat => None,
        }
    }
}
