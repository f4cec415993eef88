//! Synthetic CPU load
//!
//! Burns CPU for a duration set by a live input so the overload detector
//! can be exercised on real hardware.

use crate::traits::Clock;

/// Longest busy-wait a single release can request
pub const MAX_LOAD_MS: u32 = u8::MAX as u32 / 10;

/// Busy-wait duration for a load setting: `input / 10` ms
///
/// Monotonic in `input` and never above [`MAX_LOAD_MS`].
pub fn load_duration_ms(input: u8) -> u32 {
    u32::from(input) / 10
}

/// Load generator task state
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadGenerator {
    last_input: u8,
    burned_ms: u64,
}

impl LoadGenerator {
    /// Create an idle load generator
    pub const fn new() -> Self {
        Self {
            last_input: 0,
            burned_ms: 0,
        }
    }

    /// Input seen on the previous release
    pub fn last_input(&self) -> u8 {
        self.last_input
    }

    /// Total busy time so far
    pub fn burned_ms(&self) -> u64 {
        self.burned_ms
    }

    /// Busy-wait for the duration requested by `input`
    ///
    /// Returns the time actually spent, measured on `clock`.
    pub fn burn<C: Clock + ?Sized>(&mut self, clock: &C, input: u8) -> u64 {
        self.last_input = input;
        let duration = u64::from(load_duration_ms(input));
        let start = clock.now_ms();
        while clock.elapsed_since(start) < duration {
            core::hint::spin_loop();
        }
        let spent = clock.elapsed_since(start);
        self.burned_ms = self.burned_ms.saturating_add(spent);
        spent
    }
}
