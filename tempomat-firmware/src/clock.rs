//! Embassy time as a [`Clock`]

use embassy_time::Instant;
use tempomat_core::traits::Clock;

/// Milliseconds since boot from the embassy time driver
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
