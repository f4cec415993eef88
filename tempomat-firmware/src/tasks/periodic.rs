//! Drift-free periodic release

use defmt::*;
use embassy_time::{Instant, Timer};

use tempomat_core::task::ReleaseSchedule;

/// Wakes a task at `start + k * period`
///
/// Unlike a plain delay after the task body, a late or long release does
/// not shift the following ones.
pub struct Periodic {
    name: &'static str,
    schedule: ReleaseSchedule,
    overruns: u32,
}

impl Periodic {
    /// Start the grid now; the first release is one period away
    pub fn new(name: &'static str, period_ms: u32) -> Self {
        Self {
            name,
            schedule: ReleaseSchedule::new(period_ms, Instant::now().as_millis()),
            overruns: 0,
        }
    }

    /// Wait for the next release
    pub async fn next(&mut self) {
        let now = Instant::now().as_millis();
        if self.schedule.is_overrun(now) {
            self.overruns = self.overruns.wrapping_add(1);
            trace!(
                "{} task overran its {} ms release ({} total)",
                self.name,
                self.schedule.last_release_ms(),
                self.overruns
            );
        }
        let release = self.schedule.advance();
        Timer::at(Instant::from_millis(release)).await;
    }
}
