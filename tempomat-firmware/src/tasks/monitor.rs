//! Watchdog monitor task
//!
//! Waits for canary heartbeats with a bounded timeout and drives the alarm
//! LEDs from the result.

use defmt::*;
use embassy_time::{with_timeout, Duration};

use tempomat_core::safety::{Alarm, Monitor, WaitOutcome};

use crate::channels::{HEARTBEAT, OVERLOADED};
use crate::leds;

#[embassy_executor::task]
pub async fn monitor_task(timeout_ms: u32) {
    info!("Monitor task started");

    let mut monitor = Monitor::new(timeout_ms);
    let timeout = Duration::from_millis(u64::from(timeout_ms));

    loop {
        let outcome = match with_timeout(timeout, HEARTBEAT.wait()).await {
            Ok(()) => WaitOutcome::Heartbeat,
            Err(_) => WaitOutcome::TimedOut,
        };

        match monitor.observe(outcome) {
            Some(Alarm::Raise) => {
                warn!(
                    "No heartbeat for {=u32} ms, system overloaded ({=u32} timeouts)",
                    timeout_ms,
                    monitor.timeouts()
                );
                leds::set_alarm(true);
                OVERLOADED.overwrite(true);
            }
            Some(Alarm::Clear) => {
                info!("Heartbeat restored, overload cleared");
                leds::set_alarm(false);
                OVERLOADED.overwrite(false);
            }
            None => {}
        }
    }
}
