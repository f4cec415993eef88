//! Overload canary task
//!
//! Runs at the lowest priority. While it keeps getting released on time it
//! sends a heartbeat to the monitor; when starved it goes quiet.

use defmt::*;
use embassy_time::Instant;

use tempomat_core::safety::Canary;

use super::Periodic;
use crate::channels::HEARTBEAT;

#[embassy_executor::task]
pub async fn canary_task(period_ms: u32) {
    info!("Canary task started");

    let mut periodic = Periodic::new("canary", period_ms);
    let mut canary = Canary::new(period_ms, Instant::now().as_millis());

    loop {
        periodic.next().await;

        if canary.on_release(Instant::now().as_millis()) {
            HEARTBEAT.signal(());
        } else {
            debug!("Canary late, heartbeat skipped ({} so far)", canary.skipped());
        }
    }
}
