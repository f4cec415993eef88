//! Synthetic load task
//!
//! Busy-waits every release for as long as the load selector asks, so the
//! canary can be starved on purpose.

use defmt::*;

use tempomat_core::safety::LoadGenerator;

use super::Periodic;
use crate::channels::LOAD_INPUT;
use crate::clock::EmbassyClock;

#[embassy_executor::task]
pub async fn load_task(period_ms: u32) {
    info!("Load task started");

    let mut periodic = Periodic::new("load", period_ms);
    let mut generator = LoadGenerator::new();

    loop {
        let input = LOAD_INPUT.peek();
        let spent = generator.burn(&EmbassyClock, input);
        if input != 0 {
            trace!("Load burned {=u64} ms for setting {=u8}", spent, input);
        }

        periodic.next().await;
    }
}
