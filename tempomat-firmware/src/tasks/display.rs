//! Dashboard task
//!
//! Renders the published state into a dashboard frame. The seven-segment
//! and shift-register hardware is not driven here; frames go to the log.

use defmt::*;

use tempomat_core::display::{DisplayFrame, LeftReadout};

use super::Periodic;
use crate::channels::{CONTROL, OVERLOADED, VEHICLE};

#[embassy_executor::task]
pub async fn display_task(readout: LeftReadout, period_ms: u32) {
    info!("Display task started");

    let mut periodic = Periodic::new("display", period_ms);

    loop {
        let frame = DisplayFrame::from_state(CONTROL.peek(), VEHICLE.peek(), readout);
        info!("Display: {} overloaded={=bool}", frame, OVERLOADED.peek());

        periodic.next().await;
    }
}
