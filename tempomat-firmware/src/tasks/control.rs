//! Cruise/throttle controller task

use defmt::*;

use tempomat_core::control::{CruiseController, CruiseMode};

use super::Periodic;
use crate::channels::{CONTROL, PEDALS, VEHICLE};
use crate::leds;

#[embassy_executor::task]
pub async fn control_task(period_ms: u32) {
    info!("Control task started");

    let mut controller = CruiseController::new();
    let mut periodic = Periodic::new("control", period_ms);

    loop {
        let previous = controller.mode();
        let inputs = PEDALS.peek();
        let velocity = VEHICLE.peek().velocity;

        let state = controller.step(inputs, velocity);
        CONTROL.overwrite(state);
        leds::set_cruise(state.engaged);

        match (previous, controller.mode()) {
            (CruiseMode::Off, CruiseMode::Engaged) => {
                info!("Cruise engaged at {=u16}", state.cruise_target);
            }
            (CruiseMode::Engaged, CruiseMode::Off) => {
                info!("Cruise disengaged at {=u16}", velocity);
            }
            _ => {}
        }

        periodic.next().await;
    }
}
