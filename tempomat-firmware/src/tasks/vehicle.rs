//! Vehicle dynamics task

use defmt::*;

use tempomat_core::vehicle::{TerrainSource, VehicleDynamics};

use super::Periodic;
use crate::channels::{CONTROL, PEDALS, VEHICLE};

/// Terrain strategy chosen at start-up
pub type Terrain = &'static mut (dyn TerrainSource + Send);

#[embassy_executor::task]
pub async fn vehicle_task(terrain: Terrain, period_ms: u16) {
    info!("Vehicle task started");

    let mut dynamics = VehicleDynamics::new(period_ms);
    let mut periodic = Periodic::new("vehicle", u32::from(period_ms));

    loop {
        let throttle = CONTROL.peek().throttle;
        let brake = PEDALS.peek().brake;

        let state = dynamics.step(throttle, brake, &mut *terrain);
        VEHICLE.overwrite(state);
        trace!("Vehicle: {}", state);

        periodic.next().await;
    }
}
