//! Input sampling task
//!
//! Samples the pedal switches and the load selector and publishes them.

use defmt::*;
use embassy_rp::gpio::Input;

use tempomat_core::traits::{LoadSource, PedalSource};
use tempomat_drivers::input::{LoadSwitches, PedalSwitches};

use super::Periodic;
use crate::channels::{LOAD_INPUT, PEDALS};

/// Pedal switches on this board
pub type BoardPedals = PedalSwitches<Input<'static>, Input<'static>, Input<'static>>;

/// Load selector on this board
pub type BoardLoadSwitches = LoadSwitches<Input<'static>>;

#[embassy_executor::task]
pub async fn input_task(mut pedals: BoardPedals, mut load: BoardLoadSwitches, period_ms: u32) {
    info!("Input task started");

    let mut periodic = Periodic::new("input", period_ms);
    let mut last_load = 0u8;

    loop {
        PEDALS.overwrite(pedals.sample());

        let setting = load.sample();
        if setting != last_load {
            debug!("Load setting {=u8} -> {=u8}", last_load, setting);
            last_load = setting;
        }
        LOAD_INPUT.overwrite(setting);

        periodic.next().await;
    }
}
