//! Inter-task communication channels
//!
//! Every piece of shared state is a single-slot [`LatestChannel`] with one
//! producer: writers overwrite, readers peek, nobody waits. The only
//! blocking hand-off is the canary heartbeat, which the monitor awaits with
//! a timeout.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use tempomat_core::channel::LatestChannel;
use tempomat_core::control::{ControlState, PedalInputs};
use tempomat_core::vehicle::VehicleState;

/// Pedal and cruise-button levels (written by the input task)
pub static PEDALS: LatestChannel<CriticalSectionRawMutex, PedalInputs> =
    LatestChannel::new(PedalInputs {
        gas: false,
        brake: false,
        cruise_button: false,
    });

/// Load selector setting (written by the input task)
pub static LOAD_INPUT: LatestChannel<CriticalSectionRawMutex, u8> = LatestChannel::new(0);

/// Throttle and cruise state (written by the control task)
pub static CONTROL: LatestChannel<CriticalSectionRawMutex, ControlState> =
    LatestChannel::new(ControlState {
        throttle: 0,
        engaged: false,
        cruise_target: 0,
    });

/// Position, velocity and slope (written by the vehicle task)
pub static VEHICLE: LatestChannel<CriticalSectionRawMutex, VehicleState> =
    LatestChannel::new(VehicleState {
        position: 0,
        velocity: 0,
        slope: 0,
    });

/// Overload flag (written by the monitor task)
pub static OVERLOADED: LatestChannel<CriticalSectionRawMutex, bool> = LatestChannel::new(false);

/// Heartbeat from the canary to the monitor
pub static HEARTBEAT: Signal<CriticalSectionRawMutex, ()> = Signal::new();
