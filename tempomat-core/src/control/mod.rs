//! Cruise and throttle control
//!
//! Turns pedal levels, the cruise button and the measured velocity into a
//! throttle setting once per controller period.

pub mod cruise;

pub use cruise::{
    ControlState, CruiseController, CruiseMode, PedalInputs, DISENGAGE_THRESHOLD, GAS_STEP,
    THROTTLE_MAX,
};
