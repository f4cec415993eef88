//! Switch inputs
//!
//! GPIO switch banks sampled by the input task: the driver's pedals and
//! cruise button, and the DIP switches that set the synthetic load.

pub mod load;
pub mod pedals;

pub use load::{LoadSwitches, LOAD_SWITCHES};
pub use pedals::PedalSwitches;
