//! Input sampling collaborators

use crate::control::PedalInputs;

/// Source of the driver's pedal and cruise-button levels
pub trait PedalSource {
    /// Sample the current level of all three inputs
    fn sample(&mut self) -> PedalInputs;
}

/// Source of the load generator's control input
pub trait LoadSource {
    /// Sample the current load setting (0 = no load)
    fn sample(&mut self) -> u8;
}
