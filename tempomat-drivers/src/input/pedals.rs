//! Pedal and cruise-button switches

use embedded_hal::digital::InputPin;
use tempomat_core::control::PedalInputs;
use tempomat_core::traits::PedalSource;

/// Gas, brake and cruise switches, all wired active-low
///
/// A pressed switch pulls its pin to ground.
pub struct PedalSwitches<G, B, C> {
    gas: G,
    brake: B,
    cruise: C,
    /// Last successful sample, reused when a read fails
    last: PedalInputs,
}

impl<G, B, C, E> PedalSwitches<G, B, C>
where
    G: InputPin<Error = E>,
    B: InputPin<Error = E>,
    C: InputPin<Error = E>,
{
    /// Create the switch bank, nothing pressed
    pub fn new(gas: G, brake: B, cruise: C) -> Self {
        Self {
            gas,
            brake,
            cruise,
            last: PedalInputs::default(),
        }
    }

    /// Read all three switches
    pub fn read(&mut self) -> Result<PedalInputs, E> {
        let inputs = PedalInputs {
            gas: self.gas.is_low()?,
            brake: self.brake.is_low()?,
            cruise_button: self.cruise.is_low()?,
        };
        self.last = inputs;
        Ok(inputs)
    }

    /// Last successfully read levels
    pub fn last(&self) -> PedalInputs {
        self.last
    }
}

impl<G, B, C, E> PedalSource for PedalSwitches<G, B, C>
where
    G: InputPin<Error = E>,
    B: InputPin<Error = E>,
    C: InputPin<Error = E>,
{
    fn sample(&mut self) -> PedalInputs {
        self.read().unwrap_or(self.last)
    }
}
