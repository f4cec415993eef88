//! Load selector switches

use embedded_hal::digital::InputPin;
use tempomat_core::traits::LoadSource;

/// Number of load selector switches
pub const LOAD_SWITCHES: usize = 8;

/// Eight DIP switches read as one byte, switch 0 is bit 0
///
/// The raw pin level is used: a switch reading high sets its bit.
pub struct LoadSwitches<P> {
    pins: [P; LOAD_SWITCHES],
    last: u8,
}

impl<P: InputPin> LoadSwitches<P> {
    /// Create the switch bank, pins ordered from bit 0 to bit 7
    pub fn new(pins: [P; LOAD_SWITCHES]) -> Self {
        Self { pins, last: 0 }
    }

    /// Read all eight switches
    pub fn read(&mut self) -> Result<u8, P::Error> {
        let mut value = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if pin.is_high()? {
                value |= 1 << bit;
            }
        }
        self.last = value;
        Ok(value)
    }

    /// Last successfully read setting
    pub fn last(&self) -> u8 {
        self.last
    }
}

impl<P: InputPin> LoadSource for LoadSwitches<P> {
    fn sample(&mut self) -> u8 {
        self.read().unwrap_or(self.last)
    }
}
