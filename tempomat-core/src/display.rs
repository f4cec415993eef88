//! Display frame formatting
//!
//! Builds what the dashboard shows from the published state: a four-digit
//! seven-segment string and a 24-LED bar marking the position on the track.
//! Driving the actual segments and shift registers is the display
//! collaborator's job.

use core::fmt::Write;

use heapless::String;

use crate::control::ControlState;
use crate::vehicle::{VehicleState, TRACK_LEN};

/// Number of LEDs in the position bar
pub const POSITION_LEDS: u16 = 24;

/// Track distance covered by one LED (0.1 m)
pub const LED_SPAN: u16 = TRACK_LEN / POSITION_LEDS;

/// What the left digit pair shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LeftReadout {
    /// Current throttle
    #[default]
    Throttle,
    /// Slope measured by the terrain sensor
    Slope,
}

/// One dashboard frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Seven-segment text, always four ASCII digits
    pub digits: String<4>,
    /// Position bar, one bit per LED, LED 0 is bit 0 of byte 0
    pub leds: [u8; 3],
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "digits={=str} leds={=[u8]:b}",
            self.digits.as_str(),
            &self.leds[..]
        )
    }
}

impl DisplayFrame {
    /// Render `left` (mod 100) followed by the velocity in m/s (mod 100)
    pub fn render(left: u16, velocity: u16, position: u16) -> Self {
        let mut digits = String::new();
        // Two 2-digit fields always fit in four bytes
        let _ = write!(digits, "{:02}{:02}", left % 100, (velocity / 10) % 100);

        let led = (position / LED_SPAN).min(POSITION_LEDS - 1);
        let mut leds = [0u8; 3];
        leds[usize::from(led / 8)] |= 1 << (led % 8);

        Self { digits, leds }
    }

    /// Render a frame from the published controller and vehicle state
    pub fn from_state(control: ControlState, vehicle: VehicleState, readout: LeftReadout) -> Self {
        let left = match readout {
            LeftReadout::Throttle => control.throttle,
            LeftReadout::Slope => vehicle.slope,
        };
        Self::render(left, vehicle.velocity, vehicle.position)
    }

    /// Index of the lit position LED
    pub fn lit_led(&self) -> Option<u8> {
        self.leds
            .iter()
            .enumerate()
            .find(|(_, byte)| **byte != 0)
            .map(|(i, byte)| (i * 8) as u8 + byte.trailing_zeros() as u8)
    }
}
