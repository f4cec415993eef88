//! GPIO LED indicators
//!
//! Single LEDs driven directly from a GPIO pin, and the three-LED dashboard
//! group that carries both the overload alarm and the cruise lamp.

use embedded_hal::digital::OutputPin;
use tempomat_core::traits::Indicator;

/// GPIO LED
///
/// The pin can be configured as active-high (default) or active-low.
pub struct LedIndicator<P> {
    pin: P,
    /// If true, LED ON = pin LOW
    inverted: bool,
    /// Current logical state (true = lit)
    on: bool,
}

impl<P: OutputPin> LedIndicator<P> {
    /// Create a new LED indicator, initially off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the LED is lit when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            on: false,
        };
        led.set_on(false);
        led
    }

    /// Create a new LED wired active-high
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new LED wired active-low
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Drive the pin, reporting the pin error if there is one
    pub fn try_set_on(&mut self, on: bool) -> Result<(), P::Error> {
        if on != self.inverted {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }
}

impl<P: OutputPin> Indicator for LedIndicator<P> {
    fn set_on(&mut self, on: bool) {
        // RP2040 GPIO writes cannot fail; other HALs keep the old state
        let _ = self.try_set_on(on);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Green, yellow and red dashboard LEDs
///
/// All three light while the overload alarm is raised. The yellow LED
/// doubles as the cruise lamp, so it stays lit if either is active.
pub struct DashboardLeds<P> {
    green: LedIndicator<P>,
    yellow: LedIndicator<P>,
    red: LedIndicator<P>,
    alarm: bool,
    cruise: bool,
}

impl<P: OutputPin> DashboardLeds<P> {
    /// Create the LED group with everything off
    pub fn new(green: LedIndicator<P>, yellow: LedIndicator<P>, red: LedIndicator<P>) -> Self {
        let mut leds = Self {
            green,
            yellow,
            red,
            alarm: false,
            cruise: false,
        };
        leds.refresh();
        leds
    }

    /// Raise or clear the overload alarm
    pub fn set_alarm(&mut self, on: bool) {
        self.alarm = on;
        self.refresh();
    }

    /// Mirror the cruise engaged flag
    pub fn set_cruise(&mut self, on: bool) {
        self.cruise = on;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.green.set_on(self.alarm);
        self.red.set_on(self.alarm);
        self.yellow.set_on(self.alarm || self.cruise);
    }
}
