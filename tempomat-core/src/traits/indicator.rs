//! Indicator outputs (LEDs)

/// An on/off indicator
///
/// Implementations drive one or more LEDs. Active-low wiring is the
/// implementation's concern; callers only ever say on or off.
pub trait Indicator {
    /// Turn the indicator on or off
    fn set_on(&mut self, on: bool);

    /// Check if the indicator is currently on
    fn is_on(&self) -> bool;
}
