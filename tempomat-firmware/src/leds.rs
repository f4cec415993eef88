//! Dashboard LEDs shared by the control and monitor tasks
//!
//! The LED group is owned by a blocking mutex so both tasks can update
//! their lamp from any executor level.

use core::cell::RefCell;

use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use tempomat_drivers::indicator::DashboardLeds;

/// LED group type on this board
pub type BoardLeds = DashboardLeds<Output<'static>>;

static DASHBOARD: Mutex<CriticalSectionRawMutex, RefCell<Option<BoardLeds>>> =
    Mutex::new(RefCell::new(None));

/// Hand the LED group over before any task runs
pub fn install(leds: BoardLeds) {
    DASHBOARD.lock(|cell| *cell.borrow_mut() = Some(leds));
}

/// Raise or clear the overload alarm
pub fn set_alarm(on: bool) {
    with_leds(|leds| leds.set_alarm(on));
}

/// Mirror the cruise engaged flag
pub fn set_cruise(on: bool) {
    with_leds(|leds| leds.set_cruise(on));
}

fn with_leds(f: impl FnOnce(&mut BoardLeds)) {
    DASHBOARD.lock(|cell| {
        if let Some(leds) = cell.borrow_mut().as_mut() {
            f(leds);
        }
    });
}
