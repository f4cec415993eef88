//! Cruise control state machine
//!
//! Two modes, `Off` and `Engaged`. Each release applies, in this order:
//!
//! 1. cruise button held while `Off`: capture the current velocity as the
//!    target and engage
//! 2. velocity at or below [`DISENGAGE_THRESHOLD`]: disengage
//! 3. gas: raise throttle by [`GAS_STEP`] (saturating), disengage
//! 4. else brake: throttle to 0, disengage
//! 5. else engaged: bang-bang toward the target
//! 6. else: hold the previous throttle
//!
//! Step 2 only forces the mode; the throttle chain (3..6) still runs, so the
//! driver can accelerate from standstill. Since step 2 leaves the controller
//! `Off`, step 5 can never fire below the threshold.
//!
//! The button is level-sampled: holding it does not move the target while
//! engaged, but re-arms it on the first release after anything disengaged.

/// Throttle ceiling
pub const THROTTLE_MAX: u16 = 80;

/// Throttle increase per controller release while gas is pressed
pub const GAS_STEP: u16 = 2;

/// Velocity (0.1 m/s) at or below which cruise control cannot stay engaged
pub const DISENGAGE_THRESHOLD: u16 = 250;

/// Sampled pedal and button levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PedalInputs {
    /// Gas pedal pressed
    pub gas: bool,
    /// Brake pedal pressed
    pub brake: bool,
    /// Cruise button pressed
    pub cruise_button: bool,
}

/// Cruise control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CruiseMode {
    /// Throttle follows the pedals only
    #[default]
    Off,
    /// Throttle holds the captured target velocity
    Engaged,
}

/// Controller output published every release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    /// Throttle, always in `0..=THROTTLE_MAX`
    pub throttle: u16,
    /// Cruise control engaged
    pub engaged: bool,
    /// Target velocity; meaningless while not engaged
    pub cruise_target: u16,
}

/// Cruise/throttle controller
#[derive(Debug, Clone, Default)]
pub struct CruiseController {
    mode: CruiseMode,
    throttle: u16,
    cruise_target: u16,
}

impl CruiseController {
    /// Create a controller in `Off` mode with zero throttle
    pub const fn new() -> Self {
        Self {
            mode: CruiseMode::Off,
            throttle: 0,
            cruise_target: 0,
        }
    }

    /// Current mode
    pub fn mode(&self) -> CruiseMode {
        self.mode
    }

    /// Current output
    pub fn state(&self) -> ControlState {
        ControlState {
            throttle: self.throttle,
            engaged: self.mode == CruiseMode::Engaged,
            cruise_target: self.cruise_target,
        }
    }

    /// Run one controller release
    pub fn step(&mut self, inputs: PedalInputs, velocity: u16) -> ControlState {
        if inputs.cruise_button && self.mode == CruiseMode::Off {
            self.cruise_target = velocity;
            self.mode = CruiseMode::Engaged;
        }

        if velocity <= DISENGAGE_THRESHOLD {
            self.mode = CruiseMode::Off;
        }

        if inputs.gas {
            self.throttle = self.throttle.saturating_add(GAS_STEP).min(THROTTLE_MAX);
            self.mode = CruiseMode::Off;
        } else if inputs.brake {
            self.throttle = 0;
            self.mode = CruiseMode::Off;
        } else if self.mode == CruiseMode::Engaged {
            // Bang-bang: full throttle below target, none at or above
            self.throttle = if velocity < self.cruise_target {
                THROTTLE_MAX
            } else {
                0
            };
        }

        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GAS: PedalInputs = PedalInputs {
        gas: true,
        brake: false,
        cruise_button: false,
    };
    const BRAKE: PedalInputs = PedalInputs {
        gas: false,
        brake: true,
        cruise_button: false,
    };
    const BUTTON: PedalInputs = PedalInputs {
        gas: false,
        brake: false,
        cruise_button: true,
    };
    const IDLE: PedalInputs = PedalInputs {
        gas: false,
        brake: false,
        cruise_button: false,
    };

    fn engaged_at(velocity: u16) -> CruiseController {
        let mut controller = CruiseController::new();
        let state = controller.step(BUTTON, velocity);
        assert!(state.engaged);
        controller
    }

    #[test]
    fn test_initial_state() {
        let controller = CruiseController::new();
        assert_eq!(controller.mode(), CruiseMode::Off);
        assert_eq!(controller.state(), ControlState::default());
    }

    #[test]
    fn test_gas_accelerates_from_standstill() {
        let mut controller = CruiseController::new();
        assert_eq!(controller.step(GAS, 0).throttle, 2);
        assert_eq!(controller.step(GAS, 0).throttle, 4);
    }

    #[test]
    fn test_throttle_saturates() {
        let mut controller = CruiseController::new();
        for _ in 0..100 {
            controller.step(GAS, 300);
        }
        assert_eq!(controller.state().throttle, THROTTLE_MAX);
    }

    #[test]
    fn test_single_brake_tick_zeroes_throttle() {
        let mut controller = CruiseController::new();
        for _ in 0..10 {
            controller.step(GAS, 300);
        }
        assert_eq!(controller.step(BRAKE, 300).throttle, 0);
    }

    #[test]
    fn test_gas_dominates_brake() {
        let mut controller = CruiseController::new();
        let both = PedalInputs {
            gas: true,
            brake: true,
            cruise_button: false,
        };
        assert_eq!(controller.step(both, 300).throttle, GAS_STEP);
        assert_eq!(controller.step(both, 300).throttle, 2 * GAS_STEP);
    }

    #[test]
    fn test_engage_captures_target() {
        let controller = engaged_at(400);
        assert_eq!(controller.state().cruise_target, 400);
    }

    #[test]
    fn test_cannot_engage_below_threshold() {
        let mut controller = CruiseController::new();
        let state = controller.step(BUTTON, DISENGAGE_THRESHOLD);
        assert!(!state.engaged);
    }

    #[test]
    fn test_low_velocity_disengages_regardless_of_button() {
        let mut controller = engaged_at(400);
        let state = controller.step(BUTTON, DISENGAGE_THRESHOLD);
        assert!(!state.engaged);
        let state = controller.step(IDLE, 100);
        assert!(!state.engaged);
    }

    #[test]
    fn test_bang_bang_holds_target() {
        let mut controller = engaged_at(400);
        assert_eq!(controller.step(IDLE, 399).throttle, THROTTLE_MAX);
        assert_eq!(controller.step(IDLE, 400).throttle, 0);
        assert_eq!(controller.step(IDLE, 450).throttle, 0);
        assert_eq!(controller.step(IDLE, 380).throttle, THROTTLE_MAX);
        assert!(controller.state().engaged);
    }

    #[test]
    fn test_held_button_does_not_move_target_while_engaged() {
        let mut controller = engaged_at(400);
        controller.step(BUTTON, 500);
        assert_eq!(controller.state().cruise_target, 400);
    }

    #[test]
    fn test_brake_disengages() {
        let mut controller = engaged_at(400);
        let state = controller.step(BRAKE, 400);
        assert!(!state.engaged);
        assert_eq!(state.throttle, 0);
    }

    #[test]
    fn test_gas_disengages() {
        let mut controller = engaged_at(400);
        let state = controller.step(GAS, 400);
        assert!(!state.engaged);
    }

    #[test]
    fn test_idle_holds_throttle_when_off() {
        let mut controller = CruiseController::new();
        for _ in 0..5 {
            controller.step(GAS, 300);
        }
        assert_eq!(controller.step(IDLE, 300).throttle, 10);
        assert_eq!(controller.step(IDLE, 300).throttle, 10);
    }

    #[test]
    fn test_held_button_rearms_after_brake() {
        let mut controller = engaged_at(400);
        let held_with_brake = PedalInputs {
            gas: false,
            brake: true,
            cruise_button: true,
        };
        assert!(!controller.step(held_with_brake, 380).engaged);
        let state = controller.step(BUTTON, 360);
        assert!(state.engaged);
        assert_eq!(state.cruise_target, 360);
    }

    proptest! {
        #[test]
        fn prop_throttle_always_in_range(
            steps in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0u16..1_000), 1..200)
        ) {
            let mut controller = CruiseController::new();
            for (gas, brake, cruise_button, velocity) in steps {
                let state = controller.step(PedalInputs { gas, brake, cruise_button }, velocity);
                prop_assert!(state.throttle <= THROTTLE_MAX);
                if velocity <= DISENGAGE_THRESHOLD {
                    prop_assert!(!state.engaged);
                }
            }
        }
    }
}
