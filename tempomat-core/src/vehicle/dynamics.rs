//! Integer vehicle model
//!
//! Units: position in 0.1 m, velocity in 0.1 m/s, acceleration in
//! 0.1 m/s². Every division truncates toward zero and the intermediate
//! widths (8-bit acceleration, 16-bit position) are part of the model:
//! results must match the reference track simulation exactly.

use super::terrain::TerrainSource;

/// Track length (0.1 m); positions wrap into `[0, TRACK_LEN)`
pub const TRACK_LEN: u16 = 24_000;

/// Deceleration while the brake is pressed (0.1 m/s²)
pub const BRAKE_DECEL: i32 = 50;

/// Vehicle state published by the vehicle task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VehicleState {
    /// Position along the track (0.1 m), always below [`TRACK_LEN`]
    pub position: u16,
    /// Velocity (0.1 m/s), never negative
    pub velocity: u16,
    /// Slope reported by a sensor-driven terrain source, 0 otherwise
    pub slope: u16,
}

/// Air drag: `|v|²/10000 + 1`
///
/// Same value for `v` and `-v`, never below 1.
pub fn wind_factor(velocity: i16) -> i32 {
    let v = i32::from(velocity);
    v * v / 10_000 + 1
}

/// Net acceleration from throttle and total retardation
///
/// Retardation and acceleration are 8-bit quantities: retardation wraps
/// into a `u8` and the difference is reinterpreted as an `i8`.
pub fn acceleration(throttle: u16, retardation: i32) -> i8 {
    let retardation = retardation as u8;
    (i32::from(throttle / 2) - i32::from(retardation)) as i8
}

/// Position after one period of `period_ms`
pub fn adjust_position(position: u16, velocity: i16, acceleration: i8, period_ms: u16) -> u16 {
    let dt = i32::from(period_ms);
    let seconds = dt / 1000;
    let raw = i32::from(position)
        + i32::from(velocity) * dt / 1000
        + i32::from(acceleration) / 2 * seconds * seconds;

    // 16-bit intermediate, then a single modular correction
    let mut next = i32::from(raw as i16);
    let track = i32::from(TRACK_LEN);
    if next >= track {
        next -= track;
    } else if next < 0 {
        next += track;
    }
    next as u16
}

/// Velocity after one period of `period_ms`, floored at 0
pub fn adjust_velocity(velocity: i16, acceleration: i8, brake: bool, period_ms: u16) -> i16 {
    let dt = i32::from(period_ms);
    let v = i32::from(velocity);

    if brake {
        let decel = BRAKE_DECEL * dt / 1000;
        if decel > v {
            0
        } else {
            (v - decel) as i16
        }
    } else {
        let next = (v + i32::from(acceleration) * dt / 1000) as i16;
        next.max(0)
    }
}

/// Vehicle simulator state carried between releases
#[derive(Debug, Clone)]
pub struct VehicleDynamics {
    state: VehicleState,
    period_ms: u16,
}

impl VehicleDynamics {
    /// Create a vehicle standing at the start of the track
    pub fn new(period_ms: u16) -> Self {
        Self {
            state: VehicleState::default(),
            period_ms,
        }
    }

    /// Create a vehicle in a given state
    pub fn with_state(period_ms: u16, state: VehicleState) -> Self {
        let mut state = state;
        state.position %= TRACK_LEN;
        Self { state, period_ms }
    }

    /// Current state
    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Advance one period
    ///
    /// Terrain is sampled at the position *before* the move, and the new
    /// position is integrated from the velocity *before* the update.
    pub fn step<T>(&mut self, throttle: u16, brake: bool, terrain: &mut T) -> VehicleState
    where
        T: TerrainSource + ?Sized,
    {
        let velocity = self.state.velocity as i16;

        let retardation = wind_factor(velocity) + terrain.adjustment(self.state.position);
        let accel = acceleration(throttle, retardation);

        let position = adjust_position(self.state.position, velocity, accel, self.period_ms);
        let velocity = adjust_velocity(velocity, accel, brake, self.period_ms);

        self.state = VehicleState {
            position,
            velocity: velocity as u16,
            slope: terrain.slope().unwrap_or(0),
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::terrain::TerrainProfile;
    use proptest::prelude::*;

    #[test]
    fn test_wind_factor_minimum_is_one() {
        assert_eq!(wind_factor(0), 1);
        assert_eq!(wind_factor(99), 1);
        assert_eq!(wind_factor(100), 2);
        assert_eq!(wind_factor(700), 50);
    }

    #[test]
    fn test_acceleration_truncates_toward_zero() {
        assert_eq!(acceleration(80, 1), 39);
        assert_eq!(acceleration(81, 1), 39);
        assert_eq!(acceleration(0, 1), -1);
    }

    #[test]
    fn test_acceleration_wraps_like_eight_bit_registers() {
        // 1 - 16 wraps to 241 in the retardation register; 40 - 241 = -201
        // wraps back to 55 in the acceleration register.
        assert_eq!(acceleration(80, -15), 55);
        // 300 wraps to 44
        assert_eq!(acceleration(80, 300), -4);
    }

    #[test]
    fn test_reference_start_from_standstill() {
        let mut vehicle = VehicleDynamics::new(100);
        let mut terrain = TerrainProfile;
        let state = vehicle.step(80, false, &mut terrain);
        // acceleration = 80/2 - 1 = 39; 39*100/1000 = 3
        assert_eq!(state.velocity, 3);
        // (100/1000)^2 truncates to 0
        assert_eq!(state.position, 0);
    }

    #[test]
    fn test_position_uses_previous_velocity() {
        let mut vehicle = VehicleDynamics::with_state(
            100,
            VehicleState {
                position: 1_000,
                velocity: 300,
                slope: 0,
            },
        );
        let state = vehicle.step(0, false, &mut TerrainProfile);
        assert_eq!(state.position, 1_030);
        // wind = 9 + 1 = 10, acceleration = -10, -10*100/1000 = -1
        assert_eq!(state.velocity, 299);
    }

    #[test]
    fn test_position_wraps_at_track_end() {
        assert_eq!(adjust_position(23_990, 200, 0, 100), 10);
        assert_eq!(adjust_position(23_980, 200, 0, 100), 0);
        assert_eq!(adjust_position(5, -100, 0, 100), 23_995);
    }

    #[test]
    fn test_position_acceleration_term_with_long_period() {
        // 2 s period: 100 + 10*2000/1000 + (9/2)*2*2 = 100 + 20 + 16
        assert_eq!(adjust_position(100, 10, 9, 2_000), 136);
    }

    #[test]
    fn test_brake_floors_velocity_at_zero() {
        assert_eq!(adjust_velocity(3, 39, true, 100), 0);
        assert_eq!(adjust_velocity(5, 39, true, 100), 0);
        assert_eq!(adjust_velocity(12, 39, true, 100), 7);
    }

    #[test]
    fn test_drag_never_drives_velocity_negative() {
        assert_eq!(adjust_velocity(0, -20, false, 100), 0);
        assert_eq!(adjust_velocity(1, -20, false, 100), 0);
    }

    #[test]
    fn test_brake_ignores_throttle() {
        let mut vehicle = VehicleDynamics::with_state(
            100,
            VehicleState {
                position: 0,
                velocity: 400,
                slope: 0,
            },
        );
        let state = vehicle.step(80, true, &mut TerrainProfile);
        assert_eq!(state.velocity, 395);
    }

    #[test]
    fn test_steep_uphill_slows_vehicle() {
        let start = VehicleState {
            position: 8_500,
            velocity: 200,
            slope: 0,
        };
        let mut flat = VehicleDynamics::with_state(100, VehicleState { position: 500, ..start });
        let mut steep = VehicleDynamics::with_state(100, start);
        let on_flat = flat.step(40, false, &mut TerrainProfile);
        let on_steep = steep.step(40, false, &mut TerrainProfile);
        assert!(on_steep.velocity < on_flat.velocity);
    }

    proptest! {
        #[test]
        fn prop_wind_factor_symmetric(v in -i16::MAX..=i16::MAX) {
            prop_assert_eq!(wind_factor(v), wind_factor(-v));
            prop_assert!(wind_factor(v) >= 1);
        }

        #[test]
        fn prop_state_invariants_hold(
            position in 0u16..TRACK_LEN,
            velocity in 0u16..1_500,
            throttle in 0u16..=80,
            brake in any::<bool>(),
        ) {
            let mut vehicle = VehicleDynamics::with_state(100, VehicleState { position, velocity, slope: 0 });
            let state = vehicle.step(throttle, brake, &mut TerrainProfile);
            prop_assert!(state.position < TRACK_LEN);
            prop_assert!(state.velocity < 0x8000);
        }
    }
}
