//! Vehicle dynamics simulation
//!
//! Advances position and velocity once per vehicle-task period from the
//! latest throttle and brake values and the terrain under the car.

pub mod dynamics;
pub mod terrain;

pub use dynamics::{
    acceleration, adjust_position, adjust_velocity, wind_factor, VehicleDynamics, VehicleState,
    BRAKE_DECEL, TRACK_LEN,
};
pub use terrain::{AccelerometerTerrain, TerrainProfile, TerrainSource, SLOPE_MAX};
