//! Collaborator traits
//!
//! These traits define the interface between the task logic and the
//! board-specific collaborators (timer, switches, LEDs, accelerometer).

pub mod clock;
pub mod indicator;
pub mod input;
pub mod sensor;

pub use clock::Clock;
pub use indicator::Indicator;
pub use input::{LoadSource, PedalSource};
pub use sensor::{Accelerometer, SensorError};
