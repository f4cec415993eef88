//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! All periodic tasks release on an absolute grid through [`Periodic`].

pub mod canary;
pub mod control;
pub mod display;
pub mod input;
pub mod load;
pub mod monitor;
pub mod periodic;
pub mod vehicle;

pub use canary::canary_task;
pub use control::control_task;
pub use display::display_task;
pub use input::input_task;
pub use load::load_task;
pub use monitor::monitor_task;
pub use periodic::Periodic;
pub use vehicle::{vehicle_task, Terrain};
