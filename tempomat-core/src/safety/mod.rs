//! Overload detection
//!
//! A low-priority canary task proves it is still being scheduled by sending
//! heartbeats; a high-priority monitor declares the system overloaded when
//! those heartbeats stop. The load generator exists to provoke exactly that.

pub mod canary;
pub mod load;
pub mod monitor;

pub use canary::Canary;
pub use load::{load_duration_ms, LoadGenerator, MAX_LOAD_MS};
pub use monitor::{Alarm, Monitor, WaitOutcome};
