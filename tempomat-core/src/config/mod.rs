//! Configuration types
//!
//! Task periods, watchdog timeout and terrain selection, parsed from a small
//! TOML file embedded in the firmware image.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
