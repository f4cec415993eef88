//! Board-agnostic core logic for the Tempomat cruise control firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (clock, pedals, indicators, accelerometer)
//! - Latest-value channels shared between tasks
//! - Vehicle dynamics and terrain models
//! - Cruise/throttle controller
//! - Overload detection (canary, watchdog monitor, synthetic load)
//! - Task priority assignment
//! - Dashboard frame formatting
//! - Configuration type definitions and parsing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod control;
pub mod display;
pub mod safety;
pub mod task;
pub mod traits;
pub mod vehicle;
