//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tempomat-core on top of `embedded-hal` 1.0:
//!
//! - Pedal and cruise switches (active-low GPIO)
//! - Load selector DIP switches
//! - LED indicators
//! - MMA8452Q accelerometer (I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod accelerometer;
pub mod indicator;
pub mod input;
