//! Accelerometer drivers

pub mod mma8452q;

pub use mma8452q::{DataRate, FullScale, Mma8452q, MMA8452Q_ADDR};
