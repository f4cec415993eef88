//! Accelerometer trait

/// Errors that can occur while reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (I2C NACK, arbitration loss, ...)
    Bus,
    /// Device answered with an unexpected identity
    WrongDevice(u8),
    /// Device is present but not producing samples
    NotReady,
}

/// Trait for accelerometers used as a terrain sensor
///
/// Only the Z axis matters: on a level road it reads 1 g and the reading
/// drops as the board tilts.
pub trait Accelerometer {
    /// Read the Z-axis acceleration in g
    ///
    /// Takes `&mut self` because bus reads require mutable access.
    fn read_z_g(&mut self) -> Result<f32, SensorError>;
}
