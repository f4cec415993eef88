//! MMA8452Q 3-axis accelerometer
//!
//! 12-bit accelerometer on I2C, used as the terrain sensor: the Z axis
//! reads 1 g on a level board and less as it tilts.
//!
//! Configuration registers can only be written in standby, so [`init`]
//! drops to standby, writes scale and data rate, then activates.
//!
//! [`init`]: Mma8452q::init

use embedded_hal::i2c::I2c;
use tempomat_core::traits::{Accelerometer, SensorError};

/// Default I2C address (SA0 low)
pub const MMA8452Q_ADDR: u8 = 0x1C;

/// Expected WHO_AM_I value
const DEVICE_ID: u8 = 0x2A;

/// MMA8452Q registers
#[allow(dead_code)]
mod reg {
    pub const STATUS: u8 = 0x00;
    pub const OUT_X_MSB: u8 = 0x01;
    pub const OUT_Y_MSB: u8 = 0x03;
    pub const OUT_Z_MSB: u8 = 0x05;
    pub const WHO_AM_I: u8 = 0x0D;
    pub const XYZ_DATA_CFG: u8 = 0x0E;
    pub const CTRL_REG1: u8 = 0x2A;
}

/// CTRL_REG1 active bit
const CTRL1_ACTIVE: u8 = 0x01;
/// CTRL_REG1 bits kept when changing the data rate (DR2:DR0 are bits 5:3)
const CTRL1_ODR_KEEP: u8 = 0xC7;

/// Full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FullScale {
    /// ±2 g
    #[default]
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
}

impl FullScale {
    fn bits(self) -> u8 {
        match self {
            FullScale::G2 => 0b00,
            FullScale::G4 => 0b01,
            FullScale::G8 => 0b10,
        }
    }

    /// Counts per g for 12-bit samples
    fn counts_per_g(self) -> f32 {
        match self {
            FullScale::G2 => 1024.0,
            FullScale::G4 => 512.0,
            FullScale::G8 => 256.0,
        }
    }
}

/// Output data rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    Hz800,
    Hz400,
    Hz200,
    Hz100,
    #[default]
    Hz50,
    Hz12_5,
    Hz6_25,
    Hz1_56,
}

impl DataRate {
    fn bits(self) -> u8 {
        self as u8
    }
}

/// MMA8452Q driver
pub struct Mma8452q<I2C> {
    i2c: I2C,
    address: u8,
    scale: FullScale,
}

impl<I2C: I2c> Mma8452q<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, MMA8452Q_ADDR)
    }

    /// Create a driver at a specific address (0x1D with SA0 high)
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            scale: FullScale::default(),
        }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Current full-scale range
    pub fn scale(&self) -> FullScale {
        self.scale
    }

    /// Check the device identity and start sampling
    pub fn init(&mut self, scale: FullScale, rate: DataRate) -> Result<(), SensorError> {
        let id = self.read_reg(reg::WHO_AM_I)?;
        if id != DEVICE_ID {
            return Err(SensorError::WrongDevice(id));
        }

        self.standby()?;
        self.write_reg(reg::XYZ_DATA_CFG, scale.bits())?;
        self.scale = scale;

        let ctrl = self.read_reg(reg::CTRL_REG1)?;
        self.write_reg(reg::CTRL_REG1, (ctrl & CTRL1_ODR_KEEP) | (rate.bits() << 3))?;

        self.active()
    }

    /// Enter standby, required before changing configuration
    pub fn standby(&mut self) -> Result<(), SensorError> {
        let ctrl = self.read_reg(reg::CTRL_REG1)?;
        self.write_reg(reg::CTRL_REG1, ctrl & !CTRL1_ACTIVE)
    }

    /// Leave standby and start sampling
    pub fn active(&mut self) -> Result<(), SensorError> {
        let ctrl = self.read_reg(reg::CTRL_REG1)?;
        self.write_reg(reg::CTRL_REG1, ctrl | CTRL1_ACTIVE)
    }

    /// Read all three axes in g
    pub fn read_xyz_g(&mut self) -> Result<[f32; 3], SensorError> {
        let mut buf = [0u8; 6];
        self.read_regs(reg::OUT_X_MSB, &mut buf)?;
        let mut out = [0.0; 3];
        for (axis, bytes) in out.iter_mut().zip(buf.chunks_exact(2)) {
            *axis = self.to_g([bytes[0], bytes[1]]);
        }
        Ok(out)
    }

    /// Convert a left-justified 12-bit sample to g
    fn to_g(&self, bytes: [u8; 2]) -> f32 {
        let raw = i16::from_be_bytes(bytes) >> 4;
        f32::from(raw) / self.scale.counts_per_g()
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.read_regs(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(|_| SensorError::Bus)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> Accelerometer for Mma8452q<I2C> {
    fn read_z_g(&mut self) -> Result<f32, SensorError> {
        let mut buf = [0u8; 2];
        self.read_regs(reg::OUT_Z_MSB, &mut buf)?;
        Ok(self.to_g(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register-file mock of the device with auto-incrementing address
    struct MockBus {
        regs: [u8; 0x32],
        pointer: usize,
        /// Every (register, value) write, in order
        writes: [(u8, u8); 8],
        write_count: usize,
        fail: bool,
    }

    impl MockBus {
        fn new() -> Self {
            let mut regs = [0u8; 0x32];
            regs[reg::WHO_AM_I as usize] = DEVICE_ID;
            Self {
                regs,
                pointer: 0,
                writes: [(0, 0); 8],
                write_count: 0,
                fail: false,
            }
        }

        fn with_z(mut self, z: [u8; 2]) -> Self {
            self.regs[reg::OUT_Z_MSB as usize] = z[0];
            self.regs[reg::OUT_Z_MSB as usize + 1] = z[1];
            self
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail || address != MMA8452Q_ADDR {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&first, rest)) = bytes.split_first() {
                            self.pointer = usize::from(first);
                            for &b in rest {
                                self.regs[self.pointer] = b;
                                self.writes[self.write_count] = (self.pointer as u8, b);
                                self.write_count += 1;
                                self.pointer += 1;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_init_configures_and_activates() {
        let mut accel = Mma8452q::new(MockBus::new());
        accel.init(FullScale::G2, DataRate::Hz50).unwrap();

        let bus = accel.release();
        let ctrl = bus.regs[reg::CTRL_REG1 as usize];
        assert_eq!(ctrl & CTRL1_ACTIVE, CTRL1_ACTIVE);
        assert_eq!((ctrl >> 3) & 0b111, DataRate::Hz50 as u8);
        assert_eq!(bus.regs[reg::XYZ_DATA_CFG as usize], 0b00);

        // Standby comes before the scale write, activation last
        assert_eq!(bus.writes[0], (reg::CTRL_REG1, 0x00));
        assert_eq!(bus.writes[1], (reg::XYZ_DATA_CFG, 0x00));
        assert_eq!(bus.writes[bus.write_count - 1].1 & CTRL1_ACTIVE, CTRL1_ACTIVE);
    }

    #[test]
    fn test_init_rejects_wrong_device() {
        let mut bus = MockBus::new();
        bus.regs[reg::WHO_AM_I as usize] = 0x1A;
        let mut accel = Mma8452q::new(bus);
        assert_eq!(
            accel.init(FullScale::G2, DataRate::Hz50),
            Err(SensorError::WrongDevice(0x1A))
        );
    }

    #[test]
    fn test_bus_error_maps_to_sensor_error() {
        let mut bus = MockBus::new();
        bus.fail = true;
        let mut accel = Mma8452q::new(bus);
        assert_eq!(accel.read_z_g(), Err(SensorError::Bus));
    }

    #[test]
    fn test_one_g_level() {
        // 1024 counts = 0x400, left-justified: 0x4000
        let mut accel = Mma8452q::new(MockBus::new().with_z([0x40, 0x00]));
        assert_eq!(accel.read_z_g(), Ok(1.0));
    }

    #[test]
    fn test_negative_sample() {
        // -512 counts, left-justified: 0xE000
        let mut accel = Mma8452q::new(MockBus::new().with_z([0xE0, 0x00]));
        assert_eq!(accel.read_z_g(), Ok(-0.5));
    }

    #[test]
    fn test_scale_changes_resolution() {
        let mut accel = Mma8452q::new(MockBus::new().with_z([0x40, 0x00]));
        accel.init(FullScale::G8, DataRate::Hz100).unwrap();
        assert_eq!(accel.scale(), FullScale::G8);
        assert_eq!(accel.read_z_g(), Ok(4.0));
    }

    #[test]
    fn test_read_all_axes() {
        let mut bus = MockBus::new().with_z([0x40, 0x00]);
        bus.regs[reg::OUT_X_MSB as usize] = 0x20;
        let mut accel = Mma8452q::new(bus);
        assert_eq!(accel.read_xyz_g(), Ok([0.5, 0.0, 1.0]));
    }
}
