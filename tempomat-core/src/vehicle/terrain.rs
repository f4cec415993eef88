//! Terrain sources
//!
//! The terrain contributes a gradient term to the vehicle's retardation.
//! Which source is used is decided once at start-up from configuration.

use super::dynamics::TRACK_LEN;
use crate::traits::Accelerometer;

/// Upper clamp of the accelerometer-derived slope
pub const SLOPE_MAX: u16 = 90;

/// Strategy producing the gradient adjustment under the vehicle
pub trait TerrainSource {
    /// Gradient adjustment at `position`, added to the drag term
    ///
    /// Takes `&mut self` because sensor-driven sources sample on every call.
    fn adjustment(&mut self, position: u16) -> i32;

    /// Slope last measured by a sensor-driven source
    fn slope(&self) -> Option<u16> {
        None
    }
}

/// Static track profile: six equal segments
///
/// flat / up / steep up / flat / down / steep down
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainProfile;

impl TerrainProfile {
    /// Gradient adjustment of each segment, in track order
    pub const SEGMENTS: [i32; 6] = [0, 8, 16, 0, -8, -16];

    /// Length of one segment (0.1 m)
    pub const SEGMENT_LEN: u16 = TRACK_LEN / 6;

    /// Adjustment at `position`
    pub fn adjustment_at(position: u16) -> i32 {
        let segment = usize::from(position / Self::SEGMENT_LEN).min(Self::SEGMENTS.len() - 1);
        Self::SEGMENTS[segment]
    }
}

impl TerrainSource for TerrainProfile {
    fn adjustment(&mut self, position: u16) -> i32 {
        Self::adjustment_at(position)
    }
}

/// Slope measured from the board's tilt
///
/// The Z axis is low-pass filtered (`acc += alpha * (z - acc)`) and mapped to
/// `(1.05 - acc) * 90`, clamped to `[0, SLOPE_MAX]`. A failed read keeps the
/// previous filter state.
pub struct AccelerometerTerrain<A> {
    sensor: A,
    alpha: f32,
    filtered_g: f32,
    slope: u16,
}

impl<A: Accelerometer> AccelerometerTerrain<A> {
    /// Default filter coefficient
    pub const DEFAULT_ALPHA: f32 = 0.2;

    /// Create a terrain source with the default filter coefficient
    pub fn new(sensor: A) -> Self {
        Self::with_alpha(sensor, Self::DEFAULT_ALPHA)
    }

    /// Create a terrain source with filter coefficient `alpha` (0..=1)
    pub fn with_alpha(sensor: A, alpha: f32) -> Self {
        Self {
            sensor,
            alpha: alpha.clamp(0.0, 1.0),
            filtered_g: 1.0,
            slope: 0,
        }
    }

    /// Filtered Z-axis reading in g
    pub fn filtered_g(&self) -> f32 {
        self.filtered_g
    }

    fn sample(&mut self) {
        if let Ok(z) = self.sensor.read_z_g() {
            self.filtered_g += self.alpha * (z - self.filtered_g);
        }
        let slope = (1.05 - self.filtered_g) * 90.0;
        self.slope = slope.clamp(0.0, SLOPE_MAX as f32) as u16;
    }
}

impl<A: Accelerometer> TerrainSource for AccelerometerTerrain<A> {
    fn adjustment(&mut self, _position: u16) -> i32 {
        self.sample();
        i32::from(self.slope)
    }

    fn slope(&self) -> Option<u16> {
        Some(self.slope)
    }
}
