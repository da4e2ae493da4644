//! Blocking I2C driver for the InvenSense MPU6050 6-axis IMU.
//!
//! The MPU6050 combines a 3-axis accelerometer and a 3-axis gyroscope behind
//! a register-addressed I2C interface. This driver covers device
//! identification, wake-up and full-scale configuration, and single-shot
//! polling of both sensors, converting the raw two's-complement samples into
//! physical units (g and deg/s).
//!
//! The driver is written against the [`embedded_hal::i2c::I2c`] trait, so it
//! works with any HAL that implements it. Every operation is a single
//! blocking bus transaction and every operation returns a [`Result`]; there
//! is no retry or recovery policy built in, callers decide what to do with a
//! failed poll.

#![no_std]

use thiserror::Error;

pub mod blocking;

pub use blocking::Mpu6050;

/// 7-bit I2C address of the MPU6050 with AD0 pulled low.
///
/// Datasheets and vendor code often quote the 8-bit write address 0xD0;
/// `embedded-hal` uses the 7-bit convention, 0xD0 >> 1.
pub const I2C_ADDRESS: u8 = 0x68;

/// Expected value of the [`WHO_AM_I`] register.
pub const WHO_AM_I_VALUE: u8 = 104;

/// Sample rate divider register (`SMPLRT_DIV`).
pub const SMPLRT_DIV: u8 = 0x19;
/// Gyroscope full-scale configuration register (`GYRO_CONFIG`).
pub const GYRO_CONFIG: u8 = 0x1B;
/// Accelerometer full-scale configuration register (`ACCEL_CONFIG`).
pub const ACCEL_CONFIG: u8 = 0x1C;
/// First of the six accelerometer data registers (`ACCEL_XOUT_H`).
pub const ACCEL_XOUT_H: u8 = 0x3B;
/// First of the two temperature data registers (`TEMP_OUT_H`).
pub const TEMP_OUT_H: u8 = 0x41;
/// First of the six gyroscope data registers (`GYRO_XOUT_H`).
pub const GYRO_XOUT_H: u8 = 0x43;
/// Power management register (`PWR_MGMT_1`), holds the SLEEP bit.
pub const PWR_MGMT_1: u8 = 0x6B;
/// Device identity register (`WHO_AM_I`).
pub const WHO_AM_I: u8 = 0x75;

/// SLEEP bit of [`PWR_MGMT_1`].
pub const SLEEP_BIT: u8 = 1 << 6;

/// Gyroscope output rate with the digital low-pass filter disabled, in Hz.
/// The sample rate divider divides this rate down.
pub const GYRO_OUTPUT_RATE_HZ: u32 = 8_000;

/// Driver errors.
///
/// Transport faults are carried as [`Error::Bus`] and keep the HAL's error
/// value, so a NACK stays distinguishable from a timeout through
/// [`embedded_hal::i2c::Error::kind`] or the HAL's own error enum.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// Communication error on the I2C bus.
    #[error("bus error: {0:?}")]
    Bus(E),
    /// The identity register did not match [`WHO_AM_I_VALUE`]; contains the
    /// value actually read. No configuration is written in this case.
    #[error("unexpected identity register value {0:#04x}")]
    DeviceNotFound(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// The possible values of the `AFS_SEL` field of [`ACCEL_CONFIG`].
///
/// The variant value is the raw field value; it is shifted into bits 4:3 on
/// write. Each range has a fixed sensitivity in LSB per g.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AccelRange {
    /// ±2 g, 16384 LSB/g
    #[default]
    G2 = 0b00,
    /// ±4 g, 8192 LSB/g
    G4 = 0b01,
    /// ±8 g, 4096 LSB/g
    G8 = 0b10,
    /// ±16 g, 2048 LSB/g
    G16 = 0b11,
}

impl AccelRange {
    /// Sensitivity of this range in LSB per g.
    pub fn scale(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// The possible values of the `FS_SEL` field of [`GYRO_CONFIG`].
///
/// The variant value is the raw field value; it is shifted into bits 4:3 on
/// write. Each range has a fixed sensitivity in LSB per deg/s.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GyroRange {
    /// ±250 deg/s, 131 LSB/(deg/s)
    #[default]
    Dps250 = 0b00,
    /// ±500 deg/s, 65.5 LSB/(deg/s)
    Dps500 = 0b01,
    /// ±1000 deg/s, 32.8 LSB/(deg/s)
    Dps1000 = 0b10,
    /// ±2000 deg/s, 16.4 LSB/(deg/s)
    Dps2000 = 0b11,
}

impl GyroRange {
    /// Sensitivity of this range in LSB per deg/s.
    pub fn scale(self) -> f32 {
        match self {
            GyroRange::Dps250 => 131.0,
            GyroRange::Dps500 => 65.5,
            GyroRange::Dps1000 => 32.8,
            GyroRange::Dps2000 => 16.4,
        }
    }
}

/// Device configuration written by [`Mpu6050::init`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sample rate divider. The output rate is
    /// [`GYRO_OUTPUT_RATE_HZ`] / (1 + divider); the default of 0x07 selects
    /// 1 kHz.
    pub sample_rate_divider: u8,
    /// Accelerometer full-scale range.
    pub accel_range: AccelRange,
    /// Gyroscope full-scale range.
    pub gyro_range: GyroRange,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate_divider: 0x07,
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
        }
    }
}

/// One raw sample per axis, as read from the data registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Acceleration per axis in g.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Angular rate per axis in deg/s.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AngularRate {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_device_defaults() {
        let config = Config::default();
        assert_eq!(config.sample_rate_divider, 0x07);
        assert_eq!(config.accel_range, AccelRange::G2);
        assert_eq!(config.gyro_range, GyroRange::Dps250);
    }

    #[test]
    fn accel_scale_table() {
        assert_eq!(AccelRange::G2.scale(), 16384.0);
        assert_eq!(AccelRange::G4.scale(), 8192.0);
        assert_eq!(AccelRange::G8.scale(), 4096.0);
        assert_eq!(AccelRange::G16.scale(), 2048.0);
    }

    #[test]
    fn gyro_scale_table() {
        assert_eq!(GyroRange::Dps250.scale(), 131.0);
        assert_eq!(GyroRange::Dps500.scale(), 65.5);
        assert_eq!(GyroRange::Dps1000.scale(), 32.8);
        assert_eq!(GyroRange::Dps2000.scale(), 16.4);
    }

    #[test]
    fn address_is_shifted_datasheet_address() {
        assert_eq!(I2C_ADDRESS, 0xD0 >> 1);
    }
}
