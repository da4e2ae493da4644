//! Blocking MPU6050 driver over an `embedded-hal` I2C device.
//!
//! The driver owns the bus device it is given (typically a shared-bus
//! device guarding the real bus behind a mutex) and issues exactly one
//! blocking transaction per operation. It keeps no sample state between
//! calls; every poll returns an owned reading.
//!
//! The driver is not re-entrant: a `&mut self` receiver on every operation
//! makes concurrent calls from two execution contexts impossible without an
//! outer mutex, and none is taken internally.

use embedded_hal::i2c::I2c;

use crate::{
    ACCEL_CONFIG, ACCEL_XOUT_H, Acceleration, AngularRate, Config, Error, GYRO_CONFIG,
    GYRO_OUTPUT_RATE_HZ, GYRO_XOUT_H, I2C_ADDRESS, PWR_MGMT_1, RawSample, SLEEP_BIT, SMPLRT_DIV,
    TEMP_OUT_H, WHO_AM_I, WHO_AM_I_VALUE,
};

/// MPU6050 blocking I2C driver.
pub struct Mpu6050<I> {
    /// The I2C bus device
    i2c: I,
    /// The configuration written at initialization, kept for scaling
    config: Config,
}

/// Public API
impl<I: I2c> Mpu6050<I> {
    /// Create a new driver instance with the default configuration
    /// (divider 0x07, ±2 g, ±250 deg/s).
    ///
    /// No bus traffic happens here; call [`Mpu6050::init`] before polling.
    pub fn new(i2c: I) -> Mpu6050<I> {
        Self::with_config(i2c, Config::default())
    }

    /// Create a new driver instance with an explicit configuration.
    pub fn with_config(i2c: I, config: Config) -> Mpu6050<I> {
        Mpu6050 { i2c, config }
    }

    /// Identify and configure the device.
    ///
    /// Reads the `WHO_AM_I` register and, only if it matches the expected
    /// identity, wakes the device and writes the sample rate divider and
    /// both full-scale ranges. On an identity mismatch nothing is written
    /// and [`Error::DeviceNotFound`] carries the value that was read.
    pub fn init(&mut self) -> Result<(), Error<I::Error>> {
        let mut id = [0u8; 1];
        self.i2c.write_read(I2C_ADDRESS, &[WHO_AM_I], &mut id)?;
        if id[0] != WHO_AM_I_VALUE {
            return Err(Error::DeviceNotFound(id[0]));
        }

        // Clearing PWR_MGMT_1 drops the SLEEP bit and selects the internal
        // oscillator, taking the device out of its power-on sleep state.
        self.write_register(PWR_MGMT_1, 0x00)?;
        self.write_register(SMPLRT_DIV, self.config.sample_rate_divider)?;
        // Both FS_SEL fields live in bits 4:3 of their config registers.
        self.write_register(ACCEL_CONFIG, (self.config.accel_range as u8) << 3)?;
        self.write_register(GYRO_CONFIG, (self.config.gyro_range as u8) << 3)?;
        Ok(())
    }

    /// Put the device to sleep or wake it back up.
    pub fn set_sleep_enabled(&mut self, sleep: bool) -> Result<(), Error<I::Error>> {
        let value = if sleep { SLEEP_BIT } else { 0x00 };
        self.write_register(PWR_MGMT_1, value)
    }

    /// Read the acceleration on all three axes, in g.
    pub fn read_acceleration(&mut self) -> Result<Acceleration, Error<I::Error>> {
        let raw = self.read_sample(ACCEL_XOUT_H)?;
        let scale = self.config.accel_range.scale();
        Ok(Acceleration {
            x: raw.x as f32 / scale,
            y: raw.y as f32 / scale,
            z: raw.z as f32 / scale,
        })
    }

    /// Read the raw acceleration samples on all three axes.
    pub fn read_acceleration_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        self.read_sample(ACCEL_XOUT_H)
    }

    /// Read the angular rate on all three axes, in deg/s.
    pub fn read_angular_rate(&mut self) -> Result<AngularRate, Error<I::Error>> {
        let raw = self.read_sample(GYRO_XOUT_H)?;
        let scale = self.config.gyro_range.scale();
        Ok(AngularRate {
            x: raw.x as f32 / scale,
            y: raw.y as f32 / scale,
            z: raw.z as f32 / scale,
        })
    }

    /// Read the raw angular rate samples on all three axes.
    pub fn read_angular_rate_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        self.read_sample(GYRO_XOUT_H)
    }

    /// Read the die temperature in degrees Celsius.
    pub fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(I2C_ADDRESS, &[TEMP_OUT_H], &mut buf)?;
        let raw = i16::from_be_bytes(buf);
        // Conversion from register map section 4.18 of the datasheet.
        Ok(raw as f32 / 340.0 + 36.53)
    }

    /// The output data rate selected by the configured divider, in Hz.
    pub fn sample_rate_hz(&self) -> u32 {
        GYRO_OUTPUT_RATE_HZ / (1 + self.config.sample_rate_divider as u32)
    }

    /// The configuration this driver was created with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Release the underlying bus device.
    pub fn release(self) -> I {
        self.i2c
    }
}

/// Private API
impl<I: I2c> Mpu6050<I> {
    /// Read six data registers starting at `start` and decode them as
    /// three big-endian signed 16-bit samples, high byte first.
    ///
    /// The accelerometer and gyroscope blocks share this layout, only the
    /// start register differs.
    fn read_sample(&mut self, start: u8) -> Result<RawSample, Error<I::Error>> {
        let mut buf = [0u8; 6];
        self.i2c.write_read(I2C_ADDRESS, &[start], &mut buf)?;
        Ok(RawSample {
            x: i16::from_be_bytes([buf[0], buf[1]]),
            y: i16::from_be_bytes([buf[2], buf[3]]),
            z: i16::from_be_bytes([buf[4], buf[5]]),
        })
    }

    /// Write one byte to one register.
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.i2c.write(I2C_ADDRESS, &[register, value])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccelRange, GyroRange};
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockError(ErrorKind);

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    /// Scripted bus: records every transaction, serves queued read
    /// payloads in order.
    #[derive(Default)]
    struct MockBus {
        /// Queued payloads for register reads, consumed front to back
        responses: Vec<Vec<u8, 8>, 8>,
        /// Raw frames of every register write, in order
        writes: Vec<Vec<u8, 8>, 8>,
        /// (start register, length) of every register read, in order
        reads: Vec<(u8, usize), 8>,
        /// When set, every transaction fails with this error
        fail: Option<MockError>,
    }

    impl MockBus {
        fn respond(payloads: &[&[u8]]) -> Self {
            let mut bus = Self::default();
            for payload in payloads {
                bus.responses
                    .push(Vec::from_slice(payload).unwrap())
                    .unwrap();
            }
            bus
        }

        fn failing(kind: ErrorKind) -> Self {
            Self {
                fail: Some(MockError(kind)),
                ..Self::default()
            }
        }
    }

    impl ErrorType for MockBus {
        type Error = MockError;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), MockError> {
            assert_eq!(address, I2C_ADDRESS, "unexpected device address");
            if let Some(error) = self.fail {
                return Err(error);
            }
            match operations {
                [Operation::Write(frame)] => {
                    self.writes.push(Vec::from_slice(frame).unwrap()).unwrap();
                }
                [Operation::Write(reg), Operation::Read(buf)] => {
                    assert_eq!(reg.len(), 1, "register address must be one byte");
                    self.reads.push((reg[0], buf.len())).unwrap();
                    let payload = self.responses.remove(0);
                    buf.copy_from_slice(&payload[..buf.len()]);
                }
                _ => panic!("unexpected transaction shape"),
            }
            Ok(())
        }
    }

    #[test]
    fn raw_pairs_decode_as_big_endian_twos_complement() {
        let bus = MockBus::respond(&[&[0x7F, 0xFF, 0x80, 0x00, 0x00, 0x01]]);
        let mut mpu = Mpu6050::new(bus);
        let raw = mpu.read_acceleration_raw().unwrap();
        assert_eq!(raw, RawSample { x: 32767, y: -32768, z: 1 });
    }

    #[test]
    fn init_reads_identity_then_writes_configuration_in_order() {
        let bus = MockBus::respond(&[&[WHO_AM_I_VALUE]]);
        let mut mpu = Mpu6050::new(bus);
        mpu.init().unwrap();

        let bus = mpu.release();
        assert_eq!(bus.reads.as_slice(), &[(WHO_AM_I, 1)]);
        assert_eq!(bus.writes.len(), 4);
        assert_eq!(bus.writes[0].as_slice(), &[PWR_MGMT_1, 0x00]);
        assert_eq!(bus.writes[1].as_slice(), &[SMPLRT_DIV, 0x07]);
        assert_eq!(bus.writes[2].as_slice(), &[ACCEL_CONFIG, 0x00]);
        assert_eq!(bus.writes[3].as_slice(), &[GYRO_CONFIG, 0x00]);
    }

    #[test]
    fn init_rejects_wrong_identity_without_writing() {
        let bus = MockBus::respond(&[&[0x70]]);
        let mut mpu = Mpu6050::new(bus);
        let error = mpu.init().unwrap_err();
        assert!(matches!(error, Error::DeviceNotFound(0x70)));

        let bus = mpu.release();
        assert!(bus.writes.is_empty());
    }

    #[test]
    fn init_writes_non_default_ranges_into_fs_sel_bits() {
        let bus = MockBus::respond(&[&[WHO_AM_I_VALUE]]);
        let config = Config {
            sample_rate_divider: 0x00,
            accel_range: AccelRange::G8,
            gyro_range: GyroRange::Dps1000,
        };
        let mut mpu = Mpu6050::with_config(bus, config);
        mpu.init().unwrap();

        let bus = mpu.release();
        assert_eq!(bus.writes[1].as_slice(), &[SMPLRT_DIV, 0x00]);
        assert_eq!(bus.writes[2].as_slice(), &[ACCEL_CONFIG, 0b10 << 3]);
        assert_eq!(bus.writes[3].as_slice(), &[GYRO_CONFIG, 0b10 << 3]);
    }

    #[test]
    fn acceleration_poll_is_one_six_byte_read_with_default_scaling() {
        let bus = MockBus::respond(&[&[0x40, 0x00, 0x00, 0x00, 0xC0, 0x00]]);
        let mut mpu = Mpu6050::new(bus);
        let accel = mpu.read_acceleration().unwrap();
        assert_eq!(accel.x, 1.0);
        assert_eq!(accel.y, 0.0);
        assert_eq!(accel.z, -1.0);

        let bus = mpu.release();
        assert_eq!(bus.reads.as_slice(), &[(ACCEL_XOUT_H, 6)]);
    }

    #[test]
    fn angular_rate_poll_is_one_six_byte_read_with_default_scaling() {
        // x = 131 raw = 1 deg/s, y = 0, z = -131 raw = -1 deg/s
        let bus = MockBus::respond(&[&[0x00, 0x83, 0x00, 0x00, 0xFF, 0x7D]]);
        let mut mpu = Mpu6050::new(bus);
        let rate = mpu.read_angular_rate().unwrap();
        assert!((rate.x - 1.0).abs() < 1e-6);
        assert_eq!(rate.y, 0.0);
        assert!((rate.z + 1.0).abs() < 1e-6);

        let bus = mpu.release();
        assert_eq!(bus.reads.as_slice(), &[(GYRO_XOUT_H, 6)]);
    }

    #[test]
    fn wider_ranges_change_the_scale_divisor() {
        let bus = MockBus::respond(&[&[0x10, 0x00, 0x00, 0x00, 0x00, 0x00]]);
        let config = Config {
            accel_range: AccelRange::G8,
            ..Config::default()
        };
        let mut mpu = Mpu6050::with_config(bus, config);
        // 0x1000 = 4096 raw = 1 g at ±8 g
        let accel = mpu.read_acceleration().unwrap();
        assert_eq!(accel.x, 1.0);
    }

    #[test]
    fn init_then_poll_end_to_end() {
        let bus = MockBus::respond(&[
            &[WHO_AM_I_VALUE],
            &[0x40, 0x00, 0x00, 0x00, 0xC0, 0x00],
        ]);
        let mut mpu = Mpu6050::new(bus);
        mpu.init().unwrap();
        let accel = mpu.read_acceleration().unwrap();
        assert_eq!((accel.x, accel.y, accel.z), (1.0, 0.0, -1.0));
    }

    #[test]
    fn bus_faults_propagate_with_their_kind() {
        let kind = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        let bus = MockBus::failing(kind);
        let mut mpu = Mpu6050::new(bus);
        let error = mpu.init().unwrap_err();
        match error {
            Error::Bus(MockError(k)) => assert_eq!(k, kind),
            other => panic!("expected bus error, got {other:?}"),
        }
    }

    #[test]
    fn temperature_uses_datasheet_conversion() {
        // raw 0 -> 36.53 C, raw 340 (0x0154) -> 37.53 C
        let bus = MockBus::respond(&[&[0x00, 0x00], &[0x01, 0x54]]);
        let mut mpu = Mpu6050::new(bus);
        assert!((mpu.read_temperature().unwrap() - 36.53).abs() < 1e-4);
        assert!((mpu.read_temperature().unwrap() - 37.53).abs() < 1e-4);

        let bus = mpu.release();
        assert_eq!(bus.reads.as_slice(), &[(TEMP_OUT_H, 2), (TEMP_OUT_H, 2)]);
    }

    #[test]
    fn sleep_control_toggles_the_sleep_bit() {
        let bus = MockBus::default();
        let mut mpu = Mpu6050::new(bus);
        mpu.set_sleep_enabled(true).unwrap();
        mpu.set_sleep_enabled(false).unwrap();

        let bus = mpu.release();
        assert_eq!(bus.writes[0].as_slice(), &[PWR_MGMT_1, SLEEP_BIT]);
        assert_eq!(bus.writes[1].as_slice(), &[PWR_MGMT_1, 0x00]);
    }

    #[test]
    fn sample_rate_follows_the_divider() {
        let mpu = Mpu6050::new(MockBus::default());
        assert_eq!(mpu.sample_rate_hz(), 1000);

        let config = Config {
            sample_rate_divider: 0,
            ..Config::default()
        };
        let mpu = Mpu6050::with_config(MockBus::default(), config);
        assert_eq!(mpu.sample_rate_hz(), 8000);
    }
}
