//! Board Support Package for the ESP32-C3 IMU devkit.
//!
//! ### I2C Peripherals
//!
//! This board carries the following peripheral on the I2C bus:
//!
//! | Peripheral | Part number | Reference                                                                 | Crate             | Address |
//! | ---------- | ----------- | ------------------------------------------------------------------------- | ----------------- | ------- |
//! | IMU        | MPU-6050    | [Datasheet](https://invensense.tdk.com/download-pdf/mpu-6000-datasheet/)  | `mpu6050` (local) | 0x68    |
//!
//! #### I2C Bus Connection
//!
//! | Signal | GPIO   |
//! | ------ | ------ |
//! | SDA    | GPIO10 |
//! | SCL    | GPIO8  |
//!
//! ### Pulse capture inputs
//!
//! Four capture inputs are claimed at bring-up; see [`crate::capture`] for
//! the pin table.

use core::cell::RefCell;

use embassy_embedded_hal::shared_bus::{self, I2cDeviceError};
use embassy_sync::blocking_mutex::{NoopMutex, raw::NoopRawMutex};
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    i2c::master::{Config, I2c},
    timer::systimer::SystemTimer,
};
use log::info;
use static_cell::StaticCell;

use crate::capture::PulseCapture;

pub type I2cType<'a> = I2c<'a, esp_hal::Blocking>;
pub type I2cBus<'a> = NoopMutex<RefCell<I2cType<'a>>>;
pub type I2cBusDevice<'a> = shared_bus::blocking::i2c::I2cDevice<'a, NoopRawMutex, I2cType<'a>>;
pub type I2cBusDeviceError = I2cDeviceError<esp_hal::i2c::master::Error>;

/// Board-specific peripherals.
pub struct Board {
    /// I2c Bus, shared between peripherals
    pub i2c_bus: &'static I2cBus<'static>,
    /// Pulse capture inputs
    pub capture: PulseCapture,
}

impl Board {
    /// Initialize the board.
    pub fn init() -> Self {
        let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
        let p = esp_hal::init(config);

        info!("{} initialized!", esp_hal::chip!());

        let i2c_bus = {
            static BUS: StaticCell<I2cBus<'static>> = StaticCell::new();
            let i2c = I2c::new(p.I2C0, Config::default())
                .expect("Failed to initialize I2C0")
                .with_scl(p.GPIO8)
                .with_sda(p.GPIO10);
            BUS.init(NoopMutex::new(RefCell::new(i2c)))
        };
        info!("Initialized I2C bus");

        let input_config = InputConfig::default().with_pull(Pull::None);
        let capture = PulseCapture::init([
            Input::new(p.GPIO0, input_config),
            Input::new(p.GPIO1, input_config),
            Input::new(p.GPIO4, input_config),
            Input::new(p.GPIO5, input_config),
        ]);
        info!("Initialized pulse capture inputs");

        let timer0 = SystemTimer::new(p.SYSTIMER);
        esp_hal_embassy::init(timer0.alarm0);
        info!("Initialized Embassy Executor");

        Self { i2c_bus, capture }
    }
}
