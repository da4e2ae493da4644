#![no_std]

use ector::mutex::NoopRawMutex;
use embassy_sync::channel::Sender;
use thiserror::Error;

pub mod bsp;
pub mod capture;
pub mod imu;

/// Alias for the actor's inbox
pub type ActorInbox<M> = Sender<'static, NoopRawMutex, M, 10>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Read period {0}ms must be greater than the sample interval {1}ms")]
    InvalidReadPeriod(u64, u64),
    #[error("Failed to initialize IMU: {0:?}")]
    ImuInit(mpu6050::Error<bsp::I2cBusDeviceError>),
}
