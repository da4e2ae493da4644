//! # IMU Sensor Demo
//!
//! This demo reads the accelerometer and gyroscope data from the MPU6050 sensor.
//! It uses an actor to poll the sensor every 100 milliseconds for one minute,
//! then puts the sensor to sleep.

#![no_std]
#![no_main]

use core::future::pending;

use esp_backtrace as _;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp32c3_imu_devkit::{
    bsp::Board,
    imu::{self, Message},
};
use mpu6050::{AccelRange, Config as Mpu6050Config, GyroRange};

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    let board = Board::init();

    let config = imu::Config {
        i2c_bus: board.i2c_bus,
        // 1 kHz output rate at the most sensitive ranges.
        mpu: Mpu6050Config {
            sample_rate_divider: 0x07,
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
        },
    };
    let actor = imu::spawn_actor(spawner, config).expect("failed to spawn imu actor");

    // Start the actor to read the sensor every 100 milliseconds.
    actor.send(Message::Start(Duration::from_millis(100))).await;

    // Stop the actor after 60 seconds and put the sensor to sleep.
    Timer::after_secs(60).await;
    actor.send(Message::Stop).await;
    actor.send(Message::Sleep(true)).await;

    pending().await
}
