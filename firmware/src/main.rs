#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use log::info;

use esp32c3_imu_devkit::{bsp::Board, capture::CHANNEL_COUNT, imu};
use mpu6050::Config as Mpu6050Config;

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    let board = Board::init();

    let imu_actor = imu::spawn_actor(
        spawner,
        imu::Config {
            i2c_bus: board.i2c_bus,
            mpu: Mpu6050Config::default(),
        },
    )
    .expect("failed to spawn imu actor");

    // Poll the sensor ten times a second.
    imu_actor
        .send(imu::Message::Start(Duration::from_millis(100)))
        .await;

    loop {
        for channel in 0..CHANNEL_COUNT {
            info!(
                "Capture input {} is {}",
                channel,
                if board.capture.is_high(channel) {
                    "high"
                } else {
                    "low"
                }
            );
        }
        Timer::after(Duration::from_secs(10)).await;
    }
}
