//! # Pulse Capture Bring-up Demo
//!
//! Brings the board up, samples the four capture input lines for a while,
//! then releases them again.

#![no_std]
#![no_main]

use core::future::pending;

use esp_backtrace as _;

use embassy_executor::Spawner;
use embassy_time::Timer;
use log::info;

use esp32c3_imu_devkit::{bsp::Board, capture::CHANNEL_COUNT};

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    let board = Board::init();

    for _ in 0..30 {
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
        Timer::after_secs(1).await;
    }

    board.capture.deinit();

    pending().await
}
