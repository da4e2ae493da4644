//! Pulse capture input bring-up.
//!
//! Claims the four capture input lines and holds them for the lifetime of
//! the application. The measurement mechanism itself (timer channels, DMA)
//! belongs to the platform and is not modeled here; this module only owns
//! the pin bindings so nothing else can claim them, and releases them on
//! [`PulseCapture::deinit`].
//!
//! #### Capture pin table
//!
//! | Capture channel | GPIO  |
//! | --------------- | ----- |
//! | CH1             | GPIO0 |
//! | CH2             | GPIO1 |
//! | CH3             | GPIO4 |
//! | CH4             | GPIO5 |

use esp_hal::gpio::Input;
use log::info;

/// Number of capture input channels on this board.
pub const CHANNEL_COUNT: usize = 4;

/// The claimed capture input lines.
pub struct PulseCapture {
    channels: [Input<'static>; CHANNEL_COUNT],
}

impl PulseCapture {
    /// Take ownership of the configured capture inputs.
    ///
    /// Called once from [`crate::bsp::Board::init`], which claims the pins
    /// from the table above.
    pub fn init(channels: [Input<'static>; CHANNEL_COUNT]) -> Self {
        Self { channels }
    }

    /// Sample the current level of one capture line.
    pub fn is_high(&self, channel: usize) -> bool {
        self.channels[channel].is_high()
    }

    /// Release the capture inputs, freeing the pins.
    pub fn deinit(self) {
        info!("Released pulse capture inputs");
        drop(self.channels);
    }
}
