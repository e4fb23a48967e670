//! Bus transfer configuration

use crate::mode::SpiModeFlags;
use core::fmt;

/// Default bits per word
pub const DEFAULT_BITS_PER_WORD: u8 = 8;

/// Default maximum SPI clock speed in Hz (500 kHz)
pub const DEFAULT_SPEED_HZ: u32 = 500_000;

/// Transfer parameters applied to the bus controller
///
/// After [`configure`](crate::controller::configure) returns, the fields
/// hold what the controller actually accepted, not what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Clock mode and chip-select flags
    pub mode: SpiModeFlags,
    /// Bus word width in bits (not the sample width)
    pub bits_per_word: u8,
    /// Maximum clock speed in Hz
    pub max_speed_hz: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            mode: SpiModeFlags::MODE_0,
            bits_per_word: DEFAULT_BITS_PER_WORD,
            max_speed_hz: DEFAULT_SPEED_HZ,
        }
    }
}

impl TransferConfig {
    /// Set the mode flags
    pub fn with_mode(mut self, mode: SpiModeFlags) -> Self {
        self.mode = mode;
        self
    }

    /// Set the bus word width
    pub fn with_bits_per_word(mut self, bits: u8) -> Self {
        self.bits_per_word = bits;
        self
    }

    /// Set the maximum clock speed in Hz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.max_speed_hz = speed_hz;
        self
    }
}

impl fmt::Display for TransferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "spi mode: 0x{:x}", self.mode.bits())?;
        writeln!(f, "bits per word: {}", self.bits_per_word)?;
        write!(
            f,
            "max speed: {} Hz ({} KHz)",
            self.max_speed_hz,
            self.max_speed_hz / 1000
        )
    }
}
