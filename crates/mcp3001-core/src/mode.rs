//! SPI clock mode flags
//!
//! The bit values match the Linux spidev `SPI_*` mode constants so the set
//! can be handed to `SPI_IOC_WR_MODE32` unchanged.

use bitflags::bitflags;

bitflags! {
    /// SPI clock mode and chip-select behaviour
    ///
    /// The MCP3001 supports modes 0,0 and 1,1. Everything else is exposed
    /// for boards that need it, but will likely break framing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiModeFlags: u32 {
        /// Sample on the trailing clock edge
        const CPHA       = 0x01;
        /// Clock idles high
        const CPOL       = 0x02;
        /// Chip select is active high
        const CS_HIGH    = 0x04;
        /// Shift data least significant bit first
        const LSB_FIRST  = 0x08;
        /// SI/SO signals are shared
        const THREE_WIRE = 0x10;
        /// Loopback mode
        const LOOP       = 0x20;
        /// One device per bus, no chip select
        const NO_CS      = 0x40;
        /// Slave pulls low to pause
        const READY      = 0x80;

        /// Mode 0: CPOL=0, CPHA=0
        const MODE_0 = 0;
        /// Mode 1: CPOL=0, CPHA=1
        const MODE_1 = Self::CPHA.bits();
        /// Mode 2: CPOL=1, CPHA=0
        const MODE_2 = Self::CPOL.bits();
        /// Mode 3: CPOL=1, CPHA=1
        const MODE_3 = Self::CPOL.bits() | Self::CPHA.bits();
    }
}

impl Default for SpiModeFlags {
    fn default() -> Self {
        SpiModeFlags::MODE_0
    }
}

impl SpiModeFlags {
    /// Clock mode number (0-3) formed by CPOL and CPHA
    pub fn clock_mode(&self) -> u8 {
        (self.bits() & Self::MODE_3.bits()) as u8
    }
}
