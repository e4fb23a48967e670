//! CLI argument parsing

use clap::Parser;
use mcp3001_core::config::{DEFAULT_BITS_PER_WORD, DEFAULT_SPEED_HZ};
use mcp3001_core::{SpiModeFlags, TransferConfig};
use mcp3001_linux_spi::DEFAULT_DEVICE;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser, Debug)]
#[command(name = "mcp3001")]
#[command(author, version, about = "Read one 10-bit sample from an MCP3001 ADC", long_about = None)]
pub struct Cli {
    /// SPI device to use (or dummy[:options] for the emulator)
    #[arg(short = 'D', long, default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Max speed (Hz)
    #[arg(short, long, default_value_t = DEFAULT_SPEED_HZ, value_parser = parse_hex_u32)]
    pub speed: u32,

    /// Bits per word
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_WORD)]
    pub bpw: u8,

    /// Clock polarity, idle high (default: idle low)
    #[arg(short = 'O', long)]
    pub cpol: bool,

    /// Clock phase, sample on trailing edge (default: leading)
    #[arg(short = 'H', long)]
    pub cpha: bool,

    /// Least significant bit first
    #[arg(short = 'L', long)]
    pub lsb: bool,

    /// Chip select active high
    #[arg(short = 'C', long)]
    pub cs_high: bool,

    /// SI/SO signals shared
    #[arg(short = '3', long = "3wire")]
    pub three_wire: bool,

    /// No chip select
    #[arg(short = 'N', long)]
    pub no_cs: bool,

    /// Slave pulls low to pause
    #[arg(short = 'R', long)]
    pub ready: bool,

    /// Verbosity level (-v prints config and raw frame, -vv, -vvv add logging)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Mode flags selected on the command line
    pub fn mode(&self) -> SpiModeFlags {
        let mut mode = SpiModeFlags::MODE_0;
        mode.set(SpiModeFlags::CPOL, self.cpol);
        mode.set(SpiModeFlags::CPHA, self.cpha);
        mode.set(SpiModeFlags::LSB_FIRST, self.lsb);
        mode.set(SpiModeFlags::CS_HIGH, self.cs_high);
        mode.set(SpiModeFlags::THREE_WIRE, self.three_wire);
        mode.set(SpiModeFlags::NO_CS, self.no_cs);
        mode.set(SpiModeFlags::READY, self.ready);
        mode
    }

    /// Requested transfer configuration
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig::default()
            .with_mode(self.mode())
            .with_bits_per_word(self.bpw)
            .with_speed(self.speed)
    }
}
