//! mcp3001-linux-spi - Linux spidev bus controller
//!
//! Exposes a `/dev/spidevX.Y` character device as an
//! [`SpiController`](mcp3001_core::SpiController), so the MCP3001 driver
//! can configure the bus and clock a frame out of the converter.
//!
//! # Example
//!
//! ```no_run
//! use mcp3001_core::{Mcp3001, TransferConfig};
//! use mcp3001_linux_spi::LinuxSpi;
//!
//! let spi = LinuxSpi::open("/dev/spidev0.0")?;
//! let mut adc = Mcp3001::new(spi);
//! let mut config = TransferConfig::default();
//! adc.configure(&mut config)?;
//! println!("{}", adc.read()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y`

pub mod device;
pub mod error;

// Re-exports
pub use device::{LinuxSpi, DEFAULT_DEVICE};
pub use error::{LinuxSpiError, Result};
