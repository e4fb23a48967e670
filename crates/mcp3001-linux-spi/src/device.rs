//! Linux SPI device implementation
//!
//! This module provides the `LinuxSpi` struct that implements the
//! `SpiController` trait using Linux's spidev interface.

use crate::error::{LinuxSpiError, Result};

use mcp3001_core::{SpiController, SpiModeFlags};

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;

/// Device opened when none is given
pub const DEFAULT_DEVICE: &str = "/dev/spidev0.0";

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_read;
    use nix::ioctl_write_ptr;

    // SPI ioctl magic number
    const SPI_IOC_MAGIC: u8 = b'k';

    // SPI ioctl type numbers
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;
    const SPI_IOC_TYPE_MODE32: u8 = 5;

    // Generate ioctl functions
    ioctl_read!(spi_ioc_rd_mode32, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE32, u32);
    ioctl_write_ptr!(spi_ioc_wr_mode32, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE32, u32);
    ioctl_read!(
        spi_ioc_rd_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_read!(
        spi_ioc_rd_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );
}

fn os_error(e: nix::Error) -> io::Error {
    io::Error::from_raw_os_error(e as i32)
}

/// spidev bus handle
///
/// The device file stays open until the handle is dropped.
#[derive(Debug)]
pub struct LinuxSpi {
    /// File handle for spidev device
    file: File,
    path: String,
}

impl LinuxSpi {
    /// Open a spidev device for reading and writing
    pub fn open(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(LinuxSpiError::NoDevice);
        }

        log::debug!("linux_spi: Opening device {}", path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: path.to_string(),
                source: e,
            })?;

        Ok(Self {
            file,
            path: path.to_string(),
        })
    }

    /// Path the device was opened from
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SpiController for LinuxSpi {
    type Error = io::Error;

    fn write_mode(&mut self, mode: SpiModeFlags) -> io::Result<()> {
        let bits = mode.bits();
        unsafe {
            ioctl::spi_ioc_wr_mode32(self.file.as_raw_fd(), &bits).map_err(os_error)?;
        }
        log::trace!("linux_spi: Wrote mode 0x{:x}", bits);
        Ok(())
    }

    fn read_mode(&mut self) -> io::Result<SpiModeFlags> {
        let mut bits: u32 = 0;
        unsafe {
            ioctl::spi_ioc_rd_mode32(self.file.as_raw_fd(), &mut bits).map_err(os_error)?;
        }
        Ok(SpiModeFlags::from_bits_retain(bits))
    }

    fn write_bits_per_word(&mut self, bits: u8) -> io::Result<()> {
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(self.file.as_raw_fd(), &bits).map_err(os_error)?;
        }
        log::trace!("linux_spi: Wrote bits per word {}", bits);
        Ok(())
    }

    fn read_bits_per_word(&mut self) -> io::Result<u8> {
        let mut bits: u8 = 0;
        unsafe {
            ioctl::spi_ioc_rd_bits_per_word(self.file.as_raw_fd(), &mut bits).map_err(os_error)?;
        }
        Ok(bits)
    }

    fn write_max_speed_hz(&mut self, speed_hz: u32) -> io::Result<()> {
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(self.file.as_raw_fd(), &speed_hz).map_err(os_error)?;
        }
        log::trace!("linux_spi: Wrote max speed {} Hz", speed_hz);
        Ok(())
    }

    fn read_max_speed_hz(&mut self) -> io::Result<u32> {
        let mut speed: u32 = 0;
        unsafe {
            ioctl::spi_ioc_rd_max_speed_hz(self.file.as_raw_fd(), &mut speed).map_err(os_error)?;
        }
        Ok(speed)
    }

    /// Half-duplex read; spidev keeps chip select asserted for the whole buffer
    fn read_frame(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.file.read(buf)?;
        log::debug!("linux_spi: Read {} bytes from {}", n, self.path);
        Ok(n)
    }
}
