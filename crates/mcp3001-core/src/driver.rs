//! MCP3001 driver

use crate::config::TransferConfig;
use crate::controller::{configure, ConfigureError, SpiController};
use crate::frame::{DecodeError, RawFrame, Sample, FRAME_LEN};
use core::fmt;

/// Errors from a single acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// Applying or reading back a transfer setting failed
    Configure(ConfigureError<E>),
    /// The blocking read failed
    Transfer(E),
    /// The read returned fewer bytes than requested
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes received
        got: usize,
    },
    /// The frame failed the converter's self-check
    Decode(DecodeError),
}

impl<E> From<ConfigureError<E>> for Error<E> {
    fn from(e: ConfigureError<E>) -> Self {
        Error::Configure(e)
    }
}

impl<E> From<DecodeError> for Error<E> {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure(e) => write!(f, "{}", e),
            Self::Transfer(e) => write!(f, "read(): {}", e),
            Self::ShortRead { expected, got } => {
                write!(f, "read(): short read, {} of {} bytes", got, expected)
            }
            Self::Decode(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configure(e) => Some(e),
            Self::Transfer(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::ShortRead { .. } => None,
        }
    }
}

/// MCP3001 driver
///
/// Owns the bus controller for its whole lifetime; dropping the driver
/// releases the bus.
pub struct Mcp3001<C> {
    ctrl: C,
}

impl<C: SpiController> Mcp3001<C> {
    /// Creates a new driver from a bus controller.
    /// The MCP3001 expects SPI mode 0,0 or 1,1.
    pub fn new(ctrl: C) -> Self {
        Self { ctrl }
    }

    /// Apply `config` and overwrite it with the values the controller accepted
    pub fn configure(&mut self, config: &mut TransferConfig) -> Result<(), Error<C::Error>> {
        configure(&mut self.ctrl, config)?;
        Ok(())
    }

    /// Clock one frame out of the converter
    pub fn capture(&mut self) -> Result<RawFrame, Error<C::Error>> {
        let mut buf = [0u8; FRAME_LEN];
        let got = self.ctrl.read_frame(&mut buf).map_err(Error::Transfer)?;
        if got < FRAME_LEN {
            return Err(Error::ShortRead {
                expected: FRAME_LEN,
                got,
            });
        }
        log::trace!("mcp3001: captured {:02X?}", &buf);
        Ok(RawFrame::new(buf))
    }

    /// Capture and decode one verified sample
    ///
    /// There is no retry: a failed self-check is returned as is.
    pub fn read(&mut self) -> Result<Sample, Error<C::Error>> {
        let frame = self.capture()?;
        Ok(frame.decode()?)
    }

    /// Access the underlying controller
    pub fn controller(&mut self) -> &mut C {
        &mut self.ctrl
    }

    /// Give the controller back
    pub fn release(self) -> C {
        self.ctrl
    }
}
