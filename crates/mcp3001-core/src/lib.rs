//! mcp3001-core - Core library for the Microchip MCP3001 10-bit ADC
//!
//! This crate holds everything needed to get a verified sample out of an
//! MCP3001 that sits behind a synchronous serial bus: the clock mode flags,
//! the transfer configuration and its apply/read-back sequence, and the
//! decoder for the converter's self-checking output frame. It is `no_std`
//! so the decoder can be reused on a microcontroller.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for the error types
//!
//! # Example
//!
//! ```ignore
//! use mcp3001_core::{Mcp3001, TransferConfig};
//!
//! fn sample<C: mcp3001_core::SpiController>(ctrl: C) {
//!     let mut adc = Mcp3001::new(ctrl);
//!     let mut config = TransferConfig::default();
//!     adc.configure(&mut config).ok();
//!     match adc.read() {
//!         Ok(sample) => println!("{}", sample),
//!         Err(e) => println!("read failed: {}", e),
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod config;
pub mod controller;
pub mod driver;
pub mod frame;
pub mod hexdump;
pub mod mode;

pub use config::TransferConfig;
pub use controller::{configure, Access, ConfigureError, Setting, SpiController};
pub use driver::{Error, Mcp3001};
pub use frame::{decode, encode, DecodeError, RawFrame, Sample, FRAME_LEN, SIGNAL_LEN};
pub use hexdump::HexDump;
pub use mode::SpiModeFlags;
