//! mcp3001-dummy - In-memory MCP3001 emulator for testing
//!
//! This crate provides a bus controller that behaves like a spidev device
//! with an MCP3001 attached. It's useful for testing and development
//! without real hardware.

use mcp3001_core::controller::Setting;
use mcp3001_core::{encode, Sample, SpiController, SpiModeFlags};

use std::io;

/// `EINVAL`, returned for rejected settings
const EINVAL: i32 = 22;

/// Configuration for the dummy converter
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Value the converter reports
    pub sample: Sample,
    /// Setting the controller refuses to apply
    pub reject: Option<Setting>,
    /// Fastest clock the controller supports; faster requests are clamped
    pub max_speed_hz: u32,
    /// Flip one echo bit so the self-check fails
    pub corrupt_echo: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            sample: Sample::new(0x145).unwrap_or(Sample::MAX),
            reject: None,
            max_speed_hz: 3_600_000, // MCP3001 limit at 5 V
            corrupt_echo: false,
        }
    }
}

/// Emulated spidev controller with an MCP3001 attached
#[derive(Debug)]
pub struct DummyAdc {
    config: DummyConfig,
    mode: SpiModeFlags,
    bits_per_word: u8,
    speed_hz: u32,
    transfers: usize,
}

impl DummyAdc {
    /// Create a new dummy converter with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            mode: SpiModeFlags::MODE_0,
            bits_per_word: 8,
            speed_hz: 500_000,
            transfers: 0,
        }
    }

    /// Create a new dummy converter with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Number of read transfers performed so far
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    fn check(&self, setting: Setting) -> io::Result<()> {
        if self.config.reject == Some(setting) {
            log::debug!("dummy: Rejecting {}", setting.name());
            return Err(io::Error::from_raw_os_error(EINVAL));
        }
        Ok(())
    }
}

impl SpiController for DummyAdc {
    type Error = io::Error;

    fn write_mode(&mut self, mode: SpiModeFlags) -> io::Result<()> {
        self.check(Setting::Mode)?;
        self.mode = mode;
        Ok(())
    }

    fn read_mode(&mut self) -> io::Result<SpiModeFlags> {
        Ok(self.mode)
    }

    fn write_bits_per_word(&mut self, bits: u8) -> io::Result<()> {
        self.check(Setting::BitsPerWord)?;
        if bits == 0 || bits > 32 {
            return Err(io::Error::from_raw_os_error(EINVAL));
        }
        self.bits_per_word = bits;
        Ok(())
    }

    fn read_bits_per_word(&mut self) -> io::Result<u8> {
        Ok(self.bits_per_word)
    }

    fn write_max_speed_hz(&mut self, speed_hz: u32) -> io::Result<()> {
        self.check(Setting::MaxSpeed)?;
        self.speed_hz = speed_hz.min(self.config.max_speed_hz);
        Ok(())
    }

    fn read_max_speed_hz(&mut self) -> io::Result<u32> {
        Ok(self.speed_hz)
    }

    fn read_frame(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.transfers += 1;
        buf.fill(0);

        let mut signal = encode(self.config.sample);
        if self.config.corrupt_echo {
            // echo copy of B2
            signal[1] ^= 0x02;
        }

        let n = signal.len().min(buf.len());
        buf[..n].copy_from_slice(&signal[..n]);
        log::debug!("dummy: Sent {:02X?}", &buf[..n]);
        Ok(buf.len())
    }
}

/// Parse a number as hex (`0x` prefix) or decimal
fn parse_number(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Parse emulator options from a list of key-value pairs
///
/// - `sample=0x145` - value to report (0-1023)
/// - `reject=mode|bpw|speed` - setting the controller refuses
/// - `maxspeed=1000000` - controller clock limit in Hz
/// - `corrupt=1` - break the self-check
pub fn parse_options(options: &[(&str, &str)]) -> Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "sample" => {
                config.sample = parse_number(value)
                    .and_then(|v| u16::try_from(v).ok())
                    .and_then(Sample::new)
                    .ok_or_else(|| format!("Invalid sample value: {}", value))?;
            }
            "reject" => {
                config.reject = Some(
                    Setting::parse(value)
                        .ok_or_else(|| format!("Invalid setting to reject: {}", value))?,
                );
            }
            "maxspeed" => {
                config.max_speed_hz = parse_number(value)
                    .ok_or_else(|| format!("Invalid maxspeed value: {}", value))?;
            }
            "corrupt" => {
                config.corrupt_echo = match *value {
                    "1" | "true" | "yes" => true,
                    "0" | "false" | "no" => false,
                    _ => return Err(format!("Invalid corrupt value: {}", value)),
                };
            }
            _ => {
                log::warn!("dummy: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

/// Split `dummy[:key=value,...]` into its option pairs
///
/// Returns `None` if `device` does not name the emulator.
pub fn split_device(device: &str) -> Option<Vec<(&str, &str)>> {
    let rest = device.strip_prefix("dummy")?;
    let opts = match rest.strip_prefix(':') {
        Some(opts) => opts,
        None if rest.is_empty() => "",
        None => return None,
    };
    Some(
        opts.split(',')
            .filter(|s| !s.is_empty())
            .map(|kv| kv.split_once('=').unwrap_or((kv, "")))
            .collect(),
    )
}
