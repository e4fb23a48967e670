//! Bus controller trait and the configuration sequence
//!
//! A controller exposes the three transfer settings as separate write and
//! read-back operations, mirroring the spidev ioctl interface. The
//! controller may coerce or reject values, so every write is followed by a
//! read of what was actually accepted.

use crate::config::TransferConfig;
use crate::mode::SpiModeFlags;
use core::fmt;

/// Serial bus controller with one converter attached
pub trait SpiController {
    /// Error reported by the underlying bus operations
    type Error;

    /// Apply the clock mode flags
    fn write_mode(&mut self, mode: SpiModeFlags) -> Result<(), Self::Error>;

    /// Read back the active clock mode flags
    fn read_mode(&mut self) -> Result<SpiModeFlags, Self::Error>;

    /// Apply the bus word width
    fn write_bits_per_word(&mut self, bits: u8) -> Result<(), Self::Error>;

    /// Read back the active bus word width
    fn read_bits_per_word(&mut self) -> Result<u8, Self::Error>;

    /// Apply the maximum clock speed in Hz
    fn write_max_speed_hz(&mut self, speed_hz: u32) -> Result<(), Self::Error>;

    /// Read back the active maximum clock speed in Hz
    fn read_max_speed_hz(&mut self) -> Result<u32, Self::Error>;

    /// Perform one blocking read transfer into `buf`
    ///
    /// Chip select stays asserted for the whole transfer. Returns the number
    /// of bytes received.
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<C: SpiController + ?Sized> SpiController for &mut C {
    type Error = C::Error;

    fn write_mode(&mut self, mode: SpiModeFlags) -> Result<(), Self::Error> {
        (**self).write_mode(mode)
    }

    fn read_mode(&mut self) -> Result<SpiModeFlags, Self::Error> {
        (**self).read_mode()
    }

    fn write_bits_per_word(&mut self, bits: u8) -> Result<(), Self::Error> {
        (**self).write_bits_per_word(bits)
    }

    fn read_bits_per_word(&mut self) -> Result<u8, Self::Error> {
        (**self).read_bits_per_word()
    }

    fn write_max_speed_hz(&mut self, speed_hz: u32) -> Result<(), Self::Error> {
        (**self).write_max_speed_hz(speed_hz)
    }

    fn read_max_speed_hz(&mut self) -> Result<u32, Self::Error> {
        (**self).read_max_speed_hz()
    }

    fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_frame(buf)
    }
}

/// Transfer setting touched by a configuration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Clock mode flags
    Mode,
    /// Bus word width
    BitsPerWord,
    /// Maximum clock speed
    MaxSpeed,
}

impl Setting {
    /// All settings, in the order they are applied
    pub const ALL: [Setting; 3] = [Setting::Mode, Setting::BitsPerWord, Setting::MaxSpeed];

    /// Parse a setting name as used on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mode" => Some(Setting::Mode),
            "bpw" | "bits" | "word-width" => Some(Setting::BitsPerWord),
            "speed" => Some(Setting::MaxSpeed),
            _ => None,
        }
    }

    /// Name as it appears in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Setting::Mode => "mode",
            Setting::BitsPerWord => "word-width",
            Setting::MaxSpeed => "speed",
        }
    }

    fn ioctl_suffix(&self) -> &'static str {
        match self {
            Setting::Mode => "MODE32",
            Setting::BitsPerWord => "BITS_PER_WORD",
            Setting::MaxSpeed => "MAX_SPEED_HZ",
        }
    }
}

/// Direction of a failed configuration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Applying the requested value
    Write,
    /// Reading back the accepted value
    Read,
}

/// A configuration step failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureError<E> {
    /// Which setting failed
    pub setting: Setting,
    /// Whether the apply or the read-back failed
    pub access: Access,
    /// Underlying controller error
    pub source: E,
}

impl<E: fmt::Display> fmt::Display for ConfigureError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.access {
            Access::Write => "WR",
            Access::Read => "RD",
        };
        write!(
            f,
            "ioctl(SPI_IOC_{}_{}): {}",
            dir,
            self.setting.ioctl_suffix(),
            self.source
        )
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for ConfigureError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn step<T, E>(setting: Setting, access: Access, r: Result<T, E>) -> Result<T, ConfigureError<E>> {
    r.map_err(|source| ConfigureError {
        setting,
        access,
        source,
    })
}

/// Apply `config` to the controller and read every setting back into it
///
/// Mode, word width and speed are applied in that order, each followed
/// by its read-back. The first failure aborts the sequence; settings
/// already applied stay active. Nothing is restored afterwards.
pub fn configure<C: SpiController + ?Sized>(
    ctrl: &mut C,
    config: &mut TransferConfig,
) -> Result<(), ConfigureError<C::Error>> {
    let requested = *config;

    step(Setting::Mode, Access::Write, ctrl.write_mode(config.mode))?;
    config.mode = step(Setting::Mode, Access::Read, ctrl.read_mode())?;

    step(
        Setting::BitsPerWord,
        Access::Write,
        ctrl.write_bits_per_word(config.bits_per_word),
    )?;
    config.bits_per_word = step(Setting::BitsPerWord, Access::Read, ctrl.read_bits_per_word())?;

    step(
        Setting::MaxSpeed,
        Access::Write,
        ctrl.write_max_speed_hz(config.max_speed_hz),
    )?;
    config.max_speed_hz = step(Setting::MaxSpeed, Access::Read, ctrl.read_max_speed_hz())?;

    if config.mode != requested.mode {
        log::warn!(
            "mcp3001: requested spi mode 0x{:x}, controller uses 0x{:x}",
            requested.mode.bits(),
            config.mode.bits()
        );
    }
    if config.bits_per_word != requested.bits_per_word {
        log::warn!(
            "mcp3001: requested {} bits per word, controller uses {}",
            requested.bits_per_word,
            config.bits_per_word
        );
    }
    if config.max_speed_hz != requested.max_speed_hz {
        log::warn!(
            "mcp3001: requested {} Hz, controller uses {} Hz",
            requested.max_speed_hz,
            config.max_speed_hz
        );
    }

    log::debug!(
        "mcp3001: configured mode=0x{:x} bpw={} speed={} Hz",
        config.mode.bits(),
        config.bits_per_word,
        config.max_speed_hz
    );

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::format;

    /// Register-level controller that can refuse one setting
    #[derive(Debug, Default)]
    pub(crate) struct MockController {
        pub mode: u32,
        pub bits: u8,
        pub speed: u32,
        pub max_speed: Option<u32>,
        pub reject: Option<(Setting, Access)>,
        pub frame: [u8; 3],
        pub short_read: bool,
        pub transfer_fails: bool,
        pub calls: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct MockError(pub i32);

    impl fmt::Display for MockError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "errno {}", self.0)
        }
    }

    impl MockController {
        fn check(&mut self, setting: Setting, access: Access) -> Result<(), MockError> {
            self.calls += 1;
            if self.reject == Some((setting, access)) {
                Err(MockError(22))
            } else {
                Ok(())
            }
        }
    }

    impl SpiController for MockController {
        type Error = MockError;

        fn write_mode(&mut self, mode: SpiModeFlags) -> Result<(), MockError> {
            self.check(Setting::Mode, Access::Write)?;
            self.mode = mode.bits();
            Ok(())
        }

        fn read_mode(&mut self) -> Result<SpiModeFlags, MockError> {
            self.check(Setting::Mode, Access::Read)?;
            Ok(SpiModeFlags::from_bits_retain(self.mode))
        }

        fn write_bits_per_word(&mut self, bits: u8) -> Result<(), MockError> {
            self.check(Setting::BitsPerWord, Access::Write)?;
            self.bits = bits;
            Ok(())
        }

        fn read_bits_per_word(&mut self) -> Result<u8, MockError> {
            self.check(Setting::BitsPerWord, Access::Read)?;
            Ok(self.bits)
        }

        fn write_max_speed_hz(&mut self, speed_hz: u32) -> Result<(), MockError> {
            self.check(Setting::MaxSpeed, Access::Write)?;
            self.speed = match self.max_speed {
                Some(max) => speed_hz.min(max),
                None => speed_hz,
            };
            Ok(())
        }

        fn read_max_speed_hz(&mut self) -> Result<u32, MockError> {
            self.check(Setting::MaxSpeed, Access::Read)?;
            Ok(self.speed)
        }

        fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
            if self.transfer_fails {
                return Err(MockError(5));
            }
            buf.fill(0);
            buf[..3].copy_from_slice(&self.frame);
            Ok(if self.short_read { 2 } else { buf.len() })
        }
    }

    #[test]
    fn test_configure_accepts_unchanged() {
        let mut ctrl = MockController::default();
        let requested = TransferConfig::default()
            .with_mode(SpiModeFlags::MODE_3 | SpiModeFlags::CS_HIGH)
            .with_bits_per_word(8)
            .with_speed(1_000_000);
        let mut config = requested;

        configure(&mut ctrl, &mut config).unwrap();

        assert_eq!(config, requested);
        assert_eq!(ctrl.mode, 0x07);
        assert_eq!(ctrl.bits, 8);
        assert_eq!(ctrl.speed, 1_000_000);
        assert_eq!(ctrl.calls, 6);
    }

    #[test]
    fn test_configure_reports_coerced_speed() {
        let mut ctrl = MockController {
            max_speed: Some(250_000),
            ..Default::default()
        };
        let mut config = TransferConfig::default().with_speed(2_000_000);

        configure(&mut ctrl, &mut config).unwrap();

        assert_eq!(config.max_speed_hz, 250_000);
    }

    #[test]
    fn test_configure_names_rejected_setting() {
        for setting in Setting::ALL {
            for access in [Access::Write, Access::Read] {
                let mut ctrl = MockController {
                    reject: Some((setting, access)),
                    ..Default::default()
                };
                let mut config = TransferConfig::default();

                let err = configure(&mut ctrl, &mut config).unwrap_err();

                assert_eq!(err.setting, setting);
                assert_eq!(err.access, access);
                assert_eq!(err.source, MockError(22));
            }
        }
    }

    #[test]
    fn test_configure_stops_at_first_failure() {
        let mut ctrl = MockController {
            reject: Some((Setting::BitsPerWord, Access::Write)),
            ..Default::default()
        };
        let mut config = TransferConfig::default().with_speed(1_000_000);

        configure(&mut ctrl, &mut config).unwrap_err();

        // mode write + read, then the failed bpw write
        assert_eq!(ctrl.calls, 3);
        assert_eq!(ctrl.speed, 0);
    }

    #[test]
    fn test_configure_error_display() {
        let err = ConfigureError {
            setting: Setting::MaxSpeed,
            access: Access::Read,
            source: MockError(22),
        };
        assert_eq!(format!("{}", err), "ioctl(SPI_IOC_RD_MAX_SPEED_HZ): errno 22");

        let err = ConfigureError {
            setting: Setting::Mode,
            access: Access::Write,
            source: MockError(1),
        };
        assert_eq!(format!("{}", err), "ioctl(SPI_IOC_WR_MODE32): errno 1");
    }

    #[test]
    fn test_setting_parse() {
        assert_eq!(Setting::parse("mode"), Some(Setting::Mode));
        assert_eq!(Setting::parse("bpw"), Some(Setting::BitsPerWord));
        assert_eq!(Setting::parse("speed"), Some(Setting::MaxSpeed));
        assert_eq!(Setting::parse("clock"), None);
        assert_eq!(Setting::BitsPerWord.name(), "word-width");
    }
}
