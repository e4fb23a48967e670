//! MCP3001 output frame decoding
//!
//! With chip select held low the converter clocks out, in order:
//!
//! ```text
//! byte0: ?  ?  N  B9 B8 B7 B6 B5      (sample period, null bit, MSB first)
//! byte1: B4 B3 B2 B1 B0 B1 B2 B3      (B0 is shared, then the LSB-first echo)
//! byte2: B4 B5 B6 B7 B8 B9 -  -       (rest of the echo, then padding)
//! ```
//!
//! The second, bit-reversed copy is the converter's own integrity check.
//! A read is only accepted when both copies agree.

use core::fmt;

/// Bytes read in one transfer
pub const FRAME_LEN: usize = 16;

/// Leading bytes of a frame that carry converter output
pub const SIGNAL_LEN: usize = 3;

/// Mask for a 10-bit conversion result
const SAMPLE_MASK: u16 = 0x3FF;

/// Source of each echo bit, indexed by its position in the sample:
/// `(byte index, bit index within that byte)`
const ECHO_BITS: [(usize, u8); 10] = [
    (1, 3), // B0
    (1, 2), // B1
    (1, 1), // B2
    (1, 0), // B3
    (2, 7), // B4
    (2, 6), // B5
    (2, 5), // B6
    (2, 4), // B7
    (2, 3), // B8
    (2, 2), // B9
];

/// A verified 10-bit conversion result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sample(u16);

impl Sample {
    /// Largest value the converter can report
    pub const MAX: Sample = Sample(SAMPLE_MASK);

    /// Wrap a raw value, rejecting anything wider than 10 bits
    pub const fn new(value: u16) -> Option<Self> {
        if value > SAMPLE_MASK {
            None
        } else {
            Some(Sample(value))
        }
    }

    /// The conversion result (0-1023)
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl From<Sample> for u16 {
    fn from(sample: Sample) -> u16 {
        sample.0
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X} ({})", self.0, self.0)
    }
}

/// Frame decoding failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The MSB-first result and the LSB-first echo disagree
    Verification {
        /// Value taken from the MSB-first bits
        sample: u16,
        /// Value rebuilt from the reversed echo
        check: u16,
    },
    /// Fewer than [`SIGNAL_LEN`] bytes were supplied
    Truncated {
        /// Number of bytes available
        len: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verification { sample, check } => {
                write!(f, "verify failed: sample({:03X}) check({:03X})", sample, check)
            }
            Self::Truncated { len } => {
                write!(f, "frame too short: {} of {} bytes", len, SIGNAL_LEN)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// MSB-first result: byte0 bits 4..0 followed by byte1 bits 7..3
fn primary(bytes: &[u8]) -> u16 {
    (((bytes[0] & 0x1F) as u16) << 5) | (((bytes[1] & 0xF8) as u16) >> 3)
}

/// Result rebuilt from the LSB-first echo
fn echo(bytes: &[u8]) -> u16 {
    ECHO_BITS
        .iter()
        .enumerate()
        .fold(0u16, |acc, (pos, &(byte, bit))| {
            acc | ((((bytes[byte] >> bit) & 1) as u16) << pos)
        })
}

/// Decode the leading bytes of a frame into a verified sample
///
/// Only the first [`SIGNAL_LEN`] bytes are looked at; trailing padding is
/// ignored. On a mismatch no sample is returned.
pub fn decode(bytes: &[u8]) -> Result<Sample, DecodeError> {
    if bytes.len() < SIGNAL_LEN {
        return Err(DecodeError::Truncated { len: bytes.len() });
    }

    let sample = primary(bytes);
    let check = echo(bytes);

    if sample != check {
        return Err(DecodeError::Verification { sample, check });
    }

    Ok(Sample(sample))
}

/// Build the leading bytes the converter would send for `sample`
///
/// Bits the converter leaves undriven are zero.
pub fn encode(sample: Sample) -> [u8; SIGNAL_LEN] {
    let value = sample.0;
    let mut bytes = [
        ((value >> 5) & 0x1F) as u8,
        ((value & 0x1F) << 3) as u8,
        0,
    ];
    for (pos, &(byte, bit)) in ECHO_BITS.iter().enumerate() {
        bytes[byte] |= (((value >> pos) & 1) as u8) << bit;
    }
    bytes
}

/// Bytes captured by one bus transfer
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    /// Wrap captured bytes
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }

    /// All captured bytes, padding included
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode the frame
    pub fn decode(&self) -> Result<Sample, DecodeError> {
        decode(&self.0)
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawFrame({:02X?})", &self.0[..SIGNAL_LEN])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn test_decode_known_frame() {
        let sample = decode(&[0x29, 0x49, 0x48]).unwrap();
        assert_eq!(sample.value(), 0x129);
        assert_eq!(format!("{}", sample), "129 (297)");
    }

    #[test]
    fn test_decode_flipped_echo_bit() {
        // byte1 bit 1 carries echo B2
        let err = decode(&[0x29, 0x4B, 0x48]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Verification {
                sample: 0x129,
                check: 0x12D
            }
        );
        assert_eq!(
            format!("{}", err),
            "verify failed: sample(129) check(12D)"
        );
    }

    #[test]
    fn test_round_trip_every_value() {
        for value in 0..=1023u16 {
            let sample = Sample::new(value).unwrap();
            let bytes = encode(sample);
            assert_eq!(decode(&bytes), Ok(sample), "value {:#05x}", value);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(encode(Sample::new(0).unwrap()), [0x00, 0x00, 0x00]);
        assert_eq!(encode(Sample::MAX), [0x1F, 0xFF, 0xFC]);
        assert_eq!(decode(&[0x00, 0x00, 0x00]).unwrap().value(), 0);
        assert_eq!(decode(&[0x1F, 0xFF, 0xFC]).unwrap().value(), 1023);

        // Single bits either side of each byte split
        for value in [0x001, 0x010, 0x020, 0x200, 0x3E0, 0x01F] {
            let sample = Sample::new(value).unwrap();
            assert_eq!(decode(&encode(sample)), Ok(sample));
        }
        assert_eq!(encode(Sample::new(0x200).unwrap()), [0x10, 0x00, 0x04]);
        assert_eq!(encode(Sample::new(0x001).unwrap()), [0x00, 0x08, 0x00]);
        assert_eq!(encode(Sample::new(0x010).unwrap()), [0x00, 0x80, 0x80]);
    }

    #[test]
    fn test_any_signal_bit_flip_is_caught() {
        // byte1 bit 3 (B0) is shared and covered separately
        let covered: [(usize, u8); 18] = [
            (0, 4), (0, 3), (0, 2), (0, 1), (0, 0),
            (1, 7), (1, 6), (1, 5), (1, 4), (1, 2), (1, 1), (1, 0),
            (2, 7), (2, 6), (2, 5), (2, 4), (2, 3), (2, 2),
        ];
        for value in [0u16, 0x129, 0x2AA, 0x155, 1023] {
            let good = encode(Sample::new(value).unwrap());
            for &(byte, bit) in &covered {
                let mut bytes = good;
                bytes[byte] ^= 1 << bit;
                match decode(&bytes) {
                    Err(DecodeError::Verification { sample, check }) => assert_ne!(sample, check),
                    other => panic!("flip {}:{} of {:#x} gave {:?}", byte, bit, value, other),
                }
            }
        }
    }

    #[test]
    fn test_shared_bit_flip_changes_value() {
        // Flipping B0 changes both copies consistently
        let mut bytes = encode(Sample::new(0x128).unwrap());
        bytes[1] ^= 0x08;
        assert_eq!(decode(&bytes).unwrap().value(), 0x129);
    }

    #[test]
    fn test_undriven_bits_ignored() {
        let mut bytes = encode(Sample::new(0x129).unwrap());
        bytes[0] |= 0xE0;
        bytes[2] |= 0x03;
        assert_eq!(decode(&bytes).unwrap().value(), 0x129);
    }

    #[test]
    fn test_padding_ignored() {
        let mut raw = [0xA5u8; FRAME_LEN];
        raw[..SIGNAL_LEN].copy_from_slice(&encode(Sample::new(325).unwrap()));
        let frame = RawFrame::new(raw);
        let sample = frame.decode().unwrap();
        assert_eq!(format!("{}", sample), "145 (325)");
    }

    #[test]
    fn test_truncated() {
        assert_eq!(decode(&[0x29, 0x49]), Err(DecodeError::Truncated { len: 2 }));
        assert_eq!(decode(&[]), Err(DecodeError::Truncated { len: 0 }));
    }

    #[test]
    fn test_sample_range() {
        assert_eq!(Sample::new(1023), Some(Sample::MAX));
        assert_eq!(Sample::new(1024), None);
        assert_eq!(u16::from(Sample::MAX), 1023);
    }
}
