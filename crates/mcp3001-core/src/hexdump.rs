//! Hex dump formatting for captured frames

use core::fmt;

/// Formats a byte buffer as prefixed hex lines with an ASCII column
///
/// ```text
/// RX | 29 49 48 00 __ __  |)IH.|
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a> {
    data: &'a [u8],
    line_size: usize,
    prefix: &'a str,
}

impl<'a> HexDump<'a> {
    /// Dump `data`, `line_size` bytes per line, each line starting with `prefix`
    pub fn new(data: &'a [u8], line_size: usize, prefix: &'a str) -> Self {
        Self {
            data,
            line_size: line_size.max(1),
            prefix,
        }
    }
}

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.data.chunks(self.line_size) {
            write!(f, "{} | ", self.prefix)?;
            for byte in line {
                write!(f, "{:02X} ", byte)?;
            }
            for _ in line.len()..self.line_size {
                f.write_str("__ ")?;
            }
            f.write_str(" |")?;
            for &c in line {
                let c = if (32..=126).contains(&c) { c as char } else { '.' };
                write!(f, "{}", c)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
