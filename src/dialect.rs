// Output dialects: run thresholds paired with a line formatter.
//
// A dialect is pure configuration. The accumulator in `accum` consumes the
// thresholds and calls the formatter on flush; adding a new patch format
// means supplying another `(max_run, max_gap, format fn)` triple here.

use std::fmt::Write as _;

/// Renders one emitted run as a newline-terminated text record.
pub type FormatFn = fn(address: u32, data: &[u8]) -> String;

/// One output dialect: run-length cap, gap tolerance, and line renderer.
#[derive(Clone, Copy)]
pub struct Dialect {
    /// Maximum bytes accumulated in one run before a forced flush.
    /// `None` means unbounded.
    pub max_run: Option<usize>,
    /// Maximum consecutive matching bytes tolerated inside an open run.
    pub max_gap: usize,
    format: FormatFn,
}

impl Dialect {
    pub const fn new(max_run: Option<usize>, max_gap: usize, format: FormatFn) -> Self {
        Self {
            max_run,
            max_gap,
            format,
        }
    }

    /// GameShark cheat-code lines: at most 2 data bytes per record, no gap
    /// tolerance. `A{len-1}{addr:06X} {value:04X}`.
    pub const fn gameshark() -> Self {
        Self::new(Some(2), 0, format_gameshark)
    }

    /// STROOP `.hck` hex-blob lines: unbounded runs, up to 16 matching bytes
    /// absorbed into a run. `80{addr:06X}: {hex}`.
    pub const fn stroop() -> Self {
        Self::new(None, 16, format_stroop)
    }

    /// Render one `(address, bytes)` record.
    pub fn format(&self, address: u32, data: &[u8]) -> String {
        (self.format)(address, data)
    }
}

impl std::fmt::Debug for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialect")
            .field("max_run", &self.max_run)
            .field("max_gap", &self.max_gap)
            .finish_non_exhaustive()
    }
}

fn format_gameshark(address: u32, data: &[u8]) -> String {
    debug_assert!(!data.is_empty() && data.len() <= 2);
    // Data bytes interpreted as a big-endian integer, always 4 hex digits.
    let value = data.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
    format!("A{}{address:06X} {value:04X}\n", data.len() - 1)
}

fn format_stroop(address: u32, data: &[u8]) -> String {
    let mut hex = String::with_capacity(data.len() * 2);
    for b in data {
        let _ = write!(hex, "{b:02x}");
    }
    format!("80{address:06X}: {hex}\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gameshark_single_byte_record() {
        // One data byte still renders a 4-digit value, zero-padded on the
        // left (big-endian integer of a 1-byte sequence).
        let line = Dialect::gameshark().format(0x245045, &[0x5A]);
        assert_eq!(line, "A0245045 005A\n");
    }

    #[test]
    fn gameshark_two_byte_record() {
        let line = Dialect::gameshark().format(0x00ABCD, &[0x12, 0x34]);
        assert_eq!(line, "A100ABCD 1234\n");
    }

    #[test]
    fn gameshark_address_is_uppercase() {
        let line = Dialect::gameshark().format(0xABCDEF, &[0xFF]);
        assert_eq!(line, "A0ABCDEF 00FF\n");
    }

    #[test]
    fn stroop_lowercase_hex_blob() {
        let line = Dialect::stroop().format(0x245040, &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(line, "80245040: deadbeef\n");
    }

    #[test]
    fn stroop_single_byte() {
        let line = Dialect::stroop().format(0x000010, &[0x07]);
        assert_eq!(line, "80000010: 07\n");
    }

    #[test]
    fn thresholds() {
        let gs = Dialect::gameshark();
        assert_eq!(gs.max_run, Some(2));
        assert_eq!(gs.max_gap, 0);

        let st = Dialect::stroop();
        assert_eq!(st.max_run, None);
        assert_eq!(st.max_gap, 16);
    }
}
