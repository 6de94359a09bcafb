// Static ROM layout configuration.

/// Address-space configuration for one ROM layout.
///
/// Threaded explicitly through the entry points; there is no global default
/// beyond [`RomConfig::SM64`], which [`Default`] mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomConfig {
    /// Bytes of container header skipped before comparison begins.
    pub header_length: u32,
    /// Offset added to file positions to produce RAM-space addresses.
    pub ram_offset: u32,
}

impl RomConfig {
    /// Super Mario 64 (US): 0x40-byte header, code segment loaded at
    /// RAM offset 0x245000.
    pub const SM64: RomConfig = RomConfig {
        header_length: 0x40,
        ram_offset: 0x24_5000,
    };

    /// Address of the first compared byte.
    pub fn base_address(&self) -> u32 {
        self.header_length + self.ram_offset
    }
}

impl Default for RomConfig {
    fn default() -> Self {
        Self::SM64
    }
}
