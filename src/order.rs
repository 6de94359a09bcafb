// Byte-order normalization for ROM images.
//
// N64 dumps circulate in two layouts distinguished by the first byte of the
// 4-byte magic: 0x80 (native big-endian, .z64) and 0x37 (16-bit swapped,
// .v64). `RomReader` hides the difference behind a one-logical-byte-at-a-time
// read/seek interface.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

use thiserror::Error;

/// First magic byte of a native-order image.
pub const NATIVE_MAGIC: u8 = 0x80;
/// First magic byte of a byte-swapped image.
pub const SWAPPED_MAGIC: u8 = 0x37;

/// Error type for byte-order detection.
#[derive(Debug, Error)]
pub enum OrderError {
    /// I/O error while probing the magic.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Fewer than 4 bytes available.
    #[error("file too short to identify byte order")]
    TooShort,
    /// First byte matches neither known layout.
    #[error("unrecognized magic byte {0:#04x}")]
    UnknownMagic(u8),
}

// ---------------------------------------------------------------------------
// Swapped-order reader
// ---------------------------------------------------------------------------

/// Serves a 16-bit-swapped source in logical address order.
///
/// Raw bytes are consumed two at a time; the high half of each pair is
/// served first and the low half held for the next read. An odd trailing
/// raw byte cannot form a pair and is dropped with a warning.
#[derive(Debug)]
pub struct SwappedReader<R> {
    inner: R,
    held: Option<u8>,
}

impl<R: Read + Seek> SwappedReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, held: None }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.held.take() {
            return Ok(Some(b));
        }
        let mut pair = [0u8; 2];
        let filled = read_up_to(&mut self.inner, &mut pair)?;
        if filled < 2 {
            if filled == 1 {
                log::warn!("odd trailing byte in swapped image, ignoring");
            }
            return Ok(None);
        }
        self.held = Some(pair[0]);
        Ok(Some(pair[1]))
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        // Realign the 2-byte window: land on the even raw offset at or
        // before the target, then burn one logical byte if the target is
        // odd so the next read returns the odd-offset byte.
        self.inner.seek(SeekFrom::Start(offset & !1))?;
        self.held = None;
        if offset % 2 == 1 {
            self.read_byte()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Normalized reader
// ---------------------------------------------------------------------------

/// A ROM image normalized to logical (native) byte order.
#[derive(Debug)]
pub enum RomReader<R> {
    Native(R),
    Swapped(SwappedReader<R>),
}

impl<R: Read + Seek> RomReader<R> {
    /// Detect the layout from the 4-byte magic and wrap `inner` accordingly.
    /// The stream position is restored to the start before returning.
    pub fn new(mut inner: R) -> Result<Self, OrderError> {
        let mut magic = [0u8; 4];
        let filled = read_up_to(&mut inner, &mut magic)?;
        if filled < 4 {
            return Err(OrderError::TooShort);
        }
        inner.seek(SeekFrom::Start(0))?;
        match magic[0] {
            NATIVE_MAGIC => Ok(Self::Native(inner)),
            SWAPPED_MAGIC => Ok(Self::Swapped(SwappedReader::new(inner))),
            other => Err(OrderError::UnknownMagic(other)),
        }
    }

    /// Read one logical byte, `None` at end of input.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self {
            Self::Native(inner) => {
                let mut buf = [0u8; 1];
                let filled = read_up_to(inner, &mut buf)?;
                Ok((filled == 1).then_some(buf[0]))
            }
            Self::Swapped(sw) => sw.read_byte(),
        }
    }

    /// Seek to a logical byte offset from the start of the image.
    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        match self {
            Self::Native(inner) => {
                inner.seek(SeekFrom::Start(offset))?;
                Ok(())
            }
            Self::Swapped(sw) => sw.seek_to(offset),
        }
    }
}

/// Fill `buf` as far as the source allows, returning the number of bytes
/// read. Short only at end of input.
fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn native(data: &[u8]) -> RomReader<Cursor<Vec<u8>>> {
        assert_eq!(data[0], NATIVE_MAGIC);
        RomReader::new(Cursor::new(data.to_vec())).unwrap()
    }

    fn swapped(data: &[u8]) -> RomReader<Cursor<Vec<u8>>> {
        assert_eq!(data[0], SWAPPED_MAGIC);
        RomReader::new(Cursor::new(data.to_vec())).unwrap()
    }

    fn drain(r: &mut RomReader<Cursor<Vec<u8>>>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = r.read_byte().unwrap() {
            out.push(b);
        }
        out
    }

    #[test]
    fn native_image_reads_through() {
        let mut r = native(&[0x80, 0x37, 0x12, 0x40, 0xAA, 0xBB]);
        assert_eq!(drain(&mut r), vec![0x80, 0x37, 0x12, 0x40, 0xAA, 0xBB]);
    }

    #[test]
    fn swapped_image_unswaps_pairs() {
        // Raw .v64 pairs (37 80) (40 12) serve as logical 80 37 12 40.
        let mut r = swapped(&[0x37, 0x80, 0x40, 0x12, 0xBB, 0xAA]);
        assert_eq!(drain(&mut r), vec![0x80, 0x37, 0x12, 0x40, 0xAA, 0xBB]);
    }

    #[test]
    fn swapped_odd_trailing_byte_is_dropped() {
        let mut r = swapped(&[0x37, 0x80, 0x40, 0x12, 0xFF]);
        assert_eq!(drain(&mut r), vec![0x80, 0x37, 0x12, 0x40]);
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let err = RomReader::new(Cursor::new(vec![0x00, 0x01, 0x02, 0x03])).unwrap_err();
        assert!(matches!(err, OrderError::UnknownMagic(0x00)));
    }

    #[test]
    fn short_file_is_rejected() {
        let err = RomReader::new(Cursor::new(vec![0x80, 0x37])).unwrap_err();
        assert!(matches!(err, OrderError::TooShort));
    }

    #[test]
    fn native_seek() {
        let mut r = native(&[0x80, 0x37, 0x12, 0x40, 0xAA, 0xBB]);
        r.seek_to(4).unwrap();
        assert_eq!(drain(&mut r), vec![0xAA, 0xBB]);
    }

    #[test]
    fn swapped_seek_to_even_offset() {
        let mut r = swapped(&[0x37, 0x80, 0x40, 0x12, 0xBB, 0xAA]);
        r.seek_to(2).unwrap();
        assert_eq!(drain(&mut r), vec![0x12, 0x40, 0xAA, 0xBB]);
    }

    #[test]
    fn swapped_seek_to_odd_offset_realigns() {
        let mut r = swapped(&[0x37, 0x80, 0x40, 0x12, 0xBB, 0xAA]);
        r.seek_to(3).unwrap();
        assert_eq!(drain(&mut r), vec![0x40, 0xAA, 0xBB]);
    }

    #[test]
    fn swapped_seek_discards_held_byte() {
        let mut r = swapped(&[0x37, 0x80, 0x40, 0x12, 0xBB, 0xAA]);
        // Read one byte so the low half of the first pair is held.
        assert_eq!(r.read_byte().unwrap(), Some(0x80));
        r.seek_to(0).unwrap();
        assert_eq!(drain(&mut r), vec![0x80, 0x37, 0x12, 0x40, 0xAA, 0xBB]);
    }
}
