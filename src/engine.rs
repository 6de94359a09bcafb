// Diff driver: walks two normalized ROM images in lockstep and feeds the
// run accumulator.
//
// Provides `diff_streams()` for pre-normalized readers and `diff_files()`
// as the file-level convenience API with buffered I/O.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, Write};
use std::path::Path;

use thiserror::Error;

use crate::accum::RunAccumulator;
use crate::config::RomConfig;
use crate::dialect::Dialect;
use crate::order::{OrderError, RomReader};

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by a diff run.
#[derive(Debug, Clone, Default)]
pub struct DiffStats {
    /// Positions compared in lockstep.
    pub bytes_compared: u64,
    /// Positions where the images differed.
    pub differing_bytes: u64,
    /// Patch records written.
    pub records: u64,
    /// The images had different lengths and the comparison stopped early.
    pub length_mismatch: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for diff operations.
#[derive(Debug, Error)]
pub enum DiffError {
    /// I/O error while reading an image or writing the patch.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// One of the images could not be normalized.
    #[error(transparent)]
    Order(#[from] OrderError),
}

// ---------------------------------------------------------------------------
// Lockstep comparison
// ---------------------------------------------------------------------------

/// Compare two normalized images from `config.header_length` onward, pushing
/// diff/same events into `acc`.
///
/// A length mismatch is not an error: the loop stops, a diagnostic is
/// logged, and the open run (if any) is still flushed so the patch up to the
/// divergence point remains usable. The accumulator is flushed on every
/// exit path of the loop.
pub fn diff_streams<B, H, W>(
    base: &mut RomReader<B>,
    hack: &mut RomReader<H>,
    acc: &mut RunAccumulator<W>,
    config: RomConfig,
) -> Result<DiffStats, DiffError>
where
    B: Read + Seek,
    H: Read + Seek,
    W: Write,
{
    base.seek_to(u64::from(config.header_length))?;
    hack.seek_to(u64::from(config.header_length))?;

    let mut address = config.base_address();
    let mut stats = DiffStats::default();

    loop {
        let (b, h) = (base.read_byte()?, hack.read_byte()?);
        match (b, h) {
            (Some(b), Some(h)) => {
                if b != h {
                    acc.on_diff(address, h)?;
                    stats.differing_bytes += 1;
                } else {
                    acc.on_same(h)?;
                }
                stats.bytes_compared += 1;
                address += 1;
            }
            (None, None) => break,
            _ => {
                log::warn!("file length mismatch, ending early");
                stats.length_mismatch = true;
                break;
            }
        }
    }

    acc.flush()?;
    stats.records = acc.records_written();
    Ok(stats)
}

// ---------------------------------------------------------------------------
// File-level API
// ---------------------------------------------------------------------------

/// Diff two ROM image files, writing patch text to `out`.
///
/// Both images are opened with buffered readers and normalized by magic
/// before comparison. File handles are released on all exit paths.
pub fn diff_files<W: Write>(
    base_path: &Path,
    hack_path: &Path,
    out: W,
    dialect: Dialect,
    config: RomConfig,
) -> Result<DiffStats, DiffError> {
    let base_file = BufReader::with_capacity(BUF_SIZE, File::open(base_path)?);
    let hack_file = BufReader::with_capacity(BUF_SIZE, File::open(hack_path)?);

    let mut base = RomReader::new(base_file)?;
    let mut hack = RomReader::new(hack_file)?;

    let mut acc = RunAccumulator::new(dialect, out);
    diff_streams(&mut base, &mut hack, &mut acc, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
