// Diff-run accumulator: groups per-byte compare results into emitted runs.
//
// The accumulator is either idle (no pending run) or open (a run of
// differing bytes is being built). Matching bytes seen while open are held
// speculatively: a later differing byte redeems them into the run, gap
// exhaustion discards them and closes the run.

use std::io::{self, Write};

use crate::dialect::Dialect;

/// State machine that buffers runs of differing bytes and writes formatted
/// records to `out` when a run closes.
///
/// Invariants: `pending` is empty whenever `committed` is empty, and
/// `pending.len()` never exceeds the dialect's `max_gap`.
pub struct RunAccumulator<W: Write> {
    dialect: Dialect,
    out: W,
    start: u32,
    committed: Vec<u8>,
    pending: Vec<u8>,
    records: u64,
}

impl<W: Write> RunAccumulator<W> {
    pub fn new(dialect: Dialect, out: W) -> Self {
        Self {
            dialect,
            out,
            start: 0,
            committed: Vec::new(),
            pending: Vec::new(),
            records: 0,
        }
    }

    /// Feed one differing byte at `address`.
    ///
    /// Opens a run if idle. If matching bytes are pending they are redeemed
    /// into the run first: the new difference proves they were a genuine gap
    /// rather than the run's end. Reaching the dialect's run-length cap
    /// forces an immediate flush.
    pub fn on_diff(&mut self, address: u32, byte: u8) -> io::Result<()> {
        if self.committed.is_empty() {
            self.start = address;
            self.committed.push(byte);
        } else {
            if !self.pending.is_empty() {
                self.committed.append(&mut self.pending);
            }
            self.committed.push(byte);
        }
        if self.dialect.max_run == Some(self.committed.len()) {
            self.flush()?;
        }
        Ok(())
    }

    /// Feed one matching byte.
    ///
    /// Dropped while idle (a match outside any diff region carries no
    /// information). While open, the byte is held in the pending gap until
    /// the gap budget is exhausted, at which point the run closes and the
    /// pending bytes are discarded unredeemed.
    pub fn on_same(&mut self, byte: u8) -> io::Result<()> {
        if self.committed.is_empty() {
            return Ok(());
        }
        if self.pending.len() < self.dialect.max_gap {
            self.pending.push(byte);
            Ok(())
        } else {
            self.flush()
        }
    }

    /// Close the open run, if any: format and write one record, reset to
    /// idle. A no-op while idle, so calling it redundantly is safe.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.committed.is_empty() {
            return Ok(());
        }
        let line = self.dialect.format(self.start, &self.committed);
        self.out.write_all(line.as_bytes())?;
        self.committed.clear();
        self.pending.clear();
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Consume the accumulator, returning the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
