//! Romdiff: byte-level ROM image comparison emitting cheat-code patch text.
//!
//! The crate provides:
//! - The diff-run accumulation engine (`accum`) and output dialects (`dialect`)
//! - Byte-order normalization for swapped ROM dumps (`order`)
//! - The lockstep comparison driver and file helpers (`engine`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use romdiff::config::RomConfig;
//! use romdiff::dialect::Dialect;
//! use romdiff::engine::diff_streams;
//! use romdiff::accum::RunAccumulator;
//! use romdiff::order::RomReader;
//! use std::io::Cursor;
//!
//! let base = [0x80, 0x37, 0x12, 0x40, 0xAA, 0xBB];
//! let hack = [0x80, 0x37, 0x12, 0x40, 0xAA, 0xCC];
//! let config = RomConfig { header_length: 4, ram_offset: 0 };
//!
//! let mut base = RomReader::new(Cursor::new(base.to_vec())).unwrap();
//! let mut hack = RomReader::new(Cursor::new(hack.to_vec())).unwrap();
//! let mut acc = RunAccumulator::new(Dialect::gameshark(), Vec::new());
//! diff_streams(&mut base, &mut hack, &mut acc, config).unwrap();
//! assert_eq!(acc.into_inner(), b"A0000005 00CC\n");
//! ```

pub mod accum;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod order;

#[cfg(feature = "cli")]
pub mod cli;
