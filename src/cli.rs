// Command-line interface for romdiff.
//
// Single-purpose command: compare a base ROM against a hacked ROM and write
// patch text to stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};

use crate::config::RomConfig;
use crate::dialect::Dialect;
use crate::engine;

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Integer parsing (accepts a 0x prefix for hex)
// ---------------------------------------------------------------------------

fn parse_int(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// GameShark cheat-code lines (1-2 bytes per record).
    Gameshark,
    /// STROOP .hck hex-blob lines.
    Stroop,
}

/// Byte-level ROM comparison emitting cheat-code patch text.
#[derive(Parser, Debug)]
#[command(
    name = "romdiff",
    version,
    about = "Compare two ROM images and emit a GameShark or STROOP patch",
    arg_required_else_help = true
)]
struct Cli {
    /// Base ROM image to compare against.
    #[arg(value_hint = ValueHint::FilePath)]
    base: PathBuf,

    /// Hacked ROM image to create a patch for.
    #[arg(value_hint = ValueHint::FilePath)]
    hack: PathBuf,

    /// Output patch format.
    #[arg(long, short = 'F', value_enum, default_value_t = FormatArg::Gameshark)]
    format: FormatArg,

    /// Generate a diff in STROOP's .hck format (same as --format stroop).
    #[arg(long, conflicts_with = "format")]
    stroop: bool,

    /// Length of header to ignore, in bytes (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_int)]
    header: Option<u32>,

    /// Offset added to file positions to form patch addresses.
    #[arg(long = "ram-offset", value_parser = parse_int)]
    ram_offset: Option<u32>,

    /// Output file (default: stdout).
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Force overwrite existing output file.
    #[arg(short = 'f', long)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json")]
    json_output: bool,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

struct Options {
    base: PathBuf,
    hack: PathBuf,
    dialect: Dialect,
    dialect_name: &'static str,
    config: RomConfig,
    output_file: Option<PathBuf>,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let (dialect, dialect_name) = if cli.stroop || cli.format == FormatArg::Stroop {
        (Dialect::stroop(), "stroop")
    } else {
        (Dialect::gameshark(), "gameshark")
    };

    let mut config = RomConfig::default();
    if let Some(header) = cli.header {
        config.header_length = header;
    }
    if let Some(ram_offset) = cli.ram_offset {
        config.ram_offset = ram_offset;
    }

    Options {
        base: cli.base,
        hack: cli.hack,
        dialect,
        dialect_name,
        config,
        output_file: cli.output,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    }
}

// ---------------------------------------------------------------------------
// Diff command
// ---------------------------------------------------------------------------

fn cmd_diff(opts: &Options) -> i32 {
    let mut writer: Box<dyn Write> = match &opts.output_file {
        None => Box::new(BufWriter::with_capacity(BUF_SIZE, io::stdout().lock())),
        Some(path) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "romdiff: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return 1;
            }
            match File::create(path) {
                Ok(f) => Box::new(BufWriter::with_capacity(BUF_SIZE, f)),
                Err(e) => {
                    eprintln!("romdiff: output file: {}: {e}", path.display());
                    return 1;
                }
            }
        }
    };

    let stats = match engine::diff_files(
        &opts.base,
        &opts.hack,
        &mut writer,
        opts.dialect,
        opts.config,
    ) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("romdiff: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("romdiff: write flush error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "romdiff: {}: compared {} bytes, {} differing, {} records",
            opts.dialect_name, stats.bytes_compared, stats.differing_bytes, stats.records
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "diff",
            "format": opts.dialect_name,
            "header_length": opts.config.header_length,
            "ram_offset": opts.config.ram_offset,
            "bytes_compared": stats.bytes_compared,
            "differing_bytes": stats.differing_bytes,
            "records": stats.records,
            "length_mismatch": stats.length_mismatch,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, runs the diff.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let opts = resolve_options(cli);

    process::exit(cmd_diff(&opts));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
