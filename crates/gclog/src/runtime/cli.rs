//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gclog")]
#[command(version)]
#[command(about = "Parse a Shenandoah GC log and print pause and heap statistics", long_about = None)]
pub struct Cli {
    /// GC log file to parse
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Grammar family, skipping detection (e.g. shenandoah)
    #[arg(long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include per-line parse counters in the output
    #[arg(long = "metrics")]
    pub metrics: bool,
}
