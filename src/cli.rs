//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::format::OutputFormat;

/// Reclassify a Messenger JSON export into typed messages: calls, polls,
/// plans, nickname changes and more.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdemux")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatdemux inbox/hikers_abc123 --owner \"Ann Example\"
    chatdemux message_1.json --owner \"Ann Example\" --format jsonl -o chat.jsonl
    RUST_LOG=chatdemux=trace chatdemux message_1.json --owner Ann --format csv")]
pub struct Args {
    /// Export file (message_N.json) or the conversation folder holding them
    pub input: PathBuf,

    /// Name of the person who downloaded the archive
    #[arg(long, value_name = "NAME")]
    pub owner: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep text exactly as exported instead of repairing its encoding
    #[arg(long)]
    pub no_fix_encoding: bool,

    /// Log build progress once per second
    #[arg(long)]
    pub progress: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Default log filter for the chosen verbosity, used when `RUST_LOG` is
    /// not set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
