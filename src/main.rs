//! # chatdemux CLI
//!
//! Command-line interface for the chatdemux library.

use std::io::Write;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatdemux::chat::{Chat, ChatBuilder};
use chatdemux::cli::Args;
use chatdemux::config::FeedConfig;
use chatdemux::feed::open_path;
use chatdemux::format::{to_format_string, write_to_format};
use chatdemux::progress::IntervalProgressReporter;
use chatdemux::DemuxError;

fn main() {
    let args = <Args as ClapParser>::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), DemuxError> {
    let start = Instant::now();

    let feed_config = FeedConfig::new().with_fix_encoding(!args.no_fix_encoding);
    let feed = open_path(&args.input, &feed_config)?;

    let chat = build(args, feed)?;
    info!(
        messages = chat.messages().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "classified export"
    );

    match &args.output {
        Some(path) => {
            write_to_format(&chat, path, args.format)?;
            eprintln!("✅ Wrote {} messages to {}", chat.messages().len(), path.display());
        }
        None => {
            let rendered = to_format_string(&chat, args.format)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn build(args: &Args, feed: chatdemux::feed::BoxedFeed) -> Result<Chat, DemuxError> {
    let mut reporter = IntervalProgressReporter::default();
    let builder = ChatBuilder::new(args.owner.as_str());
    if args.progress {
        builder.with_progress(&mut reporter).build(feed)
    } else {
        builder.build(feed)
    }
}
