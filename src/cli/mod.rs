//! Command-line surface (C6, spec §4.6/§6): two subcommands over a single
//! imageio URL, dispatched from `main.rs`.

use clap::{Parser, Subcommand};
use reqwest::Url;

#[derive(Parser, Debug)]
#[command(name = "sparse-stream", about = "Sparse image streaming core")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream extents from the remote image to stdout.
    Download {
        /// Imageio URL to read from.
        url: Url,

        /// Enumerate only extents dirty since the last checkpoint.
        #[arg(long)]
        incremental: bool,
    },
    /// Replay a stream read from stdin onto the remote image.
    Upload {
        /// Imageio URL to write to.
        url: Url,
    },
}

/// Maps `-v` count onto a default `tracing` level, mirroring how `RUST_LOG`
/// would be set; `RUST_LOG` itself still overrides this when present.
pub fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
