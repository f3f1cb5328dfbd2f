//! Binary entry point for the `sparse-stream` command-line tool.
//!
//! Parses the subcommand, initializes logging to stderr, opens an
//! [`HttpAdapter`] against the given URL, then drives the matching engine
//! with stdin/stdout as the stream source/sink.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sparse_stream::adapter::http::HttpAdapter;
use sparse_stream::cli::{default_log_filter, Args, Command};
use sparse_stream::{download, upload};

fn init_tracing(verbose: u8) {
    let use_ansi = std::io::stderr().is_terminal();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose))),
        )
        .init();
}

fn run(args: Args) -> Result<(), sparse_stream::StreamError> {
    match args.command {
        Command::Download { url, incremental } => {
            tracing::info!(%url, incremental, "starting download");
            let mut adapter = HttpAdapter::connect(url, true)?;
            let stdout = std::io::stdout();
            let mut sink = stdout.lock();
            download(&mut adapter, &mut sink, incremental)
        }
        Command::Upload { url } => {
            tracing::info!(%url, "starting upload");
            let mut adapter = HttpAdapter::connect(url, true)?;
            let stdin = std::io::stdin();
            let mut source = stdin.lock();
            upload(&mut adapter, &mut source)
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // clap already printed usage/help to the right stream.
            let code = if err.exit_code() == 0 { 0 } else { 2 };
            err.print().ok();
            return ExitCode::from(code as u8);
        }
    };

    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "sparse-stream failed");
            eprintln!("sparse-stream: {err}");
            ExitCode::from(1)
        }
    }
}
