//! Integration coverage for the CLI surface (C6): argument parsing only —
//! no network adapter is exercised here.

use clap::Parser;
use sparse_stream::cli::{Args, Command};

#[test]
fn download_parses_url_and_incremental_flag() {
    let args = Args::parse_from(["sparse-stream", "download", "--incremental", "https://host/img"]);
    match args.command {
        Command::Download { url, incremental } => {
            assert_eq!(url.as_str(), "https://host/img");
            assert!(incremental);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn upload_parses_url() {
    let args = Args::parse_from(["sparse-stream", "upload", "https://host/img"]);
    match args.command {
        Command::Upload { url, .. } => assert_eq!(url.as_str(), "https://host/img"),
        _ => panic!("expected Upload"),
    }
}

#[test]
fn verbose_flag_is_additive() {
    let args = Args::parse_from(["sparse-stream", "-vv", "download", "https://host/img"]);
    assert_eq!(args.verbose, 2);
}

#[test]
fn missing_url_is_a_usage_error() {
    let result = Args::try_parse_from(["sparse-stream", "download"]);
    assert!(result.is_err());
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let result = Args::try_parse_from(["sparse-stream"]);
    assert!(result.is_err());
}
