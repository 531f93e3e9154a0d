// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The `mylang` command-line interface.
//!
//! Compiles one source file and exits with `0` when the program is
//! syntactically and semantically valid, non-zero otherwise. Diagnostics go
//! to stderr with caret highlights; `--debug` additionally prints the parsed
//! syntax tree and pauses for Enter before exiting.
//!
//! Unrecognized flags are dropped before argument parsing, so stray switches
//! never abort a compilation.

use camino::Utf8PathBuf;
use clap::Parser;
use miette::Result;
use mylang_core::compiler::{compile_file, Config};

/// Compiler front-end for the ML language.
#[derive(Debug, Parser)]
#[command(name = "mylang")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file to compile.
    file: Utf8PathBuf,

    /// Print the parsed syntax tree and pause before exiting.
    #[arg(short = 'g', long = "debug")]
    debug: bool,
}

/// Keeps positional arguments and the flags the CLI understands, dropping
/// everything else.
fn known_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .filter(|arg| {
            !arg.starts_with('-')
                || matches!(
                    arg.as_str(),
                    "-g" | "--debug" | "-h" | "--help" | "-V" | "--version"
                )
        })
        .collect()
}

fn main() -> Result<()> {
    // Initialize tracing only when RUST_LOG is explicitly set, so normal
    // runs keep stderr clean for diagnostics.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    let cli = Cli::parse_from(known_args(std::env::args()));
    let config = Config { debug: cli.debug };

    let exit_code = compile_file(cli.file.as_str(), &config)?;
    if exit_code == 0 {
        println!("Compilation successful!");
    } else {
        eprintln!("Compilation failed.");
    }

    if config.debug {
        println!("Press Enter to exit...");
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_file_argument() {
        let cli = Cli::try_parse_from(args(&["mylang", "main.ml"])).unwrap();
        assert_eq!(cli.file, Utf8PathBuf::from("main.ml"));
        assert!(!cli.debug);
    }

    #[test]
    fn parses_debug_flags() {
        let cli = Cli::try_parse_from(args(&["mylang", "-g", "main.ml"])).unwrap();
        assert!(cli.debug);

        let cli = Cli::try_parse_from(args(&["mylang", "main.ml", "--debug"])).unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn unknown_flags_are_filtered_out() {
        let filtered = known_args(args(&["mylang", "--unknown", "main.ml", "-z", "-g"]));
        assert_eq!(filtered, args(&["mylang", "main.ml", "-g"]));

        let cli = Cli::try_parse_from(filtered).unwrap();
        assert_eq!(cli.file, Utf8PathBuf::from("main.ml"));
        assert!(cli.debug);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        assert!(Cli::try_parse_from(args(&["mylang"])).is_err());
    }
}
