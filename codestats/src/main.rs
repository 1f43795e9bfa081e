//! # codestats
//!
//! A CLI tool that counts code, comment and blank lines across directory
//! trees and summarizes them by file extension and by month.
//!
//! ## Overview
//!
//! codestats is built on top of codestatslib. It walks one or more roots,
//! skips any path containing an exclusion substring, counts every file whose
//! extension is in the valid set, and prints three tables:
//!
//! - total line counts by file type
//! - line counts by month and file type
//! - file counts by type
//!
//! ## Usage
//!
//! ```bash
//! # Count the current directory with the default extensions
//! codestats
//!
//! # Several roots, only Python and shell, skipping build output
//! codestats ~/code ~/scripts --ext py --ext sh --exclude build
//!
//! # Settings from a TOML file, per-file breakdown, JSON output
//! codestats --config codestats.toml --by-file --output json
//! ```

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use codestatslib::{scan, DocstringAccounting, ScanConfig};
use render::OutputMode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("codestats")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Count code, comment and blank lines by file extension and month")
        .arg(
            Arg::new("roots")
                .help("Directories to scan (defaults to the config roots, then the current directory)")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Load settings from a TOML file"),
        )
        .arg(
            Arg::new("ext")
                .short('e')
                .long("ext")
                .action(ArgAction::Append)
                .help("Count files with this extension (replaces the configured set; repeatable)"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Skip any path containing this substring (repeatable)"),
        )
        .arg(
            Arg::new("comment")
                .long("comment")
                .action(ArgAction::Append)
                .help("Treat lines starting with this prefix as comments (replaces the configured set; repeatable)"),
        )
        .arg(
            Arg::new("docstrings")
                .long("docstrings")
                .value_parser(["exact", "legacy"])
                .help("How docstring lines are reconciled with per-line counts"),
        )
        .arg(
            Arg::new("by-file")
                .short('f')
                .long("by-file")
                .action(ArgAction::SetTrue)
                .help("Also show a breakdown by file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "text", "term", "json"])
                .default_value("table")
                .help("Output format: table (styled when the terminal allows), text, term or json"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every pruned path and counted file"),
        )
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(level)
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Layer the config: defaults, then the config file, then flags.
fn build_config(matches: &ArgMatches) -> anyhow::Result<ScanConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScanConfig::new(),
    };

    if let Some(roots) = matches.get_many::<PathBuf>("roots") {
        config = config.roots(roots.cloned());
    }
    if config.roots.is_empty() {
        config = config.root(".");
    }

    if let Some(exts) = matches.get_many::<String>("ext") {
        config = config.extensions(exts);
    }

    if let Some(patterns) = matches.get_many::<String>("exclude") {
        for pattern in patterns {
            config = config.exclude(pattern.clone());
        }
    }

    if let Some(prefixes) = matches.get_many::<String>("comment") {
        config = config.comment_prefixes(prefixes.cloned());
    }

    if let Some(accounting) = matches.get_one::<String>("docstrings") {
        let accounting: DocstringAccounting =
            accounting.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        config = config.docstring_accounting(accounting);
    }

    Ok(config)
}

/// Map the `--output` value to an outstanding output mode.
fn output_mode(matches: &ArgMatches) -> OutputMode {
    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => OutputMode::Json,
        Some("text") => OutputMode::Text,
        Some("term") => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// Scan, summarize and format according to the flags.
fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let config = build_config(matches)?;
    tracing::debug!(?config, "scan configuration");
    let result = scan(&config)?;

    // Paths read better relative to a single root
    let base = match config.roots.as_slice() {
        [root] => std::path::absolute(root).ok(),
        _ => None,
    };

    render::render_scan(
        &config,
        &result,
        matches.get_flag("by-file"),
        base.as_deref(),
        output_mode(matches),
    )
    .map_err(|e| anyhow::anyhow!("rendering output: {e}"))
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
