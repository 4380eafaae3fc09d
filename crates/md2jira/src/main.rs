//! md2jira CLI - converts a Markdown file to Jira wiki markup.
//!
//! Reads the file named on the command line (`-` for standard input) and
//! writes the converted markup to standard output.

mod error;
mod output;

use std::error::Error as _;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use md2jira_tree::ParseOptions;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// Convert Markdown to Jira wiki markup.
#[derive(Parser)]
#[command(name = "md2jira", version, about)]
struct Cli {
    /// Markdown file to convert, or `-` to read standard input. Bytes that
    /// are not valid UTF-8 are replaced with U+FFFD.
    file: PathBuf,

    /// Recognize GitHub Flavored Markdown. Constructs without a Jira
    /// rendering (tables, strikethrough, task lists) abort the conversion.
    #[arg(long)]
    gfm: bool,

    /// Log progress to standard error.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to ERROR
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        output.error(&describe(&err));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let markdown = read_input(&cli.file)?;
    tracing::info!(path = %cli.file.display(), bytes = markdown.len(), "Converting document");

    let options = ParseOptions { gfm: cli.gfm };
    let document = md2jira_tree::parse(&markdown, &options);

    let mut out = BufWriter::new(io::stdout().lock());
    md2jira_renderer::render(&document, markdown.as_bytes(), &mut out)?;
    out.flush().map_err(CliError::Write)?;

    tracing::info!(nodes = document.len(), "Conversion finished");
    Ok(())
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let read = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map(|_| buf)
    } else {
        std::fs::read(path)
    };
    let bytes = read.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8(bytes).unwrap_or_else(|err| {
        tracing::warn!(
            path = %path.display(),
            offset = err.utf8_error().valid_up_to(),
            "Input is not valid UTF-8, replacing invalid bytes"
        );
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    }))
}

/// `ERROR - <context> : <cause> : <cause>...`
fn describe(err: &CliError) -> String {
    let mut message = format!("ERROR - {err}");
    let mut cause = err.source();
    while let Some(source) = cause {
        message.push_str(" : ");
        message.push_str(&source.to_string());
        cause = source.source();
    }
    message
}
