//! Command-line interface for xml2json

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::io::{self, BufRead, Write};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use tracing::info;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use xml2json::serializers::{serialize_compact, serialize_with_indent};
#[cfg(feature = "cli")]
use xml2json::writers::Writer;
#[cfg(feature = "cli")]
use xml2json::error::{AccessError, WriteError};
#[cfg(feature = "cli")]
use xml2json::{convert_source, ConverterConfig, Error, Limits, Location};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xml2json")]
#[command(author, version, about = "Convert an XML document to JSON", long_about = None)]
struct Cli {
    /// Path to the XML file to convert (prompted for when omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output JSON file (prompted for when omitted)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Number of spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Maximum element nesting depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Create missing parent directories of the output file
    #[arg(long)]
    create_dirs: bool,

    /// End the output file with a newline
    #[arg(long)]
    trailing_newline: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let input = match cli.input {
        Some(input) => input,
        None => prompt("Enter the file path of the XML file: ")
            .map_err(|e| Error::from(AccessError::new("failed to read input path").with_cause(e)))?
            .ok_or_else(|| Error::from(AccessError::new("no input file given")))?,
    };

    let mut limits = Limits::default();
    if let Some(depth) = cli.max_depth {
        limits = limits.with_max_xml_depth(depth);
    }
    let config = ConverterConfig::new()
        .with_indent(cli.indent)
        .with_limits(limits);

    let location = Location::from_str(&input)?;
    let document = convert_source(&location, &config)?;
    let json = if cli.compact {
        serialize_compact(&document)?
    } else {
        serialize_with_indent(&document, config.indent())?
    };

    if cli.stdout {
        println!("{}", json);
        return Ok(());
    }

    let output = match cli.output {
        Some(output) => output,
        None => prompt("Enter the file name to save the JSON data: ")
            .map_err(|e| Error::from(WriteError::new("failed to read output path").with_cause(e)))?
            .map(PathBuf::from)
            .ok_or_else(|| Error::from(WriteError::new("no output file given")))?,
    };

    Writer::new()
        .with_create_dirs(cli.create_dirs)
        .with_trailing_newline(cli.trailing_newline)
        .write(&json, &output)?;
    info!(input = %location, output = %output.display(), "conversion finished");
    println!("JSON data saved to {}", output.display());

    Ok(())
}

/// Ask for a value on stdin; `None` when the answer is empty
#[cfg(feature = "cli")]
fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();

    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
