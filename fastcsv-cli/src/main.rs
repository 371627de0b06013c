//! FastCSV CLI - Command line interface
//!
//! Check, convert and export CSV files. The read dialect comes from an
//! optional JSON file; logs go to stderr, data to stdout.

use clap::{Parser, Subcommand};
use serde::ser::{SerializeSeq, Serializer as _};
use serde_json::ser::{Formatter, Serializer};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

mod config;
mod error;
mod logging;
mod platform;

use crate::config::LogConfig;
use crate::error::CliError;
use crate::logging::{from_tracing_level, to_tracing_level, LogFormat, TracingSink};
use crate::platform::print_error_with_source;
use fastcsv_config::{LineDelimiter, QuoteStrategy, ReadConfig, WriteConfig};
use fastcsv_core::{CsvError, CsvReader, CsvWriter, NamedCsvReader};
use fastcsv_log::{Level, Logger};

#[derive(Parser)]
#[command(
    name = "fastcsv",
    about = "FastCSV - RFC 4180 CSV reader and writer",
    version = "0.1.0"
)]
struct Cli {
    /// Read dialect as JSON (a serialized ReadConfig)
    #[arg(long, global = true, value_name = "FILE")]
    dialect: Option<PathBuf>,

    /// Log level: silent, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn", value_parser = parse_log_level)]
    log_level: Level,

    /// Log level override for the reader
    #[arg(long, global = true, value_parser = parse_log_level)]
    reader_log_level: Option<Level>,

    /// Log level override for the writer
    #[arg(long, global = true, value_parser = parse_log_level)]
    writer_log_level: Option<Level>,

    /// Log format: pretty, compact, json
    #[arg(long, global = true, default_value = "compact", value_parser = parse_log_format)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the whole file and report row counts
    Check {
        /// Input file ('-' for stdin)
        file: PathBuf,

        /// Fail when a row's field count differs from the first row's
        #[arg(long)]
        strict: bool,
    },

    /// Re-emit the file to stdout in another dialect
    Convert {
        /// Input file ('-' for stdin)
        file: PathBuf,

        /// Output field separator (a single character, or 'tab')
        #[arg(long, value_parser = parse_separator)]
        separator: Option<char>,

        /// Output quote strategy: required, empty, always
        #[arg(long, default_value = "required", value_parser = parse_quote_strategy)]
        quote_strategy: QuoteStrategy,

        /// Output line delimiter: lf, cr, crlf, platform
        #[arg(long, default_value = "crlf", value_parser = parse_line_delimiter)]
        line_delimiter: LineDelimiter,
    },

    /// Print the rows as a JSON array of objects keyed by the header
    Json {
        /// Input file ('-' for stdin)
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// `check` 的统计结果
#[derive(Debug, Default, PartialEq, Eq)]
struct CheckSummary {
    rows: u64,
    comments: u64,
    empty_rows: u64,
    max_fields: usize,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        global: to_tracing_level(cli.log_level),
        reader: cli.reader_log_level.map(to_tracing_level),
        writer: cli.writer_log_level.map(to_tracing_level),
    };
    logging::init(&log_config, cli.log_format);

    let logger = Logger::new(from_tracing_level(log_config.most_verbose())).with_sink(TracingSink);

    let read_config = match load_read_config(cli.dialect.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let file = match &cli.command {
        Command::Check { file, .. } | Command::Convert { file, .. } | Command::Json { file, .. } => file.clone(),
    };
    let input = match open_input(&file) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    tracing::debug!(target: "fastcsv::cli", "Reading from {}", file.display());

    let result = match cli.command {
        Command::Check { strict, .. } => handle_check(input, check_config(read_config, strict), logger),
        Command::Convert {
            separator,
            quote_strategy,
            line_delimiter,
            ..
        } => {
            let mut write_config = WriteConfig {
                dialect: read_config.dialect.clone(),
                quote_strategy,
                line_delimiter,
            };
            if let Some(separator) = separator {
                write_config.dialect.field_separator = separator;
            }
            handle_convert(input, read_config, write_config, logger)
        }
        Command::Json { pretty, .. } => handle_json(input, read_config, pretty, logger),
    };

    if let Err(e) = result {
        let source = (file.as_os_str() != "-").then_some(file.as_path());
        print_error_with_source(&e, source);
        process::exit(1);
    }
}

/// Load the read dialect, or the default one
fn load_read_config(path: Option<&Path>) -> Result<ReadConfig, String> {
    let Some(path) = path else {
        return Ok(ReadConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read dialect file '{}': {}", path.display(), e))?;
    ReadConfig::from_json(&content)
        .map_err(|e| format!("Invalid dialect file '{}': {}", path.display(), e))
}

/// Open the input for streaming; `-` is stdin
fn open_input(path: &Path) -> Result<Box<dyn Read>, String> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path)
        .map_err(|e| format!("Cannot open input file '{}': {}", path.display(), e))?;
    Ok(Box::new(BufReader::new(file)))
}

/// `--strict` only turns strict mode on; a strict dialect file stays strict
fn check_config(config: ReadConfig, strict: bool) -> ReadConfig {
    let strict = strict || config.error_on_different_field_count;
    config.with_error_on_different_field_count(strict)
}

fn handle_check(input: impl Read, config: ReadConfig, logger: Arc<Logger>) -> Result<(), CliError> {
    let summary = check(input, config, logger)?;
    println!("rows: {}", summary.rows);
    println!("comments: {}", summary.comments);
    println!("empty rows: {}", summary.empty_rows);
    println!("max fields: {}", summary.max_fields);
    println!("✅ OK");
    Ok(())
}

fn check<R: Read>(input: R, config: ReadConfig, logger: Arc<Logger>) -> Result<CheckSummary, CsvError> {
    let mut summary = CheckSummary::default();
    for row in CsvReader::with_logger(input, config, logger)? {
        let row = row?;
        if row.is_comment() {
            summary.comments += 1;
        } else if row.is_empty() {
            summary.empty_rows += 1;
        } else {
            summary.rows += 1;
            summary.max_fields = summary.max_fields.max(row.field_count());
        }
    }
    Ok(summary)
}

fn handle_convert(
    input: impl Read,
    read_config: ReadConfig,
    write_config: WriteConfig,
    logger: Arc<Logger>,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    convert(input, read_config, write_config, logger, BufWriter::new(stdout.lock()))?;
    Ok(())
}

fn convert<R: Read, W: Write>(
    input: R,
    read_config: ReadConfig,
    write_config: WriteConfig,
    logger: Arc<Logger>,
    sink: W,
) -> Result<W, CsvError> {
    let reader = CsvReader::with_logger(input, read_config, logger.clone())?;
    let mut writer = CsvWriter::with_logger(sink, write_config, logger)?;

    for row in reader {
        let row = row?;
        if row.is_comment() {
            writer.write_comment(&row.fields()[0])?;
        } else if row.is_empty() {
            writer.write_row(std::iter::empty::<&str>())?;
        } else {
            writer.write_row(row.fields())?;
        }
    }
    writer.into_inner()
}

fn handle_json(input: impl Read, config: ReadConfig, pretty: bool, logger: Arc<Logger>) -> Result<(), CliError> {
    let rows = NamedCsvReader::with_logger(input, config, logger)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if pretty {
        write_json(rows, &mut Serializer::pretty(&mut out))?;
    } else {
        write_json(rows, &mut Serializer::new(&mut out))?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Stream the rows as one JSON array, one element per row
fn write_json<R, W, F>(rows: NamedCsvReader<R>, serializer: &mut Serializer<W, F>) -> Result<(), CliError>
where
    R: Read,
    W: Write,
    F: Formatter,
{
    let mut seq = serializer.serialize_seq(None)?;
    for row in rows {
        seq.serialize_element(&row?)?;
    }
    seq.end()?;
    Ok(())
}

/// Parse log level string
fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse::<Level>().map_err(|e| e.to_string())
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse()
}

fn parse_separator(s: &str) -> Result<char, String> {
    if s.eq_ignore_ascii_case("tab") || s == "\\t" {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("separator must be a single character, got '{s}'")),
    }
}

fn parse_quote_strategy(s: &str) -> Result<QuoteStrategy, String> {
    match s.to_lowercase().as_str() {
        "required" => Ok(QuoteStrategy::Required),
        "empty" => Ok(QuoteStrategy::Empty),
        "always" => Ok(QuoteStrategy::Always),
        _ => Err(format!("unknown quote strategy '{s}' (expected required, empty or always)")),
    }
}

fn parse_line_delimiter(s: &str) -> Result<LineDelimiter, String> {
    match s.to_lowercase().as_str() {
        "lf" => Ok(LineDelimiter::Lf),
        "cr" => Ok(LineDelimiter::Cr),
        "crlf" => Ok(LineDelimiter::CrLf),
        "platform" => Ok(LineDelimiter::Platform),
        _ => Err(format!("unknown line delimiter '{s}' (expected lf, cr, crlf or platform)")),
    }
}
