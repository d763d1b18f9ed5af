use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use logpattern::{DateTimeFilter, Level, LevelFilter, OutputFormat, OutputFormatter, ParserConfig};

#[derive(Parser)]
#[command(name = "logpattern")]
#[command(about = "Parse log output by the format pattern it was written with")]
#[command(version)]
struct Args {
    /// Format pattern the log was written with, e.g. "%d{HH:mm:ss,SSS} %-5p [%c] (%t) %s%E%n"
    #[arg(short = 'p', long = "pattern")]
    pattern: String,

    /// Input file (default: stdin)
    #[arg(short = 'i', long = "input")]
    input_file: Option<PathBuf>,

    /// Keep only the last N matching lines (0 keeps all)
    #[arg(short = 'n', long = "max-results", default_value = "0")]
    max_results: usize,

    /// Minimum level to keep (e.g. INFO, WARN, ERROR)
    #[arg(short = 'l', long)]
    level: Option<Level>,

    /// Keep only lines whose level is exactly --level
    #[arg(long, requires = "level")]
    exclusive: bool,

    /// Keep lines logged at or after this time
    #[arg(long, value_name = "TIME")]
    from: Option<String>,

    /// Keep lines logged at or before this time
    #[arg(long, value_name = "TIME")]
    to: Option<String>,

    /// Output format
    #[arg(short = 'F', long = "format", value_enum, default_value = "line")]
    output_format: OutputFormat,

    /// When to color output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,

    /// Buffer size for reading input files
    #[arg(long, default_value = "65536", value_parser = clap::value_parser!(u64).range(1..))] // 64KB
    buffer_size: u64,

    /// Debug mode - log the compiled pattern and run statistics to stderr
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_colors(self) -> bool {
        match self {
            ColorMode::Auto => io::stdout().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(args) {
        Ok(0) => std::process::exit(2),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("logpattern=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns the number of results written.
fn run(args: Args) -> Result<usize> {
    let config = ParserConfig {
        max_results: args.max_results,
        buffer_size: args.buffer_size as usize,
    };

    let mut parser = logpattern::Parser::with_config(&args.pattern, config)
        .with_context(|| format!("Invalid format pattern '{}'", args.pattern))?;

    if let Some(level) = args.level {
        parser.add_filter(Box::new(LevelFilter::new(level, args.exclusive)));
    }

    let from = args.from.as_deref().map(parse_bound).transpose()?;
    let to = args.to.as_deref().map(parse_bound).transpose()?;
    if from.is_some() || to.is_some() {
        parser.add_filter(Box::new(DateTimeFilter::between(from, to)));
    }

    let results = match &args.input_file {
        Some(path) => parser
            .parse_file(path)
            .with_context(|| format!("Failed to parse '{}'", path.display()))?,
        None => parser
            .parse(io::stdin().lock())
            .context("Failed to parse stdin")?,
    };

    let mut output = BufWriter::new(io::stdout().lock());
    let mut formatter = OutputFormatter::new(args.output_format, args.color.use_colors());
    if let Err(e) = formatter.write_all(&mut output, &results) {
        // Handle broken pipe gracefully
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(e).context("Failed to write results");
        }
    }
    output.flush().ok();

    Ok(formatter.count())
}

/// Parse a --from/--to bound, keeping the local offset it falls in.
fn parse_bound(text: &str) -> Result<DateTime<FixedOffset>> {
    let parsed = dateparser::parse(text).with_context(|| format!("Invalid time '{}'", text))?;
    let local = parsed.with_timezone(&Local);
    Ok(local.with_timezone(local.offset()))
}
