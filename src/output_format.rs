use crate::formatters::logfmt::LogfmtFormatter;
use crate::formatters::ResultFormatter;
use crate::parser::LogResult;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    #[value(name = "line", help = "Numbered raw lines: 'Count: 001 [0042]: <line>'")]
    Line,
    #[value(name = "jsonl", help = "JSON Lines format (one JSON object per result)")]
    Jsonl,
    #[value(name = "logfmt", help = "Logfmt format (key=value pairs per extracted field)")]
    Logfmt,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" => Ok(OutputFormat::Line),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "logfmt" => Ok(OutputFormat::Logfmt),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
    logfmt: LogfmtFormatter,
    count: usize,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        OutputFormatter {
            format,
            logfmt: LogfmtFormatter::new(use_colors),
            count: 0,
        }
    }

    /// Number of results written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn write_result<W: Write>(&mut self, output: &mut W, result: &LogResult) -> io::Result<()> {
        self.count += 1;
        match self.format {
            OutputFormat::Line => writeln!(
                output,
                "Count: {:03} [{:04}]: {}",
                self.count,
                result.line_number(),
                result.text()
            ),
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut *output, result)?;
                writeln!(output)
            }
            OutputFormat::Logfmt => writeln!(output, "{}", self.logfmt.format_result(result)),
        }
    }

    pub fn write_all<W: Write>(&mut self, output: &mut W, results: &[LogResult]) -> io::Result<()> {
        for result in results {
            self.write_result(output, result)?;
        }
        Ok(())
    }
}
