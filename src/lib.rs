// src/lib.rs
pub mod colors;
pub mod config;
pub mod error;
pub mod filter;
pub mod format_part;
pub mod format_type;
pub mod formatters;
pub mod level;
pub mod output_format;
pub mod parser;
pub mod pattern;

pub use error::*;

pub use config::ParserConfig;
pub use filter::{DatePattern, DateTimeFilter, Filter, FilterChain, LevelFilter};
pub use format_part::FormatPart;
pub use format_type::FormatType;
pub use level::Level;
pub use output_format::{OutputFormat, OutputFormatter};
pub use parser::{run, LogRecordPart, LogResult, Parser, ResultWindow};
pub use pattern::{CompiledPattern, FieldMatch};
