use crate::parser::LogResult;

/// Trait for formatting parse results to strings
pub trait ResultFormatter {
    fn format_result(&self, result: &LogResult) -> String;
}

pub mod logfmt;
