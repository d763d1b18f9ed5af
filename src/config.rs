/// Configuration for a parser run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Keep only the last `max_results` accepted lines, 0 keeps all
    pub max_results: usize,
    /// Read buffer size used when parsing files
    pub buffer_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_results: 0,
            buffer_size: 65536, // 64KB
        }
    }
}

impl ParserConfig {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}
