//! Filters that decide whether a matched line is kept.
//!
//! A filter declares which field types it looks at through
//! [`Filter::allow_type`]; for a matched line, every field of an allowed type
//! is handed to [`Filter::accept`]. A line is kept only when all of those
//! calls accept. A filter that cannot interpret a value returns an error,
//! which counts as a rejection of that value and is otherwise ignored.

pub mod date_format;
pub mod date_time;
pub mod level;

use std::fmt;

use crate::error::FilterError;
use crate::format_part::FormatPart;
use crate::format_type::FormatType;
use crate::pattern::FieldMatch;

pub use date_format::{DatePattern, DEFAULT_DATE_PATTERN};
pub use date_time::DateTimeFilter;
pub use level::LevelFilter;

pub trait Filter: Send + Sync {
    /// Whether this filter wants to see fields of `format_type`. When this
    /// returns false, [`Filter::accept`] is never called for such fields.
    fn allow_type(&self, format_type: FormatType) -> bool;

    /// Check a single field value. `part` is the directive that produced it.
    fn accept(&self, part: &FormatPart, value: &str) -> Result<bool, FilterError>;
}

/// Ordered set of filters combined with logical AND.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        FilterChain {
            filters: Vec::new(),
        }
    }

    pub fn add_filter(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Remove the filter at `index`, in insertion order.
    pub fn remove_filter(&mut self, index: usize) -> Option<Box<dyn Filter>> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True when every applicable filter accepts every field of the line.
    pub fn evaluate(&self, fields: &[FieldMatch<'_>]) -> bool {
        fields
            .iter()
            .flat_map(|field| {
                self.filters
                    .iter()
                    .filter(move |filter| filter.allow_type(field.format_type()))
                    .map(move |filter| check(filter.as_ref(), field))
            })
            .fold(true, |keep, accepted| keep & accepted)
    }
}

fn check(filter: &dyn Filter, field: &FieldMatch<'_>) -> bool {
    match filter.accept(field.part, &field.value) {
        Ok(accepted) => accepted,
        Err(e) => {
            tracing::trace!(field = %field.format_type(), value = %field.value, error = %e, "filter rejected unreadable value");
            false
        }
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}
