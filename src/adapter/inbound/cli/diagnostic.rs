//! Miette-based error diagnostics for CLI error presentation.
//!
//! Request files are user-written; when one fails to parse, the error is
//! shown against the file content with the offending region labeled.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Request file error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(bundlefit::request))]
pub struct RequestError {
    /// Human-readable error message.
    pub message: String,

    /// The request file content.
    #[source_code]
    pub src: NamedSource<String>,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl RequestError {
    /// Create a new request error with source location.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        name: impl AsRef<str>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: NamedSource::new(name, src.into()),
            span: (offset, len).into(),
            help: None,
        }
    }

    /// Add a help suggestion to the error.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build from a TOML parse failure.
    #[must_use]
    pub fn from_toml(name: &str, src: &str, err: &toml::de::Error) -> Self {
        let (offset, len) = err
            .span()
            .map_or((0, 0), |span| (span.start, span.end - span.start));
        Self::new(err.message(), name, src, offset, len).with_help(REQUEST_HELP)
    }

    /// Build from a JSON parse failure.
    #[must_use]
    pub fn from_json(name: &str, src: &str, err: &serde_json::Error) -> Self {
        let offset = line_column_offset(src, err.line(), err.column());
        Self::new(err.to_string(), name, src, offset, 1).with_help(REQUEST_HELP)
    }
}

const REQUEST_HELP: &str = "a request needs `sectors`, `current_capital`, \
`desired_weights`, `budget` and a `deals` list of {deal_id, sector, size, r1, r2, r3}";

/// Byte offset of a 1-based line and column, clamped to the source length.
fn line_column_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}
