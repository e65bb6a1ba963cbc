//! Error handling for extraction operations.
//!
//! A single error type covers the whole pipeline: configuration problems
//! surface synchronously from the builders, while scan, structural and
//! per-field failures travel inside the [`Record`](crate::Record)s they
//! belong to.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An anchor or capture pattern was given as an empty string.
    #[error("empty pattern for {what}")]
    EmptyPattern { what: &'static str },

    /// The extractor was built without any value specs.
    #[error("extractor requires at least one value spec")]
    NoValues,

    /// A value spec has an empty name.
    #[error("value spec at position {position} has an empty name")]
    EmptyValueName { position: usize },

    /// Two value specs share the same name.
    #[error("duplicate value name: {name}")]
    DuplicateValueName { name: String },

    /// A set mode value spec is missing its capture pattern.
    #[error("set mode requires a capture pattern for value '{name}'")]
    MissingValuePattern { name: String },

    /// The declarative description could not be deserialized.
    #[error("invalid extractor description: {source}")]
    Description {
        #[source]
        source: serde_json::Error,
    },

    /// I/O failure while scanning the input stream.
    #[error("read error while scanning input: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    /// The line pattern captured a different number of groups than there
    /// are value specs.
    #[error("line pattern captured {captured} groups for {expected} value specs")]
    CaptureMismatch { captured: usize, expected: usize },

    /// A captured value could not be parsed as a number.
    #[error("value '{name}': invalid number '{input}': {source}")]
    InvalidNumber {
        name: String,
        input: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A captured value is not a recognized boolean lexeme.
    #[error("value '{name}': invalid boolean '{input}'")]
    InvalidBool { name: String, input: String },

    /// A captured value did not parse under the configured time layout.
    #[error("value '{name}': cannot parse time '{input}' with layout '{layout}'")]
    InvalidTime {
        name: String,
        input: String,
        layout: String,
    },

    /// The parsed instant cannot be represented in the requested epoch unit.
    #[error("value '{name}': time out of range for format '{format}'")]
    TimeOutOfRange { name: String, format: String },

    /// A captured value is not a valid duration.
    #[error("value '{name}': invalid duration '{input}': {reason}")]
    InvalidDuration {
        name: String,
        input: String,
        reason: String,
    },

    /// A captured value does not look like a digital quantity at all.
    #[error("value '{name}': no digital unit match in '{input}'")]
    NoUnitMatch { name: String, input: String },

    /// The captured (or default) source unit is not in the unit table.
    #[error("value '{name}': unknown unit '{unit}'")]
    UnknownUnit { name: String, unit: String },

    /// The configured destination format is not supported for this type.
    #[error("value '{name}': unsupported destination format '{format}'")]
    UnknownFormat { name: String, format: String },
}

impl Error {
    /// Create a pattern compile error carrying the offending source text.
    pub(crate) fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// True for errors that terminate the producer rather than attach to a
    /// single field of a record.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::CaptureMismatch { .. })
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
