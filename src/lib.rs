//! rextract
//!
//! A configurable, streaming extractor that converts unstructured or
//! semi-structured text (log files, command output, device status dumps,
//! multi-line records) into a stream of typed records emitted as JSON
//! documents.
//!
//! An extractor is described declaratively: regular expressions delimit
//! records and capture fields, and per-field descriptors coerce the
//! captured bytes into typed values (numbers, strings, booleans, times,
//! durations, digital byte units).
//!
//! Two extraction strategies are available:
//! - **line mode** - one pattern with numbered capture groups produces a
//!   record per matching line (or per multi-line window when the pattern
//!   starts with `(?m)`);
//! - **set mode** - one pattern per field, accumulating matches until the
//!   next record start anchor.
//!
//! Records are delivered through a bounded, cancellable stream; the
//! producer task owns the reader and backpressure comes from the channel.
//!
//! ```no_run
//! use rextract::{Extractor, ValueSpec, ValueType};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> rextract::Result<()> {
//! let extractor = Extractor::builder()
//!     .with_line_regex(r"^(\d+)\s+(\d+)\s+(.*?)\s+")?
//!     .with_value(ValueSpec::new("maj", ValueType::Number))
//!     .with_value(ValueSpec::new("min", ValueType::Number))
//!     .with_value(ValueSpec::new("device", ValueType::String))
//!     .build()?;
//!
//! let mut stream = extractor.parse_bytes(
//!     CancellationToken::new(),
//!     &b"8       0 sda 5154769 15140912\n"[..],
//! );
//! while let Some(record) = stream.recv().await {
//!     println!("{}", String::from_utf8_lossy(&record.data));
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod extractor;
pub mod spec;

mod coerce;
mod config;

// Re-export the working surface.
pub use document::{Document, Value};
pub use error::{Error, Result};
pub use extractor::{Extractor, ExtractorBuilder, Record, RecordStream};
pub use spec::{Capture, ValueSpec, ValueType};
