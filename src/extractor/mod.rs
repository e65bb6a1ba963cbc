//! Record extraction engine.
//!
//! An [`Extractor`] holds an immutable, fully compiled configuration and
//! turns readers into streams of [`Record`]s. Each call to
//! [`parse`](Extractor::parse) spawns one producer task that owns the
//! reader for the lifetime of the call and publishes records through a
//! bounded channel, giving natural backpressure; every send is raced
//! against the caller's cancellation token.
//!
//! Two extraction strategies share the per-line filtering front end:
//! - [`line`] - a single pattern captures all fields positionally from one
//!   line (or a buffered multi-line window when the pattern starts with
//!   `(?m)`);
//! - [`set`] - each field has its own pattern and records are assembled
//!   from the lines between successive start anchors.

mod filter;
mod line;
mod set;

#[cfg(test)]
mod tests;

use std::io::Cursor;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use regex::bytes::Regex;
use tokio::io::{AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::spec::ValueSpec;
use crate::{Error, Result};

/// Pattern prefix selecting multi-line window matching in line mode.
const MULTILINE_PREFIX: &str = "(?m)";

/// Default start anchor: matches every non-empty line.
const DEFAULT_START_TAG: &str = ".";

/// One extracted record: a serialized JSON object plus the errors
/// accumulated while producing it.
///
/// `data` is empty only when `errors` is non-empty (terminal read or
/// structural failures).
#[derive(Debug, Default)]
pub struct Record {
    pub data: Vec<u8>,
    pub errors: Vec<Error>,
}

impl Record {
    pub(crate) fn from_error(error: Error) -> Self {
        Self {
            data: Vec::new(),
            errors: vec![error],
        }
    }

    /// Whether the record carries neither data nor errors.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.errors.is_empty()
    }
}

/// Stream of records produced by one parse invocation.
///
/// Ends when the producer closes the channel: end of input, stop anchor,
/// terminal error or cancellation.
#[derive(Debug)]
pub struct RecordStream {
    rx: mpsc::Receiver<Record>,
}

impl RecordStream {
    /// Receive the next record, or `None` once the stream is finished.
    pub async fn recv(&mut self) -> Option<Record> {
        self.rx.recv().await
    }

    /// Drain the stream to completion.
    pub async fn collect(mut self) -> Vec<Record> {
        let mut records = Vec::new();
        while let Some(record) = self.recv().await {
            records.push(record);
        }
        records
    }
}

impl Stream for RecordStream {
    type Item = Record;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Compiled extractor configuration shared with producer tasks.
#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) trim_spaces: bool,
    pub(crate) multiline: bool,
    pub(crate) line: Option<Regex>,
    pub(crate) start: Regex,
    pub(crate) stop: Option<Regex>,
    pub(crate) skip: Option<Regex>,
    pub(crate) resume: Option<Regex>,
    pub(crate) prepare: Option<Regex>,
    pub(crate) values: Vec<ValueSpec>,
}

/// Streaming extractor of typed JSON records.
#[derive(Debug, Clone)]
pub struct Extractor {
    inner: Arc<Inner>,
}

impl Extractor {
    /// Start building an extractor.
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::default()
    }

    /// Parse a reader into a stream of records.
    ///
    /// Spawns the producer on the current tokio runtime. The producer owns
    /// `reader` until the stream ends; cancelling `token` stops it within
    /// one line of scanner work.
    pub fn parse<R>(&self, token: CancellationToken, reader: R) -> RecordStream
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let reader = BufReader::new(reader);
            if inner.line.is_some() {
                debug!(multiline = inner.multiline, "starting line mode producer");
                line::run(inner, reader, tx, token).await;
            } else {
                debug!("starting set mode producer");
                set::run(inner, reader, tx, token).await;
            }
        });

        RecordStream { rx }
    }

    /// Parse an in-memory buffer. Convenience over [`parse`](Self::parse).
    pub fn parse_bytes(
        &self,
        token: CancellationToken,
        data: impl Into<Vec<u8>>,
    ) -> RecordStream {
        self.parse(token, Cursor::new(data.into()))
    }
}

/// Send one record, racing the cancellation token. Returns false when the
/// producer should stop: cancellation fired or the consumer went away.
/// Biased toward cancellation so no record is sent after it is observed.
pub(crate) async fn deliver(
    tx: &mpsc::Sender<Record>,
    token: &CancellationToken,
    record: Record,
) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("cancellation observed, abandoning delivery");
            false
        }
        sent = tx.send(record) => sent.is_ok(),
    }
}

/// Strip one trailing newline (and a preceding carriage return).
pub(crate) fn chomp(buf: &[u8]) -> &[u8] {
    let mut line = buf;
    if line.last() == Some(&b'\n') {
        line = &line[..line.len() - 1];
    }
    if line.last() == Some(&b'\r') {
        line = &line[..line.len() - 1];
    }
    line
}

/// Builder for [`Extractor`]. Anchor and pattern options compile eagerly
/// and surface compile errors; structural validation happens in
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    trim_spaces: bool,
    line: Option<(Regex, bool)>,
    start: Option<Regex>,
    stop: Option<Regex>,
    skip: Option<Regex>,
    resume: Option<Regex>,
    prepare: Option<Regex>,
    values: Vec<ValueSpec>,
}

fn compile(what: &'static str, pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(Error::EmptyPattern { what });
    }
    Regex::new(pattern).map_err(|e| Error::pattern(pattern, e))
}

impl ExtractorBuilder {
    /// Strip leading and trailing ASCII whitespace from every line.
    pub fn with_trim_spaces(mut self) -> Self {
        self.trim_spaces = true;
        self
    }

    /// Select line mode with the given pattern. A `(?m)` prefix enables
    /// multi-line window matching.
    pub fn with_line_regex(mut self, pattern: &str) -> Result<Self> {
        let multiline = pattern.starts_with(MULTILINE_PREFIX);
        self.line = Some((compile("line pattern", pattern)?, multiline));
        Ok(self)
    }

    /// Set-mode record start anchor. Defaults to matching every non-empty
    /// line.
    pub fn with_start_tag(mut self, pattern: &str) -> Result<Self> {
        self.start = Some(compile("start tag", pattern)?);
        Ok(self)
    }

    /// Stop anchor: a matching line terminates parsing cleanly.
    pub fn with_stop_tag(mut self, pattern: &str) -> Result<Self> {
        self.stop = Some(compile("stop tag", pattern)?);
        Ok(self)
    }

    /// Skip anchor: a matching line starts a skipped section. Effective
    /// only together with a continue tag.
    pub fn with_skip_tag(mut self, pattern: &str) -> Result<Self> {
        self.skip = Some(compile("skip tag", pattern)?);
        Ok(self)
    }

    /// Continue anchor: a matching line ends a skipped section. Both
    /// anchor lines are discarded.
    pub fn with_continue_tag(mut self, pattern: &str) -> Result<Self> {
        self.resume = Some(compile("continue tag", pattern)?);
        Ok(self)
    }

    /// Pattern whose matches are stripped from every line before
    /// extraction.
    pub fn with_prepare_regex(mut self, pattern: &str) -> Result<Self> {
        self.prepare = Some(compile("prepare pattern", pattern)?);
        Ok(self)
    }

    /// Append one value spec. Order matters in line mode: specs map
    /// positionally to capture groups.
    pub fn with_value(mut self, value: ValueSpec) -> Self {
        self.values.push(value);
        self
    }

    /// Append several value specs.
    pub fn with_values(mut self, values: impl IntoIterator<Item = ValueSpec>) -> Self {
        self.values.extend(values);
        self
    }

    /// Validate and build the extractor.
    pub fn build(self) -> Result<Extractor> {
        if self.values.is_empty() {
            return Err(Error::NoValues);
        }

        let mut seen = std::collections::HashSet::new();
        for (position, value) in self.values.iter().enumerate() {
            if value.name().is_empty() {
                return Err(Error::EmptyValueName { position });
            }
            if !seen.insert(value.name().to_string()) {
                return Err(Error::DuplicateValueName {
                    name: value.name().to_string(),
                });
            }
        }

        let (line, multiline) = match self.line {
            Some((regex, multiline)) => (Some(regex), multiline),
            None => (None, false),
        };

        if line.is_none() {
            for value in &self.values {
                if value.pattern.is_none() {
                    return Err(Error::MissingValuePattern {
                        name: value.name().to_string(),
                    });
                }
            }
        }

        let start = match self.start {
            Some(regex) => regex,
            None => compile("start tag", DEFAULT_START_TAG)?,
        };

        Ok(Extractor {
            inner: Arc::new(Inner {
                trim_spaces: self.trim_spaces,
                multiline,
                line,
                start,
                stop: self.stop,
                skip: self.skip,
                resume: self.resume,
                prepare: self.prepare,
                values: self.values,
            }),
        })
    }
}
