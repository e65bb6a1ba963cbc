//! Line mode: one pattern, fields mapped positionally to capture groups.
//!
//! In multi-line window mode (pattern prefixed with `(?m)`) filtered lines
//! accumulate, separated by `\n`, until the pattern matches the window; the
//! window resets after each published record.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::filter::{Disposition, LineFilter};
use super::{chomp, deliver, Inner, Record};
use crate::document::{Document, Value};
use crate::Error;

pub(super) async fn run<R>(
    inner: Arc<Inner>,
    mut reader: R,
    tx: mpsc::Sender<Record>,
    token: CancellationToken,
) where
    R: AsyncBufRead + Unpin,
{
    let pattern = inner.line.as_ref().expect("line mode requires a pattern");
    let mut filter = LineFilter::new(&inner);
    let mut window: Vec<u8> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();

    loop {
        buf.clear();
        let read = match reader.read_until(b'\n', &mut buf).await {
            Ok(read) => read,
            Err(e) => {
                deliver(&tx, &token, Record::from_error(e.into())).await;
                return;
            }
        };
        if read == 0 {
            break;
        }

        let line = match filter.apply(chomp(&buf)) {
            Disposition::Stop => break,
            Disposition::Skip => continue,
            Disposition::Take(line) => line,
        };

        let groups: Option<Vec<Vec<u8>>> = {
            let haystack: &[u8] = if inner.multiline {
                if !window.is_empty() {
                    window.push(b'\n');
                }
                window.extend_from_slice(&line);
                &window
            } else {
                &line
            };
            pattern.captures(haystack).map(|caps| {
                (1..caps.len())
                    .map(|i| caps.get(i).map_or(Vec::new(), |m| m.as_bytes().to_vec()))
                    .collect()
            })
        };

        let Some(groups) = groups else {
            continue;
        };

        if groups.len() != inner.values.len() {
            warn!(
                captured = groups.len(),
                expected = inner.values.len(),
                "capture count mismatch, terminating"
            );
            let record = Record::from_error(Error::CaptureMismatch {
                captured: groups.len(),
                expected: inner.values.len(),
            });
            deliver(&tx, &token, record).await;
            return;
        }

        let mut record = Record::default();
        let mut doc = Document::new();
        for (raw, value) in groups.iter().zip(&inner.values) {
            match value.coerce_or_null(raw) {
                Ok(parsed) => doc.set(value.name(), parsed),
                Err(e) => {
                    record.errors.push(e);
                    doc.set(value.name(), Value::Null);
                }
            }
        }
        record.data = doc.to_bytes();

        if inner.multiline {
            window.clear();
        }

        if !deliver(&tx, &token, record).await {
            return;
        }
    }
}
