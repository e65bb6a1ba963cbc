//! Set mode: each field has its own pattern; records are assembled from
//! the lines between successive start anchors.
//!
//! The first match wins for every scalar field. A pattern with several
//! capture groups stores the raw byte groups as a JSON array without type
//! coercion. A record is published once the next start anchor fires (or
//! input ends) and it carries at least one field or error.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::filter::{Disposition, LineFilter};
use super::{chomp, deliver, Inner, Record};
use crate::document::{Document, Value};
use crate::spec::Capture;
use crate::Error;

pub(super) async fn run<R>(
    inner: Arc<Inner>,
    mut reader: R,
    tx: mpsc::Sender<Record>,
    token: CancellationToken,
) where
    R: AsyncBufRead + Unpin,
{
    let mut filter = LineFilter::new(&inner);
    let mut doc = Document::new();
    let mut errors: Vec<Error> = Vec::new();
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

        let line = chomp(&buf);
        if line.is_empty() {
            continue;
        }

        let line = match filter.apply(line) {
            Disposition::Stop => break,
            Disposition::Skip => continue,
            Disposition::Take(line) => line,
        };

        // A start anchor closes the record in progress, provided it
        // captured anything at all.
        if inner.start.is_match(&line) {
            if !doc.is_empty() || !errors.is_empty() {
                let record = Record {
                    data: doc.to_bytes(),
                    errors: std::mem::take(&mut errors),
                };
                if !deliver(&tx, &token, record).await {
                    return;
                }
            }
            doc = Document::new();
            errors.clear();
        }

        for value in &inner.values {
            if doc.contains(value.name()) {
                continue;
            }
            match value.capture(&line) {
                Ok(Capture::Miss) => {}
                Ok(Capture::One(parsed)) => doc.set(value.name(), parsed),
                Ok(Capture::Many(groups)) => doc.set(value.name(), Value::RawArray(groups)),
                Err(e) => {
                    errors.push(e);
                    doc.set(value.name(), Value::Null);
                }
            }
        }
    }

    if !doc.is_empty() || !errors.is_empty() {
        let record = Record {
            data: doc.to_bytes(),
            errors,
        };
        deliver(&tx, &token, record).await;
    }
}
