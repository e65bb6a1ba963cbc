//! Shared per-line filtering: whitespace trimming, the prepare pattern and
//! the stop/skip/continue anchors. Both extraction modes route every line
//! through here before matching.

use std::borrow::Cow;

use tracing::debug;

use super::Inner;

/// What to do with a line after filtering.
pub(super) enum Disposition<'l> {
    /// Hand the (possibly trimmed and stripped) line to the extractor.
    Take(Cow<'l, [u8]>),
    /// Discard the line.
    Skip,
    /// Stop anchor matched: terminate parsing cleanly.
    Stop,
}

/// Stateful line filter; tracks whether a skip section is open.
pub(super) struct LineFilter<'a> {
    inner: &'a Inner,
    skipping: bool,
}

impl<'a> LineFilter<'a> {
    pub(super) fn new(inner: &'a Inner) -> Self {
        Self {
            inner,
            skipping: false,
        }
    }

    pub(super) fn apply<'l>(&mut self, line: &'l [u8]) -> Disposition<'l> {
        let mut current: &'l [u8] = line;
        if self.inner.trim_spaces {
            current = current.trim_ascii();
        }

        let prepared: Cow<'l, [u8]> = match &self.inner.prepare {
            Some(pattern) => pattern.replace_all(current, &b""[..]),
            None => Cow::Borrowed(current),
        };

        if let Some(stop) = &self.inner.stop {
            if stop.is_match(&prepared) {
                debug!("stop anchor matched, terminating");
                return Disposition::Stop;
            }
        }

        // Skip sections require both anchors. The line opening a section
        // and the line closing it are both non-contributing.
        if let (Some(skip), Some(resume)) = (&self.inner.skip, &self.inner.resume) {
            if skip.is_match(&prepared) {
                if !self.skipping {
                    debug!("skip anchor matched, entering skip section");
                }
                self.skipping = true;
            }
            if resume.is_match(&prepared) {
                if self.skipping {
                    debug!("continue anchor matched, leaving skip section");
                }
                self.skipping = false;
                return Disposition::Skip;
            }
            if self.skipping {
                return Disposition::Skip;
            }
        }

        Disposition::Take(prepared)
    }
}
