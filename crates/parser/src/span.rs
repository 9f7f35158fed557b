//! Heritage-aware source spans.
//!
//! Every piece of text the parser manipulates is a [`Span`]: a half-open
//! byte range into a shared, immutable source buffer. Slicing is O(1) and
//! never copies; the full buffer stays reachable from every slice, so an
//! error deep inside a sub-expression can still show its surroundings.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// A substring of a shared source buffer.
///
/// All structural characters of the language are ASCII, so byte indices
/// are used throughout; multi-byte UTF-8 sequences only ever occur inside
/// opaque content (strings, comments) and are never split.
#[derive(Clone)]
pub struct Span {
    source: Arc<str>,
    start: usize,
    stop: usize,
}

impl Span {
    /// A span covering a whole source buffer.
    #[must_use]
    pub fn new(source: Arc<str>) -> Self {
        let stop = source.len();
        Self {
            source,
            start: 0,
            stop,
        }
    }

    /// A span over freshly owned text, used by desugarings that parse
    /// generated source (e.g. function rules).
    #[must_use]
    pub fn synthetic(text: impl Into<String>) -> Self {
        Self::new(Arc::from(text.into()))
    }

    /// A span over the given absolute byte range of the same buffer.
    #[must_use]
    pub fn with_bounds(&self, start: usize, stop: usize) -> Self {
        let stop = stop.min(self.source.len());
        let start = start.min(stop);
        Self {
            source: Arc::clone(&self.source),
            start,
            stop,
        }
    }

    /// Absolute start offset into the source buffer.
    #[must_use]
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Absolute stop offset (exclusive).
    #[must_use]
    #[inline]
    pub fn stop(&self) -> usize {
        self.stop
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// The spanned text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.source.get(self.start..self.stop).unwrap_or("")
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    /// Byte at a span-relative offset.
    #[must_use]
    pub fn byte_at(&self, idx: usize) -> Option<u8> {
        self.bytes().get(idx).copied()
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    #[must_use]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    /// Sub-span over a span-relative byte range. Out-of-range bounds are
    /// clamped rather than rejected.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        self.with_bounds(self.start + range.start, self.start + range.end)
    }

    #[must_use]
    pub fn slice_from(&self, start: usize) -> Self {
        self.slice(start..self.len())
    }

    #[must_use]
    pub fn slice_to(&self, stop: usize) -> Self {
        self.slice(0..stop)
    }

    /// The (before, mid, after) decomposition of the full buffer around
    /// this span, used for error context rendering.
    #[must_use]
    pub fn pieces(&self) -> (&str, &str, &str) {
        (
            self.source.get(..self.start).unwrap_or(""),
            self.as_str(),
            self.source.get(self.stop..).unwrap_or(""),
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({:?} @ {}..{})", self.as_str(), self.start, self.stop)
    }
}

impl PartialEq<&str> for Span {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
