//! Byte-span bookkeeping for diagnostics.
//!
//! Every AST node records the `[start, end)` byte range it was parsed from,
//! so errors and warnings can point at the offending source text.

use serde::{Deserialize, Serialize};

/// A half-open byte range into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Byte offset of the start (inclusive)
    pub start: usize,
    /// Byte offset of the end (exclusive)
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span anchored at a single offset.
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The source text this span covers.
    ///
    /// Out-of-range offsets are clamped; an inverted span yields `""`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let len = source.len();
        let start = self.start.min(len);
        let end = self.end.min(len);
        if start <= end {
            &source[start..end]
        } else {
            ""
        }
    }
}

impl From<std::ops::Range<usize>> for SourceSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<SourceSpan> for std::ops::Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// Line-start table for translating byte offsets to line/column pairs.
///
/// Built on demand when a diagnostic is rendered.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Map a byte offset to a 1-indexed line/column position.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        LineCol {
            line: line as u32 + 1,
            col: (offset - line_start) as u32 + 1,
        }
    }

    /// Byte offset where the given 1-indexed line begins.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts
            .get(line.saturating_sub(1) as usize)
            .copied()
    }

    /// Byte offset just past the given line (start of the next one).
    pub fn line_end(&self, line: u32, source: &str) -> usize {
        self.line_starts
            .get(line as usize)
            .copied()
            .unwrap_or(source.len())
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A 1-indexed line/column position.
///
/// Columns count bytes, not characters. Rendering of non-ASCII queries may
/// misalign the caret; SPARQL sources are overwhelmingly ASCII so this is
/// an accepted limitation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len_and_union() {
        let a = SourceSpan::new(2, 8);
        assert_eq!(a.len(), 6);
        assert!(!a.is_empty());
        assert!(SourceSpan::point(4).is_empty());

        let b = SourceSpan::new(6, 12);
        assert_eq!(a.union(b), SourceSpan::new(2, 12));
    }

    #[test]
    fn span_slice_clamps() {
        let source = "SELECT ?s";
        assert_eq!(SourceSpan::new(7, 9).slice(source), "?s");
        assert_eq!(SourceSpan::new(7, 99).slice(source), "?s");
        assert_eq!(SourceSpan::new(50, 60).slice(source), "");
        assert_eq!(SourceSpan::new(9, 2).slice(source), "");
    }

    #[test]
    fn line_col_lookup() {
        let source = "PREFIX ex: <http://ex/>\nSELECT ?s\nWHERE { ?s ?p ?o }";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(0), LineCol::new(1, 1));
        assert_eq!(index.line_col(24), LineCol::new(2, 1));
        assert_eq!(index.line_col(31), LineCol::new(2, 8));
        assert_eq!(index.line_col(source.len()), LineCol::new(3, 19));
    }

    #[test]
    fn line_boundaries() {
        let source = "a\nbb\nccc";
        let index = LineIndex::new(source);
        assert_eq!(index.line_start(2), Some(2));
        assert_eq!(index.line_end(2, source), 5);
        assert_eq!(index.line_end(3, source), source.len());
    }
}
