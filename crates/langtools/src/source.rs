//! Source text ownership and line-indexed lookup.
//!
//! A [`Source`] owns the text being compiled along with a precomputed line
//! index, so that line/column information can be produced in O(1) instead of
//! rescanning the buffer on every diagnostic.

use std::sync::Arc;

/// UTF-16 backed string with a precomputed table of line-start offsets.
///
/// Offsets are in UTF-16 code units, matching the original implementation's
/// choice (which used ICU's `UnicodeString`). Rust strings are UTF-8, but we
/// keep the line index in code-unit space so that `SourceLocation::column` is
/// comparable across reimplementations and editors that report columns in
/// UTF-16 units (the LSP convention).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndexedString {
    content: String,
    /// `line_starts[n]` is the UTF-16 offset of the start of line `n + 1`.
    line_starts: Vec<usize>,
}

impl LineIndexedString {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut line_starts = vec![0usize];
        let mut offset = 0usize;
        for unit in content.encode_utf16() {
            offset += 1;
            if unit == b'\n' as u16 {
                line_starts.push(offset);
            }
        }
        Self {
            content,
            line_starts,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the half-open `[start, end)` slice (sans trailing `\n`) for
    /// 1-indexed line `line`, or `""` if `line` is out of range.
    pub fn try_get_line(&self, line: usize) -> String {
        if line == 0 || line > self.line_starts.len() {
            return String::new();
        }

        let units: Vec<u16> = self.content.encode_utf16().collect();
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(units.len())
            .saturating_sub(if line < self.line_starts.len() { 1 } else { 0 });

        let end = end.max(start).min(units.len());
        String::from_utf16_lossy(&units[start..end])
    }
}

/// A named text artifact being compiled.
///
/// `path` is `"--"` for sources constructed from in-memory literals (tests,
/// REPL-style invocations) rather than a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: String,
    pub content: LineIndexedString,
}

impl Source {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            content: LineIndexedString::new(content),
        })
    }

    pub fn from_literal(content: impl Into<String>) -> Arc<Self> {
        Self::new("--", content)
    }

    pub fn try_get_line(&self, line: usize) -> String {
        self.content.try_get_line(line)
    }
}

/// A single point in a [`Source`]: 1-indexed line and column, plus the
/// absolute UTF-16 offset from the start of the source.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub source: Arc<Source>,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl SourceLocation {
    pub fn start_of(source: Arc<Source>) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl PartialEq for SourceLocation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
            && self.line == other.line
            && self.column == other.column
            && self.offset == other.offset
    }
}

impl Eq for SourceLocation {}

/// A range of source text, or an empty range unbound to any source (used for
/// messages that are not tied to a specific location).
#[derive(Debug, Clone, Default)]
pub struct SourceRange {
    pub start: Option<SourceLocation>,
    pub end: Option<SourceLocation>,
}

impl SourceRange {
    pub fn empty() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Takes the min start and max end across both ranges. An empty operand
    /// is ignored; combining two empty ranges yields an empty range.
    pub fn combine(a: &SourceRange, b: &SourceRange) -> SourceRange {
        let start = match (&a.start, &b.start) {
            (Some(x), Some(y)) => Some(if x.offset <= y.offset { x } else { y }.clone()),
            (Some(x), None) => Some(x.clone()),
            (None, Some(y)) => Some(y.clone()),
            (None, None) => None,
        };
        let end = match (&a.end, &b.end) {
            (Some(x), Some(y)) => Some(if x.offset >= y.offset { x } else { y }.clone()),
            (Some(x), None) => Some(x.clone()),
            (None, Some(y)) => Some(y.clone()),
            (None, None) => None,
        };
        SourceRange { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_finds_line_starts() {
        let s = LineIndexedString::new("ab\ncd\nef");
        assert_eq!(s.try_get_line(1), "ab");
        assert_eq!(s.try_get_line(2), "cd");
        assert_eq!(s.try_get_line(3), "ef");
        assert_eq!(s.try_get_line(4), "");
        assert_eq!(s.try_get_line(0), "");
    }

    #[test]
    fn empty_source_has_one_line() {
        let s = LineIndexedString::new("");
        assert_eq!(s.line_count(), 1);
        assert_eq!(s.try_get_line(1), "");
    }

    #[test]
    fn combine_takes_min_start_max_end() {
        let source = Source::from_literal("hello world");
        let a = SourceRange::new(
            SourceLocation {
                source: source.clone(),
                line: 1,
                column: 1,
                offset: 0,
            },
            SourceLocation {
                source: source.clone(),
                line: 1,
                column: 6,
                offset: 5,
            },
        );
        let b = SourceRange::new(
            SourceLocation {
                source: source.clone(),
                line: 1,
                column: 7,
                offset: 6,
            },
            SourceLocation {
                source: source.clone(),
                line: 1,
                column: 12,
                offset: 11,
            },
        );
        let combined = SourceRange::combine(&a, &b);
        assert_eq!(combined.start.unwrap().offset, 0);
        assert_eq!(combined.end.unwrap().offset, 11);
    }
}
