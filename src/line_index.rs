//! Byte-offset to line-number mapping shared by the linter and sanitizer.
//!
//! Line numbers in findings are computed from match offsets, so the mapping
//! has to be consistent everywhere. Newline offsets are collected once and
//! binary-searched per lookup.

/// Maximum number of characters of a source line shown in reports.
pub const EXCERPT_MAX_LEN: usize = 240;

/// Precomputed index of line start offsets for one text.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line number containing the byte at `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// Full text of the given 1-based line, without the trailing newline.
    pub fn line_text<'a>(&self, text: &'a str, line: usize) -> &'a str {
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .map(|&next| next - 1)
            .unwrap_or(text.len());
        text[start..end].trim_end_matches('\r')
    }

    /// Trimmed, length-capped rendering of the line at `offset`, for display.
    pub fn excerpt<'a>(&self, text: &'a str, offset: usize) -> &'a str {
        let line = self.line_text(text, self.line_of(offset)).trim();
        match line.char_indices().nth(EXCERPT_MAX_LEN) {
            Some((idx, _)) => &line[..idx],
            None => line,
        }
    }
}
