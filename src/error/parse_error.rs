/// A lexical or syntax error with the byte span it applies to.
///
/// `start` and `end` are byte offsets into the parsed source. Use
/// [`to_line_column`] to turn an offset into a human-readable position.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    /// Description of the failure.
    pub message: String,
    /// Byte offset where the offending input starts.
    pub start:   usize,
    /// Byte offset where the offending input ends (exclusive).
    pub end:     usize,
}

impl ParseError {
    /// Creates a new error covering `start..end`.
    #[must_use]
    pub fn new(message: impl Into<String>, start: usize, end: usize) -> Self {
        Self { message: message.into(),
               start,
               end }
    }

    /// Formats the error with a 1-based line and column computed from `source`.
    ///
    /// # Example
    /// ```
    /// use calcula::parse;
    ///
    /// let source = "x = 1\ny = (2";
    /// let error = parse(source).unwrap_err();
    /// assert_eq!(error.describe(source), "line 2, column 7: Expected ')'");
    /// ```
    #[must_use]
    pub fn describe(&self, source: &str) -> String {
        let LineColumn { line, column } = to_line_column(source, self.start);
        format!("line {line}, column {column}: {}", self.message)
    }
}

/// A 1-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    /// Line number, starting at 1.
    pub line:   usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

/// Converts a byte offset into a 1-based line and column.
///
/// Offsets beyond the end of `source` are clamped to its length, and offsets
/// that fall inside a multi-byte character count that character as started.
///
/// # Example
/// ```
/// use calcula::error::{LineColumn, to_line_column};
///
/// assert_eq!(to_line_column("ab\ncd", 4), LineColumn { line: 2, column: 2 });
/// assert_eq!(to_line_column("ab", 99), LineColumn { line: 1, column: 3 });
/// ```
#[must_use]
pub fn to_line_column(source: &str, offset: usize) -> LineColumn {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut column = 1;

    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    LineColumn { line, column }
}
