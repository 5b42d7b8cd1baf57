use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `42` or `3.14`.
    ///
    /// A `.` only belongs to the number when a digit follows it, so `1..5`
    /// lexes as `1`, `..`, `5`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens with escapes resolved, such as `"a\tb"`.
    #[regex(r#""([^"\\]|\\.)*""#, unescape, allow_greedy = true)]
    String(String),
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `if`
    #[token("if")]
    If,
    /// `then`
    #[token("then")]
    Then,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `when`
    #[token("when")]
    When,
    /// `into`
    #[token("into")]
    Into,
    /// Identifier tokens; variable or function names such as `total` or `ABS`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.` They are recorded in [`LexerExtras`] and skipped.
    #[regex(r"//[^\n\r]*", record_comment, allow_greedy = true)]
    Comment,
    /// `..=`
    #[token("..=")]
    DotDotEq,
    /// `..`
    #[token("..")]
    DotDot,
    /// `|>`
    #[token("|>")]
    PipeGreater,
    /// `?`
    #[token("?")]
    Question,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// Whitespace and `;` statement separators.
    #[regex(r"[ \t\r\n\f;]+", logos::skip)]
    Ignored,
}

/// A comment collected while lexing, with the byte span of its `//` marker
/// through the end of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text without the `//` marker, trimmed.
    pub text:  String,
    /// Byte offset of the `//` marker.
    pub start: usize,
    /// Byte offset one past the last comment character.
    pub end:   usize,
}

/// Additional information carried by the lexer during tokenization.
#[derive(Default)]
pub struct LexerExtras {
    /// Comments seen so far, in source order.
    pub comments: Vec<Comment>,
}

/// A token together with its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte offset where the token starts.
    pub start: usize,
    /// Byte offset one past the token's end.
    pub end:   usize,
}

/// The complete output of lexing a source string.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Tokens in source order.
    pub tokens:   Vec<SpannedToken>,
    /// Comments in source order.
    pub comments: Vec<Comment>,
}

/// A cursor over the tokens of a source string.
///
/// Wraps the generated scanner and turns its failures into [`ParseError`]s
/// carrying the exact byte span of the offending input.
pub struct Lexer<'src> {
    inner:  logos::Lexer<'src, Token>,
    source: &'src str,
    failed: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner: Token::lexer_with_extras(source, LexerExtras::default()),
               source,
               failed: false }
    }

    /// Advances past whitespace and comments and returns the next token.
    ///
    /// Returns `None` at the end of input, and also after the first error.
    pub fn next_token(&mut self) -> Option<Result<SpannedToken, ParseError>> {
        if self.failed {
            return None;
        }

        let result = self.inner.next()?;
        let span = self.inner.span();

        match result {
            Ok(token) => Some(Ok(SpannedToken { token,
                                                start: span.start,
                                                end: span.end })),
            Err(()) => {
                self.failed = true;
                Some(Err(self.error_at(span.start)))
            },
        }
    }

    /// Comments collected so far.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.inner.extras.comments
    }

    /// Consumes the lexer and returns the collected comments.
    #[must_use]
    pub fn into_comments(self) -> Vec<Comment> {
        self.inner.extras.comments
    }

    fn error_at(&self, start: usize) -> ParseError {
        let rest = &self.source[start..];

        if rest.starts_with('"') {
            return ParseError::new("Unterminated string", start, self.source.len());
        }

        match rest.chars().next() {
            Some(ch) => {
                ParseError::new(format!("Unexpected character '{ch}'"), start, start + ch.len_utf8())
            },
            None => ParseError::new("Unexpected end of input", start, start),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<SpannedToken, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Scans a whole source string into tokens and comments.
///
/// # Errors
/// Returns the first lexical error: an unexpected character, or a string
/// literal that is never closed.
///
/// # Example
/// ```
/// use calcula::interpreter::lexer::{Token, tokenize};
///
/// let lexed = tokenize("1..=3 // range").unwrap();
/// let tokens: Vec<Token> = lexed.tokens.into_iter().map(|t| t.token).collect();
///
/// assert_eq!(tokens, vec![Token::Number(1.0), Token::DotDotEq, Token::Number(3.0)]);
/// assert_eq!(lexed.comments[0].text, "range");
/// ```
pub fn tokenize(source: &str) -> Result<Lexed, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token() {
        tokens.push(token?);
    }

    Ok(Lexed { tokens,
               comments: lexer.into_comments() })
}

/// Parses a numeric literal from the current token slice.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Strips the quotes from a string literal and resolves its escapes.
///
/// `\n`, `\t`, `\\` and `\"` are recognized; any other escape is kept
/// literally, backslash included.
fn unescape(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            },
            None => value.push('\\'),
        }
    }

    value
}

fn record_comment(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    let span = lex.span();
    let text = lex.slice()[2..].trim().to_string();
    lex.extras.comments.push(Comment { text,
                                       start: span.start,
                                       end: span.end });
    logos::Skip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap()
                        .tokens
                        .into_iter()
                        .map(|t| t.token)
                        .collect()
    }

    #[test]
    fn number_dot_needs_a_digit() {
        assert_eq!(kinds("1..5"),
                   vec![Token::Number(1.0), Token::DotDot, Token::Number(5.0)]);
        assert_eq!(kinds("2.5"), vec![Token::Number(2.5)]);
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(kinds("for item in xs when into"),
                   vec![Token::For,
                        Token::Identifier("item".into()),
                        Token::In,
                        Token::Identifier("xs".into()),
                        Token::When,
                        Token::Into]);
        assert_eq!(kinds("iffy"), vec![Token::Identifier("iffy".into())]);
    }

    #[test]
    fn semicolons_are_separators() {
        assert_eq!(kinds("a;b"),
                   vec![Token::Identifier("a".into()), Token::Identifier("b".into())]);
    }

    #[test]
    fn escapes_are_resolved() {
        assert_eq!(kinds(r#""a\n\"b\"\\\q""#),
                   vec![Token::String("a\n\"b\"\\\\q".into())]);
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(kinds("== != <= >= && || |> ..= .."),
                   vec![Token::EqualEqual,
                        Token::BangEqual,
                        Token::LessEqual,
                        Token::GreaterEqual,
                        Token::AndAnd,
                        Token::OrOr,
                        Token::PipeGreater,
                        Token::DotDotEq,
                        Token::DotDot]);
    }

    #[test]
    fn comments_keep_offsets() {
        let lexed = tokenize("x // one\n// two\ny").unwrap();
        assert_eq!(lexed.tokens.len(), 2);
        assert_eq!(lexed.comments,
                   vec![Comment { text:  "one".into(),
                                  start: 2,
                                  end:   8, },
                        Comment { text:  "two".into(),
                                  start: 9,
                                  end:   15, }]);
    }

    #[test]
    fn unexpected_character_has_exact_span() {
        let error = tokenize("1 + $").unwrap_err();
        assert_eq!(error.message, "Unexpected character '$'");
        assert_eq!((error.start, error.end), (4, 5));
    }

    #[test]
    fn unterminated_string_spans_to_end() {
        let error = tokenize("x = \"abc").unwrap_err();
        assert_eq!(error.message, "Unterminated string");
        assert_eq!((error.start, error.end), (4, 8));
    }
}
