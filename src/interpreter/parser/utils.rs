use crate::{
    ast::NodeRef,
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::core::ParseResult,
    },
};

/// A read position over a token slice.
///
/// The cursor knows the source text so that errors can quote the offending
/// token and point past the end of input when tokens run out.
pub struct Cursor<'t> {
    tokens:   &'t [SpannedToken],
    source:   &'t str,
    position: usize,
}

impl<'t> Cursor<'t> {
    /// Creates a cursor at the first token.
    #[must_use]
    pub const fn new(tokens: &'t [SpannedToken], source: &'t str) -> Self {
        Self { tokens,
               source,
               position: 0 }
    }

    /// Returns the next token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'t SpannedToken> {
        self.tokens.get(self.position)
    }

    /// Returns the token after the next one without consuming anything.
    #[must_use]
    pub fn peek_second(&self) -> Option<&'t SpannedToken> {
        self.tokens.get(self.position + 1)
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> Option<&'t SpannedToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Returns `true` once every token has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Returns `true` if the next token equals `token`.
    #[must_use]
    pub fn check(&self, token: &Token) -> bool {
        self.peek().is_some_and(|next| next.token == *token)
    }

    /// Consumes the next token if it equals `token`.
    pub fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.position += 1;
            return true;
        }
        false
    }

    /// Consumes the next token if it equals `token`, or fails with `message`
    /// at the current position.
    pub fn expect(&mut self, token: &Token, message: &str) -> ParseResult<&'t SpannedToken> {
        match self.peek() {
            Some(next) if next.token == *token => {
                self.position += 1;
                Ok(next)
            },
            _ => Err(self.error_here(message)),
        }
    }

    /// Consumes an identifier and returns its name, or fails with `message`.
    pub fn expect_identifier(&mut self, message: &str) -> ParseResult<String> {
        match self.peek() {
            Some(SpannedToken { token: Token::Identifier(name),
                                .. }) => {
                self.position += 1;
                Ok(name.clone())
            },
            _ => Err(self.error_here(message)),
        }
    }

    /// Byte offset where the next token starts, or the source length at the
    /// end of input.
    #[must_use]
    pub fn current_start(&self) -> usize {
        self.peek().map_or(self.source.len(), |token| token.start)
    }

    /// Byte offset one past the most recently consumed token.
    #[must_use]
    pub fn previous_end(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(0, |token| token.end)
    }

    /// The source text covered by a token.
    #[must_use]
    pub fn text(&self, token: &SpannedToken) -> &'t str {
        &self.source[token.start..token.end]
    }

    /// Builds an error spanning the next token, or an empty span at the end of
    /// input.
    #[must_use]
    pub fn error_here(&self, message: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::new(message, token.start, token.end),
            None => ParseError::new(message, self.source.len(), self.source.len()),
        }
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, function argument lists and pipe
/// argument lists. The opening token has already been consumed. An
/// immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := (item ("," item)*)? closing`
///
/// # Parameters
/// - `cursor`: Cursor positioned at the first item or the closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
/// - `closing_text`: How the closing token is spelled in error messages.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, or if an item is followed
/// by anything but a comma or the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated(
    cursor: &mut Cursor<'_>,
    parse_item: impl Fn(&mut Cursor<'_>) -> ParseResult<NodeRef>,
    closing: &Token,
    closing_text: &str)
    -> ParseResult<Vec<NodeRef>> {
    let mut items = Vec::new();
    if cursor.eat(closing) {
        return Ok(items);
    }

    loop {
        items.push(parse_item(cursor)?);
        if cursor.eat(&Token::Comma) {
            continue;
        }
        cursor.expect(closing, &format!("Expected '{closing_text}'"))?;
        break;
    }

    Ok(items)
}
