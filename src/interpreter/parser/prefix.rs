use crate::{
    ast::{Accumulator, Node, NodeRef, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            core::ParseResult,
            expression::{UNARY, parse_expression},
            utils::{Cursor, parse_comma_separated},
        },
    },
};

/// Parses a construct that can start an expression.
///
/// Dispatches on the first token: literals, identifiers and function calls,
/// prefix operators, parenthesized expressions, array literals, and the `if`
/// and `for` keywords.
///
/// # Errors
/// Returns a `ParseError` spanning the offending token, or an empty span at
/// the end of the source when input runs out.
pub fn parse_prefix(cursor: &mut Cursor<'_>) -> ParseResult<NodeRef> {
    let Some(token) = cursor.advance() else {
        return Err(cursor.error_here("Unexpected end of input"));
    };

    match &token.token {
        Token::Number(value) => Ok(Node::number(*value)),
        Token::String(value) => Ok(Node::string(value.clone())),
        Token::True => Ok(Node::boolean(true)),
        Token::False => Ok(Node::boolean(false)),
        Token::Identifier(name) => parse_identifier_or_call(cursor, name),
        Token::Minus => parse_unary(cursor, UnaryOperator::Negate),
        Token::Bang => parse_unary(cursor, UnaryOperator::Not),
        Token::LParen => {
            let inner = parse_expression(cursor, 0)?;
            cursor.expect(&Token::RParen, "Expected ')'")?;
            Ok(inner)
        },
        Token::LBracket => {
            let elements = parse_comma_separated(cursor, parse_item, &Token::RBracket, "]")?;
            Ok(Node::array(elements))
        },
        Token::If => parse_if(cursor),
        Token::For => parse_for(cursor),
        Token::Question => Err(ParseError::new("Placeholder '?' is only valid as a pipe argument",
                                               token.start,
                                               token.end)),
        _ => Err(unexpected(cursor, token)),
    }
}

/// Parses one argument of a pipe call, where a bare `?` is a placeholder.
pub fn parse_pipe_argument(cursor: &mut Cursor<'_>) -> ParseResult<NodeRef> {
    let bare_placeholder = cursor.check(&Token::Question)
                           && cursor.peek_second()
                                    .is_some_and(|next| {
                                        matches!(next.token, Token::Comma | Token::RParen)
                                    });

    if bare_placeholder {
        cursor.advance();
        return Ok(Node::placeholder());
    }
    parse_item(cursor)
}

/// Parses a full expression inside a delimited list.
fn parse_item(cursor: &mut Cursor<'_>) -> ParseResult<NodeRef> {
    parse_expression(cursor, 0)
}

fn parse_identifier_or_call(cursor: &mut Cursor<'_>, name: &str) -> ParseResult<NodeRef> {
    if cursor.eat(&Token::LParen) {
        let args = parse_comma_separated(cursor, parse_item, &Token::RParen, ")")?;
        return Ok(Node::call(name, args));
    }
    Ok(Node::identifier(name))
}

/// The operand of a prefix operator binds tighter than `*` but looser than
/// `^`, so `-2 ^ 2` is `-(2 ^ 2)` and `-a * b` is `(-a) * b`.
fn parse_unary(cursor: &mut Cursor<'_>, operator: UnaryOperator) -> ParseResult<NodeRef> {
    let argument = parse_expression(cursor, UNARY)?;
    Ok(Node::unary(operator, argument))
}

/// Parses `if CONDITION then CONSEQUENT else ALTERNATE`; `if` is consumed.
fn parse_if(cursor: &mut Cursor<'_>) -> ParseResult<NodeRef> {
    let condition = parse_expression(cursor, 0)?;
    cursor.expect(&Token::Then, "Expected 'then' after if condition")?;
    let consequent = parse_expression(cursor, 0)?;
    cursor.expect(&Token::Else, "Expected 'else' in if expression")?;
    let alternate = parse_expression(cursor, 0)?;

    Ok(Node::if_expression(condition, consequent, alternate))
}

/// Parses `for VAR in ITERABLE [when GUARD] [into ACC = INIT] then BODY`;
/// `for` is consumed.
fn parse_for(cursor: &mut Cursor<'_>) -> ParseResult<NodeRef> {
    let variable = cursor.expect_identifier("Expected loop variable name after 'for'")?;
    cursor.expect(&Token::In, "Expected 'in' after for variable")?;
    let iterable = parse_expression(cursor, 0)?;

    let guard = if cursor.eat(&Token::When) {
        Some(parse_expression(cursor, 0)?)
    } else {
        None
    };

    let accumulator = if cursor.eat(&Token::Into) {
        let name = cursor.expect_identifier("Expected accumulator name after 'into'")?;
        cursor.expect(&Token::Equals, "Expected '=' after accumulator name")?;
        let initial = parse_expression(cursor, 0)?;
        Some(Accumulator { name, initial })
    } else {
        None
    };

    cursor.expect(&Token::Then, "Expected 'then' in for expression")?;
    let body = parse_expression(cursor, 0)?;

    Ok(Node::for_expression(variable, iterable, guard, accumulator, body))
}

fn unexpected(cursor: &Cursor<'_>, token: &SpannedToken) -> ParseError {
    ParseError::new(format!("Unexpected token '{}'", cursor.text(token)),
                    token.start,
                    token.end)
}
