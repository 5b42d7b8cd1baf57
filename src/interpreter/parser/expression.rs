use crate::{
    ast::{BinaryOperator, Node, NodeKind, NodeRef},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            core::ParseResult,
            prefix::{parse_pipe_argument, parse_prefix},
            utils::{Cursor, parse_comma_separated},
        },
    },
};

/// Binding power of `=`.
pub const ASSIGNMENT: u8 = 10;
/// Binding power of `|>`.
pub const PIPE: u8 = 20;
/// Binding power of `||`.
pub const OR: u8 = 30;
/// Binding power of `&&`.
pub const AND: u8 = 40;
/// Binding power of `==`, `!=`, `<`, `>`, `<=` and `>=`.
pub const COMPARISON: u8 = 50;
/// Binding power of `..` and `..=`.
pub const RANGE: u8 = 60;
/// Binding power of `+` and `-`.
pub const ADDITIVE: u8 = 70;
/// Binding power of `*`, `/` and `%`.
pub const MULTIPLICATIVE: u8 = 80;
/// Binding power of prefix `-` and `!`; between multiplication and `^`.
pub const UNARY: u8 = 85;
/// Binding power of `^`.
pub const POWER: u8 = 90;

/// Parses an expression whose infix operators all bind at least as tightly as
/// `min_precedence`.
///
/// This is a precedence-climbing (Pratt) parser: a prefix construct is parsed
/// first, postfix indexing is applied, and then infix operators are folded in
/// from left to right as long as they bind tightly enough. Left-associative
/// operators parse their right operand with `precedence + 1`; `^` and `=`
/// reuse their own precedence, which makes them right-associative.
///
/// # Parameters
/// - `cursor`: Cursor positioned at the first token of the expression.
/// - `min_precedence`: The weakest operator this call may consume; `0`
///   accepts everything.
///
/// # Example
/// ```
/// use calcula::{ast::{BinaryOperator, NodeKind}, parse};
///
/// // `^` binds tighter than unary minus: -(2 ^ 2)
/// let node = parse("-2 ^ 2").unwrap();
/// assert!(matches!(node.kind, NodeKind::UnaryOp { .. }));
///
/// // `-` is left-associative: (10 - 4) - 3
/// let node = parse("10 - 4 - 3").unwrap();
/// match &node.kind {
///     NodeKind::BinaryOp { left, operator, .. } => {
///         assert_eq!(*operator, BinaryOperator::Sub);
///         assert!(matches!(left.kind, NodeKind::BinaryOp { .. }));
///     },
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn parse_expression(cursor: &mut Cursor<'_>, min_precedence: u8) -> ParseResult<NodeRef> {
    let start = cursor.current_start();
    let prefix = parse_prefix(cursor)?;
    let mut left = parse_postfix(cursor, prefix)?;

    while let Some(operator) = cursor.peek() {
        let Some(precedence) = infix_precedence(&operator.token) else {
            break;
        };
        if precedence < min_precedence {
            break;
        }

        let left_end = cursor.previous_end();
        cursor.advance();
        left = parse_infix(cursor, left, operator, precedence, (start, left_end))?;
    }

    Ok(left)
}

/// Returns the binding power of a token in infix position, or `None` if the
/// token cannot continue an expression.
#[must_use]
pub const fn infix_precedence(token: &Token) -> Option<u8> {
    match token {
        Token::Equals => Some(ASSIGNMENT),
        Token::PipeGreater => Some(PIPE),
        Token::OrOr => Some(OR),
        Token::AndAnd => Some(AND),
        Token::EqualEqual
        | Token::BangEqual
        | Token::Less
        | Token::Greater
        | Token::LessEqual
        | Token::GreaterEqual => Some(COMPARISON),
        Token::DotDot | Token::DotDotEq => Some(RANGE),
        Token::Plus | Token::Minus => Some(ADDITIVE),
        Token::Star | Token::Slash | Token::Percent => Some(MULTIPLICATIVE),
        Token::Caret => Some(POWER),
        _ => None,
    }
}

/// Maps a token to its corresponding binary operator.
///
/// # Example
/// ```
/// use calcula::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::expression::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Percent), Some(BinaryOperator::Mod));
/// assert_eq!(token_to_binary_operator(&Token::PipeGreater), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::Caret => Some(BinaryOperator::Pow),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::AndAnd => Some(BinaryOperator::And),
        Token::OrOr => Some(BinaryOperator::Or),
        _ => None,
    }
}

/// Applies any number of `[index]` suffixes to an already parsed expression.
///
/// Indexing binds tighter than every operator, so it needs no precedence
/// handling: `a[0][1]` is simply a loop.
fn parse_postfix(cursor: &mut Cursor<'_>, mut node: NodeRef) -> ParseResult<NodeRef> {
    while cursor.eat(&Token::LBracket) {
        let index = parse_expression(cursor, 0)?;
        cursor.expect(&Token::RBracket, "Expected ']'")?;
        node = Node::index(node, index);
    }
    Ok(node)
}

/// Completes an infix construct whose operator has just been consumed.
fn parse_infix(cursor: &mut Cursor<'_>,
               left: NodeRef,
               operator: &SpannedToken,
               precedence: u8,
               left_span: (usize, usize))
               -> ParseResult<NodeRef> {
    match &operator.token {
        Token::Equals => {
            let NodeKind::Identifier { name } = &left.kind else {
                return Err(ParseError::new("Invalid assignment target", left_span.0, left_span.1));
            };
            let value = parse_expression(cursor, precedence)?;
            Ok(Node::assignment(name.clone(), value))
        },
        Token::PipeGreater => parse_pipe(cursor, left, operator),
        Token::DotDot | Token::DotDotEq => {
            let end = parse_expression(cursor, precedence + 1)?;
            Ok(Node::range(left, end, operator.token == Token::DotDotEq))
        },
        token => {
            let Some(binary) = token_to_binary_operator(token) else {
                return Err(ParseError::new(format!("Unexpected token '{}'", cursor.text(operator)),
                                           operator.start,
                                           operator.end));
            };
            let right_precedence = if binary == BinaryOperator::Pow {
                precedence
            } else {
                precedence + 1
            };
            let right = parse_expression(cursor, right_precedence)?;
            Ok(Node::binary(left, binary, right))
        },
    }
}

/// Parses the `NAME(args...)` that follows `|>`.
///
/// At least one argument must be a bare `?` placeholder; it receives the
/// piped value when the expression is evaluated.
fn parse_pipe(cursor: &mut Cursor<'_>,
              value: NodeRef,
              operator: &SpannedToken)
              -> ParseResult<NodeRef> {
    let name = cursor.expect_identifier("Expected function call after |>")?;
    cursor.expect(&Token::LParen, "Expected function call after |>")?;
    let args = parse_comma_separated(cursor, parse_pipe_argument, &Token::RParen, ")")?;

    if !args.iter()
            .any(|arg| matches!(arg.kind, NodeKind::Placeholder))
    {
        return Err(ParseError::new("Pipe expression requires at least one ? placeholder",
                                   operator.start,
                                   cursor.previous_end()));
    }

    Ok(Node::pipe(value, name, args))
}
