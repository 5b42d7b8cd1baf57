use tracing::trace;

use crate::{
    ast::{Node, NodeRef},
    error::ParseError,
    interpreter::{
        lexer::{Comment, Lexed, tokenize},
        parser::{expression::parse_expression, utils::Cursor},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed top-level statement with its source span and the comments that
/// belong to it.
struct Statement {
    node:     NodeRef,
    start:    usize,
    leading:  Vec<String>,
    trailing: Vec<String>,
}

/// Parses a whole source string into an AST.
///
/// This is the entry point for parsing. Statements are parsed one after the
/// other until the tokens run out; `;` and newlines are only separators, so a
/// statement ends wherever the expression grammar cannot continue.
///
/// A single statement is returned as-is. Two or more statements, or a single
/// statement followed by own-line comments, are wrapped in a
/// [`NodeKind::Program`](crate::ast::NodeKind::Program).
///
/// # Errors
/// Returns the first lexical or syntax error, or an error spanning the whole
/// source when it contains no statement at all.
pub fn parse_program(source: &str) -> ParseResult<NodeRef> {
    let Lexed { tokens, comments } = tokenize(source)?;
    let mut cursor = Cursor::new(&tokens, source);
    let mut statements = Vec::new();

    while !cursor.is_at_end() {
        let start = cursor.current_start();
        let node = parse_expression(&mut cursor, 0)?;
        trace!(start, end = cursor.previous_end(), "parsed statement");

        statements.push(Statement { node,
                                    start,
                                    leading: Vec::new(),
                                    trailing: Vec::new() });
    }

    if statements.is_empty() {
        return Err(ParseError::new("Expected an expression", 0, source.len()));
    }

    let program_trailing = attach_comments(source, &mut statements, &comments);
    let mut nodes: Vec<NodeRef> = statements.into_iter()
                                            .map(|statement| {
                                                if statement.leading.is_empty()
                                                   && statement.trailing.is_empty()
                                                {
                                                    statement.node
                                                } else {
                                                    statement.node
                                                             .with_comments(statement.leading,
                                                                            statement.trailing)
                                                }
                                            })
                                            .collect();

    if nodes.len() == 1 && program_trailing.is_empty() {
        return Ok(nodes.remove(0));
    }

    Ok(Node::program(nodes).with_comments(Vec::new(), program_trailing))
}

/// Distributes comments over the statements.
///
/// - An inline comment (code precedes it on its line) trails the last
///   statement that starts before it.
/// - An own-line comment leads the first statement that starts after it.
/// - Own-line comments after the last statement are returned; they belong to
///   the program itself.
fn attach_comments(source: &str,
                   statements: &mut [Statement],
                   comments: &[Comment])
                   -> Vec<String> {
    let mut program_trailing = Vec::new();

    for comment in comments {
        if is_inline(source, comment.start)
           && let Some(statement) = statements.iter_mut()
                                              .rev()
                                              .find(|statement| statement.start < comment.start)
        {
            statement.trailing.push(comment.text.clone());
            continue;
        }

        match statements.iter_mut()
                        .find(|statement| statement.start > comment.start)
        {
            Some(statement) => statement.leading.push(comment.text.clone()),
            None => program_trailing.push(comment.text.clone()),
        }
    }

    program_trailing
}

/// Returns `true` when non-whitespace text precedes `offset` on its line.
fn is_inline(source: &str, offset: usize) -> bool {
    let line_start = source[..offset].rfind('\n').map_or(0, |index| index + 1);
    !source[line_start..offset].trim().is_empty()
}
