use crate::{
    ast::{BinaryOperator, Node, NodeKind, NodeRef},
    interpreter::parser::expression::{
        ADDITIVE, AND, ASSIGNMENT, COMPARISON, MULTIPLICATIVE, OR, PIPE, POWER, RANGE, UNARY,
    },
};

/// Binding power of constructs that never need parentheses: literals,
/// identifiers, calls, array literals and indexing.
const ATOM: u8 = u8::MAX;

/// Binding power of `if` and `for`, whose last clause extends as far right as
/// possible.
const OPEN_ENDED: u8 = 0;

/// Generates source code for an AST.
///
/// The output parses back into a tree that evaluates to the same result.
/// Statements go on separate lines, comments are written back where the
/// parser found them, and parentheses appear only where the grammar needs
/// them.
///
/// `;` and newlines do not end a statement in this language, so a statement
/// that would continue the previous one (one starting with `-`, `(` or `[`) is
/// written in parentheses, and so is the statement before it. That statement
/// now starts with `(` itself, so the wrapping carries on towards the first
/// statement.
///
/// # Example
/// ```
/// use calcula::{codegen::generate, parse};
///
/// let node = parse("x   =  (1 + 2) * 3 // sum\ny").unwrap();
/// assert_eq!(generate(&node), "x = (1 + 2) * 3 // sum\ny");
///
/// let node = parse("(2 ^ 3) ^ 2 + -(a - b)").unwrap();
/// assert_eq!(generate(&node), "(2 ^ 3) ^ 2 + -(a - b)");
/// ```
#[must_use]
pub fn generate(node: &Node) -> String {
    let (statements, program): (Vec<&Node>, _) = match &node.kind {
        NodeKind::Program { statements } => {
            (statements.iter().map(AsRef::as_ref).collect(), Some(node))
        },
        _ => (vec![node], None),
    };

    let mut texts: Vec<String> = statements.iter().map(|statement| expression(statement)).collect();
    let mut wrapped = vec![false; texts.len()];
    for i in (1..texts.len()).rev() {
        if texts[i].starts_with(['-', '(', '[']) {
            for j in [i, i - 1] {
                if !wrapped[j] {
                    texts[j] = format!("({})", texts[j]);
                    wrapped[j] = true;
                }
            }
        }
    }

    let mut lines = Vec::new();
    if let Some(program) = program {
        lines.extend(program.leading_comments.iter().map(|comment| format!("// {comment}")));
    }
    for (statement, text) in statements.iter().zip(texts) {
        lines.extend(statement.leading_comments.iter().map(|comment| format!("// {comment}")));
        let mut line = text;
        for comment in &statement.trailing_comments {
            line.push_str(" // ");
            line.push_str(comment);
        }
        lines.push(line);
    }
    if let Some(program) = program {
        lines.extend(program.trailing_comments.iter().map(|comment| format!("// {comment}")));
    }

    lines.join("\n")
}

/// Writes a single expression, ignoring comments.
fn expression(node: &Node) -> String {
    match &node.kind {
        NodeKind::Program { statements } => {
            statements.iter().map(|statement| expression(statement)).collect::<Vec<_>>().join("\n")
        },
        NodeKind::NumberLiteral { value } => format!("{value}"),
        NodeKind::StringLiteral { value } => quote(value),
        NodeKind::BooleanLiteral { value } => value.to_string(),
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::Placeholder => "?".to_string(),
        NodeKind::ArrayLiteral { elements } => format!("[{}]", list(elements)),
        NodeKind::FunctionCall { name, args } => format!("{name}({})", list(args)),
        NodeKind::BinaryOp { left,
                             operator,
                             right, } => {
            let precedence = binary_precedence(*operator);
            let (left_min, right_min) = if *operator == BinaryOperator::Pow {
                (precedence + 1, precedence)
            } else {
                (precedence, precedence + 1)
            };
            format!("{} {operator} {}", operand(left, left_min), operand(right, right_min))
        },
        NodeKind::UnaryOp { operator, argument } => {
            format!("{operator}{}", operand(argument, UNARY))
        },
        NodeKind::Assignment { name, value } => format!("{name} = {}", expression(value)),
        NodeKind::IfExpression { condition,
                                 consequent,
                                 alternate, } => {
            format!("if {} then {} else {}",
                    operand(condition, OPEN_ENDED + 1),
                    operand(consequent, OPEN_ENDED + 1),
                    expression(alternate))
        },
        NodeKind::ForExpression { variable,
                                  iterable,
                                  guard,
                                  accumulator,
                                  body, } => {
            let mut text = format!("for {variable} in {}", operand(iterable, OPEN_ENDED + 1));
            if let Some(guard) = guard {
                text.push_str(&format!(" when {}", operand(guard, OPEN_ENDED + 1)));
            }
            if let Some(accumulator) = accumulator {
                text.push_str(&format!(" into {} = {}",
                                       accumulator.name,
                                       operand(&accumulator.initial, OPEN_ENDED + 1)));
            }
            text.push_str(&format!(" then {}", expression(body)));
            text
        },
        NodeKind::IndexAccess { object, index } => {
            format!("{}[{}]", operand(object, ATOM), expression(index))
        },
        NodeKind::RangeExpression { start,
                                    end,
                                    inclusive, } => {
            let operator = if *inclusive { "..=" } else { ".." };
            format!("{}{operator}{}", operand(start, RANGE), operand(end, RANGE + 1))
        },
        NodeKind::PipeExpression { value, name, args } => {
            format!("{} |> {name}({})", operand(value, PIPE), list(args))
        },
    }
}

/// Writes `node`, parenthesized if it binds more loosely than `min_precedence`.
fn operand(node: &Node, min_precedence: u8) -> String {
    let text = expression(node);
    if precedence(node) < min_precedence {
        format!("({text})")
    } else {
        text
    }
}

fn list(nodes: &[NodeRef]) -> String {
    nodes.iter().map(|node| expression(node)).collect::<Vec<_>>().join(", ")
}

/// How tightly the written form of `node` holds together.
fn precedence(node: &Node) -> u8 {
    match &node.kind {
        NodeKind::BinaryOp { operator, .. } => binary_precedence(*operator),
        NodeKind::NumberLiteral { value } if value.is_sign_negative() => UNARY,
        NodeKind::UnaryOp { .. } => UNARY,
        NodeKind::RangeExpression { .. } => RANGE,
        NodeKind::PipeExpression { .. } => PIPE,
        NodeKind::Assignment { .. } => ASSIGNMENT,
        NodeKind::IfExpression { .. }
        | NodeKind::ForExpression { .. }
        | NodeKind::Program { .. } => OPEN_ENDED,
        NodeKind::NumberLiteral { .. }
        | NodeKind::StringLiteral { .. }
        | NodeKind::BooleanLiteral { .. }
        | NodeKind::ArrayLiteral { .. }
        | NodeKind::Identifier { .. }
        | NodeKind::FunctionCall { .. }
        | NodeKind::IndexAccess { .. }
        | NodeKind::Placeholder => ATOM,
    }
}

const fn binary_precedence(operator: BinaryOperator) -> u8 {
    match operator {
        BinaryOperator::Or => OR,
        BinaryOperator::And => AND,
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::Less
        | BinaryOperator::Greater
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterEqual => COMPARISON,
        BinaryOperator::Add | BinaryOperator::Sub => ADDITIVE,
        BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => MULTIPLICATIVE,
        BinaryOperator::Pow => POWER,
    }
}

/// Quotes a string, escaping exactly what the lexer unescapes.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::UnaryOperator, parse};

    fn round_trip(source: &str) -> String {
        generate(&parse(source).unwrap())
    }

    #[test]
    fn keeps_needed_parentheses_only() {
        assert_eq!(round_trip("((a + b)) * c"), "(a + b) * c");
        assert_eq!(round_trip("a + (b * c)"), "a + b * c");
        assert_eq!(round_trip("a - (b - c)"), "a - (b - c)");
        assert_eq!(round_trip("2 ^ 3 ^ 2"), "2 ^ 3 ^ 2");
        assert_eq!(round_trip("(a = 1) + 2"), "(a = 1) + 2");
        assert_eq!(round_trip("a = b = 3"), "a = b = 3");
    }

    #[test]
    fn negative_literals_bind_like_unary_minus() {
        let node = Node::binary(Node::number(-5.0), BinaryOperator::Pow, Node::number(2.0));
        assert_eq!(generate(&node), "(-5) ^ 2");
        let power = Node::binary(Node::number(2.0), BinaryOperator::Pow, Node::number(2.0));
        let node = Node::unary(UnaryOperator::Negate, power);
        assert_eq!(generate(&node), "-2 ^ 2");
    }

    #[test]
    fn writes_every_construct() {
        assert_eq!(round_trip("for x in 1..=3 when x != 2 into acc = 0 then acc + x"),
                   "for x in 1..=3 when x != 2 into acc = 0 then acc + x");
        assert_eq!(round_trip("xs |> JOIN(?, \", \")"), "xs |> JOIN(?, \", \")");
        assert_eq!(round_trip("(if ok then [1] else [2])[0]"), "(if ok then [1] else [2])[0]");
        assert_eq!(round_trip("!done && 0..n == r"), "!done && 0..n == r");
        assert_eq!(round_trip("\"a\\\"b\\\\c\\n\\q\""), "\"a\\\"b\\\\c\\n\\\\q\"");
    }

    #[test]
    fn comments_are_written_back() {
        let source = "// header\nx = 1 // one\ny = x\n// footer";
        assert_eq!(round_trip(source), source);
    }

    #[test]
    fn statements_that_would_merge_are_parenthesized() {
        let node = Node::program(vec![Node::assignment("a", Node::identifier("b")),
                                      Node::number(-2.0)]);
        let text = generate(&node);
        assert_eq!(text, "(a = b)\n(-2)");
        assert!(matches!(parse(&text).unwrap().kind, NodeKind::Program { .. }));

        let node = parse("(1 + 2) * (3 + 4)\nxs = [1]\n([5])[0]").unwrap();
        assert_eq!(generate(&node), "((1 + 2) * (3 + 4))\n(xs = [1])\n([5][0])");
        let node = Node::program(vec![parse("(1 + 2) * (3 + 4)").unwrap(),
                                      Node::array(vec![Node::number(1.0)])]);
        assert_eq!(parse(&generate(&node)).unwrap(), node);
    }

    #[test]
    fn parenthesizing_carries_back_to_the_first_statement() {
        let node = Node::program(vec![Node::assignment("a", Node::identifier("a")),
                                      Node::assignment("b", Node::number(1.0)),
                                      Node::unary(UnaryOperator::Negate, Node::identifier("b"))]);
        let text = generate(&node);
        assert_eq!(text, "(a = a)\n(b = 1)\n(-b)");
        assert_eq!(parse(&text).unwrap(), node);
    }
}
