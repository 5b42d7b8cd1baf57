use calcula::{
    ast::{Node, NodeKind},
    error::{LineColumn, ParseError},
    parse, to_line_column,
};

/// Renders a tree as an S-expression, which makes grouping explicit.
fn shape(node: &Node) -> String {
    let list = |nodes: &[calcula::ast::NodeRef]| {
        nodes.iter().map(|node| shape(node)).collect::<Vec<_>>().join(" ")
    };

    match &node.kind {
        NodeKind::Program { statements } => format!("(program {})", list(statements)),
        NodeKind::NumberLiteral { value } => value.to_string(),
        NodeKind::StringLiteral { value } => format!("{value:?}"),
        NodeKind::BooleanLiteral { value } => value.to_string(),
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::Placeholder => "?".to_string(),
        NodeKind::ArrayLiteral { elements } => format!("[{}]", list(elements)),
        NodeKind::FunctionCall { name, args } => format!("({name} {})", list(args)),
        NodeKind::BinaryOp { left,
                             operator,
                             right, } => format!("({operator} {} {})", shape(left), shape(right)),
        NodeKind::UnaryOp { operator, argument } => format!("({operator} {})", shape(argument)),
        NodeKind::Assignment { name, value } => format!("(= {name} {})", shape(value)),
        NodeKind::IfExpression { condition,
                                 consequent,
                                 alternate, } => {
            format!("(if {} {} {})", shape(condition), shape(consequent), shape(alternate))
        },
        NodeKind::ForExpression { variable,
                                  iterable,
                                  guard,
                                  accumulator,
                                  body, } => {
            let mut text = format!("(for {variable} {}", shape(iterable));
            if let Some(guard) = guard {
                text.push_str(&format!(" when {}", shape(guard)));
            }
            if let Some(accumulator) = accumulator {
                text.push_str(&format!(" into {} {}",
                                       accumulator.name,
                                       shape(&accumulator.initial)));
            }
            text.push_str(&format!(" {})", shape(body)));
            text
        },
        NodeKind::IndexAccess { object, index } => {
            format!("(index {} {})", shape(object), shape(index))
        },
        NodeKind::RangeExpression { start,
                                    end,
                                    inclusive, } => {
            let operator = if *inclusive { "..=" } else { ".." };
            format!("({operator} {} {})", shape(start), shape(end))
        },
        NodeKind::PipeExpression { value, name, args } => {
            format!("(|> {} ({name} {}))", shape(value), list(args))
        },
    }
}

fn assert_shape(source: &str, expected: &str) {
    let node = parse(source).unwrap_or_else(|e| panic!("{}", e.describe(source)));
    assert_eq!(shape(&node), expected, "{source}");
}

fn parse_error(source: &str) -> ParseError {
    parse(source).expect_err(source)
}

#[test]
fn binary_precedence_and_associativity() {
    assert_shape("1 + 2 * 3", "(+ 1 (* 2 3))");
    assert_shape("1 - 2 - 3", "(- (- 1 2) 3)");
    assert_shape("2 ^ 3 ^ 2", "(^ 2 (^ 3 2))");
    assert_shape("a * b % c / d", "(/ (% (* a b) c) d)");
    assert_shape("a < b == c > d", "(> (== (< a b) c) d)");
    assert_shape("a || b && c", "(|| a (&& b c))");
    assert_shape("(1 + 2) * 3", "(* (+ 1 2) 3)");
}

#[test]
fn prefix_operators_bind_below_power() {
    assert_shape("-2 ^ 2", "(- (^ 2 2))");
    assert_shape("-a * b", "(* (- a) b)");
    assert_shape("!a && b", "(&& (! a) b)");
    assert_shape("--x", "(- (- x))");
}

#[test]
fn assignment_is_right_associative_and_lowest() {
    assert_shape("a = b = 1 + 2", "(= a (= b (+ 1 2)))");
    assert_shape("x = a |> F(?)", "(= x (|> a (F ?)))");
}

#[test]
fn ranges_sit_between_comparison_and_addition() {
    assert_shape("1..n + 1", "(.. 1 (+ n 1))");
    assert_shape("0..=2 == r", "(== (..= 0 2) r)");
}

#[test]
fn pipes_are_left_associative_and_bind_loosely() {
    assert_shape("x |> F(?) |> G(?, 1)", "(|> (|> x (F ?)) (G ? 1))");
    assert_shape("a + b |> F(?)", "(|> (+ a b) (F ?))");
    assert_shape("5 |> POW(?, ?)", "(|> 5 (POW ? ?))");
}

#[test]
fn indexing_binds_tightest() {
    assert_shape("-xs[0]", "(- (index xs 0))");
    assert_shape("m[1][2] ^ 2", "(^ (index (index m 1) 2) 2)");
    assert_shape("F(x)[0]", "(index (F x) 0)");
    assert_shape("\"abc\"[i + 1]", "(index \"abc\" (+ i 1))");
}

#[test]
fn if_and_for_extend_to_the_right() {
    assert_shape("if a then 1 else 2 + 3", "(if a 1 (+ 2 3))");
    assert_shape("if a then if b then 1 else 2 else 3", "(if a (if b 1 2) 3)");
    assert_shape("for x in xs then x * 2", "(for x xs (* x 2))");
    assert_shape("for x in 1..=3 when x > 1 into s = 0 then s + x",
                 "(for x (..= 1 3) when (> x 1) into s 0 (+ s x))");
    assert_shape("for row in m then for x in row then x", "(for row m (for x row x))");
}

#[test]
fn literals() {
    assert_shape("[1, \"two\", true, []]", "[1 \"two\" true []]");
    assert_shape("3.25", "3.25");
    assert_shape("\"line\\nnext\"", "\"line\\nnext\"");
    assert_shape("F()", "(F )");
}

#[test]
fn statements_end_where_the_grammar_stops() {
    assert_shape("a = 1; b = 2", "(program (= a 1) (= b 2))");
    assert_shape("a = 1\nb = a\nb", "(program (= a 1) (= b a) b)");
    assert_shape("a = 1 b = 2", "(program (= a 1) (= b 2))");
    assert_shape("x;;;", "x");
    assert_shape("x\n-y", "(- x y)");
    assert_shape("f\n(y)", "(f y)");
}

#[test]
fn a_single_statement_is_not_wrapped() {
    assert!(matches!(parse("1 + 1").unwrap().kind, NodeKind::BinaryOp { .. }));
    assert!(matches!(parse("a = 1; a").unwrap().kind, NodeKind::Program { .. }));
}

#[test]
fn comments_attach_to_statements() {
    let source = "// inputs\nrate = 0.2 // percent\n\n// result\nrate * 100\n// end";
    let program = parse(source).unwrap();
    let NodeKind::Program { statements } = &program.kind else {
        panic!("expected a program");
    };

    assert_eq!(statements[0].leading_comments, ["inputs"]);
    assert_eq!(statements[0].trailing_comments, ["percent"]);
    assert_eq!(statements[1].leading_comments, ["result"]);
    assert!(statements[1].trailing_comments.is_empty());
    assert_eq!(program.trailing_comments, ["end"]);
    assert!(program.has_comments());
    assert!(!parse("rate * 100").unwrap().has_comments());
}

#[test]
fn a_trailing_comment_wraps_a_single_statement() {
    let node = parse("x + 1\n// done").unwrap();
    assert!(matches!(&node.kind, NodeKind::Program { statements } if statements.len() == 1));
    assert_eq!(node.trailing_comments, ["done"]);

    let node = parse("// about x\nx").unwrap();
    assert!(matches!(node.kind, NodeKind::Identifier { .. }));
    assert_eq!(node.leading_comments, ["about x"]);
}

#[test]
fn error_messages_and_spans() {
    let cases = [("1 +", "Unexpected end of input", 3, 3),
                 ("1 = 2", "Invalid assignment target", 0, 1),
                 ("(1 + 2", "Expected ')'", 6, 6),
                 ("[1, 2", "Expected ']'", 5, 5),
                 ("if a then b", "Expected 'else' in if expression", 11, 11),
                 ("for x of xs then x", "Expected 'in' after for variable", 6, 8),
                 ("x |> F(1)", "Pipe expression requires at least one ? placeholder", 2, 9),
                 ("x |> 3", "Expected function call after |>", 5, 6),
                 ("? + 1", "Placeholder '?' is only valid as a pipe argument", 0, 1),
                 ("a $ b", "Unexpected character '$'", 2, 3),
                 ("\"open", "Unterminated string", 0, 5),
                 ("1 )", "Unexpected token ')'", 2, 3)];

    for (source, message, start, end) in cases {
        assert_eq!(parse_error(source), ParseError::new(message, start, end), "{source}");
    }
}

#[test]
fn sources_without_statements_are_rejected() {
    for source in ["", "   ", ";;", "// just a comment"] {
        let error = parse_error(source);
        assert_eq!(error.message, "Expected an expression", "{source:?}");
        assert_eq!((error.start, error.end), (0, source.len()));
    }
}

#[test]
fn errors_report_lines_and_columns() {
    let source = "total = 1\nbad = (2 +\n";
    let error = parse_error(source);
    assert_eq!(to_line_column(source, error.start), LineColumn { line: 3, column: 1 });

    let source = "name = \"é\" $";
    let error = parse_error(source);
    assert_eq!(error.describe(source), "line 1, column 12: Unexpected character '$'");
}
