use std::{collections::HashSet, rc::Rc};

use calcula::{
    ast::{BinaryOperator, Node, NodeRef, UnaryOperator},
    error::RuntimeError,
    generate,
    interpreter::{evaluator::core::Context, value::core::Value},
    optimize, parse,
};
use proptest::prelude::*;

fn binary_operator() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![Just(BinaryOperator::Add),
                Just(BinaryOperator::Sub),
                Just(BinaryOperator::Mul),
                Just(BinaryOperator::Div),
                Just(BinaryOperator::Mod),
                Just(BinaryOperator::Pow),
                Just(BinaryOperator::Equal),
                Just(BinaryOperator::NotEqual),
                Just(BinaryOperator::Less),
                Just(BinaryOperator::GreaterEqual),
                Just(BinaryOperator::And),
                Just(BinaryOperator::Or)]
}

/// Leaves: small non-negative numbers, booleans, short strings with
/// characters that need escaping, and the variables `a` and `b`.
fn leaf() -> impl Strategy<Value = NodeRef> {
    prop_oneof![(0_u8..20).prop_map(|n| Node::number(f64::from(n))),
                (0_u8..8).prop_map(|n| Node::number(f64::from(n) + 0.5)),
                any::<bool>().prop_map(Node::boolean),
                "[a-c\"\\\\ ]{0,3}".prop_map(Node::string),
                prop_oneof![Just("a"), Just("b")].prop_map(Node::identifier)]
}

fn expression() -> impl Strategy<Value = NodeRef> {
    leaf().prop_recursive(4, 32, 3, |inner| {
              prop_oneof![(inner.clone(), binary_operator(), inner.clone())
                              .prop_map(|(l, op, r)| Node::binary(l, op, r)),
                          inner.clone().prop_map(|n| Node::unary(UnaryOperator::Negate, n)),
                          inner.clone().prop_map(|n| Node::unary(UnaryOperator::Not, n)),
                          (inner.clone(), inner.clone(), inner.clone())
                              .prop_map(|(c, t, e)| Node::if_expression(c, t, e)),
                          prop::collection::vec(inner.clone(), 0..3).prop_map(Node::array),
                          (inner.clone(), inner.clone()).prop_map(|(o, i)| Node::index(o, i)),
                          (inner.clone(), inner.clone(), any::<bool>())
                              .prop_map(|(s, e, inclusive)| Node::range(s, e, inclusive)),
                          (inner.clone(), inner.clone()).prop_map(|(v, a)| {
                              Node::pipe(v, "POW", vec![Node::placeholder(), a])
                          }),
                          inner.prop_map(|body| {
                              Node::for_expression("a", Node::identifier("xs"), None, None, body)
                          })]
          })
}

/// A program that assigns `a` and `b` before using them, so propagation and
/// dead-code elimination have something to do.
fn program() -> impl Strategy<Value = NodeRef> {
    (expression(), expression(), expression()).prop_map(|(first, second, last)| {
        Node::program(vec![Node::assignment("a", first), Node::assignment("b", second), last])
    })
}

fn context() -> Context {
    let xs = Value::Array(Rc::new(vec![Value::from(1), Value::from(2)]));
    Context::new().with_stdlib().with_variable("xs", xs)
}

/// Results compared through their text, so `NaN` equals itself.
fn outcome(result: &Result<Value, RuntimeError>) -> String {
    match result {
        Ok(value) => format!("ok {value}"),
        Err(error) => format!("error {error}"),
    }
}

proptest! {
    #[test]
    fn parser_does_not_panic(source in "\\PC*") {
        let _ = parse(&source);
    }

    #[test]
    fn parser_does_not_panic_on_operator_soup(source in "[-+*/%^=!<>&|?()\\[\\],.;a1 \"\\n]{0,40}") {
        let _ = parse(&source);
    }

    #[test]
    fn generated_code_parses_back_to_the_same_tree(node in expression()) {
        let text = generate(&node);
        let reparsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{e}: {text}")))?;
        prop_assert_eq!(reparsed, node, "{}", text);
    }

    #[test]
    fn generated_programs_parse_back_to_the_same_tree(node in program()) {
        let text = generate(&node);
        let reparsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{e}: {text}")))?;
        prop_assert_eq!(reparsed, node, "{}", text);
    }

    /// Dead-code elimination may drop a failing assignment, so only
    /// successful runs must agree.
    #[test]
    fn optimizing_preserves_results(node in program()) {
        let context = context();
        let expected = context.evaluate(&node);

        match optimize(&node, Some(&HashSet::new())) {
            Ok(optimized) if expected.is_ok() => {
                prop_assert_eq!(outcome(&context.evaluate(&optimized)), outcome(&expected),
                                "{}", generate(&optimized));
            },
            Ok(_) => {},
            Err(error) => prop_assert!(error.is_zero_divisor(), "{}", error),
        }
    }

    #[test]
    fn optimizing_is_idempotent(node in program()) {
        if let Ok(once) = optimize(&node, Some(&HashSet::new())) {
            let twice = optimize(&once, Some(&HashSet::new()));
            prop_assert_eq!(twice, Ok(once));
        }
    }

    #[test]
    fn folding_alone_preserves_results(node in expression()) {
        let context = context();
        if let Ok(folded) = optimize(&node, None) {
            prop_assert_eq!(outcome(&context.evaluate(&folded)), outcome(&context.evaluate(&node)));
        }
    }
}
