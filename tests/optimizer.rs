use std::collections::HashSet;

use calcula::{
    ast::NodeKind,
    error::RuntimeError,
    generate,
    interpreter::{evaluator::core::Context, value::core::Value},
    optimize,
    optimizer::fold::MAX_FOLDED_RANGE,
    parse,
};

fn no_externals() -> HashSet<String> {
    HashSet::new()
}

/// Optimizes `source` with no external variables and returns the generated
/// code.
fn optimized(source: &str) -> String {
    let node = parse(source).unwrap();
    generate(&optimize(&node, Some(&no_externals())).unwrap())
}

fn folded(source: &str) -> String {
    generate(&optimize(&parse(source).unwrap(), None).unwrap())
}

#[test]
fn folds_literal_operations() {
    assert_eq!(folded("2 + 3 * 4"), "14");
    assert_eq!(folded("\"ab\" + \"cd\""), "\"abcd\"");
    assert_eq!(folded("[1, 2] + [3]"), "[1, 2, 3]");
    assert_eq!(folded("!(1 < 2)"), "false");
    assert_eq!(folded("-(2 ^ 2)"), "-4");
    assert_eq!(folded("x * (2 + 3)"), "x * 5");
    assert_eq!(folded("[10, 20, 30][1]"), "20");
    assert_eq!(folded("\"héllo\"[-4]"), "\"é\"");
    assert_eq!(folded("1..=3"), "[1, 2, 3]");
}

#[test]
fn calls_and_pipes_are_never_folded() {
    assert_eq!(folded("ABS(1 - 3)"), "ABS(-2)");
    assert_eq!(folded("(1 + 1) |> POW(?, 3)"), "2 |> POW(?, 3)");
}

#[test]
fn failing_operations_are_left_for_evaluation() {
    assert_eq!(folded("1 + \"a\""), "1 + \"a\"");
    assert_eq!(folded("[1, \"a\"]"), "[1, \"a\"]");
    assert_eq!(folded("5..1"), "5..1");
    assert_eq!(folded("1.5..3"), "1.5..3");
    assert_eq!(folded("-true"), "-true");
}

#[test]
fn out_of_range_literal_index_is_not_folded() {
    assert_eq!(folded("[1, 2][5]"), "[1, 2][5]");
    let node = optimize(&parse("[1, 2][5]").unwrap(), None).unwrap();
    assert!(matches!(Context::new().evaluate(&node),
                     Err(RuntimeError::IndexOutOfBounds { index: 5, length: 2 })));
}

#[test]
fn literal_division_by_zero_fails_during_optimization() {
    for (source, expected) in [("1 / 0", RuntimeError::DivisionByZero),
                               ("x = 4 % 0; x", RuntimeError::ModuloByZero),
                               ("y + 10 / (2 - 2)", RuntimeError::DivisionByZero)]
    {
        assert_eq!(optimize(&parse(source).unwrap(), None), Err(expected), "{source}");
    }
}

#[test]
fn non_finite_results_are_not_folded() {
    assert_eq!(folded("10 ^ 400"), "10 ^ 400");
    assert_eq!(folded("(-1) ^ 0.5"), "(-1) ^ 0.5");
}

#[test]
fn large_ranges_are_left_for_evaluation() {
    let source = format!("0..{}", MAX_FOLDED_RANGE + 1);
    assert_eq!(folded(&source), source);

    let expanded = optimize(&parse(&format!("0..{MAX_FOLDED_RANGE}")).unwrap(), None).unwrap();
    assert!(matches!(&expanded.kind,
                     NodeKind::ArrayLiteral { elements } if elements.len() == 10_000));
}

#[test]
fn literal_conditions_select_one_branch() {
    assert_eq!(folded("if 2 > 1 then \"yes\" else 1 / 0"), "\"yes\"");
    assert_eq!(folded("if false then x else y + 0"), "y + 0");
    assert_eq!(folded("if c then 1 + 1 else 2 * 2"), "if c then 2 else 4");
}

#[test]
fn untaken_branches_are_not_folded() {
    let node = optimize(&parse("if true then 1 else 1 / 0").unwrap(), None).unwrap();
    assert_eq!(node.kind, NodeKind::NumberLiteral { value: 1.0 });
}

#[test]
fn logical_operators_fold_like_they_evaluate() {
    assert_eq!(folded("false && 1 / 0 > 0"), "false");
    assert_eq!(folded("true || MISSING()"), "true");
    assert_eq!(folded("true && false"), "false");
    assert_eq!(folded("true && x"), "true && x");
    assert!(optimize(&parse("true && 1 / 0 > 0").unwrap(), None).is_err());
}

#[test]
fn propagates_single_literal_assignments() {
    assert_eq!(optimized("x = 5; x + 10"), "15");
    assert_eq!(optimized("a = 2; b = a * 3; c = b + n; c"), "c = 6 + n\nc");
    assert_eq!(optimized("names = [\"a\", \"b\"]; JOIN(names, \"-\")"), "JOIN([\"a\", \"b\"], \"-\")");
}

#[test]
fn nothing_is_propagated_without_an_external_set() {
    assert_eq!(folded("x = 5; x + 10"), "x = 5\nx + 10");
}

#[test]
fn external_variables_are_not_propagated() {
    let external = HashSet::from(["rate".to_string()]);
    let node = parse("rate = 0.2; base = 100; base * rate").unwrap();
    let optimized = optimize(&node, Some(&external)).unwrap();
    assert_eq!(generate(&optimized), "rate = 0.2\n100 * rate");

    let context = Context::new().with_variable("rate", 0.5);
    assert_eq!(context.evaluate(&optimized).unwrap(), Value::from(50));
    assert_eq!(context.evaluate(&node).unwrap(), Value::from(50));
}

#[test]
fn reassigned_variables_are_not_propagated() {
    let source = "x = 1; y = x; x = 2; y";
    let node = parse(source).unwrap();
    let optimized = optimize(&node, Some(&no_externals())).unwrap();
    assert_eq!(Context::new().evaluate(&optimized).unwrap(), Value::from(1));

    // Once the dead `x = 2` is gone, `x` has a single assignment again.
    assert_eq!(generate(&optimized), "1");
}

#[test]
fn loop_bindings_are_not_propagated() {
    let source = "x = 10; xs = for x in [1, 2] then x; total = for i in xs into x = 0 then x + i; \
                  total + x";
    let node = parse(source).unwrap();
    let optimized = optimize(&node, Some(&no_externals())).unwrap();
    assert_eq!(Context::new().evaluate(&optimized).unwrap(), Value::from(13));
}

#[test]
fn reads_before_the_assignment_keep_failing() {
    let node = parse("y = x + 1; x = 2; y").unwrap();
    let optimized = optimize(&node, Some(&no_externals())).unwrap();
    assert!(matches!(Context::new().evaluate(&optimized),
                     Err(RuntimeError::UndefinedVariable { .. })));
}

#[test]
fn propagated_zero_divisors_fail_during_optimization() {
    let node = parse("d = 0; 10 / d").unwrap();
    assert_eq!(optimize(&node, Some(&no_externals())), Err(RuntimeError::DivisionByZero));
    assert!(optimize(&node, None).is_ok());
}

#[test]
fn removes_unread_assignments() {
    assert_eq!(optimized("unused = f(1); y = 2; z = y + n; z"), "z = 2 + n\nz");
    assert_eq!(folded("a = 1; b = a; unused = 3; c = b; c * 2"), "a = 1\nb = a\nc = b\nc * 2");
}

#[test]
fn the_last_statement_is_always_kept() {
    assert_eq!(folded("x = 1; y = 2"), "y = 2");
    assert_eq!(optimized("x = 1; y = 2"), "y = 2");
}

#[test]
fn assignments_with_nested_assignments_are_kept() {
    let source = "a = (b = 3) + 1; b * 2";
    assert_eq!(folded(source), "a = (b = 3) + 1\nb * 2");
    let node = optimize(&parse(source).unwrap(), Some(&no_externals())).unwrap();
    assert_eq!(Context::new().evaluate(&node).unwrap(), Value::from(6));
}

#[test]
fn comments_survive_rewrites() {
    let source = "// inputs\nrate = 2 // doubled\nrate * 3 // result";
    assert_eq!(folded(source), source);
    assert_eq!(optimized(source), "6 // result");
}

#[test]
fn optimization_is_idempotent() {
    for source in ["x = 5; y = x * 2; z = y + w; unused = 1; z",
                   "a = [1, 2]; for v in a when v > 1 into s = 0 then s + v",
                   "name = \"calc\"; UPPER(name) + \"!\"",
                   "if flag then 1 + 1 else -(3)"]
    {
        let once = optimize(&parse(source).unwrap(), Some(&no_externals())).unwrap();
        let twice = optimize(&once, Some(&no_externals())).unwrap();
        assert_eq!(once, twice, "{source}");
    }
}

#[test]
fn optimized_programs_evaluate_to_the_same_value() {
    let context = Context::new().with_stdlib().with_variable("w", 4);
    let external = HashSet::from(["w".to_string()]);

    for source in ["x = 5; y = x * 2; z = y + w; unused = 1; z",
                   "a = [1, 2, 3]; for v in a when v > 1 into s = w then s + v",
                   "xs = 1..=4; xs |> SUM(?) + LEN(xs)",
                   "t = \"abc\"; for c in t then UPPER(c) + c",
                   "w = 100; w * 2",
                   "n = 3; if n % 2 == 1 then \"odd\" else \"even\""]
    {
        let node = parse(source).unwrap();
        let optimized = optimize(&node, Some(&external)).unwrap();
        assert_eq!(context.evaluate(&optimized), context.evaluate(&node), "{source}");
    }
}
