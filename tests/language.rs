use std::{collections::HashSet, fs, path::Path};

use calcula::{
    Error,
    ast::Node,
    error::{ErrorCategory, RuntimeError},
    evaluate_scope, evaluate_source, generate,
    interpreter::{evaluator::core::Context, value::core::Value},
    optimize, parse,
};
use walkdir::WalkDir;

/// What a fixture's first line promises.
#[derive(Debug)]
enum Expectation {
    Display(String),
    Failure(ErrorCategory),
}

impl Expectation {
    fn from_header(source: &str) -> Option<Self> {
        let header = source.lines().next()?.trim();
        if let Some(expected) = header.strip_prefix("// expect:") {
            return Some(Self::Display(expected.trim().to_string()));
        }
        let category = match header.strip_prefix("// error:")?.trim() {
            "Type" => ErrorCategory::Type,
            "Range" => ErrorCategory::Range,
            "UndefinedReference" => ErrorCategory::UndefinedReference,
            "Internal" => ErrorCategory::Internal,
            _ => return None,
        };
        Some(Self::Failure(category))
    }

    fn check(&self, path: &Path, stage: &str, result: &Result<Value, RuntimeError>) {
        match (self, result) {
            (Self::Display(expected), Ok(value)) => {
                assert_eq!(&value.to_string(), expected, "{path:?} ({stage})");
            },
            (Self::Failure(category), Err(error)) => {
                assert_eq!(error.category(), *category, "{path:?} ({stage}): {error}");
            },
            _ => panic!("{path:?} ({stage}): expected {self:?}, got {result:?}"),
        }
    }
}

#[test]
fn script_fixtures() {
    let mut count = 0;
    let context = Context::new().with_stdlib();

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "calc"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expectation = Expectation::from_header(&source)
            .unwrap_or_else(|| panic!("{path:?} has no '// expect:' or '// error:' header"));
        let node = parse(&source).unwrap_or_else(|e| panic!("{path:?}: {}", e.describe(&source)));
        count += 1;

        expectation.check(path, "as written", &context.evaluate(&node));

        let optimized = optimize(&node, Some(&HashSet::new())).and_then(|o| context.evaluate(&o));
        expectation.check(path, "optimized", &optimized);

        let regenerated = generate(&node);
        let reparsed = parse(&regenerated).unwrap_or_else(|e| {
                                              panic!("{path:?}: regenerated source does not parse: \
                                                      {e}\n{regenerated}")
                                          });
        expectation.check(path, "regenerated", &context.evaluate(&reparsed));
    }

    assert!(count > 0, "No fixtures found in tests/scripts");
}

fn eval(source: &str) -> Value {
    evaluate_source(source, &Context::new().with_stdlib()).unwrap_or_else(|e| {
                                                              panic!("Script failed: {e}\n{source}")
                                                          })
}

fn assert_value(source: &str, expected: &str) {
    assert_eq!(eval(source).to_string(), expected, "{source}");
}

fn runtime_error(source: &str) -> RuntimeError {
    match evaluate_source(source, &Context::new().with_stdlib()) {
        Err(Error::Runtime(error)) => error,
        other => panic!("Expected a runtime error from {source:?}, got {other:?}"),
    }
}

#[test]
fn arithmetic_and_precedence() {
    assert_value("2 + 3 * 4", "14");
    assert_value("(2 + 3) * 4", "20");
    assert_value("10 - 4 - 3", "3");
    assert_value("2 ^ 3 ^ 2", "512");
    assert_value("-2 ^ 2", "-4");
    assert_value("7 % 3", "1");
    assert_value("-7 % 3", "-1");
    assert_value("1 / 4", "0.25");
    assert_value("1 + 2 == 3 && 2 < 1 || true", "true");
}

#[test]
fn division_and_modulo_by_zero() {
    assert_eq!(runtime_error("1 / 0"), RuntimeError::DivisionByZero);
    assert_eq!(runtime_error("1 % 0"), RuntimeError::ModuloByZero);
}

#[test]
fn strings_are_indexed_by_character() {
    assert_value("\"ab\" + \"cd\"", "abcd");
    assert_value("\"héllo\"[1]", "é");
    assert_value("\"héllo\"[-1]", "o");
    assert_value("\"tab\\there\"", "tab\there");
    assert_value("\"keep \\q\"", "keep \\q");
    assert!(matches!(runtime_error("\"abc\"[3]"),
                     RuntimeError::IndexOutOfBounds { index: 3, length: 3 }));
}

#[test]
fn arrays_are_homogeneous() {
    assert_value("[1, 2] + [3]", "[1, 2, 3]");
    assert_value("[[1], [2, 3]][1][0]", "2");
    assert_value("[1, 2][-1]", "2");
    assert!(matches!(runtime_error("[1, \"a\"]"), RuntimeError::HeterogeneousArray { .. }));
    assert!(matches!(runtime_error("[1] + [\"a\"]"), RuntimeError::HeterogeneousArray { .. }));
    assert!(matches!(runtime_error("[1, 2][0.5]"), RuntimeError::NonIntegral { .. }));
}

#[test]
fn equality_is_structural_and_ordering_is_typed() {
    assert_value("[1, 2] == [1, 2]", "true");
    assert_value("1 == \"1\"", "false");
    assert_value("\"apple\" < \"banana\"", "true");
    assert_value("DATE(2024, 1, 1) < DATE(2024, 1, 2)", "true");
    assert_eq!(runtime_error("1 < \"a\"").category(), ErrorCategory::Type);
    assert_eq!(runtime_error("DATE(2024, 1, 1) + 1").category(), ErrorCategory::Type);
}

#[test]
fn nan_compares_false() {
    assert_value("n = POW(-1, 0.5); checks = [n == n, n < 1, n >= 1]", "[false, false, false]");
}

#[test]
fn conditions_must_be_boolean() {
    assert_value("if 2 > 1 then \"yes\" else \"no\"", "yes");
    assert_eq!(runtime_error("if 1 then 2 else 3").category(), ErrorCategory::Type);
    assert_eq!(runtime_error("1 && true").category(), ErrorCategory::Type);
    assert_eq!(runtime_error("!5").category(), ErrorCategory::Type);
}

#[test]
fn logical_operators_short_circuit() {
    assert_value("false && MISSING()", "false");
    assert_value("true || 1 / 0 > 0", "true");
    assert!(matches!(runtime_error("true && MISSING()"), RuntimeError::UndefinedFunction { .. }));
}

#[test]
fn assignments_return_their_value() {
    assert_value("y = (x = 3) + 1; x + y", "7");
    assert_value("a = b = 2; a * b", "4");
}

#[test]
fn for_loops_map_filter_and_fold() {
    assert_value("for x in [1, 2, 3] then x * 10", "[10, 20, 30]");
    assert_value("for x in 1..=6 when x % 2 == 0 then x", "[2, 4, 6]");
    assert_value("for x in [1, 2, 3] into total = 100 then total - x", "94");
    assert_value("for c in \"abc\" then UPPER(c)", "[\"A\", \"B\", \"C\"]");
    assert_value("for x in [] then x", "[]");
    assert_value("for x in [] into acc = 7 then acc + x", "7");
    assert_eq!(runtime_error("for x in 5 then x").category(), ErrorCategory::Type);
    assert_eq!(runtime_error("for x in [1, 2] then if x > 1 then \"a\" else 0").category(),
               ErrorCategory::Type);
}

#[test]
fn accumulator_is_bound_before_the_guard() {
    assert_value("for x in [1, 2, 3] when acc < 3 into acc = 0 then acc + x", "3");
}

#[test]
fn loop_bindings_are_restored() {
    assert_value("x = 5; ys = for x in [1, 2] then x; x", "5");
    assert_value("acc = \"outer\"; n = for x in [1] into acc = 0 then acc + x; acc", "outer");
    assert_eq!(runtime_error("for x in [1] then x; x"),
               RuntimeError::UndefinedVariable { name: "x".to_string() });
}

#[test]
fn accumulator_init_sees_the_outer_binding() {
    assert_value("acc = 10; for x in [1, 2] into acc = acc * 2 then acc + x", "23");
}

#[test]
fn loop_bodies_can_assign_outer_variables() {
    assert_value("count = 0; for x in [1, 2, 3] then count = count + x; count", "6");
}

#[test]
fn ranges() {
    assert_value("1..4", "[1, 2, 3]");
    assert_value("1..=4", "[1, 2, 3, 4]");
    assert_value("3..3", "[]");
    assert_value("-2..=0", "[-2, -1, 0]");
    assert!(matches!(runtime_error("5..1"), RuntimeError::InvalidRange { start: 5, end: 1 }));
    assert!(matches!(runtime_error("1.5..3"), RuntimeError::NonIntegral { .. }));
}

#[test]
fn pipes_fill_every_placeholder() {
    assert_value("[3, 1, 2] |> SORT(?)", "[1, 2, 3]");
    assert_value("\"a,b\" |> SPLIT(?, \",\")", "[\"a\", \"b\"]");
    assert_value("5 |> POW(?, ?)", "3125");
    assert_value("-4 |> ABS(?) |> SQRT(?)", "2");
}

#[test]
fn piped_value_is_evaluated_once() {
    assert_value("n = 0; (n = n + 1) |> POW(?, ?); n", "1");
}

#[test]
fn host_functions_and_variables() {
    let context = Context::new().with_variable("base", 4)
                                .with_function("TWICE", |args| {
                                    Ok(Value::Number(args[0].as_number("TWICE")? * 2.0))
                                });
    assert_eq!(evaluate_source("base |> TWICE(?) + 1", &context).unwrap(), Value::from(9));
    assert!(matches!(evaluate_source("UNKNOWN(1)", &context),
                     Err(Error::Runtime(RuntimeError::UndefinedFunction { .. }))));
}

#[test]
fn host_variables_override_assignments() {
    let context = Context::new().with_variable("x", 10);
    let program = parse("x = 1; y = x + 1; y").unwrap();
    assert_eq!(context.evaluate(&program).unwrap(), Value::from(11));

    let scope = evaluate_scope(&program, &context).unwrap();
    assert_eq!(scope["x"], Value::from(10));
    assert_eq!(scope["y"], Value::from(11));
}

#[test]
fn overridden_assignment_still_evaluates_its_value() {
    let context = Context::new().with_variable("x", 10);
    assert!(matches!(evaluate_source("x = 1 / 0; x", &context),
                     Err(Error::Runtime(RuntimeError::DivisionByZero))));
}

#[test]
fn each_run_starts_from_a_fresh_scope() {
    let context = Context::new();
    let first = parse("counter = 1; counter").unwrap();
    let second = parse("counter").unwrap();
    assert_eq!(context.evaluate(&first).unwrap(), Value::from(1));
    assert!(context.evaluate(&second).is_err());
}

#[test]
fn evaluate_scope_reports_bindings_without_loop_locals() {
    let program = parse("total = for x in [1, 2] into acc = 0 then acc + x; label = \"t\"").unwrap();
    let scope = evaluate_scope(&program, &Context::new()).unwrap();
    let mut names: Vec<&String> = scope.keys().collect();
    names.sort();
    assert_eq!(names, ["label", "total"]);
}

#[test]
fn malformed_trees_fail_cleanly() {
    let context = Context::new();
    assert_eq!(context.evaluate(&Node::program(Vec::new())),
               Err(RuntimeError::EmptyProgram));
    assert_eq!(context.evaluate(&Node::placeholder()),
               Err(RuntimeError::PlaceholderOutsidePipe));
}

#[test]
fn zero_is_never_negative() {
    let Value::Number(total) = eval("SUM([])") else {
        panic!("SUM returns a number");
    };
    assert!(total == 0.0 && total.is_sign_positive());

    assert_value("0 * -1", "0");
    assert_value("[-0, 0 / -5]", "[0, 0]");
    assert_value("STRING(-(0)) + \"!\"", "0!");
}

#[test]
fn stdlib_functions() {
    assert_value("[ABS(-2), ROUND(2.5), FLOOR(-1.5), CEIL(1.2), SQRT(9), POW(2, 10)]",
                 "[2, 3, -2, 2, 3, 1024]");
    assert_value("[MIN(3, 1, 2), MAX([4, 8]), ROUND(3.14159, 2)]", "[1, 8, 3.14]");
    assert_value("[LEN(\"héllo\"), LEN([1, 2])]", "[5, 2]");
    assert_value("[UPPER(\"a\"), LOWER(\"B\"), TRIM(\"  c \"), REPLACE(\"aXa\", \"a\", \"b\")]",
                 "[\"A\", \"b\", \"c\", \"bXb\"]");
    assert_value("REPEAT(\"ab\", 2) + JOIN([1, 2, 3], \"+\")", "abab1+2+3");
    assert_value("[SUM([1, 2, 3]), AVERAGE([1, 2, 3, 4]), COUNT([]), SUM([])]", "[6, 2.5, 0, 0]");
    assert_value("[FIRST([7, 8]), LAST([7, 8])]", "[7, 8]");
    assert_value("REVERSE([1, 2, 3]) + FLATTEN([[4], [5, 6]])", "[3, 2, 1, 4, 5, 6]");
    assert_value("[TYPE(1), TYPE(\"s\"), TYPE([true]), TYPE(DATE(2024, 1, 1))]",
                 "[\"number\", \"string\", \"array\", \"date\"]");
    assert_value("NUMBER(\" 2.5 \") + NUMBER(true)", "3.5");
    assert_value("[YEAR(DATE(\"2024-05-06\")), MONTH(DATE(2024, 5, 6)), DAY(DATE(2024, 5, 6))]",
                 "[2024, 5, 6]");
    assert_value("t = TIME(\"08:05:09\"); parts = [HOUR(t), MINUTE(t), SECOND(t)]", "[8, 5, 9]");
    assert_value("DATETIME(DATE(2024, 5, 6), TIME(7, 0, 0))", "2024-05-06T07:00:00");
    assert_value("dt = DATETIME(2024, 5, 6, 7, 30, 0); TO_DATE(dt) |> STRING(?) + \" \" + STRING(TO_TIME(dt))",
                 "2024-05-06 07:30:00");
}

#[test]
fn stdlib_errors() {
    for source in ["MIN([])",
                   "MAX([])",
                   "AVERAGE([])",
                   "REPEAT(\"a\", -1)",
                   "AGE(DATE(2024, 1, 2), DATE(2024, 1, 1))",
                   "DATE(2023, 2, 29)",
                   "TIME(24, 0, 0)",
                   "SQRT(-1)",
                   "FIRST([])",
                   "NUMBER(\"abc\")"]
    {
        assert_eq!(runtime_error(source).category(), ErrorCategory::Range, "{source}");
    }

    assert!(matches!(runtime_error("ABS()"), RuntimeError::ArgumentCountMismatch { found: 0, .. }));
    assert_eq!(runtime_error("UPPER(1)").category(), ErrorCategory::Type);
    assert_eq!(runtime_error("SUM([\"a\"])").category(), ErrorCategory::Type);
}

#[test]
fn host_functions_replace_stdlib_ones() {
    let context =
        Context::new().with_function("ABS", |_| Ok(Value::from("custom"))).with_stdlib();
    assert_eq!(evaluate_source("ABS(-1)", &context).unwrap(), Value::from("custom"));
}
