use std::{collections::HashSet, fs, process};

use calcula::{
    Error, generate,
    interpreter::{evaluator::core::Context, value::core::Value},
    optimize, parse,
};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

/// calcula evaluates formulas: arithmetic, strings, arrays, conditionals,
/// `for` comprehensions and `|>` pipes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells calcula to read the program from a file instead of the argument.
    #[arg(short, long)]
    file: bool,

    /// Runs the optimizer first. Variables given with `--var` are treated as
    /// external and are never propagated.
    #[arg(short, long)]
    optimize: bool,

    /// Prints the (optimized) program instead of evaluating it.
    #[arg(short, long)]
    print: bool,

    /// Prints every variable binding after evaluation, sorted by name.
    #[arg(short, long)]
    scope: bool,

    /// Seeds a host variable, as `NAME=VALUE`. Values are read as numbers,
    /// `true`/`false`, or otherwise as strings.
    #[arg(short, long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    contents: String,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter)
         .with_writer(std::io::stderr)
         .with_target(false)
         .init();

    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
                                              eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                                                        &args.contents);
                                              process::exit(1);
                                          })
    } else {
        args.contents.clone()
    };

    if let Err(e) = run(&args, &source) {
        match e {
            Error::Parse(parse_error) => eprintln!("{}", parse_error.describe(&source)),
            Error::Runtime(runtime_error) => eprintln!("{runtime_error}"),
        }
        process::exit(1);
    }
}

fn run(args: &Args, source: &str) -> Result<(), Error> {
    let mut node = parse(source)?;

    if args.optimize {
        let external: HashSet<String> = args.vars.iter().map(|(name, _)| name.clone()).collect();
        node = optimize(&node, Some(&external))?;
    }

    if args.print {
        println!("{}", generate(&node));
        return Ok(());
    }

    let context = args.vars
                      .iter()
                      .fold(Context::new().with_stdlib(), |context, (name, value)| {
                          context.with_variable(name.clone(), host_value(value))
                      });

    if args.scope {
        let mut bindings: Vec<(String, Value)> = context.evaluate_scope(&node)?.into_iter().collect();
        bindings.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (name, value) in bindings {
            println!("{name} = {value}");
        }
    } else {
        println!("{}", context.evaluate(&node)?);
    }

    Ok(())
}

/// Splits a `NAME=VALUE` pair for `--var`.
fn parse_var(pair: &str) -> Result<(String, String), String> {
    let (name, value) = pair.split_once('=')
                            .ok_or_else(|| format!("expected NAME=VALUE, found '{pair}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{pair}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Reads a `--var` value as a number, a boolean, or else a string.
fn host_value(text: &str) -> Value {
    match text.trim() {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        trimmed => trimmed.parse::<f64>()
                          .map_or_else(|_| Value::String(text.to_string()), Value::Number),
    }
}
