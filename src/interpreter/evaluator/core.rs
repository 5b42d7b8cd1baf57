use std::{collections::HashMap, fmt, rc::Rc};

use crate::{
    ast::{Node, NodeKind},
    error::RuntimeError,
    interpreter::{
        evaluator::scope::Scope,
        value::{array::homogeneous, core::Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A host function callable from programs by name.
///
/// Functions receive their evaluated arguments and must not depend on the
/// evaluation scope.
pub type Function = Rc<dyn Fn(&[Value]) -> EvalResult<Value>>;

/// Stores what the host provides to an evaluation.
///
/// `variables` seed the scope and act as read-only overrides: an assignment in
/// the program cannot replace a value the host supplied. `functions` are
/// looked up by name for calls and pipes.
///
/// ## Usage
///
/// A `Context` is built once and can evaluate any number of programs; each
/// evaluation gets a fresh [`Scope`], so runs never see each other's
/// assignments.
///
/// ```
/// use calcula::{interpreter::{evaluator::core::Context, value::core::Value}, parse};
///
/// let context = Context::new().with_variable("price", 10)
///                             .with_function("DOUBLE", |args| Ok(Value::Number(args[0].as_number("DOUBLE")? * 2.0)));
///
/// let program = parse("DOUBLE(price) + 1").unwrap();
/// assert_eq!(context.evaluate(&program).unwrap(), Value::Number(21.0));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    /// Host variables, marked external for the duration of each run.
    pub variables: HashMap<String, Value>,
    /// Host functions by name.
    pub functions: HashMap<String, Function>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<&String> = self.functions.keys().collect();
        functions.sort();
        f.debug_struct("Context")
         .field("variables", &self.variables)
         .field("functions", &functions)
         .finish()
    }
}

impl Context {
    /// Creates an empty context: no variables and no functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a host variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Adds a host function.
    #[must_use]
    pub fn with_function(mut self,
                         name: impl Into<String>,
                         function: impl Fn(&[Value]) -> EvalResult<Value> + 'static)
                         -> Self {
        self.functions.insert(name.into(), Rc::new(function));
        self
    }

    /// Adds every function of the standard library. Functions already present
    /// under the same name are kept.
    #[must_use]
    pub fn with_stdlib(mut self) -> Self {
        for (name, function) in crate::stdlib::functions() {
            self.functions.entry(name).or_insert(function);
        }
        self
    }

    /// Evaluates a node in a fresh scope and returns its value.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised while walking the tree.
    pub fn evaluate(&self, node: &Node) -> EvalResult<Value> {
        let mut scope = Scope::seeded(&self.variables);
        self.eval(node, &mut scope)
    }

    /// Evaluates a node in a fresh scope and returns the final bindings,
    /// including the host's variables.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised while walking the tree.
    pub fn evaluate_scope(&self, node: &Node) -> EvalResult<HashMap<String, Value>> {
        let mut scope = Scope::seeded(&self.variables);
        self.eval(node, &mut scope)?;
        Ok(scope.into_variables())
    }

    /// Evaluates a node against an existing scope.
    ///
    /// This is the recursive heart of the interpreter; it dispatches on the
    /// node kind and delegates compound constructs to their own methods.
    ///
    /// # Parameters
    /// - `node`: Node to evaluate.
    /// - `scope`: Bindings visible to the node; assignments update it.
    ///
    /// # Returns
    /// The value the node evaluates to. A program yields the value of its
    /// last statement.
    pub fn eval(&self, node: &Node, scope: &mut Scope) -> EvalResult<Value> {
        match &node.kind {
            NodeKind::Program { statements } => {
                let mut last = None;
                for statement in statements {
                    last = Some(self.eval(statement, scope)?);
                }
                last.ok_or(RuntimeError::EmptyProgram)
            },
            NodeKind::NumberLiteral { value } => Ok(Value::Number(*value)),
            NodeKind::StringLiteral { value } => Ok(Value::String(value.clone())),
            NodeKind::BooleanLiteral { value } => Ok(Value::Boolean(*value)),
            NodeKind::ArrayLiteral { elements } => {
                let values = elements.iter()
                                     .map(|element| self.eval(element, scope))
                                     .collect::<EvalResult<Vec<_>>>()?;
                homogeneous(values)
            },
            NodeKind::Identifier { name } => {
                scope.get(name)
                     .cloned()
                     .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
            },
            NodeKind::BinaryOp { left,
                                 operator,
                                 right, } => self.eval_binary_op(left, *operator, right, scope),
            NodeKind::UnaryOp { operator, argument } => {
                self.eval_unary_op(*operator, argument, scope)
            },
            NodeKind::FunctionCall { name, args } => self.eval_function_call(name, args, scope),
            NodeKind::Assignment { name, value } => self.eval_assignment(name, value, scope),
            NodeKind::IfExpression { condition,
                                     consequent,
                                     alternate, } => {
                if self.eval(condition, scope)?.as_bool("if condition")? {
                    self.eval(consequent, scope)
                } else {
                    self.eval(alternate, scope)
                }
            },
            NodeKind::ForExpression { variable,
                                      iterable,
                                      guard,
                                      accumulator,
                                      body, } => self.eval_for(variable,
                                                               iterable,
                                                               guard.as_deref(),
                                                               accumulator.as_ref(),
                                                               body,
                                                               scope),
            NodeKind::IndexAccess { object, index } => self.eval_index(object, index, scope),
            NodeKind::RangeExpression { start,
                                        end,
                                        inclusive, } => {
                self.eval_range(start, end, *inclusive, scope)
            },
            NodeKind::PipeExpression { value, name, args } => {
                self.eval_pipe(value, name, args, scope)
            },
            NodeKind::Placeholder => Err(RuntimeError::PlaceholderOutsidePipe),
        }
    }

    /// Evaluates `name = value`.
    ///
    /// The right-hand side is always evaluated. If `name` holds a value the
    /// host supplied, that value wins and the assignment is a no-op.
    fn eval_assignment(&self, name: &str, value: &Node, scope: &mut Scope) -> EvalResult<Value> {
        let computed = self.eval(value, scope)?;

        if let Some(external) = scope.external_value(name) {
            return Ok(external.clone());
        }

        scope.set(name, computed.clone());
        Ok(computed)
    }
}
