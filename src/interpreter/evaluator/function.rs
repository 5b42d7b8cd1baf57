use crate::{
    ast::{Node, NodeKind, NodeRef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Function},
            scope::Scope,
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a function call.
    ///
    /// The function is looked up by name first; arguments are then evaluated
    /// left to right and passed to it.
    ///
    /// # Errors
    /// [`RuntimeError::UndefinedFunction`] when the context has no function of
    /// that name, or whatever an argument or the function itself raises.
    pub fn eval_function_call(&self,
                              name: &str,
                              args: &[NodeRef],
                              scope: &mut Scope)
                              -> EvalResult<Value> {
        let function = self.lookup_function(name)?;
        let values = args.iter()
                         .map(|arg| self.eval(arg, scope))
                         .collect::<EvalResult<Vec<_>>>()?;
        function(&values)
    }

    /// Evaluates `value |> NAME(args...)`.
    ///
    /// The piped value is evaluated once, before any argument. Every `?`
    /// placeholder among the arguments receives it; the remaining arguments
    /// are evaluated left to right.
    ///
    /// # Example
    /// ```
    /// use calcula::{interpreter::{evaluator::core::Context, value::core::Value}, parse};
    ///
    /// let context =
    ///     Context::new().with_function("ABS", |args| Ok(Value::Number(args[0].as_number("ABS")?.abs())));
    ///
    /// let program = parse("-5 |> ABS(?)").unwrap();
    /// assert_eq!(context.evaluate(&program).unwrap(), Value::from(5));
    /// ```
    pub fn eval_pipe(&self,
                     value: &Node,
                     name: &str,
                     args: &[NodeRef],
                     scope: &mut Scope)
                     -> EvalResult<Value> {
        let function = self.lookup_function(name)?;
        let piped = self.eval(value, scope)?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(match arg.kind {
                            NodeKind::Placeholder => piped.clone(),
                            _ => self.eval(arg, scope)?,
                        });
        }
        function(&values)
    }

    fn lookup_function(&self, name: &str) -> EvalResult<Function> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction { name: name.to_string() })
    }
}
