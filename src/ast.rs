use std::rc::Rc;

/// A shared, immutable handle to an AST node.
///
/// Nodes are created once by the parser (or the builders below) and never
/// mutated afterwards. Rewrites such as the optimizer build new nodes and hand
/// back the same handle when a subtree is unchanged.
pub type NodeRef = Rc<Node>;

/// A single node of the abstract syntax tree.
///
/// Every node carries its [`NodeKind`] plus the comments the parser attached
/// to it. Comments are pure metadata: they never influence evaluation, but
/// every rewrite that keeps a node's meaning carries them along.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The syntactic construct this node represents.
    pub kind:              NodeKind,
    /// Own-line comments that precede the node.
    pub leading_comments:  Vec<String>,
    /// Inline comments that follow the node on the same line.
    pub trailing_comments: Vec<String>,
}

/// The closed set of node variants.
///
/// Traversals match on this enum exhaustively, so adding a variant is a
/// compile error everywhere a decision has to be made.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A sequence of two or more statements; the value of the last one is the
    /// program's result.
    Program {
        /// Statements in source order.
        statements: Vec<NodeRef>,
    },
    /// A numeric literal such as `42` or `3.5`.
    NumberLiteral {
        /// The literal value.
        value: f64,
    },
    /// A double-quoted string literal with escapes already resolved.
    StringLiteral {
        /// The literal value.
        value: String,
    },
    /// `true` or `false`.
    BooleanLiteral {
        /// The literal value.
        value: bool,
    },
    /// `[a, b, c]`
    ArrayLiteral {
        /// Element expressions.
        elements: Vec<NodeRef>,
    },
    /// A variable reference.
    Identifier {
        /// Name of the variable.
        name: String,
    },
    /// `left <operator> right`
    BinaryOp {
        /// Left operand.
        left:     NodeRef,
        /// The operator.
        operator: BinaryOperator,
        /// Right operand.
        right:    NodeRef,
    },
    /// `-argument` or `!argument`
    UnaryOp {
        /// The operator.
        operator: UnaryOperator,
        /// The operand.
        argument: NodeRef,
    },
    /// `NAME(args...)`
    FunctionCall {
        /// Name of the called function.
        name: String,
        /// Argument expressions.
        args: Vec<NodeRef>,
    },
    /// `name = value`
    Assignment {
        /// The assigned variable.
        name:  String,
        /// The assigned expression.
        value: NodeRef,
    },
    /// `if condition then consequent else alternate`
    IfExpression {
        /// Must evaluate to a boolean.
        condition:  NodeRef,
        /// Evaluated when the condition holds.
        consequent: NodeRef,
        /// Evaluated otherwise.
        alternate:  NodeRef,
    },
    /// `for variable in iterable [when guard] [into acc = init] then body`
    ForExpression {
        /// The loop-local binding for the current item.
        variable:    String,
        /// Array or string being iterated.
        iterable:    NodeRef,
        /// Optional filter; items for which it is `false` are skipped.
        guard:       Option<NodeRef>,
        /// Present in accumulator (fold) mode.
        accumulator: Option<Accumulator>,
        /// Evaluated once per item.
        body:        NodeRef,
    },
    /// `object[index]`
    IndexAccess {
        /// The indexed array or string.
        object: NodeRef,
        /// The integer index.
        index:  NodeRef,
    },
    /// `start..end` or `start..=end`
    RangeExpression {
        /// Inclusive lower bound.
        start:     NodeRef,
        /// Upper bound.
        end:       NodeRef,
        /// Whether `end` is part of the range.
        inclusive: bool,
    },
    /// `value |> NAME(args...)`; at least one argument is a [`NodeKind::Placeholder`].
    PipeExpression {
        /// The piped value.
        value: NodeRef,
        /// Name of the called function.
        name:  String,
        /// Arguments; placeholders receive the piped value.
        args:  Vec<NodeRef>,
    },
    /// `?` inside a pipe's argument list.
    Placeholder,
}

/// The `into NAME = INIT` clause of a `for` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    /// The loop-local accumulator binding.
    pub name:    String,
    /// Evaluated once before the first item.
    pub initial: NodeRef,
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition, string and array concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`^`)
    Pow,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x`).
    Not,
}

impl BinaryOperator {
    /// Returns `true` for the short-circuiting logical operators.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Returns `true` for `<`, `>`, `<=`, `>=`, `==` and `!=`.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            And => "&&",
            Or => "||",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Self { kind,
               leading_comments: Vec::new(),
               trailing_comments: Vec::new() }
    }
}

impl Node {
    /// Wraps a kind into a shared node without comments.
    #[must_use]
    pub fn new(kind: NodeKind) -> NodeRef {
        Rc::new(kind.into())
    }

    /// Builds a node of the given kind that keeps `self`'s comments.
    ///
    /// This is how rewrites replace a node while preserving its metadata.
    #[must_use]
    pub fn rebuild(&self, kind: NodeKind) -> NodeRef {
        Rc::new(Self { kind,
                       leading_comments: self.leading_comments.clone(),
                       trailing_comments: self.trailing_comments.clone() })
    }

    /// Returns a copy of `node` with `self`'s comments merged around its own.
    ///
    /// `self`'s leading comments come first and its trailing comments last,
    /// which keeps the source order when an outer node is replaced by one of
    /// its children.
    #[must_use]
    pub fn wrap_comments(&self, node: &NodeRef) -> NodeRef {
        if self.leading_comments.is_empty() && self.trailing_comments.is_empty() {
            return Rc::clone(node);
        }

        let mut leading = self.leading_comments.clone();
        leading.extend(node.leading_comments.iter().cloned());
        let mut trailing = node.trailing_comments.clone();
        trailing.extend(self.trailing_comments.iter().cloned());

        Rc::new(Self { kind:              node.kind.clone(),
                       leading_comments:  leading,
                       trailing_comments: trailing, })
    }

    /// Returns a copy of `self` with the given comments attached.
    #[must_use]
    pub fn with_comments(&self, leading: Vec<String>, trailing: Vec<String>) -> NodeRef {
        Rc::new(Self { kind:              self.kind.clone(),
                       leading_comments:  leading,
                       trailing_comments: trailing, })
    }

    /// Returns `true` if the node has any attached comments.
    #[must_use]
    pub fn has_comments(&self) -> bool {
        !self.leading_comments.is_empty() || !self.trailing_comments.is_empty()
    }

    /// Builds a [`NodeKind::Program`].
    #[must_use]
    pub fn program(statements: Vec<NodeRef>) -> NodeRef {
        Self::new(NodeKind::Program { statements })
    }

    /// Builds a [`NodeKind::NumberLiteral`].
    ///
    /// # Example
    /// ```
    /// use calcula::ast::{Node, NodeKind};
    ///
    /// let node = Node::number(2.5);
    /// assert_eq!(node.kind, NodeKind::NumberLiteral { value: 2.5 });
    /// ```
    #[must_use]
    pub fn number(value: f64) -> NodeRef {
        Self::new(NodeKind::NumberLiteral { value })
    }

    /// Builds a [`NodeKind::StringLiteral`].
    #[must_use]
    pub fn string(value: impl Into<String>) -> NodeRef {
        Self::new(NodeKind::StringLiteral { value: value.into() })
    }

    /// Builds a [`NodeKind::BooleanLiteral`].
    #[must_use]
    pub fn boolean(value: bool) -> NodeRef {
        Self::new(NodeKind::BooleanLiteral { value })
    }

    /// Builds a [`NodeKind::ArrayLiteral`].
    #[must_use]
    pub fn array(elements: Vec<NodeRef>) -> NodeRef {
        Self::new(NodeKind::ArrayLiteral { elements })
    }

    /// Builds a [`NodeKind::Identifier`].
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> NodeRef {
        Self::new(NodeKind::Identifier { name: name.into() })
    }

    /// Builds a [`NodeKind::BinaryOp`].
    #[must_use]
    pub fn binary(left: NodeRef, operator: BinaryOperator, right: NodeRef) -> NodeRef {
        Self::new(NodeKind::BinaryOp { left,
                                       operator,
                                       right })
    }

    /// Builds a [`NodeKind::UnaryOp`].
    #[must_use]
    pub fn unary(operator: UnaryOperator, argument: NodeRef) -> NodeRef {
        Self::new(NodeKind::UnaryOp { operator, argument })
    }

    /// Builds a [`NodeKind::FunctionCall`].
    #[must_use]
    pub fn call(name: impl Into<String>, args: Vec<NodeRef>) -> NodeRef {
        Self::new(NodeKind::FunctionCall { name: name.into(),
                                           args })
    }

    /// Builds a [`NodeKind::Assignment`].
    #[must_use]
    pub fn assignment(name: impl Into<String>, value: NodeRef) -> NodeRef {
        Self::new(NodeKind::Assignment { name: name.into(),
                                         value })
    }

    /// Builds a [`NodeKind::IfExpression`].
    #[must_use]
    pub fn if_expression(condition: NodeRef, consequent: NodeRef, alternate: NodeRef) -> NodeRef {
        Self::new(NodeKind::IfExpression { condition,
                                           consequent,
                                           alternate })
    }

    /// Builds a [`NodeKind::ForExpression`].
    #[must_use]
    pub fn for_expression(variable: impl Into<String>,
                          iterable: NodeRef,
                          guard: Option<NodeRef>,
                          accumulator: Option<Accumulator>,
                          body: NodeRef)
                          -> NodeRef {
        Self::new(NodeKind::ForExpression { variable: variable.into(),
                                            iterable,
                                            guard,
                                            accumulator,
                                            body })
    }

    /// Builds a [`NodeKind::IndexAccess`].
    #[must_use]
    pub fn index(object: NodeRef, index: NodeRef) -> NodeRef {
        Self::new(NodeKind::IndexAccess { object, index })
    }

    /// Builds a [`NodeKind::RangeExpression`].
    #[must_use]
    pub fn range(start: NodeRef, end: NodeRef, inclusive: bool) -> NodeRef {
        Self::new(NodeKind::RangeExpression { start,
                                              end,
                                              inclusive })
    }

    /// Builds a [`NodeKind::PipeExpression`].
    #[must_use]
    pub fn pipe(value: NodeRef, name: impl Into<String>, args: Vec<NodeRef>) -> NodeRef {
        Self::new(NodeKind::PipeExpression { value,
                                             name: name.into(),
                                             args })
    }

    /// Builds a [`NodeKind::Placeholder`].
    #[must_use]
    pub fn placeholder() -> NodeRef {
        Self::new(NodeKind::Placeholder)
    }

    /// Returns the direct children of the node in evaluation order.
    ///
    /// For a `for` expression that is the iterable, the accumulator's initial
    /// value, the guard and the body.
    #[must_use]
    pub fn children(&self) -> Vec<&NodeRef> {
        match &self.kind {
            NodeKind::Program { statements } => statements.iter().collect(),
            NodeKind::ArrayLiteral { elements } => elements.iter().collect(),
            NodeKind::FunctionCall { args, .. } => args.iter().collect(),
            NodeKind::BinaryOp { left, right, .. } => vec![left, right],
            NodeKind::UnaryOp { argument, .. } => vec![argument],
            NodeKind::Assignment { value, .. } => vec![value],
            NodeKind::IfExpression { condition,
                                     consequent,
                                     alternate, } => vec![condition, consequent, alternate],
            NodeKind::ForExpression { iterable,
                                      guard,
                                      accumulator,
                                      body,
                                      .. } => {
                let mut children = vec![iterable];
                children.extend(accumulator.as_ref().map(|acc| &acc.initial));
                children.extend(guard.as_ref());
                children.push(body);
                children
            },
            NodeKind::IndexAccess { object, index } => vec![object, index],
            NodeKind::RangeExpression { start, end, .. } => vec![start, end],
            NodeKind::PipeExpression { value, args, .. } => {
                let mut children = vec![value];
                children.extend(args.iter());
                children
            },
            NodeKind::NumberLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Placeholder => Vec::new(),
        }
    }

    /// Returns `true` for number, string and boolean literals, and for array
    /// literals whose elements are all literals of one kind.
    ///
    /// These are the nodes the optimizer treats as compile-time constants.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match &self.kind {
            NodeKind::NumberLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. } => true,
            NodeKind::ArrayLiteral { elements } => {
                elements.iter().all(|element| element.is_literal())
                && elements.windows(2)
                           .all(|pair| literal_tag(&pair[0]) == literal_tag(&pair[1]))
            },
            _ => false,
        }
    }
}

fn literal_tag(node: &Node) -> u8 {
    match node.kind {
        NodeKind::NumberLiteral { .. } => 0,
        NodeKind::StringLiteral { .. } => 1,
        NodeKind::BooleanLiteral { .. } => 2,
        NodeKind::ArrayLiteral { .. } => 3,
        _ => u8::MAX,
    }
}

/// Returns the statements of a program, or the node itself as the only
/// statement.
#[must_use]
pub fn statements_of(node: &NodeRef) -> Vec<NodeRef> {
    match &node.kind {
        NodeKind::Program { statements } => statements.clone(),
        _ => vec![Rc::clone(node)],
    }
}
