use std::fmt;

/// Parsed channel expression.
///
/// The tree is immutable after parsing and holds no interior mutability, so one instance can
/// be evaluated from any number of threads at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal (named constants such as `pi` are folded into literals by the parser).
    Lit(f64),
    /// Variable reference, resolved against the per-pixel bindings at evaluation time.
    Var(String),
    /// Prefix operator.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        expr: Box<Expr>,
    },
    /// Infix operator.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Function call.
    Call {
        /// Called function.
        func: Callee,
        /// Arguments, in source order.
        args: Vec<Expr>,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-e`
    Neg,
    /// `+e`
    Plus,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `a % b` (truncated remainder, sign follows `a`)
    Mod,
    /// `a ^ b` or `a ** b`
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        }
    }
}

/// Call target. Unknown names are kept so evaluation can report them.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// A supported math function.
    Builtin(Builtin),
    /// A name that matches no builtin.
    Unknown(String),
}

impl Callee {
    /// Resolve a function name.
    pub fn resolve(name: &str) -> Self {
        match Builtin::from_name(name) {
            Some(b) => Callee::Builtin(b),
            None => Callee::Unknown(name.to_owned()),
        }
    }

    /// Source-level name of the callee.
    pub fn name(&self) -> &str {
        match self {
            Callee::Builtin(b) => b.name(),
            Callee::Unknown(name) => name,
        }
    }
}

/// Built-in math functions.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Cbrt,
    Abs,
    Exp,
    Ln,
    Log2,
    Log10,
    Floor,
    Ceil,
    Round,
    Trunc,
    Sign,
    Pow,
    Atan2,
    Min,
    Max,
    Hypot,
    Mod,
}

impl Builtin {
    /// Look up a builtin by its source name. `log` is an alias of `ln`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Builtin::Sin,
            "cos" => Builtin::Cos,
            "tan" => Builtin::Tan,
            "asin" => Builtin::Asin,
            "acos" => Builtin::Acos,
            "atan" => Builtin::Atan,
            "sinh" => Builtin::Sinh,
            "cosh" => Builtin::Cosh,
            "tanh" => Builtin::Tanh,
            "sqrt" => Builtin::Sqrt,
            "cbrt" => Builtin::Cbrt,
            "abs" => Builtin::Abs,
            "exp" => Builtin::Exp,
            "ln" | "log" => Builtin::Ln,
            "log2" => Builtin::Log2,
            "log10" => Builtin::Log10,
            "floor" => Builtin::Floor,
            "ceil" => Builtin::Ceil,
            "round" => Builtin::Round,
            "trunc" => Builtin::Trunc,
            "sign" => Builtin::Sign,
            "pow" => Builtin::Pow,
            "atan2" => Builtin::Atan2,
            "min" => Builtin::Min,
            "max" => Builtin::Max,
            "hypot" => Builtin::Hypot,
            "mod" => Builtin::Mod,
            _ => return None,
        })
    }

    /// Canonical source name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Asin => "asin",
            Builtin::Acos => "acos",
            Builtin::Atan => "atan",
            Builtin::Sinh => "sinh",
            Builtin::Cosh => "cosh",
            Builtin::Tanh => "tanh",
            Builtin::Sqrt => "sqrt",
            Builtin::Cbrt => "cbrt",
            Builtin::Abs => "abs",
            Builtin::Exp => "exp",
            Builtin::Ln => "ln",
            Builtin::Log2 => "log2",
            Builtin::Log10 => "log10",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Round => "round",
            Builtin::Trunc => "trunc",
            Builtin::Sign => "sign",
            Builtin::Pow => "pow",
            Builtin::Atan2 => "atan2",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Hypot => "hypot",
            Builtin::Mod => "mod",
        }
    }

    /// Number of arguments the builtin takes.
    pub fn arity(self) -> usize {
        match self {
            Builtin::Pow
            | Builtin::Atan2
            | Builtin::Min
            | Builtin::Max
            | Builtin::Hypot
            | Builtin::Mod => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(v) => write!(f, "{v}"),
            Expr::Var(name) => f.write_str(name),
            Expr::Unary { op, expr } => match op {
                UnaryOp::Neg => write!(f, "-{expr}"),
                UnaryOp::Plus => write!(f, "+{expr}"),
            },
            Expr::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            Expr::Call { func, args } => {
                write!(f, "{}(", func.name())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}
