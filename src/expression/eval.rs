use crate::expression::ast::{BinaryOp, Builtin, Callee, Expr, UnaryOp};
use crate::expression::error::{EvalError, EvalErrorKind};

/// Variable bindings for one pixel evaluation.
///
/// Built fresh for every pixel and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    /// Value bound to `x`.
    pub x: i64,
    /// Value bound to `y`.
    pub y: i64,
}

impl Bindings {
    /// Bind `x` and `y`.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<i64> {
        match name {
            "x" => Some(self.x),
            "y" => Some(self.y),
            _ => None,
        }
    }
}

/// Evaluate `expr` under `vars`.
///
/// Pure and deterministic: the result depends only on the tree and the bindings.
pub fn eval(expr: &Expr, vars: &Bindings) -> Result<f64, EvalError> {
    match expr {
        Expr::Lit(v) => Ok(*v),
        Expr::Var(name) => vars.get(name).map(|v| v as f64).ok_or_else(|| {
            EvalError::new(EvalErrorKind::UndefinedVariable(name.clone()), name.clone())
        }),
        Expr::Unary { op, expr: inner } => {
            let v = eval(inner, vars)?;
            Ok(match op {
                UnaryOp::Neg => -v,
                UnaryOp::Plus => v,
            })
        }
        Expr::Binary { op, left, right } => {
            let a = eval(left, vars)?;
            let b = eval(right, vars)?;
            match op {
                BinaryOp::Add => Ok(a + b),
                BinaryOp::Sub => Ok(a - b),
                BinaryOp::Mul => Ok(a * b),
                BinaryOp::Div => nonzero(b, expr).map(|b| a / b),
                BinaryOp::Mod => nonzero(b, expr).map(|b| a % b),
                BinaryOp::Pow => Ok(a.powf(b)),
            }
        }
        Expr::Call { func, args } => {
            let builtin = match func {
                Callee::Builtin(b) => *b,
                Callee::Unknown(name) => {
                    return Err(EvalError::new(
                        EvalErrorKind::UnsupportedFunction(name.clone()),
                        expr.to_string(),
                    ));
                }
            };
            if args.len() != builtin.arity() {
                return Err(EvalError::new(
                    EvalErrorKind::Arity {
                        func: builtin.name().to_owned(),
                        expected: builtin.arity(),
                        got: args.len(),
                    },
                    expr.to_string(),
                ));
            }
            let a = eval(&args[0], vars)?;
            if builtin.arity() == 1 {
                return Ok(call_unary(builtin, a));
            }
            let b = eval(&args[1], vars)?;
            call_binary(builtin, a, b, expr)
        }
    }
}

fn nonzero(b: f64, expr: &Expr) -> Result<f64, EvalError> {
    if b == 0.0 {
        Err(EvalError::new(
            EvalErrorKind::DivisionByZero,
            expr.to_string(),
        ))
    } else {
        Ok(b)
    }
}

fn call_unary(f: Builtin, a: f64) -> f64 {
    match f {
        Builtin::Sin => a.sin(),
        Builtin::Cos => a.cos(),
        Builtin::Tan => a.tan(),
        Builtin::Asin => a.asin(),
        Builtin::Acos => a.acos(),
        Builtin::Atan => a.atan(),
        Builtin::Sinh => a.sinh(),
        Builtin::Cosh => a.cosh(),
        Builtin::Tanh => a.tanh(),
        Builtin::Sqrt => a.sqrt(),
        Builtin::Cbrt => a.cbrt(),
        Builtin::Abs => a.abs(),
        Builtin::Exp => a.exp(),
        Builtin::Ln => a.ln(),
        Builtin::Log2 => a.log2(),
        Builtin::Log10 => a.log10(),
        Builtin::Floor => a.floor(),
        Builtin::Ceil => a.ceil(),
        Builtin::Round => a.round(),
        Builtin::Trunc => a.trunc(),
        Builtin::Sign => {
            if a == 0.0 || a.is_nan() {
                0.0
            } else {
                a.signum()
            }
        }
        // Binary builtins never reach here: arity is checked by the caller.
        Builtin::Pow
        | Builtin::Atan2
        | Builtin::Min
        | Builtin::Max
        | Builtin::Hypot
        | Builtin::Mod => f64::NAN,
    }
}

fn call_binary(f: Builtin, a: f64, b: f64, expr: &Expr) -> Result<f64, EvalError> {
    Ok(match f {
        Builtin::Pow => a.powf(b),
        Builtin::Atan2 => a.atan2(b),
        Builtin::Min => a.min(b),
        Builtin::Max => a.max(b),
        Builtin::Hypot => a.hypot(b),
        Builtin::Mod => a % nonzero(b, expr)?,
        _ => f64::NAN,
    })
}

/// Narrow an evaluated channel value to 8 bits.
///
/// The value is truncated toward zero and then wrapped modulo 256, so `256.0 -> 0`,
/// `-1.0 -> 255` and `300.9 -> 44`. Non-finite values follow Rust's float-to-int casts
/// (`NaN -> 0`, infinities saturate to the `i64` range before wrapping).
pub fn narrow_channel(v: f64) -> u8 {
    (v as i64) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
