use super::*;
use crate::expression::parser::parse_expr;

fn eval_src(src: &str, x: i64, y: i64) -> Result<f64, EvalError> {
    eval(&parse_expr(src).unwrap(), &Bindings::new(x, y))
}

#[test]
fn literal_is_constant_everywhere() {
    for (x, y) in [(0, 0), (7, 3), (1919, 1079)] {
        assert_eq!(eval_src("255", x, y).unwrap(), 255.0);
    }
}

#[test]
fn variables_and_operators() {
    assert_eq!(eval_src("x + y * 2", 3, 4).unwrap(), 11.0);
    assert_eq!(eval_src("(x + y) * 2", 3, 4).unwrap(), 14.0);
    assert_eq!(eval_src("x - y", 3, 4).unwrap(), -1.0);
    assert_eq!(eval_src("x / 2", 3, 0).unwrap(), 1.5);
    assert_eq!(eval_src("x % 4", 10, 0).unwrap(), 2.0);
    assert_eq!(eval_src("-x % 4", 10, 0).unwrap(), -2.0);
    assert_eq!(eval_src("2 ^ 10", 0, 0).unwrap(), 1024.0);
    assert_eq!(eval_src("-2 ^ 2", 0, 0).unwrap(), -4.0);
}

#[test]
fn builtins() {
    assert_eq!(eval_src("sin(0)", 0, 0).unwrap(), 0.0);
    assert_eq!(eval_src("cos(0)", 0, 0).unwrap(), 1.0);
    assert_eq!(eval_src("max(x, y)", 2, 9).unwrap(), 9.0);
    assert_eq!(eval_src("min(x, y)", 2, 9).unwrap(), 2.0);
    assert_eq!(eval_src("abs(x - y)", 2, 9).unwrap(), 7.0);
    assert!((eval_src("hypot(x, y)", 3, 4).unwrap() - 5.0).abs() < 1e-12);
    assert_eq!(eval_src("pow(2, 8)", 0, 0).unwrap(), 256.0);
    assert_eq!(eval_src("sign(x)", -3, 0).unwrap(), -1.0);
    assert_eq!(eval_src("sign(x)", 0, 0).unwrap(), 0.0);
    assert_eq!(eval_src("floor(x / 2)", 5, 0).unwrap(), 2.0);
    assert!((eval_src("log(e)", 0, 0).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn undefined_variable_names_subexpression() {
    let err = eval_src("x + z", 1, 1).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::UndefinedVariable("z".to_owned()));
    assert_eq!(err.subexpr, "z");
}

#[test]
fn unsupported_function_and_arity() {
    let err = eval_src("blur(x)", 1, 1).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnsupportedFunction("blur".to_owned())
    );
    assert_eq!(err.subexpr, "blur(x)");

    let err = eval_src("sin(x, y)", 1, 1).unwrap_err();
    assert!(matches!(
        err.kind,
        EvalErrorKind::Arity {
            expected: 1,
            got: 2,
            ..
        }
    ));
}

#[test]
fn division_by_zero_only_when_divisor_is_zero() {
    assert!(eval_src("255 / x", 1, 0).is_ok());
    let err = eval_src("255 / x", 0, 0).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.subexpr, "(255 / x)");

    assert!(eval_src("x % y", 3, 0).is_err());
    assert!(eval_src("mod(x, y)", 3, 0).is_err());
}

#[test]
fn narrowing_wraps_instead_of_saturating() {
    assert_eq!(narrow_channel(255.0), 255);
    assert_eq!(narrow_channel(255.9), 255);
    assert_eq!(narrow_channel(256.0), 0);
    assert_eq!(narrow_channel(300.9), 44);
    assert_eq!(narrow_channel(-1.0), 255);
    assert_eq!(narrow_channel(-0.5), 0);
    assert_eq!(narrow_channel(f64::NAN), 0);
}
