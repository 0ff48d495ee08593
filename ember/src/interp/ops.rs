//! Operator semantics
//!
//! Every binary operator goes through [`apply`]; each operator's match below is
//! the complete list of kind pairings it accepts. Anything not listed is a
//! type mismatch.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use crate::ast::BinOp;
use std::cmp::Ordering;

/// Longest string repetition may produce, in bytes
pub const MAX_REPEAT_LEN: usize = 1 << 28;

/// Apply a binary operator to two reduced operands
pub fn apply(op: BinOp, left: &Value, right: &Value) -> InterpResult<Value> {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => arithmetic(op, left, right, |a, b| a - b),
        BinOp::Mul => mul(left, right),
        BinOp::Div => div(left, right),
        BinOp::Mod => rem(left, right),
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
            compare(op, left, right)
        }
        BinOp::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        BinOp::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
    }
}

fn mismatch(op: BinOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_mismatch(&op.to_string(), left.type_name(), right.type_name())
}

fn arithmetic(
    op: BinOp,
    left: &Value,
    right: &Value,
    f: impl FnOnce(f64, f64) -> f64,
) -> InterpResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
        _ => Err(mismatch(op, left, right)),
    }
}

fn add(left: &Value, right: &Value) -> InterpResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        // Any right operand renders into the string
        (Value::Str(s), other) => Ok(Value::string(format!("{s}{other}"))),
        _ => Err(mismatch(BinOp::Add, left, right)),
    }
}

fn mul(left: &Value, right: &Value) -> InterpResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Value::Str(s), Value::Number(n)) => repeat(s, *n),
        _ => Err(mismatch(BinOp::Mul, left, right)),
    }
}

fn repeat(s: &str, n: f64) -> InterpResult<Value> {
    let count = repeat_count(n);
    if s.is_empty() || count == 0 {
        return Ok(Value::string(""));
    }
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Value::string(s.repeat(count))),
        _ => Err(RuntimeError::invalid_argument(format!(
            "string repetition by {n} exceeds {MAX_REPEAT_LEN} bytes"
        ))),
    }
}

/// Repetition count truncated toward zero; negative and NaN counts repeat nothing
fn repeat_count(n: f64) -> usize {
    if n.is_nan() || n <= 0.0 {
        0
    } else {
        n.trunc() as usize
    }
}

fn div(left: &Value, right: &Value) -> InterpResult<Value> {
    match (left, right) {
        (Value::Number(_), Value::Number(b)) if *b == 0.0 => {
            Err(RuntimeError::arithmetic_fault("division"))
        }
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        _ => Err(mismatch(BinOp::Div, left, right)),
    }
}

fn rem(left: &Value, right: &Value) -> InterpResult<Value> {
    match (left, right) {
        (Value::Number(_), Value::Number(b)) if *b == 0.0 => {
            Err(RuntimeError::arithmetic_fault("modulo"))
        }
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(floored_rem(*a, *b))),
        // Template substitution: first `{}` only
        (Value::Str(s), other) => Ok(Value::string(s.replacen("{}", &other.repr(), 1))),
        _ => Err(mismatch(BinOp::Mod, left, right)),
    }
}

/// Remainder with the sign of the divisor
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn compare(op: BinOp, left: &Value, right: &Value) -> InterpResult<Value> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        // Null has identity but no order
        (Value::Null, Value::Null) if matches!(op, BinOp::Eq | BinOp::Ne) => {
            Some(Ordering::Equal)
        }
        _ => return Err(mismatch(op, left, right)),
    };

    let result = match op {
        BinOp::Eq => ordering == Some(Ordering::Equal),
        BinOp::Ne => ordering != Some(Ordering::Equal),
        BinOp::Lt => ordering == Some(Ordering::Less),
        BinOp::Gt => ordering == Some(Ordering::Greater),
        BinOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => return Err(mismatch(op, left, right)),
    };
    Ok(Value::Boolean(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::{Builtin, ErrorKind, Function};
    use std::rc::Rc;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn s(text: &str) -> Value {
        Value::string(text)
    }

    fn kind_of(result: InterpResult<Value>) -> ErrorKind {
        result.expect_err("expected an error").kind
    }

    #[test]
    fn test_number_arithmetic_matches_f64() {
        for (a, b) in [(1.5, 2.25), (-7.0, 3.0), (1e10, 0.5)] {
            assert_eq!(apply(BinOp::Add, &num(a), &num(b)).unwrap(), num(a + b));
            assert_eq!(apply(BinOp::Sub, &num(a), &num(b)).unwrap(), num(a - b));
            assert_eq!(apply(BinOp::Mul, &num(a), &num(b)).unwrap(), num(a * b));
            assert_eq!(apply(BinOp::Div, &num(a), &num(b)).unwrap(), num(a / b));
        }
    }

    #[test]
    fn test_division_by_zero_is_fatal() {
        assert_eq!(
            kind_of(apply(BinOp::Div, &num(1.0), &num(0.0))),
            ErrorKind::ArithmeticFault
        );
        assert_eq!(
            kind_of(apply(BinOp::Mod, &num(1.0), &num(0.0))),
            ErrorKind::ArithmeticFault
        );
    }

    #[test]
    fn test_modulo_takes_divisor_sign() {
        assert_eq!(apply(BinOp::Mod, &num(7.0), &num(3.0)).unwrap(), num(1.0));
        assert_eq!(apply(BinOp::Mod, &num(-7.0), &num(3.0)).unwrap(), num(2.0));
        assert_eq!(apply(BinOp::Mod, &num(7.0), &num(-3.0)).unwrap(), num(-2.0));
    }

    #[test]
    fn test_number_plus_string_is_mismatch() {
        let err = apply(BinOp::Add, &num(1.0), &s("a")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("Number"));
        assert!(err.message.contains("String"));
    }

    #[test]
    fn test_string_concat_uses_repr() {
        assert_eq!(apply(BinOp::Add, &s("ab"), &num(1.0)).unwrap(), s("ab1"));
        assert_eq!(apply(BinOp::Add, &s("is "), &Value::Boolean(true)).unwrap(), s("is true"));
        assert_eq!(apply(BinOp::Add, &s("x"), &Value::Null).unwrap(), s("xnull"));
        assert_eq!(apply(BinOp::Add, &s("a"), &s("b")).unwrap(), s("ab"));
    }

    #[test]
    fn test_string_repetition() {
        assert_eq!(apply(BinOp::Mul, &s("x"), &num(3.0)).unwrap(), s("xxx"));
        assert_eq!(apply(BinOp::Mul, &s("ab"), &num(2.9)).unwrap(), s("abab"));
        assert_eq!(apply(BinOp::Mul, &s("x"), &num(-2.0)).unwrap(), s(""));
        assert_eq!(
            kind_of(apply(BinOp::Mul, &s("x"), &s("y"))),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_oversized_repetition_is_an_error() {
        assert_eq!(
            kind_of(apply(BinOp::Mul, &s("ab"), &num(1e20))),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            kind_of(apply(BinOp::Mul, &s("x"), &num(f64::INFINITY))),
            ErrorKind::InvalidArgument
        );
        let over = (MAX_REPEAT_LEN / 2 + 1) as f64;
        assert_eq!(kind_of(apply(BinOp::Mul, &s("ab"), &num(over))), ErrorKind::InvalidArgument);
        // Nothing to repeat, so any count fits
        assert_eq!(apply(BinOp::Mul, &s(""), &num(1e20)).unwrap(), s(""));
    }

    #[test]
    fn test_string_template_replaces_first_placeholder() {
        assert_eq!(
            apply(BinOp::Mod, &s("hi {}"), &s("there")).unwrap(),
            s("hi there")
        );
        assert_eq!(
            apply(BinOp::Mod, &s("{} and {}"), &num(1.0)).unwrap(),
            s("1 and {}")
        );
        assert_eq!(apply(BinOp::Mod, &s("plain"), &num(1.0)).unwrap(), s("plain"));
    }

    #[test]
    fn test_unsupported_string_ops() {
        assert_eq!(kind_of(apply(BinOp::Sub, &s("a"), &s("b"))), ErrorKind::TypeMismatch);
        assert_eq!(kind_of(apply(BinOp::Div, &s("a"), &num(1.0))), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_boolean_and_null_arithmetic_rejected() {
        let t = Value::Boolean(true);
        assert_eq!(kind_of(apply(BinOp::Add, &t, &t)), ErrorKind::TypeMismatch);
        assert_eq!(
            kind_of(apply(BinOp::Mul, &Value::Null, &num(2.0))),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_number_comparisons() {
        let cases = [
            (BinOp::Lt, true),
            (BinOp::Le, true),
            (BinOp::Gt, false),
            (BinOp::Ge, false),
            (BinOp::Eq, false),
            (BinOp::Ne, true),
        ];
        for (op, expected) in cases {
            assert_eq!(
                apply(op, &num(1.0), &num(2.0)).unwrap(),
                Value::Boolean(expected),
                "1 {op} 2"
            );
        }
    }

    #[test]
    fn test_string_and_boolean_comparisons() {
        assert_eq!(apply(BinOp::Lt, &s("apple"), &s("banana")).unwrap(), Value::Boolean(true));
        assert_eq!(apply(BinOp::Eq, &s("a"), &s("a")).unwrap(), Value::Boolean(true));
        let (f, t) = (Value::Boolean(false), Value::Boolean(true));
        assert_eq!(apply(BinOp::Lt, &f, &t).unwrap(), Value::Boolean(true));
        assert_eq!(apply(BinOp::Ne, &f, &t).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_null_equality_only() {
        assert_eq!(apply(BinOp::Eq, &Value::Null, &Value::Null).unwrap(), Value::Boolean(true));
        assert_eq!(apply(BinOp::Ne, &Value::Null, &Value::Null).unwrap(), Value::Boolean(false));
        assert_eq!(
            kind_of(apply(BinOp::Lt, &Value::Null, &Value::Null)),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_cross_kind_comparison_is_mismatch() {
        assert_eq!(kind_of(apply(BinOp::Eq, &num(1.0), &s("1"))), ErrorKind::TypeMismatch);
        assert_eq!(
            kind_of(apply(BinOp::Lt, &num(1.0), &Value::Boolean(true))),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            kind_of(apply(BinOp::Eq, &Value::Null, &num(0.0))),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_functions_are_not_comparable() {
        let f = Value::Function(Rc::new(Function::BuiltIn(Builtin::Print)));
        for op in [BinOp::Eq, BinOp::Ne, BinOp::Lt, BinOp::Ge] {
            assert_eq!(kind_of(apply(op, &f, &f)), ErrorKind::TypeMismatch, "{op}");
        }
        assert_eq!(kind_of(apply(BinOp::Eq, &f, &Value::Null)), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_logical_ops_use_truthiness() {
        assert_eq!(apply(BinOp::And, &num(1.0), &s("x")).unwrap(), Value::Boolean(true));
        assert_eq!(apply(BinOp::And, &num(1.0), &s("")).unwrap(), Value::Boolean(false));
        assert_eq!(apply(BinOp::Or, &Value::Null, &num(0.0)).unwrap(), Value::Boolean(false));
        assert_eq!(apply(BinOp::Or, &Value::Null, &num(3.0)).unwrap(), Value::Boolean(true));
    }
}
