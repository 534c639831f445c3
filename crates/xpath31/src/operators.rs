use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::ast::BinaryOperator;
use crate::error::XPath31Error;
use crate::types::{AtomicValue, XdmValue};

/// Evaluates a comparison or arithmetic operator on already evaluated operands.
///
/// `or` and `and` are short-circuited by the evaluator and never reach here.
pub fn evaluate_binary(
    op: BinaryOperator,
    left: XdmValue,
    right: XdmValue,
) -> Result<XdmValue, XPath31Error> {
    match op {
        BinaryOperator::Or | BinaryOperator::And => {
            let l = left.effective_boolean_value()?;
            let r = right.effective_boolean_value()?;
            Ok(XdmValue::from_bool(if op == BinaryOperator::Or {
                l || r
            } else {
                l && r
            }))
        }
        BinaryOperator::Equals => general_compare(left, right, |o| o == Ordering::Equal),
        BinaryOperator::NotEquals => general_compare(left, right, |o| o != Ordering::Equal),
        BinaryOperator::LessThan => general_compare(left, right, |o| o == Ordering::Less),
        BinaryOperator::LessThanOrEqual => {
            general_compare(left, right, |o| o != Ordering::Greater)
        }
        BinaryOperator::GreaterThan => general_compare(left, right, |o| o == Ordering::Greater),
        BinaryOperator::GreaterThanOrEqual => {
            general_compare(left, right, |o| o != Ordering::Less)
        }
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::IntegerDivide
        | BinaryOperator::Modulo => arithmetic(op, left, right),
    }
}

/// Existential comparison: true if any pair of atomized items satisfies `predicate`.
fn general_compare<F>(left: XdmValue, right: XdmValue, predicate: F) -> Result<XdmValue, XPath31Error>
where
    F: Fn(Ordering) -> bool,
{
    let left = left.atomize()?;
    let right = right.atomize()?;
    for l in &left {
        for r in &right {
            if let Some(ord) = compare_atomics(l, r)?
                && predicate(ord)
            {
                return Ok(XdmValue::from_bool(true));
            }
        }
    }
    Ok(XdmValue::from_bool(false))
}

/// Compares two atomic values after untyped promotion. `None` means unordered (NaN).
pub fn compare_atomics(
    left: &AtomicValue,
    right: &AtomicValue,
) -> Result<Option<Ordering>, XPath31Error> {
    let (left, right) = match (left, right) {
        (AtomicValue::UntypedAtomic(s), r) if r.is_numeric() => {
            (AtomicValue::Double(untyped_to_double(s)), r.clone())
        }
        (l, AtomicValue::UntypedAtomic(s)) if l.is_numeric() => {
            (l.clone(), AtomicValue::Double(untyped_to_double(s)))
        }
        (AtomicValue::UntypedAtomic(s), AtomicValue::Boolean(_)) => {
            (AtomicValue::Boolean(s.trim() == "true" || s.trim() == "1"), right.clone())
        }
        (AtomicValue::Boolean(_), AtomicValue::UntypedAtomic(s)) => {
            (left.clone(), AtomicValue::Boolean(s.trim() == "true" || s.trim() == "1"))
        }
        _ => (left.clone(), right.clone()),
    };

    let comparable = (left.is_string_like() && right.is_string_like())
        || (left.is_numeric() && right.is_numeric())
        || matches!(
            (&left, &right),
            (AtomicValue::Boolean(_), AtomicValue::Boolean(_))
        );
    if !comparable {
        return Err(XPath31Error::type_error(format!(
            "cannot compare {} with {}",
            left.type_name(),
            right.type_name()
        )));
    }
    if left == right {
        return Ok(Some(Ordering::Equal));
    }
    Ok(left.partial_cmp(&right))
}

fn untyped_to_double(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

/// Atomizes an arithmetic operand; `None` for the empty sequence.
fn numeric_operand(value: XdmValue) -> Result<Option<AtomicValue>, XPath31Error> {
    let mut atoms = value.atomize()?;
    if atoms.len() > 1 {
        return Err(XPath31Error::type_error(format!(
            "arithmetic operand is a sequence of {} items",
            atoms.len()
        )));
    }
    let Some(atom) = atoms.pop() else {
        return Ok(None);
    };
    match atom {
        AtomicValue::UntypedAtomic(s) => {
            let d = s.trim().parse::<f64>().map_err(|_| XPath31Error::InvalidCast {
                from_type: format!("xs:untypedAtomic(\"{}\")", s),
                to_type: "xs:double".to_string(),
            })?;
            Ok(Some(AtomicValue::Double(d)))
        }
        a if a.is_numeric() => Ok(Some(a)),
        other => Err(XPath31Error::type_error(format!(
            "arithmetic operand of type {} is not numeric",
            other.type_name()
        ))),
    }
}

fn arithmetic(op: BinaryOperator, left: XdmValue, right: XdmValue) -> Result<XdmValue, XPath31Error> {
    let (Some(l), Some(r)) = (numeric_operand(left)?, numeric_operand(right)?) else {
        return Ok(XdmValue::empty());
    };
    let result = match (&l, &r) {
        (AtomicValue::Double(_), _) | (_, AtomicValue::Double(_)) => {
            double_arithmetic(op, l.to_double(), r.to_double())?
        }
        (AtomicValue::Integer(a), AtomicValue::Integer(b)) if op != BinaryOperator::Divide => {
            integer_arithmetic(op, *a, *b)?
        }
        _ => {
            let a = l.to_decimal().ok_or(XPath31Error::Overflow)?;
            let b = r.to_decimal().ok_or(XPath31Error::Overflow)?;
            decimal_arithmetic(op, a, b)?
        }
    };
    Ok(XdmValue::from_atomic(result))
}

fn integer_arithmetic(op: BinaryOperator, a: i64, b: i64) -> Result<AtomicValue, XPath31Error> {
    let value = match op {
        BinaryOperator::Plus => a.checked_add(b),
        BinaryOperator::Minus => a.checked_sub(b),
        BinaryOperator::Multiply => a.checked_mul(b),
        BinaryOperator::IntegerDivide | BinaryOperator::Modulo if b == 0 => {
            return Err(XPath31Error::DivisionByZero);
        }
        BinaryOperator::IntegerDivide => a.checked_div(b),
        BinaryOperator::Modulo => a.checked_rem(b),
        _ => unreachable!("non-arithmetic operator {op:?}"),
    };
    value.map(AtomicValue::Integer).ok_or(XPath31Error::Overflow)
}

fn decimal_arithmetic(
    op: BinaryOperator,
    a: Decimal,
    b: Decimal,
) -> Result<AtomicValue, XPath31Error> {
    if b.is_zero()
        && matches!(
            op,
            BinaryOperator::Divide | BinaryOperator::IntegerDivide | BinaryOperator::Modulo
        )
    {
        return Err(XPath31Error::DivisionByZero);
    }
    let value = match op {
        BinaryOperator::Plus => a.checked_add(b),
        BinaryOperator::Minus => a.checked_sub(b),
        BinaryOperator::Multiply => a.checked_mul(b),
        BinaryOperator::Divide => a.checked_div(b),
        BinaryOperator::Modulo => a.checked_rem(b),
        BinaryOperator::IntegerDivide => {
            let quotient = a.checked_div(b).ok_or(XPath31Error::Overflow)?.trunc();
            return i64::try_from(quotient)
                .map(AtomicValue::Integer)
                .map_err(|_| XPath31Error::Overflow);
        }
        _ => unreachable!("non-arithmetic operator {op:?}"),
    };
    value.map(AtomicValue::Decimal).ok_or(XPath31Error::Overflow)
}

fn double_arithmetic(op: BinaryOperator, a: f64, b: f64) -> Result<AtomicValue, XPath31Error> {
    let value = match op {
        BinaryOperator::Plus => a + b,
        BinaryOperator::Minus => a - b,
        BinaryOperator::Multiply => a * b,
        BinaryOperator::Divide => a / b,
        BinaryOperator::Modulo => a % b,
        BinaryOperator::IntegerDivide => {
            if b == 0.0 {
                return Err(XPath31Error::DivisionByZero);
            }
            let q = (a / b).trunc();
            if !q.is_finite() || q.abs() >= i64::MAX as f64 {
                return Err(XPath31Error::Overflow);
            }
            return Ok(AtomicValue::Integer(q as i64));
        }
        _ => unreachable!("non-arithmetic operator {op:?}"),
    };
    Ok(AtomicValue::Double(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;

    fn ints(values: &[i64]) -> XdmValue {
        XdmValue::from_atomics(values.iter().map(|i| AtomicValue::Integer(*i)).collect())
    }

    #[test]
    fn test_general_comparison_is_existential() {
        let result = evaluate_binary(BinaryOperator::Equals, ints(&[1, 2, 3]), ints(&[3])).unwrap();
        assert_eq!(result, XdmValue::from_bool(true));
        let result = evaluate_binary(BinaryOperator::Equals, ints(&[]), ints(&[3])).unwrap();
        assert_eq!(result, XdmValue::from_bool(false));
    }

    #[test]
    fn test_untyped_compares_numerically_against_numbers() {
        let attr = XdmValue::from_node(Node::attribute("qty", "10"));
        let result = evaluate_binary(BinaryOperator::GreaterThan, attr, ints(&[9])).unwrap();
        assert_eq!(result, XdmValue::from_bool(true));
    }

    #[test]
    fn test_incomparable_types_raise_type_error() {
        let err = evaluate_binary(
            BinaryOperator::Equals,
            XdmValue::from_string("a"),
            ints(&[1]),
        )
        .unwrap_err();
        assert_eq!(err.code(), "XPTY0004");
    }

    #[test]
    fn test_integer_arithmetic() {
        let r = evaluate_binary(BinaryOperator::Plus, ints(&[2]), ints(&[3])).unwrap();
        assert_eq!(r, ints(&[5]));
        let r = evaluate_binary(BinaryOperator::IntegerDivide, ints(&[7]), ints(&[2])).unwrap();
        assert_eq!(r, ints(&[3]));
        let r = evaluate_binary(BinaryOperator::Modulo, ints(&[7]), ints(&[2])).unwrap();
        assert_eq!(r, ints(&[1]));
    }

    #[test]
    fn test_integer_division_yields_decimal() {
        let r = evaluate_binary(BinaryOperator::Divide, ints(&[1]), ints(&[4])).unwrap();
        let expected: Decimal = "0.25".parse().unwrap();
        assert_eq!(r, XdmValue::from_atomic(AtomicValue::Decimal(expected)));
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate_binary(BinaryOperator::Divide, ints(&[1]), ints(&[0])).unwrap_err();
        assert_eq!(err, XPath31Error::DivisionByZero);
        let r = evaluate_binary(
            BinaryOperator::Divide,
            XdmValue::from_double(1.0),
            ints(&[0]),
        )
        .unwrap();
        assert_eq!(r, XdmValue::from_double(f64::INFINITY));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = evaluate_binary(BinaryOperator::Plus, ints(&[i64::MAX]), ints(&[1])).unwrap_err();
        assert_eq!(err.code(), "FOAR0002");
    }

    #[test]
    fn test_empty_operand_gives_empty() {
        let r = evaluate_binary(BinaryOperator::Plus, ints(&[]), ints(&[1])).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_untyped_operand_is_promoted_to_double() {
        let attr = XdmValue::from_node(Node::attribute("price", "2.5"));
        let r = evaluate_binary(BinaryOperator::Multiply, attr, ints(&[2])).unwrap();
        assert_eq!(r, XdmValue::from_double(5.0));
    }
}
