use super::check_arity;
use crate::ast::BinaryOperator;
use crate::engine::EvaluationContext;
use crate::error::XPath31Error;
use crate::operators;
use crate::types::*;

pub fn fn_number(args: Vec<XdmValue>, ctx: &EvaluationContext<'_>) -> Result<XdmValue, XPath31Error> {
    check_arity("number", &args, 0, 1)?;
    let atoms = match args.first() {
        Some(arg) => arg.atomize()?,
        None => vec![
            ctx.context_item
                .as_ref()
                .ok_or(XPath31Error::NoContextItem)?
                .atomize()?,
        ],
    };
    let d = match atoms.as_slice() {
        [a] => a.to_double(),
        _ => f64::NAN,
    };
    Ok(XdmValue::from_double(d))
}

/// `sum($seq)`: zero for the empty sequence, otherwise left-to-right addition.
pub fn fn_sum(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("sum", &args, 1, 1)?;
    let atoms = args[0].atomize()?;
    let mut iter = atoms.into_iter();
    let Some(first) = iter.next() else {
        return Ok(XdmValue::from_integer(0));
    };
    iter.try_fold(XdmValue::from_atomic(first), |total, next| {
        operators::evaluate_binary(BinaryOperator::Plus, total, XdmValue::from_atomic(next))
    })
    .and_then(|total| {
        // A lone untyped value still has to come out numeric.
        operators::evaluate_binary(BinaryOperator::Plus, total, XdmValue::from_integer(0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sum() {
        assert_eq!(fn_sum(vec![XdmValue::empty()]).unwrap(), XdmValue::from_integer(0));
        let values = XdmValue::from_atomics(vec![1i64.into(), 2i64.into(), 3i64.into()]);
        assert_eq!(fn_sum(vec![values]).unwrap(), XdmValue::from_integer(6));
    }

    #[test]
    fn test_sum_of_untyped_nodes() {
        let nodes = XdmValue::from_nodes(vec![
            Node::attribute("p", "1.5"),
            Node::attribute("p", "2"),
        ]);
        assert_eq!(fn_sum(vec![nodes]).unwrap(), XdmValue::from_double(3.5));
    }

    #[test]
    fn test_number() {
        let vars = HashMap::new();
        let ctx = EvaluationContext::new(None, None, &vars);
        assert_eq!(
            fn_number(vec![XdmValue::from_string("12")], &ctx).unwrap(),
            XdmValue::from_double(12.0)
        );
        let nan = fn_number(vec![XdmValue::from_string("abc")], &ctx).unwrap();
        assert!(matches!(nan.first(), Some(XdmItem::Atomic(AtomicValue::Double(d))) if d.is_nan()));
    }
}
