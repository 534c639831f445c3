use super::check_arity;
use crate::engine::EvaluationContext;
use crate::error::XPath31Error;
use crate::types::*;

pub fn fn_position(args: Vec<XdmValue>, ctx: &EvaluationContext<'_>) -> Result<XdmValue, XPath31Error> {
    check_arity("position", &args, 0, 0)?;
    if ctx.context_item.is_none() {
        return Err(XPath31Error::NoContextItem);
    }
    Ok(XdmValue::from_integer(ctx.context_position as i64))
}

pub fn fn_last(args: Vec<XdmValue>, ctx: &EvaluationContext<'_>) -> Result<XdmValue, XPath31Error> {
    check_arity("last", &args, 0, 0)?;
    if ctx.context_item.is_none() {
        return Err(XPath31Error::NoContextItem);
    }
    Ok(XdmValue::from_integer(ctx.context_size as i64))
}

pub fn fn_data(args: Vec<XdmValue>, ctx: &EvaluationContext<'_>) -> Result<XdmValue, XPath31Error> {
    check_arity("data", &args, 0, 1)?;
    let atoms = match args.first() {
        Some(arg) => arg.atomize()?,
        None => vec![
            ctx.context_item
                .as_ref()
                .ok_or(XPath31Error::NoContextItem)?
                .atomize()?,
        ],
    };
    Ok(XdmValue::from_atomics(atoms))
}

/// The node argument of `name`/`local-name`, defaulting to the context item.
fn node_arg(
    function: &str,
    args: &[XdmValue],
    ctx: &EvaluationContext<'_>,
) -> Result<Option<Node>, XPath31Error> {
    check_arity(function, args, 0, 1)?;
    let item = match args.first() {
        Some(arg) => match arg.items() {
            [] => return Ok(None),
            [item] => item.clone(),
            _ => {
                return Err(XPath31Error::type_error(format!(
                    "{}() expects at most one node",
                    function
                )));
            }
        },
        None => ctx.context_item.clone().ok_or(XPath31Error::NoContextItem)?,
    };
    match item {
        XdmItem::Node(n) => Ok(Some(n)),
        other => Err(XPath31Error::type_error(format!(
            "{}() expects a node, got {}",
            function,
            other.type_name()
        ))),
    }
}

pub fn fn_name(args: Vec<XdmValue>, ctx: &EvaluationContext<'_>) -> Result<XdmValue, XPath31Error> {
    let name = node_arg("name", &args, ctx)?
        .and_then(|n| n.name().map(str::to_string))
        .unwrap_or_default();
    Ok(XdmValue::from_string(name))
}

pub fn fn_local_name(
    args: Vec<XdmValue>,
    ctx: &EvaluationContext<'_>,
) -> Result<XdmValue, XPath31Error> {
    let name = node_arg("local-name", &args, ctx)?
        .and_then(|n| n.local_name().map(str::to_string))
        .unwrap_or_default();
    Ok(XdmValue::from_string(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_name_functions() {
        let vars = HashMap::new();
        let node = Node::element("x:item");
        let ctx = EvaluationContext::new(Some(XdmItem::Node(node)), None, &vars);
        assert_eq!(fn_name(vec![], &ctx).unwrap(), XdmValue::from_string("x:item"));
        assert_eq!(fn_local_name(vec![], &ctx).unwrap(), XdmValue::from_string("item"));
        assert_eq!(
            fn_name(vec![XdmValue::empty()], &ctx).unwrap(),
            XdmValue::from_string("")
        );
    }

    #[test]
    fn test_data_atomizes() {
        let vars = HashMap::new();
        let ctx = EvaluationContext::new(None, None, &vars);
        let attr = XdmValue::from_node(Node::attribute("id", "7"));
        assert_eq!(
            fn_data(vec![attr], &ctx).unwrap(),
            XdmValue::from_atomic(AtomicValue::UntypedAtomic("7".into()))
        );
    }

    #[test]
    fn test_position_requires_focus() {
        let vars = HashMap::new();
        let ctx = EvaluationContext::new(None, None, &vars);
        assert_eq!(fn_position(vec![], &ctx).unwrap_err(), XPath31Error::NoContextItem);
    }
}
