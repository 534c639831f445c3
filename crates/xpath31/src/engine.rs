//! Expression evaluation.
//!
//! Entry point: [`evaluate`] with an [`EvaluationContext`].

use std::collections::HashMap;

use crate::ast::*;
use crate::error::XPath31Error;
use crate::functions;
use crate::operators;
use crate::types::*;

/// Longest sequence a range expression may build.
pub const MAX_RANGE_LENGTH: i64 = 10_000_000;

/// The dynamic focus and global variable bindings for one evaluation.
pub struct EvaluationContext<'d> {
    pub context_item: Option<XdmItem>,
    pub context_position: usize,
    pub context_size: usize,
    pub variables: &'d HashMap<String, XdmValue>,
    pub root_node: Option<Node>,
}

impl<'d> EvaluationContext<'d> {
    pub fn new(
        context_item: Option<XdmItem>,
        root_node: Option<Node>,
        variables: &'d HashMap<String, XdmValue>,
    ) -> Self {
        Self {
            context_item,
            context_position: 1,
            context_size: 1,
            variables,
            root_node,
        }
    }

    /// A context focused on `item` at `position` of `size`.
    pub fn with_focus(&self, item: XdmItem, position: usize, size: usize) -> Self {
        Self {
            context_item: Some(item),
            context_position: position,
            context_size: size,
            variables: self.variables,
            root_node: self.root_node.clone(),
        }
    }
}

pub fn evaluate(
    expr: &Expression,
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<XdmValue, XPath31Error> {
    match expr {
        Expression::Literal(lit) => Ok(evaluate_literal(lit)),
        Expression::Variable(name) => local_vars
            .get(name)
            .or_else(|| ctx.variables.get(name))
            .cloned()
            .ok_or_else(|| XPath31Error::UnknownVariable { name: name.clone() }),
        Expression::ContextItem => ctx
            .context_item
            .clone()
            .map(XdmValue::from_item)
            .ok_or(XPath31Error::NoContextItem),

        Expression::LetExpr {
            bindings,
            return_expr,
        } => {
            let mut vars = local_vars.clone();
            for (name, bound) in bindings {
                let value = evaluate(bound, ctx, &vars)?;
                vars.insert(name.clone(), value);
            }
            evaluate(return_expr, ctx, &vars)
        }
        Expression::ForExpr {
            bindings,
            return_expr,
        } => {
            let mut out = Vec::new();
            evaluate_for(bindings, return_expr, ctx, local_vars.clone(), &mut out)?;
            Ok(XdmValue::from_items(out))
        }
        Expression::IfExpr {
            condition,
            then_expr,
            else_expr,
        } => {
            if evaluate(condition, ctx, local_vars)?.effective_boolean_value()? {
                evaluate(then_expr, ctx, local_vars)
            } else {
                evaluate(else_expr, ctx, local_vars)
            }
        }

        Expression::BinaryOp { left, op, right } => match op {
            BinaryOperator::Or | BinaryOperator::And => {
                let l = evaluate(left, ctx, local_vars)?.effective_boolean_value()?;
                if l == (*op == BinaryOperator::Or) {
                    return Ok(XdmValue::from_bool(l));
                }
                let r = evaluate(right, ctx, local_vars)?.effective_boolean_value()?;
                Ok(XdmValue::from_bool(r))
            }
            _ => {
                let l = evaluate(left, ctx, local_vars)?;
                let r = evaluate(right, ctx, local_vars)?;
                operators::evaluate_binary(*op, l, r)
            }
        },
        Expression::UnaryMinus(inner) => {
            let value = evaluate(inner, ctx, local_vars)?;
            operators::evaluate_binary(BinaryOperator::Minus, XdmValue::from_integer(0), value)
        }
        Expression::StringConcat { left, right } => {
            let l = evaluate(left, ctx, local_vars)?.to_string_value()?;
            let r = evaluate(right, ctx, local_vars)?.to_string_value()?;
            Ok(XdmValue::from_string(l + &r))
        }
        Expression::RangeExpr { start, end } => {
            let Some((from, to)) = range_bounds(start, end, ctx, local_vars)? else {
                return Ok(XdmValue::empty());
            };
            let length = i128::from(to) - i128::from(from) + 1;
            if length > i128::from(MAX_RANGE_LENGTH) {
                return Err(XPath31Error::LimitExceeded(format!(
                    "range {from} to {to} has {length} items, more than {MAX_RANGE_LENGTH}"
                )));
            }
            Ok(XdmValue::from_atomics(
                (from..=to).map(AtomicValue::Integer).collect(),
            ))
        }

        Expression::Sequence(items) => {
            let mut out = Vec::new();
            for item in items {
                out.extend(evaluate(item, ctx, local_vars)?.into_items());
            }
            Ok(XdmValue::from_items(out))
        }
        Expression::FunctionCall { name, args } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, ctx, local_vars))
                .collect::<Result<Vec<_>, _>>()?;
            functions::call_function(name, values, ctx)
        }
        Expression::LocationPath(path) => evaluate_location_path(path, ctx, local_vars),
        Expression::FilterExpr { base, predicates } => {
            let mut items = evaluate(base, ctx, local_vars)?.into_items();
            for predicate in predicates {
                items = apply_predicate(items, predicate, ctx, local_vars)?;
            }
            Ok(XdmValue::from_items(items))
        }
        Expression::MapConstructor(entries) => evaluate_map_constructor(entries, ctx, local_vars),
        Expression::LookupExpr { base, key } => evaluate_lookup(base, key, ctx, local_vars),

        Expression::Atomize(inner) => Ok(XdmValue::from_atomics(
            evaluate(inner, ctx, local_vars)?.atomize()?,
        )),
        Expression::FirstItem(inner) => Ok(first_item(inner, ctx, local_vars)?
            .map(XdmValue::from_item)
            .unwrap_or_default()),
        Expression::AtomicToString(inner) => {
            let strings = evaluate(inner, ctx, local_vars)?
                .atomize()?
                .into_iter()
                .map(|a| AtomicValue::String(a.to_string_value()))
                .collect();
            Ok(XdmValue::from_atomics(strings))
        }
        Expression::SimpleContent { select, separator } => {
            let parts: Vec<String> = evaluate(select, ctx, local_vars)?
                .atomize()?
                .iter()
                .map(AtomicValue::to_string_value)
                .collect();
            Ok(XdmValue::from_string(parts.join(separator)))
        }
        Expression::Concat { parts, .. } => {
            let mut out = String::new();
            for part in parts {
                out.push_str(&evaluate(part, ctx, local_vars)?.to_string_value()?);
            }
            Ok(XdmValue::from_string(out))
        }
    }
}

fn evaluate_literal(lit: &Literal) -> XdmValue {
    match lit {
        Literal::String(s) => XdmValue::from_string(s.clone()),
        Literal::Integer(i) => XdmValue::from_integer(*i),
        Literal::Decimal(d) => XdmValue::from_atomic(AtomicValue::Decimal(*d)),
        Literal::Double(d) => XdmValue::from_double(*d),
    }
}

/// The first item of `expr`, without building the rest of a range or sequence.
fn first_item(
    expr: &Expression,
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<Option<XdmItem>, XPath31Error> {
    match expr {
        Expression::RangeExpr { start, end } => Ok(range_bounds(start, end, ctx, local_vars)?
            .map(|(from, _)| XdmItem::Atomic(AtomicValue::Integer(from)))),
        Expression::Sequence(items) => {
            for item in items {
                if let Some(first) = first_item(item, ctx, local_vars)? {
                    return Ok(Some(first));
                }
            }
            Ok(None)
        }
        Expression::FirstItem(inner) => first_item(inner, ctx, local_vars),
        _ => Ok(evaluate(expr, ctx, local_vars)?.into_items().into_iter().next()),
    }
}

/// Both ends of a non-empty range, or `None` when the range is empty.
fn range_bounds(
    start: &Expression,
    end: &Expression,
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<Option<(i64, i64)>, XPath31Error> {
    let from = integer_operand(evaluate(start, ctx, local_vars)?)?;
    let to = integer_operand(evaluate(end, ctx, local_vars)?)?;
    Ok(from.zip(to).filter(|(from, to)| from <= to))
}

fn integer_operand(value: XdmValue) -> Result<Option<i64>, XPath31Error> {
    match value.atomize()?.as_slice() {
        [] => Ok(None),
        [AtomicValue::Integer(i)] => Ok(Some(*i)),
        [AtomicValue::UntypedAtomic(s)] => s.trim().parse().map(Some).map_err(|_| {
            XPath31Error::InvalidCast {
                from_type: "xs:untypedAtomic".to_string(),
                to_type: "xs:integer".to_string(),
            }
        }),
        [other] => Err(XPath31Error::type_error(format!(
            "range operand must be xs:integer, got {}",
            other.type_name()
        ))),
        _ => Err(XPath31Error::type_error("range operand is a sequence")),
    }
}

fn evaluate_for(
    bindings: &[(String, Box<Expression>)],
    return_expr: &Expression,
    ctx: &EvaluationContext<'_>,
    mut vars: HashMap<String, XdmValue>,
    out: &mut Vec<XdmItem>,
) -> Result<(), XPath31Error> {
    let Some(((name, bound), rest)) = bindings.split_first() else {
        out.extend(evaluate(return_expr, ctx, &vars)?.into_items());
        return Ok(());
    };
    for item in evaluate(bound, ctx, &vars)?.into_items() {
        vars.insert(name.clone(), XdmValue::from_item(item));
        evaluate_for(rest, return_expr, ctx, vars.clone(), out)?;
    }
    Ok(())
}

fn evaluate_location_path(
    path: &LocationPath,
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<XdmValue, XPath31Error> {
    let mut current: Vec<XdmItem> = match &path.start {
        PathStart::Context => vec![ctx.context_item.clone().ok_or(XPath31Error::NoContextItem)?],
        PathStart::Root => {
            let root = ctx.root_node.clone().ok_or_else(|| {
                XPath31Error::static_error("XPDY0050", "there is no root node to start '/' from")
            })?;
            vec![XdmItem::Node(root)]
        }
        PathStart::Expr(start) => evaluate(start, ctx, local_vars)?.into_items(),
    };

    for step in &path.steps {
        let mut next: Vec<XdmItem> = Vec::new();
        for item in &current {
            let XdmItem::Node(node) = item else {
                return Err(XPath31Error::static_error(
                    "XPTY0019",
                    format!("path step applied to a non-node ({})", item.type_name()),
                ));
            };
            let mut selected: Vec<XdmItem> = axis_nodes(node, step.axis)
                .into_iter()
                .filter(|n| matches_node_test(n, &step.node_test, step.axis))
                .map(XdmItem::Node)
                .collect();
            for predicate in &step.predicates {
                selected = apply_predicate(selected, predicate, ctx, local_vars)?;
            }
            for candidate in selected {
                let seen = next.iter().any(|existing| match (existing, &candidate) {
                    (XdmItem::Node(a), XdmItem::Node(b)) => a.is_same_node(b),
                    _ => false,
                });
                if !seen {
                    next.push(candidate);
                }
            }
        }
        current = next;
    }
    Ok(XdmValue::from_items(current))
}

fn axis_nodes(node: &Node, axis: Axis) -> Vec<Node> {
    match axis {
        Axis::Child => node.children().to_vec(),
        Axis::Attribute => node.attributes().to_vec(),
        Axis::SelfAxis => vec![node.clone()],
        Axis::Descendant => node.descendants(),
        Axis::DescendantOrSelf => {
            let mut out = vec![node.clone()];
            out.extend(node.descendants());
            out
        }
    }
}

fn matches_node_test(node: &Node, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeKind::Attribute
    } else {
        NodeKind::Element
    };
    match test {
        NodeTest::AnyKind => true,
        NodeTest::Text => node.kind() == NodeKind::Text,
        NodeTest::Wildcard => node.kind() == principal,
        NodeTest::Name(name) => node.kind() == principal && node.name() == Some(name.as_str()),
    }
}

/// Filters `items` by `predicate`: a numeric result selects by position,
/// anything else by effective boolean value.
fn apply_predicate(
    items: Vec<XdmItem>,
    predicate: &Expression,
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<Vec<XdmItem>, XPath31Error> {
    let size = items.len();
    let mut out = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let focus = ctx.with_focus(item.clone(), i + 1, size);
        let result = evaluate(predicate, &focus, local_vars)?;
        let keep = match result.single() {
            Some(XdmItem::Atomic(a)) if a.is_numeric() => a.to_double() == (i + 1) as f64,
            _ => result.effective_boolean_value()?,
        };
        if keep {
            out.push(item);
        }
    }
    Ok(out)
}

fn evaluate_map_constructor(
    entries: &[MapEntry],
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<XdmValue, XPath31Error> {
    let mut pairs: Vec<(AtomicValue, XdmValue)> = Vec::with_capacity(entries.len());
    for entry in entries {
        let key = match evaluate(&entry.key, ctx, local_vars)?.atomize()?.as_slice() {
            [key] => key.clone(),
            keys => {
                return Err(XPath31Error::type_error(format!(
                    "map key must be a single atomic value, got {} items",
                    keys.len()
                )));
            }
        };
        if pairs.iter().any(|(existing, _)| *existing == key) {
            return Err(XPath31Error::static_error(
                "XQDY0137",
                format!("duplicate map key '{}'", key),
            ));
        }
        let value = evaluate(&entry.value, ctx, local_vars)?;
        pairs.push((key, value));
    }
    Ok(XdmValue::from_map(XdmMap::from_entries(pairs)))
}

fn evaluate_lookup(
    base: &Expression,
    key: &LookupKey,
    ctx: &EvaluationContext<'_>,
    local_vars: &HashMap<String, XdmValue>,
) -> Result<XdmValue, XPath31Error> {
    let keys: Option<Vec<AtomicValue>> = match key {
        LookupKey::Wildcard => None,
        LookupKey::NCName(name) => Some(vec![AtomicValue::String(name.clone())]),
        LookupKey::Integer(i) => Some(vec![AtomicValue::Integer(*i)]),
        LookupKey::Parenthesized(expr) => Some(evaluate(expr, ctx, local_vars)?.atomize()?),
    };

    let mut out = XdmValue::empty();
    for item in evaluate(base, ctx, local_vars)?.into_items() {
        let XdmItem::Map(map) = item else {
            return Err(XPath31Error::type_error(format!(
                "lookup applied to {}, expected a map",
                item.type_name()
            )));
        };
        match &keys {
            None => {
                for value in map.values() {
                    out = out.concat(value.clone());
                }
            }
            Some(keys) => {
                for k in keys {
                    if let Some(value) = map.get(k) {
                        out = out.concat(value.clone());
                    }
                }
            }
        }
    }
    Ok(out)
}
