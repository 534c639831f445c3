//! Whole-tree rewrites that remove conversions the static types make redundant.

use crate::analysis::static_type;
use crate::ast::*;
use crate::context::{LocationId, StaticContext};
use crate::types::{AtomicValue, Cardinality, ItemType, StaticType};

impl Expression {
    /// Simplifies the tree bottom-up.
    ///
    /// Wrapper nodes whose operand already has the wrapped type are dropped,
    /// conversions of literals are folded, and adjacent literal parts of a
    /// [`Expression::Concat`] are merged.
    pub fn simplify(self, ctx: &StaticContext) -> Expression {
        match self {
            Expression::Atomize(inner) => {
                let inner = inner.simplify(ctx);
                if static_type(&inner, ctx)
                    .item_type
                    .is_subtype_of(ItemType::AnyAtomic)
                {
                    inner
                } else {
                    inner.atomize()
                }
            }
            Expression::FirstItem(inner) => {
                let inner = inner.simplify(ctx);
                if static_type(&inner, ctx).cardinality.allows_many() {
                    inner.first_item()
                } else {
                    inner
                }
            }
            Expression::AtomicToString(inner) => {
                let inner = inner.simplify(ctx);
                if let Expression::Literal(lit) = &inner {
                    return Expression::literal_string(literal_text(lit));
                }
                if static_type(&inner, ctx)
                    .item_type
                    .is_subtype_of(ItemType::String)
                {
                    inner
                } else {
                    inner.atomic_to_string()
                }
            }
            Expression::SimpleContent { select, separator } => {
                let select = select.simplify(ctx);
                match &select {
                    Expression::Literal(lit) => return Expression::literal_string(literal_text(lit)),
                    Expression::Sequence(items) if items.is_empty() => {
                        return Expression::literal_string("");
                    }
                    _ => {}
                }
                let t = static_type(&select, ctx);
                if t.cardinality == Cardinality::ExactlyOne && t.item_type == ItemType::String {
                    select
                } else {
                    select.simple_content(separator)
                }
            }
            Expression::Concat { parts, location } => simplify_concat(parts, location, ctx),
            Expression::StringConcat { left, right } => Expression::StringConcat {
                left: Box::new(left.simplify(ctx)),
                right: Box::new(right.simplify(ctx)),
            },
            Expression::Sequence(items) => {
                let mut items: Vec<Expression> =
                    items.into_iter().map(|e| e.simplify(ctx)).collect();
                if items.len() == 1 {
                    items.remove(0)
                } else {
                    Expression::Sequence(items)
                }
            }
            Expression::FunctionCall { name, args } => Expression::FunctionCall {
                name,
                args: args.into_iter().map(|e| e.simplify(ctx)).collect(),
            },
            Expression::IfExpr {
                condition,
                then_expr,
                else_expr,
            } => Expression::IfExpr {
                condition: Box::new(condition.simplify(ctx)),
                then_expr: Box::new(then_expr.simplify(ctx)),
                else_expr: Box::new(else_expr.simplify(ctx)),
            },
            other => other,
        }
    }
}

fn literal_text(lit: &Literal) -> String {
    match lit {
        Literal::String(s) => s.clone(),
        Literal::Integer(i) => i.to_string(),
        Literal::Decimal(d) => d.normalize().to_string(),
        Literal::Double(d) => AtomicValue::Double(*d).to_string_value(),
    }
}

fn simplify_concat(parts: Vec<Expression>, location: LocationId, ctx: &StaticContext) -> Expression {
    let mut merged: Vec<Expression> = Vec::with_capacity(parts.len());
    for part in parts.into_iter().map(|p| p.simplify(ctx)) {
        if let Some(text) = part.as_string_literal() {
            if text.is_empty() {
                continue;
            }
            if let Some(Expression::Literal(Literal::String(prev))) = merged.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        merged.push(part);
    }

    match merged.len() {
        0 => Expression::literal_string(""),
        1 if static_type(&merged[0], ctx) == StaticType::single(ItemType::String) => {
            merged.remove(0)
        }
        _ => Expression::Concat {
            parts: merged,
            location,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    #[test]
    fn test_redundant_wrappers_are_dropped() {
        let ctx = StaticContext::new().with_variable("s", StaticType::single(ItemType::String));
        let wrapped = Expression::variable("s").atomize().first_item().atomic_to_string();
        assert_eq!(wrapped.simplify(&ctx), Expression::variable("s"));
    }

    #[test]
    fn test_needed_wrappers_are_kept() {
        let ctx = StaticContext::new();
        let path = parse_expression("a/@b").unwrap();
        let wrapped = path.clone().atomize().first_item().atomic_to_string();
        assert_eq!(wrapped.clone().simplify(&ctx), wrapped);
    }

    #[test]
    fn test_simple_content_of_literal_folds() {
        let ctx = StaticContext::new();
        let expr = Expression::literal_integer(42).simple_content(" ");
        assert_eq!(expr.simplify(&ctx), Expression::literal_string("42"));
        let empty = Expression::Sequence(vec![]).simple_content(" ");
        assert_eq!(empty.simplify(&ctx), Expression::literal_string(""));
    }

    #[test]
    fn test_concat_merges_adjacent_literals() {
        let ctx = StaticContext::new();
        let concat = Expression::Concat {
            parts: vec![
                Expression::literal_string("a"),
                Expression::literal_string("{"),
                Expression::literal_string("b"),
            ],
            location: LocationId(0),
        };
        assert_eq!(concat.simplify(&ctx), Expression::literal_string("a{b"));
    }

    #[test]
    fn test_concat_keeps_expression_parts() {
        let ctx = StaticContext::new();
        let part = parse_expression("x").unwrap().simple_content(" ");
        let concat = Expression::Concat {
            parts: vec![
                Expression::literal_string("a"),
                Expression::literal_string(""),
                part.clone(),
            ],
            location: LocationId(3),
        };
        assert_eq!(
            concat.simplify(&ctx),
            Expression::Concat {
                parts: vec![Expression::literal_string("a"), part],
                location: LocationId(3),
            }
        );
    }
}
