//! Static type inference over expression trees.
//!
//! The inferred types are conservative: when nothing better is known an
//! expression is typed `item()*`. Rewrites such as the XSLT coercion rules use
//! them to skip conversions that can never be needed.

use crate::ast::*;
use crate::context::StaticContext;
use crate::functions;
use crate::types::{Cardinality, ItemType, StaticType};

pub fn static_type(expr: &Expression, ctx: &StaticContext) -> StaticType {
    infer(expr, ctx, &mut Vec::new())
}

fn infer(expr: &Expression, ctx: &StaticContext, scope: &mut Vec<(String, StaticType)>) -> StaticType {
    match expr {
        Expression::Literal(lit) => StaticType::single(match lit {
            Literal::String(_) => ItemType::String,
            Literal::Integer(_) => ItemType::Integer,
            Literal::Decimal(_) => ItemType::Decimal,
            Literal::Double(_) => ItemType::Double,
        }),
        Expression::Variable(name) => scope
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
            .or_else(|| ctx.variable_type(name).copied())
            .unwrap_or_else(StaticType::any),
        Expression::ContextItem => StaticType::single(ItemType::Item),
        Expression::LocationPath(path) => path_type(path),
        Expression::FunctionCall { name, args } => match name.prefix.as_deref() {
            None | Some("fn") => functions::return_type(&name.local_part, args.len())
                .unwrap_or_else(StaticType::any),
            Some(_) => StaticType::any(),
        },
        Expression::BinaryOp { left, op, right } => {
            if op.is_arithmetic() {
                let l = infer(left, ctx, scope);
                let r = infer(right, ctx, scope);
                let item = arithmetic_result(*op, l.item_type.atomized(), r.item_type.atomized());
                StaticType::new(item, exactly_one_if(l.cardinality, r.cardinality))
            } else {
                StaticType::single(ItemType::Boolean)
            }
        }
        Expression::UnaryMinus(inner) => {
            let t = infer(inner, ctx, scope);
            let atomized = t.item_type.atomized();
            let item = if atomized.is_subtype_of(ItemType::Numeric) {
                atomized
            } else if atomized == ItemType::UntypedAtomic {
                ItemType::Double
            } else {
                ItemType::Numeric
            };
            StaticType::new(item, exactly_one_if(t.cardinality, Cardinality::ExactlyOne))
        }
        Expression::StringConcat { .. }
        | Expression::SimpleContent { .. }
        | Expression::Concat { .. } => StaticType::single(ItemType::String),
        Expression::RangeExpr { .. } => StaticType::many(ItemType::Integer),
        Expression::IfExpr {
            then_expr,
            else_expr,
            ..
        } => infer(then_expr, ctx, scope).union(&infer(else_expr, ctx, scope)),
        Expression::LetExpr {
            bindings,
            return_expr,
        } => {
            let depth = scope.len();
            for (name, bound) in bindings {
                let t = infer(bound, ctx, scope);
                scope.push((name.clone(), t));
            }
            let result = infer(return_expr, ctx, scope);
            scope.truncate(depth);
            result
        }
        Expression::ForExpr {
            bindings,
            return_expr,
        } => {
            let depth = scope.len();
            for (name, bound) in bindings {
                let t = infer(bound, ctx, scope);
                scope.push((name.clone(), StaticType::single(t.item_type)));
            }
            let result = infer(return_expr, ctx, scope);
            scope.truncate(depth);
            if result.cardinality == Cardinality::Empty {
                result
            } else {
                StaticType::many(result.item_type)
            }
        }
        Expression::Sequence(items) => items.iter().fold(StaticType::empty(), |acc, item| {
            acc.sequence(&infer(item, ctx, scope))
        }),
        Expression::FilterExpr { base, predicates } => {
            let t = infer(base, ctx, scope);
            let positional = predicates
                .iter()
                .any(|p| matches!(p, Expression::Literal(Literal::Integer(_))));
            let cardinality = if positional {
                t.cardinality.first().union(Cardinality::Empty)
            } else {
                t.cardinality.union(Cardinality::Empty)
            };
            StaticType::new(t.item_type, cardinality)
        }
        Expression::MapConstructor(_) => StaticType::single(ItemType::Map),
        Expression::LookupExpr { .. } => StaticType::any(),
        Expression::Atomize(inner) => {
            let t = infer(inner, ctx, scope);
            StaticType::new(t.item_type.atomized(), t.cardinality)
        }
        Expression::FirstItem(inner) => {
            let t = infer(inner, ctx, scope);
            StaticType::new(t.item_type, t.cardinality.first())
        }
        Expression::AtomicToString(inner) => {
            let t = infer(inner, ctx, scope);
            StaticType::new(ItemType::String, t.cardinality)
        }
    }
}

fn exactly_one_if(a: Cardinality, b: Cardinality) -> Cardinality {
    if a == Cardinality::ExactlyOne && b == Cardinality::ExactlyOne {
        Cardinality::ExactlyOne
    } else {
        Cardinality::ZeroOrOne
    }
}

fn arithmetic_result(op: BinaryOperator, left: ItemType, right: ItemType) -> ItemType {
    let promote = |t: ItemType| {
        if t == ItemType::UntypedAtomic {
            ItemType::Double
        } else {
            t
        }
    };
    let (left, right) = (promote(left), promote(right));
    if op == BinaryOperator::IntegerDivide {
        return ItemType::Integer;
    }
    if left == ItemType::Double || right == ItemType::Double {
        return ItemType::Double;
    }
    match (left, right) {
        (ItemType::Integer, ItemType::Integer) if op == BinaryOperator::Divide => ItemType::Decimal,
        (ItemType::Integer, ItemType::Integer) => ItemType::Integer,
        (l, r) if l.is_subtype_of(ItemType::Decimal) && r.is_subtype_of(ItemType::Decimal) => {
            ItemType::Decimal
        }
        _ => ItemType::Numeric,
    }
}

fn path_type(path: &LocationPath) -> StaticType {
    let Some(last) = path.steps.last() else {
        return StaticType::single(ItemType::Document);
    };
    let item = match (last.axis, &last.node_test) {
        (Axis::Attribute, _) => ItemType::Attribute,
        (_, NodeTest::Text) => ItemType::Text,
        (_, NodeTest::AnyKind) => ItemType::AnyNode,
        (Axis::SelfAxis | Axis::DescendantOrSelf, NodeTest::Wildcard) => ItemType::Element,
        (Axis::SelfAxis | Axis::DescendantOrSelf, NodeTest::Name(_)) => ItemType::Element,
        (Axis::Child | Axis::Descendant, _) => ItemType::Element,
    };
    StaticType::many(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn type_of(src: &str, ctx: &StaticContext) -> StaticType {
        static_type(&parse_expression(src).unwrap(), ctx)
    }

    #[test]
    fn test_literal_types() {
        let ctx = StaticContext::new();
        assert_eq!(type_of("'a'", &ctx), StaticType::single(ItemType::String));
        assert_eq!(type_of("1", &ctx), StaticType::single(ItemType::Integer));
        assert_eq!(type_of("1.5", &ctx), StaticType::single(ItemType::Decimal));
    }

    #[test]
    fn test_declared_variables() {
        let ctx = StaticContext::new().with_variable("name", StaticType::single(ItemType::String));
        assert_eq!(type_of("$name", &ctx), StaticType::single(ItemType::String));
        assert_eq!(type_of("$other", &ctx), StaticType::any());
    }

    #[test]
    fn test_path_types() {
        let ctx = StaticContext::new();
        assert_eq!(type_of("@id", &ctx), StaticType::many(ItemType::Attribute));
        assert_eq!(type_of("a/b", &ctx), StaticType::many(ItemType::Element));
        assert_eq!(type_of("a/text()", &ctx), StaticType::many(ItemType::Text));
        assert_eq!(type_of("/", &ctx), StaticType::single(ItemType::Document));
    }

    #[test]
    fn test_arithmetic_types() {
        let ctx = StaticContext::new();
        assert_eq!(type_of("1 + 2", &ctx), StaticType::single(ItemType::Integer));
        assert_eq!(type_of("1 div 2", &ctx), StaticType::single(ItemType::Decimal));
        assert_eq!(type_of("price * qty", &ctx), StaticType::optional(ItemType::Double));
    }

    #[test]
    fn test_let_binding_scopes() {
        let ctx = StaticContext::new();
        assert_eq!(
            type_of("let $x := 'a' return $x", &ctx),
            StaticType::single(ItemType::String)
        );
        assert_eq!(type_of("for $i in 1 to 3 return $i", &ctx), StaticType::many(ItemType::Integer));
    }

    #[test]
    fn test_wrapper_types() {
        let ctx = StaticContext::new();
        let path = parse_expression("item/@sku").unwrap();
        let wrapped = path.atomize().first_item().atomic_to_string();
        assert_eq!(static_type(&wrapped, &ctx), StaticType::optional(ItemType::String));
    }

    #[test]
    fn test_sequence_and_if() {
        let ctx = StaticContext::new();
        assert_eq!(type_of("()", &ctx), StaticType::empty());
        assert_eq!(type_of("(1, 2)", &ctx), StaticType::new(ItemType::Integer, Cardinality::OneOrMore));
        assert_eq!(
            type_of("if (1) then 'a' else ()", &ctx),
            StaticType::optional(ItemType::String)
        );
    }
}
