//! XPath 1.0 compatible coercion of an attribute value template placeholder.
//!
//! In backwards compatible mode a placeholder contributes the string value of
//! the first item it selects. The wrappers that achieve this are only added
//! where the static type of the expression says they can change the result.

use tessera_xpath31::{Expression, ItemType, StaticContext, static_type};

/// Wraps `expr` so it yields at most one `xs:string`.
///
/// Adds [`Expression::Atomize`] when items may be non-atomic, then
/// [`Expression::FirstItem`] when more than one item may arrive, then
/// [`Expression::AtomicToString`] when the result may not be a string.
/// A string-typed singleton passes through unchanged.
pub fn reduce(expr: Expression, ctx: &StaticContext) -> Expression {
    let mut expr = expr;

    if !static_type(&expr, ctx)
        .item_type
        .is_subtype_of(ItemType::AnyAtomic)
    {
        expr = expr.atomize();
    }
    if static_type(&expr, ctx).cardinality.allows_many() {
        expr = expr.first_item();
    }
    if !static_type(&expr, ctx)
        .item_type
        .is_subtype_of(ItemType::String)
    {
        expr = expr.atomic_to_string();
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_xpath31::{Cardinality, StaticType, parse_expression};

    fn ctx() -> StaticContext {
        StaticContext::new()
            .with_variable("name", StaticType::single(ItemType::String))
            .with_variable("names", StaticType::many(ItemType::String))
            .with_variable("count", StaticType::single(ItemType::Integer))
    }

    fn reduced(source: &str) -> Expression {
        reduce(parse_expression(source).unwrap(), &ctx())
    }

    #[test]
    fn test_string_singleton_is_untouched() {
        assert_eq!(reduced("$name"), Expression::variable("name"));
        assert_eq!(reduced("'x'"), Expression::literal_string("x"));
    }

    #[test]
    fn test_nodes_are_atomized_first() {
        let path = parse_expression("item/@sku").unwrap();
        assert_eq!(
            reduced("item/@sku"),
            path.atomize().first_item().atomic_to_string()
        );
    }

    #[test]
    fn test_only_needed_wrappers() {
        assert_eq!(
            reduced("$names"),
            Expression::variable("names").first_item()
        );
        assert_eq!(
            reduced("$count"),
            Expression::variable("count").atomic_to_string()
        );
        assert_eq!(
            reduced("1 to 3"),
            parse_expression("1 to 3")
                .unwrap()
                .first_item()
                .atomic_to_string()
        );
    }

    #[test]
    fn test_result_is_an_optional_string() {
        for source in ["$names", "item/@sku", "$count", "(1, 'a', 2.5)", "."] {
            let t = static_type(&reduced(source), &ctx());
            assert_eq!(t.item_type, ItemType::String, "{source}");
            assert!(!t.cardinality.allows_many(), "{source}");
        }
    }

    #[test]
    fn test_reducing_twice_adds_nothing() {
        for source in ["$names", "item/@sku", "$count", "$name"] {
            let once = reduced(source);
            assert_eq!(reduce(once.clone(), &ctx()), once, "{source}");
        }
        assert_eq!(
            static_type(&reduced("$count"), &ctx()).cardinality,
            Cardinality::ExactlyOne
        );
    }
}
