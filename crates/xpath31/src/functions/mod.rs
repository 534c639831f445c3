mod boolean;
mod core;
mod numeric;
mod sequence;
mod string;

use crate::ast::QName;
use crate::engine::EvaluationContext;
use crate::error::XPath31Error;
use crate::types::{ItemType, StaticType, XdmValue};

pub fn call_function(
    name: &QName,
    args: Vec<XdmValue>,
    ctx: &EvaluationContext<'_>,
) -> Result<XdmValue, XPath31Error> {
    let prefix = name.prefix.as_deref();
    let local = name.local_part.as_str();

    match (prefix, local) {
        (Some("fn") | None, "true") => boolean::fn_true(args),
        (Some("fn") | None, "false") => boolean::fn_false(args),
        (Some("fn") | None, "not") => boolean::fn_not(args),
        (Some("fn") | None, "boolean") => boolean::fn_boolean(args),

        (Some("fn") | None, "string") => string::fn_string(args, ctx),
        (Some("fn") | None, "concat") => string::fn_concat(args),
        (Some("fn") | None, "string-join") => string::fn_string_join(args),
        (Some("fn") | None, "string-length") => string::fn_string_length(args, ctx),
        (Some("fn") | None, "normalize-space") => string::fn_normalize_space(args, ctx),
        (Some("fn") | None, "upper-case") => string::fn_upper_case(args),
        (Some("fn") | None, "lower-case") => string::fn_lower_case(args),
        (Some("fn") | None, "contains") => string::fn_contains(args),
        (Some("fn") | None, "starts-with") => string::fn_starts_with(args),
        (Some("fn") | None, "ends-with") => string::fn_ends_with(args),
        (Some("fn") | None, "substring") => string::fn_substring(args),
        (Some("fn") | None, "substring-before") => string::fn_substring_before(args),
        (Some("fn") | None, "substring-after") => string::fn_substring_after(args),

        (Some("fn") | None, "number") => numeric::fn_number(args, ctx),
        (Some("fn") | None, "sum") => numeric::fn_sum(args),

        (Some("fn") | None, "count") => sequence::fn_count(args),
        (Some("fn") | None, "empty") => sequence::fn_empty(args),
        (Some("fn") | None, "exists") => sequence::fn_exists(args),
        (Some("fn") | None, "head") => sequence::fn_head(args),
        (Some("fn") | None, "reverse") => sequence::fn_reverse(args),

        (Some("fn") | None, "data") => core::fn_data(args, ctx),
        (Some("fn") | None, "name") => core::fn_name(args, ctx),
        (Some("fn") | None, "local-name") => core::fn_local_name(args, ctx),
        (Some("fn") | None, "position") => core::fn_position(args, ctx),
        (Some("fn") | None, "last") => core::fn_last(args, ctx),

        _ => Err(XPath31Error::function(name.to_string(), "Unknown function")),
    }
}

/// Static result type of a built-in function, or `None` if it is unknown.
pub fn return_type(local: &str, arity: usize) -> Option<StaticType> {
    let t = match (local, arity) {
        ("true" | "false", 0) | ("not" | "boolean" | "empty" | "exists", 1) => {
            StaticType::single(ItemType::Boolean)
        }
        ("contains" | "starts-with" | "ends-with", 2) => StaticType::single(ItemType::Boolean),
        ("string" | "normalize-space" | "name" | "local-name", 0 | 1)
        | ("upper-case" | "lower-case" | "string-join", 1)
        | ("string-join" | "substring-before" | "substring-after", 2)
        | ("substring", 2 | 3) => StaticType::single(ItemType::String),
        ("concat", n) if n >= 2 => StaticType::single(ItemType::String),
        ("string-length", 0 | 1) | ("count", 1) | ("position" | "last", 0) => {
            StaticType::single(ItemType::Integer)
        }
        ("number", 0 | 1) => StaticType::single(ItemType::Double),
        ("sum", 1) => StaticType::single(ItemType::Numeric),
        ("data", 0 | 1) => StaticType::many(ItemType::AnyAtomic),
        ("head", 1) => StaticType::optional(ItemType::Item),
        ("reverse", 1) => StaticType::any(),
        _ => return None,
    };
    Some(t)
}

fn check_arity(
    function: &str,
    args: &[XdmValue],
    min: usize,
    max: usize,
) -> Result<(), XPath31Error> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(XPath31Error::function(
            function,
            format!("Expected {} arguments, got {}", expected, args.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unknown_function() {
        let vars = HashMap::new();
        let ctx = EvaluationContext::new(None, None, &vars);
        let err = call_function(&QName::new("no-such-thing"), vec![], &ctx).unwrap_err();
        assert_eq!(err.code(), "XPST0017");
    }

    #[test]
    fn test_return_types() {
        assert_eq!(return_type("count", 1), Some(StaticType::single(ItemType::Integer)));
        assert_eq!(return_type("concat", 3), Some(StaticType::single(ItemType::String)));
        assert_eq!(return_type("concat", 1), None);
        assert_eq!(return_type("unknown", 0), None);
    }
}
