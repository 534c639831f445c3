//! Attribute value template compilation.
//!
//! An attribute value template mixes literal text with `{expression}`
//! placeholders, e.g. `Total: {$price * $qty} {$currency}`. Doubled braces
//! stand for a literal brace. The template compiles to one expression that
//! evaluates to the attribute's string value.

use tessera_xpath31::{Expression, ExpressionParser, StaticContext, TokenKind, XPathParser};

use crate::coercion::reduce;
use crate::error::Xslt3Error;

/// Compiles a template with the built-in XPath parser.
pub fn compile_avt(
    template: &str,
    line: usize,
    ctx: &StaticContext,
) -> Result<Expression, Xslt3Error> {
    compile_avt_with(&XPathParser, template, line, ctx)
}

/// Compiles a template, handing each placeholder to `parser`.
///
/// In backwards compatible mode a placeholder contributes the string value of
/// its first item; otherwise the string values of all its items joined by a
/// space.
pub fn compile_avt_with<P: ExpressionParser + ?Sized>(
    parser: &P,
    template: &str,
    line: usize,
    ctx: &StaticContext,
) -> Result<Expression, Xslt3Error> {
    let bytes = template.as_bytes();
    let mut segments: Vec<Expression> = Vec::new();
    let mut last = 0;

    loop {
        let open = template[last..].find('{').map(|i| i + last);
        let close = template[last..].find('}').map(|i| i + last);

        if let Some(close) = close.filter(|c| open.is_none_or(|o| *c < o)) {
            if bytes.get(close + 1) != Some(&b'}') {
                return Err(Xslt3Error::unmatched_close_brace(template, line));
            }
            segments.push(Expression::literal_string(&template[last..=close]));
            last = close + 2;
        } else if let Some(open) = open {
            if bytes.get(open + 1) == Some(&b'{') {
                segments.push(Expression::literal_string(&template[last..=open]));
                last = open + 2;
                continue;
            }
            if open > last {
                segments.push(Expression::literal_string(&template[last..open]));
            }
            let (expr, end) = parser.parse(template, open + 1, TokenKind::RightCurly, line, ctx)?;
            let expr = if ctx.is_backwards_compatible() {
                reduce(expr, ctx)
            } else {
                expr.simple_content(" ")
            };
            segments.push(expr);
            last = end + 1;
        } else {
            if last < template.len() {
                segments.push(Expression::literal_string(&template[last..]));
            }
            break;
        }
    }

    log::trace!(
        "compiled attribute value template {:?} into {} segment(s)",
        template,
        segments.len()
    );

    Ok(match segments.len() {
        0 => Expression::literal_string(""),
        1 => segments.remove(0).simplify(ctx),
        _ => Expression::Concat {
            parts: segments,
            location: ctx.allocate_location(line),
        }
        .simplify(ctx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_xpath31::{ItemType, StaticType, XPath31Error, parse_expression};

    fn ctx() -> StaticContext {
        StaticContext::new()
            .with_variable("s", StaticType::single(ItemType::String))
            .with_variable("t", StaticType::single(ItemType::String))
    }

    fn compile(template: &str) -> Result<Expression, Xslt3Error> {
        compile_avt(template, 1, &ctx())
    }

    #[test]
    fn test_plain_text_is_a_literal() {
        for text in ["", "plain", "a b  c", "naïve café", "x = 1; y = 2"] {
            assert_eq!(compile(text).unwrap(), Expression::literal_string(text));
        }
    }

    #[test]
    fn test_doubled_braces() {
        assert_eq!(compile("{{").unwrap(), Expression::literal_string("{"));
        assert_eq!(compile("}}").unwrap(), Expression::literal_string("}"));
        assert_eq!(compile("a{{b}}c").unwrap(), Expression::literal_string("a{b}c"));
        assert_eq!(compile("{{{{}}").unwrap(), Expression::literal_string("{{}"));
    }

    #[test]
    fn test_lone_close_brace_is_rejected() {
        for template in ["a}b", "}", "{$s}}", "x}}}"] {
            let err = compile(template).unwrap_err();
            assert_eq!(err.code(), Some("XT0360"), "{template}");
            assert!(matches!(err, Xslt3Error::TemplateSyntax { line: 1, .. }));
        }
    }

    #[test]
    fn test_single_string_placeholder_is_the_expression() {
        assert_eq!(compile("{$s}").unwrap(), Expression::variable("s"));
        assert_eq!(compile("{ $s }").unwrap(), Expression::variable("s"));
    }

    #[test]
    fn test_two_placeholders_concatenate() {
        match compile("{$s}{$t}").unwrap() {
            Expression::Concat { parts, .. } => {
                assert_eq!(parts, vec![Expression::variable("s"), Expression::variable("t")]);
            }
            other => panic!("expected Concat, got {other:?}"),
        }
    }

    #[test]
    fn test_literals_and_placeholders_interleave() {
        let ctx = ctx();
        let expr = compile_avt("id-{$s}-{{{@n}}}", 7, &ctx).unwrap();
        let Expression::Concat { parts, location } = expr else {
            panic!("expected Concat");
        };
        assert_eq!(
            parts,
            vec![
                Expression::literal_string("id-"),
                Expression::variable("s"),
                Expression::literal_string("-{"),
                parse_expression("@n").unwrap().simple_content(" "),
                Expression::literal_string("}"),
            ]
        );
        assert_eq!(ctx.locations().get(location).map(|l| l.line), Some(7));
    }

    #[test]
    fn test_braces_inside_expressions() {
        let expr = compile("{'}'}|{concat('{', $s)}").unwrap();
        let Expression::Concat { parts, .. } = expr else {
            panic!("expected Concat");
        };
        assert_eq!(parts[0], Expression::literal_string("}|"));
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_backwards_compatible_mode_takes_first_item() {
        let ctx = ctx().with_backwards_compatible(true);
        let expr = compile_avt("{item/@sku}", 1, &ctx).unwrap();
        assert_eq!(
            expr,
            parse_expression("item/@sku")
                .unwrap()
                .atomize()
                .first_item()
                .atomic_to_string()
        );
        assert_eq!(compile_avt("{$s}", 1, &ctx).unwrap(), Expression::variable("s"));
    }

    #[test]
    fn test_standard_mode_keeps_all_items() {
        assert_eq!(
            compile("{item/@sku}").unwrap(),
            parse_expression("item/@sku").unwrap().simple_content(" ")
        );
    }

    #[test]
    fn test_empty_placeholder_is_empty_string() {
        assert_eq!(compile("{}").unwrap(), Expression::literal_string(""));
        assert_eq!(compile("a{ }b").unwrap(), Expression::literal_string("ab"));
    }

    #[test]
    fn test_comments_inside_placeholders() {
        assert_eq!(compile("{$s (: surname :)}").unwrap(), compile("{$s}").unwrap());
        assert_eq!(compile("{1 (: } :)}x").unwrap(), compile("{1}x").unwrap());
        assert_eq!(compile("a{(: nothing :)}b").unwrap(), Expression::literal_string("ab"));
    }

    #[test]
    fn test_expression_errors_propagate() {
        let err = compile("x{1 +}").unwrap_err();
        assert_eq!(err.code(), Some("XPST0003"));
        assert!(matches!(err, Xslt3Error::XPath(XPath31Error::Syntax { .. })));

        let err = compile("x{$s").unwrap_err();
        assert!(matches!(err, Xslt3Error::XPath(XPath31Error::Syntax { .. })));
    }

    /// Treats everything up to the next `}` as a variable name.
    struct NameParser;

    impl ExpressionParser for NameParser {
        fn parse(
            &self,
            source: &str,
            start: usize,
            _stop: TokenKind,
            line: usize,
            _ctx: &StaticContext,
        ) -> Result<(Expression, usize), XPath31Error> {
            let end = source[start..]
                .find('}')
                .map(|i| i + start)
                .ok_or_else(|| XPath31Error::syntax(source, line, source.len(), "missing '}'"))?;
            Ok((Expression::variable(source[start..end].trim()), end))
        }
    }

    #[test]
    fn test_custom_parser() {
        let expr = compile_avt_with(&NameParser, "{s}", 1, &ctx()).unwrap();
        assert_eq!(expr, Expression::variable("s"));
        let parser: &dyn ExpressionParser = &NameParser;
        assert!(compile_avt_with(parser, "{s", 1, &ctx()).is_err());
    }
}
