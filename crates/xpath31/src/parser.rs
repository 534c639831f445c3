use crate::ast::*;
use crate::context::StaticContext;
use crate::error::XPath31Error;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, char, digit1, multispace1, satisfy},
    combinator::{cut, map, map_res, not, opt, peek, recognize, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// The token at which an embedded expression ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A `}` at brace depth zero, as in attribute value templates.
    RightCurly,
    /// The end of the source text.
    Eof,
}

/// Parses expression text starting at an offset inside a larger string.
///
/// Returns the expression and the byte offset of the stop token: the `}` for
/// [`TokenKind::RightCurly`], or the source length for [`TokenKind::Eof`].
pub trait ExpressionParser {
    fn parse(
        &self,
        source: &str,
        start: usize,
        stop: TokenKind,
        line: usize,
        ctx: &StaticContext,
    ) -> Result<(Expression, usize), XPath31Error>;
}

/// The built-in XPath parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct XPathParser;

impl ExpressionParser for XPathParser {
    fn parse(
        &self,
        source: &str,
        start: usize,
        stop: TokenKind,
        line: usize,
        ctx: &StaticContext,
    ) -> Result<(Expression, usize), XPath31Error> {
        let input = source.get(start..).ok_or_else(|| {
            XPath31Error::syntax(source, line, start, "offset is not on a character boundary")
        })?;
        let offset_of = |rest: &str| source.len() - rest.len();

        let leading = skip_trivia(input);
        let (rest, parsed) = if stop == TokenKind::RightCurly && leading.starts_with('}') {
            // An empty enclosed expression denotes the empty sequence.
            (leading, Expression::Sequence(vec![]))
        } else {
            match expr(leading) {
                Ok(ok) => ok,
                Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                    return Err(XPath31Error::syntax(
                        source,
                        line,
                        offset_of(e.input),
                        format!("unexpected {}", describe(e.input)),
                    ));
                }
                Err(nom::Err::Incomplete(_)) => {
                    return Err(XPath31Error::syntax(
                        source,
                        line,
                        source.len(),
                        "unexpected end of expression",
                    ));
                }
            }
        };

        let rest = skip_trivia(rest);
        let end = offset_of(rest);
        match stop {
            TokenKind::RightCurly if rest.starts_with('}') => {}
            TokenKind::RightCurly if rest.is_empty() => {
                return Err(XPath31Error::syntax(
                    source,
                    line,
                    end,
                    "missing '}' after expression",
                ));
            }
            TokenKind::RightCurly => {
                return Err(XPath31Error::syntax(
                    source,
                    line,
                    end,
                    format!("expected '}}', found {}", describe(rest)),
                ));
            }
            TokenKind::Eof if rest.is_empty() => {}
            TokenKind::Eof => {
                return Err(XPath31Error::syntax(
                    source,
                    line,
                    end,
                    format!("unparsed input remaining: {}", describe(rest)),
                ));
            }
        }

        check_prefixes(&parsed, ctx)?;
        log::trace!(
            "parsed expression {:?} at line {} (offsets {}..{})",
            &source[start..end],
            line,
            start,
            end
        );
        Ok((parsed, end))
    }
}

/// Parses a complete expression string with a default static context.
pub fn parse_expression(input: &str) -> Result<Expression, XPath31Error> {
    XPathParser
        .parse(input, 0, TokenKind::Eof, 1, &StaticContext::new())
        .map(|(expr, _)| expr)
}

fn describe(rest: &str) -> String {
    if rest.is_empty() {
        return "end of expression".to_string();
    }
    let snippet: String = rest.chars().take(16).collect();
    format!("'{}'", snippet)
}

fn check_prefixes(expr: &Expression, ctx: &StaticContext) -> Result<(), XPath31Error> {
    let undeclared = |prefix: &str| {
        XPath31Error::static_error(
            "XPST0081",
            format!("namespace prefix '{}' has not been declared", prefix),
        )
    };
    match expr {
        Expression::FunctionCall { name, .. } => {
            if let Some(prefix) = &name.prefix
                && ctx.namespace_uri(prefix).is_none()
            {
                return Err(undeclared(prefix));
            }
        }
        Expression::Variable(name) => {
            if let Some((prefix, _)) = name.split_once(':')
                && ctx.namespace_uri(prefix).is_none()
            {
                return Err(undeclared(prefix));
            }
        }
        Expression::LocationPath(path) => {
            for step in &path.steps {
                if let NodeTest::Name(name) = &step.node_test
                    && let Some((prefix, _)) = name.split_once(':')
                    && ctx.namespace_uri(prefix).is_none()
                {
                    return Err(undeclared(prefix));
                }
            }
        }
        _ => {}
    }
    for child in expr.children() {
        check_prefixes(child, ctx)?;
    }
    Ok(())
}

/// A comment, `(: ... :)`. Comments nest.
fn comment(input: &str) -> IResult<&str, &str> {
    recognize((
        tag("(:"),
        many0(alt((
            comment,
            recognize(preceded(not(alt((tag("(:"), tag(":)")))), anychar)),
        ))),
        cut(tag(":)")),
    ))
    .parse(input)
}

/// Whitespace and comments between tokens.
fn trivia(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, comment)))).parse(input)
}

fn skip_trivia(input: &str) -> &str {
    trivia(input).map_or(input, |(rest, ())| rest)
}

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(trivia, inner, trivia)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// A keyword that is not the prefix of a longer name.
fn keyword<'a>(
    kw: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    ws(terminated(tag(kw), not(peek(satisfy(is_name_char)))))
}

fn fold_binary(first: Expression, rest: Vec<Expression>, op: BinaryOperator) -> Expression {
    rest.into_iter()
        .fold(first, |left, right| Expression::binary_op(left, op, right))
}

fn expr(input: &str) -> IResult<&str, Expression> {
    let (input, mut items) = separated_list1(ws(char(',')), expr_single).parse(input)?;
    if items.len() == 1 {
        Ok((input, items.remove(0)))
    } else {
        Ok((input, Expression::Sequence(items)))
    }
}

fn expr_single(input: &str) -> IResult<&str, Expression> {
    alt((for_expr, let_expr, if_expr, or_expr)).parse(input)
}

fn for_expr(input: &str) -> IResult<&str, Expression> {
    let (input, _) = keyword("for").parse(input)?;
    let (input, bindings) = separated_list1(ws(char(',')), simple_for_binding).parse(input)?;
    let (input, _) = keyword("return").parse(input)?;
    let (input, return_expr) = expr_single(input)?;

    Ok((
        input,
        Expression::ForExpr {
            bindings: bindings
                .into_iter()
                .map(|(n, e)| (n, Box::new(e)))
                .collect(),
            return_expr: Box::new(return_expr),
        },
    ))
}

fn simple_for_binding(input: &str) -> IResult<&str, (String, Expression)> {
    let (input, _) = ws(char('$')).parse(input)?;
    let (input, name) = var_name(input)?;
    let (input, _) = keyword("in").parse(input)?;
    let (input, expr) = expr_single(input)?;
    Ok((input, (name, expr)))
}

fn let_expr(input: &str) -> IResult<&str, Expression> {
    let (input, _) = keyword("let").parse(input)?;
    let (input, bindings) = separated_list1(ws(char(',')), simple_let_binding).parse(input)?;
    let (input, _) = keyword("return").parse(input)?;
    let (input, return_expr) = expr_single(input)?;

    Ok((
        input,
        Expression::LetExpr {
            bindings: bindings
                .into_iter()
                .map(|(n, e)| (n, Box::new(e)))
                .collect(),
            return_expr: Box::new(return_expr),
        },
    ))
}

fn simple_let_binding(input: &str) -> IResult<&str, (String, Expression)> {
    let (input, _) = ws(char('$')).parse(input)?;
    let (input, name) = var_name(input)?;
    let (input, _) = ws(tag(":=")).parse(input)?;
    let (input, expr) = expr_single(input)?;
    Ok((input, (name, expr)))
}

fn if_expr(input: &str) -> IResult<&str, Expression> {
    let (input, _) = keyword("if").parse(input)?;
    let (input, condition) = delimited(ws(char('(')), expr, ws(char(')'))).parse(input)?;
    let (input, _) = keyword("then").parse(input)?;
    let (input, then_expr) = expr_single(input)?;
    let (input, _) = keyword("else").parse(input)?;
    let (input, else_expr) = expr_single(input)?;

    Ok((
        input,
        Expression::IfExpr {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        },
    ))
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(keyword("or"), and_expr)).parse(input)?;

    Ok((input, fold_binary(first, rest, BinaryOperator::Or)))
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = comparison_expr(input)?;
    let (input, rest) = many0(preceded(keyword("and"), comparison_expr)).parse(input)?;

    Ok((input, fold_binary(first, rest, BinaryOperator::And)))
}

fn comparison_operator(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        ws(alt((
            value(BinaryOperator::Equals, tag("=")),
            value(BinaryOperator::NotEquals, tag("!=")),
            value(BinaryOperator::LessThanOrEqual, tag("<=")),
            value(BinaryOperator::LessThan, tag("<")),
            value(BinaryOperator::GreaterThanOrEqual, tag(">=")),
            value(BinaryOperator::GreaterThan, tag(">")),
        ))),
        value(BinaryOperator::Equals, keyword("eq")),
        value(BinaryOperator::NotEquals, keyword("ne")),
        value(BinaryOperator::LessThanOrEqual, keyword("le")),
        value(BinaryOperator::LessThan, keyword("lt")),
        value(BinaryOperator::GreaterThanOrEqual, keyword("ge")),
        value(BinaryOperator::GreaterThan, keyword("gt")),
    ))
    .parse(input)
}

fn comparison_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = string_concat_expr(input)?;
    let (input, rest) = opt(pair(comparison_operator, string_concat_expr)).parse(input)?;

    match rest {
        Some((op, right)) => Ok((input, Expression::binary_op(first, op, right))),
        None => Ok((input, first)),
    }
}

fn string_concat_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = range_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("||")), range_expr)).parse(input)?;

    let result = rest
        .into_iter()
        .fold(first, |left, right| Expression::StringConcat {
            left: Box::new(left),
            right: Box::new(right),
        });
    Ok((input, result))
}

fn range_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = additive_expr(input)?;
    let (input, rest) = opt(preceded(keyword("to"), additive_expr)).parse(input)?;

    match rest {
        Some(end) => Ok((
            input,
            Expression::RangeExpr {
                start: Box::new(first),
                end: Box::new(end),
            },
        )),
        None => Ok((input, first)),
    }
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = multiplicative_expr(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOperator::Plus, char('+')),
            value(BinaryOperator::Minus, char('-')),
        ))),
        multiplicative_expr,
    ))
    .parse(input)?;

    let result = rest
        .into_iter()
        .fold(first, |left, (op, right)| Expression::binary_op(left, op, right));
    Ok((input, result))
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = unary_expr(input)?;
    let (input, rest) = many0(pair(
        alt((
            value(BinaryOperator::Multiply, ws(char('*'))),
            value(BinaryOperator::IntegerDivide, keyword("idiv")),
            value(BinaryOperator::Divide, keyword("div")),
            value(BinaryOperator::Modulo, keyword("mod")),
        )),
        unary_expr,
    ))
    .parse(input)?;

    let result = rest
        .into_iter()
        .fold(first, |left, (op, right)| Expression::binary_op(left, op, right));
    Ok((input, result))
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let (input, sign) = opt(ws(alt((char('-'), char('+'))))).parse(input)?;
    let (input, expr) = path_expr(input)?;

    match sign {
        Some('-') => Ok((input, Expression::UnaryMinus(Box::new(expr)))),
        _ => Ok((input, expr)),
    }
}

fn path_expr(input: &str) -> IResult<&str, Expression> {
    alt((absolute_path, relative_path)).parse(input)
}

fn descendant_or_self_step() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        node_test: NodeTest::AnyKind,
        predicates: vec![],
    }
}

fn absolute_path(input: &str) -> IResult<&str, Expression> {
    let (input, double_slash) = opt(ws(tag("//"))).parse(input)?;

    if double_slash.is_some() {
        let (input, first_step) = step(input)?;
        let (input, rest) = many0(path_step_with_separator).parse(input)?;
        let mut steps = vec![descendant_or_self_step(), first_step];
        steps.extend(rest.into_iter().flatten());
        return Ok((
            input,
            Expression::LocationPath(LocationPath {
                start: PathStart::Root,
                steps,
            }),
        ));
    }

    let (input, _) = ws(char('/')).parse(input)?;
    let (input, first_step) = opt(step).parse(input)?;
    let mut steps = Vec::new();
    let mut input = input;
    if let Some(first) = first_step {
        let (rest_input, rest) = many0(path_step_with_separator).parse(input)?;
        steps.push(first);
        steps.extend(rest.into_iter().flatten());
        input = rest_input;
    }
    Ok((
        input,
        Expression::LocationPath(LocationPath {
            start: PathStart::Root,
            steps,
        }),
    ))
}

fn relative_path(input: &str) -> IResult<&str, Expression> {
    let (input, first) = postfix_expr(input)?;
    let (input, rest) = many0(path_step_with_separator).parse(input)?;

    if rest.is_empty() {
        return Ok((input, first));
    }
    let steps: Vec<Step> = rest.into_iter().flatten().collect();
    let path = match first {
        Expression::LocationPath(mut lp) => {
            lp.steps.extend(steps);
            lp
        }
        other => LocationPath {
            start: PathStart::Expr(Box::new(other)),
            steps,
        },
    };
    Ok((input, Expression::LocationPath(path)))
}

fn path_step_with_separator(input: &str) -> IResult<&str, Vec<Step>> {
    alt((
        map(preceded(ws(tag("//")), step), |s| {
            vec![descendant_or_self_step(), s]
        }),
        map(preceded(ws(char('/')), step), |s| vec![s]),
    ))
    .parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    let (input, axis) = opt(axis_specifier).parse(input)?;
    let (input, node_test) = node_test(input)?;
    let (input, predicates) = many0(predicate).parse(input)?;

    Ok((
        input,
        Step {
            axis: axis.unwrap_or(Axis::Child),
            node_test,
            predicates,
        },
    ))
}

fn axis_specifier(input: &str) -> IResult<&str, Axis> {
    alt((
        value(Axis::Attribute, char('@')),
        value(Axis::Child, pair(tag("child"), tag("::"))),
        value(Axis::SelfAxis, pair(tag("self"), tag("::"))),
        value(
            Axis::DescendantOrSelf,
            pair(tag("descendant-or-self"), tag("::")),
        ),
        value(Axis::Descendant, pair(tag("descendant"), tag("::"))),
        value(Axis::Attribute, pair(tag("attribute"), tag("::"))),
    ))
    .parse(input)
}

fn kind_test<'a>(
    name: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(name), pair(ws(char('(')), char(')')))
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Text, kind_test("text")),
        value(NodeTest::AnyKind, kind_test("node")),
        value(NodeTest::Wildcard, char('*')),
        map(qname_str, |q: &str| NodeTest::Name(q.to_string())),
    ))
    .parse(input)
}

fn postfix_expr(input: &str) -> IResult<&str, Expression> {
    let (input, base) = primary_expr(input)?;
    let (input, postfixes) = many0(alt((
        map(predicate, PostfixOp::Predicate),
        map(lookup, PostfixOp::Lookup),
    )))
    .parse(input)?;

    let mut result = base;
    for postfix in postfixes {
        result = match postfix {
            PostfixOp::Predicate(pred) => match result {
                Expression::FilterExpr {
                    base,
                    mut predicates,
                } => {
                    predicates.push(pred);
                    Expression::FilterExpr { base, predicates }
                }
                other => Expression::FilterExpr {
                    base: Box::new(other),
                    predicates: vec![pred],
                },
            },
            PostfixOp::Lookup(key) => Expression::LookupExpr {
                base: Box::new(result),
                key,
            },
        };
    }
    Ok((input, result))
}

enum PostfixOp {
    Predicate(Expression),
    Lookup(LookupKey),
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expr, ws(char(']'))).parse(input)
}

fn lookup(input: &str) -> IResult<&str, LookupKey> {
    preceded(ws(char('?')), key_specifier).parse(input)
}

fn key_specifier(input: &str) -> IResult<&str, LookupKey> {
    alt((
        value(LookupKey::Wildcard, char('*')),
        map(integer_literal, LookupKey::Integer),
        map(nc_name, |s| LookupKey::NCName(s.to_string())),
        map(delimited(ws(char('(')), expr, ws(char(')'))), |e| {
            LookupKey::Parenthesized(Box::new(e))
        }),
    ))
    .parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map_constructor,
        function_call,
        variable_reference,
        parenthesized_expr,
        literal,
        context_item_expr,
        axis_step_expr,
    )))
    .parse(input)
}

fn axis_step_expr(input: &str) -> IResult<&str, Expression> {
    map(step, |s| {
        Expression::LocationPath(LocationPath {
            start: PathStart::Context,
            steps: vec![s],
        })
    })
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, Expression> {
    alt((
        map(string_literal, |s| Expression::Literal(Literal::String(s))),
        numeric_literal,
    ))
    .parse(input)
}

/// A quoted string; the quote character is escaped by doubling it.
fn quoted(quote: char) -> impl Fn(&str) -> IResult<&str, String> {
    move |input: &str| {
        let (mut input, _) = char(quote).parse(input)?;
        let mut out = String::new();
        loop {
            let (rest, chunk) = take_while(|c| c != quote).parse(input)?;
            out.push_str(chunk);
            let (rest, _) = char(quote).parse(rest)?;
            match rest.strip_prefix(quote) {
                Some(after) => {
                    out.push(quote);
                    input = after;
                }
                None => return Ok((rest, out)),
            }
        }
    }
}

fn string_literal(input: &str) -> IResult<&str, String> {
    alt((quoted('\''), quoted('"'))).parse(input)
}

fn numeric_literal(input: &str) -> IResult<&str, Expression> {
    alt((double_literal, decimal_literal, integer_literal_expr)).parse(input)
}

fn integer_literal(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |s: &str| s.parse::<i64>()).parse(input)
}

fn integer_literal_expr(input: &str) -> IResult<&str, Expression> {
    map(integer_literal, |i| Expression::Literal(Literal::Integer(i))).parse(input)
}

fn decimal_literal(input: &str) -> IResult<&str, Expression> {
    map_res(
        recognize(alt((
            recognize((digit1, char('.'), opt(digit1))),
            recognize((char('.'), digit1)),
        ))),
        |s: &str| Decimal::from_str(s).map(|d| Expression::Literal(Literal::Decimal(d))),
    )
    .parse(input)
}

fn double_literal(input: &str) -> IResult<&str, Expression> {
    let (input, s) = recognize((
        alt((
            recognize((digit1, char('.'), opt(digit1))),
            recognize((char('.'), digit1)),
            digit1,
        )),
        alt((char('e'), char('E'))),
        opt(alt((char('+'), char('-')))),
        digit1,
    ))
    .parse(input)?;

    let d: f64 = s.parse().unwrap_or(f64::NAN);
    Ok((input, Expression::Literal(Literal::Double(d))))
}

fn variable_reference(input: &str) -> IResult<&str, Expression> {
    map(preceded(char('$'), var_name), Expression::Variable).parse(input)
}

fn var_name(input: &str) -> IResult<&str, String> {
    map(qname_str, |s| s.to_string()).parse(input)
}

fn context_item_expr(input: &str) -> IResult<&str, Expression> {
    let (input, _) = char('.').parse(input)?;
    if let Some(c) = input.chars().next()
        && (c == '.' || c.is_ascii_digit())
    {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((input, Expression::ContextItem))
}

fn parenthesized_expr(input: &str) -> IResult<&str, Expression> {
    let (input, items) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expr_single),
        ws(char(')')),
    )
    .parse(input)?;

    let expr = match &items[..] {
        [single] => single.clone(),
        _ => Expression::Sequence(items),
    };
    Ok((input, expr))
}

fn map_constructor(input: &str) -> IResult<&str, Expression> {
    let (input, _) = keyword("map").parse(input)?;
    let (input, entries) = delimited(
        ws(char('{')),
        separated_list0(ws(char(',')), map_entry),
        ws(char('}')),
    )
    .parse(input)?;

    Ok((input, Expression::MapConstructor(entries)))
}

fn map_entry(input: &str) -> IResult<&str, MapEntry> {
    let (input, key) = expr_single(input)?;
    let (input, _) = ws(char(':')).parse(input)?;
    let (input, value) = expr_single(input)?;

    Ok((
        input,
        MapEntry {
            key: Box::new(key),
            value: Box::new(value),
        },
    ))
}

const RESERVED_FUNCTION_NAMES: [&str; 6] = ["if", "for", "let", "map", "text", "node"];

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (input, name) = qname(input)?;
    let (input, _) = peek(ws(char('('))).parse(input)?;

    if name.prefix.is_none() && RESERVED_FUNCTION_NAMES.contains(&name.local_part.as_str()) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let (input, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expr_single),
        ws(char(')')),
    )
    .parse(input)?;
    Ok((input, Expression::FunctionCall { name, args }))
}

fn qname(input: &str) -> IResult<&str, QName> {
    let (input, first) = nc_name(input)?;
    let (input, second) = opt(preceded(char(':'), nc_name)).parse(input)?;

    match second {
        Some(local) => Ok((input, QName::with_prefix(first, local))),
        None => Ok((input, QName::new(first))),
    }
}

fn qname_str(input: &str) -> IResult<&str, &str> {
    recognize(pair(nc_name, opt(pair(char(':'), nc_name)))).parse(input)
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_name_char),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_enclosed(source: &str, start: usize) -> Result<(Expression, usize), XPath31Error> {
        XPathParser.parse(source, start, TokenKind::RightCurly, 1, &StaticContext::new())
    }

    #[test]
    fn test_parse_integer_literal() {
        let expr = parse_expression("42").unwrap();
        assert!(matches!(expr, Expression::Literal(Literal::Integer(42))));
    }

    #[test]
    fn test_parse_string_literal_with_doubled_quote() {
        let expr = parse_expression("'it''s'").unwrap();
        assert_eq!(expr.as_string_literal(), Some("it's"));

        let expr = parse_expression("\"world\"").unwrap();
        assert_eq!(expr.as_string_literal(), Some("world"));
    }

    #[test]
    fn test_parse_decimal_and_double() {
        let expr = parse_expression("12.50").unwrap();
        assert!(matches!(expr, Expression::Literal(Literal::Decimal(_))));
        let expr = parse_expression("1e3").unwrap();
        assert!(matches!(expr, Expression::Literal(Literal::Double(d)) if d == 1000.0));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        match expr {
            Expression::BinaryOp { op, right, .. } => {
                assert_eq!(op, BinaryOperator::Plus);
                assert!(matches!(
                    *right,
                    Expression::BinaryOp {
                        op: BinaryOperator::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_hyphenated_function_name() {
        let expr = parse_expression("upper-case($name)").unwrap();
        assert!(
            matches!(expr, Expression::FunctionCall { ref name, ref args } if name.local_part == "upper-case" && args.len() == 1)
        );
    }

    #[test]
    fn test_parse_paths() {
        let expr = parse_expression("order/item[1]/@sku").unwrap();
        let Expression::LocationPath(path) = expr else {
            panic!("expected a path");
        };
        assert_eq!(path.start, PathStart::Context);
        assert_eq!(path.steps.len(), 3);
        assert_eq!(path.steps[1].predicates.len(), 1);
        assert_eq!(path.steps[2].axis, Axis::Attribute);

        let expr = parse_expression("//name").unwrap();
        assert!(matches!(expr, Expression::LocationPath(LocationPath { start: PathStart::Root, ref steps }) if steps.len() == 2));

        let expr = parse_expression("$doc/a/text()").unwrap();
        assert!(matches!(
            expr,
            Expression::LocationPath(LocationPath {
                start: PathStart::Expr(_),
                ..
            })
        ));
    }

    #[test]
    fn test_keywords_do_not_swallow_names() {
        let expr = parse_expression("order").unwrap();
        assert!(matches!(expr, Expression::LocationPath(_)));
        let expr = parse_expression("format").unwrap();
        assert!(matches!(expr, Expression::LocationPath(_)));
        let expr = parse_expression("a div b").unwrap();
        assert!(matches!(
            expr,
            Expression::BinaryOp {
                op: BinaryOperator::Divide,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_flwor_like_expressions() {
        assert!(matches!(
            parse_expression("let $x := 5 return $x * 2").unwrap(),
            Expression::LetExpr { .. }
        ));
        assert!(matches!(
            parse_expression("for $i in 1 to 3 return $i").unwrap(),
            Expression::ForExpr { .. }
        ));
        assert!(matches!(
            parse_expression("if ($a) then 'y' else 'n'").unwrap(),
            Expression::IfExpr { .. }
        ));
    }

    #[test]
    fn test_enclosed_expression_stops_at_closing_brace() {
        let source = "Hello {name}, bye";
        let (expr, end) = parse_enclosed(source, 7).unwrap();
        assert!(matches!(expr, Expression::LocationPath(_)));
        assert_eq!(end, 11);
        assert_eq!(&source[end..end + 1], "}");
    }

    #[test]
    fn test_enclosed_expression_skips_nested_braces() {
        let source = "{map{'k':'}'}?k} tail";
        let (expr, end) = parse_enclosed(source, 1).unwrap();
        assert!(matches!(expr, Expression::LookupExpr { .. }));
        assert_eq!(end, 15);
    }

    #[test]
    fn test_empty_enclosed_expression_is_empty_sequence() {
        let (expr, end) = parse_enclosed("{ }", 1).unwrap();
        assert_eq!(expr, Expression::Sequence(vec![]));
        assert_eq!(end, 2);
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse_enclosed("{price * qty", 1).unwrap_err();
        assert_eq!(err.code(), "XPST0003");
        assert!(matches!(err, XPath31Error::Syntax { offset: 12, .. }));
    }

    #[test]
    fn test_undeclared_prefix_is_rejected() {
        let ctx = StaticContext::new();
        let err = XPathParser
            .parse("{ex:f(1)}", 1, TokenKind::RightCurly, 4, &ctx)
            .unwrap_err();
        assert_eq!(err.code(), "XPST0081");

        let ctx = StaticContext::new().with_namespace("ex", "urn:example");
        assert!(
            XPathParser
                .parse("{ex:f(1)}", 1, TokenKind::RightCurly, 4, &ctx)
                .is_ok()
        );
    }

    #[test]
    fn test_comments_are_whitespace() {
        let (expr, end) = parse_enclosed("{1 (: note :)}", 1).unwrap();
        assert_eq!(expr, parse_expression("1").unwrap());
        assert_eq!(end, 13);

        let (_, end) = parse_enclosed("{(: a (: nested } :) b :) price}", 1).unwrap();
        assert_eq!(end, 31);

        assert_eq!(
            parse_expression("1 +(::)2").unwrap(),
            parse_expression("1 + 2").unwrap()
        );
        assert_eq!(
            parse_expression("'(: kept :)'").unwrap(),
            Expression::literal_string("(: kept :)")
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse_enclosed("{1 (: open }", 1).unwrap_err();
        assert!(matches!(err, XPath31Error::Syntax { .. }));
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse_expression("1 2").unwrap_err();
        assert!(matches!(err, XPath31Error::Syntax { .. }));
    }
}
