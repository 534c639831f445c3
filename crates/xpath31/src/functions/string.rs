use super::check_arity;
use crate::engine::EvaluationContext;
use crate::error::XPath31Error;
use crate::types::*;

/// The single-argument form's argument, or the context item for the zero-argument form.
fn string_or_context(
    function: &str,
    args: &[XdmValue],
    ctx: &EvaluationContext<'_>,
) -> Result<String, XPath31Error> {
    check_arity(function, args, 0, 1)?;
    match args.first() {
        Some(arg) => arg.to_string_value(),
        None => ctx
            .context_item
            .as_ref()
            .ok_or(XPath31Error::NoContextItem)?
            .string_value(),
    }
}

pub fn fn_string(args: Vec<XdmValue>, ctx: &EvaluationContext<'_>) -> Result<XdmValue, XPath31Error> {
    Ok(XdmValue::from_string(string_or_context("string", &args, ctx)?))
}

pub fn fn_concat(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("concat", &args, 2, usize::MAX)?;
    let mut result = String::new();
    for arg in &args {
        result.push_str(&arg.to_string_value()?);
    }
    Ok(XdmValue::from_string(result))
}

pub fn fn_string_join(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("string-join", &args, 1, 2)?;
    let separator = match args.get(1) {
        Some(sep) => sep.to_string_value()?,
        None => String::new(),
    };
    let parts: Vec<String> = args[0]
        .atomize()?
        .iter()
        .map(AtomicValue::to_string_value)
        .collect();
    Ok(XdmValue::from_string(parts.join(&separator)))
}

pub fn fn_string_length(
    args: Vec<XdmValue>,
    ctx: &EvaluationContext<'_>,
) -> Result<XdmValue, XPath31Error> {
    let s = string_or_context("string-length", &args, ctx)?;
    Ok(XdmValue::from_integer(s.chars().count() as i64))
}

pub fn fn_normalize_space(
    args: Vec<XdmValue>,
    ctx: &EvaluationContext<'_>,
) -> Result<XdmValue, XPath31Error> {
    let s = string_or_context("normalize-space", &args, ctx)?;
    let normalized: Vec<&str> = s.split_whitespace().collect();
    Ok(XdmValue::from_string(normalized.join(" ")))
}

pub fn fn_upper_case(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("upper-case", &args, 1, 1)?;
    Ok(XdmValue::from_string(args[0].to_string_value()?.to_uppercase()))
}

pub fn fn_lower_case(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("lower-case", &args, 1, 1)?;
    Ok(XdmValue::from_string(args[0].to_string_value()?.to_lowercase()))
}

fn two_strings(function: &str, args: &[XdmValue]) -> Result<(String, String), XPath31Error> {
    check_arity(function, args, 2, 2)?;
    Ok((args[0].to_string_value()?, args[1].to_string_value()?))
}

pub fn fn_contains(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    let (s, needle) = two_strings("contains", &args)?;
    Ok(XdmValue::from_bool(s.contains(&needle)))
}

pub fn fn_starts_with(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    let (s, prefix) = two_strings("starts-with", &args)?;
    Ok(XdmValue::from_bool(s.starts_with(&prefix)))
}

pub fn fn_ends_with(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    let (s, suffix) = two_strings("ends-with", &args)?;
    Ok(XdmValue::from_bool(s.ends_with(&suffix)))
}

pub fn fn_substring_before(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    let (s, needle) = two_strings("substring-before", &args)?;
    let result = s.find(&needle).map(|i| &s[..i]).unwrap_or("");
    Ok(XdmValue::from_string(result))
}

pub fn fn_substring_after(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    let (s, needle) = two_strings("substring-after", &args)?;
    let result = s.find(&needle).map(|i| &s[i + needle.len()..]).unwrap_or("");
    Ok(XdmValue::from_string(result))
}

/// `substring($s, $start, $length?)` with 1-based, rounded positions.
pub fn fn_substring(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("substring", &args, 2, 3)?;
    let s = args[0].to_string_value()?;
    let first = round_half_up(number_arg(&args[1])?);
    let last = match args.get(2) {
        Some(len) => first + round_half_up(number_arg(len)?),
        None => f64::INFINITY,
    };

    let result: String = s
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let pos = (*i + 1) as f64;
            pos >= first && pos < last
        })
        .map(|(_, c)| c)
        .collect();
    Ok(XdmValue::from_string(result))
}

fn number_arg(value: &XdmValue) -> Result<f64, XPath31Error> {
    match value.atomize()?.as_slice() {
        [a] => Ok(a.to_double()),
        [] => Ok(f64::NAN),
        _ => Err(XPath31Error::type_error("expected a single number")),
    }
}

fn round_half_up(d: f64) -> f64 {
    (d + 0.5).floor()
}
