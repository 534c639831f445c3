//! The operations behind the `tessera` subcommands.

use std::collections::HashMap;

use serde_json::Value;
use tessera_xpath31::{
    EvaluationContext, Expression, ItemType, Node, StaticContext, StaticType, XdmItem, XdmValue,
    evaluate,
};
use tessera_xslt3::{Collation, CollatorRegistry, Configuration, compile_avt, make_collation};

use crate::error::CliError;

/// Splits a `name=value` argument.
pub fn parse_pair(arg: &str) -> Result<(String, String), CliError> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(CliError::InvalidArgument(arg.to_string())),
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvtRequest {
    pub template: String,
    pub line: usize,
    /// String-valued variables, visible to the template as `$name`.
    pub variables: Vec<(String, String)>,
    /// Context document, built from JSON with the given root element name.
    pub data: Option<(String, Value)>,
    pub backwards_compatible: bool,
}

#[derive(Debug, Clone)]
pub struct AvtOutput {
    pub expression: Expression,
    pub value: String,
}

/// Compiles a template and evaluates it against the request's data.
pub fn render_avt(request: &AvtRequest) -> Result<AvtOutput, CliError> {
    let mut ctx =
        StaticContext::new().with_backwards_compatible(request.backwards_compatible);
    let mut variables = HashMap::new();
    for (name, value) in &request.variables {
        ctx = ctx.with_variable(name.clone(), StaticType::single(ItemType::String));
        variables.insert(name.clone(), XdmValue::from_string(value.clone()));
    }

    let expression = compile_avt(&request.template, request.line, &ctx)?;
    log::debug!("compiled template into {:?}", expression);

    let document = request
        .data
        .as_ref()
        .map(|(root, json)| Node::from_json(root, json));
    let eval_ctx = EvaluationContext::new(
        document.clone().map(XdmItem::Node),
        document,
        &variables,
    );
    let value = evaluate(&expression, &eval_ctx, &HashMap::new())?.to_string_value()?;
    Ok(AvtOutput { expression, value })
}

#[derive(Debug, Clone, Default)]
pub struct SortRequest {
    /// A registered or UCA collation URI; takes precedence over `properties`.
    pub collation_uri: Option<String>,
    pub properties: HashMap<String, String>,
    pub words: Vec<String>,
}

pub fn build_collation(config: &Configuration, request: &SortRequest) -> Result<Collation, CliError> {
    match &request.collation_uri {
        Some(uri) => Ok(CollatorRegistry::new().resolve(config, uri)?),
        None => Ok(make_collation(
            config,
            tessera_xslt3::UCA_COLLATION_URI,
            &request.properties,
        )?),
    }
}

/// Sorts the request's words with the configured collation.
pub fn sort_words(config: &Configuration, request: &SortRequest) -> Result<Vec<String>, CliError> {
    let collation = build_collation(config, request)?;
    let mut words = request.words.clone();
    collation.sort(&mut words);
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("name=Ada=Lovelace").unwrap(),
            ("name".to_string(), "Ada=Lovelace".to_string())
        );
        assert!(matches!(parse_pair("=x"), Err(CliError::InvalidArgument(_))));
        assert!(matches!(parse_pair("x"), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_render_with_variables() {
        let request = AvtRequest {
            template: "Dear {$title} {$name}".to_string(),
            line: 1,
            variables: vec![
                ("title".to_string(), "Dr.".to_string()),
                ("name".to_string(), "Okafor".to_string()),
            ],
            ..AvtRequest::default()
        };
        let output = render_avt(&request).unwrap();
        assert_eq!(output.value, "Dear Dr. Okafor");
        assert!(matches!(output.expression, Expression::Concat { .. }));
    }

    #[test]
    fn test_render_without_context_fails() {
        let request = AvtRequest {
            template: "{@id}".to_string(),
            line: 1,
            ..AvtRequest::default()
        };
        assert!(matches!(render_avt(&request), Err(CliError::XPath(_))));
    }
}
