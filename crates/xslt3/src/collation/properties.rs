//! Typed collation properties.
//!
//! Properties arrive as string pairs (from a collation URI query or a
//! property map). They are validated once, here, against closed enums; the
//! factory then only sees well-formed values.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CollationError;

/// Comparison granularity, from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    /// Base letters only.
    Primary,
    /// Base letters and accents.
    Secondary,
    /// Base letters, accents and case.
    Tertiary,
    /// Every difference, including width and canonical form.
    Identical,
}

impl FromStr for Strength {
    type Err = CollationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Strength::Primary),
            "secondary" => Ok(Strength::Secondary),
            "tertiary" => Ok(Strength::Tertiary),
            "identical" => Ok(Strength::Identical),
            _ => Err(CollationError::invalid_property("strength", s)),
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Primary => "primary",
            Strength::Secondary => "secondary",
            Strength::Tertiary => "tertiary",
            Strength::Identical => "identical",
        })
    }
}

/// How input is normalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Decomposition {
    /// Text is compared as given.
    None,
    /// Canonical decomposition: precomposed letters equal their combining sequences.
    #[default]
    Standard,
    /// Canonical plus compatibility decomposition (ligatures, full-width forms).
    Full,
}

impl FromStr for Decomposition {
    type Err = CollationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Decomposition::None),
            "standard" => Ok(Decomposition::Standard),
            "full" => Ok(Decomposition::Full),
            _ => Err(CollationError::invalid_property("decomposition", s)),
        }
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decomposition::None => "none",
            Decomposition::Standard => "standard",
            Decomposition::Full => "full",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseOrder {
    UpperFirst,
    LowerFirst,
}

impl fmt::Display for CaseOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaseOrder::UpperFirst => "upper-first",
            CaseOrder::LowerFirst => "lower-first",
        })
    }
}

/// A language tag split on its first hyphen, e.g. `en-GB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    pub language: String,
    pub region: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            language: language.into(),
            region: region.map(str::to_string),
        }
    }

    /// Splits a tag such as `en` or `en-GB` at its first hyphen. Anything
    /// after that hyphen, including further subtags, is the region.
    pub fn parse(tag: &str) -> Self {
        match tag.split_once('-') {
            Some((language, region)) => Self::new(language, Some(region)),
            None => Self::new(tag, None),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", None)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

/// The recognized collation properties, each optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollationProperties {
    /// Name of a host-registered comparator; takes precedence over everything else.
    pub class: Option<String>,
    /// Tailoring rules in `& a < b ; c , d = e` syntax.
    pub rules: Option<String>,
    pub lang: Option<Locale>,
    pub strength: Option<Strength>,
    pub ignore_width: Option<bool>,
    pub ignore_case: Option<bool>,
    pub ignore_modifiers: Option<bool>,
    pub decomposition: Option<Decomposition>,
    /// `None` also covers an explicit `#default`.
    pub case_order: Option<CaseOrder>,
    pub alphanumeric: Option<bool>,
}

impl CollationProperties {
    /// Validates a property map. Unrecognized keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CollationError> {
        Self::from_pairs(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, CollationError> {
        let mut props = Self::default();
        for (key, value) in pairs {
            match key {
                "class" => props.class = Some(value.to_string()),
                "rules" => props.rules = Some(value.to_string()),
                "lang" => props.lang = Some(Locale::parse(value)),
                "strength" => props.strength = Some(value.parse()?),
                "ignore-width" => props.ignore_width = Some(yes_no(key, value)?),
                "ignore-case" => props.ignore_case = Some(yes_no(key, value)?),
                "ignore-modifiers" => props.ignore_modifiers = Some(yes_no(key, value)?),
                "decomposition" => props.decomposition = Some(value.parse()?),
                "case-order" => {
                    props.case_order = match value {
                        "upper-first" => Some(CaseOrder::UpperFirst),
                        "lower-first" => Some(CaseOrder::LowerFirst),
                        "#default" => None,
                        _ => return Err(CollationError::invalid_property(key, value)),
                    }
                }
                "alphanumeric" => props.alphanumeric = Some(yes_no(key, value)?),
                _ => log::debug!("ignoring unrecognized collation property '{}'", key),
            }
        }
        Ok(props)
    }

    /// Reads properties from a JSON object of string values, e.g.
    /// `{"lang": "de", "strength": "primary"}`.
    pub fn from_json(json: &str) -> Result<Self, CollationError> {
        let raw: RawProperties = serde_json::from_str(json)?;
        for key in raw.unrecognized.keys() {
            log::debug!("ignoring unrecognized collation property '{}'", key);
        }
        Self::from_pairs(raw.pairs())
    }

    /// Writes the properties that are set as a JSON object of string values.
    pub fn to_json(&self) -> Result<String, CollationError> {
        Ok(serde_json::to_string(&RawProperties::from(self))?)
    }

    /// Splits a collation URI into its base and the properties in its query
    /// part, e.g. `http://www.w3.org/2013/collation/UCA?lang=de;strength=primary`.
    pub fn from_uri(uri: &str) -> Result<(String, Self), CollationError> {
        let Some((base, query)) = uri.split_once('?') else {
            return Ok((uri.to_string(), Self::default()));
        };
        let mut pairs = Vec::new();
        for param in query.split([';', '&']).filter(|p| !p.is_empty()) {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| CollationError::invalid_property(param, ""))?;
            pairs.push((key, value));
        }
        Ok((base.to_string(), Self::from_pairs(pairs)?))
    }
}

/// Property values as spelled in a collation URI. Validation happens in
/// [`CollationProperties::from_pairs`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strength: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_modifiers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decomposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    case_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alphanumeric: Option<String>,
    #[serde(flatten)]
    unrecognized: HashMap<String, serde_json::Value>,
}

impl RawProperties {
    fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        let fields: [(&str, &Option<String>); 10] = [
            ("class", &self.class),
            ("rules", &self.rules),
            ("lang", &self.lang),
            ("strength", &self.strength),
            ("ignore-width", &self.ignore_width),
            ("ignore-case", &self.ignore_case),
            ("ignore-modifiers", &self.ignore_modifiers),
            ("decomposition", &self.decomposition),
            ("case-order", &self.case_order),
            ("alphanumeric", &self.alphanumeric),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
    }
}

impl From<&CollationProperties> for RawProperties {
    fn from(props: &CollationProperties) -> Self {
        let yes_no = |flag: Option<bool>| flag.map(|f| if f { "yes" } else { "no" }.to_string());
        Self {
            class: props.class.clone(),
            rules: props.rules.clone(),
            lang: props.lang.as_ref().map(Locale::to_string),
            strength: props.strength.map(|s| s.to_string()),
            ignore_width: yes_no(props.ignore_width),
            ignore_case: yes_no(props.ignore_case),
            ignore_modifiers: yes_no(props.ignore_modifiers),
            decomposition: props.decomposition.map(|d| d.to_string()),
            case_order: props.case_order.map(|c| c.to_string()),
            alphanumeric: yes_no(props.alphanumeric),
            unrecognized: HashMap::new(),
        }
    }
}

fn yes_no(name: &str, value: &str) -> Result<bool, CollationError> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(CollationError::invalid_property(name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parses_all_properties() {
        let props = CollationProperties::from_map(&map(&[
            ("lang", "en-GB"),
            ("strength", "primary"),
            ("ignore-case", "yes"),
            ("decomposition", "full"),
            ("case-order", "upper-first"),
            ("alphanumeric", "no"),
        ]))
        .unwrap();
        assert_eq!(props.lang, Some(Locale::new("en", Some("GB"))));
        assert_eq!(props.strength, Some(Strength::Primary));
        assert_eq!(props.ignore_case, Some(true));
        assert_eq!(props.decomposition, Some(Decomposition::Full));
        assert_eq!(props.case_order, Some(CaseOrder::UpperFirst));
        assert_eq!(props.alphanumeric, Some(false));
    }

    #[test]
    fn test_rejects_bad_values() {
        for (key, value) in [
            ("strength", "quaternary"),
            ("ignore-width", "true"),
            ("ignore-case", "maybe"),
            ("ignore-modifiers", ""),
            ("decomposition", "canonical"),
            ("case-order", "mixed"),
            ("alphanumeric", "1"),
        ] {
            let err = CollationProperties::from_map(&map(&[(key, value)])).unwrap_err();
            assert_eq!(
                err,
                CollationError::InvalidProperty {
                    name: key.to_string(),
                    value: value.to_string()
                }
            );
        }
    }

    #[test]
    fn test_default_case_order_is_unset() {
        let props = CollationProperties::from_map(&map(&[("case-order", "#default")])).unwrap();
        assert_eq!(props.case_order, None);
    }

    #[test]
    fn test_from_uri() {
        let (base, props) = CollationProperties::from_uri(
            "http://www.w3.org/2013/collation/UCA?lang=de;strength=secondary",
        )
        .unwrap();
        assert_eq!(base, "http://www.w3.org/2013/collation/UCA");
        assert_eq!(props.lang, Some(Locale::new("de", None)));
        assert_eq!(props.strength, Some(Strength::Secondary));
    }

    #[test]
    fn test_from_json() {
        let props = CollationProperties::from_json(r#"{"lang": "fr", "ignore-width": "yes"}"#).unwrap();
        assert_eq!(props.lang, Some(Locale::new("fr", None)));
        assert_eq!(props.ignore_width, Some(true));
        assert!(matches!(
            CollationProperties::from_json("[1, 2]"),
            Err(CollationError::Json(_))
        ));
    }

    #[test]
    fn test_json_values_are_validated() {
        let err = CollationProperties::from_json(r#"{"strength": "quaternary"}"#).unwrap_err();
        assert_eq!(err, CollationError::invalid_property("strength", "quaternary"));

        let err = CollationProperties::from_json(r#"{"ignore-case": "true"}"#).unwrap_err();
        assert_eq!(err, CollationError::invalid_property("ignore-case", "true"));

        let props =
            CollationProperties::from_json(r##"{"case-order": "#default", "colour": 3}"##).unwrap();
        assert_eq!(props, CollationProperties::default());

        assert!(matches!(
            CollationProperties::from_json(r#"{"strength": 1}"#),
            Err(CollationError::Json(_))
        ));
    }

    #[test]
    fn test_to_json_writes_set_properties() {
        let props = CollationProperties::from_map(&map(&[
            ("lang", "sv-SE"),
            ("strength", "tertiary"),
            ("alphanumeric", "yes"),
            ("case-order", "lower-first"),
        ]))
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&props.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lang": "sv-SE",
                "strength": "tertiary",
                "alphanumeric": "yes",
                "case-order": "lower-first"
            })
        );
        assert_eq!(CollationProperties::default().to_json().unwrap(), "{}");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!(Locale::parse("en-GB"), Locale::new("en", Some("GB")));
        assert_eq!(Locale::parse("pt-BR-x-y").region.as_deref(), Some("BR-x-y"));
        assert_eq!(Locale::parse("sv").to_string(), "sv");
    }

    #[test]
    fn test_lang_splits_on_hyphen_only() {
        let props = CollationProperties::from_map(&map(&[("lang", "en_US")])).unwrap();
        assert_eq!(props.lang, Some(Locale::new("en_US", None)));

        let props = CollationProperties::from_map(&map(&[("lang", "de-CH.x")])).unwrap();
        assert_eq!(props.lang, Some(Locale::new("de", Some("CH.x"))));
    }

    #[test]
    fn test_strength_order() {
        assert!(Strength::Primary < Strength::Secondary);
        assert!(Strength::Tertiary < Strength::Identical);
    }
}
