//! Collation factory and collators.
//!
//! [`make_collation`] turns a collation URI and its property set into a
//! [`Collation`]. The base collator comes from, in order of precedence, a
//! host-registered `class`, tailoring `rules`, or the `lang` locale (falling
//! back to the configured default locale). Strength and normalization
//! properties then tune that base, and the case-order and alphanumeric
//! adapters wrap it.
//!
//! ```ignore
//! let props = HashMap::from([("lang".into(), "sv".into()), ("strength".into(), "primary".into())]);
//! let collation = make_collation(&Configuration::default(), uri, &props)?;
//! collation.sort(&mut words);
//! ```

pub mod adapters;
pub mod elements;
pub mod error;
pub mod locale;
pub mod normalize;
pub mod properties;
pub mod rules;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{ClassInstance, Configuration};

pub use adapters::{AlphanumericCollator, CaseOrderCollator, FnCollator};
pub use error::CollationError;
pub use locale::{LocaleCollator, Tailoring};
pub use properties::{CaseOrder, CollationProperties, Decomposition, Locale, Strength};
pub use rules::RuleBasedCollator;

pub const CODEPOINT_COLLATION_URI: &str =
    "http://www.w3.org/2005/xpath-functions/collation/codepoint";

/// Base URI of collations described entirely by their query parameters.
pub const UCA_COLLATION_URI: &str = "http://www.w3.org/2013/collation/UCA";

/// Compares two strings.
pub trait StringCollator: Send + Sync + fmt::Debug {
    fn compare(&self, a: &str, b: &str) -> Ordering;

    fn equals(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

/// Unicode code point order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodepointCollator;

impl StringCollator for CodepointCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        // UTF-8 byte order is code point order.
        a.cmp(b)
    }
}

/// The collators whose strength and decomposition can be adjusted.
#[derive(Debug, Clone)]
pub enum TailoredCollator {
    Locale(LocaleCollator),
    Rules(RuleBasedCollator),
}

impl TailoredCollator {
    pub fn tailoring(&self) -> &dyn Tailoring {
        match self {
            TailoredCollator::Locale(c) => c,
            TailoredCollator::Rules(c) => c,
        }
    }

    pub fn tailoring_mut(&mut self) -> &mut dyn Tailoring {
        match self {
            TailoredCollator::Locale(c) => c,
            TailoredCollator::Rules(c) => c,
        }
    }

    pub fn locale(&self) -> Option<&Locale> {
        match self {
            TailoredCollator::Locale(c) => Some(c.locale()),
            TailoredCollator::Rules(_) => None,
        }
    }
}

impl StringCollator for TailoredCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            TailoredCollator::Locale(c) => c.compare(a, b),
            TailoredCollator::Rules(c) => c.compare(a, b),
        }
    }
}

/// A configured collation.
///
/// `strength`, `decomposition` and `locale` describe the tailorable base
/// collator; they are `None` when the base came from a custom class.
#[derive(Debug, Clone)]
pub struct Collation {
    uri: String,
    collator: Arc<dyn StringCollator>,
    strength: Option<Strength>,
    decomposition: Option<Decomposition>,
    locale: Option<Locale>,
}

impl Collation {
    pub fn new(uri: impl Into<String>, collator: Arc<dyn StringCollator>) -> Self {
        Self {
            uri: uri.into(),
            collator,
            strength: None,
            decomposition: None,
            locale: None,
        }
    }

    pub fn codepoint() -> Self {
        Self::new(CODEPOINT_COLLATION_URI, Arc::new(CodepointCollator))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn collator(&self) -> &Arc<dyn StringCollator> {
        &self.collator
    }

    pub fn strength(&self) -> Option<Strength> {
        self.strength
    }

    pub fn decomposition(&self) -> Option<Decomposition> {
        self.decomposition
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn sort(&self, strings: &mut [String]) {
        sort_strings(self, strings);
    }
}

impl StringCollator for Collation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

/// Stable sort with the given collator.
pub fn sort_strings(collator: &dyn StringCollator, strings: &mut [String]) {
    strings.sort_by(|a, b| collator.compare(a, b));
}

/// Builds a collation from a raw property map.
pub fn make_collation(
    config: &Configuration,
    uri: &str,
    properties: &HashMap<String, String>,
) -> Result<Collation, CollationError> {
    let props = CollationProperties::from_map(properties)?;
    make_collation_from(config, uri, &props)
}

enum Base {
    Tailored(TailoredCollator),
    Custom(Arc<dyn StringCollator>),
}

fn resolve_base(config: &Configuration, props: &CollationProperties) -> Result<Base, CollationError> {
    if let Some(class) = &props.class {
        return match config.instantiate(class)? {
            ClassInstance::Collator(c) => Ok(Base::Tailored(c)),
            ClassInstance::NamedCollation(c) => Ok(Base::Custom(c)),
            ClassInstance::Comparator(f) => Ok(Base::Custom(Arc::new(FnCollator::new(class, f)))),
            ClassInstance::Other(_) => Err(CollationError::NotAComparator(class.clone())),
        };
    }
    if let Some(rules) = &props.rules {
        return Ok(Base::Tailored(TailoredCollator::Rules(
            RuleBasedCollator::new(rules)?,
        )));
    }
    let locale = props
        .lang
        .clone()
        .unwrap_or_else(|| config.default_locale().clone());
    Ok(Base::Tailored(TailoredCollator::Locale(LocaleCollator::new(
        locale,
    ))))
}

/// Builds a collation from validated properties.
pub fn make_collation_from(
    config: &Configuration,
    uri: &str,
    props: &CollationProperties,
) -> Result<Collation, CollationError> {
    let base = resolve_base(config, props)?;

    let mut collation = match base {
        Base::Tailored(mut tailored) => {
            let t = tailored.tailoring_mut();
            match props.strength {
                Some(strength) => t.set_strength(strength),
                None => {
                    if props.ignore_width == Some(true) {
                        t.set_strength(Strength::Tertiary);
                    }
                    if props.ignore_case == Some(true) {
                        t.set_strength(Strength::Secondary);
                    }
                    if props.ignore_modifiers == Some(true) {
                        t.set_strength(Strength::Primary);
                    }
                }
            }
            if let Some(decomposition) = props.decomposition {
                t.set_decomposition(decomposition);
            }
            if props.case_order.is_some() {
                t.set_strength(Strength::Secondary);
            }
            let t = tailored.tailoring();
            Collation {
                uri: uri.to_string(),
                strength: Some(t.strength()),
                decomposition: Some(t.decomposition()),
                locale: tailored.locale().cloned(),
                collator: Arc::new(tailored),
            }
        }
        Base::Custom(collator) => Collation::new(uri, collator),
    };

    if let Some(order) = props.case_order {
        collation.collator = Arc::new(CaseOrderCollator::new(collation.collator, order));
    }
    if props.alphanumeric == Some(true) {
        collation.collator = Arc::new(AlphanumericCollator::new(collation.collator));
    }

    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "built collation {} from {} (strength {:?}, locale {:?})",
            uri,
            props.to_json()?,
            collation.strength,
            collation.locale.as_ref().map(Locale::to_string)
        );
    }
    Ok(collation)
}

/// Collations known by URI.
///
/// The codepoint collation is always registered. URIs under
/// [`UCA_COLLATION_URI`] that are not registered are built on demand from
/// their query parameters.
#[derive(Debug, Clone)]
pub struct CollatorRegistry {
    collations: HashMap<String, Collation>,
    default: Collation,
}

impl Default for CollatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CollatorRegistry {
    pub fn new() -> Self {
        let codepoint = Collation::codepoint();
        let mut collations = HashMap::new();
        collations.insert(CODEPOINT_COLLATION_URI.to_string(), codepoint.clone());
        Self {
            collations,
            default: codepoint,
        }
    }

    pub fn register(&mut self, collation: Collation) {
        log::debug!("registering collation {}", collation.uri());
        self.collations.insert(collation.uri().to_string(), collation);
    }

    pub fn get(&self, uri: &str) -> Option<&Collation> {
        self.collations.get(uri)
    }

    pub fn default_collation(&self) -> &Collation {
        &self.default
    }

    pub fn set_default(&mut self, uri: &str) -> Result<(), CollationError> {
        let collation = self
            .get(uri)
            .cloned()
            .ok_or_else(|| CollationError::UnknownCollation(uri.to_string()))?;
        self.default = collation;
        Ok(())
    }

    pub fn resolve(&self, config: &Configuration, uri: &str) -> Result<Collation, CollationError> {
        if let Some(collation) = self.get(uri) {
            return Ok(collation.clone());
        }
        let (base, props) = CollationProperties::from_uri(uri)?;
        if base != UCA_COLLATION_URI {
            return Err(CollationError::UnknownCollation(uri.to_string()));
        }
        make_collation_from(config, uri, &props)
    }
}
