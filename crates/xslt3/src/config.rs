//! Host configuration consulted while building collations.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::collation::{CollationError, Locale, StringCollator, TailoredCollator};

/// What a registered class produces when instantiated.
pub enum ClassInstance {
    /// A tailorable collator; strength and decomposition properties apply.
    Collator(TailoredCollator),
    /// A finished collator used as is.
    NamedCollation(Arc<dyn StringCollator>),
    /// A bare comparison function.
    Comparator(Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>),
    /// Anything else; rejected when used as a collation class.
    Other(Box<dyn Any + Send + Sync>),
}

impl fmt::Debug for ClassInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassInstance::Collator(c) => f.debug_tuple("Collator").field(c).finish(),
            ClassInstance::NamedCollation(c) => f.debug_tuple("NamedCollation").field(c).finish(),
            ClassInstance::Comparator(_) => f.write_str("Comparator"),
            ClassInstance::Other(_) => f.write_str("Other"),
        }
    }
}

pub type ClassFactory = Arc<dyn Fn() -> ClassInstance + Send + Sync>;

/// Settings shared by every compilation: the default locale and the classes
/// the host makes available to the collation `class` property.
#[derive(Clone, Default)]
pub struct Configuration {
    /// Locale used when a collation names neither a class, rules nor a language.
    default_locale: Locale,
    classes: HashMap<String, ClassFactory>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        classes.sort_unstable();
        f.debug_struct("Configuration")
            .field("default_locale", &self.default_locale)
            .field("classes", &classes)
            .finish()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the default locale from `LC_ALL` or `LANG`.
    pub fn from_env() -> Self {
        let locale = locale_from(|name| std::env::var(name).ok()).unwrap_or_default();
        log::debug!("default collation locale is {}", locale);
        Self::default().with_default_locale(locale)
    }

    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn register_class(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> ClassInstance + Send + Sync + 'static,
    ) {
        self.classes.insert(name.into(), Arc::new(factory));
    }

    pub fn instantiate(&self, name: &str) -> Result<ClassInstance, CollationError> {
        let factory = self
            .classes
            .get(name)
            .ok_or_else(|| CollationError::UnknownClass(name.to_string()))?;
        Ok(factory())
    }
}

fn locale_from(lookup: impl Fn(&str) -> Option<String>) -> Option<Locale> {
    ["LC_ALL", "LANG"]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|tag| !tag.is_empty() && tag != "C" && tag != "POSIX" && !tag.starts_with("C."))
        .map(|tag| posix_locale(&tag))
}

/// Reads a POSIX locale name such as `en_US.UTF-8` or `de_DE@euro`.
fn posix_locale(name: &str) -> Locale {
    let name = name.split(['.', '@']).next().unwrap_or(name);
    Locale::parse(&name.replacen('_', "-", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_environment() {
        let env = |vars: &'static [(&'static str, &'static str)]| {
            move |name: &str| {
                vars.iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| v.to_string())
            }
        };
        assert_eq!(
            locale_from(env(&[("LANG", "de_DE.UTF-8")])),
            Some(Locale::new("de", Some("DE")))
        );
        assert_eq!(
            locale_from(env(&[("LC_ALL", "nb_NO"), ("LANG", "de_DE")])),
            Some(Locale::new("nb", Some("NO")))
        );
        assert_eq!(
            locale_from(env(&[("LC_ALL", "C"), ("LANG", "fi")])),
            Some(Locale::new("fi", None))
        );
        assert_eq!(locale_from(env(&[("LANG", "C.UTF-8")])), None);
    }

    #[test]
    fn test_posix_locale_names() {
        assert_eq!(posix_locale("en_US.UTF-8"), Locale::new("en", Some("US")));
        assert_eq!(posix_locale("de_DE@euro"), Locale::new("de", Some("DE")));
        assert_eq!(posix_locale("sr_RS.UTF-8@latin"), Locale::new("sr", Some("RS")));
        assert_eq!(posix_locale("ja"), Locale::new("ja", None));
    }

    #[test]
    fn test_instantiate() {
        let mut config = Configuration::new();
        config.register_class("thing", || ClassInstance::Other(Box::new("thing")));
        assert!(matches!(config.instantiate("thing"), Ok(ClassInstance::Other(_))));
        assert!(matches!(
            config.instantiate("nothing"),
            Err(CollationError::UnknownClass(name)) if name == "nothing"
        ));
        assert_eq!(format!("{:?}", config), "Configuration { default_locale: Locale { language: \"en\", region: None }, classes: [\"thing\"] }");
    }
}
