//! Compile-time environment for building expression trees.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::StaticType;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
pub const FN_NAMESPACE: &str = "http://www.w3.org/2005/xpath-functions";
pub const MAP_NAMESPACE: &str = "http://www.w3.org/2005/xpath-functions/map";

/// Identifies an entry in a [`LocationMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub system_id: Option<String>,
    pub line: usize,
}

/// Allocates location ids for diagnostics.
///
/// Shared between the contexts of one compilation; the only piece of the
/// static context that changes while trees are built.
#[derive(Debug, Default)]
pub struct LocationMap {
    entries: Mutex<Vec<SourceLocation>>,
}

impl LocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self, system_id: Option<&str>, line: usize) -> LocationId {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(SourceLocation {
            system_id: system_id.map(str::to_string),
            line,
        });
        LocationId((entries.len() - 1) as u32)
    }

    pub fn get(&self, id: LocationId) -> Option<SourceLocation> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Namespace bindings, declared variable types, the XPath 1.0
/// compatibility flag, the module's system id and the location allocator.
#[derive(Debug, Clone)]
pub struct StaticContext {
    namespaces: IndexMap<String, String>,
    variables: HashMap<String, StaticType>,
    backwards_compatible: bool,
    system_id: Option<String>,
    locations: Arc<LocationMap>,
}

impl Default for StaticContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticContext {
    pub fn new() -> Self {
        let mut namespaces = IndexMap::new();
        namespaces.insert("xml".to_string(), XML_NAMESPACE.to_string());
        namespaces.insert("xs".to_string(), XS_NAMESPACE.to_string());
        namespaces.insert("fn".to_string(), FN_NAMESPACE.to_string());
        namespaces.insert("map".to_string(), MAP_NAMESPACE.to_string());
        Self {
            namespaces,
            variables: HashMap::new(),
            backwards_compatible: false,
            system_id: None,
            locations: Arc::new(LocationMap::new()),
        }
    }

    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, declared: StaticType) -> Self {
        self.variables.insert(name.into(), declared);
        self
    }

    pub fn with_backwards_compatible(mut self, enabled: bool) -> Self {
        self.backwards_compatible = enabled;
        self
    }

    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    /// Shares a location allocator with other contexts of the same compilation.
    pub fn with_locations(mut self, locations: Arc<LocationMap>) -> Self {
        self.locations = locations;
        self
    }

    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn variable_type(&self, name: &str) -> Option<&StaticType> {
        self.variables.get(name)
    }

    pub fn is_backwards_compatible(&self) -> bool {
        self.backwards_compatible
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }

    pub fn locations(&self) -> &Arc<LocationMap> {
        &self.locations
    }

    pub fn allocate_location(&self, line: usize) -> LocationId {
        self.locations.allocate(self.system_id(), line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predeclared_prefixes() {
        let ctx = StaticContext::new();
        assert_eq!(ctx.namespace_uri("xs"), Some(XS_NAMESPACE));
        assert_eq!(ctx.namespace_uri("fn"), Some(FN_NAMESPACE));
        assert_eq!(ctx.namespace_uri("ex"), None);
    }

    #[test]
    fn test_locations_are_shared_between_clones() {
        let ctx = StaticContext::new().with_system_id("file:///a.xsl");
        let other = ctx.clone();
        let first = ctx.allocate_location(3);
        let second = other.allocate_location(9);
        assert_ne!(first, second);
        assert_eq!(ctx.locations().len(), 2);
        let loc = ctx.locations().get(second).unwrap();
        assert_eq!(loc.line, 9);
        assert_eq!(loc.system_id.as_deref(), Some("file:///a.xsl"));
    }
}
