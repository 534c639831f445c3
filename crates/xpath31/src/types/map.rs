use super::{AtomicValue, XdmValue};
use indexmap::IndexMap;

/// An immutable map keyed by atomic values, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XdmMap {
    entries: IndexMap<AtomicValue, XdmValue>,
}

impl XdmMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(AtomicValue, XdmValue)>) -> Self {
        let mut map = Self {
            entries: IndexMap::with_capacity(entries.len()),
        };
        for (key, value) in entries {
            map.entries.insert(key, value);
        }
        map
    }

    pub fn get(&self, key: &AtomicValue) -> Option<&XdmValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &AtomicValue) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &AtomicValue> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &XdmValue> {
        self.entries.values()
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_keys_are_unified() {
        let map = XdmMap::from_entries(vec![(
            AtomicValue::Integer(1),
            XdmValue::from_string("one"),
        )]);
        assert!(map.contains_key(&AtomicValue::Double(1.0)));
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn test_later_entries_win() {
        let map = XdmMap::from_entries(vec![
            (AtomicValue::from("a"), XdmValue::from_integer(1)),
            (AtomicValue::from("a"), XdmValue::from_integer(2)),
        ]);
        assert_eq!(map.size(), 1);
        assert_eq!(
            map.get(&AtomicValue::from("a")),
            Some(&XdmValue::from_integer(2))
        );
    }
}
