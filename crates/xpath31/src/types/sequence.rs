use super::{AtomicValue, Node, XdmMap};
use crate::error::XPath31Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum XdmItem {
    Node(Node),
    Atomic(AtomicValue),
    Map(XdmMap),
}

impl XdmItem {
    pub fn is_node(&self) -> bool {
        matches!(self, XdmItem::Node(_))
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, XdmItem::Atomic(_))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            XdmItem::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_atomic(&self) -> Option<&AtomicValue> {
        match self {
            XdmItem::Atomic(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&XdmMap> {
        match self {
            XdmItem::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            XdmItem::Node(_) => "node()",
            XdmItem::Atomic(a) => a.type_name(),
            XdmItem::Map(_) => "map(*)",
        }
    }

    pub fn string_value(&self) -> Result<String, XPath31Error> {
        match self {
            XdmItem::Node(n) => Ok(n.string_value()),
            XdmItem::Atomic(a) => Ok(a.to_string_value()),
            XdmItem::Map(_) => Err(XPath31Error::Static {
                code: "FOTY0014",
                message: "a map has no string value".to_string(),
            }),
        }
    }

    pub fn atomize(&self) -> Result<AtomicValue, XPath31Error> {
        match self {
            XdmItem::Node(n) => Ok(n.typed_value()),
            XdmItem::Atomic(a) => Ok(a.clone()),
            XdmItem::Map(_) => Err(XPath31Error::Static {
                code: "FOTY0013",
                message: "a map cannot be atomized".to_string(),
            }),
        }
    }
}

/// A sequence of items; a single item is a sequence of length one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XdmValue(Vec<XdmItem>);

impl XdmValue {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_item(item: XdmItem) -> Self {
        Self(vec![item])
    }

    pub fn from_items(items: Vec<XdmItem>) -> Self {
        Self(items)
    }

    pub fn from_atomic(value: AtomicValue) -> Self {
        Self::from_item(XdmItem::Atomic(value))
    }

    pub fn from_atomics(values: Vec<AtomicValue>) -> Self {
        Self(values.into_iter().map(XdmItem::Atomic).collect())
    }

    pub fn from_node(node: Node) -> Self {
        Self::from_item(XdmItem::Node(node))
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self(nodes.into_iter().map(XdmItem::Node).collect())
    }

    pub fn from_map(map: XdmMap) -> Self {
        Self::from_item(XdmItem::Map(map))
    }

    pub fn from_bool(b: bool) -> Self {
        Self::from_atomic(AtomicValue::Boolean(b))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self::from_atomic(AtomicValue::String(s.into()))
    }

    pub fn from_integer(i: i64) -> Self {
        Self::from_atomic(AtomicValue::Integer(i))
    }

    pub fn from_double(d: f64) -> Self {
        Self::from_atomic(AtomicValue::Double(d))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn items(&self) -> &[XdmItem] {
        &self.0
    }

    pub fn into_items(self) -> Vec<XdmItem> {
        self.0
    }

    pub fn first(&self) -> Option<&XdmItem> {
        self.0.first()
    }

    pub fn single(&self) -> Option<&XdmItem> {
        match self.0.as_slice() {
            [item] => Some(item),
            _ => None,
        }
    }

    pub fn concat(mut self, other: XdmValue) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn effective_boolean_value(&self) -> Result<bool, XPath31Error> {
        match self.0.as_slice() {
            [] => Ok(false),
            [XdmItem::Node(_), ..] => Ok(true),
            [XdmItem::Atomic(a)] => Ok(a.to_boolean()),
            _ => Err(XPath31Error::Static {
                code: "FORG0006",
                message: format!(
                    "effective boolean value is not defined for a sequence starting with {}",
                    self.0[0].type_name()
                ),
            }),
        }
    }

    pub fn atomize(&self) -> Result<Vec<AtomicValue>, XPath31Error> {
        self.0.iter().map(XdmItem::atomize).collect()
    }

    /// The string value of a singleton, or the empty string for `()`.
    pub fn to_string_value(&self) -> Result<String, XPath31Error> {
        match self.0.as_slice() {
            [] => Ok(String::new()),
            [item] => item.string_value(),
            _ => Err(XPath31Error::type_error(format!(
                "a sequence of {} items cannot be converted to a single string",
                self.len()
            ))),
        }
    }

    pub fn to_nodes(&self) -> Vec<Node> {
        self.0
            .iter()
            .filter_map(|item| item.as_node().cloned())
            .collect()
    }
}

impl fmt::Display for XdmValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |item: &XdmItem| match item {
            XdmItem::Atomic(a) => format!("{:?}", a.to_string_value()),
            XdmItem::Node(n) => format!("<{}>", n.name().unwrap_or("#node")),
            XdmItem::Map(m) => format!("map{{{} entries}}", m.size()),
        };
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [item] => write!(f, "{}", render(item)),
            items => {
                let parts: Vec<String> = items.iter().map(render).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

impl From<AtomicValue> for XdmValue {
    fn from(v: AtomicValue) -> Self {
        Self::from_atomic(v)
    }
}

impl From<bool> for XdmValue {
    fn from(b: bool) -> Self {
        Self::from_bool(b)
    }
}

impl From<i64> for XdmValue {
    fn from(i: i64) -> Self {
        Self::from_integer(i)
    }
}

impl From<f64> for XdmValue {
    fn from(d: f64) -> Self {
        Self::from_double(d)
    }
}

impl From<String> for XdmValue {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl From<&str> for XdmValue {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}
