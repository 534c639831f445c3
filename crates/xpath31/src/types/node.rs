//! A minimal immutable node tree for evaluating paths and atomization.

use serde_json::Value;
use std::sync::Arc;

use super::AtomicValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
struct NodeData {
    kind: NodeKind,
    name: Option<String>,
    value: String,
    attributes: Vec<Node>,
    children: Vec<Node>,
}

/// A cheaply clonable handle to a node; identity is pointer identity.
#[derive(Debug, Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    fn from_data(data: NodeData) -> Self {
        Node(Arc::new(data))
    }

    pub fn document(children: Vec<Node>) -> Self {
        Self::from_data(NodeData {
            kind: NodeKind::Document,
            name: None,
            value: String::new(),
            attributes: Vec::new(),
            children,
        })
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::from_data(NodeData {
            kind: NodeKind::Element,
            name: Some(name.into()),
            value: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_data(NodeData {
            kind: NodeKind::Attribute,
            name: Some(name.into()),
            value: value.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::from_data(NodeData {
            kind: NodeKind::Text,
            name: None,
            value: value.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.0)
            .attributes
            .push(Node::attribute(name, value));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        Arc::make_mut(&mut self.0).children.push(child);
        self
    }

    pub fn with_text(self, value: impl Into<String>) -> Self {
        self.with_child(Node::text(value))
    }

    /// Builds a document from JSON: object keys become elements, keys starting
    /// with `@` become attributes, arrays repeat their parent element and
    /// scalars become text.
    pub fn from_json(root_name: &str, value: &Value) -> Self {
        Node::document(vec![Self::element_from_json(root_name, value)])
    }

    fn element_from_json(name: &str, value: &Value) -> Self {
        let mut element = Node::element(name);
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if let Some(attr) = key.strip_prefix('@') {
                        element = element.with_attribute(attr, scalar_text(child));
                    } else if let Value::Array(items) = child {
                        for item in items {
                            element = element.with_child(Self::element_from_json(key, item));
                        }
                    } else {
                        element = element.with_child(Self::element_from_json(key, child));
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    element = element.with_child(Self::element_from_json("item", item));
                }
            }
            Value::Null => {}
            scalar => element = element.with_text(scalar_text(scalar)),
        }
        element
    }

    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn local_name(&self) -> Option<&str> {
        self.name()
            .map(|n| n.split_once(':').map_or(n, |(_, local)| local))
    }

    pub fn attributes(&self) -> &[Node] {
        &self.0.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.0.children
    }

    /// All descendants in document order, excluding attributes.
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Node>) {
        for child in self.children() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    pub fn string_value(&self) -> String {
        match self.kind() {
            NodeKind::Attribute | NodeKind::Text => self.0.value.clone(),
            NodeKind::Element | NodeKind::Document => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.children() {
            match child.kind() {
                NodeKind::Text => out.push_str(&child.0.value),
                _ => child.collect_text(out),
            }
        }
    }

    /// Untyped trees atomize to `xs:untypedAtomic`.
    pub fn typed_value(&self) -> AtomicValue {
        AtomicValue::UntypedAtomic(self.string_value())
    }

    pub fn is_same_node(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_node(other)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
