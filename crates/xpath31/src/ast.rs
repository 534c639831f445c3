//! Expression tree types.
//!
//! [`Expression`] covers the XPath grammar subset the parser accepts plus the
//! rewrite nodes the XSLT compiler wraps around parsed expressions
//! ([`Expression::Atomize`], [`Expression::FirstItem`],
//! [`Expression::AtomicToString`], [`Expression::SimpleContent`] and
//! [`Expression::Concat`]).

use rust_decimal::Decimal;
use std::fmt;

use crate::context::LocationId;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(String),
    ContextItem,
    LocationPath(LocationPath),
    FunctionCall {
        name: QName,
        args: Vec<Expression>,
    },
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryMinus(Box<Expression>),
    StringConcat {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    RangeExpr {
        start: Box<Expression>,
        end: Box<Expression>,
    },
    IfExpr {
        condition: Box<Expression>,
        then_expr: Box<Expression>,
        else_expr: Box<Expression>,
    },
    LetExpr {
        bindings: Vec<(String, Box<Expression>)>,
        return_expr: Box<Expression>,
    },
    ForExpr {
        bindings: Vec<(String, Box<Expression>)>,
        return_expr: Box<Expression>,
    },
    Sequence(Vec<Expression>),
    FilterExpr {
        base: Box<Expression>,
        predicates: Vec<Expression>,
    },
    MapConstructor(Vec<MapEntry>),
    LookupExpr {
        base: Box<Expression>,
        key: LookupKey,
    },

    /// Replaces every node in the operand by its typed value.
    Atomize(Box<Expression>),
    /// Keeps the first item of the operand; empty stays empty.
    FirstItem(Box<Expression>),
    /// Converts each atomic value in the operand to `xs:string`.
    AtomicToString(Box<Expression>),
    /// Atomizes the operand and joins the string values with `separator`.
    SimpleContent {
        select: Box<Expression>,
        separator: String,
    },
    /// Concatenates the string values of the parts; tagged with the source
    /// location of the template it came from.
    Concat {
        parts: Vec<Expression>,
        location: LocationId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    IntegerDivide,
    Modulo,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Plus
                | BinaryOperator::Minus
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::IntegerDivide
                | BinaryOperator::Modulo
        )
    }
}

/// A path such as `order/item[1]/@sku`, `/root` or `$doc//name`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    pub start: PathStart,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathStart {
    /// Relative to the context item.
    Context,
    /// The root of the tree containing the context item (`/`).
    Root,
    /// The result of an arbitrary expression, e.g. `$var/name`.
    Expr(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    SelfAxis,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    Name(String),
    Wildcard,
    Text,
    AnyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local_part: String,
}

impl QName {
    pub fn new(local_part: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local_part: local_part.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local_part: local_part.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{}:{}", p, self.local_part),
            None => write!(f, "{}", self.local_part),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupKey {
    Wildcard,
    NCName(String),
    Integer(i64),
    Parenthesized(Box<Expression>),
}

impl Expression {
    pub fn literal_string(s: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(s.into()))
    }

    pub fn literal_integer(i: i64) -> Self {
        Expression::Literal(Literal::Integer(i))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn binary_op(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn atomize(self) -> Self {
        Expression::Atomize(Box::new(self))
    }

    pub fn first_item(self) -> Self {
        Expression::FirstItem(Box::new(self))
    }

    pub fn atomic_to_string(self) -> Self {
        Expression::AtomicToString(Box::new(self))
    }

    pub fn simple_content(self, separator: impl Into<String>) -> Self {
        Expression::SimpleContent {
            select: Box::new(self),
            separator: separator.into(),
        }
    }

    /// Direct subexpressions, including path starts and step predicates.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_) | Expression::Variable(_) | Expression::ContextItem => vec![],
            Expression::LocationPath(path) => {
                let mut out = Vec::new();
                if let PathStart::Expr(start) = &path.start {
                    out.push(start.as_ref());
                }
                for step in &path.steps {
                    out.extend(step.predicates.iter());
                }
                out
            }
            Expression::FunctionCall { args, .. } => args.iter().collect(),
            Expression::BinaryOp { left, right, .. }
            | Expression::StringConcat { left, right }
            | Expression::RangeExpr {
                start: left,
                end: right,
            } => vec![left.as_ref(), right.as_ref()],
            Expression::UnaryMinus(inner)
            | Expression::Atomize(inner)
            | Expression::FirstItem(inner)
            | Expression::AtomicToString(inner)
            | Expression::SimpleContent { select: inner, .. } => vec![inner.as_ref()],
            Expression::IfExpr {
                condition,
                then_expr,
                else_expr,
            } => vec![condition.as_ref(), then_expr.as_ref(), else_expr.as_ref()],
            Expression::LetExpr {
                bindings,
                return_expr,
            }
            | Expression::ForExpr {
                bindings,
                return_expr,
            } => {
                let mut out: Vec<&Expression> = bindings.iter().map(|(_, e)| e.as_ref()).collect();
                out.push(return_expr);
                out
            }
            Expression::Sequence(items) => items.iter().collect(),
            Expression::Concat { parts, .. } => parts.iter().collect(),
            Expression::FilterExpr { base, predicates } => {
                let mut out = vec![base.as_ref()];
                out.extend(predicates.iter());
                out
            }
            Expression::MapConstructor(entries) => entries
                .iter()
                .flat_map(|e| [e.key.as_ref(), e.value.as_ref()])
                .collect(),
            Expression::LookupExpr { base, key } => match key {
                LookupKey::Parenthesized(k) => vec![base.as_ref(), k.as_ref()],
                _ => vec![base.as_ref()],
            },
        }
    }

    /// Returns the string if this is a string literal.
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Expression::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }
}
