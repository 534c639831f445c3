//! XPath expression parser, static typing and evaluator.
//!
//! The parser can stop at an embedded delimiter (the `}` closing an attribute
//! value template placeholder) and report where it stopped, so host languages
//! can embed expressions in their own string syntax.
//!
//! # Key Types
//!
//! - [`Expression`]: parsed expression tree, including the conversion wrapper
//!   nodes used when expressions are embedded in templates
//! - [`ExpressionParser`] / [`XPathParser`]: parsing with a stop token
//! - [`StaticContext`]: namespaces, variable types, compatibility mode and
//!   source locations
//! - [`XdmValue`]: the value of an expression
//!
//! # Example
//!
//! ```ignore
//! use tessera_xpath31::{parse_expression, evaluate, EvaluationContext};
//!
//! let expr = parse_expression("for $i in 1 to 5 return $i * 2")?;
//! let ctx = EvaluationContext::new(None, None, &variables);
//! let result = evaluate(&expr, &ctx, &HashMap::new())?;
//! ```

pub mod analysis;
pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
pub mod parser;
pub mod simplify;
pub mod types;

pub use analysis::static_type;
pub use ast::{Expression, Literal, LookupKey, QName};
pub use context::{LocationId, LocationMap, SourceLocation, StaticContext};
pub use engine::{EvaluationContext, evaluate};
pub use error::XPath31Error;
pub use parser::{ExpressionParser, TokenKind, XPathParser, parse_expression};
pub use types::{
    AtomicValue, Cardinality, ItemType, Node, NodeKind, StaticType, XdmItem, XdmMap, XdmValue,
};
