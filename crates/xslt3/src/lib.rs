//! # tessera-xslt3
//!
//! Compile-time pieces of an XSLT 3.0 processor built on [`tessera_xpath31`].
//!
//! ## Features
//!
//! - **Attribute value templates**: [`compile_avt`] turns `"Hello {$name}"`
//!   into a single expression tree, handling `{{`/`}}` escapes and reporting
//!   `XT0360` for an unmatched `}`
//! - **Backwards compatible coercion**: [`reduce`] wraps a placeholder so it
//!   yields the string value of its first item, adding only the conversions
//!   its static type requires
//! - **Collations**: [`make_collation`] builds a collator from a collation URI
//!   and its properties (`lang`, `strength`, `rules`, `case-order`,
//!   `alphanumeric`, ...), with a [`CollatorRegistry`] for lookups by URI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera_xslt3::compile_avt;
//! use tessera_xpath31::{StaticContext, EvaluationContext, evaluate};
//!
//! let ctx = StaticContext::new();
//! let expr = compile_avt("item-{@id}", 12, &ctx)?;
//! let value = evaluate(&expr, &EvaluationContext::new(Some(item), None, &vars), &HashMap::new())?;
//! ```
//!
//! ## Modules
//!
//! - [`avt`]: attribute value template compiler
//! - [`coercion`]: first-item and atomization rewrite
//! - [`collation`]: collation factory, collators and adapters
//! - [`config`]: default locale and the collator class registry
//! - [`error`]: error types

pub mod avt;
pub mod coercion;
pub mod collation;
pub mod config;
pub mod error;

pub use avt::{compile_avt, compile_avt_with};
pub use coercion::reduce;
pub use collation::{
    CODEPOINT_COLLATION_URI, Collation, CollationError, CollationProperties, CollatorRegistry,
    StringCollator, UCA_COLLATION_URI, make_collation, make_collation_from, sort_strings,
};
pub use config::{ClassInstance, Configuration};
pub use error::Xslt3Error;
