use thiserror::Error;

use crate::collation::CollationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Xslt3Error {
    #[error("{code}: {message} (line {line})")]
    TemplateSyntax {
        code: &'static str,
        message: String,
        line: usize,
    },

    #[error("XPath error: {0}")]
    XPath(#[from] tessera_xpath31::XPath31Error),

    #[error("Collation error: {0}")]
    Collation(#[from] CollationError),
}

impl Xslt3Error {
    /// A closing brace in an attribute value template that is not doubled.
    pub fn unmatched_close_brace(template: &str, line: usize) -> Self {
        Self::TemplateSyntax {
            code: "XT0360",
            message: format!("Closing curly brace in attribute value template \"{template}\" must be doubled"),
            line,
        }
    }

    /// The error code callers report. Collation errors carry no code.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::TemplateSyntax { code, .. } => Some(*code),
            Self::XPath(e) => Some(e.code()),
            Self::Collation(_) => None,
        }
    }
}
