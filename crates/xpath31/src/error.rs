use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPath31Error {
    #[error("XPST0003: syntax error at line {line}, offset {offset} in '{expression}': {message}")]
    Syntax {
        expression: String,
        line: usize,
        offset: usize,
        message: String,
    },

    #[error("{code}: {message}")]
    Static { code: &'static str, message: String },

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Dynamic error: {0}")]
    DynamicError(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Variable '${name}' not found")]
    UnknownVariable { name: String },

    #[error("Key '{key}' not found in map")]
    KeyNotFound { key: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in arithmetic expression")]
    Overflow,

    #[error("Cannot cast {from_type} to {to_type}")]
    InvalidCast { from_type: String, to_type: String },

    #[error("Context item is required but not set")]
    NoContextItem,

    #[error("Implementation limit exceeded: {0}")]
    LimitExceeded(String),
}

impl XPath31Error {
    pub fn syntax(
        expression: impl Into<String>,
        line: usize,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            expression: expression.into(),
            line,
            offset,
            message: message.into(),
        }
    }

    pub fn static_error(code: &'static str, message: impl Into<String>) -> Self {
        Self::Static {
            code,
            message: message.into(),
        }
    }

    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionError {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError(message.into())
    }

    pub fn dynamic_error(message: impl Into<String>) -> Self {
        Self::DynamicError(message.into())
    }

    /// The W3C error code this error reports under.
    pub fn code(&self) -> &str {
        match self {
            Self::Syntax { .. } => "XPST0003",
            Self::Static { code, .. } => code,
            Self::TypeError(_) => "XPTY0004",
            Self::DynamicError(_) => "FORG0001",
            Self::FunctionError { .. } => "XPST0017",
            Self::UnknownVariable { .. } => "XPST0008",
            Self::KeyNotFound { .. } => "FOAY0001",
            Self::DivisionByZero => "FOAR0001",
            Self::Overflow => "FOAR0002",
            Self::InvalidCast { .. } => "FORG0001",
            Self::NoContextItem => "XPDY0002",
            Self::LimitExceeded(_) => "XPDY0130",
        }
    }
}
