use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollationError {
    #[error("No collator class registered under '{0}'")]
    UnknownClass(String),

    #[error("Class '{0}' is not a collator, named collation or string comparator")]
    NotAComparator(String),

    #[error("Invalid collation rules at offset {offset}: {message}")]
    InvalidRules { offset: usize, message: String },

    #[error("Invalid value '{value}' for collation property '{name}'")]
    InvalidProperty { name: String, value: String },

    #[error("Unknown collation URI '{0}'")]
    UnknownCollation(String),

    #[error("Invalid collation properties: {0}")]
    Json(String),
}

impl CollationError {
    pub fn invalid_property(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidProperty {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn invalid_rules(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidRules {
            offset,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CollationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
