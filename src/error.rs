use tessera_xpath31::XPath31Error;
use tessera_xslt3::{CollationError, Xslt3Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Xslt(#[from] Xslt3Error),

    #[error("Evaluation error [{code}]: {0}", code = .0.code())]
    XPath(#[from] XPath31Error),

    #[error("Collation error: {0}")]
    Collation(#[from] CollationError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument '{0}': expected name=value")]
    InvalidArgument(String),
}
