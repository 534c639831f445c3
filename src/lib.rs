//! # tessera
//!
//! Command line front end for the attribute value template compiler and the
//! collation factory.
//!
//! - [`tessera_xpath31`]: expression parser, static typing and evaluator
//! - [`tessera_xslt3`]: attribute value templates and collations

pub mod commands;
pub mod error;

pub use commands::{AvtOutput, AvtRequest, SortRequest, parse_pair, render_avt, sort_words};
pub use error::CliError;
pub use tessera_xpath31 as xpath;
pub use tessera_xslt3 as xslt;

/// Filter applied when the environment sets none.
pub const DEFAULT_LOG_FILTER: &str = "tessera=info";

/// Logger configured from `env`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn logger_from_env(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use log::{Level, Log, Metadata};

    use super::*;

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_default_log_filter() {
        let env = env_logger::Env::new().filter("TESSERA_LOG_FILTER_NEVER_SET");
        let logger = logger_from_env(env).is_test(true).build();
        assert!(enabled(&logger, "tessera::commands", Level::Info));
        assert!(!enabled(&logger, "tessera::commands", Level::Debug));
        assert!(!enabled(&logger, "nom", Level::Info));
    }
}
