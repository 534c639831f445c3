use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tessera::{AvtRequest, CliError, SortRequest, parse_pair, render_avt, sort_words};
use tessera_xslt3::Configuration;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(version, about = "Compile attribute value templates and sort with collations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile an attribute value template, print its tree and its value
    Avt {
        /// Template text, e.g. "Hello {$name}"
        template: String,

        /// String variable as name=value (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// JSON file to use as the context document
        #[arg(long)]
        data: Option<PathBuf>,

        /// Element name for the root of the JSON document
        #[arg(long, default_value = "data")]
        root: String,

        /// Line number reported in diagnostics
        #[arg(long, default_value_t = 1)]
        line: usize,

        /// XPath 1.0 compatibility: placeholders use only their first item
        #[arg(long, default_value_t = false)]
        backwards_compatible: bool,
    },

    /// Sort words with a collation
    Sort {
        /// Words to sort
        #[arg(required = true)]
        words: Vec<String>,

        /// Collation URI, e.g. http://www.w3.org/2013/collation/UCA?lang=de;strength=primary
        #[arg(long, conflicts_with_all = ["lang", "strength", "prop"])]
        collation: Option<String>,

        /// Language tag such as en or sv-SE
        #[arg(long)]
        lang: Option<String>,

        /// primary, secondary, tertiary or identical
        #[arg(long)]
        strength: Option<String>,

        /// Any other collation property as name=value (repeatable)
        #[arg(long = "prop", value_name = "NAME=VALUE")]
        prop: Vec<String>,
    },
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Avt {
            template,
            vars,
            data,
            root,
            line,
            backwards_compatible,
        } => {
            let variables = vars
                .iter()
                .map(|v| parse_pair(v))
                .collect::<Result<Vec<_>, _>>()?;
            let data = match data {
                Some(path) => {
                    log::info!("Loading data from {}", path.display());
                    let json = serde_json::from_str(&fs::read_to_string(&path)?)?;
                    Some((root, json))
                }
                None => None,
            };
            let output = render_avt(&AvtRequest {
                template,
                line,
                variables,
                data,
                backwards_compatible,
            })?;
            println!("{:#?}", output.expression);
            println!("{}", output.value);
        }
        Commands::Sort {
            words,
            collation,
            lang,
            strength,
            prop,
        } => {
            let mut properties: HashMap<String, String> = prop
                .iter()
                .map(|p| parse_pair(p))
                .collect::<Result<_, _>>()?;
            if let Some(lang) = lang {
                properties.insert("lang".to_string(), lang);
            }
            if let Some(strength) = strength {
                properties.insert("strength".to_string(), strength);
            }
            let request = SortRequest {
                collation_uri: collation,
                properties,
                words,
            };
            for word in sort_words(&Configuration::from_env(), &request)? {
                println!("{}", word);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tessera::logger_from_env(env_logger::Env::default()).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
