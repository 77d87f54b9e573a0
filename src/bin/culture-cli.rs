use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use domain_culture::config::load_config;
use domain_culture::culture::{Resolver, Signals};

#[derive(Parser)]
#[command(name = "culture-cli")]
#[command(about = "Offline checks against a domain-culture configuration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "domain-culture.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the normalized whitelist
    Check,
    /// Resolve a simulated request
    Resolve {
        /// Query parameter, `name=value` (repeatable)
        #[arg(short, long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,

        /// Header, `name=value` (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_pair)]
        header: Vec<(String, String)>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let resolver = Resolver::from_config(&config.culture)?;

    let output = match cli.command {
        Commands::Check => {
            let index = resolver.index();
            let domains: serde_json::Map<String, Value> = index
                .iter()
                .map(|(domain, entry)| Ok((domain.to_string(), serde_json::to_value(entry)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            json!({
                "default": index.default_domain(),
                "white_list": domains,
            })
        }
        Commands::Resolve { query, header } => {
            let mut signals = Signals::new();
            for (name, value) in query {
                signals.insert_query(name, value);
            }
            for (name, value) in header {
                signals.insert_header(name, value);
            }

            let resolution = resolver.classify(&signals);
            json!({
                "tier": resolution.tier,
                "domainCulture": resolution.domain_culture,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
