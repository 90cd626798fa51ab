//! Fxconv CLI
//!
//! Launcher and command-line front end for the currency converter.
//! stdout carries the answer; logs go to stderr.

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fxconv_client::OpenExchangeRatesClient;
use fxconv_hex::inbound::ScriptFilterRenderer;
use fxconv_hex::{ConversionService, ServiceConfig};
use fxconv_repo::{JsonFileStore, build_store};
use fxconv_types::check_amount;

use config::{Config, Settings};

const EXIT_UNSUPPORTED: i32 = 3;

#[derive(Parser)]
#[command(name = "fxconv")]
#[command(
    author,
    version,
    about = "Launcher and CLI tool to convert currencies using the OpenExchangeRates API",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a natural language query with a launcher result list
    Alfred {
        /// The query, e.g. "10 usd to eur"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Convert an amount and print the result
    Convert {
        /// The amount to convert
        #[arg(value_parser = parse_amount)]
        amount: f64,
        /// Base currency of the conversion
        base: String,
        /// Target currency
        target: String,
    },
    /// List supported currencies
    Currencies {
        /// Only show codes containing this text
        #[arg(long)]
        filter: Option<String>,
    },
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount = s.parse::<f64>().map_err(|e| e.to_string())?;
    check_amount(amount).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if json {
        registry.with(fmt.json()).init();
    } else {
        registry.with(fmt).init();
    }
}

fn build_service(config: &Config) -> ConversionService<OpenExchangeRatesClient, JsonFileStore> {
    let provider = OpenExchangeRatesClient::new(&config.api_key)
        .with_base_url(&config.api_url)
        .with_timeout(config.timeout);
    let service_config = ServiceConfig {
        rates_freshness: config.rates_freshness,
        ..ServiceConfig::default()
    };
    ConversionService::with_config(provider, build_store(&config.cache_dir), service_config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = Config::from_settings(cli.settings)?;
    tracing::debug!(cache_dir = %config.cache_dir.display(), api_url = %config.api_url, "starting");

    let service = build_service(&config);

    match cli.command {
        Commands::Alfred { query } => {
            let text = query.join(" ");
            let renderer = ScriptFilterRenderer::new(&config.icon);
            let list = match service.execute_query(&text).await {
                Ok(response) => renderer.render(&response),
                Err(e) => {
                    tracing::error!(error = %e, query = %text, "query failed");
                    renderer.render_error(&e)
                }
            };
            println!("{}", list.to_json()?);
        }

        Commands::Convert {
            amount,
            base,
            target,
        } => {
            let result = service.convert(amount, &base, &target).await?;
            println!("{}", result.target_amount);
            if !result.is_success() {
                std::process::exit(EXIT_UNSUPPORTED);
            }
        }

        Commands::Currencies { filter } => {
            let table = service.supported_currencies().await?;
            for (code, name) in table.matching(filter.as_deref().unwrap_or_default()) {
                println!("{}\t{}", code, name);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_arguments() {
        let cli = Cli::try_parse_from(["fxconv", "convert", "12.5", "usd", "eur"]).unwrap();
        match cli.command {
            Commands::Convert {
                amount,
                base,
                target,
            } => {
                assert_eq!(amount, 12.5);
                assert_eq!(base, "usd");
                assert_eq!(target, "eur");
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_convert_rejects_non_finite_or_negative_amount() {
        for amount in ["nan", "NaN", "inf", "-inf"] {
            let parsed = Cli::try_parse_from(["fxconv", "convert", amount, "usd", "eur"]);
            assert!(parsed.is_err(), "amount {amount}");
        }
        let negative = Cli::try_parse_from(["fxconv", "convert", "--", "-5", "usd", "eur"]);
        assert!(negative.is_err());
    }

    #[test]
    fn test_convert_accepts_zero() {
        let cli = Cli::try_parse_from(["fxconv", "convert", "0", "usd", "eur"]).unwrap();
        assert!(matches!(cli.command, Commands::Convert { amount, .. } if amount == 0.0));
    }

    #[test]
    fn test_alfred_query_words_are_joined() {
        let cli = Cli::try_parse_from(["fxconv", "alfred", "10", "usd", "to", "eur"]).unwrap();
        match cli.command {
            Commands::Alfred { query } => assert_eq!(query.join(" "), "10 usd to eur"),
            _ => panic!("expected alfred"),
        }
    }

    #[test]
    fn test_global_settings_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fxconv",
            "convert",
            "1",
            "usd",
            "eur",
            "--cache-dir",
            "/tmp/fx",
            "--rates-freshness-secs",
            "60",
        ])
        .unwrap();
        assert_eq!(cli.settings.cache_dir, std::path::PathBuf::from("/tmp/fx"));
        assert_eq!(cli.settings.rates_freshness_secs, 60);
    }
}
