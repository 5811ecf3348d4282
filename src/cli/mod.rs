use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::predict::Signal;

pub mod runner;

#[derive(Parser)]
#[command(name = "payout")]
#[command(
    version,
    about = "Dividend calendar scraper with a pluggable trading signal predictor"
)]
#[command(
    long_about = "Scrape upcoming dividend payments from smart-lab.ru into JSON, and query trading signal models for an asset, time scale and price history."
)]
pub struct Cli {
    /// Path to a TOML config file (overrides PAYOUT_CONFIG and the default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape the dividend calendar and print it as a JSON array
    Dividends {
        /// Page to scrape instead of the configured URL
        #[arg(long, conflicts_with = "input")]
        url: Option<String>,

        /// Parse a saved HTML page instead of fetching one
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Fail on any markup error reported by the HTML parser
        #[arg(long)]
        strict: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Predict the trading signal for an asset at a time scale
    Predict {
        /// Asset identifier (e.g., SBER)
        asset: String,

        /// Time scale identifier (e.g., H or D)
        scale: String,

        /// CSV price history: date_time,open,high,low,close,volume
        #[arg(long)]
        history: PathBuf,

        /// Signal returned by the placeholder model
        #[arg(long, default_value = "C")]
        signal: Signal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_dividends_flags() {
        let cli = Cli::try_parse_from(["payout", "dividends", "--strict", "--input", "page.html"])
            .unwrap();
        match cli.command {
            Commands::Dividends {
                url,
                input,
                strict,
                pretty,
            } => {
                assert!(url.is_none());
                assert_eq!(input, Some(PathBuf::from("page.html")));
                assert!(strict);
                assert!(!pretty);
            }
            _ => panic!("expected dividends command"),
        }
    }

    #[test]
    fn url_and_input_conflict() {
        let result = Cli::try_parse_from([
            "payout",
            "dividends",
            "--url",
            "http://localhost/",
            "--input",
            "page.html",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_predict_signal() {
        let cli = Cli::try_parse_from([
            "payout", "predict", "SBER", "H", "--history", "h.csv", "--signal", "s",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict { asset, signal, .. } => {
                assert_eq!(asset, "SBER");
                assert_eq!(signal, Signal::S);
            }
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn reject_unknown_signal() {
        let result = Cli::try_parse_from([
            "payout", "predict", "SBER", "H", "--history", "h.csv", "--signal", "X",
        ]);
        assert!(result.is_err());
    }
}
