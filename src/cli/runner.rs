use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::predict::{load_history, ConstantModel, ModelRegistry, Signal};
use crate::scraping::{self, DividendRecord};

/// Execute a parsed command line, writing results to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Dividends {
            url,
            input,
            strict,
            pretty,
        } => {
            let mut scrape_config = config.scrape;
            if let Some(url) = url {
                scrape_config.url = url;
            }
            scrape_config.strict_markup |= strict;

            let records = match input {
                Some(path) => scrape_file(&path, scrape_config.strict_markup)?,
                None => scraping::scrape_with_config(&scrape_config)
                    .with_context(|| format!("Failed to scrape {}", scrape_config.url))?,
            };

            let json = if pretty {
                scraping::to_json_pretty(&records)?
            } else {
                scraping::to_json(&records)?
            };
            println!("{}", json);
            Ok(())
        }

        Commands::Predict {
            asset,
            scale,
            history,
            signal,
        } => {
            let signal = predict(&asset, &scale, &history, signal)?;
            println!("{}", signal);
            Ok(())
        }
    }
}

fn scrape_file(path: &Path, strict: bool) -> Result<Vec<DividendRecord>> {
    info!("Parsing saved page {}", path.display());
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document = String::from_utf8(bytes)
        .map_err(crate::error::ScrapeError::from)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    scraping::scrape_document(&document, strict)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

// No trained models ship with the crate; every (asset, scale) falls back to
// the placeholder.
fn predict(asset: &str, scale: &str, history: &Path, placeholder: Signal) -> Result<Signal> {
    let data = load_history(history)?;
    let registry = ModelRegistry::new().with_fallback(ConstantModel(placeholder));
    let signal = registry
        .predict(asset, scale, &data)
        .with_context(|| format!("Prediction failed for {} at scale {}", asset, scale))?;
    Ok(signal)
}
