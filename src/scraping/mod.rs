// Dividend calendar scraping
//
// Pipeline: fetch one page, replay its markup through the table state
// machine, project the rows onto `DividendRecord`s.

pub mod dividends;
pub mod fetch;
pub mod markup;
pub mod table;

pub use dividends::{records_from_rows, to_json, to_json_pretty, DividendRecord};
pub use fetch::{DocumentSource, HttpFetcher};
pub use table::{Row, TableMachine, TableState};

use tracing::info;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;

pub const DIVIDENDS_URL: &str = "https://smart-lab.ru/dividends/";

/// Extract the raw rows of every top-level table in `document`.
pub fn parse_rows(document: &str, strict: bool) -> Result<Vec<Row>, ScrapeError> {
    let mut machine = TableMachine::new();
    markup::replay(document, strict, &mut machine)?;
    Ok(machine.into_rows())
}

/// Run the parsing half of the pipeline on an already loaded document.
pub fn scrape_document(document: &str, strict: bool) -> Result<Vec<DividendRecord>, ScrapeError> {
    let rows = parse_rows(document, strict)?;
    let records = records_from_rows(&rows)?;
    info!(rows = rows.len(), records = records.len(), "Parsed dividend table");
    Ok(records)
}

/// Fetch `url` from `source` and scrape it.
pub fn scrape_from<S: DocumentSource>(
    source: &S,
    url: &str,
    strict: bool,
) -> Result<Vec<DividendRecord>, ScrapeError> {
    let document = source.fetch_document(url)?;
    scrape_document(&document, strict)
}

/// Scrape the dividend calendar at `url` with the default settings.
pub fn scrape(url: &str) -> Result<Vec<DividendRecord>, ScrapeError> {
    scrape_with_config(&ScrapeConfig {
        url: url.to_string(),
        ..ScrapeConfig::default()
    })
}

pub fn scrape_with_config(config: &ScrapeConfig) -> Result<Vec<DividendRecord>, ScrapeError> {
    let fetcher = HttpFetcher::new(config)?;
    scrape_from(&fetcher, &config.url, config.strict_markup)
}

/// Scrape and serialize to the compact JSON array.
pub fn scrape_json(url: &str) -> Result<String, ScrapeError> {
    to_json(&scrape(url)?)
}
