//! Payout - dividend calendar scraper and trading signal predictor
//!
//! This library scrapes upcoming dividend payments from the smart-lab.ru
//! calendar into typed records, and resolves per asset/time-scale models
//! that turn a price history into a trading signal.

pub mod cli;
pub mod config;
pub mod error;
pub mod predict;
pub mod scraping;

pub use error::{ConfigError, PredictError, ScrapeError};
pub use predict::{Candle, Model, ModelRegistry, Signal};
pub use scraping::{scrape, scrape_json, DividendRecord};
