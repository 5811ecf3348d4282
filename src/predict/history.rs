use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One bar of price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date_time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Deserialize)]
struct CandleRow {
    date_time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load a price history CSV with a `date_time,open,high,low,close,volume`
/// header.
pub fn load_history(path: &Path) -> Result<Vec<Candle>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open history file {}", path.display()))?;
    parse_history(file).with_context(|| format!("Invalid history file {}", path.display()))
}

pub fn parse_history<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();
    for (index, row) in csv_reader.deserialize::<CandleRow>().enumerate() {
        // +2: header line and 1-based numbering
        let line = index + 2;
        let row = row.with_context(|| format!("Malformed candle on line {}", line))?;
        let date_time = parse_date_time(&row.date_time)
            .with_context(|| format!("Bad timestamp on line {}", line))?;
        candles.push(Candle {
            date_time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(candles)
}

/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
fn parse_date_time(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(value);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("Failed to parse date: {}", raw))
}
