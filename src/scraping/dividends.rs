use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScrapeError;
use crate::scraping::table::Row;

// Fragment offsets of the smart-lab dividend calendar columns
const ASSET_COLUMN: usize = 1;
const DIVIDEND_COLUMN: usize = 4;
const BUY_DATE_COLUMN: usize = 7;
const GAP_DATE_COLUMN: usize = 8;

/// One upcoming dividend payment from the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub asset: String,
    pub dividend: f64,
    /// Last day to buy and still receive the dividend
    pub buy_date: String,
    /// Date of the ex-dividend price gap
    pub gap_date: String,
}

impl DividendRecord {
    /// Project a table row onto a record. `index` is the row's position in
    /// the scraped table and only used for error reporting.
    pub fn from_row(index: usize, row: &[String]) -> Result<Self, ScrapeError> {
        let cell = |column: usize| {
            row.get(column).ok_or(ScrapeError::MissingColumn {
                row: index,
                index: column,
                len: row.len(),
            })
        };

        Ok(Self {
            asset: cell(ASSET_COLUMN)?.clone(),
            dividend: parse_dividend(index, cell(DIVIDEND_COLUMN)?)?,
            buy_date: cell(BUY_DATE_COLUMN)?.clone(),
            gap_date: cell(GAP_DATE_COLUMN)?.clone(),
        })
    }
}

/// Parse a dividend amount written with a decimal comma ("12,34").
///
/// `NaN` and infinities parse as floats but have no JSON number form, so
/// they are rejected too.
pub fn parse_dividend(row: usize, raw: &str) -> Result<f64, ScrapeError> {
    let value = raw
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|source| ScrapeError::ValueConversion {
            row,
            value: raw.to_string(),
            source,
        })?;
    if !value.is_finite() {
        return Err(ScrapeError::NonFiniteValue {
            row,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Turn the scraped rows into records.
///
/// Row 0 is the header and always skipped. Row 1 sets the expected width:
/// any later row with a different number of entries is dropped. A kept row
/// that fails to convert aborts the whole batch.
pub fn records_from_rows(rows: &[Row]) -> Result<Vec<DividendRecord>, ScrapeError> {
    let Some(reference) = rows.get(1) else {
        return Ok(Vec::new());
    };
    let width = reference.len();

    let mut records = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.len() != width {
            debug!(row = index, len = row.len(), width, "Dropping row with unexpected width");
            continue;
        }
        records.push(DividendRecord::from_row(index, row)?);
    }
    Ok(records)
}

/// Compact JSON array, keys in declaration order.
pub fn to_json(records: &[DividendRecord]) -> Result<String, ScrapeError> {
    Ok(serde_json::to_string(records)?)
}

pub fn to_json_pretty(records: &[DividendRecord]) -> Result<String, ScrapeError> {
    Ok(serde_json::to_string_pretty(records)?)
}
