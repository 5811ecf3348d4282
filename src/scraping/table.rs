//! Table-tracking state machine.
//!
//! Consumes start-tag, end-tag and text events in document order and
//! accumulates the cell texts of every `<tr>` seen inside a `<table>`.
//! Only one level of table is tracked: a `<table>` opened while another
//! one is still open is rejected with [`ScrapeError::NestedTable`].

use tracing::trace;

use crate::error::ScrapeError;
use crate::scraping::markup::MarkupSink;

/// One table row: the trimmed text fragments of its `<td>` cells in
/// encounter order. A cell split by inline markup (`<td>1<b>2</b></td>`)
/// contributes one entry per fragment, so positions are fragment offsets,
/// not cell offsets.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableState {
    #[default]
    Outside,
    InTable,
    InRow,
    InCell,
}

/// Accumulates rows while replaying markup events.
///
/// Tag names are expected in lowercase, as the HTML parser reports them.
#[derive(Debug, Default)]
pub struct TableMachine {
    state: TableState,
    rows: Vec<Row>,
}

impl TableMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl MarkupSink for TableMachine {
    fn start_tag(&mut self, name: &str) -> Result<(), ScrapeError> {
        match (name, self.state) {
            ("table", TableState::Outside) => self.state = TableState::InTable,
            ("table", _) => return Err(ScrapeError::NestedTable),
            // Any <tr> inside the table starts a new row, even if the
            // previous one was never closed.
            ("tr", TableState::InTable | TableState::InRow | TableState::InCell) => {
                self.rows.push(Row::new());
                self.state = TableState::InRow;
            }
            ("td", TableState::InRow | TableState::InCell) => self.state = TableState::InCell,
            _ => {}
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str) -> Result<(), ScrapeError> {
        match (name, self.state) {
            ("td", TableState::InCell) => self.state = TableState::InRow,
            ("tr", TableState::InRow | TableState::InCell) => self.state = TableState::InTable,
            ("table", _) => self.state = TableState::Outside,
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), ScrapeError> {
        if self.state != TableState::InCell {
            return Ok(());
        }
        trace!(row = self.rows.len().saturating_sub(1), text, "Cell fragment");
        if let Some(row) = self.rows.last_mut() {
            row.push(text.trim().to_string());
        }
        Ok(())
    }
}
