// Delimited text → rows of string fields

use crate::error::PlotError;

/// One document's records in parse order, blank rows removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: rows.into_iter().filter(|r| !r.is_empty()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Parse a whole document into a [`Table`].
///
/// Quoted fields may hold the delimiter, doubled quotes and newlines. The
/// final line does not need a terminator.
pub fn parse_table(input: &str, delimiter: u8) -> Result<Table, PlotError> {
    check_quoting(input.as_bytes(), delimiter)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PlotError::Parse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(rows))
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    ClosingQuote,
}

/// The csv reader accepts stray quotes silently; reject them up front.
fn check_quoting(input: &[u8], delimiter: u8) -> Result<(), PlotError> {
    let mut state = QuoteState::FieldStart;
    let mut line: u64 = 1;
    let mut opened_on = line;

    for &byte in input {
        let line_end = byte == b'\n' || byte == b'\r';
        state = match state {
            QuoteState::FieldStart | QuoteState::Unquoted if byte == delimiter || line_end => {
                QuoteState::FieldStart
            }
            QuoteState::FieldStart if byte == b'"' => {
                opened_on = line;
                QuoteState::Quoted
            }
            QuoteState::FieldStart => QuoteState::Unquoted,
            QuoteState::Unquoted if byte == b'"' => {
                return Err(PlotError::Parse {
                    line,
                    message: "unexpected quote in unquoted field".to_string(),
                });
            }
            QuoteState::Unquoted => QuoteState::Unquoted,
            QuoteState::Quoted if byte == b'"' => QuoteState::ClosingQuote,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::ClosingQuote if byte == b'"' => QuoteState::Quoted,
            QuoteState::ClosingQuote if byte == delimiter || line_end => QuoteState::FieldStart,
            QuoteState::ClosingQuote => {
                return Err(PlotError::Parse {
                    line,
                    message: "unexpected character after closing quote".to_string(),
                });
            }
        };
        if byte == b'\n' {
            line += 1;
        }
    }

    if matches!(state, QuoteState::Quoted) {
        return Err(PlotError::Parse {
            line: opened_on,
            message: "unterminated quoted field".to_string(),
        });
    }
    Ok(())
}
