//! Parser for the delayed-quote option chain text export.
//!
//! The export is line-oriented and mixes metadata rows with fixed-width data
//! rows. Field positions are defined over a *naive* comma split: quoted
//! fields containing commas (the date header, the volume column) split apart,
//! and the documented 22-field count for data rows already accounts for that.
//! A quote-aware CSV reader would merge the very fields the format counts.

use thiserror::Error;
use tracing::debug;

use crate::chain::calendar::month_day_offset;
use crate::chain::snapshot::OptionChainSnapshot;
use crate::surface::round_to_decimal_places;

/// Blank line, underlying name line, quote line, column header line.
const MIN_LINES: usize = 4;

/// Field count that identifies a data row after the naive comma split.
const DATA_ROW_FIELDS: usize = 22;

/// Structural failure of the export header. Row-level problems never surface
/// here; they are silently skipped.
#[derive(Debug, Error)]
pub enum ChainParseError {
    #[error("chain export too short: {0} lines, need at least 4")]
    TooShort(usize),
    #[error("quote header is missing the {0} field")]
    MissingField(&'static str),
    #[error("quote header field {field} is not numeric: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Why a data row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    /// Not a data row: footer, disclaimer, or malformed line.
    FieldCount(usize),
    /// Degenerate or placeholder contract.
    BadStrike,
    /// Expiry field does not carry the four expected tokens.
    MalformedExpiry,
}

/// One retained data row, before expiry arithmetic.
struct ParsedRow {
    name: String,
    strike: f64,
    call_price: f64,
    put_price: f64,
    expiry_month_offset: f64,
    expiry_day: f64,
    expiry_year: i32,
}

/// Keep only ASCII digits and `.`, the way the export's `Bid: 497.7`-style
/// fields are unwrapped.
fn numeric_chars(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

fn parse_header_number(field: &'static str, raw: &str) -> Result<f64, ChainParseError> {
    numeric_chars(raw)
        .parse()
        .map_err(|_| ChainParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Classify and parse one line at or below the data section.
fn parse_data_row(line: &str) -> Result<ParsedRow, SkipReason> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != DATA_ROW_FIELDS {
        return Err(SkipReason::FieldCount(fields.len()));
    }

    let strike: f64 = fields[11].trim().parse().map_err(|_| SkipReason::BadStrike)?;
    if strike <= 0.0 {
        return Err(SkipReason::BadStrike);
    }

    // Expiry field looks like "Fri Feb 09 2024": weekday, month, day, year.
    let expiry: Vec<&str> = fields[0].split(' ').collect();
    if expiry.len() < 4 {
        return Err(SkipReason::MalformedExpiry);
    }
    let expiry_month_offset = month_day_offset(expiry[1]);
    let expiry_day: f64 = expiry[2].parse().map_err(|_| SkipReason::MalformedExpiry)?;
    let expiry_year: i32 = expiry[3].parse().map_err(|_| SkipReason::MalformedExpiry)?;

    // A quote column that fails to parse becomes NaN rather than dropping the
    // row; the implied-vol epsilons filter such contracts downstream.
    let call_bid: f64 = fields[4].trim().parse().unwrap_or(f64::NAN);
    let call_ask: f64 = fields[5].trim().parse().unwrap_or(f64::NAN);
    let put_bid: f64 = fields[15].trim().parse().unwrap_or(f64::NAN);
    let put_ask: f64 = fields[16].trim().parse().unwrap_or(f64::NAN);

    Ok(ParsedRow {
        name: fields[1].to_string(),
        strike,
        call_price: (call_bid + call_ask) / 2.0,
        put_price: (put_bid + put_ask) / 2.0,
        expiry_month_offset,
        expiry_day,
        expiry_year,
    })
}

/// Parse a chain export into an [`OptionChainSnapshot`].
///
/// Layout: line 0 is blank, line 1 names the underlying, line 2 carries the
/// quote date and bid/ask, line 3 is the column header, and every later line
/// is either a 22-field data row or ignorable filler. Rows are dropped
/// silently (wrong field count, non-positive strike); only the snapshot's
/// `skipped_rows` counter observes them. The snapshot is built only after the
/// whole export has been walked, so a failure here never leaves a partial
/// result behind.
pub fn parse_option_chain(raw: &str) -> Result<OptionChainSnapshot, ChainParseError> {
    let lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() < MIN_LINES {
        return Err(ChainParseError::TooShort(lines.len()));
    }

    // Line 1: underlying name is the first comma field.
    let option_name = lines[1].split(',').next().unwrap_or_default().to_string();

    // Line 2: `"Date: <Month> <day>, <year> at ...",Bid: <f>,Ask: <f>,...`
    // The naive comma split cuts the quoted date string in two.
    let quote_fields: Vec<&str> = lines[2].split(',').collect();
    let date_field = *quote_fields
        .first()
        .ok_or(ChainParseError::MissingField("quote date"))?;
    let year_field = *quote_fields
        .get(1)
        .ok_or(ChainParseError::MissingField("quote year"))?;
    let bid_field = *quote_fields
        .get(2)
        .ok_or(ChainParseError::MissingField("bid"))?;
    let ask_field = *quote_fields
        .get(3)
        .ok_or(ChainParseError::MissingField("ask"))?;

    let bid = parse_header_number("bid", bid_field)?;
    let ask = parse_header_number("ask", ask_field)?;
    let spot = round_to_decimal_places((bid + ask) / 2.0, 6);

    let date_tokens: Vec<&str> = date_field.split(' ').collect();
    let month = *date_tokens
        .get(1)
        .ok_or(ChainParseError::MissingField("quote month"))?;
    let day_token = *date_tokens
        .get(2)
        .ok_or(ChainParseError::MissingField("quote day"))?;
    let day = parse_header_number("quote day", day_token)?;

    let year_tokens: Vec<&str> = year_field.split(' ').collect();
    let year_token = *year_tokens
        .get(1)
        .ok_or(ChainParseError::MissingField("quote year"))?;
    let reference_year: i32 =
        year_token
            .parse()
            .map_err(|_| ChainParseError::InvalidNumber {
                field: "quote year",
                value: year_token.to_string(),
            })?;

    let reference_day = month_day_offset(month) + day;
    let time_label = format!("{date_field}{year_field}");

    let mut names = Vec::new();
    let mut call_strikes = Vec::new();
    let mut put_strikes = Vec::new();
    let mut call_prices = Vec::new();
    let mut put_prices = Vec::new();
    let mut years_to_expiry = Vec::new();
    let mut skipped_rows = 0usize;

    // Line 3 is the column header; data rows start at line 4.
    for line in &lines[4..] {
        match parse_data_row(line) {
            Ok(row) => {
                // Day counting matches the quote-side anchor; the extra +1
                // pushes the expiry to end of day. Years are flat 365-day
                // spans with no leap adjustment.
                let expiration = f64::from(row.expiry_year - reference_year) * 365.0
                    + row.expiry_month_offset
                    + row.expiry_day
                    + 1.0;
                names.push(row.name);
                call_strikes.push(row.strike);
                put_strikes.push(row.strike);
                call_prices.push(row.call_price);
                put_prices.push(row.put_price);
                years_to_expiry.push((expiration - reference_day) / 365.0);
            }
            Err(_) => skipped_rows += 1,
        }
    }

    debug!(
        retained = call_strikes.len(),
        skipped = skipped_rows,
        option = %option_name,
        "parsed option chain export"
    );

    Ok(OptionChainSnapshot {
        option_name,
        time_label,
        spot,
        reference_day,
        reference_year,
        names,
        call_strikes,
        put_strikes,
        call_prices,
        put_prices,
        years_to_expiry,
        skipped_rows,
    })
}
