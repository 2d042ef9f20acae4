use serde::{Deserialize, Serialize};

/// Parsed result of one option chain export.
///
/// The five per-contract sequences are parallel: index `i` describes one
/// strike line of the export, with the call and put quoted at the same
/// strike. Snapshots are built atomically by the parser on full success and
/// never mutated afterwards; loading a new export replaces the snapshot
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    /// Underlying name from the export header (e.g. "SPY").
    pub option_name: String,
    /// Quote timestamp display string, verbatim from the header.
    pub time_label: String,
    /// Mid of the underlying bid/ask, rounded to 6 decimal places.
    pub spot: f64,
    /// Day-of-year anchor of the quote date; expiry offsets subtract this.
    pub reference_day: f64,
    /// Year of the quote date; expiry years are counted from here.
    pub reference_year: i32,
    /// Contract names, one per retained data row.
    pub names: Vec<String>,
    /// Strike per contract (call side).
    pub call_strikes: Vec<f64>,
    /// Strike per contract (put side, equal to `call_strikes`).
    pub put_strikes: Vec<f64>,
    /// Call bid/ask mid per contract.
    pub call_prices: Vec<f64>,
    /// Put bid/ask mid per contract.
    pub put_prices: Vec<f64>,
    /// Fractional years until contract expiry. Negative for rows the export
    /// carries past their expiry date; the parser does not filter them.
    pub years_to_expiry: Vec<f64>,
    /// Data rows dropped by the silent row filters (field count, strike).
    /// Diagnostic only; a skipped row is not an error.
    pub skipped_rows: usize,
}

impl OptionChainSnapshot {
    /// Number of retained contracts.
    pub fn len(&self) -> usize {
        self.call_strikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.call_strikes.is_empty()
    }

    /// Distinct expiry values in first-seen order.
    ///
    /// The values are returned bit-exact from `years_to_expiry`, so they can
    /// be fed straight back into the exact-equality expiry filter of the 2D
    /// smile extraction.
    pub fn distinct_expiries(&self) -> Vec<f64> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for &t in &self.years_to_expiry {
            if seen.insert(t.to_bits()) {
                out.push(t);
            }
        }
        out
    }
}
