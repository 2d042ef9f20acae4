//! Shared builders for chain-export fixtures.
//!
//! The export format under test: blank line, underlying name line, quote
//! line, column header, then 22-comma-field data rows. Field positions are
//! defined over a naive comma split, so the quoted date string in the quote
//! line deliberately splits in two.

#![allow(dead_code)] // each integration test binary uses a subset

/// Quote line matching the documented February 2024 export:
/// bid 497.7 / ask 497.71, quote date February 8, 2024.
pub const QUOTE_LINE: &str =
    r#""Date: February 8, 2024 at 11:23 AM EST",Bid: 497.7,Ask: 497.71,Size: 17*14,"Volume: 10,598,673""#;

/// Cumulative day offset of the quote date above (February -> 57, day 8).
pub const REFERENCE_DAY: f64 = 65.0;

/// Build one 22-field data row with the quoted columns populated and the
/// unused columns left empty.
pub fn data_row(
    expiry: &str,
    name: &str,
    call_bid: f64,
    call_ask: f64,
    strike: f64,
    put_bid: f64,
    put_ask: f64,
) -> String {
    let mut fields = vec![String::new(); 22];
    fields[0] = expiry.to_string();
    fields[1] = name.to_string();
    fields[4] = call_bid.to_string();
    fields[5] = call_ask.to_string();
    fields[11] = strike.to_string();
    fields[15] = put_bid.to_string();
    fields[16] = put_ask.to_string();
    fields.join(",")
}

/// Assemble a full export around the standard quote header.
pub fn export(option_name: &str, rows: &[String]) -> String {
    let mut lines = vec![
        String::new(),
        option_name.to_string(),
        QUOTE_LINE.to_string(),
        "Expiration Date,Calls,Last Sale,Net".to_string(),
    ];
    lines.extend(rows.iter().cloned());
    lines.join("\n")
}

/// Three-contract export across two expiries, strikes 100/105/100.
pub fn two_expiry_export() -> String {
    export(
        "SPY",
        &[
            data_row("Fri February 9 2024", "SPY240209C00100000", 5.0, 5.2, 100.0, 1.0, 1.2),
            data_row("Fri February 9 2024", "SPY240209C00105000", 3.0, 3.2, 105.0, 2.0, 2.2),
            data_row("Fri March 15 2024", "SPY240315C00100000", 7.0, 7.4, 100.0, 4.0, 4.4),
        ],
    )
}
