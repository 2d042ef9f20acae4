//! Reduction of per-contract arrays into renderer-ready coordinate sets.
//!
//! Strikes, implied vols, and expiries arrive as aligned arrays straight from
//! the parser and the solver; the functions here filter, round, and
//! deduplicate them into the point sets the rendering sink can draw. All
//! inputs of one call must share a length; a mismatch is a bug in the caller,
//! not bad market data, and fails fast.

use anyhow::{ensure, Result};
use std::collections::HashSet;

/// Contracts below this implied vol are dropped from the 2D smile. Vol of
/// zero is the solver's clamp value for non-converged contracts.
const MIN_SMILE_VOL: f64 = 0.001;

/// Non-convergence cutoff for the 3D cloud.
const MIN_SURFACE_VOL: f64 = 0.0001;

/// Plot granularity for strike and day coordinates.
const CLOUD_DECIMALS: i32 = 2;

/// `(strike, vol)` pairs for one expiry, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmileSlice {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Deduplicated `(strike, days, vol)` triples, text-encoded for the sink.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<String>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Scale-multiply-round-divide rounding: `round(v * 10^places) / 10^places`.
///
/// `f64::round` ties away from zero, subject to binary representation — e.g.
/// `1.005` scales to `100.49999...` and rounds *down*. That artifact is part
/// of the plot-coordinate contract and is pinned in the tests.
pub fn round_to_decimal_places(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    // Collapse -0.0 so the canonical string is "0", not "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Extract the vol-vs-strike smile at one expiry.
///
/// A contract is included iff its expiry equals `target_expiry` *exactly* and
/// its implied vol clears [`MIN_SMILE_VOL`]. The exact float comparison is
/// deliberate: callers must pass a value drawn verbatim from the same
/// `years_to_expiry` array (see `OptionChainSnapshot::distinct_expiries`),
/// never one recomputed independently. Order is preserved and nothing is
/// deduplicated.
pub fn smile_slice(
    strikes: &[f64],
    implied_vols: &[f64],
    years_to_expiry: &[f64],
    target_expiry: f64,
) -> Result<SmileSlice> {
    ensure!(
        strikes.len() == implied_vols.len() && strikes.len() == years_to_expiry.len(),
        "smile_slice input lengths differ: {} strikes, {} vols, {} expiries",
        strikes.len(),
        implied_vols.len(),
        years_to_expiry.len()
    );

    let mut slice = SmileSlice::default();
    for i in 0..strikes.len() {
        if years_to_expiry[i] == target_expiry && implied_vols[i] >= MIN_SMILE_VOL {
            slice.x.push(strikes[i]);
            slice.y.push(implied_vols[i]);
        }
    }
    Ok(slice)
}

/// Reduce the full chain into the 3D surface point cloud.
///
/// Strike and day-count (years * 365) are rounded to two decimals before
/// deduplication: raw values carry representation noise from the parser and
/// solver that would otherwise make every pair unique. The first occurrence
/// of a rounded `(strike, days)` pair wins and later duplicates are dropped,
/// since the rendering sink cannot handle repeated mesh vertices. Outputs are
/// the rounded values' canonical decimal strings, in first-seen input order.
pub fn point_cloud(
    strikes: &[f64],
    implied_vols: &[f64],
    years_to_expiry: &[f64],
) -> Result<PointCloud> {
    ensure!(
        strikes.len() == implied_vols.len() && strikes.len() == years_to_expiry.len(),
        "point_cloud input lengths differ: {} strikes, {} vols, {} expiries",
        strikes.len(),
        implied_vols.len(),
        years_to_expiry.len()
    );

    let mut cloud = PointCloud::default();
    let mut seen: HashSet<(u64, u64)> = HashSet::new();

    for i in 0..strikes.len() {
        if !(implied_vols[i] >= MIN_SURFACE_VOL) {
            continue;
        }

        let x = round_to_decimal_places(strikes[i], CLOUD_DECIMALS);
        let y = round_to_decimal_places(years_to_expiry[i] * 365.0, CLOUD_DECIMALS);
        if !seen.insert((x.to_bits(), y.to_bits())) {
            continue;
        }

        let z = round_to_decimal_places(implied_vols[i], CLOUD_DECIMALS);
        cloud.x.push(x.to_string());
        cloud.y.push(y.to_string());
        cloud.z.push(z.to_string());
    }
    Ok(cloud)
}
