use surface_explorer::solver::bs::{bs_call_price, bs_put_price};
use surface_explorer::{ImpliedVolSolver, NewtonRaphsonSolver, OptionSide};

const SPOT: f64 = 131.0;
const STRIKE: f64 = 115.0;
const YEARS: f64 = 24.0 / 252.0;
const RATE: f64 = 0.001;
const YIELD: f64 = 0.075;
const VOL: f64 = 0.419;

fn solver() -> NewtonRaphsonSolver {
    NewtonRaphsonSolver::default()
}

/// Price a call at a known vol, then recover the vol from the price.
#[test]
fn call_iv_round_trip() {
    let price = bs_call_price(SPOT, STRIKE, RATE, YIELD, YEARS, VOL);
    let vols = solver()
        .implied_vol(
            OptionSide::Call,
            &[price],
            &[SPOT],
            &[STRIKE],
            &[RATE],
            &[YIELD],
            &[YEARS],
            25,
            1e-5,
        )
        .unwrap();
    assert_eq!(vols.len(), 1);
    assert!(
        (vols[0] - VOL).abs() < 1e-4,
        "expected vol near {VOL}, got {}",
        vols[0]
    );
}

#[test]
fn put_iv_round_trip() {
    let price = bs_put_price(SPOT, STRIKE, RATE, YIELD, YEARS, VOL);
    let vols = solver()
        .implied_vol(
            OptionSide::Put,
            &[price],
            &[SPOT],
            &[STRIKE],
            &[RATE],
            &[YIELD],
            &[YEARS],
            25,
            1e-5,
        )
        .unwrap();
    assert!(
        (vols[0] - VOL).abs() < 1e-4,
        "expected vol near {VOL}, got {}",
        vols[0]
    );
}

/// Whole-chain solve: output length matches input, contract by contract.
#[test]
fn solves_arrays_elementwise() {
    let strikes = [105.0, 115.0, 125.0, 135.0];
    let true_vols = [0.35, 0.30, 0.28, 0.33];
    let prices: Vec<f64> = strikes
        .iter()
        .zip(true_vols.iter())
        .map(|(&k, &v)| bs_call_price(SPOT, k, RATE, 0.0, 0.5, v))
        .collect();
    let n = strikes.len();

    let vols = solver()
        .implied_vol(
            OptionSide::Call,
            &prices,
            &vec![SPOT; n],
            &strikes,
            &vec![RATE; n],
            &vec![0.0; n],
            &vec![0.5; n],
            25,
            1e-5,
        )
        .unwrap();

    assert_eq!(vols.len(), n);
    for (solved, expected) in vols.iter().zip(true_vols.iter()) {
        assert!(
            (solved - expected).abs() < 1e-4,
            "expected {expected}, got {solved}"
        );
    }
}

/// Unquoted contracts (zero price) are zero vol by definition, and inputs
/// the iteration cannot price come back clamped, never as errors.
#[test]
fn clamps_instead_of_failing() {
    let vols = solver()
        .implied_vol(
            OptionSide::Call,
            &[0.0, f64::NAN, 1e-9],
            &[SPOT; 3],
            &[STRIKE; 3],
            &[RATE; 3],
            &[YIELD; 3],
            &[YEARS; 3],
            20,
            1e-4,
        )
        .unwrap();
    assert_eq!(vols[0], 0.0);
    assert_eq!(vols[1], 0.0);
    // A price this far below intrinsic has no vol; the clamp applies.
    assert_eq!(vols[2], 0.0);
}

#[test]
fn mismatched_input_lengths_are_contract_errors() {
    let result = solver().implied_vol(
        OptionSide::Call,
        &[1.0, 2.0],
        &[SPOT],
        &[STRIKE],
        &[RATE],
        &[YIELD],
        &[YEARS],
        20,
        1e-4,
    );
    assert!(result.is_err());
}

/// Matched call/put prices generated at a known rate give that rate back.
#[test]
fn parity_rate_recovers_pricing_rate() {
    let rate = 0.03;
    let strikes = [90.0, 100.0, 110.0];
    let t = 0.5;
    let spot = 100.0;
    let calls: Vec<f64> = strikes
        .iter()
        .map(|&k| bs_call_price(spot, k, rate, 0.0, t, 0.2))
        .collect();
    let puts: Vec<f64> = strikes
        .iter()
        .map(|&k| bs_put_price(spot, k, rate, 0.0, t, 0.2))
        .collect();

    let implied = solver()
        .parity_interest_rate(&calls, &puts, &[spot; 3], &strikes, &[t; 3])
        .unwrap();
    assert!(
        (implied - rate).abs() < 1e-6,
        "expected rate near {rate}, got {implied}"
    );
}

/// Expired or degenerate contracts cannot carry a parity estimate.
#[test]
fn parity_rate_needs_a_usable_contract() {
    let result = solver().parity_interest_rate(
        &[1.0],
        &[1.0],
        &[100.0],
        &[100.0],
        &[-0.1], // expired
    );
    assert!(result.is_err());
}

#[test]
fn parity_rate_checks_input_lengths() {
    let result = solver().parity_interest_rate(&[1.0, 2.0], &[1.0], &[100.0], &[100.0], &[0.5]);
    assert!(result.is_err());
}
