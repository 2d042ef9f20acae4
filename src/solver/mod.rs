//! Implied-volatility solver boundary.
//!
//! The controller treats the solver as an opaque numeric module behind
//! [`ImpliedVolSolver`]; everything it needs is the array-in/array-out
//! contract. [`NewtonRaphsonSolver`] is the reference implementation shipped
//! with the crate.

pub mod bs;

use anyhow::{anyhow, ensure, Result};
use roots::{find_root_brent, SimpleConvergency};
use serde::{Deserialize, Serialize};

/// Lower bracket for the non-Newton fallback search.
const VOL_FLOOR: f64 = 1e-4;
/// Upper bracket: 500% vol, beyond any quotable contract.
const VOL_CEIL: f64 = 5.0;

/// Whether a contract is a call or a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    #[default]
    Call,
    Put,
}

impl OptionSide {
    /// Black-Scholes price for this side.
    pub fn price(
        self,
        spot: f64,
        strike: f64,
        vol: f64,
        rate: f64,
        dividend_yield: f64,
        t: f64,
    ) -> f64 {
        match self {
            OptionSide::Call => bs::bs_call_price(spot, strike, rate, dividend_yield, t, vol),
            OptionSide::Put => bs::bs_put_price(spot, strike, rate, dividend_yield, t, vol),
        }
    }
}

/// Contract for the external implied-volatility module.
///
/// All slice arguments of [`implied_vol`](Self::implied_vol) must share a
/// length; the output has that same length. Non-convergent contracts come
/// back clamped to zero (or non-finite) rather than as errors — downstream
/// reduction filters them with its epsilon thresholds.
///
/// Implementations are stateless across calls. An older variant of this
/// interface also took a `prev_vol` array as a warm-start seed for the
/// iteration; that shape is retired, and implementations choose their own
/// starting point.
pub trait ImpliedVolSolver {
    #[allow(clippy::too_many_arguments)]
    fn implied_vol(
        &self,
        side: OptionSide,
        price: &[f64],
        spot: &[f64],
        strike: &[f64],
        risk_free_rate: &[f64],
        dividend_yield: &[f64],
        years_to_expiry: &[f64],
        max_iterations: u32,
        threshold: f64,
    ) -> Result<Vec<f64>>;

    /// Single interest rate implied by put-call parity across the chain.
    fn parity_interest_rate(
        &self,
        call_price: &[f64],
        put_price: &[f64],
        spot: &[f64],
        strike: &[f64],
        years_to_expiry: &[f64],
    ) -> Result<f64>;
}

/// Newton-Raphson implied vol with a Brent bracketing fallback.
///
/// Per contract: iterate `vol -= (price(vol) - market) / vega(vol)` from
/// `initial_vol` until the price difference clears the threshold or the
/// iteration budget runs out. Diverged or non-converged contracts get one
/// bracketed Brent attempt over a wide vol range; contracts that still fail
/// are clamped to zero. A zero market price is zero vol by definition.
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver {
    /// Newton starting point; 20% vol converges in 2-3 iterations for most
    /// listed contracts.
    pub initial_vol: f64,
}

impl Default for NewtonRaphsonSolver {
    fn default() -> Self {
        Self { initial_vol: 0.2 }
    }
}

impl NewtonRaphsonSolver {
    #[allow(clippy::too_many_arguments)]
    fn solve_one(
        &self,
        side: OptionSide,
        price: f64,
        spot: f64,
        strike: f64,
        rate: f64,
        dividend_yield: f64,
        t: f64,
        max_iterations: u32,
        threshold: f64,
    ) -> f64 {
        if price == 0.0 {
            return 0.0;
        }

        let mut vol = self.initial_vol;
        let mut converged = false;
        for _ in 0..max_iterations {
            let diff = side.price(spot, strike, vol, rate, dividend_yield, t) - price;
            if diff.abs() < threshold {
                converged = true;
                break;
            }
            let vega = bs::bs_vega(spot, strike, rate, dividend_yield, t, vol);
            vol -= diff / vega;
            if !vol.is_finite() {
                break;
            }
        }

        if converged && vol > 0.0 {
            return vol;
        }

        // Newton walked off or ran out of budget; one bracketed retry.
        let objective = |v: f64| side.price(spot, strike, v, rate, dividend_yield, t) - price;
        let lo = objective(VOL_FLOOR);
        let hi = objective(VOL_CEIL);
        if lo.is_finite() && hi.is_finite() && lo * hi < 0.0 {
            let mut convergency = SimpleConvergency {
                eps: threshold,
                max_iter: 64,
            };
            if let Ok(root) = find_root_brent(VOL_FLOOR, VOL_CEIL, &objective, &mut convergency) {
                if root > 0.0 {
                    return root;
                }
            }
        }
        0.0
    }
}

impl ImpliedVolSolver for NewtonRaphsonSolver {
    fn implied_vol(
        &self,
        side: OptionSide,
        price: &[f64],
        spot: &[f64],
        strike: &[f64],
        risk_free_rate: &[f64],
        dividend_yield: &[f64],
        years_to_expiry: &[f64],
        max_iterations: u32,
        threshold: f64,
    ) -> Result<Vec<f64>> {
        let n = price.len();
        ensure!(
            spot.len() == n
                && strike.len() == n
                && risk_free_rate.len() == n
                && dividend_yield.len() == n
                && years_to_expiry.len() == n,
            "implied_vol input lengths differ: prices {}, spots {}, strikes {}, rates {}, yields {}, expiries {}",
            n,
            spot.len(),
            strike.len(),
            risk_free_rate.len(),
            dividend_yield.len(),
            years_to_expiry.len()
        );

        Ok((0..n)
            .map(|i| {
                self.solve_one(
                    side,
                    price[i],
                    spot[i],
                    strike[i],
                    risk_free_rate[i],
                    dividend_yield[i],
                    years_to_expiry[i],
                    max_iterations,
                    threshold,
                )
            })
            .collect())
    }

    fn parity_interest_rate(
        &self,
        call_price: &[f64],
        put_price: &[f64],
        spot: &[f64],
        strike: &[f64],
        years_to_expiry: &[f64],
    ) -> Result<f64> {
        let n = call_price.len();
        ensure!(
            put_price.len() == n
                && spot.len() == n
                && strike.len() == n
                && years_to_expiry.len() == n,
            "parity_interest_rate input lengths differ: calls {}, puts {}, spots {}, strikes {}, expiries {}",
            n,
            put_price.len(),
            spot.len(),
            strike.len(),
            years_to_expiry.len()
        );

        // C - P = S - K*exp(-rT)  =>  r = -ln((S - C + P)/K) / T
        let mut sum = 0.0;
        let mut count = 0usize;
        for i in 0..n {
            let t = years_to_expiry[i];
            let discounted = spot[i] - call_price[i] + put_price[i];
            if t <= 0.0 || strike[i] <= 0.0 || discounted <= 0.0 {
                continue;
            }
            let rate = -(discounted / strike[i]).ln() / t;
            if rate.is_finite() {
                sum += rate;
                count += 1;
            }
        }
        if count == 0 {
            return Err(anyhow!(
                "no contract usable for put-call parity over {} inputs",
                n
            ));
        }
        Ok(sum / count as f64)
    }
}
