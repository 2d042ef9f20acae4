use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::render::PlotStyle;
use crate::solver::OptionSide;

fn default_interest_rate() -> f64 {
    0.01
}

fn default_dividend_yield() -> f64 {
    0.0
}

fn default_surface_max_iterations() -> u32 {
    20
}

fn default_smile_max_iterations() -> u32 {
    25
}

fn default_threshold() -> f64 {
    1e-4
}

/// Iteration budgets and convergence threshold for the implied-vol solves.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Newton budget for the 3D surface recompute.
    #[serde(default = "default_surface_max_iterations")]
    pub surface_max_iterations: u32,

    /// Newton budget for the 2D smile recompute. The smile path has always
    /// run with a larger budget than the surface path; both are kept.
    #[serde(default = "default_smile_max_iterations")]
    pub smile_max_iterations: u32,

    /// Largest acceptable difference between the repriced and observed
    /// option price.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            surface_max_iterations: default_surface_max_iterations(),
            smile_max_iterations: default_smile_max_iterations(),
            threshold: default_threshold(),
        }
    }
}

/// Initial controller parameters. Every field has a default, so an empty
/// TOML document is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    /// Risk-free rate applied to every contract.
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,

    /// Continuous dividend yield applied to every contract.
    #[serde(default = "default_dividend_yield")]
    pub dividend_yield: f64,

    /// Which side the 3D surface shows first.
    #[serde(default)]
    pub option_side: OptionSide,

    #[serde(default)]
    pub plot_style: PlotStyle,

    /// Whether the per-expiry smile panels start visible.
    #[serde(default)]
    pub show_2d: bool,

    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            interest_rate: default_interest_rate(),
            dividend_yield: default_dividend_yield(),
            option_side: OptionSide::default(),
            plot_style: PlotStyle::default(),
            show_2d: false,
            solver: SolverConfig::default(),
        }
    }
}

impl ExplorerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parsing explorer configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}
