//! Reactive controller sequencing recompute and render.
//!
//! The controller owns the active snapshot and all user parameters, and is
//! driven synchronously by discrete events: load a dataset, flip the option
//! side, drag a rate input, switch the plot style, toggle the smile panels.
//! Each event maps to a fixed recompute-and-render sequence; the solver and
//! the rendering sink sit behind their boundary traits and are never touched
//! outside that sequence.
//!
//! State is exclusively owned here. A new snapshot replaces the old one
//! wholesale, and a failed upload parse returns before any mutation, so the
//! previously active data always survives bad input.

pub mod config;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::chain::{parse_option_chain, OptionChainSnapshot};
use crate::render::{CoordSeq, Figure, Layout, PlotStyle, RenderSink, Trace};
use crate::solver::{ImpliedVolSolver, OptionSide};
use crate::surface::{point_cloud, smile_slice};

pub use config::{ExplorerConfig, SolverConfig};

/// Panel name of the 3D surface figure.
pub const SURFACE_PANEL: &str = "surface";

fn smile_panel(index: usize) -> String {
    format!("smile{index}")
}

/// Discrete inputs the controller reacts to.
#[derive(Debug, Clone)]
pub enum ExplorerEvent {
    /// First dataset; moves the controller out of its empty state.
    DataLoaded(OptionChainSnapshot),
    /// Switch to another pre-parsed dataset.
    DataSourceChanged(OptionChainSnapshot),
    OptionSideChanged(OptionSide),
    RateChanged(f64),
    DividendChanged(f64),
    PlotTypeChanged(PlotStyle),
    Toggle2D,
    /// Raw export text from a file picker.
    FileUploaded(String),
}

impl ExplorerEvent {
    fn name(&self) -> &'static str {
        match self {
            ExplorerEvent::DataLoaded(_) => "data_loaded",
            ExplorerEvent::DataSourceChanged(_) => "data_source_changed",
            ExplorerEvent::OptionSideChanged(_) => "option_side_changed",
            ExplorerEvent::RateChanged(_) => "rate_changed",
            ExplorerEvent::DividendChanged(_) => "dividend_changed",
            ExplorerEvent::PlotTypeChanged(_) => "plot_type_changed",
            ExplorerEvent::Toggle2D => "toggle_2d",
            ExplorerEvent::FileUploaded(_) => "file_uploaded",
        }
    }
}

/// User parameters plus the active snapshot. Single owner: the controller.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub snapshot: Option<OptionChainSnapshot>,
    pub option_side: OptionSide,
    pub interest_rate: f64,
    pub dividend_yield: f64,
    pub plot_style: PlotStyle,
    pub show_2d: bool,
}

/// Implied vols for both sides of the chain, from one recompute.
struct ImpliedVolPair {
    call: Vec<f64>,
    put: Vec<f64>,
}

/// Orchestrates parser, solver, reduction, and sink.
pub struct SurfaceController {
    state: ControllerState,
    solver: Box<dyn ImpliedVolSolver>,
    sink: Box<dyn RenderSink>,
    solver_config: SolverConfig,
    /// Last surface-path solve, kept so a plot-style change can re-render
    /// without calling the solver again. Never outlives its snapshot: every
    /// snapshot replacement recomputes it.
    surface_vols: Option<ImpliedVolPair>,
    /// Smile panels drawn by the last 2D render, for clearing.
    smile_panels: usize,
}

impl SurfaceController {
    pub fn new(
        solver: Box<dyn ImpliedVolSolver>,
        sink: Box<dyn RenderSink>,
        config: ExplorerConfig,
    ) -> Self {
        Self {
            state: ControllerState {
                snapshot: None,
                option_side: config.option_side,
                interest_rate: config.interest_rate,
                dividend_yield: config.dividend_yield,
                plot_style: config.plot_style,
                show_2d: config.show_2d,
            },
            solver,
            sink,
            solver_config: config.solver,
            surface_vols: None,
            smile_panels: 0,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// False until the first dataset arrives.
    pub fn is_ready(&self) -> bool {
        self.state.snapshot.is_some()
    }

    /// Process one event. Parameter events received before the first dataset
    /// update the state but draw nothing.
    pub fn handle(&mut self, event: ExplorerEvent) -> Result<()> {
        debug!(event = event.name(), "handling explorer event");
        match event {
            ExplorerEvent::DataLoaded(snapshot) | ExplorerEvent::DataSourceChanged(snapshot) => {
                self.replace_snapshot(snapshot)
            }
            ExplorerEvent::FileUploaded(raw) => {
                // Parse before touching any state: a bad file must leave the
                // active snapshot exactly as it was.
                let snapshot =
                    parse_option_chain(&raw).context("parsing uploaded option chain")?;
                self.replace_snapshot(snapshot)
            }
            ExplorerEvent::OptionSideChanged(side) => {
                self.state.option_side = side;
                if self.is_ready() {
                    self.recompute_surface()?;
                    self.render_surface()?;
                    if self.state.show_2d {
                        self.render_smiles()?;
                    }
                }
                Ok(())
            }
            ExplorerEvent::RateChanged(rate) => {
                self.state.interest_rate = rate;
                self.scalar_changed()
            }
            ExplorerEvent::DividendChanged(dividend_yield) => {
                self.state.dividend_yield = dividend_yield;
                self.scalar_changed()
            }
            ExplorerEvent::PlotTypeChanged(style) => {
                self.state.plot_style = style;
                // Style only affects presentation: reuse the cached vols.
                if self.surface_vols.is_some() {
                    self.render_surface()?;
                }
                Ok(())
            }
            ExplorerEvent::Toggle2D => {
                self.state.show_2d = !self.state.show_2d;
                if !self.is_ready() {
                    return Ok(());
                }
                if self.state.show_2d {
                    self.render_smiles()
                } else {
                    self.clear_smiles()
                }
            }
        }
    }

    /// Interest rate implied by put-call parity over the active chain.
    pub fn implied_parity_rate(&self) -> Result<f64> {
        let snapshot = self
            .state
            .snapshot
            .as_ref()
            .ok_or_else(|| anyhow!("no option chain loaded"))?;
        let spots = vec![snapshot.spot; snapshot.len()];
        self.solver.parity_interest_rate(
            &snapshot.call_prices,
            &snapshot.put_prices,
            &spots,
            &snapshot.call_strikes,
            &snapshot.years_to_expiry,
        )
    }

    fn replace_snapshot(&mut self, snapshot: OptionChainSnapshot) -> Result<()> {
        info!(
            option = %snapshot.option_name,
            contracts = snapshot.len(),
            skipped = snapshot.skipped_rows,
            "activating option chain"
        );
        self.state.snapshot = Some(snapshot);
        self.recompute_surface()?;
        self.render_surface()?;
        if self.state.show_2d {
            self.render_smiles()?;
        }
        Ok(())
    }

    /// Rate or dividend changed: hide the smile panels before the solve so a
    /// drag never pays for a redundant 2D recompute; they come back only via
    /// an explicit toggle.
    fn scalar_changed(&mut self) -> Result<()> {
        if self.state.show_2d {
            self.state.show_2d = false;
            self.clear_smiles()?;
        }
        if self.is_ready() {
            self.recompute_surface()?;
            self.render_surface()?;
        }
        Ok(())
    }

    /// Solve both sides for one path. Both are always solved, whatever side
    /// the surface shows, so the smile panels can draw call and put together.
    fn solve_pair(
        &self,
        snapshot: &OptionChainSnapshot,
        max_iterations: u32,
    ) -> Result<ImpliedVolPair> {
        let n = snapshot.len();
        let spots = vec![snapshot.spot; n];
        let rates = vec![self.state.interest_rate; n];
        let yields = vec![self.state.dividend_yield; n];
        let call = self.solver.implied_vol(
            OptionSide::Call,
            &snapshot.call_prices,
            &spots,
            &snapshot.call_strikes,
            &rates,
            &yields,
            &snapshot.years_to_expiry,
            max_iterations,
            self.solver_config.threshold,
        )?;
        let put = self.solver.implied_vol(
            OptionSide::Put,
            &snapshot.put_prices,
            &spots,
            &snapshot.put_strikes,
            &rates,
            &yields,
            &snapshot.years_to_expiry,
            max_iterations,
            self.solver_config.threshold,
        )?;
        Ok(ImpliedVolPair { call, put })
    }

    fn recompute_surface(&mut self) -> Result<()> {
        let Some(snapshot) = self.state.snapshot.as_ref() else {
            return Ok(());
        };
        let vols = self.solve_pair(snapshot, self.solver_config.surface_max_iterations)?;
        self.surface_vols = Some(vols);
        Ok(())
    }

    fn render_surface(&mut self) -> Result<()> {
        let Some(snapshot) = self.state.snapshot.as_ref() else {
            return Ok(());
        };
        let Some(vols) = self.surface_vols.as_ref() else {
            return Ok(());
        };
        let (side_name, side_vols) = match self.state.option_side {
            OptionSide::Call => ("Call", &vols.call),
            OptionSide::Put => ("Put", &vols.put),
        };
        let cloud = point_cloud(&snapshot.call_strikes, side_vols, &snapshot.years_to_expiry)?;
        debug!(points = cloud.len(), side = side_name, "rendering surface");

        let figure = Figure {
            panel: SURFACE_PANEL.to_string(),
            traces: vec![Trace {
                name: side_name.to_string(),
                style: self.state.plot_style,
                x: CoordSeq::Text(cloud.x),
                y: CoordSeq::Text(cloud.y),
                z: Some(CoordSeq::Text(cloud.z)),
            }],
            layout: Layout {
                title: format!(
                    "Volatility Surface Explorer for {} Current Price {}",
                    snapshot.option_name, snapshot.spot
                ),
                x_label: "Strike Price".to_string(),
                y_label: "Days to Expiry".to_string(),
                z_label: Some("Implied Volatility".to_string()),
            },
        };
        self.sink.draw(&figure)
    }

    fn render_smiles(&mut self) -> Result<()> {
        let Some(snapshot) = self.state.snapshot.as_ref() else {
            return Ok(());
        };
        let vols = self.solve_pair(snapshot, self.solver_config.smile_max_iterations)?;

        // One figure per distinct expiry, targets drawn verbatim from the
        // snapshot so the exact-equality filter matches.
        let expiries = snapshot.distinct_expiries();
        let mut figures = Vec::with_capacity(expiries.len());
        for (i, &expiry) in expiries.iter().enumerate() {
            let call = smile_slice(
                &snapshot.call_strikes,
                &vols.call,
                &snapshot.years_to_expiry,
                expiry,
            )?;
            let put = smile_slice(
                &snapshot.put_strikes,
                &vols.put,
                &snapshot.years_to_expiry,
                expiry,
            )?;
            figures.push(Figure {
                panel: smile_panel(i),
                traces: vec![
                    Trace {
                        name: "Call".to_string(),
                        style: PlotStyle::Markers,
                        x: CoordSeq::Num(call.x),
                        y: CoordSeq::Num(call.y),
                        z: None,
                    },
                    Trace {
                        name: "Put".to_string(),
                        style: PlotStyle::Markers,
                        x: CoordSeq::Num(put.x),
                        y: CoordSeq::Num(put.y),
                        z: None,
                    },
                ],
                layout: Layout {
                    title: format!("Expiry: {:.0} days", expiry * 365.0),
                    x_label: "Strike Price".to_string(),
                    y_label: "Implied Volatility".to_string(),
                    z_label: None,
                },
            });
        }

        debug!(panels = figures.len(), "rendering smile panels");
        let previous = self.smile_panels;
        for figure in &figures {
            self.sink.draw(figure)?;
        }
        // A smaller chain leaves stale panels behind; clear the excess.
        for i in figures.len()..previous {
            self.sink.clear(&smile_panel(i))?;
        }
        self.smile_panels = figures.len();
        Ok(())
    }

    fn clear_smiles(&mut self) -> Result<()> {
        for i in 0..self.smile_panels {
            self.sink.clear(&smile_panel(i))?;
        }
        self.smile_panels = 0;
        Ok(())
    }
}
