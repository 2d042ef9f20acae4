//! # Surface-Explorer: Option Chain Ingestion and Volatility Surface Plots
//!
//! `surface-explorer` turns a delayed-quote option chain text export into
//! renderer-ready volatility surface coordinates. The pipeline runs in three
//! stages: the chain parser normalizes the export into aligned per-contract
//! arrays, an implied-volatility solver prices each contract back to a vol,
//! and the surface reduction filters, rounds, and deduplicates the results
//! into 2D smile slices and a 3D point cloud. A reactive controller wires
//! the stages together and redrives them on every user parameter change.
//!
//! ## Core Features
//!
//! - **Chain parsing**: tolerant line/field parser for the mixed-format
//!   export (metadata header rows plus fixed-width data rows), with
//!   calendar-based time-to-expiry arithmetic
//! - **Surface reduction**: deduplicated smile and surface point sets with
//!   pinned rounding semantics
//! - **Newton-Raphson solver**: per-contract implied vol with a bracketing
//!   fallback, plus a put-call-parity rate estimate
//! - **Pluggable boundaries**: solver and rendering sink sit behind traits;
//!   an SVG sink backed by `plotters` ships with the crate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use surface_explorer::{
//!     parse_option_chain, ExplorerConfig, ExplorerEvent, NewtonRaphsonSolver,
//!     SurfaceController, SvgRenderSink,
//! };
//!
//! // Load and parse a chain export
//! let raw = std::fs::read_to_string("SPYQuoteData.dat")?;
//! let snapshot = parse_option_chain(&raw)?;
//!
//! // Wire the controller to the shipped solver and SVG sink
//! let sink = SvgRenderSink::new("plots")?;
//! let mut controller = SurfaceController::new(
//!     Box::new(NewtonRaphsonSolver::default()),
//!     Box::new(sink),
//!     ExplorerConfig::default(),
//! );
//!
//! // First dataset renders the 3D surface; the toggle adds smile panels
//! controller.handle(ExplorerEvent::DataLoaded(snapshot))?;
//! controller.handle(ExplorerEvent::Toggle2D)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Event Model
//!
//! The controller reacts to discrete events ([`ExplorerEvent`]): dataset
//! loads and uploads, option side changes, rate and dividend changes, plot
//! style switches, and the 2D panel toggle. Each event triggers a fixed
//! recompute-and-render sequence; see the [`controller`] module.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod chain;
pub mod controller;
pub mod render;
pub mod solver;
pub mod surface;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Chain ingestion
pub use chain::{month_day_offset, parse_option_chain, ChainParseError, OptionChainSnapshot};

// Controller and configuration
pub use controller::{
    ControllerState, ExplorerConfig, ExplorerEvent, SolverConfig, SurfaceController, SURFACE_PANEL,
};

// Rendering boundary
pub use render::{CoordSeq, Figure, Layout, PlotStyle, RenderSink, SvgRenderSink, Trace};

// Solver boundary
pub use solver::{ImpliedVolSolver, NewtonRaphsonSolver, OptionSide};

// Surface reduction
pub use surface::{point_cloud, round_to_decimal_places, smile_slice, PointCloud, SmileSlice};
