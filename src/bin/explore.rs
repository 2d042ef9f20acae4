//! Surface Explorer CLI
//!
//! Parses an option chain export and renders the volatility surface (and the
//! per-expiry smile panels) to SVG files.
//!
//! Usage:
//!     explore <export_file> [out_dir]
//!
//! `out_dir` defaults to `plots/`. Set `RUST_LOG=surface_explorer=debug` to
//! watch the event flow.

use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use surface_explorer::{
    parse_option_chain, ExplorerConfig, ExplorerEvent, NewtonRaphsonSolver, SurfaceController,
    SvgRenderSink,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <export_file> [out_dir]\nExample: {} SPYQuoteData.dat plots",
            args[0], args[0]
        );
        std::process::exit(1);
    }
    let export_path = &args[1];
    let out_dir = args.get(2).map(String::as_str).unwrap_or("plots");

    let raw = std::fs::read_to_string(export_path)
        .with_context(|| format!("reading export {export_path}"))?;
    let snapshot = parse_option_chain(&raw)?;

    println!("Parsed option chain for {}", snapshot.option_name);
    println!("  Quote: {}", snapshot.time_label);
    println!("  Spot: {}", snapshot.spot);
    println!(
        "  Contracts: {} ({} rows skipped)",
        snapshot.len(),
        snapshot.skipped_rows
    );
    println!("  Expiries: {}", snapshot.distinct_expiries().len());

    let sink = SvgRenderSink::new(out_dir)?;
    let mut controller = SurfaceController::new(
        Box::new(NewtonRaphsonSolver::default()),
        Box::new(sink),
        ExplorerConfig::default(),
    );

    controller.handle(ExplorerEvent::DataLoaded(snapshot))?;
    controller.handle(ExplorerEvent::Toggle2D)?;

    match controller.implied_parity_rate() {
        Ok(rate) => println!("  Parity interest rate: {:.4}%", rate * 100.0),
        Err(e) => println!("  Parity interest rate unavailable: {e}"),
    }

    println!("Charts written to {out_dir}/");
    Ok(())
}
