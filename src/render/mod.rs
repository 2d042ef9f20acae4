//! Rendering sink boundary.
//!
//! The controller hands fully-reduced coordinate arrays plus layout metadata
//! to a [`RenderSink`] and nothing else; the sink is a pure consumer with no
//! state the controller can observe. [`SvgRenderSink`] draws panels to SVG
//! files via `plotters`.

pub mod svg;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub use svg::SvgRenderSink;

/// Presentation mode for the 3D cloud (2D smiles always draw markers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    #[default]
    Mesh,
    Surface,
    Markers,
    Lines,
}

/// One coordinate sequence: the smile path hands the sink numbers, the
/// surface path hands it the reducer's text-encoded numerics.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordSeq {
    Num(Vec<f64>),
    Text(Vec<String>),
}

impl CoordSeq {
    pub fn len(&self) -> usize {
        match self {
            CoordSeq::Num(v) => v.len(),
            CoordSeq::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the sequence, parsing text entries.
    pub fn to_f64(&self) -> Result<Vec<f64>> {
        match self {
            CoordSeq::Num(v) => Ok(v.clone()),
            CoordSeq::Text(v) => v
                .iter()
                .map(|s| {
                    s.parse()
                        .map_err(|_| anyhow!("non-numeric plot coordinate: {s:?}"))
                })
                .collect(),
        }
    }
}

/// A single series within a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub style: PlotStyle,
    pub x: CoordSeq,
    pub y: CoordSeq,
    pub z: Option<CoordSeq>,
}

/// Axis titles and caption for one panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub z_label: Option<String>,
}

/// Everything the sink needs to draw one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Panel identity; redrawing the same panel replaces its content.
    pub panel: String,
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

/// Drawing backend contract: accept a figure, or clear a panel previously
/// drawn. Stateless across calls from the caller's point of view.
pub trait RenderSink {
    fn draw(&mut self, figure: &Figure) -> Result<()>;
    fn clear(&mut self, panel: &str) -> Result<()>;
}
