//! SVG adapter for the rendering sink contract, one file per panel.

use std::path::PathBuf;

use anyhow::{Context, Result};
use plotters::prelude::*;

use super::{Figure, PlotStyle, RenderSink, Trace};

const SMILE_SIZE: (u32, u32) = (1280, 768);
const SURFACE_SIZE: (u32, u32) = (800, 800);

/// Trace colors cycle through this palette in order.
const TRACE_COLORS: [RGBColor; 4] = [RED, BLUE, GREEN, MAGENTA];

/// Renders each panel to `<out_dir>/<panel>.svg`.
pub struct SvgRenderSink {
    out_dir: PathBuf,
}

impl SvgRenderSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating plot directory {}", out_dir.display()))?;
        Ok(Self { out_dir })
    }

    fn panel_path(&self, panel: &str) -> PathBuf {
        self.out_dir.join(format!("{panel}.svg"))
    }
}

/// Span of one coordinate across all traces, padded so plotters never sees a
/// zero-width range.
fn axis_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.05).max(1e-6);
    (min - pad, max + pad)
}

struct NumericTrace {
    style: PlotStyle,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Option<Vec<f64>>,
}

fn numeric_traces(figure: &Figure) -> Result<Vec<NumericTrace>> {
    figure
        .traces
        .iter()
        .map(|t: &Trace| {
            Ok(NumericTrace {
                style: t.style,
                x: t.x.to_f64()?,
                y: t.y.to_f64()?,
                z: t.z.as_ref().map(|z| z.to_f64()).transpose()?,
            })
        })
        .collect()
}

fn draw_smile(path: &std::path::Path, figure: &Figure, traces: &[NumericTrace]) -> Result<()> {
    let xs: Vec<f64> = traces.iter().flat_map(|t| t.x.iter().copied()).collect();
    let ys: Vec<f64> = traces.iter().flat_map(|t| t.y.iter().copied()).collect();
    let (x_min, x_max) = axis_range(&xs);
    let (y_min, y_max) = axis_range(&ys);

    let root = SVGBackend::new(path, SMILE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&figure.layout.title, ("sans-serif", 30))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(figure.layout.x_label.as_str())
        .y_desc(figure.layout.y_label.as_str())
        .draw()?;

    for (i, trace) in traces.iter().enumerate() {
        let color = TRACE_COLORS[i % TRACE_COLORS.len()];
        let points: Vec<(f64, f64)> =
            trace.x.iter().copied().zip(trace.y.iter().copied()).collect();
        match trace.style {
            PlotStyle::Lines => {
                chart.draw_series(std::iter::once(PathElement::new(
                    points,
                    color.stroke_width(1),
                )))?;
            }
            _ => {
                chart.draw_series(points.iter().map(|pt| Circle::new(*pt, 2, color.filled())))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

fn draw_surface(path: &std::path::Path, figure: &Figure, traces: &[NumericTrace]) -> Result<()> {
    let xs: Vec<f64> = traces.iter().flat_map(|t| t.x.iter().copied()).collect();
    let ys: Vec<f64> = traces.iter().flat_map(|t| t.y.iter().copied()).collect();
    let zs: Vec<f64> = traces
        .iter()
        .flat_map(|t| t.z.iter().flat_map(|z| z.iter().copied()))
        .collect();
    let (x_min, x_max) = axis_range(&xs);
    let (y_min, y_max) = axis_range(&ys);
    let (z_min, z_max) = axis_range(&zs);

    let root = SVGBackend::new(path, SURFACE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&figure.layout.title, ("sans-serif", 30))
        // Vol on the vertical axis, days into the depth axis.
        .build_cartesian_3d(x_min..x_max, z_min..z_max, y_min..y_max)?;

    chart.with_projection(|mut pb| {
        pb.pitch = 0.3;
        pb.yaw = 0.8;
        pb.into_matrix()
    });
    chart.configure_axes().draw()?;

    for (i, trace) in traces.iter().enumerate() {
        let color = TRACE_COLORS[i % TRACE_COLORS.len()];
        let Some(z) = &trace.z else { continue };
        let points: Vec<(f64, f64, f64)> = trace
            .x
            .iter()
            .zip(trace.y.iter())
            .zip(z.iter())
            .map(|((&x, &y), &v)| (x, v, y))
            .collect();
        match trace.style {
            PlotStyle::Lines => {
                chart.draw_series(std::iter::once(PathElement::new(
                    points,
                    color.stroke_width(1),
                )))?;
            }
            // No scattered-mesh primitive in plotters; mesh and surface
            // styles draw the deduplicated vertex cloud.
            _ => {
                chart.draw_series(points.iter().map(|pt| Circle::new(*pt, 2, color.filled())))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

impl RenderSink for SvgRenderSink {
    fn draw(&mut self, figure: &Figure) -> Result<()> {
        let traces = numeric_traces(figure)?;
        if traces.iter().all(|t| t.x.is_empty()) {
            // Nothing to plot; leave the panel cleared rather than emitting
            // an empty chart with degenerate axes.
            return self.clear(&figure.panel);
        }

        let path = self.panel_path(&figure.panel);
        let is_3d = traces.iter().any(|t| t.z.is_some());
        if is_3d {
            draw_surface(&path, figure, &traces)
                .with_context(|| format!("rendering 3D panel {}", figure.panel))
        } else {
            draw_smile(&path, figure, &traces)
                .with_context(|| format!("rendering 2D panel {}", figure.panel))
        }
    }

    fn clear(&mut self, panel: &str) -> Result<()> {
        match std::fs::remove_file(self.panel_path(panel)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("clearing panel {panel}")),
        }
    }
}
