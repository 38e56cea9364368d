use crate::config::Params;
use crate::ir::{CallData, PlotKind, RenderCall, Role};
use crate::scale::{axis_range, Extent};
use crate::stats::{box_summary, histogram, BoxSummary};
use crate::{palette, OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Turns a render plan into image bytes
pub trait Renderer {
    fn render(&self, calls: &[RenderCall]) -> Result<Vec<u8>>;
}

/// plotters-backed renderer producing PNG or SVG
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    options: RenderOptions,
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

impl Canvas {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for Canvas {
    fn render(&self, calls: &[RenderCall]) -> Result<Vec<u8>> {
        let primary = match calls.first() {
            Some(call) if call.role == Role::Primary => call,
            Some(_) => anyhow::bail!("Render plan must start with a primary call"),
            None => anyhow::bail!("Render plan is empty"),
        };

        let unused = primary.params.unused_by_renderer();
        if !unused.is_empty() {
            log::debug!("not used by the image renderer: {}", unused.join(", "));
        }

        let width = primary.params.width.unwrap_or(self.options.width);
        let height = primary.params.height.unwrap_or(self.options.height);
        let pixels = pixel_bytes(width, height)?;

        match self.options.format {
            OutputFormat::Png => {
                let mut buffer = vec![0u8; pixels];
                {
                    let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
                        .into_drawing_area();
                    draw_plan(&root, calls)?;
                    root.present().context("Failed to present drawing")?;
                }
                encode_png(&buffer, width, height)
            }
            OutputFormat::Svg => {
                let mut svg = String::new();
                {
                    let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                    draw_plan(&root, calls)?;
                    root.present().context("Failed to present drawing")?;
                }
                Ok(svg.into_bytes())
            }
        }
    }
}

/// Largest accepted image side, in pixels
const MAX_SIDE: u32 = 16_384;

/// Size of an RGB buffer for the image, rejecting empty and oversized images
fn pixel_bytes(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        anyhow::bail!("Image size {}x{} has no pixels", width, height);
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        anyhow::bail!("Image size {}x{} exceeds the {} pixel limit per side", width, height, MAX_SIDE);
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| anyhow::anyhow!("Image size {}x{} is too large", width, height))
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(buffer, width, height, image::ColorType::Rgb8)
        .context("Failed to encode PNG")?;
    Ok(png_bytes)
}

fn draw_plan<DB>(root: &DrawingArea<DB, Shift>, calls: &[RenderCall]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let primary = &calls[0];
    match primary.kind {
        PlotKind::Bar => draw_bars(root, primary),
        PlotKind::Histogram => draw_histogram(root, primary),
        PlotKind::Line | PlotKind::Scatter | PlotKind::Density => draw_xy(root, calls),
        PlotKind::Boxplot => draw_boxes(root, calls),
    }
}

fn build_chart<'a, DB>(
    root: &'a DrawingArea<DB, Shift>,
    params: &Params,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<Chart<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    ChartBuilder::on(root)
        .margin(params.margin.unwrap_or(10))
        .caption(params.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")
}

/// Axes, grid and tick labels. Categorical axes get one tick per category.
fn draw_mesh<DB>(
    chart: &mut Chart<'_, DB>,
    params: &Params,
    x_categories: Option<&[String]>,
    y_categories: Option<&[String]>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if params.border.as_deref() == Some("none") {
        return Ok(());
    }

    let x_fmt = |v: &f64| category_at(x_categories.unwrap_or(&[]), *v);
    let y_fmt = |v: &f64| category_at(y_categories.unwrap_or(&[]), *v);

    let mut mesh = chart.configure_mesh();
    if !params.grid.unwrap_or(true) {
        mesh.disable_mesh();
    }
    if let Some(label) = &params.xlabel {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &params.ylabel {
        mesh.y_desc(label.as_str());
    }
    if let Some(categories) = x_categories {
        mesh.x_labels(categories.len()).x_label_formatter(&x_fmt);
    }
    if let Some(categories) = y_categories {
        mesh.y_labels(categories.len()).y_label_formatter(&y_fmt);
    }
    if !params.labels.unwrap_or(true) {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw().context("Failed to draw mesh")?;
    Ok(())
}

/// Label of the category at integer position `v`, empty between categories
fn category_at(categories: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

fn draw_legend<'a, DB>(chart: &mut Chart<'a, DB>) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("Failed to draw legend")
}

/// Vertical bars, one per label
fn draw_bars<DB>(root: &DrawingArea<DB, Shift>, call: &RenderCall) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let CallData::Bars { labels, values } = &call.data else {
        anyhow::bail!("Bar plot expects labelled values");
    };
    if labels.is_empty() {
        anyhow::bail!("Cannot create bar chart with no data");
    }

    let params = &call.params;
    let extent = Extent::of(values.iter().copied()).map(|e| e.include(0.0));
    let x_range = -0.5..(labels.len() as f64 - 0.5);
    let mut chart = build_chart(root, params, x_range, axis_range(params.ylim, extent))?;
    draw_mesh(&mut chart, params, Some(labels), None)?;

    let color = palette::resolve(params.color.as_ref(), 0);
    let bar_width = 0.8;
    chart
        .draw_series(values.iter().enumerate().map(|(idx, &v)| {
            let x_center = idx as f64;
            Rectangle::new(
                [(x_center - bar_width / 2.0, 0.0), (x_center + bar_width / 2.0, v)],
                color.filled(),
            )
        }))
        .context("Failed to draw bars")?;
    Ok(())
}

fn draw_histogram<DB>(root: &DrawingArea<DB, Shift>, call: &RenderCall) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let CallData::Values { values } = &call.data else {
        anyhow::bail!("Histogram expects a value series");
    };

    let params = &call.params;
    let bins = histogram(values, params.nbins, params.closed.unwrap_or_default());
    if bins.is_empty() {
        anyhow::bail!("Cannot create histogram with no numeric values");
    }

    let x_extent = Extent::of(bins.iter().flat_map(|b| [b.lower, b.upper]));
    let y_extent = Extent::of(bins.iter().map(|b| b.count as f64)).map(|e| e.include(0.0));
    let mut chart = build_chart(
        root,
        params,
        axis_range(params.xlim, x_extent),
        axis_range(params.ylim, y_extent),
    )?;
    draw_mesh(&mut chart, params, None, None)?;

    let color = palette::resolve(params.color.as_ref(), 0);
    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], color.mix(0.8).filled())
        }))
        .context("Failed to draw histogram")?;
    Ok(())
}

/// Points where both coordinates are present and finite, split into runs
/// at every gap
fn segments(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = vec![Vec::new()];
    for pair in x.iter().zip(y) {
        match pair {
            (Some(px), Some(py)) if px.is_finite() && py.is_finite() => {
                if let Some(run) = runs.last_mut() {
                    run.push((*px, *py));
                }
            }
            _ => {
                if runs.last().is_some_and(|r| !r.is_empty()) {
                    runs.push(Vec::new());
                }
            }
        }
    }
    runs.retain(|r| !r.is_empty());
    runs
}

/// Line, scatter and density plots share one canvas for all calls
fn draw_xy<DB>(root: &DrawingArea<DB, Shift>, calls: &[RenderCall]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let xy: Vec<(&[Option<f64>], &[Option<f64>])> = calls
        .iter()
        .map(|call| match &call.data {
            CallData::Xy { x, y } => Ok((x.as_slice(), y.as_slice())),
            _ => Err(anyhow::anyhow!("{:?} plot expects x/y series", call.kind)),
        })
        .collect::<Result<_>>()?;

    let params = &calls[0].params;
    let x_extent = Extent::of_all(xy.iter().map(|(x, _)| *x));
    let y_extent = Extent::of_all(xy.iter().map(|(_, y)| *y));
    let mut chart = build_chart(
        root,
        params,
        axis_range(params.xlim, x_extent),
        axis_range(params.ylim, y_extent),
    )?;
    draw_mesh(&mut chart, params, None, None)?;

    let mut labelled = false;
    for (i, (call, (x, y))) in calls.iter().zip(xy).enumerate() {
        let color = palette::series_color(params.color.as_ref(), i);
        let runs = segments(x, y);

        let anno = match call.kind {
            PlotKind::Line => chart
                .draw_series(runs.into_iter().map(|run| PathElement::new(run, color.stroke_width(2))))
                .context("Failed to draw line series")?,
            PlotKind::Scatter => chart
                .draw_series(runs.into_iter().flatten().map(|p| Circle::new(p, 3, color.filled())))
                .context("Failed to draw point series")?,
            _ => chart
                .draw_series(
                    runs.into_iter()
                        .flatten()
                        .map(|p| Circle::new(p, 2, color.mix(0.25).filled())),
                )
                .context("Failed to draw density series")?,
        };

        if let Some(name) = &call.params.name {
            labelled = true;
            anno.label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], color.stroke_width(2)));
        }
    }

    if labelled {
        draw_legend(&mut chart)?;
    }
    Ok(())
}

/// Computed geometry for one horizontal box, in data coordinates
struct BoxplotGeometry {
    lower_whisker: Vec<(f64, f64)>,
    upper_whisker: Vec<(f64, f64)>,
    min_cap: Vec<(f64, f64)>,
    max_cap: Vec<(f64, f64)>,
    box_corners: [(f64, f64); 2],
    median_line: Vec<(f64, f64)>,
    outlier_points: Vec<(f64, f64)>,
}

fn compute_boxplot_geometry(row: f64, width: f64, s: &BoxSummary) -> BoxplotGeometry {
    let half_width = width / 2.0;
    let cap_half = width * 0.2;

    BoxplotGeometry {
        lower_whisker: vec![(s.lower_whisker, row), (s.q1, row)],
        upper_whisker: vec![(s.q3, row), (s.upper_whisker, row)],
        min_cap: vec![(s.lower_whisker, row - cap_half), (s.lower_whisker, row + cap_half)],
        max_cap: vec![(s.upper_whisker, row - cap_half), (s.upper_whisker, row + cap_half)],
        box_corners: [(s.q1, row - half_width), (s.q3, row + half_width)],
        median_line: vec![(s.median, row - half_width), (s.median, row + half_width)],
        outlier_points: s.outliers.iter().map(|&v| (v, row)).collect(),
    }
}

/// Horizontal box plot; the first call is the top row
fn draw_boxes<DB>(root: &DrawingArea<DB, Shift>, calls: &[RenderCall]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut names = Vec::with_capacity(calls.len());
    let mut summaries = Vec::with_capacity(calls.len());
    for call in calls {
        let CallData::Distribution { label, values } = &call.data else {
            anyhow::bail!("Box plot expects distributions");
        };
        if let Some(summary) = box_summary(values) {
            names.push(label.clone());
            summaries.push(summary);
        } else {
            log::warn!("skipping box '{}': no numeric values", label);
        }
    }
    if summaries.is_empty() {
        anyhow::bail!("Cannot create box plot with no numeric values");
    }

    let params = &calls[0].params;
    let x_extent = summaries
        .iter()
        .filter_map(|s| {
            Extent::of(s.outliers.iter().copied().chain([s.lower_whisker, s.upper_whisker]))
        })
        .reduce(Extent::merge);

    // Categories read top to bottom
    let rows = summaries.len();
    let row_of = |i: usize| (rows - 1 - i) as f64;
    let row_labels: Vec<String> = (0..rows).map(|r| names[rows - 1 - r].clone()).collect();

    let mut chart = build_chart(
        root,
        params,
        axis_range(params.xlim, x_extent),
        -0.5..(rows as f64 - 0.5),
    )?;
    draw_mesh(&mut chart, params, None, Some(&row_labels))?;

    for (i, summary) in summaries.iter().enumerate() {
        let color = palette::resolve(calls[0].params.color.as_ref(), i);
        let g = compute_boxplot_geometry(row_of(i), 0.6, summary);
        let line = color.stroke_width(2);

        chart
            .draw_series(std::iter::once(Rectangle::new(g.box_corners, color.mix(0.3).filled())))
            .context("Failed to draw box")?;
        chart
            .draw_series(std::iter::once(Rectangle::new(g.box_corners, line)))
            .context("Failed to draw box outline")?;
        chart
            .draw_series(
                [g.lower_whisker, g.upper_whisker, g.min_cap, g.max_cap, g.median_line]
                    .into_iter()
                    .map(|points| PathElement::new(points, line)),
            )
            .context("Failed to draw whiskers")?;
        chart
            .draw_series(g.outlier_points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
            .context("Failed to draw outliers")?;
    }
    Ok(())
}
