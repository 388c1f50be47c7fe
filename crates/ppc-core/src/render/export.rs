//! Drawing a [`Figure`] with plotters.
//!
//! Sizes are given in inches and converted at a DPI (100 unless stated);
//! font sizes follow from points at the same DPI.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use ppc_common::{Error, Result};
use tracing::debug;

use super::figure::{Figure, LineStyle, Panel, Rgb, BAR_ALPHA, BAR_COLOR, GRID_ALPHA};

/// Pixels per inch used by [`Figure::save`] and [`Figure::to_svg_string`].
pub const DEFAULT_DPI: f64 = 100.0;

const TITLE_PT: f64 = 12.0;
const LABEL_PT: f64 = 10.0;
const LEGEND_PT: f64 = 9.0;

/// File format chosen from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("svg") => Ok(ExportFormat::Svg),
            Some("png") => Ok(ExportFormat::Png),
            Some(other) => Err(Error::UnsupportedExportFormat(format!(".{}", other))),
            None => Err(Error::UnsupportedExportFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Figure {
    /// Write the figure to `path` as SVG or PNG at [`DEFAULT_DPI`].
    pub fn save(&self, path: &Path) -> Result<ExportFormat> {
        self.save_with_dpi(path, DEFAULT_DPI)
    }

    pub fn save_with_dpi(&self, path: &Path, dpi: f64) -> Result<ExportFormat> {
        let format = ExportFormat::from_path(path)?;
        check_dpi(dpi)?;
        let size = self.pixel_size(dpi);

        match format {
            ExportFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw_figure(self, &root, dpi)?;
            }
            ExportFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw_figure(self, &root, dpi)?;
            }
        }

        debug!(
            path = %path.display(),
            %format,
            width = size.0,
            height = size.1,
            "figure written"
        );
        Ok(format)
    }

    /// Render to an SVG document in memory at [`DEFAULT_DPI`].
    pub fn to_svg_string(&self) -> Result<String> {
        self.to_svg_string_with_dpi(DEFAULT_DPI)
    }

    pub fn to_svg_string_with_dpi(&self, dpi: f64) -> Result<String> {
        check_dpi(dpi)?;
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, self.pixel_size(dpi)).into_drawing_area();
            draw_figure(self, &root, dpi)?;
        }
        Ok(buf)
    }
}

fn check_dpi(dpi: f64) -> Result<()> {
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "dpi must be positive, got {}",
            dpi
        )));
    }
    Ok(())
}

fn render_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn line_style(style: LineStyle) -> ShapeStyle {
    color(style.color).stroke_width(style.width)
}

fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    dpi: f64,
) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let cells = root.split_evenly((figure.layout.rows, figure.layout.cols));
    for (panel, area) in figure.panels.iter().zip(cells.iter()) {
        draw_panel(panel, area, dpi)?;
    }

    root.present().map_err(render_err)
}

fn draw_panel<DB: DrawingBackend>(
    panel: &Panel,
    area: &DrawingArea<DB, Shift>,
    dpi: f64,
) -> Result<()> {
    let px = |pt: f64| pt * dpi / 72.0;
    let (x_lo, x_hi) = panel.x_range();
    let y_max = panel.y_max();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", px(TITLE_PT)))
        .margin(px(6.0) as u32)
        .x_label_area_size(px(28.0) as u32)
        .y_label_area_size(px(40.0) as u32)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_max)
        .map_err(render_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .axis_desc_style(("sans-serif", px(LABEL_PT)))
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(WHITE.mix(0.0));
    if !panel.grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(render_err)?;

    // Bars
    let bar_fill = color(BAR_COLOR).mix(BAR_ALPHA).filled();
    chart
        .draw_series(
            panel
                .histogram
                .bars()
                .map(|(l, r, d)| Rectangle::new([(l, 0.0), (r, d)], bar_fill)),
        )
        .map_err(render_err)?;
    chart
        .draw_series(
            panel
                .histogram
                .bars()
                .map(|(l, r, d)| Rectangle::new([(l, 0.0), (r, d)], BLACK.stroke_width(1))),
        )
        .map_err(render_err)?;

    // Interval band, labelled after the markers so the legend order is
    // observed, mean, interval.
    let band_fill = color(panel.interval.color).mix(panel.interval.alpha).filled();
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(panel.interval.lower, 0.0), (panel.interval.upper, y_max)],
            band_fill,
        )))
        .map_err(render_err)?;

    let observed = line_style(panel.observed.style);
    chart
        .draw_series(vertical_line(
            panel.observed.x,
            y_max,
            panel.observed.style.dashed,
            observed,
        ))
        .map_err(render_err)?
        .label(panel.observed.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], observed));

    let mean = line_style(panel.mean.style);
    chart
        .draw_series(vertical_line(panel.mean.x, y_max, panel.mean.style.dashed, mean))
        .map_err(render_err)?
        .label(panel.mean.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], mean));

    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
        .map_err(render_err)?
        .label(panel.interval.label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], band_fill));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", px(LEGEND_PT)))
        .background_style(WHITE.mix(0.0))
        .border_style(WHITE.mix(0.0))
        .draw()
        .map_err(render_err)?;

    Ok(())
}

/// Vertical line from 0 to `top`, split into dashes when `dashed`.
fn vertical_line(
    x: f64,
    top: f64,
    dashed: bool,
    style: ShapeStyle,
) -> Vec<PathElement<(f64, f64)>> {
    if !dashed {
        return vec![PathElement::new(vec![(x, 0.0), (x, top)], style)];
    }
    let dash = top / 24.0;
    let mut segments = Vec::new();
    let mut y = 0.0;
    while y < top {
        let end = (y + dash).min(top);
        segments.push(PathElement::new(vec![(x, y), (x, end)], style));
        y += dash * 1.6;
    }
    segments
}
