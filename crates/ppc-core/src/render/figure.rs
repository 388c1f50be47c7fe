//! Declarative figure model.
//!
//! A [`Figure`] describes everything that ends up on the canvas: panel
//! layout, bars, markers, bands and their labels. It holds no drawing
//! backend; [`super::export`] turns it into pixels or SVG.

use ppc_common::{Error, ObservationId, Result};
use ppc_config::FigureSize;
use ppc_math::Histogram;

use crate::summary::SummaryRecord;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
}

/// Histogram bar fill.
pub const BAR_COLOR: Rgb = Rgb(0x2E, 0x86, 0xAB);
pub const BAR_ALPHA: f64 = 0.7;
/// Central interval band fill.
pub const BAND_COLOR: Rgb = Rgb(0x45, 0x7B, 0x9D);
pub const BAND_ALPHA: f64 = 0.4;
/// Opacity of grid lines.
pub const GRID_ALPHA: f64 = 0.3;

pub const X_LABEL: &str = "Predicted y";
pub const Y_LABEL: &str = "Density";

/// Stroke of a vertical marker line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: u32,
    pub dashed: bool,
}

impl LineStyle {
    /// Observed value: solid red.
    pub const OBSERVED: LineStyle = LineStyle {
        color: Rgb::RED,
        width: 3,
        dashed: false,
    };

    /// Predictive mean: dashed black.
    pub const MEAN: LineStyle = LineStyle {
        color: Rgb::BLACK,
        width: 2,
        dashed: true,
    };
}

/// Vertical line at `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub label: String,
    pub style: LineStyle,
}

/// Shaded vertical band spanning `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
    pub color: Rgb,
    pub alpha: f64,
}

/// Panel grid dimensions, filled row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Two columns, as many rows as needed. Four panels give 2×2.
    pub fn two_column(n_panels: usize) -> Self {
        let cols = n_panels.clamp(1, 2);
        GridLayout {
            rows: n_panels.div_ceil(cols).max(1),
            cols,
        }
    }

    /// One row of `n_panels`.
    pub fn single_row(n_panels: usize) -> Self {
        GridLayout {
            rows: 1,
            cols: n_panels.max(1),
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// `(row, col)` of the `index`-th panel.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

/// One observation's subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: ObservationId,
    /// Summary the markers and band were drawn from.
    pub summary: SummaryRecord,
    pub title: String,
    pub histogram: Histogram,
    pub observed: Marker,
    pub mean: Marker,
    pub interval: Band,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
}

impl Panel {
    /// Legend entries in drawing order.
    pub fn legend_labels(&self) -> [&str; 3] {
        [
            self.observed.label.as_str(),
            self.mean.label.as_str(),
            self.interval.label.as_str(),
        ]
    }

    /// Horizontal extent covering bars, markers and band, with a 5% margin.
    pub fn x_range(&self) -> (f64, f64) {
        let edges = &self.histogram.edges;
        let points = [
            edges.first().copied().unwrap_or(self.mean.x),
            edges.last().copied().unwrap_or(self.mean.x),
            self.observed.x,
            self.mean.x,
            self.interval.lower,
            self.interval.upper,
        ];
        let lo = points.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let pad = (hi * 0.05 - lo * 0.05).max(f64::EPSILON);
        ((lo - pad).max(f64::MIN), (hi + pad).min(f64::MAX))
    }

    /// Top of the density axis.
    pub fn y_max(&self) -> f64 {
        let max = self.histogram.max_density();
        if max > 0.0 {
            max * 1.05
        } else {
            1.0
        }
    }
}

/// Multi-panel figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub size: FigureSize,
    pub layout: GridLayout,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Canvas size in pixels at `dpi`.
    pub fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        (
            (self.size.width() * dpi).round().max(1.0) as u32,
            (self.size.height() * dpi).round().max(1.0) as u32,
        )
    }

    /// First panel showing `id`.
    pub fn panel(&self, id: ObservationId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.title.as_str()).collect()
    }

    /// Per-panel summaries, in panel order.
    pub fn summaries(&self) -> Vec<&SummaryRecord> {
        self.panels.iter().map(|p| &p.summary).collect()
    }
}

/// Panel title wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// `Row {id}: Posterior Predictive Distribution`
    Distribution,
    /// `Row {id}`
    Short,
}

impl TitleStyle {
    fn title(self, id: ObservationId) -> String {
        match self {
            TitleStyle::Distribution => format!("Row {}: Posterior Predictive Distribution", id),
            TitleStyle::Short => format!("Row {}", id),
        }
    }
}

/// Builds a [`Figure`] from summary records.
#[derive(Debug, Clone)]
pub struct FigureBuilder {
    size: FigureSize,
    layout: GridLayout,
    bins: usize,
    title_style: TitleStyle,
}

impl FigureBuilder {
    pub fn new(size: FigureSize, layout: GridLayout) -> Self {
        FigureBuilder {
            size,
            layout,
            bins: 50,
            title_style: TitleStyle::Short,
        }
    }

    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn title_style(mut self, style: TitleStyle) -> Self {
        self.title_style = style;
        self
    }

    /// One panel per record, in record order.
    pub fn build(&self, records: Vec<SummaryRecord>) -> Result<Figure> {
        if self.bins == 0 {
            return Err(Error::InvalidArgument(
                "histogram bin count must be at least 1".to_string(),
            ));
        }
        check_size(self.size)?;
        if records.len() > self.layout.cells() {
            return Err(Error::Render(format!(
                "{} panels do not fit a {}x{} grid",
                records.len(),
                self.layout.rows,
                self.layout.cols
            )));
        }

        let panels = records
            .into_iter()
            .map(|rec| self.panel(rec))
            .collect::<Result<Vec<_>>>()?;

        Ok(Figure {
            size: self.size,
            layout: self.layout,
            panels,
        })
    }

    fn panel(&self, rec: SummaryRecord) -> Result<Panel> {
        if ![rec.observed, rec.mean, rec.lower, rec.upper]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(Error::Render(format!(
                "summary of observation {} is not finite",
                rec.id
            )));
        }
        let histogram = Histogram::density(&rec.draws, self.bins).ok_or_else(|| {
            Error::Render(format!("cannot bin draw pool of observation {}", rec.id))
        })?;

        Ok(Panel {
            id: rec.id,
            title: self.title_style.title(rec.id),
            histogram,
            observed: Marker {
                x: rec.observed,
                label: format!("Observed: {:.2}", rec.observed),
                style: LineStyle::OBSERVED,
            },
            mean: Marker {
                x: rec.mean,
                label: format!("Mean pred: {:.2}", rec.mean),
                style: LineStyle::MEAN,
            },
            interval: Band {
                lower: rec.lower,
                upper: rec.upper,
                label: format!(
                    "{}% CI: [{:.2}, {:.2}]",
                    level_percent(rec.level),
                    rec.lower,
                    rec.upper
                ),
                color: BAND_COLOR,
                alpha: BAND_ALPHA,
            },
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            grid: true,
            summary: rec,
        })
    }
}

fn check_size(size: FigureSize) -> Result<()> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if !ok(size.width()) || !ok(size.height()) {
        return Err(Error::InvalidArgument(format!(
            "figure size must be positive, got {}",
            size
        )));
    }
    Ok(())
}

/// `0.95` -> `"95"`, `0.975` -> `"97.5"`.
pub fn level_percent(level: f64) -> String {
    let pct = level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}", pct)
    } else {
        let s = format!("{:.4}", pct);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
