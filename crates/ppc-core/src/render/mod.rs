//! Posterior predictive figures.
//!
//! Two procedures build a [`Figure`] from inference data:
//! - [`plot_posterior_predictive_distribution`] samples rows at random and
//!   lays them out two per row (2×2 for the default four rows).
//! - [`plot_posterior_predictive_comparison`] shows caller-chosen rows side
//!   by side.
//!
//! Neither writes anything; pass the figure to [`Figure::save`] or
//! [`Figure::to_svg_string`].

pub mod export;
mod figure;

pub use export::ExportFormat;
pub use figure::{
    level_percent, Band, Figure, FigureBuilder, GridLayout, LineStyle, Marker, Panel, Rgb,
    TitleStyle, BAND_ALPHA, BAND_COLOR, BAR_ALPHA, BAR_COLOR, GRID_ALPHA, X_LABEL, Y_LABEL,
};

use ppc_common::{ObservationId, Result};
use ppc_config::{FigureSize, Settings};
use rand::Rng;
use tracing::debug;

use crate::inference::InferenceData;
use crate::logging::event_names;
use crate::select::{select_rows, Selection};
use crate::summary::{summarize_with_level, DEFAULT_INTERVAL_LEVEL};

/// Options for the random-row grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub n_rows: usize,
    pub figsize: FigureSize,
    pub bins: usize,
    pub interval_level: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            n_rows: 4,
            figsize: FigureSize(12.0, 8.0),
            bins: 50,
            interval_level: DEFAULT_INTERVAL_LEVEL,
        }
    }
}

impl GridOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        GridOptions {
            n_rows: settings.grid.n_rows,
            figsize: settings.grid.figsize,
            bins: settings.bins,
            interval_level: settings.interval_level,
        }
    }
}

/// Options for the side-by-side comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOptions {
    pub figsize: FigureSize,
    pub bins: usize,
    pub interval_level: f64,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        ComparisonOptions {
            figsize: FigureSize(15.0, 4.0),
            bins: 50,
            interval_level: DEFAULT_INTERVAL_LEVEL,
        }
    }
}

impl ComparisonOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        ComparisonOptions {
            figsize: settings.comparison.figsize,
            bins: settings.bins,
            interval_level: settings.interval_level,
        }
    }
}

/// Sample `options.n_rows` observations and plot each one's predictive
/// distribution against its observed value.
///
/// Returns the figure and the sampled ids in panel order.
pub fn plot_posterior_predictive_distribution<R: Rng + ?Sized>(
    data: &InferenceData,
    options: &GridOptions,
    rng: &mut R,
) -> Result<(Figure, Selection)> {
    let selection = select_rows(data.n_observations(), options.n_rows, rng)?;
    let records = summarize_with_level(data, &selection, options.interval_level)?;

    let figure = FigureBuilder::new(options.figsize, GridLayout::two_column(records.len()))
        .bins(options.bins)
        .title_style(TitleStyle::Distribution)
        .build(records)?;

    debug!(
        target: event_names::FIGURE_BUILT,
        panels = figure.panels.len(),
        rows = figure.layout.rows,
        cols = figure.layout.cols,
        "built distribution grid"
    );
    Ok((figure, selection))
}

/// Plot the given observations in a single row, one panel each.
pub fn plot_posterior_predictive_comparison(
    data: &InferenceData,
    row_ids: &[ObservationId],
    options: &ComparisonOptions,
) -> Result<Figure> {
    let selection = Selection::explicit(row_ids.to_vec(), data.n_observations())?;
    let records = summarize_with_level(data, &selection, options.interval_level)?;

    let figure = FigureBuilder::new(options.figsize, GridLayout::single_row(records.len()))
        .bins(options.bins)
        .title_style(TitleStyle::Short)
        .build(records)?;

    debug!(
        target: event_names::FIGURE_BUILT,
        panels = figure.panels.len(),
        "built comparison row"
    );
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::seeded_rng;
    use ppc_common::Error;

    /// Observation `i` has observed value `10 * i` and draws centred on it.
    fn data(n: usize) -> InferenceData {
        let observed: Vec<f64> = (0..n).map(|i| 10.0 * i as f64).collect();
        let pools = observed
            .iter()
            .map(|&y| (0..40).map(|d| y + (d as f64 - 20.0) * 0.1).collect())
            .collect();
        InferenceData::new(observed, pools).unwrap()
    }

    #[test]
    fn test_default_grid_is_two_by_two() {
        let d = data(12);
        let opts = GridOptions::default();
        let (fig, sel) =
            plot_posterior_predictive_distribution(&d, &opts, &mut seeded_rng(Some(3))).unwrap();

        assert_eq!(fig.layout, GridLayout { rows: 2, cols: 2 });
        assert_eq!(fig.panels.len(), 4);
        assert_eq!(sel.len(), 4);
        assert_eq!(fig.size, FigureSize(12.0, 8.0));
        for (panel, id) in fig.panels.iter().zip(sel.iter()) {
            assert_eq!(panel.id, *id);
            assert_eq!(
                panel.title,
                format!("Row {}: Posterior Predictive Distribution", id)
            );
            assert_eq!(panel.summary.id, *id);
            // each panel carries its own observation, no cross-panel leakage
            let expected = 10.0 * id.index() as f64;
            assert_eq!(panel.observed.x, expected);
            assert!((panel.mean.x - (expected - 0.05)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_is_reproducible() {
        let d = data(30);
        let opts = GridOptions::default();
        let (a, sa) =
            plot_posterior_predictive_distribution(&d, &opts, &mut seeded_rng(Some(9))).unwrap();
        let (b, sb) =
            plot_posterior_predictive_distribution(&d, &opts, &mut seeded_rng(Some(9))).unwrap();
        assert_eq!(sa, sb);
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_other_row_counts() {
        let d = data(10);
        let opts = GridOptions {
            n_rows: 5,
            ..GridOptions::default()
        };
        let (fig, _) =
            plot_posterior_predictive_distribution(&d, &opts, &mut seeded_rng(Some(1))).unwrap();
        assert_eq!(fig.layout, GridLayout { rows: 3, cols: 2 });
        assert_eq!(fig.panels.len(), 5);
    }

    #[test]
    fn test_grid_too_many_rows() {
        let d = data(3);
        let opts = GridOptions::default();
        let err = plot_posterior_predictive_distribution(&d, &opts, &mut seeded_rng(Some(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::SampleSizeExceedsPopulation {
                requested: 4,
                population: 3
            }
        ));
    }

    #[test]
    fn test_comparison_row() {
        let d = data(12);
        let ids = [ObservationId(3), ObservationId(7), ObservationId(11)];
        let opts = ComparisonOptions::default();
        let fig = plot_posterior_predictive_comparison(&d, &ids, &opts).unwrap();

        assert_eq!(fig.layout, GridLayout { rows: 1, cols: 3 });
        assert_eq!(fig.size, FigureSize(15.0, 4.0));
        assert_eq!(fig.titles(), vec!["Row 3", "Row 7", "Row 11"]);
        assert_eq!(fig.panel(ObservationId(7)).unwrap().observed.x, 70.0);
        assert_eq!(fig.panels[0].histogram.bins(), 50);
    }

    #[test]
    fn test_comparison_errors() {
        let d = data(4);
        let opts = ComparisonOptions::default();
        assert!(matches!(
            plot_posterior_predictive_comparison(&d, &[], &opts),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plot_posterior_predictive_comparison(&d, &[ObservationId(4)], &opts),
            Err(Error::UnknownObservation { id: 4, .. })
        ));
    }

    #[test]
    fn test_comparison_of_extreme_spread_is_finite() {
        let d = InferenceData::new(vec![0.0], vec![vec![-1.7e308, 0.0, 1.7e308]]).unwrap();
        let opts = ComparisonOptions {
            bins: 4,
            ..ComparisonOptions::default()
        };
        let fig = plot_posterior_predictive_comparison(&d, &[ObservationId(0)], &opts).unwrap();

        let panel = &fig.panels[0];
        assert!(panel.histogram.edges.iter().all(|e| e.is_finite()));
        assert!(panel.histogram.densities.iter().all(|v| v.is_finite()));
        assert_eq!(panel.mean.x, 0.0);
        assert_eq!(panel.mean.label, "Mean pred: 0.00");
        assert!(panel.interval.lower.is_finite() && panel.interval.upper.is_finite());
        let (lo, hi) = panel.x_range();
        assert!(lo.is_finite() && hi.is_finite());
    }

    #[test]
    fn test_options_from_settings() {
        let mut settings = Settings::default();
        settings.bins = 20;
        settings.grid.n_rows = 6;
        settings.comparison.figsize = FigureSize(9.0, 3.0);

        let grid = GridOptions::from_settings(&settings);
        assert_eq!(grid.n_rows, 6);
        assert_eq!(grid.bins, 20);
        assert_eq!(grid.figsize, FigureSize(12.0, 8.0));

        let cmp = ComparisonOptions::from_settings(&settings);
        assert_eq!(cmp.figsize, FigureSize(9.0, 3.0));
        assert_eq!(cmp.interval_level, 0.95);
    }
}
