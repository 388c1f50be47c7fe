//! `ppc` - posterior predictive plots and regression error reports.
//!
//! stdout carries command payloads (summary lines, metric lines, JSON);
//! logs and errors go to stderr.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ppc_common::{
    format_error_human, Error, ObservationId, OutputFormat, Result, StructuredError,
    SCHEMA_VERSION,
};
use ppc_config::{FigureSize, Settings};
use ppc_core::config::{load_settings, load_settings_file};
use ppc_core::exit_codes::ExitCode;
use ppc_core::inference::InferenceData;
use ppc_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use ppc_core::metrics::{print_regression_metrics, regression_metrics, Targets};
use ppc_core::render::{
    level_percent, plot_posterior_predictive_comparison, plot_posterior_predictive_distribution,
    ComparisonOptions, ExportFormat, Figure, GridOptions,
};
use ppc_core::select::{seeded_rng, select_rows, Selection};
use ppc_core::summary::{summarize_with_level, SummaryRecord};
use serde::Serialize;
use tracing::{debug, info};

/// Posterior predictive checks and regression error metrics
#[derive(Parser)]
#[command(name = "ppc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (takes precedence over PPC_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot randomly chosen observations on a two-column grid
    Grid(GridArgs),

    /// Plot chosen observations side by side
    Compare(CompareArgs),

    /// Print predictive summaries without plotting
    Summary(SummaryArgs),

    /// Print MSE, RMSE, MAE and R² for true vs. predicted values
    Metrics(MetricsArgs),

    /// Settings management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Grid(_) => "grid",
            Commands::Compare(_) => "compare",
            Commands::Summary(_) => "summary",
            Commands::Metrics(_) => "metrics",
            Commands::Config(_) => "config",
            Commands::Version => "version",
        }
    }
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct DataArgs {
    /// Inference data JSON (observed_data + posterior_predictive groups)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Variable to read from both groups [default: y]
    #[arg(long)]
    var_name: Option<String>,
}

#[derive(Args, Debug)]
struct FigureArgs {
    /// Histogram bins per panel
    #[arg(long)]
    bins: Option<usize>,

    /// Figure size in inches, WIDTH,HEIGHT
    #[arg(long)]
    figsize: Option<FigureSize>,

    /// Central interval mass, between 0 and 1
    #[arg(long)]
    level: Option<f64>,

    /// Write the figure here (.svg or .png)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Pixels per inch for export
    #[arg(long)]
    dpi: Option<f64>,
}

impl FigureArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(bins) = self.bins {
            settings.bins = bins;
        }
        if let Some(level) = self.level {
            settings.interval_level = level;
        }
        if let Some(dpi) = self.dpi {
            settings.dpi = dpi;
        }
    }
}

#[derive(Args, Debug)]
struct GridArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Number of observations to sample
    #[arg(long)]
    rows: Option<usize>,

    /// Seed for reproducible selection
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    figure: FigureArgs,
}

#[derive(Args, Debug)]
struct CompareArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Observation ids to plot, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<ObservationId>,

    #[command(flatten)]
    figure: FigureArgs,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Observation ids to summarize; random rows when omitted
    #[arg(long, value_delimiter = ',')]
    ids: Vec<ObservationId>,

    /// Number of random rows when --ids is omitted
    #[arg(long, conflicts_with = "ids")]
    rows: Option<usize>,

    /// Seed for reproducible selection
    #[arg(long, conflicts_with = "ids")]
    seed: Option<u64>,

    /// Central interval mass, between 0 and 1
    #[arg(long)]
    level: Option<f64>,
}

#[derive(Args, Debug)]
struct MetricsArgs {
    /// True values, JSON array (1-D or rows of targets)
    #[arg(long = "true", value_name = "FILE")]
    y_true: PathBuf,

    /// Predicted values, same shape as --true
    #[arg(long = "pred", value_name = "FILE")]
    y_pred: PathBuf,

    /// Text placed before each metric name
    #[arg(long, default_value = "")]
    prefix: String,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective settings and where they came from
    Show,

    /// Validate a settings file
    Validate {
        /// File to check (defaults to the resolved settings file)
        path: Option<PathBuf>,
    },
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Serialize)]
struct SavedFigure {
    path: String,
    format: &'static str,
    width_px: u32,
    height_px: u32,
}

#[derive(Serialize)]
struct FigureReport<'a> {
    rows: usize,
    cols: usize,
    titles: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<&'a SavedFigure>,
}

#[derive(Serialize)]
struct PlotReport<'a> {
    schema_version: &'static str,
    command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    selection: &'a [ObservationId],
    summaries: &'a [&'a SummaryRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    figure: Option<FigureReport<'a>>,
}

// ============================================================================
// Entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    let _run = ctx.span(Stage::Init).entered();
    debug!(target: event_names::RUN_STARTED, command = cli.command.name(), "run started");

    let result = match &cli.command {
        Commands::Grid(args) => run_grid(&cli.global, args),
        Commands::Compare(args) => run_compare(&cli.global, args),
        Commands::Summary(args) => run_summary(&cli.global, args),
        Commands::Metrics(args) => run_metrics(&cli.global, args),
        Commands::Config(args) => run_config(&cli.global, args),
        Commands::Version => print_version(&cli.global),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(&cli.global, &err),
    };
    debug!(
        target: event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        success = exit_code.is_success(),
        user_error = exit_code.is_user_error(),
        "run finished"
    );

    std::process::exit(exit_code.as_i32());
}

fn stage(stage: Stage) -> tracing::span::EnteredSpan {
    tracing::info_span!("stage", stage = %stage).entered()
}

fn load_data(args: &DataArgs, settings: &Settings) -> Result<InferenceData> {
    let _stage = stage(Stage::Load);
    let var_name = args.var_name.as_deref().unwrap_or(&settings.var_name);
    let data = InferenceData::from_path(&args.input, var_name)?;
    info!(
        target: event_names::DATA_LOADED,
        path = %args.input.display(),
        var_name,
        n_observations = data.n_observations(),
        "inference data loaded"
    );
    Ok(data)
}

fn resolve_settings(global: &GlobalOpts) -> Result<Settings> {
    let resolved = load_settings(global.config.as_deref())?;
    match &resolved.path {
        Some(path) => debug!(
            target: event_names::CONFIG_LOADED,
            path = %path.display(),
            source = %resolved.source,
            "settings loaded"
        ),
        None => debug!(target: event_names::CONFIG_DEFAULT_USED, "using built-in settings"),
    }
    Ok(resolved.settings)
}

fn export(figure: &Figure, output: Option<&Path>, dpi: f64) -> Result<Option<SavedFigure>> {
    let Some(path) = output else {
        return Ok(None);
    };
    let _stage = stage(Stage::Export);
    let format: ExportFormat = figure.save_with_dpi(path, dpi)?;
    let (width_px, height_px) = figure.pixel_size(dpi);
    info!(
        target: event_names::FIGURE_SAVED,
        path = %path.display(),
        %format,
        "figure saved"
    );
    Ok(Some(SavedFigure {
        path: path.display().to_string(),
        format: format.as_str(),
        width_px,
        height_px,
    }))
}

fn run_grid(global: &GlobalOpts, args: &GridArgs) -> Result<ExitCode> {
    let mut settings = resolve_settings(global)?;
    args.figure.apply(&mut settings);
    if let Some(rows) = args.rows {
        settings.grid.n_rows = rows;
    }
    if let Some(figsize) = args.figure.figsize {
        settings.grid.figsize = figsize;
    }
    let seed = args.seed.or(settings.seed);

    let data = load_data(&args.data, &settings)?;
    let options = GridOptions::from_settings(&settings);

    let (figure, selection) = {
        let _stage = stage(Stage::Render);
        plot_posterior_predictive_distribution(&data, &options, &mut seeded_rng(seed))?
    };
    info!(
        target: event_names::ROWS_SELECTED,
        n_rows = selection.len(),
        seeded = seed.is_some(),
        "rows selected"
    );
    let saved = export(&figure, args.figure.output.as_deref(), settings.dpi)?;

    emit_plot_report(
        global,
        "grid",
        seed,
        selection.as_slice(),
        &figure.summaries(),
        Some((&figure, saved.as_ref())),
    )?;
    Ok(ExitCode::Clean)
}

fn run_compare(global: &GlobalOpts, args: &CompareArgs) -> Result<ExitCode> {
    let mut settings = resolve_settings(global)?;
    args.figure.apply(&mut settings);
    if let Some(figsize) = args.figure.figsize {
        settings.comparison.figsize = figsize;
    }

    let data = load_data(&args.data, &settings)?;
    let options = ComparisonOptions::from_settings(&settings);

    let figure = {
        let _stage = stage(Stage::Render);
        plot_posterior_predictive_comparison(&data, &args.ids, &options)?
    };
    let saved = export(&figure, args.figure.output.as_deref(), settings.dpi)?;

    emit_plot_report(
        global,
        "compare",
        None,
        &args.ids,
        &figure.summaries(),
        Some((&figure, saved.as_ref())),
    )?;
    Ok(ExitCode::Clean)
}

fn run_summary(global: &GlobalOpts, args: &SummaryArgs) -> Result<ExitCode> {
    let settings = resolve_settings(global)?;
    let data = load_data(&args.data, &settings)?;
    let level = args.level.unwrap_or(settings.interval_level);

    let mut seed = None;
    let selection = {
        let _stage = stage(Stage::Select);
        if args.ids.is_empty() {
            seed = args.seed.or(settings.seed);
            let k = args.rows.unwrap_or(settings.grid.n_rows);
            select_rows(data.n_observations(), k, &mut seeded_rng(seed))?
        } else {
            Selection::explicit(args.ids.clone(), data.n_observations())?
        }
    };

    let records = {
        let _stage = stage(Stage::Summarize);
        summarize_with_level(&data, &selection, level)?
    };
    debug!(
        target: event_names::SUMMARY_DONE,
        n_records = records.len(),
        "summaries computed"
    );

    let records: Vec<&SummaryRecord> = records.iter().collect();
    emit_plot_report(global, "summary", seed, selection.as_slice(), &records, None)?;
    Ok(ExitCode::Clean)
}

fn emit_plot_report(
    global: &GlobalOpts,
    command: &'static str,
    seed: Option<u64>,
    selection: &[ObservationId],
    records: &[&SummaryRecord],
    figure: Option<(&Figure, Option<&SavedFigure>)>,
) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            let report = PlotReport {
                schema_version: SCHEMA_VERSION,
                command,
                seed,
                selection,
                summaries: records,
                figure: figure.map(|(fig, saved)| FigureReport {
                    rows: fig.layout.rows,
                    cols: fig.layout.cols,
                    titles: fig.titles(),
                    saved,
                }),
            };
            print_json(&report)
        }
        OutputFormat::Human => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for rec in records {
                writeln!(
                    out,
                    "Row {}: observed {:.2}, mean {:.2}, {}% interval [{:.2}, {:.2}] from {} draws",
                    rec.id,
                    rec.observed,
                    rec.mean,
                    level_percent(rec.level),
                    rec.lower,
                    rec.upper,
                    rec.n_draws
                )?;
            }
            if let Some((fig, saved)) = figure {
                let panels = fig.panels.len();
                match saved {
                    Some(saved) => writeln!(
                        out,
                        "Figure: {} panels on a {}x{} grid, written to {} ({}, {}x{} px)",
                        panels,
                        fig.layout.rows,
                        fig.layout.cols,
                        saved.path,
                        saved.format,
                        saved.width_px,
                        saved.height_px
                    )?,
                    None => writeln!(
                        out,
                        "Figure: {} panels on a {}x{} grid (not saved; pass --output to write it)",
                        panels, fig.layout.rows, fig.layout.cols
                    )?,
                }
            }
            Ok(())
        }
    }
}

fn run_metrics(global: &GlobalOpts, args: &MetricsArgs) -> Result<ExitCode> {
    let (y_true, y_pred) = {
        let _stage = stage(Stage::Load);
        let y_true = Targets::from_path(&args.y_true)?;
        let y_pred = Targets::from_path(&args.y_pred)?;
        debug!(
            target: event_names::TARGETS_LOADED,
            n_samples = y_true.shape().0,
            n_targets = y_true.shape().1,
            "targets loaded"
        );
        (y_true, y_pred)
    };

    let _stage = stage(Stage::Metrics);
    let metrics = match global.format {
        OutputFormat::Json => {
            let metrics = regression_metrics(&y_true, &y_pred)?;
            let (n_samples, n_targets) = y_true.shape();
            print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "command": "metrics",
                "prefix": args.prefix,
                "n_samples": n_samples,
                "n_targets": n_targets,
                "metrics": metrics,
            }))?;
            metrics
        }
        OutputFormat::Human => print_regression_metrics(&y_true, &y_pred, &args.prefix)?,
    };
    debug!(
        target: event_names::METRICS_COMPUTED,
        mse = metrics.mse,
        r2 = metrics.r2,
        "metrics computed"
    );
    Ok(ExitCode::Clean)
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> Result<ExitCode> {
    match &args.command {
        ConfigCommands::Show => {
            let resolved = load_settings(global.config.as_deref())?;
            match global.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "schema_version": SCHEMA_VERSION,
                    "command": "config show",
                    "source": resolved.source.to_string(),
                    "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                    "settings": resolved.settings,
                }))?,
                OutputFormat::Human => {
                    match &resolved.path {
                        Some(path) => println!("# {} ({})", path.display(), resolved.source),
                        None => println!("# {}", resolved.source),
                    }
                    println!("{}", serde_json::to_string_pretty(&resolved.settings)?);
                }
            }
        }
        ConfigCommands::Validate { path } => {
            let checked = match path {
                Some(path) => {
                    load_settings_file(path)?;
                    Some(path.clone())
                }
                None => load_settings(global.config.as_deref())?.path,
            };
            let shown = checked
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string());
            match global.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "schema_version": SCHEMA_VERSION,
                    "command": "config validate",
                    "valid": true,
                    "path": checked.as_ref().map(|p| p.display().to_string()),
                }))?,
                OutputFormat::Human => println!("✓ {} is valid", shown),
            }
        }
    }
    Ok(ExitCode::Clean)
}

fn print_version(global: &GlobalOpts) -> Result<ExitCode> {
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "ppc_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        }))?,
        OutputFormat::Human => {
            println!("ppc {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
    Ok(ExitCode::Clean)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let exit_code = ExitCode::from_error(err);
    debug!(
        target: event_names::COMMAND_FAILED,
        code = err.code(),
        exit_code = exit_code.as_i32(),
        "command failed"
    );

    if global.format.is_machine() {
        eprintln!("{}", StructuredError::from(err).to_json());
    } else {
        eprintln!("{}", format_error_human(err, std::io::stderr().is_terminal()));
    }
    exit_code
}
