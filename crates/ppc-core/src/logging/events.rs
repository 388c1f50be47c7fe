//! Event vocabulary for structured logs.
//!
//! Every event carries the invocation's `run_id` and the pipeline stage it
//! was emitted from, so a JSONL stream can be grouped per run and per stage.

use serde::{Deserialize, Serialize};

/// Log levels as they appear in JSONL output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and settings resolution.
    Init,
    /// Reading inference data or target arrays.
    Load,
    /// Choosing observations to plot.
    Select,
    /// Per-observation mean and interval.
    Summarize,
    /// Building the figure model.
    Render,
    /// Writing the figure to disk.
    Export,
    /// Regression error metrics.
    Metrics,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Select => "select",
            Stage::Summarize => "summarize",
            Stage::Render => "render",
            Stage::Export => "export",
            Stage::Metrics => "metrics",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names, used as the tracing target.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    pub const DATA_LOADED: &str = "load.inference_data";
    pub const TARGETS_LOADED: &str = "load.targets";

    pub const ROWS_SELECTED: &str = "select.rows";

    pub const SUMMARY_DONE: &str = "summarize.done";

    pub const FIGURE_BUILT: &str = "render.figure_built";
    pub const FIGURE_SAVED: &str = "export.saved";

    pub const METRICS_COMPUTED: &str = "metrics.computed";
    pub const METRICS_UNDEFINED_R2: &str = "metrics.undefined_r2";

    pub const COMMAND_FAILED: &str = "run.failed";
}

/// Correlation data shared by every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }

    /// Root span for the invocation; the JSONL layer copies `run_id` from
    /// it onto every nested event.
    pub fn span(&self, stage: Stage) -> tracing::Span {
        tracing::info_span!("ppc", run_id = %self.run_id, stage = %stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Load,
            Stage::Select,
            Stage::Summarize,
            Stage::Render,
            Stage::Export,
            Stage::Metrics,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn test_event_names_are_stage_prefixed() {
        assert!(event_names::ROWS_SELECTED.starts_with("select."));
        assert!(event_names::FIGURE_SAVED.starts_with("export."));
        assert!(event_names::METRICS_UNDEFINED_R2.starts_with("metrics."));
    }
}
