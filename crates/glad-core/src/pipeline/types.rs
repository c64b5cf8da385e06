use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{error, info};

use crate::paths::TileKind;

/// Pipeline state, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    CheckExists,
    FetchDates,
    MergeDates,
    FetchAlerts,
    MergeAlerts,
    Clump,
    Statistics,
    Done,
}

impl PipelineStage {
    pub(super) fn fetch(kind: TileKind) -> Self {
        match kind {
            TileKind::Date => Self::FetchDates,
            TileKind::Map => Self::FetchAlerts,
        }
    }

    pub(super) fn merge(kind: TileKind) -> Self {
        match kind {
            TileKind::Date => Self::MergeDates,
            TileKind::Map => Self::MergeAlerts,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckExists => write!(f, "Checking previous results"),
            Self::FetchDates => write!(f, "Downloading date tiles"),
            Self::MergeDates => write!(f, "Merging date tiles"),
            Self::FetchAlerts => write!(f, "Downloading alert tiles"),
            Self::MergeAlerts => write!(f, "Merging alert tiles"),
            Self::Clump => write!(f, "Clumping patches"),
            Self::Statistics => write!(f, "Computing statistics"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Severity of a status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Diagnostic text returned by one external tool invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub stage: PipelineStage,
    pub tool: String,
    pub text: String,
}

/// Final products of a completed run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    pub alert_map: PathBuf,
    pub alert_stats: PathBuf,
}

/// How a pipeline invocation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Every step ran; `tool_log` holds the tools' diagnostics in order.
    Completed {
        artifacts: Artifacts,
        tool_log: Vec<ToolOutput>,
    },
    /// The statistics file was already on disk; nothing was run.
    AlreadyComputed(Artifacts),
    /// No exported tiles exist in the remote store yet.
    NoTask,
}

impl ProcessOutcome {
    pub fn artifacts(&self) -> Option<&Artifacts> {
        match self {
            Self::Completed { artifacts, .. } | Self::AlreadyComputed(artifacts) => Some(artifacts),
            Self::NoTask => None,
        }
    }
}

/// Sink for pipeline progress. Hosts implement it to drive a progress bar,
/// a log, or a UI panel. All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started.
    fn begin_stage(&self, _stage: PipelineStage) {}

    /// An operator-facing status message.
    fn post(&self, _severity: Severity, _message: &str) {}

    /// Diagnostic text of an external tool, for operator visibility.
    fn tool_output(&self, _output: &ToolOutput) {}
}

/// Reporter that drops everything.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Reporter that forwards every event to `tracing`.
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        info!(%stage, "Stage started");
    }

    fn post(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error!("{message}"),
            _ => info!(?severity, "{message}"),
        }
    }

    fn tool_output(&self, output: &ToolOutput) {
        info!(tool = %output.tool, stage = %output.stage, "{}", output.text.trim_end());
    }
}

/// Everything a reporter can receive, as a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Stage(PipelineStage),
    Message { severity: Severity, text: String },
    Tool(ToolOutput),
}

/// Reporter that keeps every event, in order.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.lock().clone()
    }

    /// Posted messages of the given severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Message { severity: s, text } if s == severity => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn stages(&self) -> Vec<PipelineStage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Stage(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ProgressEvent) {
        self.lock().push(event);
    }

    // A panic in another holder leaves the list itself intact.
    fn lock(&self) -> MutexGuard<'_, Vec<ProgressEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.push(ProgressEvent::Stage(stage));
    }

    fn post(&self, severity: Severity, message: &str) {
        self.push(ProgressEvent::Message {
            severity,
            text: message.to_string(),
        });
    }

    fn tool_output(&self, output: &ToolOutput) {
        self.push(ProgressEvent::Tool(output.clone()));
    }
}
