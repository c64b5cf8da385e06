mod orchestrator;
mod types;

pub use orchestrator::{run_process, PipelineContext};
pub use types::{
    Artifacts, LogReporter, NoOpReporter, PipelineStage, ProcessOutcome, ProgressEvent,
    ProgressReporter, RecordingReporter, Severity, ToolOutput,
};
