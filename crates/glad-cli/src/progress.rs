use std::time::Duration;

use anyhow::Result;
use glad_core::pipeline::{PipelineStage, ProgressReporter, Severity, ToolOutput};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Drives a terminal spinner from pipeline events.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner().template("{spinner} {prefix:.bold} {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(120));
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_prefix(stage.to_string());
        self.bar.set_message("");
    }

    fn post(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => self.bar.set_message(message.to_string()),
            Severity::Success => self.bar.println(format!("\u{2714} {message}")),
            Severity::Error => self.bar.println(format!("\u{2718} {message}")),
        }
    }

    fn tool_output(&self, output: &ToolOutput) {
        debug!(tool = %output.tool, "{}", output.text.trim_end());
    }
}
