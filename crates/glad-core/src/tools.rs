use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::config::ToolsConfig;
use crate::consts::LZW_CREATION_OPTION;
use crate::error::{GladError, Result};

/// External raster utilities the pipeline delegates to.
///
/// Each call blocks until the tool exits and returns its diagnostic text.
pub trait RasterTools {
    /// Mosaic `inputs` into a single raster at `output`.
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<String>;

    /// Rewrite `input` as an LZW-compressed raster at `output`.
    fn translate_lzw(&self, input: &Path, output: &Path) -> Result<String>;

    /// Label the connected alert regions of `input` with unique patch ids.
    fn clump(&self, input: &Path, output: &Path) -> Result<String>;

    /// Per-patch histogram of `input` values up to `max_value`, masked by `mask`.
    fn histogram(&self, input: &Path, output: &Path, mask: &Path, max_value: u32)
        -> Result<String>;
}

/// Runs the configured GDAL / OFT executables.
pub struct CommandTools {
    config: ToolsConfig,
}

impl CommandTools {
    pub fn new(config: ToolsConfig) -> Self {
        Self { config }
    }
}

impl RasterTools for CommandTools {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.config.merge);
        cmd.arg("-v").arg("-o").arg(output).args(inputs);
        run_tool(&self.config.merge, cmd)
    }

    fn translate_lzw(&self, input: &Path, output: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.config.translate);
        cmd.arg("-co").arg(LZW_CREATION_OPTION).arg(input).arg(output);
        run_tool(&self.config.translate, cmd)
    }

    fn clump(&self, input: &Path, output: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.config.clump);
        cmd.arg("-i").arg(input).arg("-o").arg(output);
        run_tool(&self.config.clump, cmd)
    }

    fn histogram(
        &self,
        input: &Path,
        output: &Path,
        mask: &Path,
        max_value: u32,
    ) -> Result<String> {
        let mut cmd = Command::new(&self.config.histogram);
        cmd.arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-um")
            .arg(mask)
            .arg("-maxval")
            .arg(max_value.to_string());
        run_tool(&self.config.histogram, cmd)
    }
}

/// Run `cmd` to completion, returning stdout followed by stderr.
fn run_tool(tool: &str, mut cmd: Command) -> Result<String> {
    debug!(?cmd, "Running external tool");
    let output = cmd.output().map_err(|e| GladError::ToolFailed {
        tool: tool.to_string(),
        status: "not started".into(),
        output: e.to_string(),
    })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }

    if !output.status.success() {
        return Err(GladError::ToolFailed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            output: text,
        });
    }
    Ok(text)
}
