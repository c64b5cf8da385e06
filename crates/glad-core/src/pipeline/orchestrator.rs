use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{info, warn};

use crate::consts::MAX_CONFIDENCE_CLASS;
use crate::error::{GladError, Result};
use crate::janitor;
use crate::messages;
use crate::paths::{self, ArtifactPaths, DateRange, TileKind};
use crate::remote::{fetch_tiles, RemoteStore};
use crate::tools::RasterTools;

use super::types::{
    Artifacts, PipelineStage, ProcessOutcome, ProgressReporter, Severity, ToolOutput,
};

/// External collaborators of one pipeline run.
pub struct PipelineContext<'a> {
    pub store: &'a dyn RemoteStore,
    pub tools: &'a dyn RasterTools,
    pub reporter: &'a dyn ProgressReporter,
}

/// Per-run state threaded through the steps.
struct Run<'a> {
    ctx: &'a PipelineContext<'a>,
    paths: ArtifactPaths,
    tool_log: Vec<ToolOutput>,
}

/// Download, merge, clump and histogram the alerts of one AOI and date range.
///
/// The run is skipped when the statistics file already exists, and ends with
/// [`ProcessOutcome::NoTask`] when the remote store holds no exported tiles.
/// A tool failure aborts the run; the failing step's partial output is
/// removed, completed artifacts are kept.
pub fn run_process(
    ctx: &PipelineContext<'_>,
    results_root: &Path,
    asset_id: &str,
    range: &DateRange,
) -> Result<ProcessOutcome> {
    let paths = ArtifactPaths::for_asset(results_root, asset_id, range)?;
    let artifacts = Artifacts {
        alert_map: paths.alert_map.clone(),
        alert_stats: paths.alert_stats.clone(),
    };

    ctx.reporter.begin_stage(PipelineStage::CheckExists);
    if paths.alert_stats.is_file() {
        info!(stats = %paths.alert_stats.display(), "Statistics already computed");
        ctx.reporter.post(Severity::Success, messages::ALREADY_DONE);
        return Ok(ProcessOutcome::AlreadyComputed(artifacts));
    }

    let remote = paths::remote_basename(&paths.aoi_name, range);
    if ctx.store.list(&remote)?.is_empty() {
        return Ok(no_task(ctx, &remote));
    }

    paths::ensure_result_dir(results_root, &paths.aoi_name)?;
    info!(aoi = %paths.aoi_name, %range, dir = %paths.dir.display(), "Starting pipeline");

    let mut run = Run {
        ctx,
        paths,
        tool_log: Vec::new(),
    };

    for kind in [TileKind::Date, TileKind::Map] {
        ctx.reporter.begin_stage(PipelineStage::fetch(kind));
        let prefix = paths::tile_prefix(&run.paths.aoi_name, range, kind);
        if fetch_tiles(ctx.store, &prefix, &run.paths.dir)?.is_empty() {
            return Ok(no_task(ctx, &prefix));
        }
        ctx.reporter.begin_stage(PipelineStage::merge(kind));
        run.merge_tiles(kind)?;
    }

    ctx.reporter.begin_stage(PipelineStage::Clump);
    run.clump()?;

    ctx.reporter.begin_stage(PipelineStage::Statistics);
    run.statistics()?;

    ctx.reporter.post(Severity::Success, messages::COMPUTATION_COMPLETED);
    ctx.reporter.begin_stage(PipelineStage::Done);

    Ok(ProcessOutcome::Completed {
        artifacts,
        tool_log: run.tool_log,
    })
}

fn no_task(ctx: &PipelineContext<'_>, prefix: &str) -> ProcessOutcome {
    warn!(prefix, "No exported tiles in the remote store");
    ctx.reporter.post(Severity::Error, messages::NO_TASK);
    ProcessOutcome::NoTask
}

impl Run<'_> {
    /// Merge the downloaded tiles of `kind`, drop them, then recompress.
    fn merge_tiles(&mut self, kind: TileKind) -> Result<()> {
        let pattern = self.paths.tile_pattern(kind);
        let mut tiles: Vec<PathBuf> = glob(&pattern)?.collect::<std::result::Result<_, _>>()?;
        tiles.sort();
        if tiles.is_empty() {
            return Err(GladError::NoLocalTiles(pattern));
        }
        let (tmp, out) = self.paths.merge_targets(kind);
        let (tmp, out) = (tmp.to_path_buf(), out.to_path_buf());
        let stage = PipelineStage::merge(kind);

        self.ctx.reporter.post(Severity::Info, messages::MERGE_TILE);
        info!(%kind, tiles = tiles.len(), "Merging tiles");
        let text = discard_on_error(&tmp, self.ctx.tools.merge(&tiles, &tmp))?;
        self.record(stage, "merge", text);

        let deleted = janitor::delete_matching(&pattern)?;
        if deleted != tiles.len() {
            warn!(deleted, merged = tiles.len(), "Tile count changed during merge");
        }
        info!("{}", janitor::deletion_message(deleted));

        self.compress(stage, &tmp, &out)
    }

    /// Label contiguous alert pixels, then recompress the label raster.
    fn clump(&mut self) -> Result<()> {
        let tmp = self.paths.clump_tmp_map.clone();
        let out = self.paths.clump_map.clone();

        self.ctx.reporter.post(Severity::Info, messages::IDENTIFY_PATCH);
        let text = discard_on_error(&tmp, self.ctx.tools.clump(&self.paths.alert_map, &tmp))?;
        self.record(PipelineStage::Clump, "clump", text);

        self.compress(PipelineStage::Clump, &tmp, &out)
    }

    /// Per-patch confidence histogram, the terminal artifact of the run.
    fn statistics(&mut self) -> Result<()> {
        let stats = self.paths.alert_stats.clone();

        self.ctx.reporter.post(Severity::Info, messages::PATCH_SIZE);
        let text = discard_on_error(
            &stats,
            self.ctx.tools.histogram(
                &self.paths.alert_map,
                &stats,
                &self.paths.clump_map,
                MAX_CONFIDENCE_CLASS,
            ),
        )?;
        self.record(PipelineStage::Statistics, "histogram", text);
        Ok(())
    }

    fn compress(&mut self, stage: PipelineStage, tmp: &Path, out: &Path) -> Result<()> {
        self.ctx.reporter.post(Severity::Info, messages::COMPRESS_FILE);
        let text = discard_on_error(out, self.ctx.tools.translate_lzw(tmp, out))?;
        self.record(stage, "translate", text);
        janitor::delete_file(tmp)
    }

    fn record(&mut self, stage: PipelineStage, tool: &str, text: String) {
        let output = ToolOutput {
            stage,
            tool: tool.to_string(),
            text,
        };
        self.ctx.reporter.tool_output(&output);
        self.tool_log.push(output);
    }
}

/// Remove the partial output of a failed step so it cannot pass for a result.
fn discard_on_error<T>(output: &Path, result: Result<T>) -> Result<T> {
    if result.is_err() && output.exists() {
        match std::fs::remove_file(output) {
            Ok(()) => warn!(path = %output.display(), "Removed partial output"),
            Err(e) => warn!(path = %output.display(), error = %e, "Could not remove partial output"),
        }
    }
    result
}
