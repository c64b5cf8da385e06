#[allow(dead_code)]
mod common;

use std::path::Path;

use common::{FakeStore, FakeTools, STATS};
use glad_core::error::GladError;
use glad_core::messages;
use glad_core::paths::{ArtifactPaths, DateRange};
use glad_core::pipeline::{
    run_process, PipelineContext, PipelineStage, ProcessOutcome, RecordingReporter, Severity,
};
use glad_core::remote::{RemoteFile, RemoteStore};

const ASSET: &str = "projects/x/assets/aoi1";

fn range() -> DateRange {
    DateRange::new("01", "12")
}

fn layout(root: &Path) -> ArtifactPaths {
    ArtifactPaths::for_asset(root, ASSET, &range()).unwrap()
}

#[test]
fn test_no_remote_data_reports_one_error() {
    let root = tempfile::tempdir().unwrap();
    let store = FakeStore::new(&[]);
    let tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let outcome = run_process(&ctx, root.path(), ASSET, &range()).unwrap();

    assert_eq!(outcome, ProcessOutcome::NoTask);
    assert!(outcome.artifacts().is_none());
    assert_eq!(reporter.messages(Severity::Error), vec![messages::NO_TASK]);
    assert!(reporter.messages(Severity::Success).is_empty());
    assert_eq!(tools.call_count(), 0);
    assert!(store.downloaded.borrow().is_empty());
}

#[test]
fn test_already_computed_short_circuits() {
    let root = tempfile::tempdir().unwrap();
    let paths = layout(root.path());
    std::fs::create_dir_all(&paths.dir).unwrap();
    std::fs::write(&paths.alert_stats, STATS).unwrap();

    let store = FakeStore::new(&[]);
    let tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let outcome = run_process(&ctx, root.path(), ASSET, &range()).unwrap();

    let artifacts = outcome.artifacts().unwrap();
    assert!(matches!(outcome, ProcessOutcome::AlreadyComputed(_)));
    assert_eq!(artifacts.alert_map, paths.alert_map);
    assert_eq!(artifacts.alert_stats, paths.alert_stats);
    assert_eq!(reporter.messages(Severity::Success), vec![messages::ALREADY_DONE]);
    assert_eq!(tools.call_count(), 0);
    assert_eq!(store.list_calls.get(), 0);
}

#[test]
fn test_full_run_sequences_every_step() {
    let root = tempfile::tempdir().unwrap();
    let store = FakeStore::with_tiles("aoi1", 3);
    let tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let outcome = run_process(&ctx, root.path(), ASSET, &range()).unwrap();
    let paths = layout(root.path());

    assert_eq!(
        *tools.calls.borrow(),
        vec!["merge", "translate", "merge", "translate", "clump", "translate", "histogram"]
    );
    assert_eq!(
        reporter.stages(),
        vec![
            PipelineStage::CheckExists,
            PipelineStage::FetchDates,
            PipelineStage::MergeDates,
            PipelineStage::FetchAlerts,
            PipelineStage::MergeAlerts,
            PipelineStage::Clump,
            PipelineStage::Statistics,
            PipelineStage::Done,
        ]
    );

    match outcome {
        ProcessOutcome::Completed { artifacts, tool_log } => {
            assert_eq!(artifacts.alert_stats, paths.alert_stats);
            assert_eq!(tool_log.len(), 7);
            assert_eq!(tool_log[0].tool, "merge");
            assert_eq!(tool_log[0].stage, PipelineStage::MergeDates);
            assert_eq!(tool_log[6].stage, PipelineStage::Statistics);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Each merge sees only its own tiles.
    let inputs = tools.merge_inputs.borrow();
    assert_eq!(inputs.len(), 2);
    assert!(inputs[0].iter().all(|p| p.to_string_lossy().contains("_date-")));
    assert!(inputs[1].iter().all(|p| p.to_string_lossy().contains("_map-")));
    assert_eq!(inputs[1].len(), 3);

    // Finals remain, tiles and intermediates are gone.
    for path in [&paths.alert_date_map, &paths.alert_map, &paths.clump_map, &paths.alert_stats] {
        assert!(path.is_file(), "missing {}", path.display());
    }
    for path in [&paths.alert_date_tmp_map, &paths.alert_tmp_map, &paths.clump_tmp_map] {
        assert!(!path.exists(), "leftover {}", path.display());
    }
    let leftovers = std::fs::read_dir(&paths.dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("alerts_"))
        .count();
    assert_eq!(leftovers, 0);

    assert_eq!(
        reporter.messages(Severity::Success),
        vec![messages::COMPUTATION_COMPLETED]
    );
    assert_eq!(std::fs::read_to_string(&paths.alert_stats).unwrap(), STATS);
}

#[test]
fn test_rerun_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let store = FakeStore::with_tiles("aoi1", 2);
    let first_tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &first_tools,
        reporter: &reporter,
    };
    let first = run_process(&ctx, root.path(), ASSET, &range()).unwrap();

    let second_tools = FakeTools::new(STATS);
    let ctx = PipelineContext {
        store: &store,
        tools: &second_tools,
        reporter: &reporter,
    };
    let second = run_process(&ctx, root.path(), ASSET, &range()).unwrap();

    assert_eq!(first.artifacts(), second.artifacts());
    assert_eq!(second_tools.call_count(), 0);
}

#[test]
fn test_missing_alert_tiles_is_no_task() {
    let root = tempfile::tempdir().unwrap();
    let store = FakeStore::new(&["alerts_aoi1_01_12_date-0000.tif"]);
    let tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let outcome = run_process(&ctx, root.path(), ASSET, &range()).unwrap();

    assert_eq!(outcome, ProcessOutcome::NoTask);
    assert_eq!(*tools.calls.borrow(), vec!["merge", "translate"]);
    assert_eq!(reporter.messages(Severity::Error).len(), 1);
}

#[test]
fn test_tool_failure_propagates_and_discards_partial_output() {
    let root = tempfile::tempdir().unwrap();
    let store = FakeStore::with_tiles("aoi1", 1);
    let tools = FakeTools::failing(STATS, "histogram");
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let err = run_process(&ctx, root.path(), ASSET, &range()).unwrap_err();
    let paths = layout(root.path());

    assert!(matches!(err, GladError::ToolFailed { ref tool, .. } if tool == "histogram"));
    assert!(!paths.alert_stats.exists());
    // Earlier artifacts survive for inspection.
    assert!(paths.alert_map.is_file());
    assert!(paths.clump_map.is_file());

    // A later run must not mistake the aborted one for a completed run.
    let retry_tools = FakeTools::new(STATS);
    let ctx = PipelineContext {
        store: &store,
        tools: &retry_tools,
        reporter: &reporter,
    };
    let outcome = run_process(&ctx, root.path(), ASSET, &range()).unwrap();
    assert!(matches!(outcome, ProcessOutcome::Completed { .. }));
}

#[test]
fn test_merge_failure_keeps_downloaded_tiles() {
    let root = tempfile::tempdir().unwrap();
    let store = FakeStore::with_tiles("aoi1", 2);
    let tools = FakeTools::failing(STATS, "merge");
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    assert!(run_process(&ctx, root.path(), ASSET, &range()).is_err());
    let paths = layout(root.path());
    assert!(!paths.alert_date_tmp_map.exists());
    let tiles = glob::glob(&paths.tile_pattern(glad_core::paths::TileKind::Date))
        .unwrap()
        .count();
    assert_eq!(tiles, 2);
}

#[test]
fn test_bracketed_results_root_merges_downloaded_tiles() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("res[1]");
    let store = FakeStore::with_tiles("aoi1", 2);
    let tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let outcome = run_process(&ctx, &root, ASSET, &range()).unwrap();

    assert!(matches!(outcome, ProcessOutcome::Completed { .. }));
    let inputs = tools.merge_inputs.borrow();
    assert_eq!(inputs.len(), 2);
    assert!(inputs.iter().all(|tiles| tiles.len() == 2), "{inputs:?}");
    let paths = layout(&root);
    let leftover: Vec<_> = std::fs::read_dir(&paths.dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("alerts_"))
        .collect();
    assert!(leftover.is_empty(), "tiles left behind: {leftover:?}");
    assert!(paths.alert_stats.is_file());
}

/// Lists tiles but never delivers them.
struct LosingStore(FakeStore);

impl RemoteStore for LosingStore {
    fn list(&self, prefix: &str) -> glad_core::error::Result<Vec<RemoteFile>> {
        self.0.list(prefix)
    }

    fn download(&self, _files: &[RemoteFile], dest_dir: &Path) -> glad_core::error::Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        Ok(())
    }
}

#[test]
fn test_missing_local_tiles_fail_before_merge() {
    let root = tempfile::tempdir().unwrap();
    let store = LosingStore(FakeStore::with_tiles("aoi1", 2));
    let tools = FakeTools::new(STATS);
    let reporter = RecordingReporter::new();
    let ctx = PipelineContext {
        store: &store,
        tools: &tools,
        reporter: &reporter,
    };

    let err = run_process(&ctx, root.path(), ASSET, &range()).unwrap_err();

    assert!(matches!(err, GladError::NoLocalTiles(_)), "{err}");
    assert_eq!(tools.call_count(), 0);
    assert!(!layout(root.path()).alert_date_tmp_map.exists());
}
