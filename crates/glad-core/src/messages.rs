//! Operator-facing status messages posted to the progress reporter.

pub const NO_TASK: &str =
    "No exported alert tiles were found for this AOI and date range. Launch the export first.";
pub const ALREADY_DONE: &str = "Patch statistics already computed for this AOI and date range.";
pub const MERGE_TILE: &str = "Merging the downloaded tiles";
pub const COMPRESS_FILE: &str = "Compressing the merged raster";
pub const IDENTIFY_PATCH: &str = "Identifying alert patches";
pub const PATCH_SIZE: &str = "Computing patch sizes";
pub const COMPUTATION_COMPLETED: &str = "Computation completed";
