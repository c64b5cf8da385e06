//! Deterministic artifact layout shared by the orchestrator and the presenter.
//!
//! Everything here is a pure function of the AOI, the results root and the
//! date range. Both sides of the pipeline must agree on these names, so the
//! layout is stable across versions: changing a suffix orphans every result
//! computed before the change.

use std::fmt;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::consts::{AOI_ASSET_PREFIX, REMOTE_EXPORT_PREFIX};
use crate::error::{GladError, Result};

/// Start and end period tags, embedded verbatim into file names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.start, self.end)
    }
}

/// Short AOI name derived from an asset identifier.
///
/// `projects/x/assets/aoi_peru` gives `peru`; a name without the `aoi_`
/// prefix is kept as is.
pub fn aoi_short_name(asset_id: &str) -> Result<String> {
    let last = asset_id
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let name = last.strip_prefix(AOI_ASSET_PREFIX).unwrap_or(last);
    if name.is_empty() {
        return Err(GladError::InvalidAsset(asset_id.to_string()));
    }
    Ok(name.to_string())
}

/// Name of the exported tiles in the remote store, without kind suffix.
pub fn remote_basename(aoi_name: &str, range: &DateRange) -> String {
    format!("{REMOTE_EXPORT_PREFIX}_{aoi_name}_{range}")
}

/// Kind of exported tile set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Alert date raster.
    Date,
    /// Alert confidence raster.
    Map,
}

impl TileKind {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "alert date"),
            Self::Map => write!(f, "alert confidence"),
        }
    }
}

/// Remote prefix of one tile kind, e.g. `alerts_peru_01_12_date`.
pub fn tile_prefix(aoi_name: &str, range: &DateRange, kind: TileKind) -> String {
    format!("{}_{}", remote_basename(aoi_name, range), kind.suffix())
}

/// Glob matching `<dir>/<prefix>*.tif`. Both literal parts are escaped, so
/// brackets or wildcards in a directory or AOI name match only themselves.
pub fn prefix_glob(dir: &Path, prefix: &str) -> String {
    format!(
        "{}/{}*.tif",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(prefix)
    )
}

/// Working directory of one AOI under the results root.
pub fn result_dir(results_root: &Path, aoi_name: &str) -> PathBuf {
    results_root.join(aoi_name)
}

/// Create the AOI working directory if needed and return it.
pub fn ensure_result_dir(results_root: &Path, aoi_name: &str) -> Result<PathBuf> {
    let dir = result_dir(results_root, aoi_name);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Every artifact produced or consumed for one (AOI, date range).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub aoi_name: String,
    pub range: DateRange,
    pub alert_date_tmp_map: PathBuf,
    pub alert_date_map: PathBuf,
    pub alert_tmp_map: PathBuf,
    pub alert_map: PathBuf,
    pub clump_tmp_map: PathBuf,
    pub clump_map: PathBuf,
    pub alert_stats: PathBuf,
    pub hist_png: PathBuf,
    pub distrib_csv: PathBuf,
    pub report_json: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, aoi_name: &str, range: &DateRange) -> Self {
        let file = |suffix: &str| dir.join(format!("{aoi_name}_{range}_{suffix}"));
        Self {
            dir: dir.to_path_buf(),
            aoi_name: aoi_name.to_string(),
            range: range.clone(),
            alert_date_tmp_map: file("tmp_glad_date.tif"),
            alert_date_map: file("glad_date.tif"),
            alert_tmp_map: file("tmp_glad.tif"),
            alert_map: file("glad.tif"),
            clump_tmp_map: file("tmp_clump.tif"),
            clump_map: file("clump.tif"),
            alert_stats: file("stats.txt"),
            hist_png: file("hist.png"),
            distrib_csv: file("distrib.csv"),
            report_json: file("report.json"),
        }
    }

    /// Layout for an asset identifier under a results root.
    pub fn for_asset(results_root: &Path, asset_id: &str, range: &DateRange) -> Result<Self> {
        let aoi_name = aoi_short_name(asset_id)?;
        let dir = result_dir(results_root, &aoi_name);
        Ok(Self::new(&dir, &aoi_name, range))
    }

    /// Local glob matching the downloaded tiles of one kind.
    pub fn tile_pattern(&self, kind: TileKind) -> String {
        let prefix = tile_prefix(&self.aoi_name, &self.range, kind);
        prefix_glob(&self.dir, &prefix)
    }

    /// Uncompressed merge output and final compressed raster for a tile kind.
    pub fn merge_targets(&self, kind: TileKind) -> (&Path, &Path) {
        match kind {
            TileKind::Date => (&self.alert_date_tmp_map, &self.alert_date_map),
            TileKind::Map => (&self.alert_tmp_map, &self.alert_map),
        }
    }
}
