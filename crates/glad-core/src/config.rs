use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration, loaded from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GladConfig {
    /// Parent of the per-AOI working directories.
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub earth_engine: EarthEngineConfig,
}

impl Default for GladConfig {
    fn default() -> Self {
        Self {
            results_root: default_results_root(),
            remote: RemoteConfig::default(),
            tools: ToolsConfig::default(),
            presentation: PresentationConfig::default(),
            earth_engine: EarthEngineConfig::default(),
        }
    }
}

impl GladConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

fn default_results_root() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("glad_results"),
        None => PathBuf::from("glad_results"),
    }
}

/// Where the exported tiles are fetched from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteConfig {
    /// Local folder kept in sync with the drive by a sync client.
    Mirror { path: PathBuf },
    /// Any remote reachable through the `rclone` binary.
    Rclone {
        remote: String,
        #[serde(default = "default_rclone")]
        executable: String,
    },
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let path = match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join("gdrive"),
            None => PathBuf::from("gdrive"),
        };
        Self::Mirror { path }
    }
}

fn default_rclone() -> String {
    "rclone".into()
}

/// Executables invoked for each external processing step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub merge: String,
    pub translate: String,
    pub clump: String,
    pub histogram: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            merge: "gdal_merge.py".into(),
            translate: "gdal_translate".into(),
            clump: "oft-clump".into(),
            histogram: "oft-his".into(),
        }
    }
}

/// Source of the alert layer on the result map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSource {
    /// Re-query the alerts from Earth Engine; fastest to render at interactive zoom.
    #[default]
    Live,
    /// Display the merged alert raster from the working directory.
    Local,
}

impl fmt::Display for MapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "Live query"),
            Self::Local => write!(f, "Local raster"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Most recent year of the alert dataset. Its data is still provisional.
    pub last_updated_year: i32,
    pub map_source: MapSource,
    /// Colors of the confirmed and potential series, in that order.
    pub palette: [String; 2],
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            last_updated_year: 2020,
            map_source: MapSource::default(),
            palette: ["#ff0000".into(), "#ffa500".into()],
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthEngineConfig {
    /// Cloud project the queries are billed to.
    pub project: Option<String>,
    /// Service-account key; the default credentials are used when absent.
    pub credentials: Option<PathBuf>,
}
