//! Earth Engine session and the map layer descriptors built from it.
//!
//! The session does not render anything and never contacts the backend: no
//! connection is made and no network call is issued, neither on
//! [`EarthEngineSession::open`] nor on any query. Opening only checks that the
//! configured credentials file exists. Queries become serializable
//! descriptors that a map front end evaluates against the live backend with
//! its own client. [`EarthEngineSession::is_open`] therefore reports the
//! open/close lifecycle of this value, not the health of a connection.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::EarthEngineConfig;
use crate::consts::{ALERT_VIS_MAX, ALERT_VIS_MIN, AOI_OUTLINE_COLOR, AOI_OUTLINE_WIDTH};
use crate::error::{GladError, Result};
use crate::paths::DateRange;

/// Query of the GLAD alert image collection, masked to alert pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlertQuery {
    /// Feature collection used to clip the alerts.
    pub aoi_asset: String,
    pub year: i32,
    pub range: DateRange,
    /// Confidence band of the requested year, e.g. `conf20`.
    pub band: String,
    /// Pixels kept by the mask: strictly greater than this value.
    pub mask_above: u32,
}

/// Where the pixels of a map layer come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSource {
    /// Evaluated live by the Earth Engine backend.
    LiveAlerts(AlertQuery),
    /// Raster file from the working directory.
    LocalRaster { path: PathBuf },
    /// Boundary of a feature collection painted on an empty byte image.
    Outline {
        aoi_asset: String,
        color: u32,
        width: u32,
    },
}

/// Visualization parameters of one layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisParams {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub palette: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapLayer {
    pub name: String,
    pub source: LayerSource,
    pub vis: VisParams,
}

/// Confidence band name of a year (`conf` + two-digit year).
pub fn confidence_band(year: i32) -> String {
    format!("conf{:02}", year.rem_euclid(100))
}

/// Explicitly opened Earth Engine session holding the project and
/// credentials that layer descriptors are built against.
#[derive(Debug)]
pub struct EarthEngineSession {
    project: Option<String>,
    credentials: Option<PathBuf>,
    open: bool,
}

impl EarthEngineSession {
    /// Initialize the session. A configured credentials file must be readable.
    pub fn open(config: &EarthEngineConfig) -> Result<Self> {
        if let Some(ref key) = config.credentials {
            let meta = std::fs::metadata(key).map_err(|e| {
                GladError::Session(format!("credentials {}: {e}", key.display()))
            })?;
            if !meta.is_file() {
                return Err(GladError::Session(format!(
                    "credentials {} is not a file",
                    key.display()
                )));
            }
        }
        info!(project = ?config.project, "Earth Engine session opened");
        Ok(Self {
            project: config.project.clone(),
            credentials: config.credentials.clone(),
            open: true,
        })
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn credentials(&self) -> Option<&Path> {
        self.credentials.as_deref()
    }

    /// Whether [`close`](Self::close) has not been called yet. Says nothing
    /// about backend reachability.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Tear the session down; later queries fail.
    pub fn close(&mut self) {
        if self.open {
            debug!(project = ?self.project, "Earth Engine session closed");
        }
        self.open = false;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(GladError::SessionClosed)
        }
    }

    /// Alerts of `year` within the AOI, masked to alert pixels.
    ///
    /// `palette` lists the confirmed then potential colors; the layer uses it
    /// reversed so the low end (probable) maps to the potential color.
    pub fn alert_layer(
        &self,
        aoi_asset: &str,
        year: i32,
        range: &DateRange,
        palette: &[String; 2],
    ) -> Result<MapLayer> {
        self.ensure_open()?;
        Ok(MapLayer {
            name: "alerts".into(),
            source: LayerSource::LiveAlerts(AlertQuery {
                aoi_asset: aoi_asset.to_string(),
                year,
                range: range.clone(),
                band: confidence_band(year),
                mask_above: 0,
            }),
            vis: alert_vis(palette),
        })
    }

    /// Boundary of the AOI feature collection.
    pub fn outline_layer(&self, aoi_asset: &str) -> Result<MapLayer> {
        self.ensure_open()?;
        Ok(MapLayer {
            name: "aoi".into(),
            source: LayerSource::Outline {
                aoi_asset: aoi_asset.to_string(),
                color: 1,
                width: AOI_OUTLINE_WIDTH,
            },
            vis: VisParams {
                min: None,
                max: None,
                palette: vec![AOI_OUTLINE_COLOR.to_string()],
            },
        })
    }
}

impl Drop for EarthEngineSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Alert layer read from the merged raster instead of the live backend.
pub fn local_alert_layer(path: PathBuf, palette: &[String; 2]) -> MapLayer {
    MapLayer {
        name: "alerts".into(),
        source: LayerSource::LocalRaster { path },
        vis: alert_vis(palette),
    }
}

fn alert_vis(palette: &[String; 2]) -> VisParams {
    VisParams {
        min: Some(ALERT_VIS_MIN),
        max: Some(ALERT_VIS_MAX),
        palette: palette.iter().rev().cloned().collect(),
    }
}
