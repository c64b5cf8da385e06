pub mod config;
pub mod paths;
pub mod run;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use glad_core::config::GladConfig;
use glad_core::paths::DateRange;

/// Arguments shared by every command that addresses one run.
#[derive(Args)]
pub struct TargetArgs {
    /// AOI asset identifier, e.g. projects/me/assets/aoi_peru
    pub asset: String,

    /// Start period tag
    pub start: String,

    /// End period tag
    pub end: String,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the results root directory
    #[arg(long)]
    pub results_root: Option<PathBuf>,
}

impl TargetArgs {
    pub fn range(&self) -> DateRange {
        DateRange::new(&self.start, &self.end)
    }

    pub fn load_config(&self) -> Result<GladConfig> {
        let mut config = match self.config {
            Some(ref path) => GladConfig::load(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => GladConfig::default(),
        };
        if let Some(ref root) = self.results_root {
            config.results_root = root.clone();
        }
        Ok(config)
    }
}
