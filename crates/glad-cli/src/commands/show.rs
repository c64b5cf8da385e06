use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use glad_core::config::MapSource;
use glad_core::eo::EarthEngineSession;
use glad_core::present::present_results;

use super::TargetArgs;
use crate::summary::print_report_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum MapSourceArg {
    Live,
    Local,
}

impl From<MapSourceArg> for MapSource {
    fn from(arg: MapSourceArg) -> Self {
        match arg {
            MapSourceArg::Live => MapSource::Live,
            MapSourceArg::Local => MapSource::Local,
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Alert year shown on the map and charts
    #[arg(long)]
    pub year: i32,

    /// Override the map layer source
    #[arg(long, value_enum)]
    pub map_source: Option<MapSourceArg>,

    /// Also copy the report JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

pub fn run(args: &ShowArgs) -> Result<()> {
    let mut config = args.target.load_config()?;
    if let Some(source) = args.map_source {
        config.presentation.map_source = source.into();
    }

    let mut session = EarthEngineSession::open(&config.earth_engine)
        .context("Failed to open Earth Engine session")?;
    let report = present_results(
        &session,
        &config.presentation,
        &config.results_root,
        &args.target.asset,
        args.year,
        &args.target.range(),
    );
    session.close();
    let report = report?;

    if let Some(ref path) = args.json {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    print_report_summary(&report);
    Ok(())
}
