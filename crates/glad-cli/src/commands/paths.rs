use anyhow::Result;
use clap::Args;
use glad_core::paths::{tile_prefix, ArtifactPaths, TileKind};

use super::TargetArgs;

#[derive(Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn run(args: &PathsArgs) -> Result<()> {
    let config = args.target.load_config()?;
    let range = args.target.range();
    let paths = ArtifactPaths::for_asset(&config.results_root, &args.target.asset, &range)?;

    println!("AOI:          {}", paths.aoi_name);
    println!("Directory:    {}", paths.dir.display());
    for kind in [TileKind::Date, TileKind::Map] {
        println!(
            "Remote {:<6} {}*.tif",
            kind.suffix(),
            tile_prefix(&paths.aoi_name, &range, kind)
        );
    }
    println!("Date map:     {}", paths.alert_date_map.display());
    println!("Alert map:    {}", paths.alert_map.display());
    println!("Clump map:    {}", paths.clump_map.display());
    println!("Statistics:   {}", paths.alert_stats.display());
    println!("Histogram:    {}", paths.hist_png.display());
    println!("Distribution: {}", paths.distrib_csv.display());
    println!("Report:       {}", paths.report_json.display());
    Ok(())
}
