use anyhow::{bail, Result};
use clap::Args;
use glad_core::pipeline::{run_process, PipelineContext, ProcessOutcome};
use glad_core::remote::open_store;
use glad_core::tools::CommandTools;

use super::TargetArgs;
use crate::progress::BarReporter;
use crate::summary::print_tool_log;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the external tools' diagnostic output after the run
    #[arg(long)]
    pub tool_output: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = args.target.load_config()?;
    let range = args.target.range();

    let store = open_store(&config.remote);
    let tools = CommandTools::new(config.tools.clone());
    let reporter = BarReporter::new()?;
    let ctx = PipelineContext {
        store: store.as_ref(),
        tools: &tools,
        reporter: &reporter,
    };

    let outcome = run_process(&ctx, &config.results_root, &args.target.asset, &range);
    reporter.finish();

    match outcome? {
        ProcessOutcome::Completed {
            artifacts,
            tool_log,
        } => {
            if args.tool_output {
                print_tool_log(&tool_log);
            }
            println!("Alert map:   {}", artifacts.alert_map.display());
            println!("Statistics:  {}", artifacts.alert_stats.display());
        }
        ProcessOutcome::AlreadyComputed(artifacts) => {
            println!("Alert map:   {}", artifacts.alert_map.display());
            println!("Statistics:  {}", artifacts.alert_stats.display());
        }
        ProcessOutcome::NoTask => bail!("no exported tiles for {} ({range})", args.target.asset),
    }
    Ok(())
}
