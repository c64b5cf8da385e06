mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glad", about = "GLAD alert patch processing tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, merge, clump and compute patch statistics
    Run(commands::run::RunArgs),
    /// Build charts, distribution CSV and map description of a completed run
    Show(commands::show::ShowArgs),
    /// Print the artifact paths of an AOI and date range
    Paths(commands::paths::PathsArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Paths(args) => commands::paths::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
