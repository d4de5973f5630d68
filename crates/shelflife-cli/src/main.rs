use clap::{ArgAction, Parser, Subcommand};
use commands::{audit, clear, config};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "shelflife")]
#[command(about = "Shelflife - find the library entries nobody is watching")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file instead of stderr (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute or fetch the cached stale-media snapshot
    #[command(
        long_about = "Reconcile the media server, request tracker and library managers, classify every movie and show, and print the stale entries. Serves the snapshot persisted by the previous run unless --force is given."
    )]
    Audit {
        /// Recompute even if a cached snapshot exists
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Show the resolved configuration (masks secrets)
    Config,

    /// Delete the persisted snapshot
    Clear,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Pick up a .env file before the configuration reads the environment.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Audit { force } => audit::run_audit(force, &output).await,
        Commands::Config => config::run_config(&output),
        Commands::Clear => clear::run_clear(&output),
    }
}
