use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use metalfolio::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for metalfolio::AppCommand {
    fn from(cmd: Commands) -> metalfolio::AppCommand {
        match cmd {
            Commands::Prices => metalfolio::AppCommand::Prices,
            Commands::Summary { json } => metalfolio::AppCommand::Summary { json },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch and display current vendor prices
    Prices,
    /// Display holdings valued at current prices
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => metalfolio::cli::setup::setup_at_path(path),
            None => metalfolio::cli::setup::setup(),
        },
        Some(cmd) => metalfolio::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
