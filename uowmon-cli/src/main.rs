//! uowmon CLI - command-line interface to the uowmon job monitor.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "uowmon")]
#[command(about = "Single-node job monitor over directory-backed queues", long_about = None)]
#[command(version = uowmon::VERSION)]
struct Cli {
    /// Path to the monitor configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitor heartbeat loop until SHUTDOWN or Ctrl-C
    Run {
        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },
    /// Create the queue directory layout and a default config file
    Init,
    /// Print a one-shot snapshot of the queues
    Status,
    /// Print the active configuration
    Config,
    /// Stamp a file as a UOW and drop it into the waiting queue
    Submit {
        /// File whose first payload line is the job invocation
        file: PathBuf,

        /// Enqueue into the priority queue instead
        #[arg(long)]
        priority: bool,
    },
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(uowmon::config::default_config_path)
    }
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config_path();

    let result = match cli.command {
        Commands::Run { debug } => commands::run::execute(&config_path, debug),
        Commands::Init => commands::init::execute(&config_path),
        Commands::Status => commands::status::execute(&config_path),
        Commands::Config => commands::config::execute(&config_path),
        Commands::Submit { file, priority } => {
            commands::submit::execute(&config_path, &file, priority)
        }
    };

    if let Err(e) = result {
        e.exit();
    }
}
