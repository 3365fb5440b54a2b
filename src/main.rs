mod apps;
mod github;
mod installer;
mod package;
mod system;
mod ui;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use crate::ui::prelude::*;

/// Track self-installed applications and update them from GitHub releases
#[derive(Parser, Debug)]
#[command(name = "apptrack", version, about, long_about = None)]
struct Cli {
    /// Activate debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit machine-readable JSON events
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Track a new application by its GitHub repository URL
    Add {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
    },

    /// List tracked applications and their update status
    List,

    /// Check for new releases of one or all tracked applications
    Check {
        /// Application name (checks everything when omitted)
        name: Option<String>,
    },

    /// Download and install the latest release of a tracked application
    Install {
        /// Application name
        name: String,
    },

    /// Stop tracking an application
    Remove {
        /// Application name
        name: String,
    },

    // `apptrack https://github.com/owner/repo` is shorthand for `add`
    #[command(external_subcommand)]
    Shorthand(Vec<String>),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    ui::init(
        if cli.json {
            ui::OutputFormat::Json
        } else {
            ui::OutputFormat::Text
        },
        true,
    );
    ui::set_debug_mode(cli.debug);

    if let Err(err) = run(cli).await {
        emit(Level::Error, "apptrack.error", &format!("Error: {:#}", err), None);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Add { url }) => apps::cli::handle_add(&url).await,
        Some(Commands::List) | None => apps::cli::handle_list(),
        Some(Commands::Check { name }) => apps::cli::handle_check(name.as_deref()).await,
        Some(Commands::Install { name }) => apps::cli::handle_install(&name).await,
        Some(Commands::Remove { name }) => apps::cli::handle_remove(&name),
        Some(Commands::Shorthand(args)) => {
            match args.first().map(|s| s.as_str()) {
                Some(url) if url.starts_with("https://") || url.starts_with("http://") => {
                    apps::cli::handle_add(url).await
                }
                _ => bail!("unknown command; run with --help for usage"),
            }
        }
    }
}
