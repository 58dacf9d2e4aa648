//! Airpoint CLI: command-line interface for gesture pointer control.
//!
//! Usage:
//!   airpoint run [OPTIONS]          Drive the pointer from a live landmark stream
//!   airpoint replay <FILE>          Replay a recorded landmark session
//!   airpoint check                  Check pointer injection capabilities
//!   airpoint config [OPTIONS]       Show or create the configuration file

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use airpoint_common::config::{AppConfig, InjectorKind};

mod commands;

#[derive(Parser)]
#[command(
    name = "airpoint",
    about = "Control the mouse pointer with hand gestures",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the pointer from a live landmark stream
    Run {
        /// Landmark JSONL file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Replay a recorded landmark session
    Replay {
        /// Landmark JSONL file
        path: PathBuf,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Check pointer injection capabilities
    Check,

    /// Show or create the configuration file
    Config {
        /// Print the built-in defaults
        #[arg(long, conflicts_with = "init")]
        print_default: bool,

        /// Write the defaults to the config file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing config file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Options shared by `run` and `replay`.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Pointer injection backend
    #[arg(long, value_enum)]
    injector: Option<InjectorArg>,

    /// Output file for the record backend (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Screen width in pixels
    #[arg(long)]
    screen_width: Option<u32>,

    /// Screen height in pixels
    #[arg(long)]
    screen_height: Option<u32>,

    /// Cursor smoothing factor (>= 1)
    #[arg(long)]
    smoothing: Option<f64>,

    /// Disable spoken feedback
    #[arg(long)]
    no_speech: bool,

    /// Hide the status overlay
    #[arg(long)]
    no_overlay: bool,

    /// Start with pointer control switched off
    #[arg(long)]
    mouse_off: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorArg {
    Auto,
    Xdotool,
    Uinput,
    Record,
    /// Discard every command
    #[value(name = "none")]
    Discard,
}

impl From<InjectorArg> for InjectorKind {
    fn from(arg: InjectorArg) -> Self {
        match arg {
            InjectorArg::Auto => Self::Auto,
            InjectorArg::Xdotool => Self::Xdotool,
            InjectorArg::Uinput => Self::Uinput,
            InjectorArg::Record => Self::Record,
            InjectorArg::Discard => Self::None,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    airpoint_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Run { input, session } => commands::run::run(config, input, session).await,
        Commands::Replay { path, session } => commands::replay::run(config, path, session).await,
        Commands::Check => commands::check::run(&config, cli.config.as_deref()),
        Commands::Config {
            print_default,
            init,
            force,
        } => commands::config::run(&config, print_default, init, force),
    }
}
