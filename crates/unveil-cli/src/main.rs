use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unveil_core::{AppConfig, StaggerMode};

mod commands;

#[derive(Parser)]
#[command(name = "unveil")]
#[command(author, version, about = "Scroll reveal animations, previewed in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/unveil/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the landing page with its reveals (default)
    Preview {
        /// Start without the intro overlay
        #[arg(long)]
        no_intro: bool,
    },
    /// Show the transition an animation identifier resolves to
    Resolve {
        /// Animation identifiers; unknown ones fall back to slide-up
        names: Vec<String>,
        /// List every known identifier
        #[arg(short, long)]
        list: bool,
        /// Print the transitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the delay schedule for a staggered list
    Stagger {
        #[arg(short, long, value_enum, default_value_t = ModeArg::Group)]
        mode: ModeArg,
        /// Delay before the first child (group) or per index (per-item)
        #[arg(short, long)]
        base: Option<u64>,
        /// Added per child index in group mode
        #[arg(short, long)]
        step: Option<u64>,
        /// Number of children
        #[arg(short = 'n', long, default_value_t = 6)]
        count: usize,
    },
    /// Print the intro phase timeline
    Intro {
        /// Five phase lengths in ms: text1,text1-fade,text2,text2-fade,overlay-fade
        #[arg(short, long, value_delimiter = ',')]
        durations: Option<Vec<u64>>,
        /// Unmount the intro after this many ms
        #[arg(short, long)]
        unmount_at: Option<u64>,
        /// Run on real timers instead of a virtual clock
        #[arg(long)]
        live: bool,
    },
    /// Replay a JSON scenario and print the reveal report
    Simulate {
        /// Scenario file
        path: PathBuf,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Group,
    PerItem,
}

impl From<ModeArg> for StaggerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Group => StaggerMode::Group,
            ModeArg::PerItem => StaggerMode::PerItem,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = Arc::new(
        AppConfig::load_from(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?,
    );

    let previewing = matches!(cli.command, Some(Commands::Preview { .. }) | None);
    init_logging(&config, previewing)?;

    match cli.command {
        Some(Commands::Preview { no_intro }) => commands::preview::run(config, no_intro).await,
        None => commands::preview::run(config, false).await,
        Some(Commands::Resolve { names, list, json }) => commands::resolve::run(&names, list, json),
        Some(Commands::Stagger {
            mode,
            base,
            step,
            count,
        }) => commands::stagger::run(&config, mode.into(), base, step, count),
        Some(Commands::Intro {
            durations,
            unmount_at,
            live,
        }) => commands::intro::run(&config, durations, unmount_at, live).await,
        Some(Commands::Simulate { path, compact }) => commands::simulate::run(&path, compact),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
        },
    }
}

/// The preview owns the terminal, so it logs to a file; everything else
/// logs to stderr and keeps stdout for output
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_path = config.log_path();
        if let Some(dir) = log_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
