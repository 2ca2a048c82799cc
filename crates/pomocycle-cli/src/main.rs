use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use context::Context;

#[derive(Parser)]
#[command(name = "pomocycle", version, about = "Pomodoro cycle timer")]
struct Cli {
    /// User id for history attribution (overrides POMOCYCLE_USER and config)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Per-mode durations
    Durations {
        #[command(subcommand)]
        action: commands::durations::DurationsAction,
    },
    /// Completed work intervals
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the live countdown in the foreground
    Run,
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = Context::new(cli.user);
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(&ctx, action),
        Commands::Durations { action } => commands::durations::run(&ctx, action),
        Commands::History { action } => commands::history::run(&ctx, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Run => commands::run::run(&ctx),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
