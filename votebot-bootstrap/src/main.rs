use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "votebot")]
#[command(about = "Monthly vote results bot", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Also write daily-rotated log files into this directory
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scheduler and the operator API (default)
    Serve,
    /// Run one monthly cycle and exit
    RunCycle,
    /// Print the announcement without posting or recording it
    Preview {
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "votebot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_dir.as_deref());
    let config = args.config.as_deref();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => votebot_bootstrap::run_standalone(config).await,
        Command::RunCycle => votebot_bootstrap::run_cycle_once(config).await,
        Command::Preview { json } => votebot_bootstrap::run_preview(config, json).await,
    }
}
