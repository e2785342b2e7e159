//! Hockey Tracker - follow the next match of your hockey teams.

use clap::Parser;
use hockey_tracker::cli::{self, Cli};
use hockey_tracker::config::{LoggingConfig, log_dir};
use hockey_tracker::{Result, Settings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(cli.config.clone())?;

    // Initialize logging
    let _guard = init_logging(&settings.logging)?;

    cli::run(cli.command(), settings).await
}

fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = if config.file {
        let appender = tracing_appender::rolling::daily(log_dir()?, "hockey-tracker.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
