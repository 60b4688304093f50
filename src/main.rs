//! Print the reference scenario, flattened by one strategy, as JSON lines.

use std::error::Error;
use std::io;
use std::time::Duration;

use clap::Parser;
use flatten_concurrency::catalog::Catalog;
use flatten_concurrency::sink::Visor;
use flatten_concurrency::time::Pacing;
use flatten_concurrency::{run, Config, Strategy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Flatten people and their hobby options into one stream of records.
#[derive(Debug, Parser)]
#[command(name = "visor", version, about, long_about = None)]
struct Cli {
    /// Flattening strategy
    #[arg(short, long, value_enum, env = "VISOR_STRATEGY", default_value_t = Strategy::Switching)]
    strategy: Strategy,

    /// Milliseconds between people
    #[arg(long, env = "VISOR_OUTER_PERIOD_MS", default_value_t = 1000,
          value_parser = clap::value_parser!(u64).range(1..))]
    outer_period_ms: u64,

    /// Milliseconds between options of one person
    #[arg(long, env = "VISOR_INNER_PERIOD_MS", default_value_t = 2000,
          value_parser = clap::value_parser!(u64).range(1..))]
    inner_period_ms: u64,

    /// Maximum number of people to emit
    #[arg(short, long, env = "VISOR_COUNT", default_value_t = 4)]
    count: usize,

    /// Wait out every timer in wall-clock time
    #[arg(long, env = "VISOR_REALTIME")]
    realtime: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            strategy: cli.strategy,
            outer_period: Duration::from_millis(cli.outer_period_ms),
            inner_period: Duration::from_millis(cli.inner_period_ms),
            outer_count: cli.count,
            pacing: if cli.realtime {
                Pacing::RealTime
            } else {
                Pacing::Virtual
            },
        }
    }
}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout only carries records.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from(cli);
    let mut visor = Visor::new(io::stdout().lock());
    let report = run(Catalog::reference(), &config, &mut visor)?;
    tracing::debug!(?report, "done");
    Ok(())
}
