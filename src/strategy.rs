//! Choosing and running one flattening strategy.

use core::fmt;
use core::pin::Pin;
use core::str::FromStr;
use core::time::Duration;
use std::io::Write;
use std::rc::Rc;

use futures_core::Stream;
use futures_lite::StreamExt;

use crate::catalog::{self, Catalog, Person};
use crate::error::ParseStrategyError;
use crate::flatten::FlattenExt;
use crate::sink::{self, Visor};
use crate::time::{Clock, Runtime};
use crate::{Config, Error, Record};

/// A boxed stream of records which lives on the current thread.
pub type LocalRecords = Pin<Box<dyn Stream<Item = Record>>>;

/// How the stream of people is flattened into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Drain each person's options before starting the next person's.
    #[cfg_attr(feature = "cli", value(name = "concat", aliases = ["sequential", "concat_map"]))]
    Sequential,
    /// Run every person's options concurrently.
    #[cfg_attr(feature = "cli", value(name = "merge", aliases = ["parallel", "merge_map"]))]
    Parallel,
    /// Drop the current person's options as soon as the next person arrives.
    #[cfg_attr(feature = "cli", value(name = "switch", aliases = ["switching", "switch_map"]))]
    Switching,
}

impl Strategy {
    /// Every strategy, in the order they are usually compared.
    pub const ALL: [Strategy; 3] = [
        Strategy::Sequential,
        Strategy::Parallel,
        Strategy::Switching,
    ];

    /// Returns the operator-style name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "concat",
            Strategy::Parallel => "merge",
            Strategy::Switching => "switch",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concat" | "concat_map" | "sequential" => Ok(Strategy::Sequential),
            "merge" | "merge_map" | "parallel" => Ok(Strategy::Parallel),
            "switch" | "switch_map" | "switching" => Ok(Strategy::Switching),
            _ => Err(ParseStrategyError(s.to_owned())),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// The strategy that ran.
    pub strategy: Strategy,
    /// Number of records appended to the visor.
    pub records: usize,
    /// Virtual time from start until the flattened stream completed.
    pub elapsed: Duration,
}

/// Build the flattened record stream for `config.strategy`.
///
/// Nothing happens until the stream is polled on a [`Runtime`] driving
/// `clock`.
///
/// # Panics
///
/// Panics if either period in `config` is zero. Use [`Config::validate`]
/// first when the config comes from outside.
pub fn pipeline(clock: &Clock, catalog: Rc<Catalog>, config: &Config) -> LocalRecords {
    let outer = catalog::people(clock, &catalog, config.outer_period, config.outer_count);

    let inner_clock = clock.clone();
    let inner_period = config.inner_period;
    let project = move |person: Person| {
        catalog::options(&inner_clock, &catalog, &person.hobby, inner_period)
            .map(move |option| Record::new(&person, option))
    };

    match config.strategy {
        Strategy::Sequential => Box::pin(outer.concat_map(project)),
        Strategy::Parallel => Box::pin(outer.merge_map(project)),
        Strategy::Switching => Box::pin(outer.switch_map(project)),
    }
}

/// Run the scenario on a fresh clock, appending every record to `visor`.
///
/// Returns [`Error::ZeroPeriod`] without writing anything if `config` has a
/// zero period.
pub fn run<W: Write>(
    catalog: Catalog,
    config: &Config,
    visor: &mut Visor<W>,
) -> Result<Report, Error> {
    config.validate()?;
    let clock = Clock::new();
    let runtime = Runtime::new(clock.clone()).with_pacing(config.pacing);
    tracing::info!(
        strategy = %config.strategy,
        people = catalog.people.len().min(config.outer_count),
        "running scenario"
    );

    let records = pipeline(&clock, Rc::new(catalog), config);
    let records = runtime.block_on(sink::drain(records, visor))??;

    let report = Report {
        strategy: config.strategy,
        records,
        elapsed: clock.now().since_start(),
    };
    tracing::info!(
        strategy = %report.strategy,
        records = report.records,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "scenario finished"
    );
    Ok(report)
}
