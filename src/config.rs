use core::time::Duration;

use crate::time::Pacing;
use crate::{Error, Strategy};

/// Period of the outer stream of people.
pub const OUTER_PERIOD: Duration = Duration::from_millis(1000);

/// Period of each inner stream of options.
pub const INNER_PERIOD: Duration = Duration::from_millis(2000);

/// How many people the outer stream emits.
pub const OUTER_COUNT: usize = 4;

/// Settings for one run of the scenario.
///
/// The defaults reproduce the reference page: switching, with people every
/// second and options every two seconds.
///
/// Both periods must be non-zero. [`run`](crate::run) rejects a config
/// which breaks this with [`Error::ZeroPeriod`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Which flattening strategy to run.
    pub strategy: Strategy,
    /// Time between people.
    pub outer_period: Duration,
    /// Time between options of one person.
    pub inner_period: Duration,
    /// Upper bound on the number of people emitted.
    pub outer_count: usize,
    /// Whether to jump between deadlines or wait them out.
    pub pacing: Pacing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::Switching,
            outer_period: OUTER_PERIOD,
            inner_period: INNER_PERIOD,
            outer_count: OUTER_COUNT,
            pacing: Pacing::Virtual,
        }
    }
}

impl Config {
    /// Returns the default config running `strategy`.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Check that both periods are non-zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.outer_period.is_zero() {
            return Err(Error::ZeroPeriod {
                field: "outer_period",
            });
        }
        if self.inner_period.is_zero() {
            return Err(Error::ZeroPeriod {
                field: "inner_period",
            });
        }
        Ok(())
    }
}
