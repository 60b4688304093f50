use thiserror::Error;

use crate::time::Instant;

/// Errors which can occur while running a scenario.
///
/// A hobby without options is not an error; it is an empty inner stream.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing to the visor failed.
    #[error("failed to write to the visor: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    /// A period in the config was zero.
    #[error("`{field}` must be non-zero")]
    ZeroPeriod {
        /// Name of the offending config field.
        field: &'static str,
    },

    /// The future was pending while no timer was left to wake it.
    #[error("runtime stalled at {at}: future is pending with no live timers")]
    Stalled {
        /// Virtual time at which the runtime gave up.
        at: Instant,
    },
}

/// The strategy name did not match any known strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}`, expected one of: concat, merge, switch")]
pub struct ParseStrategyError(pub(crate) String);
