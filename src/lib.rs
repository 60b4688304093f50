//! Concat, merge and switch flattening of nested timed streams.
//!
//! A slow outer stream of people each fans out into a slower inner stream of
//! hobby options. The three strategies in [`flatten`] combine those nested
//! streams into a single stream of [`Record`]s, and differ only in what they
//! do with an inner stream that is still running when the next person
//! arrives.
//!
//! All timers run on a virtual [`time::Clock`], so every run is
//! deterministic and finishes instantly unless [`time::Pacing::RealTime`] is
//! requested.
//!
//! # Operations
//!
//! - [`flatten::ConcatMap`]: Finish each inner stream before starting the next.
//! - [`flatten::MergeMap`]: Run all inner streams concurrently.
//! - [`flatten::SwitchMap`]: Cancel the running inner stream when a new one starts.
//!
//! # Examples
//!
//! Run the reference scenario sequentially:
//!
//! ```rust
//! use flatten_concurrency::catalog::Catalog;
//! use flatten_concurrency::sink::Visor;
//! use flatten_concurrency::{run, Config, Strategy};
//!
//! let mut visor = Visor::new(Vec::new());
//! let config = Config::with_strategy(Strategy::Sequential);
//! let report = run(Catalog::reference(), &config, &mut visor).unwrap();
//! assert_eq!(report.records, 7);
//!
//! let out = String::from_utf8(visor.into_inner()).unwrap();
//! assert_eq!(
//!     out.lines().next(),
//!     Some(r#"{"usuario":"Antonio","aficion":"Lectura","opcion":"It"}"#),
//! );
//! ```

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

/// The flatten-concurrency prelude.
pub mod prelude {
    pub use super::flatten::FlattenExt as _;
}

pub mod catalog;
pub mod flatten;
pub mod sink;
pub mod time;

mod config;
mod error;
mod record;
mod strategy;

pub use config::{Config, INNER_PERIOD, OUTER_COUNT, OUTER_PERIOD};
pub use error::{Error, ParseStrategyError};
pub use record::Record;
pub use strategy::{pipeline, run, LocalRecords, Report, Strategy};
