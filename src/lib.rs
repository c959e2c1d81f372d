pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ParkConfig;

pub use crate::adapters::{CsvTripSource, JsonTripSource};
pub use crate::core::queries::{ParetoThresholds, QueryEngine};
pub use crate::core::report::{ParkReport, QuerySettings, ReportEngine};
pub use crate::domain::model::{Driver, DurationPeriod, Passenger, Trip, TripLedger};
pub use crate::domain::ports::TripSource;
pub use crate::utils::error::{ParkError, Result};
