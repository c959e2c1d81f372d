pub mod queries;
pub mod report;

pub use crate::domain::model::{Driver, DurationPeriod, Passenger, Trip, TripLedger};
pub use crate::domain::ports::TripSource;
pub use crate::utils::error::Result;
