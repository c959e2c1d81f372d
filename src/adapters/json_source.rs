use crate::core::{Driver, Passenger, Trip, TripLedger, TripSource};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// On-disk shape of a whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub drivers: Vec<Driver>,
    pub passengers: Vec<Passenger>,
    pub trips: Vec<Trip>,
}

impl LedgerDocument {
    pub fn into_ledger(self) -> Result<TripLedger> {
        TripLedger::new(self.drivers, self.passengers, self.trips)
    }
}

#[derive(Debug, Clone)]
pub struct JsonTripSource {
    path: PathBuf,
}

impl JsonTripSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<TripLedger> {
        let document: LedgerDocument = serde_json::from_reader(reader)?;
        tracing::debug!(
            "Parsed JSON ledger: {} drivers, {} passengers, {} trips",
            document.drivers.len(),
            document.passengers.len(),
            document.trips.len()
        );
        document.into_ledger()
    }
}

impl TripSource for JsonTripSource {
    fn load(&self) -> Result<TripLedger> {
        let file = File::open(&self.path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }
}
