use crate::core::{Driver, Passenger, Trip, TripLedger, TripSource};
use crate::utils::error::Result;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Separator between passenger ids inside the `passengers` column.
pub const PASSENGER_SEPARATOR: char = ';';

#[derive(Debug, Deserialize)]
struct TripRow {
    driver: String,
    passengers: String,
    duration: u32,
    cost: f64,
    discount: Option<f64>,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        let passengers = row
            .passengers
            .split(PASSENGER_SEPARATOR)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Passenger::from);

        Trip {
            driver: Driver(row.driver),
            passengers: passengers.collect(),
            duration: row.duration,
            cost: row.cost,
            discount: row.discount,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
}

/// Trips from a CSV file with header `driver,passengers,duration,cost,discount`,
/// plus optional one-column (`id`) rosters of drivers and passengers. A missing
/// roster is derived from the trips.
#[derive(Debug, Clone)]
pub struct CsvTripSource {
    trips_path: PathBuf,
    drivers_path: Option<PathBuf>,
    passengers_path: Option<PathBuf>,
}

impl CsvTripSource {
    pub fn new(trips_path: impl Into<PathBuf>) -> Self {
        Self {
            trips_path: trips_path.into(),
            drivers_path: None,
            passengers_path: None,
        }
    }

    pub fn with_drivers(mut self, path: impl Into<PathBuf>) -> Self {
        self.drivers_path = Some(path.into());
        self
    }

    pub fn with_passengers(mut self, path: impl Into<PathBuf>) -> Self {
        self.passengers_path = Some(path.into());
        self
    }

    pub fn read_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut trips = Vec::new();
        for row in csv_reader.deserialize::<TripRow>() {
            trips.push(Trip::from(row?));
        }
        tracing::debug!("Read {} trips from CSV", trips.len());
        Ok(trips)
    }

    pub fn read_roster<R: Read>(reader: R) -> Result<Vec<String>> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut ids = Vec::new();
        for row in csv_reader.deserialize::<RosterRow>() {
            ids.push(row?.id);
        }
        Ok(ids)
    }

    fn roster(path: &Option<PathBuf>) -> Result<Option<Vec<String>>> {
        match path {
            Some(path) => Ok(Some(Self::read_roster(File::open(path)?)?)),
            None => Ok(None),
        }
    }

    /// Assembles a ledger, deriving whichever roster was not supplied.
    pub fn assemble(
        trips: Vec<Trip>,
        drivers: Option<Vec<String>>,
        passengers: Option<Vec<String>>,
    ) -> Result<TripLedger> {
        if drivers.is_none() && passengers.is_none() {
            return TripLedger::from_trips(trips);
        }
        let drivers: Vec<Driver> = match drivers {
            Some(ids) => ids.into_iter().map(Driver).collect(),
            None => trips.iter().map(|t| t.driver.clone()).collect(),
        };
        let passengers: Vec<Passenger> = match passengers {
            Some(ids) => ids.into_iter().map(Passenger).collect(),
            None => trips
                .iter()
                .flat_map(|t| t.passengers.iter().cloned())
                .collect(),
        };
        TripLedger::new(drivers, passengers, trips)
    }
}

impl TripSource for CsvTripSource {
    fn load(&self) -> Result<TripLedger> {
        let trips = Self::read_trips(File::open(&self.trips_path)?)?;
        let drivers = Self::roster(&self.drivers_path)?;
        let passengers = Self::roster(&self.passengers_path)?;
        Self::assemble(trips, drivers, passengers)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.trips_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIPS: &str = "\
driver,passengers,duration,cost,discount
D1,P1;P2,12,20.5,0.1
D1, P1 ,3,7.0,
D2,P3,40,15.0,
";

    #[test]
    fn test_read_trips() {
        let trips = CsvTripSource::read_trips(TRIPS.as_bytes()).unwrap();

        assert_eq!(trips.len(), 3);
        assert_eq!(trips[0].passengers.len(), 2);
        assert_eq!(trips[0].discount, Some(0.1));
        assert_eq!(trips[1].discount, None);
        assert!(trips[1].passengers.contains(&Passenger::from("P1")));
    }

    #[test]
    fn test_assemble_with_roster() {
        let trips = CsvTripSource::read_trips(TRIPS.as_bytes()).unwrap();
        let drivers = CsvTripSource::read_roster("id\nD1\nD2\nD3\n".as_bytes()).unwrap();

        let ledger = CsvTripSource::assemble(trips, Some(drivers), None).unwrap();
        assert_eq!(ledger.all_drivers().len(), 3);
        assert_eq!(ledger.all_passengers().len(), 3);
    }

    #[test]
    fn test_assemble_without_rosters_uses_trip_participants() {
        let trips = CsvTripSource::read_trips(TRIPS.as_bytes()).unwrap();
        let ledger = CsvTripSource::assemble(trips, None, None).unwrap();

        assert_eq!(ledger.all_drivers().len(), 2);
        assert_eq!(ledger.all_passengers().len(), 3);
    }

    #[test]
    fn test_roster_missing_trip_driver_is_rejected() {
        let trips = CsvTripSource::read_trips(TRIPS.as_bytes()).unwrap();
        let drivers = vec!["D1".to_string()];
        assert!(CsvTripSource::assemble(trips, Some(drivers), None).is_err());
    }

    #[test]
    fn test_bad_duration_is_csv_error() {
        let bad = "driver,passengers,duration,cost,discount\nD1,P1,-4,1.0,\n";
        assert!(CsvTripSource::read_trips(bad.as_bytes()).is_err());
    }
}
