use crate::utils::error::{ParkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Driver(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Passenger(pub String);

impl From<&str> for Driver {
    fn from(name: &str) -> Self {
        Driver(name.to_string())
    }
}

impl From<&str> for Passenger {
    fn from(name: &str) -> Self {
        Passenger(name.to_string())
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive trip duration bucket in minutes, e.g. `10..=19`.
pub type DurationPeriod = RangeInclusive<u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub driver: Driver,
    pub passengers: HashSet<Passenger>,
    /// Minutes.
    pub duration: u32,
    pub cost: f64,
    #[serde(default)]
    pub discount: Option<f64>,
}

impl Trip {
    pub fn new<I>(driver: Driver, passengers: I, duration: u32, cost: f64) -> Self
    where
        I: IntoIterator<Item = Passenger>,
    {
        Self {
            driver,
            passengers: passengers.into_iter().collect(),
            duration,
            cost,
            discount: None,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Only the presence of a discount matters to the queries, never its size.
    pub fn has_discount(&self) -> bool {
        self.discount.is_some()
    }
}

/// Immutable snapshot of a taxi park: every driver, every passenger and the
/// trips between them.
#[derive(Debug, Clone, Default)]
pub struct TripLedger {
    all_drivers: HashSet<Driver>,
    all_passengers: HashSet<Passenger>,
    trips: Vec<Trip>,
}

impl TripLedger {
    /// Builds a ledger, rejecting trips that reference drivers or passengers
    /// outside the rosters, trips without passengers and negative or
    /// non-finite costs.
    pub fn new<D, P>(drivers: D, passengers: P, trips: Vec<Trip>) -> Result<Self>
    where
        D: IntoIterator<Item = Driver>,
        P: IntoIterator<Item = Passenger>,
    {
        let ledger = Self {
            all_drivers: drivers.into_iter().collect(),
            all_passengers: passengers.into_iter().collect(),
            trips,
        };
        ledger.check_invariants()?;
        Ok(ledger)
    }

    /// Derives both rosters from the trips themselves. Drivers without trips
    /// cannot be expressed this way.
    pub fn from_trips(trips: Vec<Trip>) -> Result<Self> {
        let drivers: HashSet<Driver> = trips.iter().map(|t| t.driver.clone()).collect();
        let passengers: HashSet<Passenger> = trips
            .iter()
            .flat_map(|t| t.passengers.iter().cloned())
            .collect();
        Self::new(drivers, passengers, trips)
    }

    fn check_invariants(&self) -> Result<()> {
        for (index, trip) in self.trips.iter().enumerate() {
            if !self.all_drivers.contains(&trip.driver) {
                return Err(ParkError::ledger(format!(
                    "trip #{} references unknown driver '{}'",
                    index, trip.driver
                )));
            }
            if trip.passengers.is_empty() {
                return Err(ParkError::ledger(format!("trip #{} has no passengers", index)));
            }
            if let Some(unknown) = trip
                .passengers
                .iter()
                .find(|p| !self.all_passengers.contains(*p))
            {
                return Err(ParkError::ledger(format!(
                    "trip #{} references unknown passenger '{}'",
                    index, unknown
                )));
            }
            if !trip.cost.is_finite() || trip.cost < 0.0 {
                return Err(ParkError::ledger(format!(
                    "trip #{} has invalid cost {}",
                    index, trip.cost
                )));
            }
        }
        Ok(())
    }

    pub fn all_drivers(&self) -> &HashSet<Driver> {
        &self.all_drivers
    }

    pub fn all_passengers(&self) -> &HashSet<Passenger> {
        &self.all_passengers
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn total_revenue(&self) -> f64 {
        self.trips.iter().map(|t| t.cost).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(driver: &str, passengers: &[&str]) -> Trip {
        Trip::new(
            Driver::from(driver),
            passengers.iter().map(|p| Passenger::from(*p)),
            10,
            12.5,
        )
    }

    #[test]
    fn test_ledger_accepts_consistent_trips() {
        let ledger = TripLedger::new(
            vec![Driver::from("D1"), Driver::from("D2")],
            vec![Passenger::from("P1"), Passenger::from("P2")],
            vec![trip("D1", &["P1", "P2"])],
        )
        .unwrap();

        assert_eq!(ledger.all_drivers().len(), 2);
        assert_eq!(ledger.trips().len(), 1);
        assert_eq!(ledger.total_revenue(), 12.5);
    }

    #[test]
    fn test_ledger_rejects_unknown_driver() {
        let result = TripLedger::new(
            vec![Driver::from("D1")],
            vec![Passenger::from("P1")],
            vec![trip("D9", &["P1"])],
        );
        assert!(matches!(result, Err(ParkError::LedgerError { .. })));
    }

    #[test]
    fn test_ledger_rejects_unknown_passenger() {
        let err = TripLedger::new(
            vec![Driver::from("D1")],
            vec![Passenger::from("P1")],
            vec![trip("D1", &["P1", "P7"])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("P7"));
    }

    #[test]
    fn test_ledger_rejects_empty_passenger_set_and_bad_cost() {
        let drivers = vec![Driver::from("D1")];
        let passengers = vec![Passenger::from("P1")];

        assert!(TripLedger::new(drivers.clone(), passengers.clone(), vec![trip("D1", &[])]).is_err());

        let mut negative = trip("D1", &["P1"]);
        negative.cost = -1.0;
        assert!(TripLedger::new(drivers, passengers, vec![negative]).is_err());
    }

    #[test]
    fn test_from_trips_derives_rosters() {
        let ledger = TripLedger::from_trips(vec![trip("D1", &["P1"]), trip("D2", &["P1", "P2"])])
            .unwrap();
        assert_eq!(ledger.all_drivers().len(), 2);
        assert_eq!(ledger.all_passengers().len(), 2);
    }

    #[test]
    fn test_discount_presence() {
        let plain = trip("D1", &["P1"]);
        assert!(!plain.has_discount());
        assert!(plain.with_discount(0.0).has_discount());
    }
}
