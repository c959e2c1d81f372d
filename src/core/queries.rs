use crate::domain::model::{Driver, DurationPeriod, Passenger, Trip, TripLedger};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Width of a duration bucket in minutes.
pub const PERIOD_WIDTH: u32 = 10;

/// Shares used by the Pareto check: `driver_share` of the drivers must
/// bring in at least `revenue_share` of the revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoThresholds {
    pub revenue_share: f64,
    pub driver_share: f64,
}

impl Default for ParetoThresholds {
    fn default() -> Self {
        Self {
            revenue_share: 0.8,
            driver_share: 0.2,
        }
    }
}

/// Read-only queries over a borrowed ledger. Holds no state of its own, so
/// one ledger can be queried from many threads at once.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    ledger: &'a TripLedger,
}

impl<'a> QueryEngine<'a> {
    pub fn new(ledger: &'a TripLedger) -> Self {
        Self { ledger }
    }

    /// Drivers who performed no trips.
    pub fn find_fake_drivers(&self) -> HashSet<Driver> {
        let working: HashSet<&Driver> = self.ledger.trips().iter().map(|t| &t.driver).collect();

        let fake: HashSet<Driver> = self
            .ledger
            .all_drivers()
            .iter()
            .filter(|d| !working.contains(d))
            .cloned()
            .collect();

        tracing::debug!("Found {} fake drivers", fake.len());
        fake
    }

    /// Passengers who took part in at least `min_trips` trips.
    pub fn find_faithful_passengers(&self, min_trips: usize) -> HashSet<Passenger> {
        let counts = self.trip_counts(|_| true);

        let faithful: HashSet<Passenger> = self
            .ledger
            .all_passengers()
            .iter()
            .filter(|p| counts.get(p).copied().unwrap_or(0) >= min_trips)
            .cloned()
            .collect();

        tracing::debug!(min_trips, "Found {} faithful passengers", faithful.len());
        faithful
    }

    /// Passengers taken by `driver` more than once.
    pub fn find_frequent_passengers(&self, driver: &Driver) -> HashSet<Passenger> {
        let frequent: HashSet<Passenger> = self
            .trip_counts(|t| t.driver == *driver)
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(p, _)| p.clone())
            .collect();

        tracing::debug!(%driver, "Found {} frequent passengers", frequent.len());
        frequent
    }

    /// Passengers whose discounted trips outnumber their full-price trips.
    pub fn find_smart_passengers(&self) -> HashSet<Passenger> {
        // (discounted, full price)
        let mut tally: HashMap<&Passenger, (usize, usize)> = HashMap::new();
        for trip in self.ledger.trips() {
            for passenger in &trip.passengers {
                let entry = tally.entry(passenger).or_default();
                if trip.has_discount() {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }

        let smart: HashSet<Passenger> = tally
            .into_iter()
            .filter(|(_, (discounted, full))| discounted > full)
            .map(|(p, _)| p.clone())
            .collect();

        tracing::debug!("Found {} smart passengers", smart.len());
        smart
    }

    /// The 10-minute period (`0..=9`, `10..=19`, ...) holding the most trips,
    /// or `None` when there are no trips. Ties go to the earliest period.
    /// The period containing `u32::MAX` ends at `u32::MAX`.
    pub fn find_most_frequent_trip_duration_period(&self) -> Option<DurationPeriod> {
        let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
        for trip in self.ledger.trips() {
            *buckets.entry(trip.duration / PERIOD_WIDTH).or_default() += 1;
        }

        let mut best: Option<(u32, usize)> = None;
        for (bucket, count) in buckets {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((bucket, count));
            }
        }

        let period = best.map(|(bucket, _)| {
            let start = bucket * PERIOD_WIDTH;
            start..=start.saturating_add(PERIOD_WIDTH - 1)
        });
        tracing::debug!(?period, "Most frequent trip duration period");
        period
    }

    /// Whether 20% of the drivers bring in 80% of the revenue.
    pub fn check_pareto_principle(&self) -> bool {
        self.check_pareto_principle_with(ParetoThresholds::default())
    }

    /// Pareto check with custom shares. Drivers without trips still count
    /// towards the size of the driver pool.
    pub fn check_pareto_principle_with(&self, thresholds: ParetoThresholds) -> bool {
        let trips = self.ledger.trips();
        if trips.is_empty() {
            return false;
        }

        let total_revenue: f64 = trips.iter().map(|t| t.cost).sum();

        let mut revenue_by_driver: HashMap<&Driver, f64> = HashMap::new();
        for trip in trips {
            *revenue_by_driver.entry(&trip.driver).or_default() += trip.cost;
        }
        let mut ranked: Vec<f64> = revenue_by_driver.into_values().collect();
        ranked.sort_by(|a, b| b.total_cmp(a));

        let target = total_revenue * thresholds.revenue_share;
        let mut accumulated = 0.0;
        let mut top_drivers = 0usize;
        for revenue in ranked {
            top_drivers += 1;
            accumulated += revenue;
            if accumulated >= target {
                break;
            }
        }

        let allowed = self.ledger.all_drivers().len() as f64 * thresholds.driver_share;
        let holds = top_drivers as f64 <= allowed;
        tracing::debug!(
            top_drivers,
            allowed,
            total_revenue,
            "Pareto principle {}",
            if holds { "holds" } else { "does not hold" }
        );
        holds
    }

    fn trip_counts<F>(&self, mut keep: F) -> HashMap<&'a Passenger, usize>
    where
        F: FnMut(&Trip) -> bool,
    {
        let mut counts: HashMap<&'a Passenger, usize> = HashMap::new();
        for trip in self.ledger.trips().iter().filter(|t| keep(*t)) {
            for passenger in &trip.passengers {
                *counts.entry(passenger).or_default() += 1;
            }
        }
        counts
    }
}
