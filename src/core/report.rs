use crate::core::queries::{ParetoThresholds, QueryEngine};
use crate::domain::model::{Driver, TripLedger};
use crate::domain::ports::TripSource;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Parameters for the queries that take them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    pub min_trips: usize,
    pub frequent_passengers_of: Vec<Driver>,
    pub pareto: ParetoThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentPassengers {
    pub driver: String,
    pub passengers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub drivers: usize,
    pub passengers: usize,
    pub trips: usize,
    pub revenue: f64,
}

/// Every query answer for one ledger, with identities sorted for stable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkReport {
    pub totals: LedgerTotals,
    pub fake_drivers: Vec<String>,
    pub min_trips: usize,
    pub faithful_passengers: Vec<String>,
    pub frequent_passengers: Vec<FrequentPassengers>,
    pub smart_passengers: Vec<String>,
    pub most_frequent_period: Option<PeriodSummary>,
    pub pareto_principle: bool,
}

fn sorted_names<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    let mut names: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    names.sort();
    names
}

impl ParkReport {
    pub fn build(ledger: &TripLedger, settings: &QuerySettings) -> Self {
        let engine = QueryEngine::new(ledger);

        let frequent_passengers = settings
            .frequent_passengers_of
            .iter()
            .map(|driver| FrequentPassengers {
                driver: driver.to_string(),
                passengers: sorted_names(engine.find_frequent_passengers(driver)),
            })
            .collect();

        Self {
            totals: LedgerTotals {
                drivers: ledger.all_drivers().len(),
                passengers: ledger.all_passengers().len(),
                trips: ledger.trips().len(),
                revenue: ledger.total_revenue(),
            },
            fake_drivers: sorted_names(engine.find_fake_drivers()),
            min_trips: settings.min_trips,
            faithful_passengers: sorted_names(engine.find_faithful_passengers(settings.min_trips)),
            frequent_passengers,
            smart_passengers: sorted_names(engine.find_smart_passengers()),
            most_frequent_period: engine
                .find_most_frequent_trip_duration_period()
                .map(|period| PeriodSummary {
                    start: *period.start(),
                    end: *period.end(),
                }),
            pareto_principle: engine.check_pareto_principle_with(settings.pareto),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let list = |names: &[String]| {
            if names.is_empty() {
                "(none)".to_string()
            } else {
                names.join(", ")
            }
        };

        let _ = writeln!(
            out,
            "Taxi park: {} drivers, {} passengers, {} trips, revenue {:.2}",
            self.totals.drivers, self.totals.passengers, self.totals.trips, self.totals.revenue
        );
        let _ = writeln!(out, "Fake drivers: {}", list(&self.fake_drivers));
        let _ = writeln!(
            out,
            "Faithful passengers (>= {} trips): {}",
            self.min_trips,
            list(&self.faithful_passengers)
        );
        for entry in &self.frequent_passengers {
            let _ = writeln!(
                out,
                "Frequent passengers of {}: {}",
                entry.driver,
                list(&entry.passengers)
            );
        }
        let _ = writeln!(out, "Smart passengers: {}", list(&self.smart_passengers));
        match &self.most_frequent_period {
            Some(period) => {
                let _ = writeln!(
                    out,
                    "Most frequent trip duration: {}-{} minutes",
                    period.start, period.end
                );
            }
            None => {
                let _ = writeln!(out, "Most frequent trip duration: no trips");
            }
        }
        let _ = writeln!(
            out,
            "Pareto principle: {}",
            if self.pareto_principle { "holds" } else { "does not hold" }
        );
        out
    }
}

/// Loads a ledger from its source and answers every query against it.
pub struct ReportEngine<S: TripSource> {
    source: S,
}

impl<S: TripSource> ReportEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn run(&self, settings: &QuerySettings) -> Result<ParkReport> {
        tracing::info!("Loading ledger from {}", self.source.describe());
        let ledger = self.source.load()?;
        tracing::info!(
            "Loaded {} trips, {} drivers, {} passengers",
            ledger.trips().len(),
            ledger.all_drivers().len(),
            ledger.all_passengers().len()
        );

        let report = ParkReport::build(&ledger, settings);
        tracing::info!("Report ready");
        Ok(report)
    }
}
