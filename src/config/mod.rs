pub mod toml_config;

pub use toml_config::ParkConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_required_field, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "taxi-park")]
#[command(about = "Answer analytical questions about a taxi park's trips")]
pub struct CliConfig {
    /// TOML configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<String>,

    /// Ledger file (trips CSV or whole-ledger JSON)
    #[arg(long)]
    pub trips: Option<String>,

    /// One-column CSV roster of every driver
    #[arg(long)]
    pub drivers: Option<String>,

    /// One-column CSV roster of every passenger
    #[arg(long)]
    pub passengers: Option<String>,

    /// Ledger format: csv or json (guessed from the extension when omitted)
    #[arg(long)]
    pub format: Option<String>,

    /// Minimum number of trips for a faithful passenger
    #[arg(long)]
    pub min_trips: Option<usize>,

    /// Driver whose frequent passengers should be listed (repeatable)
    #[arg(long = "driver")]
    pub drivers_of_interest: Vec<String>,

    /// Report format: text or json
    #[arg(long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the optional TOML file with the command line flags.
    pub fn resolve(&self) -> Result<ParkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Reading configuration from {}", path);
                let mut config = ParkConfig::from_file(path)?;
                if let Some(trips) = &self.trips {
                    config.ledger.path = trips.clone();
                    config.ledger.format = toml_config::infer_format(trips).to_string();
                }
                config
            }
            None => ParkConfig::for_path(validate_required_field("trips", &self.trips)?),
        };

        if let Some(format) = &self.format {
            config.ledger.format = format.clone();
        }
        if let Some(drivers) = &self.drivers {
            config.ledger.drivers = Some(drivers.clone());
        }
        if let Some(passengers) = &self.passengers {
            config.ledger.passengers = Some(passengers.clone());
        }

        let queries = config.queries.get_or_insert_with(Default::default);
        if let Some(min_trips) = self.min_trips {
            queries.min_trips = Some(min_trips);
        }
        if !self.drivers_of_interest.is_empty() {
            queries.frequent_passengers_of = Some(self.drivers_of_interest.clone());
        }

        if let Some(output) = &self.output {
            config.output = Some(toml_config::OutputConfig {
                format: output.clone(),
            });
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::error::ParkError;

    #[test]
    fn test_flags_without_config_file() {
        let cli = CliConfig::parse_from([
            "taxi-park",
            "--trips",
            "park.json",
            "--min-trips",
            "2",
            "--driver",
            "D1",
            "--driver",
            "D2",
            "--output",
            "json",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.ledger.format, "json");
        assert_eq!(config.min_trips(), 2);
        assert_eq!(config.query_settings().frequent_passengers_of.len(), 2);
        assert_eq!(config.output_format(), "json");
    }

    #[test]
    fn test_trips_flag_overrides_config_file_format() {
        let mut toml_file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut toml_file,
            b"[ledger]\nformat = \"csv\"\npath = \"trips.csv\"\n",
        )
        .unwrap();
        let config_path = toml_file.path().to_str().unwrap();

        let cli = CliConfig::parse_from(["taxi-park", "--config", config_path, "--trips", "park.json"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.ledger.path, "park.json");
        assert_eq!(config.ledger.format, "json");
        assert_eq!(config.trip_source().describe(), "JSON file park.json");

        let cli = CliConfig::parse_from([
            "taxi-park",
            "--config",
            config_path,
            "--trips",
            "park.json",
            "--format",
            "csv",
        ]);
        assert_eq!(cli.resolve().unwrap().ledger.format, "csv");
    }

    #[test]
    fn test_missing_ledger_path() {
        let cli = CliConfig::parse_from(["taxi-park", "--min-trips", "2"]);
        assert!(matches!(
            cli.resolve(),
            Err(ParkError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_output_format_is_rejected() {
        let cli = CliConfig::parse_from(["taxi-park", "--trips", "trips.csv", "--output", "xml"]);
        assert!(matches!(
            cli.resolve(),
            Err(ParkError::InvalidConfigValueError { .. })
        ));
    }
}
