use crate::adapters::{CsvTripSource, JsonTripSource};
use crate::core::queries::ParetoThresholds;
use crate::core::report::QuerySettings;
use crate::core::{Driver, TripSource};
use crate::utils::error::{ParkError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LEDGER_FORMATS: [&str; 2] = ["csv", "json"];
pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkConfig {
    pub ledger: LedgerConfig,
    pub queries: Option<QueriesConfig>,
    pub pareto: Option<ParetoConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub format: String,
    pub path: String,
    pub drivers: Option<String>,
    pub passengers: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueriesConfig {
    pub min_trips: Option<usize>,
    pub frequent_passengers_of: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParetoConfig {
    pub revenue_share: Option<f64>,
    pub driver_share: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

/// Guess the ledger format from a file extension, defaulting to CSV.
pub fn infer_format(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => "json",
        _ => "csv",
    }
}

impl ParkConfig {
    /// Minimal configuration reading a single ledger file.
    pub fn for_path(path: &str) -> Self {
        Self {
            ledger: LedgerConfig {
                format: infer_format(path).to_string(),
                path: path.to_string(),
                drivers: None,
                passengers: None,
            },
            queries: None,
            pareto: None,
            output: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ParkError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown names as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ParkError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn min_trips(&self) -> usize {
        self.queries.as_ref().and_then(|q| q.min_trips).unwrap_or(0)
    }

    pub fn pareto_thresholds(&self) -> ParetoThresholds {
        let defaults = ParetoThresholds::default();
        match &self.pareto {
            Some(p) => ParetoThresholds {
                revenue_share: p.revenue_share.unwrap_or(defaults.revenue_share),
                driver_share: p.driver_share.unwrap_or(defaults.driver_share),
            },
            None => defaults,
        }
    }

    pub fn output_format(&self) -> &str {
        self.output.as_ref().map(|o| o.format.as_str()).unwrap_or("text")
    }

    pub fn query_settings(&self) -> QuerySettings {
        let frequent_passengers_of = self
            .queries
            .as_ref()
            .and_then(|q| q.frequent_passengers_of.as_ref())
            .map(|ids| ids.iter().map(|id| Driver::from(id.as_str())).collect())
            .unwrap_or_default();

        QuerySettings {
            min_trips: self.min_trips(),
            frequent_passengers_of,
            pareto: self.pareto_thresholds(),
        }
    }

    pub fn trip_source(&self) -> Box<dyn TripSource> {
        match self.ledger.format.as_str() {
            "json" => Box::new(JsonTripSource::new(&self.ledger.path)),
            _ => {
                let mut source = CsvTripSource::new(&self.ledger.path);
                if let Some(drivers) = &self.ledger.drivers {
                    source = source.with_drivers(drivers);
                }
                if let Some(passengers) = &self.ledger.passengers {
                    source = source.with_passengers(passengers);
                }
                Box::new(source)
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("ledger.path", &self.ledger.path)?;
        validation::validate_one_of("ledger.format", &self.ledger.format, &LEDGER_FORMATS)?;

        for (field, roster) in [
            ("ledger.drivers", &self.ledger.drivers),
            ("ledger.passengers", &self.ledger.passengers),
        ] {
            if let Some(path) = roster {
                validation::validate_path(field, path)?;
                if self.ledger.format == "json" {
                    return Err(ParkError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: path.clone(),
                        reason: "Rosters only apply to the csv format".to_string(),
                    });
                }
            }
        }

        if let Some(ids) = self.queries.as_ref().and_then(|q| q.frequent_passengers_of.as_ref()) {
            for id in ids {
                validation::validate_non_empty_string("queries.frequent_passengers_of", id)?;
            }
        }

        let pareto = self.pareto_thresholds();
        validation::validate_share("pareto.revenue_share", pareto.revenue_share)?;
        validation::validate_share("pareto.driver_share", pareto.driver_share)?;

        validation::validate_one_of("output.format", self.output_format(), &OUTPUT_FORMATS)?;

        Ok(())
    }
}

impl Validate for ParkConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
