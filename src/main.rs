use anyhow::Context;
use clap::Parser;
use taxi_park::utils::logger;
use taxi_park::{CliConfig, ParkError, ParkReport, ReportEngine};

fn render(report: &ParkReport, format: &str) -> anyhow::Result<String> {
    match format {
        "json" => serde_json::to_string_pretty(report).context("Failed to serialize report"),
        _ => Ok(report.render_text()),
    }
}

fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.resolve()?;
    tracing::debug!("Resolved configuration: {:?}", config);

    let engine = ReportEngine::new(config.trip_source());
    let report = engine.run(&config.query_settings())?;

    println!("{}", render(&report, config.output_format())?);
    Ok(())
}

fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting taxi-park");

    if let Err(e) = run(&cli) {
        match e.downcast_ref::<ParkError>() {
            Some(park_error) => {
                tracing::error!("❌ {}", park_error);
                eprintln!("❌ {}", park_error);
                eprintln!("💡 {}", park_error.recovery_suggestion());
                std::process::exit(park_error.exit_code());
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}
