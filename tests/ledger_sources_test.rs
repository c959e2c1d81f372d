use std::io::Write;
use taxi_park::{
    CsvTripSource, JsonTripSource, ParkConfig, ParkError, QuerySettings, ReportEngine, TripSource,
};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

const TRIPS_CSV: &str = "\
driver,passengers,duration,cost,discount
D1,P1;P2,12,40.0,0.1
D1,P1,14,30.0,0.2
D2,P2,3,10.0,
";

#[test]
fn test_csv_source_with_rosters() {
    let dir = TempDir::new().unwrap();
    let trips = write_file(&dir, "trips.csv", TRIPS_CSV);
    let drivers = write_file(&dir, "drivers.csv", "id\nD1\nD2\nD3\n");
    let passengers = write_file(&dir, "passengers.csv", "id\nP1\nP2\nP3\n");

    let ledger = CsvTripSource::new(&trips)
        .with_drivers(&drivers)
        .with_passengers(&passengers)
        .load()
        .unwrap();

    assert_eq!(ledger.all_drivers().len(), 3);
    assert_eq!(ledger.all_passengers().len(), 3);
    assert_eq!(ledger.trips().len(), 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");

    let result = CsvTripSource::new(missing).load();
    assert!(matches!(result, Err(ParkError::IoError(_))));
}

#[test]
fn test_json_source_round_trip_through_report() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "park.json",
        r#"{
            "drivers": ["D1", "D2", "D3", "D4", "D5"],
            "passengers": ["P1", "P2"],
            "trips": [
                {"driver": "D1", "passengers": ["P1"], "duration": 31, "cost": 90.0},
                {"driver": "D2", "passengers": ["P2"], "duration": 8, "cost": 10.0, "discount": 0.5}
            ]
        }"#,
    );

    let report = ReportEngine::new(JsonTripSource::new(&path))
        .run(&QuerySettings::default())
        .unwrap();

    assert_eq!(report.fake_drivers, vec!["D3", "D4", "D5"]);
    assert_eq!(report.smart_passengers, vec!["P2"]);
    assert!(report.pareto_principle);
}

#[test]
fn test_toml_config_drives_report() {
    let dir = TempDir::new().unwrap();
    let trips = write_file(&dir, "trips.csv", TRIPS_CSV);
    let drivers = write_file(&dir, "drivers.csv", "id\nD1\nD2\nD3\n");
    let config_path = write_file(
        &dir,
        "park.toml",
        &format!(
            r#"
[ledger]
format = "csv"
path = "{}"
drivers = "{}"

[queries]
min_trips = 2
frequent_passengers_of = ["D1"]

[output]
format = "json"
"#,
            trips, drivers
        ),
    );

    let config = ParkConfig::from_file(&config_path).unwrap();
    config.validate_config().unwrap();

    let report = ReportEngine::new(config.trip_source())
        .run(&config.query_settings())
        .unwrap();

    assert_eq!(report.fake_drivers, vec!["D3"]);
    assert_eq!(report.faithful_passengers, vec!["P1", "P2"]);
    assert_eq!(report.frequent_passengers[0].passengers, vec!["P1"]);
    assert_eq!(report.smart_passengers, vec!["P1"]);
    assert_eq!(report.most_frequent_period.as_ref().map(|p| p.start), Some(10));
    assert!(!report.pareto_principle);
}
