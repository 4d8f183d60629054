use finite_burn_sim::config::parse_toml;
use finite_burn_sim::export::{report, telemetry, writer_for_path};
use finite_burn_sim::guidance::CancellationToken;
use finite_burn_sim::sim::run_scenario;

const SCENARIO: &str = r#"
name = "export-check"

[burn]
steering_mode = "tangent"
burn_mode = "impulse_train"
burn_duration_world_s = 120.0
target_orbit_radius_km = 7500.0
"#;

#[test]
fn run_artifacts_round_trip_through_disk() {
    let config = parse_toml(&format!(
        "{SCENARIO}\n[vehicle]\ninitial_radius_km = 7000.0\n"
    ))
    .expect("scenario");
    let output = run_scenario(&config, CancellationToken::new()).expect("run");
    let dir = tempfile::tempdir().expect("tempdir");

    let report_path = dir.path().join("reports/export-check.json");
    {
        let mut writer = writer_for_path(&report_path).expect("report writer");
        report::write_json(&mut *writer, &output.scenario, &output.report).expect("json");
    }
    let json: serde_json::Value =
        serde_json::from_reader(std::fs::File::open(&report_path).unwrap()).unwrap();
    assert_eq!(json["scenario"], "export-check");
    assert_eq!(json["report"]["outcome"], "converged");
    let spent = json["report"]["total_delta_v_km_s"].as_f64().unwrap();
    assert!((spent - output.report.total_delta_v_km_s).abs() < 1e-12);
    let overhead = json["delta_v_overhead_km_s"].as_f64().unwrap();
    assert!((overhead - output.report.delta_v_overhead_km_s()).abs() < 1e-12);

    let telemetry_path = dir.path().join("telemetry.csv");
    {
        let mut writer = writer_for_path(&telemetry_path).expect("telemetry writer");
        telemetry::write_all(&mut *writer, &output.telemetry).expect("csv");
    }
    let mut reader = csv::Reader::from_path(&telemetry_path).expect("csv reader");
    let apogees: Vec<f64> = reader
        .records()
        .map(|r| r.unwrap()[2].parse::<f64>().unwrap())
        .collect();
    assert_eq!(apogees.len(), output.telemetry.len());
    assert!(apogees.windows(2).all(|w| w[1] >= w[0] - 1e-3));
    assert!(*apogees.last().unwrap() >= 7_499.0);
}

#[test]
fn summary_mentions_outcome_and_spend() {
    let config = parse_toml(&format!(
        "{SCENARIO}\n[vehicle]\ninitial_radius_km = 7000.0\n"
    ))
    .expect("scenario");
    let output = run_scenario(&config, CancellationToken::new()).expect("run");
    let text = report::summary(&output.scenario, &output.report);
    assert!(text.contains("export-check"));
    assert!(text.contains("Converged"));
    assert!(text.contains("km/s spent"));
}
