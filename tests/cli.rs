use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const SCENARIO: &str = "data/scenarios/sun_earth_moon.toml";

fn simulate(output: &Path, extra: &[&str]) {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(["--scenario", SCENARIO, "--frames", "3", "--steps-per-frame", "6"])
        .args(["--output", output.to_str().unwrap()])
        .args(extra)
        .assert()
        .success();
}

#[test]
fn simulate_writes_csv_and_summary_sidecar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("run.csv");
    simulate(&csv_path, &[]);

    let mut rdr = csv::Reader::from_path(&csv_path).expect("csv reader");
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["frame", "time_s", "body", "x_m", "y_m", "z_m", "vx_m_s", "vy_m_s", "vz_m_s"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    // frame 0 plus three frames, three bodies each
    assert_eq!(rows.len(), 12);
    assert_eq!(&rows[0][2], "Sun");
    assert_eq!(&rows[11][0], "3");
    assert_eq!(&rows[11][2], "Moon");
    let final_time: f64 = rows[11][1].parse().unwrap();
    assert!((final_time - 3.0 * 6.0 * 600.0).abs() < 1e-6);

    let sidecar = dir.path().join("run_summary.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&sidecar).expect("sidecar")).unwrap();
    assert_eq!(json["scenario"], "sun-earth-moon");
    assert_eq!(json["ordering"], "gauss_seidel");
    assert_eq!(json["frames"], 3);
    assert_eq!(json["steps_per_frame"], 6);
    assert!(json["generated_utc"].as_str().unwrap().ends_with('Z'));
    let bodies = json["bodies"].as_array().unwrap();
    assert_eq!(bodies.len(), 3);
    assert!(bodies[0]["elements"].is_null());
    assert_eq!(bodies[2]["parent"], "Earth");
    let moon_sma = bodies[2]["elements"]["sma_m"].as_f64().unwrap();
    assert!((moon_sma - 3.844e8).abs() / 3.844e8 < 0.05);
}

#[test]
fn ordering_override_is_recorded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("jacobi.csv");
    let summary_path = dir.path().join("meta").join("jacobi.json");
    simulate(
        &csv_path,
        &["--ordering", "jacobi", "--summary", summary_path.to_str().unwrap()],
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).expect("summary")).unwrap();
    assert_eq!(json["ordering"], "jacobi");
    assert!(!dir.path().join("jacobi_summary.json").exists());
}

#[test]
fn simulate_streams_to_stdout() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(["--scenario", SCENARIO, "--frames", "1", "--steps-per-frame", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "frame,time_s,body,x_m,y_m,z_m,vx_m_s,vy_m_s,vz_m_s\n0,0,Sun,",
        ));
}

#[test]
fn simulate_reports_missing_scenarios() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(["--scenario", "data/scenarios/nope.yaml", "--frames", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading scenario"));
}

#[test]
fn plot_trajectory_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("tracks.csv");
    let png_path = dir.path().join("tracks.png");
    simulate(&csv_path, &[]);

    Command::cargo_bin("plot_trajectory")
        .expect("plot_trajectory bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "300",
            "--plain",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn plot_trajectory_rejects_unknown_bodies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("tracks.csv");
    simulate(&csv_path, &[]);

    Command::cargo_bin("plot_trajectory")
        .expect("plot_trajectory bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("none.png").to_str().unwrap(),
            "--body",
            "Vulcan",
            "--plain",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No samples"));
}

#[test]
fn simulate_rejects_step_counts_that_overflow() {
    let frames = usize::MAX.to_string();
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(["--scenario", SCENARIO, "--frames", frames.as_str(), "--steps-per-frame", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overflow the step counter"));
}
