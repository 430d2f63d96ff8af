use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pv-lifecycle"))
        .args(args)
        .output()
        .expect("pv-lifecycle process should run")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8")
}

#[test]
fn default_run_prints_report() {
    let stdout = stdout_of(&run(&[]));
    assert!(stdout.contains("--- Lifecycle Report ---"));
    assert!(stdout.contains("LCOE PV:"));
    assert!(stdout.contains("LCOE system:"));
    assert!(stdout.contains("NPV:"));
}

#[test]
fn every_scenario_file_runs() {
    for path in [
        "scenarios/residential.toml",
        "scenarios/commercial.toml",
        "scenarios/shared.toml",
        "scenarios/measured.toml",
    ] {
        let stdout = stdout_of(&run(&["--scenario", path]));
        assert!(stdout.contains("NPV:"), "{path} printed no NPV: {stdout}");
    }
}

#[test]
fn unknown_preset_exits_with_error() {
    let output = run(&["--preset", "nonexistent"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr: {stderr}");
}

#[test]
fn scenario_and_preset_conflict() {
    let output = run(&[
        "--scenario",
        "scenarios/residential.toml",
        "--preset",
        "commercial",
    ]);
    assert!(!output.status.success());
}

#[test]
fn missing_data_file_exits_with_error() {
    let output = run(&["--data", "scenarios/data/does_not_exist.csv"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does_not_exist.csv"), "stderr: {stderr}");
}

#[test]
fn shared_preset_reports_every_user() {
    let stdout = stdout_of(&run(&["--preset", "shared"]));
    for id in ["user1", "user2", "user3", "user4", "user5"] {
        assert!(stdout.contains(&format!("User {id}")), "missing {id}");
    }
    assert!(!stdout.contains("error:"));
}

#[test]
fn json_output_parses() {
    let stdout = stdout_of(&run(&["--preset", "commercial", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert!(value["npv"].is_number());
    assert!(value["lcoe_pv"].is_number());
    assert_eq!(value["years"].as_array().map(Vec::len), Some(25));

    let stdout = stdout_of(&run(&["--preset", "shared", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    let users = value.as_object().expect("shared JSON should be an object");
    assert_eq!(users.len(), 5);
    assert!(users["user1"]["npv"].is_number());
}

#[test]
fn series_out_writes_one_row_per_year() {
    let path = std::env::temp_dir().join(format!("pv-lifecycle-series-{}.csv", std::process::id()));
    let path_str = path.to_string_lossy().to_string();

    stdout_of(&run(&[
        "--scenario",
        "scenarios/measured.toml",
        "--series-out",
        &path_str,
    ]));

    let content = fs::read_to_string(&path).expect("series CSV should exist");
    let _ = fs::remove_file(&path);
    let lines: Vec<&str> = content.lines().collect();
    // 1 header + 10 years
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("year,generation_kwh,"));
    assert!(lines[1].starts_with("1,"));
}
