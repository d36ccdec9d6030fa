use predicates::str::{contains, diff};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be available")
        .as_nanos();
    path.push(format!("elevator-cli-config-{}.{}", nanos, extension));
    fs::write(&path, contents).expect("config write should succeed");
    path
}

#[test]
fn show_config_prints_defaults() {
    let expected = concat!(
        "Elevators: 4\n",
        "Floors: 1..=10\n",
        "Loop interval: 4000ms\n",
        "Random requests: every 5000ms\n",
        "Seed: none\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("elevator-sim");
    cmd.arg("show-config");
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn zero_elevators_falls_back_with_warning() {
    let expected = concat!(
        "Elevators: 4\n",
        "Floors: 1..=10\n",
        "Loop interval: 4000ms\n",
        "Random requests: disabled\n",
        "Seed: 42\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("elevator-sim");
    cmd.args([
        "show-config",
        "--elevators",
        "0",
        "--seed",
        "42",
        "--no-random",
    ]);
    cmd.assert()
        .success()
        .stdout(diff(expected))
        .stderr(contains("using default of 4"));
}

#[test]
fn config_file_toml_drives_the_run() {
    let config = r#"
elevatorsQuantity = 1
minFloor = 1
maxFloor = 5

[randomRequestService]
enabled = false
"#;
    let path = write_temp_config(config, "toml");

    let expected = concat!(
        "Tick 1:\n",
        "Request R1 (4 -> 2) -> E1 [idle]\n",
        "E1: Floor 2 UP | Up:[4] Down:[2] Status:MOVING\n",
        "Pending: 0\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("elevator-sim");
    cmd.args([
        "run",
        "--config",
        path.to_str().unwrap(),
        "--request",
        "4:2",
        "--ticks",
        "1",
    ]);
    cmd.assert().success().stdout(diff(expected));
    fs::remove_file(path).ok();
}

#[test]
fn config_file_json_is_accepted() {
    let path = write_temp_config(
        r#"{"elevatorsQuantity": 2, "loopIntervalMilliseconds": 250, "seed": 3}"#,
        "json",
    );

    let expected = concat!(
        "Elevators: 2\n",
        "Floors: 1..=10\n",
        "Loop interval: 250ms\n",
        "Random requests: every 5000ms\n",
        "Seed: 3\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("elevator-sim");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert().success().stdout(diff(expected));
    fs::remove_file(path).ok();
}

#[test]
fn unsupported_config_extension_fails() {
    let path = write_temp_config("elevatorsQuantity: 2", "yaml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("elevator-sim");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: unsupported config format 'yaml'"));
    fs::remove_file(path).ok();
}
