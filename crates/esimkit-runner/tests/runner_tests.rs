//! Subprocess behaviour of the runner.
//!
//! Fake simulators are small shell scripts run through `/bin/sh`, so these
//! tests only run on Unix. Tests against a real ngspice are ignored by
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use esimkit_runner::{SimulationStatus, Simulator, SimulatorConfig};

const DIVIDER: &str = "Voltage Divider\nV1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.op\n.end\n";

fn write_netlist(dir: &Path) -> PathBuf {
    let path = dir.join("divider.cir");
    fs::write(&path, DIVIDER).unwrap();
    path
}

#[cfg(unix)]
fn script_simulator(dir: &Path, body: &str, timeout_secs: u64) -> Simulator {
    let script = dir.join("fake-ngspice.sh");
    fs::write(&script, body).unwrap();
    Simulator::new(SimulatorConfig {
        executable: PathBuf::from("/bin/sh"),
        args: vec![script.display().to_string()],
        timeout_secs,
        installation_path: None,
    })
}

#[test]
fn test_missing_executable_is_failed_result() {
    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());

    let mut sim = Simulator::new(SimulatorConfig {
        executable: PathBuf::from("/nonexistent/bin/esimkit-no-such-simulator"),
        ..SimulatorConfig::default()
    });
    let result = sim.simulate(&netlist);

    assert!(!result.succeeded);
    assert_eq!(result.exit_status, SimulationStatus::Failed);
    assert!(result.errors[0].contains("not available"), "{:?}", result.errors);
    assert!(!sim.is_available());
    assert_eq!(sim.status().simulations_run, 1);
}

#[test]
fn test_missing_netlist_is_failed_result() {
    let mut sim = Simulator::default();
    let result = sim.simulate(Path::new("/nonexistent/netlist.cir"));

    assert!(!result.succeeded);
    assert_eq!(result.exit_status, SimulationStatus::Failed);
    assert!(result.errors[0].contains("not found"));
}

#[cfg(unix)]
#[test]
fn test_successful_run() {
    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());
    let mut sim = script_simulator(
        dir.path(),
        "echo \"Circuit: $(head -n 1 \"$1\")\"\necho 'Warning: no DC value for V1' >&2\necho 'v(2) = 5.000000e+00'\n",
        10,
    );

    let result = sim.simulate(&netlist);

    assert!(result.succeeded, "{:?}", result);
    assert_eq!(result.exit_status, SimulationStatus::Completed);
    assert_eq!(result.exit_code, Some(0));
    assert!(result.raw_output.contains("Circuit: Voltage Divider"));
    assert!(result.raw_output.contains("v(2) = 5.000000e+00"));
    assert_eq!(result.warnings, vec!["Warning: no DC value for V1"]);
    assert!(result.errors.is_empty());
}

#[cfg(unix)]
#[test]
fn test_nonzero_exit_is_failed() {
    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());
    let mut sim = script_simulator(
        dir.path(),
        "echo 'Error on line 3: unknown device'\nexit 1\n",
        10,
    );

    let result = sim.simulate(&netlist);

    assert!(!result.succeeded);
    assert_eq!(result.exit_status, SimulationStatus::Failed);
    assert_eq!(result.exit_code, Some(1));
    assert!(result.raw_output.contains("unknown device"));
    assert_eq!(result.errors[0], "Error on line 3: unknown device");
}

#[cfg(unix)]
#[test]
fn test_fatal_marker_with_zero_exit_is_failed() {
    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());
    let mut sim = script_simulator(dir.path(), "echo 'singular matrix: check node 2'\n", 10);

    let result = sim.simulate(&netlist);

    assert!(!result.succeeded);
    assert_eq!(result.exit_status, SimulationStatus::Failed);
    assert_eq!(result.exit_code, Some(0));
}

#[cfg(unix)]
#[test]
fn test_timeout_kills_process() {
    use std::process::Command;
    use std::time::Instant;

    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());
    let pid_file = dir.path().join("pid");
    let mut sim = script_simulator(
        dir.path(),
        &format!(
            "echo $$ > '{}'\necho 'starting transient'\nexec sleep 30\n",
            pid_file.display()
        ),
        1,
    );

    let start = Instant::now();
    let result = sim.simulate(&netlist);

    assert!(start.elapsed().as_secs() < 10, "runner did not enforce the timeout");
    assert!(!result.succeeded);
    assert_eq!(result.exit_status, SimulationStatus::TimedOut);
    assert!(result.errors.iter().any(|e| e.contains("timed out")));
    assert!(result.elapsed_ms >= 1000, "elapsed {} ms", result.elapsed_ms);

    let pid = fs::read_to_string(&pid_file).unwrap();
    let still_running = Command::new("kill")
        .args(["-0", pid.trim()])
        .status()
        .unwrap()
        .success();
    assert!(!still_running, "simulator process {} left running", pid.trim());
}

#[cfg(unix)]
#[test]
fn test_simulate_netlist_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = script_simulator(dir.path(), "cat \"$1\"\n", 10);

    let result = sim.simulate_netlist("Divider\nR1 1 0 1k");

    assert!(result.succeeded);
    assert!(result.raw_output.contains("R1 1 0 1k"));
    assert!(result.raw_output.trim_end().ends_with(".end"));
}

#[cfg(unix)]
#[test]
fn test_status_counts_runs() {
    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());
    let mut sim = script_simulator(dir.path(), "exit 0\n", 10);

    sim.simulate(&netlist);
    sim.simulate(&netlist);
    let status = sim.status();

    assert!(status.available);
    assert_eq!(status.executable, Some(PathBuf::from("/bin/sh")));
    assert_eq!(status.simulations_run, 2);
    assert!(!status.installation_found);
}

#[cfg(unix)]
#[test]
fn test_result_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let netlist = write_netlist(dir.path());
    let mut sim = script_simulator(dir.path(), "echo done\n", 10);

    let json = serde_json::to_value(sim.simulate(&netlist)).unwrap();

    assert_eq!(json["succeeded"], true);
    assert_eq!(json["exit_status"], "Completed");
}

#[test]
#[ignore = "requires ngspice"]
fn test_real_ngspice_divider() {
    let mut sim = Simulator::default();
    if !sim.is_available() {
        eprintln!("ngspice not available, skipping test");
        return;
    }

    let result = sim.simulate_netlist(DIVIDER);
    assert!(result.succeeded, "{:?}", result.errors);
}
