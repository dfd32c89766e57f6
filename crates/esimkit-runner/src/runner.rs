//! Simulator process runner.
//!
//! This module invokes the simulator as a subprocess, enforces the
//! wall-clock timeout and turns whatever happens into a
//! [`SimulationResult`].

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use esimkit_config::{Config, Settings};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::interpret::interpret;
use crate::locate::locate_executable;
use crate::types::{SimulationResult, SimulationStatus, SimulatorStatus};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to wait for pipe readers once the process is gone.
const OUTPUT_GRACE: Duration = Duration::from_secs(1);

/// Configuration for the simulator runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Executable path, or a bare name looked up on PATH.
    pub executable: PathBuf,
    /// Arguments placed before the netlist path.
    pub args: Vec<String>,
    /// Timeout for one run in seconds.
    pub timeout_secs: u64,
    /// eSim installation directory, reported by [`Simulator::status`].
    pub installation_path: Option<PathBuf>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("ngspice"),
            args: vec!["-b".to_string()],
            timeout_secs: 30,
            installation_path: None,
        }
    }
}

impl SimulatorConfig {
    /// Take the `esim` section of `settings`, falling back to defaults for
    /// unset keys.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        let esim = &settings.esim;
        Self {
            executable: esim.ngspice_path.clone().unwrap_or(defaults.executable),
            args: esim.args.clone().unwrap_or(defaults.args),
            timeout_secs: esim.timeout.unwrap_or(defaults.timeout_secs),
            installation_path: esim.installation_path.clone(),
        }
    }

    /// Read the `esim` keys one by one.
    ///
    /// A key holding a value of the wrong type is ignored with a warning and
    /// the default is used in its place.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            executable: setting(config, "esim.ngspice_path").unwrap_or(defaults.executable),
            args: setting(config, "esim.args").unwrap_or(defaults.args),
            timeout_secs: setting(config, "esim.timeout").unwrap_or(defaults.timeout_secs),
            installation_path: setting(config, "esim.installation_path"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn setting<T: DeserializeOwned>(config: &Config, dotted: &str) -> Option<T> {
    match config.get_as::<T>(dotted) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("ignoring {}: {}", dotted, e);
            None
        }
    }
}

/// Handle for running simulations with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
    simulations_run: usize,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            simulations_run: 0,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Resolved executable, if one can be found.
    pub fn locate(&self) -> Option<PathBuf> {
        locate_executable(&self.config.executable)
    }

    /// Check if the simulator is available.
    pub fn is_available(&self) -> bool {
        self.locate().is_some()
    }

    /// First line printed by `<executable> --version`.
    pub fn version(&self) -> Result<String> {
        let exe = self.require_executable()?;
        let mut cmd = Command::new(&exe);
        cmd.arg("--version");

        let output = run_with_timeout(&mut cmd, self.config.timeout())?;
        let text = output.combined();
        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::VersionUnavailable(format!("{} printed nothing", exe.display())))
    }

    pub fn status(&self) -> SimulatorStatus {
        let executable = self.locate();
        let installation_found = self
            .config
            .installation_path
            .as_deref()
            .is_some_and(Path::exists);

        SimulatorStatus {
            installation_path: self.config.installation_path.clone(),
            installation_found,
            available: executable.is_some(),
            executable,
            simulations_run: self.simulations_run,
        }
    }

    /// Run the simulator on a netlist file.
    ///
    /// Never fails: a missing netlist, a missing simulator, a crash or a
    /// timeout all come back as an unsuccessful result.
    pub fn simulate(&mut self, netlist: &Path) -> SimulationResult {
        self.simulations_run += 1;
        match self.try_simulate(netlist) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("simulation of {} did not complete: {}", netlist.display(), e);
                SimulationResult::from_error(&e)
            }
        }
    }

    /// Write `netlist` to a temp file and simulate it.
    ///
    /// A missing `.end` is appended.
    pub fn simulate_netlist(&mut self, netlist: &str) -> SimulationResult {
        match write_temp_netlist(netlist) {
            Ok(file) => self.simulate(file.path()),
            Err(e) => {
                self.simulations_run += 1;
                SimulationResult::from_error(&e)
            }
        }
    }

    fn require_executable(&self) -> Result<PathBuf> {
        self.locate()
            .ok_or_else(|| Error::ToolNotAvailable(self.config.executable.display().to_string()))
    }

    fn try_simulate(&self, netlist: &Path) -> Result<SimulationResult> {
        if !netlist.is_file() {
            return Err(Error::NetlistNotFound(netlist.to_path_buf()));
        }
        let exe = self.require_executable()?;

        log::info!(
            "running {} on {} (timeout {}s)",
            exe.display(),
            netlist.display(),
            self.config.timeout_secs
        );

        let mut cmd = Command::new(&exe);
        cmd.args(&self.config.args).arg(netlist);

        let output = run_with_timeout(&mut cmd, self.config.timeout())?;
        let raw_output = output.combined();
        let summary = interpret(&raw_output);
        let mut errors = summary.errors;

        let exit_status = if !output.status.success() {
            errors.push(format!("{} exited with {}", exe.display(), output.status));
            SimulationStatus::Failed
        } else if summary.fatal {
            SimulationStatus::Failed
        } else {
            SimulationStatus::Completed
        };

        log::debug!(
            "simulation finished: {:?} in {} ms, {} error line(s), {} warning line(s)",
            exit_status,
            output.elapsed.as_millis(),
            errors.len(),
            summary.warnings.len()
        );

        Ok(SimulationResult {
            succeeded: exit_status == SimulationStatus::Completed,
            exit_status,
            exit_code: output.status.code(),
            raw_output,
            errors,
            warnings: summary.warnings,
            elapsed_ms: millis(output.elapsed),
        })
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn write_temp_netlist(netlist: &str) -> Result<tempfile::NamedTempFile> {
    let netlist = if !netlist.to_lowercase().contains(".end") {
        format!("{}\n.end\n", netlist.trim())
    } else {
        netlist.to_string()
    };

    let mut file = tempfile::Builder::new()
        .prefix("esimkit-")
        .suffix(".cir")
        .tempfile()
        .map_err(|e| Error::TempFile(e.to_string()))?;
    file.write_all(netlist.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| Error::TempFile(e.to_string()))?;
    Ok(file)
}

/// Output of a process that exited on its own.
struct ProcessOutput {
    status: std::process::ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    elapsed: Duration,
}

impl ProcessOutput {
    /// stdout followed by stderr.
    fn combined(&self) -> String {
        combine(&self.stdout, &self.stderr)
    }
}

fn combine(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(stderr));
    }
    text
}

/// Spawn `cmd` and wait for it, killing it once `timeout` has passed.
///
/// Both pipes are drained on background threads so a chatty process cannot
/// block on a full pipe while we poll.
fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<ProcessOutput> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let start = Instant::now();

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn { program, source })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok(ProcessOutput {
                    status,
                    stdout: collect(&stdout),
                    stderr: collect(&stderr),
                    elapsed: start.elapsed(),
                });
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    terminate(&mut child);
                    return Err(Error::Timeout {
                        secs: timeout.as_secs(),
                        elapsed_ms: millis(start.elapsed()),
                        output: combine(&collect(&stdout), &collect(&stderr)),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                terminate(&mut child);
                return Err(Error::Io(e));
            }
        }
    }
}

/// Kill and reap `child` so it does not outlive the run.
fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("kill of pid {} failed: {}", child.id(), e);
    }
    if let Err(e) = child.wait() {
        log::warn!("failed to reap pid {}: {}", child.id(), e);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            // Partial output is still worth reporting.
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    }
    rx
}

fn collect(rx: &Receiver<Vec<u8>>) -> Vec<u8> {
    rx.recv_timeout(OUTPUT_GRACE).unwrap_or_default()
}
