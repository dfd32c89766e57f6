//! Subcommand implementations.

use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use esimkit::config::Value;
use esimkit::config::env::parse_scalar;
use esimkit::netlist::{CircuitListing, TEMPLATE_NAMES, netlist_template, scan_directory};
use esimkit::{CircuitReport, Config, Session, SimulationResult, SimulatorStatus};
use serde::Serialize;

pub fn analyze(config: Config, input: &Path, json: bool) -> Result<ExitCode> {
    let report = load_report(config, input)?;
    if json {
        print_json(&report)?;
    } else {
        print!("{}", render_report(&report));
    }
    Ok(ExitCode::SUCCESS)
}

pub fn validate(config: Config, input: &Path) -> Result<ExitCode> {
    let report = load_report(config, input)?;
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    if report.validation.is_valid {
        println!("{}: valid", input.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}: invalid", input.display());
    for issue in &report.validation.issues {
        println!("  - {}", issue);
    }
    Ok(ExitCode::FAILURE)
}

pub fn simulate(config: Config, input: &Path, json: bool) -> Result<ExitCode> {
    let mut session = Session::new(config);
    let result = session.simulate_file(input);

    if json {
        print_json(&result)?;
    } else {
        print!("{}", render_simulation(&result));
    }

    Ok(if result.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn list(dir: &Path, json: bool) -> Result<ExitCode> {
    let listings = scan_directory(dir)
        .with_context(|| format!("Failed to list circuits in {}", dir.display()))?;

    if json {
        print_json(&listings)?;
    } else {
        print!("{}", render_listings(&listings));
    }
    Ok(ExitCode::SUCCESS)
}

pub fn config_show(config: &Config) -> Result<ExitCode> {
    print!("{}", config.to_yaml()?);
    Ok(ExitCode::SUCCESS)
}

pub fn config_get(config: &Config, path: &str) -> Result<ExitCode> {
    let Some(value) = config.lookup(path) else {
        bail!("{} is not set", path);
    };
    print!("{}", yaml_text(&value)?);
    Ok(ExitCode::SUCCESS)
}

pub fn config_set(
    config: &mut Config,
    path: &str,
    value: &str,
    save: Option<&Path>,
) -> Result<ExitCode> {
    config
        .set(path, parse_scalar(value))
        .with_context(|| format!("Failed to set {}", path))?;

    match save {
        Some(file) => {
            config
                .save_to_file(file)
                .with_context(|| format!("Failed to save configuration to {}", file.display()))?;
            println!("{} = {} (saved to {})", path, value, file.display());
        }
        None => {
            log::warn!("no --save file given; the change only lasts for this invocation");
            println!("{} = {}", path, value);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn tools(config: Config, json: bool) -> Result<ExitCode> {
    let session = Session::new(config);
    let status = session.simulator_status();

    if json {
        print_json(&status)?;
        return Ok(ExitCode::SUCCESS);
    }

    let version = if status.available {
        match session.simulator().version() {
            Ok(version) => Some(version),
            Err(e) => {
                log::warn!("could not read simulator version: {}", e);
                None
            }
        }
    } else {
        None
    };
    print!("{}", render_status(&status, version.as_deref()));
    Ok(ExitCode::SUCCESS)
}

pub fn template(name: &str) -> Result<ExitCode> {
    let Some(text) = netlist_template(name) else {
        bail!(
            "unknown template '{}' (available: {})",
            name,
            TEMPLATE_NAMES.join(", ")
        );
    };
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}

fn load_report(config: Config, input: &Path) -> Result<CircuitReport> {
    let session = Session::new(config);
    session
        .analyze_file(input)
        .with_context(|| format!("Failed to analyze {}", input.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Plain strings print bare; anything else as YAML.
fn yaml_text(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(format!("{}\n", s)),
        other => Ok(serde_yaml::to_string(other)?),
    }
}

fn render_report(report: &CircuitReport) -> String {
    let analysis = &report.analysis;
    let mut out = String::new();

    let _ = writeln!(out, "Circuit: {}", analysis.circuit_name);
    let _ = writeln!(
        out,
        "Components: {}  Nodes: {}",
        analysis.total_components, analysis.total_nodes
    );
    for (kind, count) in &analysis.component_summary {
        let _ = writeln!(out, "  {:<22} {}", kind.to_string(), count);
    }
    let _ = writeln!(out, "Node list: {}", analysis.nodes.join(", "));

    let analyses: Vec<String> = report
        .directives
        .iter()
        .filter(|d| d.is_analysis())
        .map(|d| format!(".{}", d.name))
        .collect();
    if !analyses.is_empty() {
        let _ = writeln!(out, "Analyses: {}", analyses.join(" "));
    }

    for warning in &report.warnings {
        let _ = writeln!(out, "Skipped: {}", warning);
    }

    if report.validation.is_valid {
        let _ = writeln!(out, "Validation: ok");
    } else {
        let _ = writeln!(out, "Validation: {} issue(s)", report.validation.issues.len());
        for issue in &report.validation.issues {
            let _ = writeln!(out, "  - {}", issue);
        }
    }
    out
}

fn render_simulation(result: &SimulationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Status: {:?} ({} ms)",
        result.exit_status, result.elapsed_ms
    );
    if let Some(code) = result.exit_code {
        let _ = writeln!(out, "Exit code: {}", code);
    }
    for error in &result.errors {
        let _ = writeln!(out, "error: {}", error);
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    if !result.raw_output.is_empty() {
        let _ = writeln!(out, "--- simulator output ---");
        out.push_str(&result.raw_output);
        if !result.raw_output.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn render_listings(listings: &[CircuitListing]) -> String {
    let mut out = String::new();
    if listings.is_empty() {
        let _ = writeln!(out, "No netlists found");
        return out;
    }

    for listing in listings {
        match (&listing.analysis, &listing.error) {
            (Some(analysis), _) => {
                let _ = writeln!(
                    out,
                    "{:<24} {:<32} {:>4} components {:>4} nodes",
                    listing.id,
                    analysis.circuit_name,
                    analysis.total_components,
                    analysis.total_nodes
                );
            }
            (None, error) => {
                let _ = writeln!(
                    out,
                    "{:<24} error: {}",
                    listing.id,
                    error.as_deref().unwrap_or("unknown")
                );
            }
        }
    }
    out
}

fn render_status(status: &SimulatorStatus, version: Option<&str>) -> String {
    let mut out = String::new();

    match &status.executable {
        Some(exe) => {
            let _ = writeln!(out, "ngspice: available ({})", exe.display());
        }
        None => {
            let _ = writeln!(out, "ngspice: not found");
        }
    }
    if let Some(version) = version {
        let _ = writeln!(out, "version: {}", version);
    }
    match &status.installation_path {
        Some(path) => {
            let found = if status.installation_found {
                "found"
            } else {
                "missing"
            };
            let _ = writeln!(out, "eSim installation: {} ({})", path.display(), found);
        }
        None => {
            let _ = writeln!(out, "eSim installation: not configured");
        }
    }
    out
}
