//! esimkit command-line interface.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use esimkit::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "esimkit")]
#[command(about = "Analyze SPICE netlists and run them through ngspice", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a netlist, summarize its components and validate it
    Analyze {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a netlist for structural problems (exit code 1 when invalid)
    Validate {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Run a netlist through the simulator
    Simulate {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Override esim.timeout for this run
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize every netlist (.cir, .sp, .net) in a directory
    List {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Inspect or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Report simulator availability
    Tools {
        #[arg(long)]
        json: bool,
    },

    /// Print a built-in example netlist
    Template {
        /// voltage_divider or rc_filter
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration as YAML
    Show,

    /// Print one value by dotted path
    Get { path: String },

    /// Set a value by dotted path
    Set {
        path: String,
        value: String,

        /// Write the effective configuration to this file afterwards
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    match cli.command {
        Command::Analyze { input, json } => commands::analyze(config, &input, json),
        Command::Validate { input } => commands::validate(config, &input),
        Command::Simulate {
            input,
            timeout,
            json,
        } => {
            if let Some(secs) = timeout {
                config.set("esim.timeout", secs)?;
            }
            commands::simulate(config, &input, json)
        }
        Command::List { dir, json } => commands::list(&dir, json),
        Command::Config(ConfigCommand::Show) => commands::config_show(&config),
        Command::Config(ConfigCommand::Get { path }) => commands::config_get(&config, &path),
        Command::Config(ConfigCommand::Set { path, value, save }) => {
            commands::config_set(&mut config, &path, &value, save.as_deref())
        }
        Command::Tools { json } => commands::tools(config, json),
        Command::Template { name } => commands::template(&name),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(level, "logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_with_timeout() {
        let cli = Cli::try_parse_from(["esimkit", "simulate", "deck.cir", "--timeout", "5"]).unwrap();
        match cli.command {
            Command::Simulate {
                input,
                timeout,
                json,
            } => {
                assert_eq!(input, PathBuf::from("deck.cir"));
                assert_eq!(timeout, Some(5));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["esimkit", "analyze", "a.cir", "-vv", "--config", "c.yaml"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["esimkit", "config", "set", "esim.timeout", "60", "--save", "o.yaml"])
                .unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Set { path, value, save }) => {
                assert_eq!(path, "esim.timeout");
                assert_eq!(value, "60");
                assert_eq!(save, Some(PathBuf::from("o.yaml")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["esimkit"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
