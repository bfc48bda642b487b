//! `run` — simulation runner.
//!
//! Resolves an environment and a simulation from `config/env.yml` and
//! `config/sim.yml`, writes their merged properties to `test.properties`,
//! then executes the simulation's shell command and logs its output.
//!
//! Exit codes: `0` once the command has run (whatever its own exit status),
//! `1` for an empty argument, `2` when either profile cannot be resolved.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use simrun::config::{self, ConfigError, ConfigStore};
use simrun::logging;
use simrun::properties;
use simrun::runner;

const EXIT_USAGE: u8 = 1;
const EXIT_UNDEFINED: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "run",
    version,
    about = "Runs a simulation command based on the provided arguments and support config"
)]
struct Cli {
    /// Environment argument (a name defined in env.yml)
    env: String,

    /// Simulation argument (a name defined in sim.yml)
    sim: String,

    /// Directory holding env.yml and sim.yml
    #[arg(long, env = "SIMRUN_CONFIG_DIR", default_value = config::DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Properties file to generate
    #[arg(long, default_value = properties::DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Log file, appended to on every run
    #[arg(long, env = "SIMRUN_LOG_FILE", default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.env.is_empty() || cli.sim.is_empty() {
        Cli::command().print_help()?;
        eprintln!("\nPlease provide the 'env' and 'sim' arguments.");
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    // `.env` may supply variables referenced as `$NAME` in env.yml.
    let _ = dotenv::dotenv();

    let _log_guard = logging::init_logging(&cli.log_file)?;

    run(&cli)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let store = ConfigStore::new(&cli.config_dir);

    let env_profile = resolved(store.lookup_environment(&cli.env));
    info!("Environment properties: {env_profile:?}");

    let sim_profile = resolved(store.lookup_simulation(&cli.sim));
    info!("Simulation properties: {sim_profile:?}");

    let (Some(env_profile), Some(sim_profile)) = (env_profile, sim_profile) else {
        error!(env = %cli.env, sim = %cli.sim, "Environment or Simulation is not defined");
        return Ok(ExitCode::from(EXIT_UNDEFINED));
    };

    info!(path = %cli.output.display(), "Building properties file");
    properties::render_properties(
        &cli.env,
        &cli.sim,
        &env_profile.properties,
        &sim_profile.properties,
        &cli.output,
    )?;

    match runner::run_command(&sim_profile.command) {
        Ok(outcome) if outcome.success() => info!("Simulation command completed"),
        Ok(_) => {}
        Err(e) => error!(error = %e, "Simulation command could not be started"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Collapse a lookup failure into "not defined"; the failure is logged here,
/// the missing-file case was already logged by the lookup.
fn resolved<T>(lookup: Result<Option<T>, ConfigError>) -> Option<T> {
    match lookup {
        Ok(found) => found,
        Err(ConfigError::Missing { .. }) => None,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            None
        }
    }
}
