//! Generated `key=value` properties file.
//!
//! The file is rewritten from scratch on every run: a header comment naming
//! the environment and simulation, then the environment's properties, then
//! the simulation's properties. Environment values of the form `$NAME` are
//! replaced by the value of the OS environment variable `NAME`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Properties;

/// Default output path, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "test.properties";

/// Write the merged properties to `output_path`, resolving `$NAME` references
/// against the process environment.
pub fn render_properties(
    env_name: &str,
    sim_name: &str,
    env_props: &Properties,
    sim_props: &Properties,
    output_path: &Path,
) -> Result<()> {
    render_properties_with(env_name, sim_name, env_props, sim_props, output_path, |var| {
        std::env::var(var).ok()
    })
}

/// As [`render_properties`], with an explicit variable lookup.
pub fn render_properties_with<F>(
    env_name: &str,
    sim_name: &str,
    env_props: &Properties,
    sim_props: &Properties,
    output_path: &Path,
    lookup: F,
) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let contents = format_properties(env_name, sim_name, env_props, sim_props, lookup);

    std::fs::write(output_path, &contents)
        .with_context(|| format!("Failed to write properties file {}", output_path.display()))?;

    info!(path = %output_path.display(), "Properties file written:\n{contents}");
    Ok(())
}

/// Build the file body. One header line, then one line per property.
pub fn format_properties<F>(
    env_name: &str,
    sim_name: &str,
    env_props: &Properties,
    sim_props: &Properties,
    lookup: F,
) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let header = format!("# TEST PROPERTIES. ENV {env_name}, SIM {sim_name}");
    let env_lines = env_props
        .iter()
        .map(|(name, value)| format!("{name}={}", resolve_value(value, &lookup)));
    let sim_lines = sim_props.iter().map(|(name, value)| format!("{name}={value}"));

    std::iter::once(header)
        .chain(env_lines)
        .chain(sim_lines)
        .map(|line| line + "\n")
        .collect()
}

/// Substitute a `$NAME` reference. Unset variables become the empty string.
fn resolve_value<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let Some(var) = value.strip_prefix('$') else {
        return value.to_string();
    };

    info!(reference = value, "Substituting in environment variable");
    match lookup(var) {
        Some(resolved) => resolved,
        None => {
            warn!(variable = var, "Environment variable {var} is not set");
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
