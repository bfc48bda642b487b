//! Environment and simulation profiles loaded from YAML.
//!
//! Two files live in the configuration directory: `env.yml` and `sim.yml`.
//! Each is a mapping from a profile name to a record carrying a `properties`
//! sub-mapping; simulations also carry the `command` to execute.
//! Property order is the order of definition in the file.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_FILE: &str = "env.yml";
const SIM_FILE: &str = "sim.yml";

/// Ordered `key -> value` properties.
pub type Properties = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// A named deployment target supplying key/value properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvironmentProfile {
    /// Values starting with `$` name an environment variable resolved when
    /// the properties file is written.
    #[serde(default, deserialize_with = "scalar_properties")]
    pub properties: Properties,
}

/// A named scenario supplying its own properties and a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationProfile {
    #[serde(default, deserialize_with = "scalar_properties")]
    pub properties: Properties,
    pub command: String,
}

/// Which of the two configuration files an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Environment,
    Simulation,
}

impl FileKind {
    pub fn file_name(self) -> &'static str {
        match self {
            FileKind::Environment => ENV_FILE,
            FileKind::Simulation => SIM_FILE,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Environment => write!(f, "environment"),
            FileKind::Simulation => write!(f, "simulation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{kind} config file not found: {}", path.display())]
    Missing { kind: FileKind, path: PathBuf },

    #[error("failed to read {kind} config file {}: {source}", path.display())]
    Read {
        kind: FileKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {kind} config file {}: {source}", path.display())]
    Parse {
        kind: FileKind,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Check that a configuration file exists, logging an error if it does not.
pub fn locate(kind: FileKind, path: &Path) -> bool {
    if path.is_file() {
        return true;
    }
    error!(kind = %kind, path = %path.display(), "File not found");
    false
}

/// Resolves profile names against the YAML files of one directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, kind: FileKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Find the environment named `name` in `env.yml`.
    ///
    /// `Ok(None)` when the file parses but has no such entry.
    pub fn lookup_environment(&self, name: &str) -> Result<Option<EnvironmentProfile>, ConfigError> {
        info!(environment = name, "Environment");
        self.lookup(FileKind::Environment, name)
    }

    /// Find the simulation named `name` in `sim.yml`.
    pub fn lookup_simulation(&self, name: &str) -> Result<Option<SimulationProfile>, ConfigError> {
        info!(simulation = name, "Simulation");
        self.lookup(FileKind::Simulation, name)
    }

    fn lookup<T>(&self, kind: FileKind, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let path = self.path(kind);
        if !locate(kind, &path) {
            return Err(ConfigError::Missing { kind, path });
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            kind,
            path: path.clone(),
            source,
        })?;

        // An empty document parses as null; treat it as an empty mapping.
        let document: Option<Mapping> = if contents.trim().is_empty() {
            None
        } else {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                kind,
                path: path.clone(),
                source,
            })?
        };

        // Only the selected record is decoded; malformed siblings are ignored.
        let record = document
            .unwrap_or_default()
            .into_iter()
            .find(|(key, _)| scalar_text(key).as_deref() == Some(name))
            .map(|(_, value)| value);

        let Some(record) = record else {
            info!("Unknown {kind}: {name}");
            return Ok(None);
        };

        serde_yaml::from_value(record)
            .map(Some)
            .map_err(|source| ConfigError::Parse { kind, path, source })
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}

// ---------------------------------------------------------------------------
// Scalar property values
// ---------------------------------------------------------------------------

/// Text form of a YAML scalar; `None` for sequences, mappings and tags.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Accept any YAML scalar as a property key or value and keep its text form.
fn scalar_properties<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: Option<Mapping> = Option::deserialize(deserializer)?;
    let mut properties = Properties::new();
    for (key, value) in raw.unwrap_or_default() {
        let key = scalar_text(&key)
            .ok_or_else(|| D::Error::custom("property keys must be scalar values"))?;
        let text = scalar_text(&value)
            .ok_or_else(|| D::Error::custom(format!("property `{key}` must be a scalar value")))?;
        properties.insert(key, text);
    }
    Ok(properties)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
