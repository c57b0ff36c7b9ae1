//! Scenario file models and loaders.
//!
//! A scenario is one YAML or TOML document describing the gravitational constant, the step
//! cadence and an ordered list of bodies. Each body is given either by absolute state vectors
//! or by Keplerian elements about a previously listed parent.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    /// Overrides the SI gravitational constant when present.
    #[serde(default)]
    pub gravitational_constant: Option<f64>,
    pub time_step_s: f64,
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: usize,
    #[serde(default)]
    pub ordering: OrderingConfig,
    #[serde(default)]
    pub anchor_roots: bool,
    pub bodies: Vec<BodyConfig>,
}

fn default_steps_per_frame() -> usize {
    1
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderingConfig {
    #[default]
    GaussSeidel,
    Jacobi,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mass_kg: f64,
    /// `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub state: Option<StateConfig>,
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct StateConfig {
    pub position_m: [f64; 3],
    pub velocity_m_s: [f64; 3],
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrbitConfig {
    /// Name of a body listed earlier in the scenario.
    pub parent: String,
    pub sma_m: f64,
    #[serde(default)]
    pub ecc: f64,
    #[serde(default)]
    pub inc_rad: f64,
    #[serde(default)]
    pub lan_rad: f64,
    #[serde(default)]
    pub ape_rad: f64,
    #[serde(default)]
    pub mna_rad: f64,
    #[serde(default)]
    pub epoch_s: f64,
}

/// How a body's initial state is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyDefinition<'a> {
    State(&'a StateConfig),
    Orbit(&'a OrbitConfig),
}

impl BodyConfig {
    pub fn definition(&self) -> Result<BodyDefinition<'_>, ConfigError> {
        match (&self.state, &self.orbit) {
            (Some(state), None) => Ok(BodyDefinition::State(state)),
            (None, Some(orbit)) => Ok(BodyDefinition::Orbit(orbit)),
            (Some(_), Some(_)) => Err(ConfigError::Invalid(format!(
                "body `{}` sets both `state` and `orbit`",
                self.name
            ))),
            (None, None) => Err(ConfigError::Invalid(format!(
                "body `{}` needs either `state` or `orbit`",
                self.name
            ))),
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_yaml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Structural checks that need no physics: cadence, non-empty body list, unique names and
    /// exactly one initial-state definition per body.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step_s.is_finite() && self.time_step_s >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scenario `{}`: time_step_s must be finite and non-negative, got {}",
                self.name, self.time_step_s
            )));
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::Invalid(format!(
                "scenario `{}`: steps_per_frame must be at least 1",
                self.name
            )));
        }
        if let Some(g) = self.gravitational_constant {
            if !(g.is_finite() && g > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "scenario `{}`: gravitational_constant must be positive, got {g}",
                    self.name
                )));
            }
        }
        if self.bodies.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "scenario `{}` lists no bodies",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for body in &self.bodies {
            if !seen.insert(body.name.to_ascii_lowercase()) {
                return Err(ConfigError::Invalid(format!(
                    "scenario `{}` lists body `{}` twice",
                    self.name, body.name
                )));
            }
            body.definition()?;
        }
        Ok(())
    }
}

/// Errors that can occur while loading scenario files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Load one scenario; `.toml` files are parsed as TOML, everything else as YAML.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    if has_extension(path, &["toml"]) {
        ScenarioConfig::from_toml_str(&std::fs::read_to_string(path)?)
    } else {
        let reader = File::open(path)?;
        let scenario: ScenarioConfig = serde_yaml::from_reader(reader)?;
        scenario.validate()?;
        Ok(scenario)
    }
}

/// Load a single scenario file, or every scenario file of a directory in file-name order.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Ok(vec![load_scenario(path)?]);
    }
    let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| has_extension(path, &["toml", "yaml", "yml"]))
        .collect();
    entries.sort();
    entries.iter().map(load_scenario).collect()
}

fn has_extension(path: &Path, wanted: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| wanted.iter().any(|w| ext.eq_ignore_ascii_case(w)))
        .unwrap_or(false)
}
