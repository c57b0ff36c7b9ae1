//! Turn scenario files into ready-to-step systems.

use std::path::Path;

use log::info;
use thiserror::Error;
use trajectory_config::{
    BodyConfig, BodyDefinition, ConfigError, OrderingConfig, ScenarioConfig, load_scenario,
};
use trajectory_dynamics::{
    Body, Color, DynamicsError, Gravity, StepOptions, StepOrdering, System,
};
use trajectory_orbits::{BodyId, Orbit};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dynamics(#[from] DynamicsError),
    #[error("body `{body}` orbits unknown parent `{parent}`")]
    UnknownParent { body: String, parent: String },
    #[error("body `{body}` has invalid colour `{value}`, expected #RRGGBB or #RRGGBBAA")]
    InvalidColor { body: String, value: String },
}

/// A validated, seeded system plus the cadence it was configured with.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub system: System,
    pub time_step_s: f64,
    pub steps_per_frame: usize,
}

/// Load a scenario file and build its system.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
    let config = load_scenario(path.as_ref())?;
    let scenario = Scenario::try_from(&config)?;
    info!(
        "loaded scenario `{}` from {} ({} bodies)",
        scenario.name,
        path.as_ref().display(),
        scenario.system.len()
    );
    Ok(scenario)
}

pub fn step_ordering(ordering: OrderingConfig) -> StepOrdering {
    match ordering {
        OrderingConfig::GaussSeidel => StepOrdering::GaussSeidel,
        OrderingConfig::Jacobi => StepOrdering::Jacobi,
    }
}

/// Resolve parent names, parse colours, validate and seed element-defined bodies.
pub fn build_system(config: &ScenarioConfig) -> Result<System, ScenarioError> {
    let bodies = config
        .bodies
        .iter()
        .map(|body| build_body(body, config))
        .collect::<Result<Vec<_>, _>>()?;

    let gravity = config
        .gravitational_constant
        .map(Gravity::new)
        .unwrap_or_default();
    let options = StepOptions {
        ordering: step_ordering(config.ordering),
        anchor_roots: config.anchor_roots,
    };
    let mut system = System::new(bodies)?
        .with_gravity(gravity)
        .with_options(options);
    system.seed_from_elements()?;
    Ok(system)
}

fn build_body(body: &BodyConfig, config: &ScenarioConfig) -> Result<Body, ScenarioError> {
    let color = match &body.color {
        Some(value) => Color::from_hex(value).ok_or_else(|| ScenarioError::InvalidColor {
            body: body.name.clone(),
            value: value.clone(),
        })?,
        None => Color::WHITE,
    };

    let built = match body.definition()? {
        BodyDefinition::State(state) => Body::new(
            body.name.as_str(),
            body.mass_kg,
            state.position_m,
            state.velocity_m_s,
        ),
        BodyDefinition::Orbit(orbit) => {
            let parent = find_body(config, &orbit.parent).ok_or_else(|| {
                ScenarioError::UnknownParent {
                    body: body.name.clone(),
                    parent: orbit.parent.clone(),
                }
            })?;
            let elements = Orbit {
                sma: orbit.sma_m,
                ecc: orbit.ecc,
                inc: orbit.inc_rad,
                lan: orbit.lan_rad,
                ape: orbit.ape_rad,
                mna: orbit.mna_rad,
                epoch: orbit.epoch_s,
                parent: Some(parent),
            };
            Body::orbiting(body.name.as_str(), body.mass_kg, elements)
        }
    };
    Ok(built.with_color(color))
}

fn find_body(config: &ScenarioConfig, name: &str) -> Option<BodyId> {
    config
        .bodies
        .iter()
        .position(|body| body.name.eq_ignore_ascii_case(name))
}

impl TryFrom<&ScenarioConfig> for Scenario {
    type Error = ScenarioError;

    fn try_from(config: &ScenarioConfig) -> Result<Self, Self::Error> {
        Ok(Scenario {
            name: config.name.clone(),
            system: build_system(config)?,
            time_step_s: config.time_step_s,
            steps_per_frame: config.steps_per_frame,
        })
    }
}
