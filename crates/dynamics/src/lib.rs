//! Gravitationally interacting bodies: force accumulation, the per-body RK4 integrator, the
//! system driver and conservation diagnostics.

pub mod body;
pub mod diagnostics;
pub mod forces;
pub mod integrator;
pub mod system;

use thiserror::Error;
use trajectory_core::vector::VectorError;
use trajectory_orbits::{BodyId, OrbitError};

pub use body::{Body, Color};
pub use diagnostics::{Drift, Invariants};
pub use forces::Gravity;
pub use integrator::{
    StepBuffer, StepOptions, StepOrdering, advance_many, advance_system, integrate_body,
};
pub use system::{System, derive_orbital_elements, derive_state_vectors, parent_state};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DynamicsError {
    #[error(transparent)]
    Vector(#[from] VectorError),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    #[error("a system needs at least one body")]
    EmptySystem,
    #[error("body `{name}` has invalid mass {mass}")]
    InvalidMass { name: String, mass: f64 },
    #[error("body `{name}` has eccentricity {ecc}, expected a value in [0, 1)")]
    InvalidEccentricity { name: String, ecc: f64 },
    #[error("body `{name}` references parent #{parent}, which does not exist")]
    UnknownParent { name: String, parent: BodyId },
    #[error("body `{name}` must come after its parent")]
    ParentOrder { name: String },
    #[error("body `{name}` has a non-finite position or velocity")]
    NonFiniteState { name: String },
    #[error("no body at index {0}")]
    BodyIndex(usize),
    #[error("time step {0} must be finite and non-negative")]
    InvalidTimeStep(f64),
}
