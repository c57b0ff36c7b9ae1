//! Orbital mechanics helpers: Newton–Raphson root finding, Kepler's equation, and
//! conversion between Keplerian elements and Cartesian state vectors.

pub mod elements;
pub mod kepler;
pub mod root;

use thiserror::Error;
use trajectory_core::vector::VectorError;

pub use elements::{
    BodyId, Orbit, ParentState, StateVectors, elements_from_state, perifocal_to_inertial,
    state_from_elements,
};
pub use kepler::{KEPLER_ITERATIONS, KEPLER_TOLERANCE, orbital_period, solve_kepler};
pub use root::{RootEstimate, newton_raphson};

/// Errors raised while solving for anomalies or converting between representations.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum OrbitError {
    #[error(transparent)]
    Vector(#[from] VectorError),
    #[error("derivative {derivative} at x = {guess} is too small for a Newton step")]
    ZeroDerivative { guess: f64, derivative: f64 },
    #[error("root finder stopped after {iterations} iterations with residual {residual}")]
    NonConvergence { iterations: u32, residual: f64 },
    #[error("trajectory is not a closed ellipse (eccentricity {eccentricity})")]
    Unbound { eccentricity: f64 },
    #[error("eccentricity {0} lies outside [0, 1)")]
    InvalidEccentricity(f64),
    #[error("semi-major axis {0} must be positive")]
    InvalidSemiMajorAxis(f64),
    #[error("parent gravitational parameter {0} must be positive")]
    InvalidParentMu(f64),
}
