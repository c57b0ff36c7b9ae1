//! Direct pairwise Newtonian gravity.
//!
//! Every evaluation is brute force: one call to [`Gravity::net_force`] visits every other
//! body, so a full pass over `n` bodies costs `O(n²)` pair evaluations.

use trajectory_core::constants::BIG_G;
use trajectory_core::vector::{self, Vector3, VectorError};

use crate::{Body, DynamicsError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Gravitational constant in the units of the scenario (SI by default).
    pub constant: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Self { constant: BIG_G }
    }
}

impl Gravity {
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    /// Gravitational parameter `G·m`.
    pub fn mu(&self, mass: f64) -> f64 {
        self.constant * mass
    }

    /// Force that `a` exerts on `b`: magnitude `G·m_a·m_b/d²`, pointing from `b` towards `a`.
    ///
    /// The result is not divided by either mass. Coincident bodies have no defined direction
    /// and are reported as [`VectorError::DegenerateGeometry`].
    pub fn pairwise_acceleration(&self, a: &Body, b: &Body) -> Result<Vector3, VectorError> {
        let offset = vector::sub(&a.pos, &b.pos);
        let d = vector::norm(&offset);
        if d == 0.0 {
            return Err(VectorError::DegenerateGeometry("coincident bodies"));
        }
        let magnitude = self.constant * a.mass * b.mass / (d * d);
        Ok(vector::scale(&vector::unit(&offset)?, magnitude))
    }

    /// Sum of the forces every other body exerts on `bodies[focus]`.
    pub fn net_force(&self, bodies: &[Body], focus: usize) -> Result<Vector3, DynamicsError> {
        let target = bodies.get(focus).ok_or(DynamicsError::BodyIndex(focus))?;
        let mut total = vector::ZERO;
        for (i, other) in bodies.iter().enumerate() {
            if i == focus {
                continue;
            }
            total = vector::add(&total, &self.pairwise_acceleration(other, target)?);
        }
        Ok(total)
    }
}
