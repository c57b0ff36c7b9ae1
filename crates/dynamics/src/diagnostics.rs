//! Conserved quantities used to judge integration quality.

use trajectory_core::vector::{self, Vector3, VectorError};

use crate::{Body, DynamicsError, Gravity};

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies
        .iter()
        .map(|b| 0.5 * b.mass * vector::dot(&b.vel, &b.vel))
        .sum()
}

/// Pairwise potential `−G·m_i·m_j/r_ij` summed once per pair.
pub fn potential_energy(bodies: &[Body], gravity: &Gravity) -> Result<f64, DynamicsError> {
    let mut total = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let r = vector::distance(&a.pos, &b.pos);
            if r == 0.0 {
                return Err(VectorError::DegenerateGeometry("coincident bodies").into());
            }
            total -= gravity.constant * a.mass * b.mass / r;
        }
    }
    Ok(total)
}

pub fn total_energy(bodies: &[Body], gravity: &Gravity) -> Result<f64, DynamicsError> {
    Ok(kinetic_energy(bodies) + potential_energy(bodies, gravity)?)
}

pub fn total_momentum(bodies: &[Body]) -> Vector3 {
    let momenta: Vec<Vector3> = bodies.iter().map(|b| vector::scale(&b.vel, b.mass)).collect();
    vector::sum_all(&momenta)
}

/// Angular momentum about the origin, `Σ m·(r × v)`.
pub fn total_angular_momentum(bodies: &[Body]) -> Vector3 {
    let moments: Vec<Vector3> = bodies
        .iter()
        .map(|b| vector::scale(&vector::cross(&b.pos, &b.vel), b.mass))
        .collect();
    vector::sum_all(&moments)
}

/// `|current − initial| / |initial|`, or the absolute change when `initial` is zero.
pub fn relative_drift(initial: f64, current: f64) -> f64 {
    let change = (current - initial).abs();
    if initial == 0.0 {
        change
    } else {
        change / initial.abs()
    }
}

/// Conserved quantities of a body collection at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invariants {
    pub energy: f64,
    pub momentum: Vector3,
    pub angular_momentum: Vector3,
}

/// Relative change of [`Invariants`] between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Drift {
    pub energy: f64,
    pub angular_momentum: f64,
}

impl Invariants {
    pub fn measure(bodies: &[Body], gravity: &Gravity) -> Result<Self, DynamicsError> {
        Ok(Self {
            energy: total_energy(bodies, gravity)?,
            momentum: total_momentum(bodies),
            angular_momentum: total_angular_momentum(bodies),
        })
    }

    pub fn drift_from(&self, initial: &Invariants) -> Drift {
        let delta_l = vector::distance(&self.angular_momentum, &initial.angular_momentum);
        let reference_l = vector::norm(&initial.angular_momentum);
        Drift {
            energy: relative_drift(initial.energy, self.energy),
            angular_momentum: if reference_l == 0.0 {
                delta_l
            } else {
                delta_l / reference_l
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_pair_has_negative_energy() {
        let gravity = Gravity::new(1.0);
        let bodies = [
            Body::new("a", 2.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            Body::new("b", 1.0, [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        assert_eq!(kinetic_energy(&bodies), 0.5);
        assert_eq!(potential_energy(&bodies, &gravity).unwrap(), -1.0);
        assert_eq!(total_energy(&bodies, &gravity).unwrap(), -0.5);
        assert_eq!(total_momentum(&bodies), [0.0, 1.0, 0.0]);
        assert_eq!(total_angular_momentum(&bodies), [0.0, 0.0, 2.0]);
    }

    #[test]
    fn drift_is_relative_unless_the_reference_is_zero() {
        assert!((relative_drift(-2.0, -2.2) - 0.1).abs() < 1e-12);
        assert_eq!(relative_drift(0.0, 0.25), 0.25);
    }
}
