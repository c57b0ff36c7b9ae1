use log::info;
use trajectory_orbits::{
    BodyId, Orbit, OrbitError, ParentState, StateVectors, elements_from_state,
    state_from_elements,
};

use crate::integrator::{StepBuffer, StepOptions, advance_system};
use crate::{Body, DynamicsError, Gravity};

/// An ordered, fixed set of bodies sharing a clock. Collection order is significant: it is
/// the integration order and parents always come before their children.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub(crate) bodies: Vec<Body>,
    pub(crate) t: f64,
    pub(crate) gravity: Gravity,
    pub(crate) options: StepOptions,
}

impl System {
    /// Validate `bodies` and wrap them in a system at `t = 0` with SI gravity.
    pub fn new(bodies: Vec<Body>) -> Result<Self, DynamicsError> {
        validate(&bodies)?;
        Ok(Self {
            bodies,
            t: 0.0,
            gravity: Gravity::default(),
            options: StepOptions::default(),
        })
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_options(mut self, options: StepOptions) -> Self {
        self.options = options;
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    pub fn options(&self) -> &StepOptions {
        &self.options
    }

    /// One fixed step of `dt`; see [`advance_system`].
    pub fn step(&mut self, dt: f64, buffer: &mut StepBuffer) -> Result<(), DynamicsError> {
        advance_system(self, dt, buffer)
    }

    /// Compute absolute state vectors for every body defined by elements, in collection
    /// order, at the current clock. Returns how many bodies were seeded.
    pub fn seed_from_elements(&mut self) -> Result<usize, DynamicsError> {
        let mut seeded = 0;
        for index in 0..self.bodies.len() {
            if self.bodies[index].is_root() {
                continue;
            }
            let state = derive_state_vectors(&self.bodies, index, self.t, &self.gravity)?;
            let body = &mut self.bodies[index];
            body.pos = state.position;
            body.vel = state.velocity;
            seeded += 1;
        }
        info!("seeded {seeded} of {} bodies from orbital elements", self.bodies.len());
        Ok(seeded)
    }

    pub fn derive_state_vectors(&self, index: BodyId) -> Result<StateVectors, DynamicsError> {
        derive_state_vectors(&self.bodies, index, self.t, &self.gravity)
    }

    pub fn derive_orbital_elements(&self, index: BodyId) -> Result<Orbit, DynamicsError> {
        derive_orbital_elements(&self.bodies, index, &self.gravity)
    }

    /// Re-derive and store the elements of every orbiting body from its current state. The
    /// stored epoch is the current clock, so seeding again reproduces the same state.
    pub fn refresh_orbits(&mut self) -> Result<(), DynamicsError> {
        for index in 0..self.bodies.len() {
            if self.bodies[index].is_root() {
                continue;
            }
            let mut orbit = derive_orbital_elements(&self.bodies, index, &self.gravity)?;
            orbit.epoch = self.t;
            self.bodies[index].orbit = orbit;
        }
        Ok(())
    }
}

fn validate(bodies: &[Body]) -> Result<(), DynamicsError> {
    if bodies.is_empty() {
        return Err(DynamicsError::EmptySystem);
    }
    for (index, body) in bodies.iter().enumerate() {
        if !(body.mass.is_finite() && body.mass > 0.0) {
            return Err(DynamicsError::InvalidMass {
                name: body.name.clone(),
                mass: body.mass,
            });
        }
        if !body.pos.iter().chain(&body.vel).all(|c| c.is_finite()) {
            return Err(DynamicsError::NonFiniteState {
                name: body.name.clone(),
            });
        }
        let Some(parent) = body.parent() else {
            continue;
        };
        if parent >= bodies.len() {
            return Err(DynamicsError::UnknownParent {
                name: body.name.clone(),
                parent,
            });
        }
        if parent >= index {
            return Err(DynamicsError::ParentOrder {
                name: body.name.clone(),
            });
        }
        if !(0.0..1.0).contains(&body.orbit.ecc) {
            return Err(DynamicsError::InvalidEccentricity {
                name: body.name.clone(),
                ecc: body.orbit.ecc,
            });
        }
        if !(body.orbit.sma > 0.0) {
            return Err(OrbitError::InvalidSemiMajorAxis(body.orbit.sma).into());
        }
    }
    Ok(())
}

/// Snapshot of `bodies[id]` as a conversion parent.
pub fn parent_state(
    bodies: &[Body],
    id: BodyId,
    gravity: &Gravity,
) -> Result<ParentState, DynamicsError> {
    let parent = bodies.get(id).ok_or(DynamicsError::BodyIndex(id))?;
    Ok(ParentState {
        id,
        mu: gravity.mu(parent.mass),
        position: parent.pos,
        velocity: parent.vel,
    })
}

/// Absolute state of `bodies[index]` at time `t` from its elements. Root bodies yield the
/// zero state.
pub fn derive_state_vectors(
    bodies: &[Body],
    index: BodyId,
    t: f64,
    gravity: &Gravity,
) -> Result<StateVectors, DynamicsError> {
    let body = bodies.get(index).ok_or(DynamicsError::BodyIndex(index))?;
    let Some(parent) = body.parent() else {
        return Ok(StateVectors::default());
    };
    let parent = resolve_parent(bodies, body, parent, gravity)?;
    Ok(state_from_elements(&body.orbit, &parent, t)?)
}

/// Elements of `bodies[index]` about its parent from the current state vectors. Root bodies
/// yield all-zero elements.
pub fn derive_orbital_elements(
    bodies: &[Body],
    index: BodyId,
    gravity: &Gravity,
) -> Result<Orbit, DynamicsError> {
    let body = bodies.get(index).ok_or(DynamicsError::BodyIndex(index))?;
    let Some(parent) = body.parent() else {
        return Ok(Orbit::default());
    };
    let parent = resolve_parent(bodies, body, parent, gravity)?;
    Ok(elements_from_state(&body.pos, &body.vel, &parent)?)
}

fn resolve_parent(
    bodies: &[Body],
    body: &Body,
    parent: BodyId,
    gravity: &Gravity,
) -> Result<ParentState, DynamicsError> {
    parent_state(bodies, parent, gravity).map_err(|_| DynamicsError::UnknownParent {
        name: body.name.clone(),
        parent,
    })
}
