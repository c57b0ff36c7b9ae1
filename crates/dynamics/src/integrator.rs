//! Per-body classical RK4 and the system pass that drives it.
//!
//! Each body is advanced on its own: the other bodies stay frozen at the state held in the
//! working buffer while the focus body is moved through the four RK4 stages. Which state the
//! frozen bodies hold is decided by [`StepOrdering`].

use log::{debug, trace};
use trajectory_core::vector::{self, Vector3};

use crate::{Body, DynamicsError, Gravity, System};

/// How a pass over the collection treats bodies that were already advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepOrdering {
    /// Later bodies see the bodies advanced earlier in the same pass.
    #[default]
    GaussSeidel,
    /// Every body sees the collection as it was at the start of the pass.
    Jacobi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOptions {
    pub ordering: StepOrdering,
    /// Skip bodies without a parent, leaving them where they are.
    pub anchor_roots: bool,
}

/// Caller-owned scratch space for integration. Sized on first use and reused afterwards.
#[derive(Debug, Clone, Default)]
pub struct StepBuffer {
    working: Vec<Body>,
    results: Vec<(Vector3, Vector3)>,
}

impl StepBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_system(system: &System) -> Self {
        let mut buffer = Self::new();
        buffer.prepare(system.bodies());
        buffer
    }

    pub fn capacity(&self) -> usize {
        self.working.capacity()
    }

    /// Copy `bodies` into the working buffer, reusing existing slots.
    pub fn prepare(&mut self, bodies: &[Body]) {
        if self.working.len() != bodies.len() {
            self.working.clear();
            self.working.extend_from_slice(bodies);
            return;
        }
        for (slot, body) in self.working.iter_mut().zip(bodies) {
            if slot.name != body.name {
                slot.name.clone_from(&body.name);
            }
            slot.mass = body.mass;
            slot.pos = body.pos;
            slot.vel = body.vel;
            slot.color = body.color;
            slot.orbit = body.orbit;
        }
    }
}

fn check_time_step(dt: f64) -> Result<(), DynamicsError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(DynamicsError::InvalidTimeStep(dt))
    }
}

/// Move the working copy of `focus` to `start + (velocity, accel)·h`.
fn euler_stage(
    working: &mut [Body],
    focus: usize,
    start: &Body,
    accel: &Vector3,
    velocity: &Vector3,
    h: f64,
) {
    let body = &mut working[focus];
    body.pos = vector::add(&start.pos, &vector::scale(velocity, h));
    body.vel = vector::add(&start.vel, &vector::scale(accel, h));
}

fn rk4_stages(
    working: &mut [Body],
    focus: usize,
    start: &Body,
    dt: f64,
    gravity: &Gravity,
) -> Result<(Vector3, Vector3), DynamicsError> {
    let inv_mass = 1.0 / start.mass;
    let half = dt / 2.0;

    let a1 = vector::scale(&gravity.net_force(working, focus)?, inv_mass);
    let v1 = start.vel;
    trace!("{}: k1 a={a1:?} v={v1:?}", start.name);
    euler_stage(working, focus, start, &a1, &v1, half);

    let a2 = vector::scale(&gravity.net_force(working, focus)?, inv_mass);
    let v2 = working[focus].vel;
    trace!("{}: k2 a={a2:?} v={v2:?}", start.name);
    euler_stage(working, focus, start, &a2, &v2, half);

    let a3 = vector::scale(&gravity.net_force(working, focus)?, inv_mass);
    let v3 = working[focus].vel;
    trace!("{}: k3 a={a3:?} v={v3:?}", start.name);
    euler_stage(working, focus, start, &a3, &v3, dt);

    let a4 = vector::scale(&gravity.net_force(working, focus)?, inv_mass);
    let v4 = working[focus].vel;
    trace!("{}: k4 a={a4:?} v={v4:?}", start.name);

    let accel = vector::sum_all(&[a1, vector::scale(&a2, 2.0), vector::scale(&a3, 2.0), a4]);
    let velocity = vector::sum_all(&[v1, vector::scale(&v2, 2.0), vector::scale(&v3, 2.0), v4]);
    Ok((
        vector::add(&start.pos, &vector::scale(&velocity, dt / 6.0)),
        vector::add(&start.vel, &vector::scale(&accel, dt / 6.0)),
    ))
}

/// Run the four RK4 stages for `focus` against the frozen bodies in `working` and return the
/// new `(pos, vel)`. The working copy of `focus` is restored before returning.
fn rk4_increment(
    working: &mut [Body],
    focus: usize,
    dt: f64,
    gravity: &Gravity,
) -> Result<(Vector3, Vector3), DynamicsError> {
    let start = working
        .get(focus)
        .cloned()
        .ok_or(DynamicsError::BodyIndex(focus))?;
    let outcome = rk4_stages(working, focus, &start, dt, gravity);
    let slot = &mut working[focus];
    slot.pos = start.pos;
    slot.vel = start.vel;
    outcome
}

/// Advance `bodies[focus]` by one RK4 step of `dt`, holding every other body fixed at its
/// current state. `buffer` is refreshed from `bodies` first.
pub fn integrate_body(
    bodies: &mut [Body],
    focus: usize,
    dt: f64,
    gravity: &Gravity,
    buffer: &mut StepBuffer,
) -> Result<(), DynamicsError> {
    check_time_step(dt)?;
    if focus >= bodies.len() {
        return Err(DynamicsError::BodyIndex(focus));
    }
    buffer.prepare(bodies);
    let (pos, vel) = rk4_increment(&mut buffer.working, focus, dt, gravity)?;
    let body = &mut bodies[focus];
    body.pos = pos;
    body.vel = vel;
    debug!("{} speed {:.6}", body.name, body.speed());
    Ok(())
}

/// Advance every body of `system` by `dt` in collection order, then move the clock.
///
/// On error the clock is left untouched; under [`StepOrdering::GaussSeidel`] bodies earlier in
/// the collection may already have moved.
pub fn advance_system(
    system: &mut System,
    dt: f64,
    buffer: &mut StepBuffer,
) -> Result<(), DynamicsError> {
    check_time_step(dt)?;
    let gravity = system.gravity;
    let options = system.options;
    buffer.prepare(&system.bodies);

    match options.ordering {
        StepOrdering::GaussSeidel => {
            for focus in 0..system.bodies.len() {
                if options.anchor_roots && system.bodies[focus].is_root() {
                    continue;
                }
                let (pos, vel) = rk4_increment(&mut buffer.working, focus, dt, &gravity)?;
                let body = &mut system.bodies[focus];
                body.pos = pos;
                body.vel = vel;
                let slot = &mut buffer.working[focus];
                slot.pos = pos;
                slot.vel = vel;
                debug!("{} speed {:.6}", body.name, body.speed());
            }
        }
        StepOrdering::Jacobi => {
            buffer.results.clear();
            for focus in 0..system.bodies.len() {
                let body = &system.bodies[focus];
                if options.anchor_roots && body.is_root() {
                    buffer.results.push((body.pos, body.vel));
                    continue;
                }
                let next = rk4_increment(&mut buffer.working, focus, dt, &gravity)?;
                buffer.results.push(next);
            }
            for (body, &(pos, vel)) in system.bodies.iter_mut().zip(&buffer.results) {
                body.pos = pos;
                body.vel = vel;
                debug!("{} speed {:.6}", body.name, body.speed());
            }
        }
    }

    system.t += dt;
    Ok(())
}

/// Run `steps` consecutive fixed steps of `dt`.
pub fn advance_many(
    system: &mut System,
    dt: f64,
    steps: usize,
    buffer: &mut StepBuffer,
) -> Result<(), DynamicsError> {
    for _ in 0..steps {
        advance_system(system, dt, buffer)?;
    }
    Ok(())
}
