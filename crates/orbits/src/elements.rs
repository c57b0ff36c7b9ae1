//! Classical Keplerian elements and their conversion to and from Cartesian state vectors.
//!
//! Elements are always expressed relative to a parent body. Positions and velocities handed
//! in or out are absolute (single inertial frame); the parent's absolute state is supplied
//! through [`ParentState`].

use trajectory_core::vector::{self, K_HAT, Vector3};

use crate::OrbitError;
use crate::kepler::{
    KEPLER_TOLERANCE, eccentric_from_true, mean_anomaly_at, mean_from_eccentric, mean_motion,
    orbital_period, solve_kepler, true_from_eccentric,
};

/// Index of a body inside the collection it was resolved against.
pub type BodyId = usize;

/// Keplerian elements of a body about its parent. Angles in radians, lengths in metres,
/// times in seconds. A root body (`parent == None`) carries all-zero elements.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orbit {
    pub sma: f64,
    pub ecc: f64,
    pub inc: f64,
    pub lan: f64,
    pub ape: f64,
    pub mna: f64,
    pub epoch: f64,
    pub parent: Option<BodyId>,
}

impl Orbit {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Mean motion about a parent with gravitational parameter `mu`.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        mean_motion(self.sma, mu)
    }

    /// Orbital period about a parent with gravitational parameter `mu`.
    pub fn period(&self, mu: f64) -> f64 {
        orbital_period(self.sma, mu)
    }
}

/// Snapshot of the parent a conversion is performed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentState {
    pub id: BodyId,
    /// Gravitational parameter `G·m_parent`.
    pub mu: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateVectors {
    pub position: Vector3,
    pub velocity: Vector3,
}

/// Rotate a perifocal-plane vector into the inertial frame through argument of periapsis,
/// inclination and longitude of the ascending node.
pub fn perifocal_to_inertial(orbit: &Orbit, v: &Vector3) -> Vector3 {
    let (sin_ape, cos_ape) = orbit.ape.sin_cos();
    let (sin_inc, cos_inc) = orbit.inc.sin_cos();
    let (sin_lan, cos_lan) = orbit.lan.sin_cos();
    let [x, y, _] = *v;

    [
        x * (cos_ape * cos_lan - sin_ape * cos_inc * sin_lan)
            - y * (sin_ape * cos_lan + cos_ape * cos_inc * sin_lan),
        x * (cos_ape * sin_lan + sin_ape * cos_inc * cos_lan)
            + y * (cos_ape * cos_inc * cos_lan - sin_ape * sin_lan),
        x * (sin_ape * sin_inc) + y * (cos_ape * sin_inc),
    ]
}

/// Absolute position and velocity of a body at time `t` from its elements.
pub fn state_from_elements(
    orbit: &Orbit,
    parent: &ParentState,
    t: f64,
) -> Result<StateVectors, OrbitError> {
    if !(orbit.sma > 0.0) {
        return Err(OrbitError::InvalidSemiMajorAxis(orbit.sma));
    }
    if !(0.0..1.0).contains(&orbit.ecc) {
        return Err(OrbitError::InvalidEccentricity(orbit.ecc));
    }
    if !(parent.mu > 0.0) {
        return Err(OrbitError::InvalidParentMu(parent.mu));
    }

    let ecc = orbit.ecc;
    let mean_ano = mean_anomaly_at(orbit.mna, orbit.epoch, orbit.sma, parent.mu, t);
    let ecc_ano = solve_kepler(mean_ano, ecc)?
        .ensure_converged(KEPLER_TOLERANCE)?
        .root;
    let true_ano = true_from_eccentric(ecc_ano, ecc);

    let radius = orbit.sma * (1.0 - ecc * ecc_ano.cos());
    let plane_pos = [radius * true_ano.cos(), radius * true_ano.sin(), 0.0];
    let speed_factor = (parent.mu * orbit.sma).sqrt() / radius;
    let plane_vel = [
        -speed_factor * ecc_ano.sin(),
        speed_factor * (1.0 - ecc * ecc).sqrt() * ecc_ano.cos(),
        0.0,
    ];

    let position = vector::add(&perifocal_to_inertial(orbit, &plane_pos), &parent.position);
    let velocity = vector::add(&perifocal_to_inertial(orbit, &plane_vel), &parent.velocity);
    Ok(StateVectors { position, velocity })
}

/// Keplerian elements of a body from its absolute state. The returned epoch is zero, so the
/// mean anomaly is the one at the instant the state was sampled.
pub fn elements_from_state(
    position: &Vector3,
    velocity: &Vector3,
    parent: &ParentState,
) -> Result<Orbit, OrbitError> {
    if !(parent.mu > 0.0) {
        return Err(OrbitError::InvalidParentMu(parent.mu));
    }
    let mu = parent.mu;
    let r = vector::sub(position, &parent.position);
    let v = vector::sub(velocity, &parent.velocity);
    let r_len = vector::norm(&r);
    if r_len == 0.0 {
        return Err(vector::VectorError::DegenerateGeometry("body sits on its parent").into());
    }

    let h = vector::cross(&r, &v);
    let h_len = vector::norm(&h);
    if h_len == 0.0 {
        return Err(vector::VectorError::DegenerateGeometry("zero angular momentum").into());
    }
    let node = vector::cross(&K_HAT, &h);
    let node_len = vector::norm(&node);
    if node_len == 0.0 {
        return Err(vector::VectorError::DegenerateGeometry("equatorial orbit has no node").into());
    }

    let ecc_vec = vector::sub(
        &vector::scale(&vector::cross(&v, &h), 1.0 / mu),
        &vector::scale(&r, 1.0 / r_len),
    );
    let ecc = vector::norm(&ecc_vec);
    if ecc >= 1.0 {
        return Err(OrbitError::Unbound { eccentricity: ecc });
    }
    if ecc == 0.0 {
        return Err(vector::VectorError::DegenerateGeometry("circular orbit has no periapsis").into());
    }

    let inc = vector::checked_acos(h[2] / h_len)?;

    let mut true_ano = vector::angle(&ecc_vec, &r)?;
    if vector::dot(&r, &v) < 0.0 {
        true_ano = -true_ano;
    }
    let ecc_ano = eccentric_from_true(true_ano, ecc);
    let mna = mean_from_eccentric(ecc_ano, ecc);

    let mut lan = vector::checked_acos(node[0] / node_len)?;
    if node[1] < 0.0 {
        lan = -lan;
    }
    let mut ape = vector::angle(&node, &ecc_vec)?;
    if ecc_vec[2] < 0.0 {
        ape = -ape;
    }

    let energy_term = 2.0 / r_len - vector::dot(&v, &v) / mu;
    if !(energy_term > 0.0) {
        return Err(OrbitError::Unbound { eccentricity: ecc });
    }

    Ok(Orbit {
        sma: 1.0 / energy_term,
        ecc,
        inc,
        lan,
        ape,
        mna,
        epoch: 0.0,
        parent: Some(parent.id),
    })
}
