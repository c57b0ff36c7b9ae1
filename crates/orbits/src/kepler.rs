//! Anomaly conversions and Kepler's equation `E − e·sin E = M`.

use trajectory_core::constants::TWO_PI;

use crate::OrbitError;
use crate::root::{RootEstimate, newton_raphson};

/// Newton iterations spent on Kepler's equation.
pub const KEPLER_ITERATIONS: u32 = 16;

/// Largest `|E − e·sin E − M|` accepted when converting elements to state.
pub const KEPLER_TOLERANCE: f64 = 1e-9;

/// Solve Kepler's equation for the eccentric anomaly, seeded at the mean anomaly.
///
/// The equation parameters are captured by value, so concurrent solves never share state.
pub fn solve_kepler(mean_anomaly: f64, ecc: f64) -> Result<RootEstimate, OrbitError> {
    newton_raphson(
        move |e_ano| e_ano - ecc * e_ano.sin() - mean_anomaly,
        move |e_ano| 1.0 - ecc * e_ano.cos(),
        mean_anomaly,
        KEPLER_ITERATIONS,
    )
}

/// Mean motion `√(μ/a³)` in rad/s.
#[inline]
pub fn mean_motion(sma: f64, mu: f64) -> f64 {
    (mu / sma.powi(3)).sqrt()
}

/// Orbital period `2π√(a³/μ)` (Kepler's third law).
#[inline]
pub fn orbital_period(sma: f64, mu: f64) -> f64 {
    TWO_PI * (sma.powi(3) / mu).sqrt()
}

/// Mean anomaly at time `t` from the anomaly at `epoch`, reduced with `%` (keeps the sign
/// of the unreduced value).
#[inline]
pub fn mean_anomaly_at(mna: f64, epoch: f64, sma: f64, mu: f64, t: f64) -> f64 {
    (mna + (t - epoch) * mean_motion(sma, mu)) % TWO_PI
}

/// True anomaly from eccentric anomaly (half-angle form).
#[inline]
pub fn true_from_eccentric(ecc_ano: f64, ecc: f64) -> f64 {
    let num = (1.0 + ecc).sqrt() * (ecc_ano / 2.0).sin();
    let den = (1.0 - ecc).sqrt() * (ecc_ano / 2.0).cos();
    2.0 * num.atan2(den)
}

/// Eccentric anomaly from true anomaly, the inverse of [`true_from_eccentric`].
#[inline]
pub fn eccentric_from_true(true_ano: f64, ecc: f64) -> f64 {
    let num = (1.0 - ecc).sqrt() * (true_ano / 2.0).sin();
    let den = (1.0 + ecc).sqrt() * (true_ano / 2.0).cos();
    2.0 * num.atan2(den)
}

/// Mean anomaly from eccentric anomaly.
#[inline]
pub fn mean_from_eccentric(ecc_ano: f64, ecc: f64) -> f64 {
    ecc_ano - ecc * ecc_ano.sin()
}
