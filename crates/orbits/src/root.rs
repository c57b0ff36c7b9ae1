//! Fixed-iteration Newton–Raphson solver.

use crate::OrbitError;

/// Smallest derivative magnitude accepted for a Newton step.
pub const MIN_DERIVATIVE: f64 = 1e-12;

/// Outcome of a fixed-iteration solve. The residual `f(root)` is kept so callers can decide
/// whether the iteration budget was enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub root: f64,
    pub residual: f64,
    pub iterations: u32,
}

impl RootEstimate {
    /// True when `|f(root)| <= tolerance`.
    pub fn converged(&self, tolerance: f64) -> bool {
        self.residual.abs() <= tolerance
    }

    /// Turn an unconverged estimate into [`OrbitError::NonConvergence`].
    pub fn ensure_converged(self, tolerance: f64) -> Result<Self, OrbitError> {
        if self.converged(tolerance) {
            Ok(self)
        } else {
            Err(OrbitError::NonConvergence {
                iterations: self.iterations,
                residual: self.residual,
            })
        }
    }
}

/// Run exactly `iterations` Newton updates `x ← x − f(x)/f'(x)` starting at `initial_guess`.
///
/// There is no early exit and no convergence test; inspect [`RootEstimate::residual`] or use
/// [`RootEstimate::ensure_converged`]. A derivative smaller than [`MIN_DERIVATIVE`] (or NaN)
/// stops the solve with [`OrbitError::ZeroDerivative`].
pub fn newton_raphson<F, D>(
    f: F,
    f_prime: D,
    initial_guess: f64,
    iterations: u32,
) -> Result<RootEstimate, OrbitError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut guess = initial_guess;
    for _ in 0..iterations {
        let slope = f_prime(guess);
        if !(slope.abs() >= MIN_DERIVATIVE) {
            return Err(OrbitError::ZeroDerivative {
                guess,
                derivative: slope,
            });
        }
        guess -= f(guess) / slope;
    }

    Ok(RootEstimate {
        root: guess,
        residual: f(guess),
        iterations,
    })
}
