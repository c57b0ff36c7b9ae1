//! Core constants, unit helpers, and vector algebra shared by the trajectory workspace.

/// Physical and numerical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
    pub const BIG_G: f64 = 6.674e-11;
    /// Full turn in radians.
    pub const TWO_PI: f64 = std::f64::consts::TAU;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Metres per astronomical unit.
    pub const AU_M: f64 = 149_597_870_700.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::AU_M;

    /// Convert metres to astronomical units.
    #[inline]
    pub fn m_to_au(v: f64) -> f64 {
        v / AU_M
    }

    /// Convert astronomical units to metres.
    #[inline]
    pub fn au_to_m(v: f64) -> f64 {
        v * AU_M
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    use thiserror::Error;

    /// Alias for a 3D vector (metres or m/s depending on context).
    pub type Vector3 = [f64; 3];

    /// The zero vector.
    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Unit vector along +z, used to build the node vector.
    pub const K_HAT: Vector3 = [0.0, 0.0, 1.0];

    /// Per-component absolute tolerance used by [`fuzzy_eq`]. Deliberately coarse.
    pub const FUZZY_TOLERANCE: f64 = 0.1;

    /// How far past ±1 an `acos` argument may drift through round-off before it is
    /// reported instead of clamped.
    pub const ACOS_DOMAIN_TOLERANCE: f64 = 1e-9;

    /// Failures of the vector helpers that would otherwise produce NaN or ∞.
    #[derive(Debug, Error, Clone, Copy, PartialEq)]
    pub enum VectorError {
        #[error("degenerate geometry: {0}")]
        DegenerateGeometry(&'static str),
        #[error("{operation} argument {value} lies outside its domain")]
        NumericDomain { operation: &'static str, value: f64 },
    }

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Distance between two points, `norm(a - b)`.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }

    /// Unit vector in the direction of `v`.
    pub fn unit(v: &Vector3) -> Result<Vector3, VectorError> {
        let length = norm(v);
        if length == 0.0 {
            return Err(VectorError::DegenerateGeometry(
                "cannot normalise a zero-length vector",
            ));
        }
        Ok(scale(v, 1.0 / length))
    }

    /// `acos` that clamps round-off just outside [-1, 1] and reports anything further out.
    pub fn checked_acos(x: f64) -> Result<f64, VectorError> {
        if x.is_nan() || x.abs() > 1.0 + ACOS_DOMAIN_TOLERANCE {
            return Err(VectorError::NumericDomain {
                operation: "acos",
                value: x,
            });
        }
        Ok(x.clamp(-1.0, 1.0).acos())
    }

    /// Angle between two vectors in [0, π].
    pub fn angle(a: &Vector3, b: &Vector3) -> Result<f64, VectorError> {
        let lengths = norm(a) * norm(b);
        if lengths == 0.0 {
            return Err(VectorError::DegenerateGeometry(
                "angle with a zero-length vector is undefined",
            ));
        }
        checked_acos(dot(a, b) / lengths)
    }

    /// Bit-for-bit component equality.
    #[inline]
    pub fn exact_eq(a: &Vector3, b: &Vector3) -> bool {
        a[0] == b[0] && a[1] == b[1] && a[2] == b[2]
    }

    /// Component-wise equality within [`FUZZY_TOLERANCE`].
    #[inline]
    pub fn fuzzy_eq(a: &Vector3, b: &Vector3) -> bool {
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() < FUZZY_TOLERANCE)
    }

    /// Left-to-right sum of a sequence of vectors.
    pub fn sum_all<'a, I>(vectors: I) -> Vector3
    where
        I: IntoIterator<Item = &'a Vector3>,
    {
        vectors.into_iter().fold(ZERO, |acc, v| add(&acc, v))
    }

}
