use std::fmt;

use trajectory_core::vector::{self, Vector3};
use trajectory_orbits::{BodyId, Orbit};

/// RGBA display colour. Carried through for renderers and plots, never read by the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: alpha,
        })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A massive point body. `pos` and `vel` are absolute; `orbit` only describes the body
/// relative to its parent at the moment it was last derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub mass: f64,
    pub pos: Vector3,
    pub vel: Vector3,
    pub color: Color,
    pub orbit: Orbit,
}

impl Body {
    /// A root body with explicit state vectors.
    pub fn new(name: impl Into<String>, mass: f64, pos: Vector3, vel: Vector3) -> Self {
        Self {
            name: name.into(),
            mass,
            pos,
            vel,
            color: Color::WHITE,
            orbit: Orbit::default(),
        }
    }

    /// A body defined by elements about `orbit.parent`. Its state vectors stay zero until the
    /// owning system seeds them.
    pub fn orbiting(name: impl Into<String>, mass: f64, orbit: Orbit) -> Self {
        Self {
            orbit,
            ..Self::new(name, mass, vector::ZERO, vector::ZERO)
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.orbit.parent
    }

    pub fn is_root(&self) -> bool {
        self.orbit.is_root()
    }

    pub fn speed(&self) -> f64 {
        vector::norm(&self.vel)
    }

    /// Multi-line description with name, mass, semi-major axis, position and velocity.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [px, py, pz] = self.pos;
        let [vx, vy, vz] = self.vel;
        write!(
            f,
            "For body {}:\n Mass={:.6}. SMA={:.6}. Pos={{{px:.6},{py:.6},{pz:.6}}}.\n Vel={{{vx:.6},{vy:.6},{vz:.6}}}",
            self.name, self.mass, self.orbit.sma
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colours() {
        assert_eq!(Color::from_hex("#FFFF00"), Some(Color::rgb(255, 255, 0)));
        assert_eq!(
            Color::from_hex("0a0b0c80"),
            Some(Color {
                r: 10,
                g: 11,
                b: 12,
                a: 128
            })
        );
        assert_eq!(Color::from_hex("#FFF"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::rgb(165, 42, 42).to_hex(), "#A52A2A");
    }

    #[test]
    fn summary_lists_mass_and_state() {
        let body = Body::new("Earth", 5.97e24, [1.0, 2.0, 3.0], [0.5, 0.0, -0.5]);
        let text = body.summary();
        assert!(text.starts_with("For body Earth:\n Mass="));
        assert!(text.contains("SMA=0.000000."));
        assert!(text.contains("Pos={1.000000,2.000000,3.000000}."));
        assert!(text.ends_with("Vel={0.500000,0.000000,-0.500000}"));
    }
}
