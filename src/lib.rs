//! Headless N-body stepping with Keplerian element seeding.
//!
//! The physics lives in the member crates; this crate wires scenario files into a
//! [`dynamics::System`] and drives it frame by frame for the command-line front-ends.

pub mod scenario;
pub mod simulation;

pub use trajectory_config as config;
pub use trajectory_core::{constants, time, units, vector};
pub use trajectory_dynamics as dynamics;
pub use trajectory_export as export;
pub use trajectory_orbits as orbits;
