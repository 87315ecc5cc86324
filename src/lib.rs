//! Orbit Survival - an orbit-hopping arcade survival game
//!
//! A ship circles a planet on one of three orbits, dodging meteors and
//! collecting minerals and fuel to clear quota-based phases.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (orbits, timers, spawns, collisions, phases, tutorial)
//! - `game`: Host-facing driver (fixed-step loop, intents, events, snapshots)
//! - `tuning`: Data-driven game balance
//! - `pilot`: Pilot roster
//! - `session`: Process-local session flags
//! - `platform`: Browser bindings

pub mod game;
pub mod pilot;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use pilot::{PilotConfig, PilotError};
pub use session::Session;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate: one tick per rendered frame
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in microseconds (1/60 s)
    pub const SIM_DT_US: u64 = 16_667;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Convert polar (r, theta) to cartesian (x, y), planet at the origin
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_polar_round_trip_quarter_turn() {
        let p = polar_to_cartesian(140.0, FRAC_PI_2);
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 140.0).abs() < 0.001);

        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 140.0).abs() < 0.001);
        assert!((theta - FRAC_PI_2).abs() < 0.001);
    }
}
