//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod economy;
pub mod events;
pub mod orbit;
pub mod phase;
pub mod scheduler;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tutorial;

pub use events::{EventSink, GameEvent, GameOverReason};
pub use orbit::{OrbitDirection, OrbitLayout, OrbitTier, ShipMotion, request_orbit_change};
pub use phase::PhaseState;
pub use scheduler::{Scheduler, TimerId, TimerKind};
pub use snapshot::{MeteorView, PickupView, Snapshot};
pub use state::{GameState, Meteor, Pickup, PickupKind, PickupLife};
pub use tick::{TickInput, initialize, tick};
pub use tutorial::{
    Highlight, TUTORIAL_SCRIPT, Tutorial, TutorialAction, TutorialStage, TutorialStep,
};
