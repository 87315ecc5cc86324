//! Outbound events
//!
//! The simulation queues events on the state; the host drains them after
//! each tick, either as a `Vec` or through an [`EventSink`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::orbit::OrbitTier;
use super::state::PickupKind;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameOverReason {
    MeteorCollision,
    OutOfFuel,
}

impl GameOverReason {
    pub fn as_str(self) -> &'static str {
        match self {
            GameOverReason::MeteorCollision => "METEOR_COLLISION",
            GameOverReason::OutOfFuel => "OUT_OF_FUEL",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete notifications for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A phase quota was met; `is_final` means every phase is done
    PhaseCompleted { phase_index: usize, is_final: bool },
    PhaseStarted { phase_index: usize },
    /// Seconds left before the next phase
    PhaseCountdown { remaining: u8 },
    GameOver { reason: GameOverReason },
    TutorialStepChanged { step_id: String },
    /// Seconds left before the first phase (0 = "GO!")
    TutorialCountdown { remaining: u8 },
    TutorialCompleted { skipped: bool },
    OrbitChanged { tier: OrbitTier },
    PickupCollected { kind: PickupKind, value: f32 },
    ReturnToMenuRequested,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PhaseCompleted {
                phase_index,
                is_final,
            } => write!(f, "phase {} completed (final: {})", phase_index + 1, is_final),
            GameEvent::PhaseStarted { phase_index } => write!(f, "phase {} started", phase_index + 1),
            GameEvent::PhaseCountdown { remaining } => write!(f, "next phase in {remaining}"),
            GameEvent::GameOver { reason } => write!(f, "game over: {reason}"),
            GameEvent::TutorialStepChanged { step_id } => write!(f, "tutorial step {step_id}"),
            GameEvent::TutorialCountdown { remaining } => write!(f, "mission starts in {remaining}"),
            GameEvent::TutorialCompleted { skipped } => {
                write!(f, "tutorial {}", if *skipped { "skipped" } else { "completed" })
            }
            GameEvent::OrbitChanged { tier } => write!(f, "orbit -> {}", tier.label()),
            GameEvent::PickupCollected { kind, value } => write!(f, "collected {kind:?} (+{value})"),
            GameEvent::ReturnToMenuRequested => f.write_str("return to menu"),
        }
    }
}

/// Observer for outbound events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<F: FnMut(GameEvent)> EventSink for F {
    fn emit(&mut self, event: GameEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(GameOverReason::MeteorCollision.to_string(), "METEOR_COLLISION");
        assert_eq!(
            serde_json::to_string(&GameOverReason::OutOfFuel).unwrap(),
            "\"OUT_OF_FUEL\""
        );
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_string(&GameEvent::PhaseCompleted {
            phase_index: 0,
            is_final: false,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"phase_completed","phase_index":0,"is_final":false}"#);
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        let mut sink = |_e: GameEvent| count += 1;
        sink.emit(GameEvent::ReturnToMenuRequested);
        sink.emit(GameEvent::ReturnToMenuRequested);
        assert_eq!(count, 2);
    }
}
