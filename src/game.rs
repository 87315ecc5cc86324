//! Host-facing driver
//!
//! `Game` owns one run plus the session it belongs to. The host feeds it
//! wall-clock time and intents, then reads back snapshots and events.
//! Intents are queued and applied at the start of the next tick.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT_US};
use crate::pilot::{PilotConfig, PilotError};
use crate::session::Session;
use crate::sim::{
    EventSink, GameEvent, GameState, OrbitDirection, OrbitLayout, OrbitTier, Snapshot, TickInput,
    tick,
};
use crate::tuning::{Tuning, TuningError};

/// Seed spacing between consecutive runs of one session
const RUN_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct Game {
    tuning: Tuning,
    session: Session,
    state: GameState,
    /// Seed of the first run
    seed: u64,
    /// Intents for the next tick
    input: TickInput,
    accumulator_us: u64,
    idle_mode: bool,
    viewport: Option<(f32, f32)>,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Self::with_session(seed, tuning, Session::new())
    }

    /// Continue an existing session (e.g. after returning to the menu).
    /// The tuning is validated here; the simulation trusts it afterwards.
    pub fn with_session(seed: u64, tuning: Tuning, session: Session) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(seed, tuning.clone()),
            tuning,
            session,
            seed,
            input: TickInput::default(),
            accumulator_us: 0,
            idle_mode: false,
            viewport: None,
        })
    }

    /// Start the run with the selected pilot (one-shot). Returns `Ok(false)`
    /// if a run already started.
    pub fn initialize(&mut self, pilot: PilotConfig) -> Result<bool, PilotError> {
        pilot.validate()?;
        if self.state.pilot.is_some() {
            log::warn!("initialize called twice; use request_restart instead");
            return Ok(false);
        }
        self.session.begin_run();
        Ok(tick::initialize(&mut self.state, pilot, self.session.skip_tutorial))
    }

    fn is_live(&self, intent: &str) -> bool {
        if self.state.pilot.is_none() {
            log::warn!("{intent} before initialize, ignored");
            return false;
        }
        !self.state.exited
    }

    pub fn request_orbit_change(&mut self, direction: OrbitDirection) {
        if self.is_live("Orbit change") {
            self.input.orbit_changes.push(direction);
        }
    }

    /// Step one tier toward `tier` (click/tap on an orbit)
    pub fn request_orbit_toward(&mut self, tier: OrbitTier) {
        if let Some(direction) = self.state.ship.tier.direction_to(tier) {
            self.request_orbit_change(direction);
        }
    }

    /// Step toward the orbit under a point given relative to the planet
    pub fn request_orbit_at(&mut self, point: Vec2) {
        let tier = self.state.layout.tier_at(point);
        self.request_orbit_toward(tier);
    }

    pub fn request_skip_tutorial(&mut self) {
        if self.is_live("Skip tutorial") {
            self.input.skip_tutorial = true;
        }
    }

    /// Tear the run down and start a fresh one with the same pilot.
    /// The tutorial is never shown again in this session.
    pub fn request_restart(&mut self) {
        let Some(pilot) = self.state.pilot.clone() else {
            log::warn!("Restart before initialize, ignored");
            return;
        };
        self.session.record_score(self.state.score);
        self.session.mark_tutorial_done();

        let cancelled = self.state.teardown();
        let runs = self.session.begin_run();
        let seed = self
            .seed
            .wrapping_add(u64::from(runs).wrapping_mul(RUN_SEED_STRIDE));
        log::info!("Restart: {cancelled} timers cancelled, run {runs} (seed {seed:#x})");

        self.state = GameState::new(seed, self.tuning.clone());
        if let Some((width, height)) = self.viewport {
            let layout = self.layout_for(width, height);
            self.state.apply_layout(layout);
        }
        self.input = TickInput::default();
        self.accumulator_us = 0;
        tick::initialize(&mut self.state, pilot, self.session.skip_tutorial);
    }

    /// Leave the game scene; later ticks do nothing
    pub fn request_exit_to_menu(&mut self) {
        if self.state.exited {
            return;
        }
        self.session.record_score(self.state.score);
        let cancelled = self.state.teardown();
        log::info!("Exit to menu: {cancelled} timers cancelled");
        self.state.exited = true;
        self.input = TickInput::default();
        self.state.emit(GameEvent::ReturnToMenuRequested);
    }

    /// Demo mode: the autopilot flies
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    fn layout_for(&self, width: f32, height: f32) -> OrbitLayout {
        OrbitLayout::for_viewport(&self.tuning.orbits, &self.tuning.screen, width, height)
    }

    /// Viewport changed; orbits scale with it
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Some((width, height));
        let layout = self.layout_for(width, height);
        log::debug!(
            "Resize {width}x{height}: orbits {:.0}/{:.0}/{:.0}",
            layout.inner,
            layout.middle,
            layout.outer
        );
        self.state.apply_layout(layout);
    }

    /// Run exactly one tick with the queued intents
    pub fn step(&mut self) {
        let mut input = std::mem::take(&mut self.input);
        input.idle_mode = self.idle_mode;
        let seen = self.state.pending_events().len();
        tick(&mut self.state, &input);
        self.observe(seen);
    }

    /// Feed elapsed wall-clock time; returns the number of ticks run
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let elapsed_us = (elapsed_ms.max(0.0) * 1000.0) as u64;
        self.accumulator_us = self.accumulator_us.saturating_add(elapsed_us);

        let mut substeps = 0;
        while self.accumulator_us >= SIM_DT_US && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator_us -= SIM_DT_US;
            substeps += 1;
        }
        // Drop the backlog instead of spiralling after a long stall
        if substeps == MAX_SUBSTEPS {
            self.accumulator_us = self.accumulator_us.min(SIM_DT_US);
        }
        substeps
    }

    /// Keep the session in step with what just happened
    fn observe(&mut self, from: usize) {
        let Game { state, session, .. } = self;
        for event in &state.pending_events()[from..] {
            match event {
                GameEvent::TutorialCompleted { .. } => session.mark_tutorial_done(),
                GameEvent::GameOver { .. } | GameEvent::PhaseCompleted { is_final: true, .. } => {
                    if session.record_score(state.score) {
                        log::info!("New best score: {}", state.score);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Deliver queued events to an observer
    pub fn dispatch_events(&mut self, sink: &mut impl EventSink) {
        for event in self.state.drain_events() {
            sink.emit(event);
        }
    }
}
