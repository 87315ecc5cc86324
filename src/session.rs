//! Session flags
//!
//! Process-local state that survives scene restarts but not an application
//! reload. Nothing here is ever written to storage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bypass the tutorial on every subsequent run
    pub skip_tutorial: bool,
    /// Runs initialized in this session (restarts included)
    pub runs_started: u32,
    /// Best score reached by any finished run
    pub best_score: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once the tutorial has been completed or skipped
    pub fn mark_tutorial_done(&mut self) {
        if !self.skip_tutorial {
            log::info!("Tutorial will be skipped for the rest of the session");
        }
        self.skip_tutorial = true;
    }

    pub fn begin_run(&mut self) -> u32 {
        self.runs_started += 1;
        self.runs_started
    }

    /// Record a finished run; returns true on a new best
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_score_keeps_best() {
        let mut session = Session::new();
        assert!(session.record_score(300));
        assert!(!session.record_score(200));
        assert!(!session.record_score(300));
        assert_eq!(session.best_score, 300);
    }

    #[test]
    fn test_tutorial_flag_is_sticky() {
        let mut session = Session::new();
        assert!(!session.skip_tutorial);
        session.mark_tutorial_done();
        session.mark_tutorial_done();
        assert!(session.skip_tutorial);
    }

    #[test]
    fn test_run_counter() {
        let mut session = Session::new();
        assert_eq!(session.begin_run(), 1);
        assert_eq!(session.begin_run(), 2);
    }
}
