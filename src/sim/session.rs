//! Session state machine: phase, score and high score
//!
//! Menu -> Playing (start) -> GameOver (fatal collision only) -> Menu/Playing.
//! Playing can also be abandoned back to the menu without touching the
//! high score.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

/// Player commands that change the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Start a run from the menu
    Start,
    /// Play again after a game over
    Restart,
    /// Leave a run or the game over screen
    ReturnToMenu,
}

/// Result of ending a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub final_score: u64,
    pub previous_high: u64,
    pub new_high_score: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    phase: GamePhase,
    score: u64,
    high_score: u64,
}

impl Session {
    pub fn new(high_score: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Apply a command. Returns the new phase, or None if the command does
    /// not apply in the current phase.
    pub fn apply(&mut self, command: Command) -> Option<GamePhase> {
        let next = match (self.phase, command) {
            (GamePhase::Menu, Command::Start | Command::Restart) | (GamePhase::GameOver, Command::Restart) => {
                GamePhase::Playing
            }
            (GamePhase::Playing, Command::ReturnToMenu) | (GamePhase::GameOver, Command::ReturnToMenu) => {
                GamePhase::Menu
            }
            _ => return None,
        };

        if next == GamePhase::Playing {
            self.score = 0;
        }
        self.phase = next;
        Some(next)
    }

    /// Add points to the running score. Ignored outside a run.
    pub fn award(&mut self, points: u64) -> bool {
        if self.phase != GamePhase::Playing || points == 0 {
            return false;
        }
        self.score = self.score.saturating_add(points);
        true
    }

    /// Fatal collision: freeze the score and settle the high score.
    /// Only valid while playing; the high score is compared exactly once.
    pub(crate) fn end_run(&mut self) -> Option<RunOutcome> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        self.phase = GamePhase::GameOver;

        let previous_high = self.high_score;
        let new_high_score = self.score > previous_high;
        if new_high_score {
            self.high_score = self.score;
        }
        Some(RunOutcome {
            final_score: self.score,
            previous_high,
            new_high_score,
        })
    }
}
