//! Pomodoro countdown engine.
//!
//! [`TimerEngine`] is a pure state machine over four composite states:
//! {Idle, Running} x {Study, Break}. It never touches a clock itself;
//! something external (the session coordinator's ticker task) calls
//! [`TimerEngine::tick`] once per second while the engine is running.
//!
//! All operations are total. Durations are clamped into range rather than
//! rejected, so there are no error conditions anywhere in this module.

use serde::{Deserialize, Serialize};

/// Allowed study duration in minutes.
pub const STUDY_MINUTES_MIN: u32 = 1;
pub const STUDY_MINUTES_MAX: u32 = 180;

/// Allowed break duration in minutes.
pub const BREAK_MINUTES_MIN: u32 = 1;
pub const BREAK_MINUTES_MAX: u32 = 60;

const DEFAULT_STUDY_SECS: u32 = 25 * 60;
const DEFAULT_BREAK_SECS: u32 = 5 * 60;

/// The two timer phases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Study,
    Break,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Break => "break",
        }
    }

    /// The phase that follows this one.
    pub fn flipped(&self) -> Self {
        match self {
            Self::Study => Self::Break,
            Self::Break => Self::Study,
        }
    }
}

/// Emitted when the countdown crosses zero and the mode flips.
///
/// Consumers use this for alerts ("Time's up, take a break!"); skipping a
/// phase does not emit one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerEvent {
    /// The mode that just finished.
    pub finished: TimerMode,
    /// The mode the engine switched into.
    pub next: TimerMode,
    /// Total completed study sessions after this transition.
    pub completed_sessions: u32,
}

/// Point-in-time view of the engine, serialized to API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub time_remaining_secs: u32,
    pub is_running: bool,
    pub mode: TimerMode,
    pub study_minutes: u32,
    pub break_minutes: u32,
    pub completed_sessions: u32,
}

/// Countdown state machine for one user session.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    time_remaining: u32,
    is_running: bool,
    mode: TimerMode,
    study_duration: u32,
    break_duration: u32,
    completed_sessions: u32,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// A fresh engine: Idle/Study, 25 minutes study, 5 minutes break.
    pub fn new() -> Self {
        Self {
            time_remaining: DEFAULT_STUDY_SECS,
            is_running: false,
            mode: TimerMode::Study,
            study_duration: DEFAULT_STUDY_SECS,
            break_duration: DEFAULT_BREAK_SECS,
            completed_sessions: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn study_minutes(&self) -> u32 {
        self.study_duration / 60
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_duration / 60
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            time_remaining_secs: self.time_remaining,
            is_running: self.is_running,
            mode: self.mode,
            study_minutes: self.study_minutes(),
            break_minutes: self.break_minutes(),
            completed_sessions: self.completed_sessions,
        }
    }

    /// Set the study duration, clamped to 1..=180 minutes.
    ///
    /// If the engine is idle and currently in Study mode, the remaining time
    /// resets to the new duration immediately.
    pub fn configure_study(&mut self, minutes: u32) {
        let minutes = minutes.clamp(STUDY_MINUTES_MIN, STUDY_MINUTES_MAX);
        self.study_duration = minutes * 60;
        if !self.is_running && self.mode == TimerMode::Study {
            self.time_remaining = self.study_duration;
        }
    }

    /// Set the break duration, clamped to 1..=60 minutes.
    ///
    /// If the engine is idle and currently in Break mode, the remaining time
    /// resets to the new duration immediately.
    pub fn configure_break(&mut self, minutes: u32) {
        let minutes = minutes.clamp(BREAK_MINUTES_MIN, BREAK_MINUTES_MAX);
        self.break_duration = minutes * 60;
        if !self.is_running && self.mode == TimerMode::Break {
            self.time_remaining = self.break_duration;
        }
    }

    /// Start the countdown. No-op when already running.
    pub fn start(&mut self) {
        self.is_running = true;
    }

    /// Stop the countdown, preserving the remaining time.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Stop and reload the current mode's full duration.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.time_remaining = self.duration_of(self.mode);
    }

    /// Stop, flip the mode, and load the new mode's duration.
    ///
    /// Skipping never counts as a completed session; only a natural
    /// zero-crossing in Study mode does.
    pub fn skip(&mut self) {
        self.is_running = false;
        self.mode = self.mode.flipped();
        self.time_remaining = self.duration_of(self.mode);
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing while paused. When the remaining time hits zero the
    /// engine stops, flips its mode, reloads the new duration, increments
    /// `completed_sessions` if the finished phase was Study, and returns
    /// the transition event.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running {
            return None;
        }
        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
        if self.time_remaining > 0 {
            return None;
        }

        let finished = self.mode;
        self.is_running = false;
        if finished == TimerMode::Study {
            self.completed_sessions += 1;
        }
        self.mode = finished.flipped();
        self.time_remaining = self.duration_of(self.mode);

        Some(TimerEvent {
            finished,
            next: self.mode,
            completed_sessions: self.completed_sessions,
        })
    }

    fn duration_of(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Study => self.study_duration,
            TimerMode::Break => self.break_duration,
        }
    }
}
