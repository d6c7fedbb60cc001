//! Per-level countdown.
//!
//! The host owns the clock: it calls [`LevelTimer::tick`] once per elapsed
//! second (the browser shell uses a one-second interval). Each tick yields at
//! most one [`TimerEvent`], so the engine consumes timer callbacks as plain
//! return values and never gets re-entered from inside a transition.

/// Observable countdown state. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimerState {
    pub remaining_seconds: u32,
    /// Host timestamp (ms) passed to the last `start`.
    pub started_at_ms: f64,
    pub is_running: bool,
}

/// Result of one elapsed second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// A second elapsed and time remains.
    Tick { remaining: u32 },
    /// Remaining time reached zero. Emitted once per started countdown.
    Expired,
}

/// Countdown capability injected into the engine.
pub trait LevelTimer {
    /// Begin a countdown, replacing whatever was running.
    fn start(&mut self, duration_secs: u32, now_ms: f64);
    /// Cancel pending ticks. Safe to call when idle.
    fn stop(&mut self);
    /// Advance by one second. `None` when idle.
    fn tick(&mut self) -> Option<TimerEvent>;
    fn state(&self) -> TimerState;

    fn remaining(&self) -> u32 {
        self.state().remaining_seconds
    }

    fn is_running(&self) -> bool {
        self.state().is_running
    }
}

/// Default single-active countdown.
#[derive(Clone, Debug, Default)]
pub struct Countdown {
    state: TimerState,
}

impl Countdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelTimer for Countdown {
    fn start(&mut self, duration_secs: u32, now_ms: f64) {
        self.state = TimerState {
            remaining_seconds: duration_secs,
            started_at_ms: now_ms,
            is_running: true,
        };
    }

    fn stop(&mut self) {
        self.state.is_running = false;
    }

    fn tick(&mut self) -> Option<TimerEvent> {
        if !self.state.is_running {
            return None;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            self.state.is_running = false;
            return Some(TimerEvent::Expired);
        }
        Some(TimerEvent::Tick {
            remaining: self.state.remaining_seconds,
        })
    }

    fn state(&self) -> TimerState {
        self.state
    }
}

/// `MM:SS` rendering for the countdown display.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
