//! Progression engine: the quiz state machine.
//!
//! ```text
//! AwaitingName -> InLevel(n) -> Feedback(n) -> InLevel(n+1) -> ... -> Completed <-> Reviewing
//! ```
//!
//! The engine owns the [`ProgressState`], persists it through an injected
//! [`ProgressStore`] after every change, and drives one injected
//! [`LevelTimer`]. Every intent either commits completely (including the
//! store write) or is rejected with the engine untouched.
//!
//! Time is supplied by the caller as milliseconds (`now_ms`), the same clock
//! the timer was started with.

use std::fmt;

use log::{debug, info};
use thiserror::Error;

use crate::catalog::{self, CatalogError, Prompt};
use crate::progress::{AttemptRecord, Outcome, ProgressState};
use crate::scoring;
use crate::store::{ProgressStore, StoreError};
use crate::timer::{Countdown, LevelTimer, TimerEvent, TimerState};

pub mod summary;

/// Where the player is in the quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingName,
    /// Answering the given level with a countdown running.
    InLevel(u32),
    /// Result screen for the level just finished.
    Feedback(u32),
    /// Every level played; summary screen.
    Completed,
    /// Read-only answer review, entered from `Completed`.
    Reviewing,
}

impl Phase {
    /// Level shown on screen, if any.
    #[must_use]
    pub fn level(self) -> Option<u32> {
        match self {
            Phase::InLevel(n) | Phase::Feedback(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingName => f.write_str("waiting for a name"),
            Phase::InLevel(n) => write!(f, "playing level {n}"),
            Phase::Feedback(n) => write!(f, "showing the result of level {n}"),
            Phase::Completed => f.write_str("completed"),
            Phase::Reviewing => f.write_str("reviewing answers"),
        }
    }
}

/// Player actions forwarded by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    SetName(String),
    /// Current contents of the answer box.
    Draft(String),
    Submit(String),
    Skip,
    Forfeit,
    NavigateTo(u32),
    Continue,
    Review,
    Back,
    Reset,
}

impl Intent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetName(_) => "set name",
            Intent::Draft(_) => "edit answer",
            Intent::Submit(_) => "submit",
            Intent::Skip => "skip",
            Intent::Forfeit => "forfeit",
            Intent::NavigateTo(_) => "navigate",
            Intent::Continue => "continue",
            Intent::Review => "review",
            Intent::Back => "back",
            Intent::Reset => "reset",
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("please enter a name")]
    Validation,
    #[error("level {level} is locked; complete the previous levels to unlock it (unlocked up to {current})")]
    Locked { level: u32, current: u32 },
    #[error("{intent} is not available while {phase}")]
    NotAvailable { intent: &'static str, phase: Phase },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("could not save progress: {0}")]
    Store(#[from] StoreError),
}

/// Result screen data for the level just finished.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub level: u32,
    pub record: AttemptRecord,
    /// Reference answer, shown only after a forfeit.
    pub revealed_answer: Option<&'static str>,
}

/// Read-only view handed to the presentation layer after each transition.
#[derive(Clone, Copy, Debug)]
pub struct EngineSnapshot<'a> {
    pub phase: Phase,
    pub progress: &'a ProgressState,
    pub timer: TimerState,
    pub feedback: Option<&'a Feedback>,
    pub draft: &'a str,
}

impl EngineSnapshot<'_> {
    /// Prompt for the level on screen.
    #[must_use]
    pub fn prompt(&self) -> Option<&'static Prompt> {
        self.phase.level().and_then(|n| catalog::get(n).ok())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Finish {
    Submit,
    Skip,
    Forfeit,
    Timeout,
}

fn elapsed_secs(started_ms: f64, now_ms: f64) -> u32 {
    ((now_ms - started_ms) / 1000.0).round().max(0.0) as u32
}

pub struct Engine<S, T = Countdown> {
    store: S,
    timer: T,
    progress: ProgressState,
    phase: Phase,
    attempt_started_at_ms: f64,
    draft: String,
    feedback: Option<Feedback>,
}

impl<S: ProgressStore> Engine<S> {
    /// Engine with the default countdown timer.
    pub fn new(store: S, now_ms: f64) -> Self {
        Self::with_timer(store, Countdown::new(), now_ms)
    }
}

impl<S: ProgressStore, T: LevelTimer> Engine<S, T> {
    /// Load saved progress and resume where the player left off.
    pub fn with_timer(mut store: S, timer: T, now_ms: f64) -> Self {
        let progress = store.load();
        let mut engine = Self {
            store,
            timer,
            progress,
            phase: Phase::AwaitingName,
            attempt_started_at_ms: now_ms,
            draft: String::new(),
            feedback: None,
        };
        engine.resume(now_ms);
        engine
    }

    // Phase implied by the persisted progress alone.
    fn resume(&mut self, now_ms: f64) {
        if !self.progress.has_name() {
            self.phase = Phase::AwaitingName;
        } else if self.progress.is_complete() {
            self.phase = Phase::Completed;
        } else {
            // `sanitized()` keeps the cursor inside the catalog here.
            let level = self.progress.current_level;
            if let Err(err) = self.enter_level(level, now_ms) {
                log::warn!("cannot resume at level {level}: {err}");
                self.phase = Phase::AwaitingName;
            }
        }
        debug!("engine resumed: {}", self.phase);
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot<'_> {
        EngineSnapshot {
            phase: self.phase,
            progress: &self.progress,
            timer: self.timer.state(),
            feedback: self.feedback.as_ref(),
            draft: &self.draft,
        }
    }

    /// Apply one player intent.
    ///
    /// # Errors
    ///
    /// Whatever the matching transition method returns.
    pub fn dispatch(&mut self, intent: Intent, now_ms: f64) -> Result<(), EngineError> {
        match intent {
            Intent::SetName(name) => self.set_name(&name, now_ms),
            Intent::Draft(text) => self.set_draft(text),
            Intent::Submit(answer) => self.submit(answer, now_ms),
            Intent::Skip => self.skip(now_ms),
            Intent::Forfeit => self.forfeit(now_ms).map(|_| ()),
            Intent::NavigateTo(level) => self.navigate_to(level, now_ms),
            Intent::Continue => self.proceed(now_ms),
            Intent::Review => self.review(),
            Intent::Back => self.back(),
            Intent::Reset => self.reset(),
        }
    }

    fn unavailable(&self, intent: &'static str) -> EngineError {
        EngineError::NotAvailable {
            intent,
            phase: self.phase,
        }
    }

    /// Record the player's name and start at the unlocked level.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name, `NotAvailable` once a name is set,
    /// `Store` if the name cannot be saved.
    pub fn set_name(&mut self, name: &str, now_ms: f64) -> Result<(), EngineError> {
        if self.phase != Phase::AwaitingName {
            return Err(self.unavailable("set name"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation);
        }
        let mut next = self.progress.clone();
        next.player_name = Some(name.to_owned());
        self.store.save(&next)?;
        self.progress = next;
        info!("player {name} starting at level {}", self.progress.current_level);

        if self.progress.is_complete() {
            self.phase = Phase::Completed;
            return Ok(());
        }
        self.enter_level(self.progress.current_level, now_ms)
    }

    /// Remember what the player has typed so far.
    ///
    /// # Errors
    ///
    /// `NotAvailable` outside a level.
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), EngineError> {
        if !matches!(self.phase, Phase::InLevel(_)) {
            return Err(self.unavailable("edit answer"));
        }
        self.draft = text.into();
        Ok(())
    }

    /// Grade `answer` and finish the level.
    ///
    /// # Errors
    ///
    /// `NotAvailable` outside a level, `Store` if the result cannot be saved.
    pub fn submit(&mut self, answer: impl Into<String>, now_ms: f64) -> Result<(), EngineError> {
        if !matches!(self.phase, Phase::InLevel(_)) {
            return Err(self.unavailable("submit"));
        }
        self.finish(Finish::Submit, answer.into(), now_ms)
    }

    /// Give up on the level; recorded as wrong with whatever was typed.
    ///
    /// # Errors
    ///
    /// `NotAvailable` outside a level, `Store` if the result cannot be saved.
    pub fn skip(&mut self, now_ms: f64) -> Result<(), EngineError> {
        let answer = self.draft.clone();
        self.finish(Finish::Skip, answer, now_ms)
    }

    /// Reveal the expected answer and record the level as forfeited.
    /// Returns the revealed answer.
    ///
    /// # Errors
    ///
    /// `NotAvailable` outside a level, `Store` if the result cannot be saved.
    pub fn forfeit(&mut self, now_ms: f64) -> Result<&'static str, EngineError> {
        let answer = self.draft.clone();
        self.finish(Finish::Forfeit, answer, now_ms)?;
        let level = self.phase.level().unwrap_or_default();
        Ok(catalog::get(level)?.expected_answer)
    }

    /// One elapsed second. Finishes the level as timed out when the
    /// countdown runs out; a no-op outside a level.
    ///
    /// # Errors
    ///
    /// `Store` if the timed-out result cannot be saved.
    pub fn tick(&mut self, now_ms: f64) -> Result<Option<TimerEvent>, EngineError> {
        if !matches!(self.phase, Phase::InLevel(_)) {
            return Ok(None);
        }
        let event = self.timer.tick();
        if event == Some(TimerEvent::Expired) {
            let answer = self.draft.clone();
            self.finish(Finish::Timeout, answer, now_ms)?;
        }
        Ok(event)
    }

    // Nothing on `self` changes until the store has accepted the result.
    fn finish(&mut self, how: Finish, answer: String, now_ms: f64) -> Result<(), EngineError> {
        let level = match self.phase {
            Phase::InLevel(n) => n,
            _ => {
                return Err(self.unavailable(match how {
                    Finish::Submit => "submit",
                    Finish::Skip => "skip",
                    Finish::Forfeit => "forfeit",
                    Finish::Timeout => "timeout",
                }));
            }
        };
        let prompt = catalog::get(level)?;
        let grade = scoring::grade(&answer, prompt.expected_answer);
        let outcome = match how {
            Finish::Submit => Outcome::Answered {
                accepted: grade.accepted,
            },
            Finish::Skip => Outcome::Skipped,
            Finish::Forfeit => Outcome::Forfeited,
            Finish::Timeout => Outcome::TimedOut,
        };
        let record = AttemptRecord::new(
            level,
            outcome,
            answer.clone(),
            elapsed_secs(self.attempt_started_at_ms, now_ms),
            scoring::round_score(grade.similarity),
        );

        let next = self.progress.with_attempt(record.clone());
        self.store.save(&next)?;

        self.timer.stop();
        self.progress = next;
        self.draft = answer;
        info!(
            "level {level} finished: {} in {}s (cursor now {})",
            record.verdict(),
            record.time_taken_seconds,
            self.progress.current_level
        );
        self.feedback = Some(Feedback {
            level,
            record,
            revealed_answer: (how == Finish::Forfeit).then_some(prompt.expected_answer),
        });
        self.phase = Phase::Feedback(level);
        Ok(())
    }

    /// Leave the result screen for the next unlocked level, or the summary
    /// once every level has been played.
    ///
    /// # Errors
    ///
    /// `NotAvailable` outside the result screen.
    pub fn proceed(&mut self, now_ms: f64) -> Result<(), EngineError> {
        if !matches!(self.phase, Phase::Feedback(_)) {
            return Err(self.unavailable("continue"));
        }
        if self.progress.is_complete() {
            self.timer.stop();
            self.feedback = None;
            self.phase = Phase::Completed;
            info!("all {} levels completed", catalog::size());
            return Ok(());
        }
        self.enter_level(self.progress.current_level, now_ms)
    }

    /// Open an unlocked level for another attempt. The unlock cursor is not
    /// moved; finishing the level overwrites its previous record.
    ///
    /// # Errors
    ///
    /// `Locked` beyond the cursor, `Catalog` for a level number the catalog
    /// does not have, `NotAvailable` before a name is set or while reviewing.
    pub fn navigate_to(&mut self, level: u32, now_ms: f64) -> Result<(), EngineError> {
        if matches!(self.phase, Phase::AwaitingName | Phase::Reviewing) {
            return Err(self.unavailable("navigate"));
        }
        let current = self.progress.current_level;
        if level > current {
            return Err(EngineError::Locked { level, current });
        }
        catalog::get(level)?;
        self.enter_level(level, now_ms)
    }

    /// Show the answer review list.
    ///
    /// # Errors
    ///
    /// `NotAvailable` unless on the summary screen.
    pub fn review(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Completed {
            return Err(self.unavailable("review"));
        }
        self.phase = Phase::Reviewing;
        Ok(())
    }

    /// Return from the review list to the summary.
    ///
    /// # Errors
    ///
    /// `NotAvailable` unless reviewing.
    pub fn back(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Reviewing {
            return Err(self.unavailable("back"));
        }
        self.phase = Phase::Completed;
        Ok(())
    }

    /// Wipe all progress and ask for a name again.
    ///
    /// # Errors
    ///
    /// `Store` if the saved record cannot be removed; nothing changes then.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.store.clear()?;
        self.timer.stop();
        self.progress = ProgressState::default();
        self.feedback = None;
        self.draft.clear();
        self.phase = Phase::AwaitingName;
        info!("progress reset");
        Ok(())
    }

    fn enter_level(&mut self, level: u32, now_ms: f64) -> Result<(), EngineError> {
        let prompt = catalog::get(level)?;
        self.timer.start(prompt.time_budget(), now_ms);
        self.attempt_started_at_ms = now_ms;
        self.draft.clear();
        self.feedback = None;
        self.phase = Phase::InLevel(level);
        debug!("entered level {level} ({}, {}s)", prompt.tier, prompt.time_budget());
        Ok(())
    }
}
