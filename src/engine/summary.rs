//! Read-only aggregates derived from a progress snapshot: the completion
//! banner, the recent-activity list, the progress bar and the review list.
//!
//! Everything is recomputed from the current attempts on each call, so
//! replaying an earlier level changes the totals retroactively.

use crate::catalog::{self, LEVEL_COUNT, Prompt};
use crate::progress::{AttemptRecord, ProgressState};

/// Entries shown in the sidebar activity list.
pub const RECENT_LIMIT: usize = 6;

/// Totals for the completion screen.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionSummary {
    pub player_name: String,
    /// Widened so that implausible stored durations cannot overflow the sum.
    pub total_time_seconds: u64,
    pub correct_count: u32,
    /// Average over every level in the catalog, not just attempted ones.
    pub average_seconds: f64,
    pub level_count: u32,
}

impl CompletionSummary {
    #[must_use]
    pub fn from_progress(progress: &ProgressState) -> Self {
        let total_time_seconds = progress
            .attempts
            .values()
            .map(|r| u64::from(r.time_taken_seconds))
            .sum();
        let correct_count = progress.attempts.values().filter(|r| r.is_correct).count() as u32;
        Self {
            player_name: progress.player_name.clone().unwrap_or_default(),
            total_time_seconds,
            correct_count,
            average_seconds: total_time_seconds as f64 / f64::from(LEVEL_COUNT),
            level_count: LEVEL_COUNT,
        }
    }
}

/// Completed-level counter behind the progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressMeter {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
}

impl ProgressMeter {
    #[must_use]
    pub fn from_progress(progress: &ProgressState) -> Self {
        let completed = progress.attempts.len() as u32;
        let percent = (f64::from(completed) / f64::from(LEVEL_COUNT) * 100.0).round() as u32;
        Self {
            completed,
            total: LEVEL_COUNT,
            percent,
        }
    }
}

/// Highest-numbered attempts first, at most `limit` of them.
#[must_use]
pub fn recent_activity(progress: &ProgressState, limit: usize) -> Vec<&AttemptRecord> {
    progress.attempts.values().rev().take(limit).collect()
}

/// One line of the answer review list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviewRow<'a> {
    pub level: u32,
    pub prompt: &'static Prompt,
    pub attempt: Option<&'a AttemptRecord>,
}

/// Every catalog level with the player's latest attempt, in level order.
#[must_use]
pub fn review_rows(progress: &ProgressState) -> Vec<ReviewRow<'_>> {
    catalog::iter()
        .map(|(level, prompt)| ReviewRow {
            level,
            prompt,
            attempt: progress.attempt(level),
        })
        .collect()
}
