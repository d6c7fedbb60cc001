//! Player progress: the durable aggregate the engine owns and the store persists.
//!
//! The serialized shape is the page's storage record:
//! `{ playerName, currentLevel, attempts: { "<level>": AttemptRecord } }`.
//! Field aliases accept records written by the first version of the page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::LEVEL_COUNT;

/// Cursor value once every level has been played.
pub const COMPLETED_CURSOR: u32 = LEVEL_COUNT + 1;

/// How a level attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Player submitted an answer; `accepted` is the scoring verdict.
    Answered { accepted: bool },
    Skipped,
    Forfeited,
    TimedOut,
}

/// Result of one finished pass at a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    #[serde(default)]
    pub level_number: u32,
    #[serde(alias = "timeTaken")]
    pub time_taken_seconds: u32,
    #[serde(alias = "correct")]
    pub is_correct: bool,
    #[serde(default)]
    pub answer_given: String,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub forfeited: bool,
    #[serde(default, alias = "similarity")]
    pub similarity_score: f64,
}

impl AttemptRecord {
    /// Build a record from an outcome. Only `Answered { accepted: true }`
    /// yields `is_correct`, so a correct record is never timed out or forfeited.
    #[must_use]
    pub fn new(
        level_number: u32,
        outcome: Outcome,
        answer_given: impl Into<String>,
        time_taken_seconds: u32,
        similarity_score: f64,
    ) -> Self {
        Self {
            level_number,
            time_taken_seconds,
            is_correct: matches!(outcome, Outcome::Answered { accepted: true }),
            answer_given: answer_given.into(),
            timed_out: outcome == Outcome::TimedOut,
            forfeited: outcome == Outcome::Forfeited,
            similarity_score: unit_score(similarity_score),
        }
    }

    /// Short verdict used in the activity list.
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.is_correct {
            "Correct"
        } else if self.forfeited {
            "Forfeit"
        } else if self.timed_out {
            "Timed out"
        } else {
            "Wrong"
        }
    }
}

// Scores live in [0, 1]; NaN has no place in a stored record.
fn unit_score(score: f64) -> f64 {
    if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
}

fn first_level() -> u32 {
    1
}

/// Singleton progress record for the local player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    #[serde(default, alias = "name")]
    pub player_name: Option<String>,
    /// Unlock cursor: highest level reachable. `LEVEL_COUNT + 1` once all are done.
    #[serde(default = "first_level")]
    pub current_level: u32,
    #[serde(default, alias = "completed")]
    pub attempts: BTreeMap<u32, AttemptRecord>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            player_name: None,
            current_level: 1,
            attempts: BTreeMap::new(),
        }
    }
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether level `level` may be opened.
    #[must_use]
    pub fn is_unlocked(&self, level: u32) -> bool {
        (1..=LEVEL_COUNT).contains(&level) && level <= self.current_level
    }

    /// Every level has been played at least once.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_level > LEVEL_COUNT
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        self.player_name.is_some()
    }

    #[must_use]
    pub fn attempt(&self, level: u32) -> Option<&AttemptRecord> {
        self.attempts.get(&level)
    }

    /// Copy of this state with `record` stored under its level and the cursor
    /// advanced. Finishing the frontier level moves the cursor one step;
    /// replaying an earlier level leaves it where it is.
    #[must_use]
    pub fn with_attempt(&self, record: AttemptRecord) -> Self {
        let level = record.level_number;
        let mut next = self.clone();
        next.current_level = next
            .current_level
            .max(level.saturating_add(1).min(COMPLETED_CURSOR));
        next.attempts.insert(level, record);
        next
    }

    /// A state the store keeps unchanged: already in [`sanitized`] form.
    ///
    /// [`sanitized`]: ProgressState::sanitized
    #[must_use]
    pub fn is_valid(&self) -> bool {
        *self == self.clone().sanitized()
    }

    /// Canonical form of a state: clamp the cursor into
    /// `1..=LEVEL_COUNT + 1`, drop attempts for unknown levels, make each
    /// record's level number match its key, keep scores in `[0, 1]`, trim
    /// the name and treat a blank one as absent. Idempotent.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.current_level = self.current_level.clamp(1, COMPLETED_CURSOR);
        self.attempts.retain(|level, _| (1..=LEVEL_COUNT).contains(level));
        for (level, record) in &mut self.attempts {
            record.level_number = *level;
            record.similarity_score = unit_score(record.similarity_score);
        }
        self.player_name = self
            .player_name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(level: u32, accepted: bool) -> AttemptRecord {
        AttemptRecord::new(level, Outcome::Answered { accepted }, "x", 3, 0.5)
    }

    #[test]
    fn outcome_flags_are_consistent() {
        let r = AttemptRecord::new(1, Outcome::TimedOut, "", 60, 0.0);
        assert!(r.timed_out && !r.is_correct && !r.forfeited);
        let r = AttemptRecord::new(1, Outcome::Forfeited, "", 4, 0.0);
        assert!(r.forfeited && !r.is_correct && !r.timed_out);
        let r = AttemptRecord::new(1, Outcome::Skipped, "abc", 4, 0.2);
        assert!(!r.forfeited && !r.is_correct && !r.timed_out);
        assert_eq!(r.verdict(), "Wrong");
        assert_eq!(answered(1, true).verdict(), "Correct");
    }

    #[test]
    fn frontier_attempt_advances_cursor() {
        let s = ProgressState::new().with_attempt(answered(1, true));
        assert_eq!(s.current_level, 2);
        assert!(s.is_unlocked(2));
        assert!(!s.is_unlocked(3));
    }

    #[test]
    fn replaying_earlier_level_keeps_cursor() {
        let mut s = ProgressState::new();
        for level in 1..=5 {
            s = s.with_attempt(answered(level, false));
        }
        assert_eq!(s.current_level, 6);
        let s = s.with_attempt(answered(2, true));
        assert_eq!(s.current_level, 6);
        assert!(s.attempt(2).unwrap().is_correct);
    }

    #[test]
    fn last_level_caps_cursor() {
        let mut s = ProgressState::new();
        s.current_level = LEVEL_COUNT;
        let s = s.with_attempt(answered(LEVEL_COUNT, true));
        assert_eq!(s.current_level, COMPLETED_CURSOR);
        assert!(s.is_complete());
        assert!(!s.is_unlocked(COMPLETED_CURSOR));
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let mut s = ProgressState::new();
        s.current_level = 99;
        s.player_name = Some("   ".into());
        s.attempts.insert(0, answered(0, true));
        s.attempts.insert(31, answered(31, true));
        s.attempts.insert(4, answered(7, true));
        let s = s.sanitized();
        assert_eq!(s.current_level, COMPLETED_CURSOR);
        assert_eq!(s.player_name, None);
        assert_eq!(s.attempts.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(s.attempt(4).unwrap().level_number, 4);
    }

    #[test]
    fn sanitize_trims_name_and_is_idempotent() {
        let mut s = ProgressState::new().with_attempt(answered(1, true));
        s.player_name = Some("  Bob ".into());
        s.attempts.get_mut(&1).unwrap().similarity_score = f64::NAN;
        assert!(!s.is_valid());
        let once = s.sanitized();
        assert_eq!(once.player_name.as_deref(), Some("Bob"));
        assert_eq!(once.attempt(1).unwrap().similarity_score, 0.0);
        assert!(once.is_valid());
        assert_eq!(once.clone().sanitized(), once);
    }

    #[test]
    fn wire_shape_uses_camel_case_and_string_keys() {
        let s = ProgressState {
            player_name: Some("Asha".into()),
            current_level: 2,
            attempts: BTreeMap::from([(1, answered(1, true))]),
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["playerName"], "Asha");
        assert_eq!(json["currentLevel"], 2);
        assert_eq!(json["attempts"]["1"]["isCorrect"], true);
        assert_eq!(json["attempts"]["1"]["timeTakenSeconds"], 3);
    }

    #[test]
    fn legacy_record_is_understood() {
        let raw = r#"{"name":"Rahul","currentLevel":3,"completed":{
            "1":{"timeTaken":5,"correct":true,"answerGiven":"hello","timedOut":false,"forfeited":false,"similarity":1},
            "2":{"timeTaken":60,"correct":false,"answerGiven":"","timedOut":true,"forfeited":false,"similarity":0}}}"#;
        let s: ProgressState = serde_json::from_str(raw).unwrap();
        let s = s.sanitized();
        assert_eq!(s.player_name.as_deref(), Some("Rahul"));
        assert_eq!(s.current_level, 3);
        assert_eq!(s.attempt(1).unwrap().level_number, 1);
        assert!(s.attempt(2).unwrap().timed_out);
    }
}
