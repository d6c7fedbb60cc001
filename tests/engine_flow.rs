// End-to-end engine flows against the in-memory store.

use speakeasy::catalog::{self, LEVEL_COUNT};
use speakeasy::engine::summary::CompletionSummary;
use speakeasy::{
    Engine, EngineError, Intent, LevelTimer, MemoryStore, Phase, ProgressStore, TimerEvent,
    TimerState,
};

const SEC: f64 = 1000.0;

fn started(name: &str) -> Engine<MemoryStore> {
    let mut engine = Engine::new(MemoryStore::new(), 0.0);
    engine.set_name(name, 0.0).unwrap();
    engine
}

// Timer that expires on a chosen tick, to show the engine only reacts to events.
struct ManualTimer {
    state: TimerState,
    expire_on_tick: u32,
    ticks: u32,
}

impl ManualTimer {
    fn expiring_on(tick: u32) -> Self {
        Self { state: TimerState::default(), expire_on_tick: tick, ticks: 0 }
    }
}

impl LevelTimer for ManualTimer {
    fn start(&mut self, duration_secs: u32, now_ms: f64) {
        self.ticks = 0;
        self.state = TimerState { remaining_seconds: duration_secs, started_at_ms: now_ms, is_running: true };
    }

    fn stop(&mut self) {
        self.state.is_running = false;
    }

    fn tick(&mut self) -> Option<TimerEvent> {
        if !self.state.is_running {
            return None;
        }
        self.ticks += 1;
        if self.ticks >= self.expire_on_tick {
            self.state.is_running = false;
            self.state.remaining_seconds = 0;
            return Some(TimerEvent::Expired);
        }
        Some(TimerEvent::Tick { remaining: self.state.remaining_seconds })
    }

    fn state(&self) -> TimerState {
        self.state
    }
}

#[test]
fn lowercase_answer_matches_capitalized_reference() {
    let mut e = started("Asha");
    e.submit("hello", 3.0 * SEC).unwrap();
    let r = e.progress().attempt(1).unwrap();
    assert!(r.is_correct);
    assert!(!r.timed_out && !r.forfeited);
}

#[test]
fn loose_sentence_translation_is_rejected() {
    let mut e = started("Asha");
    for level in 1..=10 {
        let answer = catalog::get(level).unwrap().expected_answer;
        e.submit(answer, 0.0).unwrap();
        e.proceed(0.0).unwrap();
    }
    assert_eq!(e.phase(), Phase::InLevel(11));
    e.submit("I want tea", 5.0 * SEC).unwrap();
    let r = e.progress().attempt(11).unwrap();
    assert!(!r.is_correct);
    assert!(r.similarity_score < 0.65);
}

#[test]
fn silent_sixty_seconds_times_out() {
    let mut e = started("Asha");
    let mut expiries = 0;
    for second in 1..=61 {
        if let Ok(Some(TimerEvent::Expired)) = e.tick(f64::from(second) * SEC) {
            expiries += 1;
        }
    }
    assert_eq!(expiries, 1);
    let r = e.progress().attempt(1).unwrap();
    assert!(r.timed_out);
    assert!(!r.is_correct);
    assert_eq!(e.phase(), Phase::Feedback(1));
    assert_eq!(e.progress().current_level, 2);
}

#[test]
fn playing_every_level_completes_with_summed_time() {
    let mut e = started("Asha");
    let mut clock = 0.0;
    let mut expected_total = 0;
    for level in 1..=LEVEL_COUNT {
        assert_eq!(e.phase(), Phase::InLevel(level));
        let before = e.progress().current_level;
        let spent = level % 7 + 1;
        clock += f64::from(spent) * SEC;
        expected_total += u64::from(spent);
        match level % 3 {
            0 => e.submit(catalog::get(level).unwrap().expected_answer, clock).unwrap(),
            1 => e.skip(clock).unwrap(),
            _ => e.forfeit(clock).map(|_| ()).unwrap(),
        }
        assert_eq!(e.progress().current_level, (before + 1).min(LEVEL_COUNT + 1));
        e.proceed(clock).unwrap();
    }
    assert_eq!(e.phase(), Phase::Completed);
    assert_eq!(e.progress().current_level, LEVEL_COUNT + 1);
    let summary = CompletionSummary::from_progress(e.progress());
    assert_eq!(summary.total_time_seconds, expected_total);
    assert_eq!(summary.correct_count, LEVEL_COUNT / 3);
}

#[test]
fn reset_from_completed_clears_everything() {
    let mut e = started("Asha");
    for _ in 1..=LEVEL_COUNT {
        e.skip(0.0).unwrap();
        e.proceed(0.0).unwrap();
    }
    assert_eq!(e.phase(), Phase::Completed);
    e.dispatch(Intent::Reset, 0.0).unwrap();
    assert_eq!(e.phase(), Phase::AwaitingName);
    assert!(e.progress().attempts.is_empty());
    assert_eq!(e.progress().player_name, None);
    assert_eq!(e.store().read().unwrap(), None);
}

#[test]
fn next_level_beyond_cursor_is_always_locked() {
    let mut e = started("Asha");
    for _ in 1..=4 {
        let current = e.progress().current_level;
        let err = e.navigate_to(current + 1, 0.0).unwrap_err();
        assert!(matches!(err, EngineError::Locked { .. }));
        e.skip(0.0).unwrap();
        e.proceed(0.0).unwrap();
    }
}

#[test]
fn reload_resumes_at_cursor_with_fresh_timer() {
    let mut e = started("Asha");
    e.submit("Hello", 2.0 * SEC).unwrap();
    e.proceed(2.0 * SEC).unwrap();
    e.set_draft("Thank").unwrap();
    let saved = e.store().clone();

    let resumed = Engine::new(saved, 50.0 * SEC);
    assert_eq!(resumed.phase(), Phase::InLevel(2));
    assert_eq!(resumed.progress().player_name.as_deref(), Some("Asha"));
    assert_eq!(resumed.timer_state().remaining_seconds, 60);
    assert_eq!(resumed.draft(), "");
}

#[test]
fn reload_after_completion_shows_summary() {
    let mut e = started("Asha");
    for _ in 1..=LEVEL_COUNT {
        e.skip(0.0).unwrap();
        e.proceed(0.0).unwrap();
    }
    let resumed = Engine::new(e.store().clone(), 0.0);
    assert_eq!(resumed.phase(), Phase::Completed);
    assert!(!resumed.timer_state().is_running);
}

#[test]
fn corrupt_saved_progress_starts_fresh() {
    let e = Engine::new(MemoryStore::with_raw("not-json"), 0.0);
    assert_eq!(e.phase(), Phase::AwaitingName);
    assert_eq!(e.store().raw(), None);
}

#[test]
fn injected_timer_expiry_records_timeout() {
    let mut e = Engine::with_timer(MemoryStore::new(), ManualTimer::expiring_on(1), 0.0);
    e.set_name("Asha", 0.0).unwrap();
    e.set_draft("Hel").unwrap();
    assert_eq!(e.tick(12.0 * SEC).unwrap(), Some(TimerEvent::Expired));
    let r = e.progress().attempt(1).unwrap();
    assert!(r.timed_out && !r.is_correct);
    assert_eq!(r.answer_given, "Hel");
    assert_eq!(r.time_taken_seconds, 12);
    assert_eq!(e.tick(13.0 * SEC).unwrap(), None);
}

#[test]
fn expiry_after_submit_cannot_double_record() {
    let mut e = Engine::with_timer(MemoryStore::new(), ManualTimer::expiring_on(2), 0.0);
    e.set_name("Asha", 0.0).unwrap();
    assert!(matches!(e.tick(SEC).unwrap(), Some(TimerEvent::Tick { .. })));
    e.submit("Hello", 1.5 * SEC).unwrap();
    // The pending expiry would have fired on this tick had the timer survived.
    assert_eq!(e.tick(2.0 * SEC).unwrap(), None);
    let r = e.progress().attempt(1).unwrap();
    assert!(r.is_correct && !r.timed_out);
    assert_eq!(e.phase(), Phase::Feedback(1));

    e.proceed(3.0 * SEC).unwrap();
    assert_eq!(e.phase(), Phase::InLevel(2));
    assert_eq!(e.timer_state().started_at_ms, 3.0 * SEC);
    assert!(e.timer_state().is_running);
}

#[test]
fn completed_player_can_replay_an_early_level() {
    let mut e = started("Asha");
    for _ in 1..=LEVEL_COUNT {
        e.skip(0.0).unwrap();
        e.proceed(0.0).unwrap();
    }
    e.navigate_to(3, 0.0).unwrap();
    e.submit("Water", 4.0 * SEC).unwrap();
    assert!(e.progress().attempt(3).unwrap().is_correct);
    assert_eq!(e.progress().current_level, LEVEL_COUNT + 1);
    e.proceed(0.0).unwrap();
    assert_eq!(e.phase(), Phase::Completed);
    assert_eq!(CompletionSummary::from_progress(e.progress()).correct_count, 1);
}

#[test]
fn saved_record_matches_engine_state() {
    let mut e = started("Asha");
    e.forfeit(9.0 * SEC).unwrap();
    let mut store = e.store().clone();
    assert_eq!(&store.load(), e.progress());
}
